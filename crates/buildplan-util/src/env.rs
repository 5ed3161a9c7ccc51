// buildplan: an Xcode-style build-graph planner core.
// Copyright (C) 2026 the buildplan project authors.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Environment and tool-spec collaborators consumed by the core (§6): the
//! layered settings stack that backs variable interpolation, the SDK/target
//! environment the Link Phase Resolver reads linker tool specs from, and the
//! per-target sources view the Emitter pulls object-file outputs from.

use std::collections::HashMap;
use std::path::PathBuf;

/// One named layer of build settings, e.g. a target's own `Info.plist`-style
/// overrides stacked on top of its project's, stacked on top of a shared
/// xcconfig. Layers are consulted front-to-back; the first layer defining a
/// key wins.
#[derive(Debug, Clone, Default)]
pub struct SettingLayer {
    pub name: String,
    values: HashMap<String, String>,
}

impl SettingLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

const MAX_INTERPOLATION_DEPTH: u8 = 16;

/// A stack of `SettingLayer`s supporting `${VAR}`-style recursive
/// interpolation. A variable absent from every layer resolves to the empty
/// string rather than failing the whole lookup — build settings that are
/// legitimately unset are common and shouldn't abort resolution.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    layers: Vec<SettingLayer>,
}

impl Environment {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn push_front(&mut self, layer: SettingLayer) {
        self.layers.insert(0, layer);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }

    /// Expands every `${VAR}` reference in `template`, recursively, up to
    /// `MAX_INTERPOLATION_DEPTH` levels deep. Deeper cycles are left
    /// unexpanded rather than looping forever.
    pub fn resolve(&self, template: &str) -> String {
        self.resolve_with_depth(template, 0)
    }

    fn resolve_with_depth(&self, template: &str, depth: u8) -> String {
        if depth >= MAX_INTERPOLATION_DEPTH || !template.contains("${") {
            return template.to_string();
        }
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let key = &after[..end];
                    let value = self.get(key).unwrap_or("");
                    out.push_str(&self.resolve_with_depth(value, depth + 1));
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str("${");
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Identifiers the Link Phase Resolver looks up in the target environment's
/// tool specs (spec.md §6).
pub mod tool_ids {
    pub const LD: &str = "com.apple.pbx.linkers.ld";
    pub const LIBTOOL: &str = "com.apple.pbx.linkers.libtool";
    pub const LIPO: &str = "com.apple.xcode.linkers.lipo";
    pub const DSYMUTIL: &str = "com.apple.tools.dsymutil";
}

/// A resolved linker/archiver/tool executable plus the search paths the
/// Shell Escaper's executable resolver should consult for it.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub identifier: String,
    pub executable_name: String,
    pub search_paths: Vec<PathBuf>,
}

/// The SDK a target environment builds against; `search_paths` feeds the
/// executable resolver (C5) and `platform_name` feeds `${PLATFORM_NAME}`
/// style interpolation done upstream of this crate.
#[derive(Debug, Clone)]
pub struct Sdk {
    pub platform_name: String,
    pub search_paths: Vec<PathBuf>,
}

/// Read-only access to the tool specs registered for a build; kept as a
/// trait so the CLI's toy manifest and a richer host can both provide one.
pub trait BuildEnvironment {
    fn tool_spec(&self, identifier: &str) -> Option<&ToolSpec>;
}

/// An in-memory `BuildEnvironment` backed by a fixed map, sufficient for the
/// CLI and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticBuildEnvironment {
    tools: HashMap<String, ToolSpec>,
}

impl StaticBuildEnvironment {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn with_tool(mut self, tool: ToolSpec) -> Self {
        self.tools.insert(tool.identifier.clone(), tool);
        self
    }
}

impl BuildEnvironment for StaticBuildEnvironment {
    fn tool_spec(&self, identifier: &str) -> Option<&ToolSpec> {
        self.tools.get(identifier)
    }
}

/// Per-target, per-variant, per-architecture environment: the settings
/// layers a single (target, variant, arch) triple resolves its build
/// settings against, plus the SDK it links against.
#[derive(Debug, Clone)]
pub struct TargetEnvironment {
    pub target_name: String,
    /// The ordered list of build variants this target builds (spec.md §3
    /// `LinkPlan`, §4.3 step 3: `VARIANTS`), e.g. `["normal", "profile"]`.
    /// Each variant gets its own `OBJECT_FILE_DIR_<variant>` lookup,
    /// `EXECUTABLE_VARIANT_SUFFIX`, and set of link/lipo/dsym invocations.
    pub variants: Vec<String>,
    pub architecture: String,
    pub sdk: Sdk,
    /// Absolute path the executor changes into before invoking a tool
    /// (spec.md §6 `TargetEnvironment`: "working directory"). Defaults to
    /// empty; callers building a real target should set it via
    /// `with_working_directory`.
    pub working_directory: PathBuf,
    settings: Environment,
}

impl TargetEnvironment {
    pub fn new(
        target_name: impl Into<String>,
        variants: impl IntoIterator<Item = impl Into<String>>,
        architecture: impl Into<String>,
        sdk: Sdk,
    ) -> Self {
        Self {
            target_name: target_name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
            architecture: architecture.into(),
            sdk,
            working_directory: PathBuf::new(),
            settings: Environment::new(),
        }
    }

    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = dir.into();
        self
    }

    pub fn with_layer(mut self, layer: SettingLayer) -> Self {
        self.settings.push_front(layer);
        self
    }

    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.settings.get(key)
    }

    pub fn resolve_template(&self, template: &str) -> String {
        self.settings.resolve(template)
    }
}

/// The invariant context a single phase resolver runs under: which target
/// is being built, under which environment, and where its build products
/// should land.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub environment: TargetEnvironment,
    pub intermediates_dir: PathBuf,
    pub products_dir: PathBuf,
}

/// Collaborator surface a phase resolver needs from the host build system,
/// beyond the plain environment lookups `TargetEnvironment` already does.
pub trait PhaseContext {
    fn build_context(&self) -> &BuildContext;
    fn build_environment(&self) -> &dyn BuildEnvironment;
}

/// Supplies the object-file inputs a link phase should consume for a given
/// target. Implementors typically track an explicit list of compiled
/// sources; `object_outputs_for` falls back to filtering `intermediates_dir`
/// by extension when no explicit view is available, per the "object-outputs
/// view" design note (spec.md §9).
pub trait SourcesResolver {
    /// An explicit, already-known list of this target's object-file
    /// outputs, if the resolver tracks one. `None` triggers the default
    /// directory-scan fallback.
    fn explicit_object_outputs(&self, target_name: &str) -> Option<Vec<PathBuf>>;

    fn object_outputs_for(&self, target_name: &str, intermediates_dir: &std::path::Path) -> Vec<PathBuf> {
        if let Some(explicit) = self.explicit_object_outputs(target_name) {
            return explicit;
        }
        let mut outputs: Vec<PathBuf> = std::fs::read_dir(intermediates_dir)
            .into_iter()
            .flatten()
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("o"))
            .collect();
        outputs.sort();
        outputs
    }
}
