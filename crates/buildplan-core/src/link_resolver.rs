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

//! The Link Phase Resolver (C3): turns a target's frameworks-phase file list
//! and its sources-phase object outputs into the ordered list of link,
//! universal-binary-merge, and debug-symbol invocations for every
//! (variant, architecture) the target builds.

use std::collections::BTreeMap;
use std::path::PathBuf;

use buildplan_util::env::{tool_ids, BuildEnvironment, TargetEnvironment};
use buildplan_util::error::LinkResolveError;
use buildplan_util::invocation::Invocation;

use crate::cmd_builder::CommandBuilder;
use crate::model::{DebugInfoFormat, MachOType};

/// A target's frameworks build phase: an ordered list of file references to
/// be resolved (linked in) for the active architecture.
#[derive(Debug, Clone, Default)]
pub struct FrameworksPhase {
    pub file_references: Vec<PathBuf>,
}

/// What the Sources Phase Resolver hands the Link Phase Resolver: the
/// language-runtime-chosen linker driver and its fixed argument prefix, plus
/// the invocations already produced per (variant, architecture), which this
/// resolver mines for object-file outputs.
#[derive(Debug, Clone, Default)]
pub struct SourcesPhaseOutput {
    pub linker_driver: String,
    pub linker_args: Vec<String>,
    pub variant_architecture_invocations: BTreeMap<(String, String), Vec<Invocation>>,
}

impl SourcesPhaseOutput {
    fn object_outputs(&self, variant: &str, architecture: &str) -> Vec<PathBuf> {
        self.variant_architecture_invocations
            .get(&(variant.to_string(), architecture.to_string()))
            .into_iter()
            .flatten()
            .flat_map(|inv| inv.outputs.iter())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("o"))
            .cloned()
            .collect()
    }
}

/// Resolves the link phase for one target: looks up the four linker tool
/// specs, determines static-archive vs. linked-binary, and walks variants
/// then architectures, producing one invocation per link step plus lipo and
/// dsymutil invocations where the target's settings call for them
/// (spec.md §4.3).
pub fn resolve_link_phase(
    environment: &TargetEnvironment,
    build_environment: &dyn BuildEnvironment,
    target_name: &str,
    frameworks: &FrameworksPhase,
    sources: &SourcesPhaseOutput,
) -> Result<Vec<Invocation>, LinkResolveError> {
    let ld = build_environment
        .tool_spec(tool_ids::LD)
        .ok_or_else(|| LinkResolveError::missing_tool(target_name, tool_ids::LD))?;
    let libtool = build_environment
        .tool_spec(tool_ids::LIBTOOL)
        .ok_or_else(|| LinkResolveError::missing_tool(target_name, tool_ids::LIBTOOL))?;
    let lipo = build_environment
        .tool_spec(tool_ids::LIPO)
        .ok_or_else(|| LinkResolveError::missing_tool(target_name, tool_ids::LIPO))?;
    let dsymutil = build_environment
        .tool_spec(tool_ids::DSYMUTIL)
        .ok_or_else(|| LinkResolveError::missing_tool(target_name, tool_ids::DSYMUTIL))?;

    let mach_o_type = resolve_mach_o_type(environment);
    let is_staticlib = matches!(mach_o_type, MachOType::StaticArchive);

    let variants = resolve_variants(environment);
    let mut invocations = Vec::new();

    for variant in &variants {
        let variant_env = environment.clone().with_layer(
            buildplan_util::env::SettingLayer::new("variant").with("CURRENT_VARIANT", variant.as_str()),
        );
        let variant_suffix = variant_env
            .resolve("EXECUTABLE_VARIANT_SUFFIX")
            .unwrap_or("")
            .to_string();
        let executable_name = variant_env.resolve("EXECUTABLE_NAME").unwrap_or("").to_string();
        let variant_intermediates_name = format!("{executable_name}{variant_suffix}");
        let object_file_dir_key = format!("OBJECT_FILE_DIR_{variant}");
        let variant_intermediates_dir = PathBuf::from(
            variant_env
                .resolve_template(&format!("${{{object_file_dir_key}}}")),
        );
        let built_products_dir = variant_env.resolve_template("${BUILT_PRODUCTS_DIR}");
        let executable_path = variant_env.resolve("EXECUTABLE_PATH").unwrap_or("").to_string();
        let variant_products_output =
            PathBuf::from(format!("{built_products_dir}/{executable_path}{variant_suffix}"));

        let architectures = resolve_architectures(&variant_env);
        let mut universal_inputs = Vec::new();

        for architecture in &architectures {
            let arch_env = variant_env.clone().with_layer(
                buildplan_util::env::SettingLayer::new("arch").with("CURRENT_ARCH", architecture.as_str()),
            );
            let resolved_frameworks: Vec<PathBuf> = frameworks
                .file_references
                .iter()
                .map(|f| PathBuf::from(arch_env.resolve_template(&f.to_string_lossy())))
                .collect();
            let object_inputs = sources.object_outputs(variant, architecture);

            if is_staticlib {
                let output = if architectures.len() > 1 {
                    variant_intermediates_dir
                        .join(architecture)
                        .join(&variant_intermediates_name)
                } else {
                    variant_products_output.clone()
                };
                invocations.push(
                    Invocation::builder()
                        .executable(libtool.executable_name.clone())
                        .arguments(
                            object_inputs
                                .iter()
                                .map(|p| p.to_string_lossy().into_owned())
                                .collect::<Vec<String>>(),
                        )
                        .working_directory(arch_env.working_directory.clone())
                        .inputs(object_inputs.clone())
                        .outputs(vec![output.clone()])
                        .description(format!("Archive {target_name} ({architecture})"))
                        .build()
                        .expect("all fields defaulted"),
                );
                if architectures.len() > 1 {
                    universal_inputs.push(output);
                }
            } else {
                let framework_names = resolved_frameworks.iter().filter_map(|f| {
                    (f.extension().and_then(|e| e.to_str()) == Some("framework"))
                        .then(|| f.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string())
                });
                let other_framework_files: Vec<String> = resolved_frameworks
                    .iter()
                    .filter(|f| f.extension().and_then(|e| e.to_str()) != Some("framework"))
                    .map(|f| f.to_string_lossy().into_owned())
                    .collect();
                let arguments = CommandBuilder::new()
                    .args(sources.linker_args.clone())
                    .args(object_inputs.iter().map(|p| p.to_string_lossy().into_owned()))
                    .args_with_prefix_separator("-framework", framework_names)
                    .args(other_framework_files)
                    .into_args();
                let output = if architectures.len() > 1 {
                    variant_intermediates_dir
                        .join(architecture)
                        .join(&variant_intermediates_name)
                } else {
                    variant_products_output.clone()
                };
                let executable = if sources.linker_driver.is_empty() {
                    ld.executable_name.clone()
                } else {
                    sources.linker_driver.clone()
                };
                invocations.push(
                    Invocation::builder()
                        .executable(executable)
                        .arguments(arguments)
                        .working_directory(arch_env.working_directory.clone())
                        .inputs(object_inputs.clone())
                        .outputs(vec![output.clone()])
                        .description(format!("Link {target_name} ({architecture})"))
                        .build()
                        .expect("all fields defaulted"),
                );
                if architectures.len() > 1 {
                    universal_inputs.push(output);
                }
            }
        }

        if architectures.len() > 1 {
            invocations.push(
                Invocation::builder()
                    .executable(lipo.executable_name.clone())
                    .arguments({
                        let mut args: Vec<String> = universal_inputs
                            .iter()
                            .map(|p| p.to_string_lossy().into_owned())
                            .collect();
                        args.push("-create".to_string());
                        args.push("-output".to_string());
                        args.push(variant_products_output.to_string_lossy().into_owned());
                        args
                    })
                    .working_directory(variant_env.working_directory.clone())
                    .inputs(universal_inputs.clone())
                    .outputs(vec![variant_products_output.clone()])
                    .description(format!("Merge universal binary for {target_name}"))
                    .build()
                    .expect("all fields defaulted"),
            );
        }

        let debug_format = resolve_debug_info_format(&variant_env);
        if debug_format == Some(DebugInfoFormat::DwarfWithDsym)
            && !is_staticlib
            && mach_o_type != MachOType::RelocatableObject
        {
            let dsym_folder = variant_env.resolve_template("${DWARF_DSYM_FOLDER_PATH}");
            let dsym_file = variant_env.resolve_template("${DWARF_DSYM_FILE_NAME}");
            invocations.push(
                Invocation::builder()
                    .executable(dsymutil.executable_name.clone())
                    .arguments(vec![variant_products_output.to_string_lossy().into_owned()])
                    .working_directory(variant_env.working_directory.clone())
                    .inputs(vec![variant_products_output.clone()])
                    .outputs(vec![PathBuf::from(format!("{dsym_folder}/{dsym_file}"))])
                    .description(format!("Extract debug symbols for {target_name}"))
                    .build()
                    .expect("all fields defaulted"),
            );
        }
    }

    Ok(invocations)
}

fn resolve_mach_o_type(environment: &TargetEnvironment) -> MachOType {
    match environment.resolve("MACH_O_TYPE") {
        Some("staticlib") => MachOType::StaticArchive,
        Some("mh_object") => MachOType::RelocatableObject,
        Some("mh_bundle") => MachOType::Bundle,
        Some("mh_dylib") => MachOType::DynamicLibrary,
        _ => MachOType::Executable,
    }
}

fn resolve_debug_info_format(environment: &TargetEnvironment) -> Option<DebugInfoFormat> {
    match environment.resolve("DEBUG_INFORMATION_FORMAT") {
        Some("dwarf-with-dsym") => Some(DebugInfoFormat::DwarfWithDsym),
        Some("dwarf") => Some(DebugInfoFormat::Dwarf),
        _ => None,
    }
}

fn resolve_variants(environment: &TargetEnvironment) -> Vec<String> {
    if environment.variants.is_empty() {
        vec!["normal".to_string()]
    } else {
        environment.variants.clone()
    }
}

fn resolve_architectures(environment: &TargetEnvironment) -> Vec<String> {
    if environment.architecture.is_empty() {
        vec!["x86_64".to_string()]
    } else {
        environment
            .architecture
            .split(' ')
            .map(str::to_string)
            .collect()
    }
}
