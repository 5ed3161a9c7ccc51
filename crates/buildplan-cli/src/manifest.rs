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

//! A toy JSON manifest format describing a workspace's targets, just rich
//! enough to drive the link-phase resolver and graph emitter end to end
//! without a real Xcode project file on hand.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub action: String,
    pub workspace_or_project: String,
    pub scheme: Option<String>,
    pub configuration: String,
    pub objroot: PathBuf,
    pub sdk_search_paths: Vec<PathBuf>,
    pub tools: ToolPaths,
    pub targets: Vec<TargetManifest>,
}

#[derive(Debug, Deserialize)]
pub struct ToolPaths {
    pub ld: String,
    pub libtool: String,
    pub lipo: String,
    pub dsymutil: String,
}

#[derive(Debug, Deserialize)]
pub struct TargetManifest {
    pub name: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    pub mach_o_type: String,
    #[serde(default)]
    pub variants: Vec<String>,
    pub architectures: Vec<String>,
    pub executable_name: String,
    pub executable_path: String,
    pub built_products_dir: PathBuf,
    #[serde(default)]
    pub object_file_dir: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub debug_information_format: Option<String>,
    #[serde(default)]
    pub dwarf_dsym_folder_path: Option<String>,
    #[serde(default)]
    pub dwarf_dsym_file_name: Option<String>,
    pub target_temp_dir: PathBuf,
    pub working_directory: PathBuf,
    #[serde(default)]
    pub linker_driver: String,
    #[serde(default)]
    pub linker_args: Vec<String>,
    /// Maps `"<variant>/<architecture>"` to that combination's compiled
    /// object files, standing in for the sources phase's resolved outputs.
    pub object_outputs: BTreeMap<String, Vec<PathBuf>>,
}

pub fn load(path: &std::path::Path) -> anyhow::Result<Manifest> {
    let text = std::fs::read_to_string(path)?;
    let manifest = serde_json::from_str(&text)?;
    Ok(manifest)
}
