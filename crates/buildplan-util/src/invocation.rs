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

//! The Invocation model (C1): a value-type description of a single tool
//! execution. Constructed fully-formed by upstream resolvers (the Link
//! Phase Resolver and, outside this crate's scope, the sources/compile
//! phase resolvers) and thereafter only read by the Build-Graph Emitter.

use std::path::PathBuf;

use derive_builder::Builder;

/// A small file that must be written to disk before the invocation that
/// depends on it can run: a response file, a generated script, a version
/// file. `executable` marks whether the file should be made runnable; when
/// set and the file isn't already executable, the Emitter chmods it to `0755`.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into))]
pub struct AuxiliaryFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
    #[builder(default)]
    pub executable: bool,
}

/// A single tool execution. An empty `executable` with non-empty `outputs`
/// is legal and represents a coordination stub: the Emitter skips the
/// command-generating step for it but still wires its outputs into the
/// graph (spec.md §4.1).
#[derive(Debug, Clone, Default, Builder)]
#[builder(setter(into), default)]
pub struct Invocation {
    pub executable: String,
    pub arguments: Vec<String>,
    pub working_directory: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    pub phony_inputs: Vec<PathBuf>,
    pub phony_outputs: Vec<String>,
    pub input_dependencies: Vec<PathBuf>,
    pub order_dependencies: Vec<PathBuf>,
    pub auxiliary_files: Vec<AuxiliaryFile>,
    pub description: String,
}

impl Invocation {
    pub fn builder() -> InvocationBuilder {
        InvocationBuilder::default()
    }

    /// Coordination stubs carry no command; the Emitter still wires their
    /// outputs but skips resolving/escaping an executable for them.
    pub fn is_coordination_stub(&self) -> bool {
        self.executable.is_empty()
    }
}
