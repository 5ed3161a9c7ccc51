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

//! Error types for the two kinds of fatal failure the core recognizes
//! (spec.md §7): a missing linker tool spec aborts the Link Phase Resolver
//! outright, and a filesystem write failure aborts graph emission outright.
//! Everything else (missing target environment, unresolvable executable) is
//! per-target/per-invocation and only ever reported through `log`, never
//! through these types (spec.md §7 kinds #2 and #3).

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LinkResolveErrorKind {
    #[error("missing tool spec `{0}`")]
    MissingLinkerTool(String),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to resolve link phase for target `{target}`")]
pub struct LinkResolveError {
    pub target: String,
    #[source]
    pub kind: LinkResolveErrorKind,
}

impl LinkResolveError {
    pub fn missing_tool(target: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: LinkResolveErrorKind::MissingLinkerTool(identifier.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmitErrorKind {
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to write `{}`", path.display())]
pub struct EmitError {
    pub path: PathBuf,
    #[source]
    pub kind: EmitErrorKind,
}

impl EmitError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: EmitErrorKind::Io(source),
        }
    }
}
