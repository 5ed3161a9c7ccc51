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

//! Shared value types and environment/diagnostics plumbing for the build-graph
//! planner: the Invocation model (C1), the environment and tool-spec
//! collaborator traits consumed from upstream (§6), the shell escaper and
//! executable resolver (C5), and the pluggable status-line `Formatter`.

pub mod env;
pub mod error;
pub mod format;
pub mod invocation;
pub mod shell;
