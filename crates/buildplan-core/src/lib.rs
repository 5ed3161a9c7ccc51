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

//! The core build-graph planner: the link phase resolver (C3) and the
//! build-graph emitter (C4), plus the target dependency model and the
//! textual Ninja graph writer (C2) they're built on.

pub mod cmd_builder;
pub mod emitter;
pub mod graph_writer;
pub mod link_resolver;
pub mod model;

pub use cmd_builder::CommandBuilder;
pub use emitter::{emit_build_graph, EmitOptions, EmitReport, TargetInput};
pub use graph_writer::{BuildEdge, Writer};
pub use link_resolver::{resolve_link_phase, FrameworksPhase};
pub use model::{DebugInfoFormat, MachOType, TargetGraph, TargetId};
