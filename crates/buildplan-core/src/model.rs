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

//! The target dependency model: a small dense id for each target plus the
//! dependency graph over those ids, built on the same toposort/cycle-reporting
//! idiom a module-graph resolver would use for its own dependency graph.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

pub type TargetId = u32;

/// The target dependency DAG: an edge `a -> b` means `a` depends on `b` and
/// must therefore be resolved and emitted after `b`.
#[derive(Debug, Clone, Default)]
pub struct TargetGraph {
    graph: DiGraphMap<TargetId, ()>,
}

impl TargetGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraphMap::new(),
        }
    }

    pub fn add_target(&mut self, id: TargetId) {
        self.graph.add_node(id);
    }

    pub fn add_dependency(&mut self, dependent: TargetId, dependency: TargetId) {
        self.graph.add_edge(dependent, dependency, ());
    }

    /// Targets that `id` directly depends on (its out-edges).
    pub fn dependencies_of(&self, id: TargetId) -> impl Iterator<Item = TargetId> + '_ {
        self.graph.neighbors(id)
    }

    /// Returns targets in an order where every target appears after all of
    /// its dependencies, or `Err` naming one target on a cycle.
    pub fn build_order(&self) -> Result<Vec<TargetId>, TargetId> {
        let mut order = toposort(&self.graph, None).map_err(|cycle| cycle.node_id())?;
        order.reverse();
        Ok(order)
    }
}

/// The Mach-O file kind a link phase produces, driving which linker tool
/// spec the Link Phase Resolver looks up (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachOType {
    Executable,
    DynamicLibrary,
    StaticArchive,
    Bundle,
    /// A relocatable object (`mh_object`) — distinct from `Bundle`: both
    /// suppress dsym extraction, but only this one is the "object file"
    /// Mach-O subtype (spec.md §4.3 step 7).
    RelocatableObject,
}

/// The debug-info packaging a target requests. `Dwarf` needs no extra
/// invocation; `DwarfWithDsym` appends a `dsymutil` invocation after the
/// link step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugInfoFormat {
    Dwarf,
    DwarfWithDsym,
}
