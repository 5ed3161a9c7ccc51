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

//! Command-line surface: a single `emit` subcommand that reads a workspace
//! manifest and drives the link-phase resolver and graph emitter.

use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[clap(name = "buildplan", about = "Emits a Ninja-compatible build graph for a frameworks/link build plan.")]
pub struct BuildPlanCli {
    #[clap(subcommand)]
    pub subcommand: BuildPlanSubcommands,
}

#[derive(Debug, clap::Parser)]
pub enum BuildPlanSubcommands {
    /// Resolve link phases and emit the build graph for every target in a manifest.
    Emit(EmitSubcommand),
}

#[derive(Debug, clap::Parser)]
pub struct EmitSubcommand {
    /// Path to the workspace manifest describing targets and tool paths.
    pub manifest: PathBuf,

    /// Skip writing auxiliary files to disk (spec-preserved soft-bug: the
    /// downstream executor still expects them to exist).
    #[clap(long)]
    pub dry_run: bool,
}
