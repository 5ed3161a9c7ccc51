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

//! The Build-Graph Emitter (C4): walks a target dependency graph, wiring
//! each target's invocations into a textual build graph alongside
//! begin/finish coordination nodes, output-directory preparation, and
//! auxiliary file materialization.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use buildplan_util::env::TargetEnvironment;
use buildplan_util::error::EmitError;
use buildplan_util::format::Formatter;
use buildplan_util::invocation::Invocation;
use buildplan_util::shell;

use crate::graph_writer::{synthetic_phony_output, BuildEdge, Writer};
use crate::model::{TargetGraph, TargetId};

/// Everything the Emitter needs for one target: its resolved environment
/// (`None` simulates a failed environment resolution, spec.md §4.4 B2), its
/// already-composed invocation list (the result of running every phase
/// resolver, including the Link Phase Resolver, upstream of this crate),
/// and the directory its per-target sub-graph file is written to.
#[derive(Debug, Clone)]
pub struct TargetInput {
    pub id: TargetId,
    pub name: String,
    pub environment: Option<TargetEnvironment>,
    pub invocations: Vec<Invocation>,
    pub target_temp_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub action: String,
    pub workspace_or_project: String,
    pub scheme_name: Option<String>,
    pub configuration: String,
    pub objroot: PathBuf,
    /// When set, auxiliary files are not written to disk (spec.md §9: a
    /// known soft-bug the downstream executor still relies on them).
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct EmitReport {
    pub root_graph_path: PathBuf,
    pub per_target_graph_paths: Vec<(String, PathBuf)>,
}

fn begin_name(target_name: &str) -> String {
    format!("begin-target-{target_name}")
}

fn finish_name(target_name: &str) -> String {
    format!("finish-target-{target_name}")
}

/// Runs Phases A-C of the emitter over `targets`, writing the root graph to
/// `${objroot}/build.ninja` and each target's sub-graph to
/// `${target_temp_dir}/build.ninja`. Filesystem write failures are fatal;
/// a missing target environment or an unresolvable executable are logged
/// and the walk continues.
pub fn emit_build_graph(
    targets: &[TargetInput],
    graph: &TargetGraph,
    options: &EmitOptions,
    formatter: &dyn Formatter,
) -> Result<EmitReport, EmitError> {
    let names: std::collections::HashMap<TargetId, &str> = targets
        .iter()
        .map(|t| (t.id, t.name.as_str()))
        .collect();

    let mut root = Writer::new();
    root.comment(&format!("action: {}", options.action));
    root.comment(&format!("workspace/project: {}", options.workspace_or_project));
    if let Some(scheme) = &options.scheme_name {
        root.comment(&format!("scheme: {scheme}"));
    }
    root.comment(&format!("configuration: {}", options.configuration));
    root.newline();
    root.binding("builddir", &options.objroot.to_string_lossy());
    root.newline();
    root.rule("invoke", "cd $dir && $exec");
    root.newline();

    let mut seen_dirs: BTreeSet<PathBuf> = BTreeSet::new();
    let mut per_target_graph_paths = Vec::new();

    for target in targets {
        // (B1) begin-target phony edge, fed by every dependency's finish node.
        let predecessor_finishes: Vec<String> = graph
            .dependencies_of(target.id)
            .filter_map(|dep| names.get(&dep).map(|n| finish_name(n)))
            .collect();
        root.build_edge(&BuildEdge {
            outputs: vec![begin_name(&target.name)],
            rule: "phony".to_string(),
            inputs: predecessor_finishes,
            ..Default::default()
        });
        log::debug!("{}", formatter.target_begun(&target.name));

        // (B2) a missing environment leaves the target at Begun.
        let environment = match &target.environment {
            Some(env) => env,
            None => {
                log::error!("target {}: environment resolution failed", target.name);
                continue;
            }
        };

        // (B3) invocations were already composed upstream, including C3.
        let invocations = &target.invocations;

        // (B4) output-directory dedup, global across the whole walk.
        for invocation in invocations {
            for output in &invocation.outputs {
                if let Some(dir) = output.parent() {
                    let dir = dir.to_path_buf();
                    if seen_dirs.insert(dir.clone()) {
                        root.build_edge(&BuildEdge {
                            outputs: vec![dir.to_string_lossy().into_owned()],
                            rule: "invoke".to_string(),
                            order_dependencies: vec![begin_name(&target.name)],
                            bindings: vec![
                                ("dir".to_string(), invocation.working_directory.to_string_lossy().into_owned()),
                                (
                                    "exec".to_string(),
                                    format!("/bin/mkdir -p {}", shell::escape(&dir.to_string_lossy())),
                                ),
                            ],
                            ..Default::default()
                        });
                    }
                }
            }
        }

        // (B5) per-target sub-graph.
        let mut sub = Writer::new();
        for invocation in invocations {
            if invocation.is_coordination_stub() {
                continue;
            }
            let resolved = shell::resolve_executable(&invocation.executable, &environment.sdk.search_paths);
            let resolved = match resolved {
                Some(path) => path,
                None => {
                    log::error!(
                        "target {}: unresolvable executable `{}`",
                        target.name,
                        invocation.executable
                    );
                    continue;
                }
            };

            let mut outputs: Vec<String> = invocation
                .outputs
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            outputs.extend(invocation.phony_outputs.iter().map(|s| synthetic_phony_output(s)));

            for phony_input in &invocation.phony_inputs {
                sub.build_edge(&BuildEdge::phony(phony_input.to_string_lossy().into_owned()));
            }

            let mut order_dependencies: Vec<String> = invocation
                .order_dependencies
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            for output in &invocation.outputs {
                if let Some(dir) = output.parent() {
                    order_dependencies.push(dir.to_string_lossy().into_owned());
                }
            }
            order_dependencies.push(begin_name(&target.name));

            let mut exec = shell::escape(&resolved.to_string_lossy());
            for arg in &invocation.arguments {
                exec.push(' ');
                exec.push_str(&shell::escape(arg));
            }

            sub.build_edge(&BuildEdge {
                outputs,
                rule: "invoke".to_string(),
                inputs: invocation.inputs.iter().map(|p| p.to_string_lossy().into_owned()).collect(),
                input_dependencies: invocation
                    .input_dependencies
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect(),
                order_dependencies,
                bindings: vec![
                    ("description".to_string(), invocation.description.clone()),
                    ("dir".to_string(), invocation.working_directory.to_string_lossy().into_owned()),
                    ("exec".to_string(), exec),
                ],
            });
        }

        // (B6) auxiliary files.
        if !options.dry_run {
            for invocation in invocations {
                for aux in &invocation.auxiliary_files {
                    write_auxiliary_file(aux).map_err(|e| EmitError::io(&aux.path, e))?;
                }
            }
        }

        // (B7) serialize the per-target sub-graph.
        let target_graph_path = target.target_temp_dir.join("build.ninja");
        write_graph_file(&target_graph_path, sub)?;
        root.subninja(&target_graph_path.to_string_lossy());
        per_target_graph_paths.push((target.name.clone(), target_graph_path));

        // (B8) finish-target phony edge.
        let real_outputs: Vec<String> = invocations
            .iter()
            .flat_map(|inv| inv.outputs.iter())
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let synthetic_outputs: Vec<String> = invocations
            .iter()
            .flat_map(|inv| inv.phony_outputs.iter())
            .map(|s| synthetic_phony_output(s))
            .collect();
        root.build_edge(&BuildEdge {
            outputs: vec![finish_name(&target.name)],
            rule: "phony".to_string(),
            inputs: real_outputs,
            order_dependencies: synthetic_outputs,
            ..Default::default()
        });
        log::debug!("{}", formatter.target_finished(&target.name, invocations.len()));
    }

    let root_graph_path = options.objroot.join("build.ninja");
    write_graph_file(&root_graph_path, root)?;
    log::info!("wrote root build graph to {}", root_graph_path.display());

    Ok(EmitReport {
        root_graph_path,
        per_target_graph_paths,
    })
}

fn write_auxiliary_file(aux: &buildplan_util::invocation::AuxiliaryFile) -> std::io::Result<()> {
    if let Some(parent) = aux.path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&aux.path, &aux.contents)?;
    if aux.executable {
        set_executable(&aux.path)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    if perms.mode() & 0o111 == 0 {
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

fn write_graph_file(path: &Path, writer: Writer) -> Result<(), EmitError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EmitError::io(path, e))?;
    }
    std::fs::write(path, writer.into_bytes()).map_err(|e| EmitError::io(path, e))
}
