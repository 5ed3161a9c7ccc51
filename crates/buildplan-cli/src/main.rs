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

use std::collections::HashMap;

use clap::Parser;
use colored::Colorize;

use buildplan_core::link_resolver::{resolve_link_phase, FrameworksPhase, SourcesPhaseOutput};
use buildplan_core::model::{TargetGraph, TargetId};
use buildplan_core::{emit_build_graph, EmitOptions, TargetInput};
use buildplan_util::env::{Sdk, SettingLayer, StaticBuildEnvironment, TargetEnvironment, ToolSpec};
use buildplan_util::env::tool_ids;
use buildplan_util::format::ColoredFormatter;

mod cli;
mod manifest;

use cli::{BuildPlanSubcommands, EmitSubcommand};

fn init_log() {
    use std::io::Write;
    env_logger::Builder::from_env(env_logger::Env::default())
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            let level_style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{} [{}] [{}:{}] {}",
                level_style.value(record.level()),
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

pub fn main() {
    init_log();
    match main1() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:?}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn main1() -> anyhow::Result<i32> {
    let cli = cli::BuildPlanCli::parse();
    match cli.subcommand {
        BuildPlanSubcommands::Emit(emit) => run_emit(emit),
    }
}

fn run_emit(cmd: EmitSubcommand) -> anyhow::Result<i32> {
    let manifest = manifest::load(&cmd.manifest)?;

    let sdk = Sdk {
        platform_name: "macosx".to_string(),
        search_paths: manifest.sdk_search_paths.clone(),
    };
    let build_environment = StaticBuildEnvironment::new()
        .with_tool(ToolSpec {
            identifier: tool_ids::LD.to_string(),
            executable_name: manifest.tools.ld.clone(),
            search_paths: manifest.sdk_search_paths.clone(),
        })
        .with_tool(ToolSpec {
            identifier: tool_ids::LIBTOOL.to_string(),
            executable_name: manifest.tools.libtool.clone(),
            search_paths: manifest.sdk_search_paths.clone(),
        })
        .with_tool(ToolSpec {
            identifier: tool_ids::LIPO.to_string(),
            executable_name: manifest.tools.lipo.clone(),
            search_paths: manifest.sdk_search_paths.clone(),
        })
        .with_tool(ToolSpec {
            identifier: tool_ids::DSYMUTIL.to_string(),
            executable_name: manifest.tools.dsymutil.clone(),
            search_paths: manifest.sdk_search_paths.clone(),
        });

    let ids: HashMap<String, TargetId> = manifest
        .targets
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.clone(), i as TargetId + 1))
        .collect();

    let mut graph = TargetGraph::new();
    for target in &manifest.targets {
        let id = ids[&target.name];
        graph.add_target(id);
    }
    for target in &manifest.targets {
        let id = ids[&target.name];
        for dep_name in &target.depends_on {
            if let Some(&dep_id) = ids.get(dep_name) {
                graph.add_dependency(id, dep_id);
            } else {
                log::error!("target {}: unknown dependency `{dep_name}`", target.name);
            }
        }
    }

    let mut target_inputs = Vec::with_capacity(manifest.targets.len());
    for target in &manifest.targets {
        let variants = if target.variants.is_empty() {
            vec!["normal".to_string()]
        } else {
            target.variants.clone()
        };
        let mut layer = SettingLayer::new("target")
            .with("MACH_O_TYPE", target.mach_o_type.as_str())
            .with("EXECUTABLE_NAME", target.executable_name.as_str())
            .with("EXECUTABLE_PATH", target.executable_path.as_str())
            .with(
                "BUILT_PRODUCTS_DIR",
                target.built_products_dir.to_string_lossy(),
            );
        for (variant, dir) in &target.object_file_dir {
            layer = layer.with(format!("OBJECT_FILE_DIR_{variant}"), dir.to_string_lossy());
        }
        if let Some(format) = &target.debug_information_format {
            layer = layer.with("DEBUG_INFORMATION_FORMAT", format.as_str());
        }
        if let Some(folder) = &target.dwarf_dsym_folder_path {
            layer = layer.with("DWARF_DSYM_FOLDER_PATH", folder.as_str());
        }
        if let Some(file) = &target.dwarf_dsym_file_name {
            layer = layer.with("DWARF_DSYM_FILE_NAME", file.as_str());
        }

        let environment = TargetEnvironment::new(
            target.name.as_str(),
            variants.clone(),
            target.architectures.join(" "),
            sdk.clone(),
        )
        .with_working_directory(target.working_directory.clone())
        .with_layer(layer);

        let mut sources = SourcesPhaseOutput {
            linker_driver: target.linker_driver.clone(),
            linker_args: target.linker_args.clone(),
            ..Default::default()
        };
        for variant in &variants {
            for architecture in &target.architectures {
                let key = format!("{variant}/{architecture}");
                if let Some(objects) = target.object_outputs.get(&key) {
                    let stub = buildplan_util::invocation::Invocation::builder()
                        .outputs(objects.clone())
                        .build()
                        .expect("all fields defaulted");
                    sources
                        .variant_architecture_invocations
                        .insert((variant.clone(), architecture.clone()), vec![stub]);
                }
            }
        }

        let invocations = match resolve_link_phase(
            &environment,
            &build_environment,
            &target.name,
            &FrameworksPhase::default(),
            &sources,
        ) {
            Ok(invocations) => invocations,
            Err(e) => {
                eprintln!("{}: {e}", "error".red().bold());
                Vec::new()
            }
        };

        target_inputs.push(TargetInput {
            id: ids[&target.name],
            name: target.name.clone(),
            environment: Some(environment),
            invocations,
            target_temp_dir: target.target_temp_dir.clone(),
        });
    }

    let options = EmitOptions {
        action: manifest.action.clone(),
        workspace_or_project: manifest.workspace_or_project.clone(),
        scheme_name: manifest.scheme.clone(),
        configuration: manifest.configuration.clone(),
        objroot: manifest.objroot.clone(),
        dry_run: cmd.dry_run,
    };

    let report = emit_build_graph(&target_inputs, &graph, &options, &ColoredFormatter)?;
    println!(
        "{} {}",
        "wrote".green().bold(),
        report.root_graph_path.display()
    );
    Ok(0)
}
