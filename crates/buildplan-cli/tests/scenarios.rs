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

//! End-to-end scenarios exercising the link phase resolver and graph emitter
//! together, the way a real workspace's build would drive them.

use std::path::PathBuf;

use buildplan_core::link_resolver::{resolve_link_phase, FrameworksPhase, SourcesPhaseOutput};
use buildplan_core::model::TargetGraph;
use buildplan_core::{emit_build_graph, EmitOptions, TargetInput};
use buildplan_util::env::{tool_ids, Sdk, SettingLayer, StaticBuildEnvironment, TargetEnvironment, ToolSpec};
use buildplan_util::format::PlainFormatter;
use buildplan_util::invocation::Invocation;

fn write_stub_tool(dir: &std::path::Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"#!/bin/sh\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}

fn build_environment(tool_dir: &std::path::Path) -> StaticBuildEnvironment {
    StaticBuildEnvironment::new()
        .with_tool(ToolSpec {
            identifier: tool_ids::LD.to_string(),
            executable_name: "ld".to_string(),
            search_paths: vec![tool_dir.to_path_buf()],
        })
        .with_tool(ToolSpec {
            identifier: tool_ids::LIBTOOL.to_string(),
            executable_name: "libtool".to_string(),
            search_paths: vec![tool_dir.to_path_buf()],
        })
        .with_tool(ToolSpec {
            identifier: tool_ids::LIPO.to_string(),
            executable_name: "lipo".to_string(),
            search_paths: vec![tool_dir.to_path_buf()],
        })
        .with_tool(ToolSpec {
            identifier: tool_ids::DSYMUTIL.to_string(),
            executable_name: "dsymutil".to_string(),
            search_paths: vec![tool_dir.to_path_buf()],
        })
}

fn sdk(tool_dir: &std::path::Path) -> Sdk {
    Sdk {
        platform_name: "macosx".to_string(),
        search_paths: vec![tool_dir.to_path_buf()],
    }
}

fn source_stub(outputs: Vec<PathBuf>) -> Invocation {
    Invocation::builder().outputs(outputs).build().unwrap()
}

#[test]
fn static_library_single_arch() {
    let temp = tempfile::tempdir().unwrap();
    let tool_dir = temp.path().join("tools");
    std::fs::create_dir_all(&tool_dir).unwrap();
    write_stub_tool(&tool_dir, "libtool");

    let env = TargetEnvironment::new("Foo", ["normal"], "x86_64", sdk(&tool_dir)).with_layer(
        SettingLayer::new("target")
            .with("MACH_O_TYPE", "staticlib")
            .with("EXECUTABLE_NAME", "Foo")
            .with("EXECUTABLE_PATH", "libFoo.a")
            .with("BUILT_PRODUCTS_DIR", temp.path().join("products").to_string_lossy()),
    );
    let mut sources = SourcesPhaseOutput::default();
    sources.variant_architecture_invocations.insert(
        ("normal".to_string(), "x86_64".to_string()),
        vec![source_stub(vec![PathBuf::from("a.o"), PathBuf::from("b.o")])],
    );

    let invocations = resolve_link_phase(
        &env,
        &build_environment(&tool_dir),
        "Foo",
        &FrameworksPhase::default(),
        &sources,
    )
    .unwrap();

    assert_eq!(invocations.len(), 1);
    assert!(invocations[0].executable.ends_with("libtool"));
    assert_eq!(invocations[0].inputs, vec![PathBuf::from("a.o"), PathBuf::from("b.o")]);
    assert_eq!(
        invocations[0].outputs,
        vec![temp.path().join("products").join("libFoo.a")]
    );
}

#[test]
fn fat_binary_two_archs_with_dsym() {
    let temp = tempfile::tempdir().unwrap();
    let tool_dir = temp.path().join("tools");
    std::fs::create_dir_all(&tool_dir).unwrap();
    write_stub_tool(&tool_dir, "ld");
    write_stub_tool(&tool_dir, "lipo");
    write_stub_tool(&tool_dir, "dsymutil");

    let products_dir = temp.path().join("products");
    let env = TargetEnvironment::new("App", ["normal"], "arm64 x86_64", sdk(&tool_dir)).with_layer(
        SettingLayer::new("target")
            .with("MACH_O_TYPE", "mh_execute")
            .with("EXECUTABLE_NAME", "App")
            .with("EXECUTABLE_PATH", "App")
            .with("BUILT_PRODUCTS_DIR", products_dir.to_string_lossy())
            .with("DEBUG_INFORMATION_FORMAT", "dwarf-with-dsym")
            .with("DWARF_DSYM_FOLDER_PATH", products_dir.join("App.dSYM").to_string_lossy())
            .with("DWARF_DSYM_FILE_NAME", "Contents/Resources/DWARF/App"),
    );
    let mut sources = SourcesPhaseOutput::default();
    sources.variant_architecture_invocations.insert(
        ("normal".to_string(), "arm64".to_string()),
        vec![source_stub(vec![PathBuf::from("a-arm64.o")])],
    );
    sources.variant_architecture_invocations.insert(
        ("normal".to_string(), "x86_64".to_string()),
        vec![source_stub(vec![PathBuf::from("a-x86_64.o")])],
    );

    let invocations = resolve_link_phase(
        &env,
        &build_environment(&tool_dir),
        "App",
        &FrameworksPhase::default(),
        &sources,
    )
    .unwrap();

    // Two ld invocations, one lipo, one dsymutil.
    assert_eq!(invocations.len(), 4);
    assert!(invocations[0].executable.ends_with("ld"));
    assert!(invocations[1].executable.ends_with("ld"));
    assert!(invocations[2].executable.ends_with("lipo"));
    assert!(invocations[3].executable.ends_with("dsymutil"));
    assert_eq!(
        invocations[3].outputs,
        vec![products_dir.join("App.dSYM/Contents/Resources/DWARF/App")]
    );
}

#[test]
fn dependent_targets_wire_begin_finish_chain_through_emitter() {
    let temp = tempfile::tempdir().unwrap();
    let tool_dir = temp.path().join("tools");
    std::fs::create_dir_all(&tool_dir).unwrap();
    write_stub_tool(&tool_dir, "ld");

    let a_out = temp.path().join("A.out");
    let b_out = temp.path().join("B.out");

    let target_a = TargetInput {
        id: 1,
        name: "A".to_string(),
        environment: Some(TargetEnvironment::new("A", ["normal"], "x86_64", sdk(&tool_dir))),
        invocations: vec![Invocation::builder()
            .executable("ld")
            .outputs(vec![a_out.clone()])
            .working_directory(temp.path())
            .build()
            .unwrap()],
        target_temp_dir: temp.path().join("A-temp"),
    };
    let target_b = TargetInput {
        id: 2,
        name: "B".to_string(),
        environment: Some(TargetEnvironment::new("B", ["normal"], "x86_64", sdk(&tool_dir))),
        invocations: vec![Invocation::builder()
            .executable("ld")
            .outputs(vec![b_out.clone()])
            .working_directory(temp.path())
            .build()
            .unwrap()],
        target_temp_dir: temp.path().join("B-temp"),
    };

    let mut graph = TargetGraph::new();
    graph.add_target(1);
    graph.add_target(2);
    graph.add_dependency(2, 1); // B depends on A

    let options = EmitOptions {
        action: "build".to_string(),
        workspace_or_project: "Demo.xcodeproj".to_string(),
        scheme_name: Some("Demo".to_string()),
        configuration: "Debug".to_string(),
        objroot: temp.path().join("obj"),
        dry_run: false,
    };

    let report = emit_build_graph(&[target_a, target_b], &graph, &options, &PlainFormatter).unwrap();
    let root_text = std::fs::read_to_string(&report.root_graph_path).unwrap();

    assert!(root_text.contains("build begin-target-A: phony\n"));
    assert!(root_text.contains("build begin-target-B: phony finish-target-A"));
    assert!(root_text.contains("finish-target-A"));
    assert!(root_text.contains("finish-target-B"));
}

#[test]
fn shared_output_directory_deduplicates_mkdir_edge() {
    let temp = tempfile::tempdir().unwrap();
    let tool_dir = temp.path().join("tools");
    std::fs::create_dir_all(&tool_dir).unwrap();
    write_stub_tool(&tool_dir, "ld");

    let shared = temp.path().join("shared");
    let target_a = TargetInput {
        id: 1,
        name: "A".to_string(),
        environment: Some(TargetEnvironment::new("A", ["normal"], "x86_64", sdk(&tool_dir))),
        invocations: vec![Invocation::builder()
            .executable("ld")
            .outputs(vec![shared.join("a.out")])
            .working_directory(temp.path())
            .build()
            .unwrap()],
        target_temp_dir: temp.path().join("A-temp"),
    };
    let target_b = TargetInput {
        id: 2,
        name: "B".to_string(),
        environment: Some(TargetEnvironment::new("B", ["normal"], "x86_64", sdk(&tool_dir))),
        invocations: vec![Invocation::builder()
            .executable("ld")
            .outputs(vec![shared.join("b.out")])
            .working_directory(temp.path())
            .build()
            .unwrap()],
        target_temp_dir: temp.path().join("B-temp"),
    };
    let mut graph = TargetGraph::new();
    graph.add_target(1);
    graph.add_target(2);

    let options = EmitOptions {
        action: "build".to_string(),
        workspace_or_project: "Demo.xcodeproj".to_string(),
        scheme_name: None,
        configuration: "Debug".to_string(),
        objroot: temp.path().join("obj"),
        dry_run: false,
    };
    let report = emit_build_graph(&[target_a, target_b], &graph, &options, &PlainFormatter).unwrap();
    let root_text = std::fs::read_to_string(&report.root_graph_path).unwrap();
    let mkdir_edges = root_text
        .matches(&format!("mkdir -p {}", shared.display()))
        .count();
    assert_eq!(mkdir_edges, 1);
}

#[test]
fn phony_output_collision_within_a_target_is_preserved_not_hidden() {
    let temp = tempfile::tempdir().unwrap();
    let tool_dir = temp.path().join("tools");
    std::fs::create_dir_all(&tool_dir).unwrap();
    write_stub_tool(&tool_dir, "ld");

    let target = TargetInput {
        id: 1,
        name: "Dup".to_string(),
        environment: Some(TargetEnvironment::new("Dup", ["normal"], "x86_64", sdk(&tool_dir))),
        invocations: vec![
            Invocation::builder()
                .executable("ld")
                .outputs(vec![temp.path().join("one.out")])
                .phony_outputs(vec!["X".to_string()])
                .working_directory(temp.path())
                .build()
                .unwrap(),
            Invocation::builder()
                .executable("ld")
                .outputs(vec![temp.path().join("two.out")])
                .phony_outputs(vec!["X".to_string()])
                .working_directory(temp.path())
                .build()
                .unwrap(),
        ],
        target_temp_dir: temp.path().join("Dup-temp"),
    };
    let mut graph = TargetGraph::new();
    graph.add_target(1);
    let options = EmitOptions {
        action: "build".to_string(),
        workspace_or_project: "Demo.xcodeproj".to_string(),
        scheme_name: None,
        configuration: "Debug".to_string(),
        objroot: temp.path().join("obj"),
        dry_run: false,
    };
    let report = emit_build_graph(&[target], &graph, &options, &PlainFormatter).unwrap();
    let sub_path = &report.per_target_graph_paths[0].1;
    let sub_text = std::fs::read_to_string(sub_path).unwrap();
    let synthetic = buildplan_core::graph_writer::synthetic_phony_output("X");
    // Both edges declare the same synthetic output: a known, preserved limitation.
    assert_eq!(sub_text.matches(&synthetic).count(), 2);
}

#[test]
fn shell_escape_corner_cases() {
    assert_eq!(buildplan_util::shell::escape("hello"), "hello");
    assert_eq!(buildplan_util::shell::escape("hello world"), "'hello world'");
    assert_eq!(buildplan_util::shell::escape("it's"), "'it'\"'\"'s'");
    assert_eq!(buildplan_util::shell::escape("/usr/bin/ld"), "/usr/bin/ld");
}
