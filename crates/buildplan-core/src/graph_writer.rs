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

//! The Graph Writer (C2): a stateless textual serializer for the build-graph
//! format the Emitter drives. It never touches the filesystem and never
//! interprets the strings it's handed — same call sequence always yields
//! byte-identical output.

use md5::{Digest, Md5};
use std::fmt::Write as _;

/// One `build OUT1 OUT2 …: RULE IN1 IN2 | ID1 ID2 || OD1 OD2` edge plus its
/// indented per-edge bindings, in the order they should appear.
#[derive(Debug, Clone, Default)]
pub struct BuildEdge {
    pub outputs: Vec<String>,
    pub rule: String,
    pub inputs: Vec<String>,
    pub input_dependencies: Vec<String>,
    pub order_dependencies: Vec<String>,
    pub bindings: Vec<(String, String)>,
}

impl BuildEdge {
    pub fn phony(output: impl Into<String>) -> Self {
        Self {
            outputs: vec![output.into()],
            rule: "phony".to_string(),
            ..Default::default()
        }
    }
}

/// Accumulates build-graph text for one graph file (the root graph, or a
/// single target's sub-graph). Appends only; nothing is ever rewritten.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: String,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&mut self, text: &str) {
        let _ = writeln!(self.buf, "# {text}");
    }

    pub fn newline(&mut self) {
        self.buf.push('\n');
    }

    pub fn binding(&mut self, name: &str, value: &str) {
        let _ = writeln!(self.buf, "{name} = {value}");
    }

    pub fn rule(&mut self, name: &str, command: &str) {
        let _ = writeln!(self.buf, "rule {name}");
        let _ = writeln!(self.buf, "  command = {command}");
    }

    pub fn subninja(&mut self, path: &str) {
        let _ = writeln!(self.buf, "subninja {path}");
    }

    pub fn build_edge(&mut self, edge: &BuildEdge) {
        let mut line = format!("build {}: {}", edge.outputs.join(" "), edge.rule);
        for i in &edge.inputs {
            line.push(' ');
            line.push_str(i);
        }
        if !edge.input_dependencies.is_empty() {
            line.push_str(" |");
            for d in &edge.input_dependencies {
                line.push(' ');
                line.push_str(d);
            }
        }
        if !edge.order_dependencies.is_empty() {
            line.push_str(" ||");
            for d in &edge.order_dependencies {
                line.push(' ');
                line.push_str(d);
            }
        }
        let _ = writeln!(self.buf, "{line}");
        for (name, value) in &edge.bindings {
            let _ = writeln!(self.buf, "  {name} = {value}");
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

/// Stably derives a synthetic fake-output path from a phony output name, so
/// the executor's one-producer-per-path rule is satisfied even when the
/// same declared name appears more than once across the build.
pub fn synthetic_phony_output(name: &str) -> String {
    let digest = Md5::digest(name.as_bytes());
    let mut hex = String::with_capacity(32);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    format!(".ninja-phony-output-{hex}")
}
