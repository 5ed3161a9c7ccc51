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

//! Pluggable status-line formatting for diagnostics emitted while resolving
//! link phases and writing the build graph (supplemented: §4.6).

use colored::Colorize;

/// Renders a short status line describing progress on a single target.
/// Implementations back the CLI's colored terminal output and, in tests or
/// non-tty contexts, a plain uncolored rendering.
pub trait Formatter {
    fn target_begun(&self, target: &str) -> String;
    fn target_finished(&self, target: &str, invocation_count: usize) -> String;
    fn target_failed(&self, target: &str, reason: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn target_begun(&self, target: &str) -> String {
        format!("-> {target}")
    }

    fn target_finished(&self, target: &str, invocation_count: usize) -> String {
        format!("== {target} ({invocation_count} invocations)")
    }

    fn target_failed(&self, target: &str, reason: &str) -> String {
        format!("xx {target}: {reason}")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColoredFormatter;

impl Formatter for ColoredFormatter {
    fn target_begun(&self, target: &str) -> String {
        format!("{} {}", "->".blue().bold(), target)
    }

    fn target_finished(&self, target: &str, invocation_count: usize) -> String {
        format!(
            "{} {} {}",
            "==".green().bold(),
            target,
            format!("({invocation_count} invocations)").dimmed()
        )
    }

    fn target_failed(&self, target: &str, reason: &str) -> String {
        format!("{} {}: {}", "xx".red().bold(), target, reason.red())
    }
}
