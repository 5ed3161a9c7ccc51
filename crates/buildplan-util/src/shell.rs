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

//! Shell argument escaper and executable resolver (C5): quoting discipline
//! for the build graph's `cd $dir && $exec` command strings, and lookup of
//! tool executables against per-SDK search paths (spec.md §4.5).

use std::path::{Path, PathBuf};

fn is_unquoted_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "@%_-+=:,./".contains(c)
}

/// Quotes `s` for inclusion in a POSIX shell command line, unless it's
/// already made up entirely of characters that never need quoting.
/// Embedded single quotes become the five-character escape `'"'"'`
/// sandwiched between the surrounding quotes, per spec.md §4.5.
pub fn escape(s: &str) -> String {
    if s.chars().all(is_unquoted_safe) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\"'\"'");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Resolves an invocation's `executable` field to the file that should
/// actually be invoked. `builtin-`-prefixed names resolve to `None`, which
/// the Emitter treats as "skip this invocation" (spec.md §4.5, §7 kind #6).
/// Absolute paths pass through unchanged. Relative names are searched for
/// in `search_paths`, in order, returning the first existing executable
/// file; the core never falls back to the process's own `$PATH`.
pub fn resolve_executable(name: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
    if name.starts_with("builtin-") {
        return None;
    }
    let path = Path::new(name);
    if path.is_absolute() {
        return Some(path.to_path_buf());
    }
    search_paths
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable_file(candidate))
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
