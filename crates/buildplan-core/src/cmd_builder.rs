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

//! A small fluent accumulator for an invocation's argument list. Unlike a
//! shell-command builder that joins everything into one string early,
//! `CommandBuilder` keeps arguments as a `Vec<String>` until the very end —
//! escaping each argument is the Shell Escaper's job (C5), not this one's.

#[derive(Debug, Default, Clone)]
pub struct CommandBuilder {
    args: Vec<String>,
}

impl CommandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, a: impl Into<String>) -> Self {
        self.args.push(a.into());
        self
    }

    pub fn args<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn arg_with_cond(self, cond: bool, a: impl Into<String>) -> Self {
        if cond {
            self.arg(a)
        } else {
            self
        }
    }

    pub fn args_with_cond<I, S>(self, cond: bool, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if cond {
            self.args(items)
        } else {
            self
        }
    }

    /// Pushes `prefix` immediately followed by `value` as two separate
    /// arguments, e.g. `-framework Foo`, for each item.
    pub fn args_with_prefix_separator<I, S>(mut self, prefix: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in items {
            self.args.push(prefix.to_string());
            self.args.push(item.into());
        }
        self
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }
}
