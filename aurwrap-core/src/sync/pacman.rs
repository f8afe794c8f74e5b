/*
 * aurwrap-core
 *
 * Copyright (C) 2023-2024 Xavier Moffett <sapphirus@azorium.net>
 * SPDX-License-Identifier: GPL-3.0-only
 *
 * This library is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, version 3.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use crate::{
    exec::{execute, status_output},
    Result,
};

/// Queries against the local package database.
pub trait LocalStore: Send + Sync {
    fn installed(&self, name: &str) -> Result<bool>;
    fn installed_version(&self, name: &str) -> Result<Option<String>>;
}

/// Mutations delegated to the binary package manager.
pub trait Dispatcher: Send + Sync {
    fn install(&self, names: &[String], as_dependency: bool) -> Result<()>;
    fn mark_dependent(&self, names: &[String]) -> Result<()>;
    fn remove(&self, names: &[String]) -> Result<()>;
}

pub struct Pacman {
    manager: String,
    elevator: String,
}

impl Pacman {
    pub fn new(manager: &str, elevator: &str) -> Self {
        Self {
            manager: manager.into(),
            elevator: elevator.into(),
        }
    }

    fn elevated(&self, args: &[&str]) -> Result<()> {
        let mut arguments = vec![self.manager.as_str()];

        arguments.extend(args);
        execute(&self.elevator, &arguments)
    }
}

impl LocalStore for Pacman {
    fn installed(&self, name: &str) -> Result<bool> {
        // -T satisfies against provides entries as well as plain names.
        let (satisfied, _) = status_output(&self.manager, &["-T", name])?;

        Ok(satisfied)
    }

    fn installed_version(&self, name: &str) -> Result<Option<String>> {
        let (installed, output) = status_output(&self.manager, &["-Q", name])?;

        match installed {
            true => Ok(output.split_whitespace().nth(1).map(|version| version.into())),
            false => Ok(None),
        }
    }
}

impl Dispatcher for Pacman {
    /// Installation batches are pre-confirmed by our own prompts, so the
    /// manager runs non-interactively.
    fn install(&self, names: &[String], as_dependency: bool) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }

        let mut args = vec!["-S", "--noconfirm"];

        if as_dependency {
            args.push("--asdeps");
        }

        args.extend(names.iter().map(|name| name.as_str()));
        self.elevated(&args)
    }

    fn mark_dependent(&self, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }

        let mut args = vec!["-D", "--asdeps"];

        args.extend(names.iter().map(|name| name.as_str()));
        self.elevated(&args)
    }

    fn remove(&self, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }

        let mut args = vec!["-R", "--noconfirm"];

        args.extend(names.iter().map(|name| name.as_str()));
        self.elevated(&args)
    }
}
