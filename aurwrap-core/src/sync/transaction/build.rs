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
    constants::{BAR_CYAN, BOLD, RESET},
    err,
    exec::execute_in,
    log::Level,
    sync::{
        transaction::{InstallState, Installer, Stage},
        unit::BuildUnit,
        SyncError,
    },
    Error,
    Result,
};

/// Hands the checkout to the build tool, which syncs remaining requirements,
/// builds and installs the package in one invocation.
pub struct Build;

impl Stage for Build {
    fn new(_: InstallState, _: &Installer) -> Box<Self> {
        Box::new(Self)
    }

    fn engage(&self, ins: &mut Installer, unit: &BuildUnit) -> Result<InstallState> {
        println!("{} {}Building {}{}...", *BAR_CYAN, *BOLD, unit.name(), *RESET);

        let tool = ins.runtime().config().tools().build().to_owned();

        if let Err(error) = execute_in(unit.source_dir(), &tool, &["-sic", "--noconfirm"]) {
            err!(SyncError::BuildError(unit.name().into(), error.to_string()))?
        }

        ins.logger().log(Level::Info, &format!("Built {} {}", unit.name(), unit.version())).ok();
        Ok(InstallState::Complete)
    }
}
