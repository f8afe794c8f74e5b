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
    constants::{BOLD, RESET},
    err,
    log::Level,
    sync::{
        srcinfo::Srcinfo,
        transaction::{InstallState, Installer, Stage},
        unit::{depname, BuildUnit},
        SyncError,
    },
    utils::prompt::prompt,
    Error,
    Result,
};

/// Clears installed packages the recipe declares conflicts against. Updates
/// skip this state; their conflicts were settled on first installation.
pub struct Conflict {
    attended: bool,
}

impl Stage for Conflict {
    fn new(_: InstallState, ins: &Installer) -> Box<Self> {
        Box::new(Self { attended: ins.attended() })
    }

    fn engage(&self, ins: &mut Installer, unit: &BuildUnit) -> Result<InstallState> {
        if unit.is_update() {
            return Ok(InstallState::Build);
        }

        let srcinfo = Srcinfo::parse(unit.source_dir())?;

        for declared in srcinfo.conflicts() {
            let name = depname(declared).trim();

            if name == unit.name() || !ins.runtime().store().installed(name)? {
                continue;
            }

            if !self.attended || !prompt("::", format!("Remove conflicting package {}{name}{}?", *BOLD, *RESET), false)? {
                err!(SyncError::ConflictError(unit.name().into(), name.into()))?
            }

            ins.runtime().dispatcher().remove(&[name.into()])?;
            ins.logger().log(Level::Info, &format!("Removed conflicting package {name}")).ok();
        }

        Ok(InstallState::Build)
    }
}
