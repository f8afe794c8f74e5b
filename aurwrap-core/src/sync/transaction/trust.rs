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
    constants::{ARROW_CYAN, BOLD, RESET},
    err,
    exec::{execute, status_output},
    log::Level,
    sync::{
        srcinfo::Srcinfo,
        transaction::{InstallState, Installer, Stage},
        unit::BuildUnit,
        SyncError,
    },
    utils::{print_warning, prompt::prompt},
    Error,
    Result,
};

/// Imports the signing keys a recipe declares into the verification keyring.
/// A failed import is tolerated; declining one is not.
pub struct Trust {
    attended: bool,
}

impl Stage for Trust {
    fn new(_: InstallState, ins: &Installer) -> Box<Self> {
        Box::new(Self { attended: ins.attended() })
    }

    fn engage(&self, ins: &mut Installer, unit: &BuildUnit) -> Result<InstallState> {
        let srcinfo = Srcinfo::parse(unit.source_dir())?;
        let keyring = ins.runtime().config().tools().keyring().to_owned();

        for key in srcinfo.keys() {
            let (present, _) = status_output(&keyring, &["--list-keys", key])?;

            if present {
                continue;
            }

            if self.attended && !prompt("::", format!("Import signing key {}{key}{}?", *BOLD, *RESET), true)? {
                err!(SyncError::TrustError(key.into()))?
            }

            println!("{} Importing signing key {}{key}{}...", *ARROW_CYAN, *BOLD, *RESET);

            match execute(&keyring, &["--recv-keys", key]) {
                Ok(_) => ins.logger().log(Level::Info, &format!("Imported signing key {key}")).ok(),
                Err(error) => {
                    print_warning(format!("Import of signing key {key} failed: {error}"));
                    ins.logger().log(Level::Warn, &format!("Import of signing key {key} failed: {error}")).ok()
                }
            };
        }

        Ok(InstallState::Conflicts)
    }
}
