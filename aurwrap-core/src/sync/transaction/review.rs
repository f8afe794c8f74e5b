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

use std::fs::read_to_string;

use crate::{
    constants::{BOLD, EDITOR, RECIPE_SCRIPT, RESET},
    err,
    exec::execute_in,
    sync::{
        transaction::{InstallState, Installer, Stage},
        unit::BuildUnit,
        SyncError,
    },
    utils::prompt::prompt_line,
    Error,
    ErrorGeneric,
    Result,
};

/// Recipe inspection gate. Upstream history is merged into the checkout only
/// after the recipe has been waved through, keeping the reviewed tree and the
/// built tree identical.
pub struct Review {
    attended: bool,
}

impl Stage for Review {
    fn new(_: InstallState, ins: &Installer) -> Box<Self> {
        Box::new(Self { attended: ins.attended() })
    }

    fn engage(&self, ins: &mut Installer, unit: &BuildUnit) -> Result<InstallState> {
        if !self.attended {
            return advance(ins, unit);
        }

        let choice = prompt_line(
            "::",
            format!("Review {}{}{}: [V]iew [D]iff [E]dit [I]nstall [A]bort", *BOLD, unit.name(), *RESET),
        )?;

        match choice.trim().to_lowercase().as_str() {
            "v" | "view" => {
                view(unit)?;
                Ok(InstallState::Review)
            }
            "d" | "diff" => {
                ins.runtime().vcs().diff(unit.source_dir(), unit.is_update())?;
                Ok(InstallState::Review)
            }
            "e" | "edit" => {
                edit(unit)?;
                Ok(InstallState::Review)
            }
            "" | "i" | "install" | "y" => advance(ins, unit),
            "a" | "abort" | "n" => err!(SyncError::ReviewAborted),
            _ => Ok(InstallState::Review),
        }
    }
}

fn advance(ins: &mut Installer, unit: &BuildUnit) -> Result<InstallState> {
    if unit.is_update() {
        ins.runtime().vcs().merge_upstream(unit.source_dir())?;
    }

    Ok(InstallState::Depends)
}

fn view(unit: &BuildUnit) -> Result<()> {
    let path = format!("{}/{}", unit.source_dir(), RECIPE_SCRIPT);
    let contents = read_to_string(&path).prepend_io(|| path.clone())?;

    println!("{contents}");
    Ok(())
}

fn edit(unit: &BuildUnit) -> Result<()> {
    let editor = match EDITOR.is_empty() {
        true => "vi",
        false => *EDITOR,
    };

    execute_in(unit.source_dir(), editor, &[RECIPE_SCRIPT])
}
