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
    constants::{BAR_GREEN, BOLD, DIM, RESET},
    err,
    log::Level,
    sync::{
        filter::{self, SelectionMode},
        resolver::{DependencyClass, Resolver},
        transaction::{InstallState, Installer, Stage},
        unit::BuildUnit,
        SyncError,
    },
    utils::{
        print_warning,
        prompt::{prompt, prompt_line},
    },
    Error,
    Result,
};

/// Resolves the unsatisfied dependency closure of a unit and acquires it
/// dependency-first. Required and build-time selections are opt-out, the
/// optional selection is opt-in.
pub struct Depends {
    attended: bool,
}

impl Stage for Depends {
    fn new(_: InstallState, ins: &Installer) -> Box<Self> {
        Box::new(Self { attended: ins.attended() })
    }

    fn engage(&self, ins: &mut Installer, unit: &BuildUnit) -> Result<InstallState> {
        let resolution = Resolver::new(ins.runtime(), ins.visited()).resolve(unit, self.attended)?;

        if resolution.is_empty() {
            return Ok(InstallState::Trust);
        }

        let (required, build, optional) = resolution.into_parts();
        let resolved: Vec<String> = [&required, &build, &optional].into_iter().flatten().map(|unit| unit.name().to_owned()).collect();
        let required = self.narrow(required, DependencyClass::Required)?;
        let build = self.narrow(build, DependencyClass::Build)?;
        let optional = self.opt_in(optional)?;

        for name in resolved {
            let kept = [&required, &build, &optional].into_iter().flatten().any(|unit| unit.name() == name);

            if !kept {
                ins.visited().release(&name);
            }
        }

        if self.attended && !build.is_empty() && prompt("::", "Remove build-time dependencies after installation?", false)? {
            ins.defer_removal(&build.iter().map(|unit| unit.name().to_owned()).collect::<Vec<_>>());
        }

        self.acquire(ins, unit, required)?;
        self.acquire(ins, unit, build)?;
        self.acquire(ins, unit, optional)?;
        Ok(InstallState::Trust)
    }
}

impl Depends {
    fn narrow(&self, units: Vec<BuildUnit>, class: DependencyClass) -> Result<Vec<BuildUnit>> {
        if units.is_empty() || !self.attended {
            return Ok(units);
        }

        present(&units, class);

        let line = prompt_line("::", format!("{class} dependencies to skip? (eg: 1 2 3, 1-3 or ^4)"))?;
        let marked = filter::parse(&line, units.len());

        Ok(filter::retain(units, &marked, SelectionMode::Skip))
    }

    fn opt_in(&self, units: Vec<BuildUnit>) -> Result<Vec<BuildUnit>> {
        if units.is_empty() || !self.attended {
            return Ok(Vec::new());
        }

        present(&units, DependencyClass::Optional);

        let line = prompt_line("::", "Optional dependencies to install? (eg: 1 2 3, 1-3 or ^4)")?;
        let marked = filter::parse(&line, units.len());

        Ok(filter::retain(units, &marked, SelectionMode::Install))
    }

    fn acquire(&self, ins: &mut Installer, parent: &BuildUnit, units: Vec<BuildUnit>) -> Result<()> {
        if units.is_empty() {
            return Ok(());
        }

        let repo: Vec<String> = units.iter().filter(|unit| unit.is_binary()).map(|unit| unit.name().to_owned()).collect();

        if !repo.is_empty() {
            if let Err(error) = ins.runtime().dispatcher().install(&repo, true) {
                err!(SyncError::DependencyError(parent.name().into(), error.to_string()))?
            }
        }

        let mut marked = Vec::new();

        for unit in units.iter().filter(|unit| !unit.is_binary()) {
            if let Err(error) = ins.install(unit, true) {
                err!(SyncError::DependencyError(parent.name().into(), error.to_string()))?
            }

            marked.push(unit.name().to_owned());
        }

        // Tagging is advisory; the packages are installed by this point.
        if !marked.is_empty() {
            if let Err(error) = ins.runtime().dispatcher().mark_dependent(&marked) {
                print_warning(format!("Failed to mark dependencies of {}: {error}", parent.name()));
                ins.logger().log(Level::Warn, &format!("Failed to mark dependencies of {}: {error}", parent.name())).ok();
            }
        }

        Ok(())
    }
}

fn present(units: &[BuildUnit], class: DependencyClass) {
    let len = units.len();

    println!("{} {}{class} dependencies{} ({len})", *BAR_GREEN, *BOLD, *RESET);

    for (index, unit) in units.iter().enumerate() {
        match unit.is_binary() {
            true => println!("{:>4} {}", len - index, unit.name()),
            false => println!("{:>4} {} {}{}{}", len - index, unit.name(), *DIM, unit.version(), *RESET),
        }
    }
}
