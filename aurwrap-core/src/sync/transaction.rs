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

use std::mem::take;

use bitflags::bitflags;

use crate::{
    constants::{ARROW_CYAN, ARROW_GREEN, ARROW_RED, BAR_CYAN, BOLD, DIM, RESET},
    log::{Level, Logger},
    sync::{
        resolver::Visited,
        transaction::{build::Build, conflict::Conflict, depends::Depends, review::Review, trust::Trust},
        unit::BuildUnit,
        Runtime,
        SyncError,
    },
    utils::print_warning,
    Result,
};

mod build;
mod conflict;
mod depends;
mod review;
mod trust;

bitflags! {
    #[derive(Debug, Clone, Copy)]
    pub struct SyncFlags: u8 {
        const NONE = 0b00000000;
        const NO_CONFIRM = 0b00000001;
        const PREFER_RECIPE = 0b00000010;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    Review,
    Depends,
    Trust,
    Conflicts,
    Build,
    Complete,
}

impl InstallState {
    fn from(self, ins: &Installer) -> Box<dyn Stage> {
        match self {
            Self::Review => Review::new(self, ins),
            Self::Depends => Depends::new(self, ins),
            Self::Trust => Trust::new(self, ins),
            Self::Conflicts => Conflict::new(self, ins),
            Self::Build => Build::new(self, ins),
            Self::Complete => unreachable!(),
        }
    }
}

pub trait Stage {
    fn new(state: InstallState, ins: &Installer) -> Box<Self>
    where
        Self: Sized;
    fn engage(&self, ins: &mut Installer, unit: &BuildUnit) -> Result<InstallState>;
}

/// Drives a unit through the acquisition states, recursing for recipe
/// dependencies and batching repository dependencies out to the dispatcher.
pub struct Installer<'a> {
    runtime: &'a Runtime,
    logger: &'a mut Logger,
    flags: SyncFlags,
    visited: &'a Visited,
    deferred: Vec<String>,
    dependent: bool,
}

impl<'a> Installer<'a> {
    pub fn new(runtime: &'a Runtime, logger: &'a mut Logger, flags: SyncFlags, visited: &'a Visited) -> Self {
        Self {
            runtime,
            logger,
            flags,
            visited,
            deferred: Vec::new(),
            dependent: false,
        }
    }

    /// Install a single unit. Dependency installations run unprompted and
    /// leave deferred cleanup to the unit which queued it.
    pub fn install(&mut self, unit: &BuildUnit, dependency: bool) -> Result<()> {
        if unit.is_binary() {
            self.runtime.dispatcher().install(&[unit.name().into()], dependency)?;
            self.logger.log(Level::Info, &format!("{} dispatched to the repositories", unit.name())).ok();
            return Ok(());
        }

        let parent = self.dependent;

        self.dependent = dependency;

        let result = self.drive(unit);

        self.dependent = parent;

        if !dependency {
            self.remove_deferred();
        }

        result
    }

    fn drive(&mut self, unit: &BuildUnit) -> Result<()> {
        self.begin_message(unit);

        let mut stage = InstallState::Review.from(self);

        loop {
            match stage.engage(self, unit) {
                Ok(InstallState::Complete) => {
                    println!("{} Installed {}{}{}.", *ARROW_GREEN, *BOLD, unit.name(), *RESET);
                    self.logger.log(Level::Info, &format!("Installed {} {}", unit.name(), unit.version())).ok();
                    return Ok(());
                }
                Ok(state) => stage = state.from(self),
                Err(error) => {
                    return match error.downcast::<SyncError>() {
                        Ok(SyncError::ReviewAborted) => {
                            println!("{} Aborting...", *ARROW_RED);
                            self.logger.log(Level::Warn, &format!("Review of {} aborted", unit.name())).ok();
                            Ok(())
                        }
                        _ => Err(error),
                    }
                }
            }
        }
    }

    fn begin_message(&mut self, unit: &BuildUnit) {
        let version = match unit.is_update() {
            true => match self.runtime.store().installed_version(unit.name()).ok().flatten() {
                Some(installed) => format!("{}{installed}{} -> {}{}{}", *DIM, *RESET, *BOLD, unit.version(), *RESET),
                None => format!("{}{}{}", *BOLD, unit.version(), *RESET),
            },
            false => format!("{}{}{}", *BOLD, unit.version(), *RESET),
        };

        println!("{} {}Preparing{} {} {version}", *BAR_CYAN, *BOLD, *RESET, unit.name());
    }

    fn remove_deferred(&mut self) {
        if self.deferred.is_empty() {
            return;
        }

        let names = take(&mut self.deferred);

        println!("{} Removing build-time dependencies...", *ARROW_CYAN);

        match self.runtime.dispatcher().remove(&names) {
            Ok(_) => self.logger.log(Level::Info, &format!("Removed build-time dependencies: {}", names.join(", "))).ok(),
            Err(error) => {
                print_warning(format!("Removal of build-time dependencies failed: {error}"));
                self.logger.log(Level::Warn, &format!("Removal of build-time dependencies failed: {error}")).ok()
            }
        };
    }

    /// Queue names for removal once the current top-level unit concludes.
    pub fn defer_removal(&mut self, names: &[String]) {
        self.deferred.extend(names.iter().cloned());
    }

    pub fn runtime(&self) -> &Runtime {
        self.runtime
    }

    pub fn logger(&mut self) -> &mut Logger {
        self.logger
    }

    pub fn visited(&self) -> &Visited {
        self.visited
    }

    /// Prompts are elided for pre-confirmed runs and for dependency units.
    pub fn attended(&self) -> bool {
        !self.dependent && !self.flags.contains(SyncFlags::NO_CONFIRM)
    }
}
