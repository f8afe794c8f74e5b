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

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::{BOLD, RESET};

pub use error::*;

pub mod config;
pub mod constants;
pub mod error;
pub mod exec;
pub mod log;
pub mod sync;
pub mod utils;

#[derive(Debug)]
pub enum ErrorKind {
    ElevatedPrivileges,
    ProcessInitFailure(String, std::io::ErrorKind),
    ProcessWaitFailure(String, std::io::ErrorKind),
    IOError(String, std::io::ErrorKind),
}

impl Display for ErrorKind {
    fn fmt(&self, fmter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::ElevatedPrivileges => write!(fmter, "Execution with elevated privileges is not supported."),
            Self::ProcessInitFailure(exec, err) => write!(fmter, "Unable to initialize '{}{exec}{}': {err}", *BOLD, *RESET),
            Self::ProcessWaitFailure(exec, err) => write!(fmter, "Unable to wait on '{}{exec}{}': {err}", *BOLD, *RESET),
            Self::IOError(path, err) => write!(fmter, "'{}{path}{}': {err}", *BOLD, *RESET),
        }
    }
}

impl ErrorTrait for ErrorKind {
    fn code(&self) -> i32 {
        match self {
            Self::IOError(..) => 2,
            _ => 1,
        }
    }
}
