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

use std::fmt::Display;

use nix::unistd::isatty;

use crate::{
    constants::{BOLD_RED, BOLD_YELLOW, RESET, TERM, UID},
    err,
    Error,
    ErrorKind,
    Result,
};

pub use arguments::Arguments;

pub mod arguments;
pub mod prompt;

pub fn check_root() -> Result<()> {
    match *UID {
        0 => err!(ErrorKind::ElevatedPrivileges),
        _ => Ok(()),
    }
}

pub fn is_color_terminal() -> bool {
    let value = TERM.to_lowercase();
    let is_term = !value.is_empty() && value != "dumb";

    is_term && isatty(0).unwrap_or(false) && isatty(1).unwrap_or(false)
}

pub fn print_warning(message: impl Display) {
    eprintln!("{}warning:{} {}", *BOLD_YELLOW, *RESET, &message);
}

pub fn print_error(message: impl Display) {
    eprintln!("{}error:{} {}", *BOLD_RED, *RESET, &message);
}
