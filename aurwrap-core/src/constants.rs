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

use std::{env::var, process::exit};

use lazy_static::lazy_static;
use nix::unistd::geteuid;

use crate::utils::{is_color_terminal, print_error};

pub const GIT_EXECUTABLE: &str = "git";
pub const GPG_EXECUTABLE: &str = "gpg";
pub const MAKEPKG_EXECUTABLE: &str = "makepkg";
pub const PACMAN_EXECUTABLE: &str = "pacman";
pub const SUDO_EXECUTABLE: &str = "sudo";

pub const RECIPE_SCRIPT: &str = "PKGBUILD";
pub const RECIPE_METADATA: &str = ".SRCINFO";
pub const DEFAULT_RECIPE_SERVICE: &str = "https://aur.archlinux.org";

const AURWRAP_CACHE_DIR: &str = "/.cache/aurwrap";
const AURWRAP_CONFIG_DIR: &str = "/.config/aurwrap";
const AURWRAP_DATA_DIR: &str = "/.local/share/aurwrap";

lazy_static! {
    pub static ref UID: u32 = geteuid().as_raw();
    pub static ref HOME: &'static str = env("HOME");
    pub static ref TERM: &'static str = env_opt("TERM");
    pub static ref EDITOR: &'static str = env_opt("EDITOR");
    pub static ref CACHE_DIR: &'static str = env_default("AURWRAP_CACHE_DIR", AURWRAP_CACHE_DIR);
    pub static ref CONFIG_DIR: &'static str = env_default("AURWRAP_CONFIG_DIR", AURWRAP_CONFIG_DIR);
    pub static ref DATA_DIR: &'static str = env_default("AURWRAP_DATA_DIR", AURWRAP_DATA_DIR);
    pub static ref CONFIG_FILE: &'static str = format!("{}/config.yml", *CONFIG_DIR).leak();
    pub static ref LOG_LOCATION: &'static str = format!("{}/aurwrap.log", *DATA_DIR).leak();
    pub static ref IS_COLOR_TERMINAL: bool = is_color_terminal();
    pub static ref BOLD: &'static str = color("\x1b[1m");
    pub static ref RESET: &'static str = color("\x1b[0m");
    pub static ref DIM: &'static str = color("\x1b[2m");
    pub static ref BOLD_RED: &'static str = color("\x1b[1;31m");
    pub static ref BOLD_GREEN: &'static str = color("\x1b[1;32m");
    pub static ref BOLD_YELLOW: &'static str = color("\x1b[1;33m");
    pub static ref BAR_GREEN: &'static str = bar("\x1b[1;32m");
    pub static ref BAR_CYAN: &'static str = bar("\x1b[1;36m");
    pub static ref BAR_RED: &'static str = bar("\x1b[1;31m");
    pub static ref ARROW_CYAN: &'static str = arrow("\x1b[1;36m");
    pub static ref ARROW_GREEN: &'static str = arrow("\x1b[1;32m");
    pub static ref ARROW_RED: &'static str = arrow("\x1b[1;31m");
}

fn env(env: &str) -> &'static str {
    match var(env) {
        Ok(var) => var.leak(),
        Err(_) => {
            print_error(format!("${}{env}{} is unset.", *BOLD, *RESET));
            exit(2);
        }
    }
}

fn env_opt(env: &str) -> &'static str {
    match var(env) {
        Ok(var) => var.leak(),
        Err(_) => "",
    }
}

fn env_default(env: &str, default: &str) -> &'static str {
    match var(env) {
        Ok(var) => var.leak(),
        Err(_) => format!("{}{}", *HOME, default).leak(),
    }
}

fn color(code: &'static str) -> &'static str {
    match *IS_COLOR_TERMINAL {
        true => code,
        false => "",
    }
}

fn bar(code: &'static str) -> &'static str {
    match *IS_COLOR_TERMINAL {
        true => format!("{code}::\x1b[0m").leak(),
        false => "::",
    }
}

fn arrow(code: &'static str) -> &'static str {
    match *IS_COLOR_TERMINAL {
        true => format!("{code}->\x1b[0m").leak(),
        false => "->",
    }
}
