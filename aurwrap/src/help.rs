/*
 * aurwrap
 *
 * Copyright (C) 2023-2024 Xavier Moffett <sapphirus@azorium.net>
 * SPDX-License-Identifier: GPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use aurwrap_core::{
    constants::{BOLD, RESET},
    utils::Arguments,
    Result,
};

pub fn help(_: &mut Arguments) -> Result<()> {
    println!(
        "{bold}NAME{reset}
	aurwrap - build and install AUR packages through pacman

{bold}USAGE{reset}
	aurwrap [{bold}OPERATION{reset}] [{bold}ARGUMENTS{reset}] [{bold}TARGETS{reset}]

{bold}OPERATIONS{reset}
	{bold}-S, --sync{reset}
		Synchronize the specified targets, resolving and reviewing
		recipes from the configured recipe service.

	{bold}-V, --version{reset}
		Send version and copyright information to STDOUT.

	{bold}-h, --help{reset}
		Send this help information to STDOUT.

{bold}SYNCHRONIZATION{reset}
	{bold}-r, --repo{reset}
		Skip recipe lookup and delegate all targets to the binary
		repositories verbatim.

	{bold}--noconfirm{reset}
		Elide interactive prompts; recipes are waved through without
		review and optional dependencies are not installed.

{bold}ENVIRONMENT{reset}
	{bold}AURWRAP_CACHE_DIR{reset}
		Overrides the checkout cache location, by default
		'$HOME/.cache/aurwrap'.

	{bold}AURWRAP_CONFIG_DIR{reset}
		Overrides the configuration location, by default
		'$HOME/.config/aurwrap'.

	{bold}AURWRAP_DATA_DIR{reset}
		Overrides the log location, by default
		'$HOME/.local/share/aurwrap'.

	{bold}EDITOR{reset}
		Editor invoked for recipe edits during review, falling
		back on vi.",
        bold = *BOLD,
        reset = *RESET
    );
    Ok(())
}

fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let release = env!("AURWRAP_BUILD");
    let head = env!("AURWRAP_BUILDHEAD");
    let date = env!("AURWRAP_BUILDSTAMP");

    match head.is_empty() {
        true => format!("{version} ({date})"),
        false => format!("{version}-{head}-{release} ({date})"),
    }
}

pub fn print_version(_: &mut Arguments) -> Result<()> {
    println!(
        "aurwrap v{}
Copyright (C) 2023-2024 Xavier Moffett

Website: https://github.com/sapphirus/aurwrap

This program may be freely redistributed under the
terms of the GNU General Public License v3 only.",
        version_string()
    );
    Ok(())
}
