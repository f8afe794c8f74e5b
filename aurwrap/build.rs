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

use std::{env::var, process::Command};

fn head() -> String {
    match Command::new("git").args(["rev-parse", "--short", "HEAD"]).output() {
        Ok(output) => String::from_utf8(output.stdout).map(|head| head.trim().to_string()).unwrap_or("N/A".into()),
        Err(_) => "N/A".into(),
    }
}

fn time(debug: bool) -> String {
    match debug {
        false => match Command::new("git").args(["log", "-1", "--date=format:%d/%m/%Y", "--format=%ad"]).output() {
            Ok(output) => String::from_utf8(output.stdout).map(|date| date.trim().to_string()).unwrap_or("N/A".into()),
            Err(_) => "N/A".into(),
        },
        true => match Command::new("date").args(["+%d/%m/%Y %T"]).output() {
            Ok(output) => String::from_utf8(output.stdout).map(|date| date.trim().to_string()).unwrap_or("N/A".into()),
            Err(_) => "N/A".into(),
        },
    }
}

fn release(debug: bool) -> &'static str {
    match debug {
        true => "DEV",
        false => "RELEASE",
    }
}

fn is_debug() -> bool {
    var("DEBUG").unwrap().parse().unwrap()
}

fn main() {
    if !cfg!(target_os = "linux") || !cfg!(target_family = "unix") {
        panic!("Unsupported build target. Please refer to the build documentation for further information.")
    }

    let debug: bool = is_debug();

    println!("cargo:rustc-env=AURWRAP_BUILD={}", release(debug));
    println!("cargo:rustc-env=AURWRAP_BUILDHEAD={}", head());
    println!("cargo:rustc-env=AURWRAP_BUILDSTAMP={}", time(debug));
}
