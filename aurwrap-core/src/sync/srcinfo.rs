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

use crate::{constants::RECIPE_METADATA, ErrorGeneric, Result};

/// Trust material declared by the metadata sidecar of a recipe checkout.
#[derive(Debug, Clone, Default)]
pub struct Srcinfo {
    base: String,
    keys: Vec<String>,
    conflicts: Vec<String>,
}

impl Srcinfo {
    /// Read the sidecar within a checkout. Absence of the sidecar is an error;
    /// unrecognised lines within it are not.
    pub fn parse(dir: &str) -> Result<Self> {
        let path = format!("{}/{}", dir, RECIPE_METADATA);
        let contents = read_to_string(&path).prepend_io(|| path.clone())?;

        Ok(Self::read(&contents))
    }

    fn read(contents: &str) -> Self {
        let mut srcinfo = Self::default();

        for line in contents.lines() {
            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => continue,
            };

            if value.is_empty() {
                continue;
            }

            match key {
                "pkgbase" => srcinfo.base = value.into(),
                "validpgpkeys" => srcinfo.keys.push(value.into()),
                "conflicts" => srcinfo.conflicts.push(value.into()),
                _ => continue,
            }
        }

        srcinfo
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }
}
