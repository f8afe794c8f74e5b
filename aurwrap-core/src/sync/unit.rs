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

use crate::sync::client::Recipe;

/// A package queued for acquisition, either built from a recipe checkout
/// or delegated to the binary repositories.
#[derive(Debug, Clone)]
pub struct BuildUnit {
    name: String,
    version: String,
    source_dir: String,
    cache_root: String,
    requires: Vec<String>,
    build_requires: Vec<String>,
    optional: Vec<String>,
    update: bool,
    binary: bool,
}

impl BuildUnit {
    pub fn from_recipe(recipe: Recipe, source_dir: String, cache_root: String, update: bool) -> Self {
        Self {
            name: recipe.base,
            version: recipe.version,
            source_dir,
            cache_root,
            requires: recipe.requires,
            build_requires: recipe.build_requires,
            optional: recipe.optional,
            update,
            binary: false,
        }
    }

    pub fn from_repo(name: &str) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            source_dir: String::new(),
            cache_root: String::new(),
            requires: Vec::new(),
            build_requires: Vec::new(),
            optional: Vec::new(),
            update: false,
            binary: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn source_dir(&self) -> &str {
        &self.source_dir
    }

    pub fn cache_root(&self) -> &str {
        &self.cache_root
    }

    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    pub fn build_requires(&self) -> &[String] {
        &self.build_requires
    }

    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    pub fn is_update(&self) -> bool {
        self.update
    }

    pub fn is_binary(&self) -> bool {
        self.binary
    }
}

/// Extract the bare package name from a dependency specifier. Version
/// comparators and optional-dependency descriptions are discarded;
/// dependency matching is by name alone.
pub fn depname(spec: &str) -> &str {
    match spec.find(|c| c == '<' || c == '>' || c == '=' || c == ':') {
        Some(delimiter) => &spec[.. delimiter],
        None => spec,
    }
}
