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

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::File,
    io::ErrorKind::NotFound,
};

use serde::{Deserialize, Serialize};

use crate::{
    constants::{BOLD, CACHE_DIR, CONFIG_FILE, DEFAULT_RECIPE_SERVICE, GIT_EXECUTABLE, GPG_EXECUTABLE, MAKEPKG_EXECUTABLE, PACMAN_EXECUTABLE, RESET, SUDO_EXECUTABLE},
    err,
    impl_error,
    Error,
    ErrorTrait,
    Result,
};

#[derive(Debug, Clone)]
pub enum ConfigError {
    Load(String, String),
}

impl Display for ConfigError {
    fn fmt(&self, fmter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Load(path, error) => write!(fmter, "Failed to load '{}{path}{}': {error}", *BOLD, *RESET),
        }
    }
}

impl_error!(ConfigError);

/// Immutable snapshot of runtime configuration, populated once at startup.
#[derive(Serialize, Deserialize, Clone)]
pub struct Global {
    #[serde(default = "recipe_service")]
    recipe_service: String,
    #[serde(default = "cache_root")]
    cache_root: String,
    #[serde(default = "network_timeout")]
    network_timeout: u64,
    #[serde(default = "parallelism")]
    parallelism: usize,
    #[serde(default)]
    tools: Tools,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Tools {
    #[serde(default = "vcs")]
    vcs: String,
    #[serde(default = "build")]
    build: String,
    #[serde(default = "keyring")]
    keyring: String,
    #[serde(default = "manager")]
    manager: String,
    #[serde(default = "elevator")]
    elevator: String,
}

impl Global {
    pub fn new() -> Self {
        Self {
            recipe_service: recipe_service(),
            cache_root: cache_root(),
            network_timeout: network_timeout(),
            parallelism: parallelism(),
            tools: Tools::default(),
        }
    }

    pub fn recipe_service(&self) -> &str {
        &self.recipe_service
    }

    pub fn cache_root(&self) -> &str {
        &self.cache_root
    }

    pub fn network_timeout(&self) -> u64 {
        self.network_timeout
    }

    /// Zero selects the thread pool's own default.
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn tools(&self) -> &Tools {
        &self.tools
    }
}

impl Default for Global {
    fn default() -> Self {
        Self::new()
    }
}

impl Tools {
    pub fn vcs(&self) -> &str {
        &self.vcs
    }

    pub fn build(&self) -> &str {
        &self.build
    }

    pub fn keyring(&self) -> &str {
        &self.keyring
    }

    pub fn manager(&self) -> &str {
        &self.manager
    }

    pub fn elevator(&self) -> &str {
        &self.elevator
    }
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            vcs: vcs(),
            build: build(),
            keyring: keyring(),
            manager: manager(),
            elevator: elevator(),
        }
    }
}

/// Acquire the global configuration, falling back on defaults where absent.
pub fn global() -> Result<Global> {
    match File::open(*CONFIG_FILE) {
        Ok(file) => match serde_yaml::from_reader(&file) {
            Ok(config) => Ok(config),
            Err(error) => err!(ConfigError::Load((*CONFIG_FILE).into(), error.to_string())),
        },
        Err(error) => match error.kind() {
            NotFound => Ok(Global::new()),
            _ => err!(ConfigError::Load((*CONFIG_FILE).into(), error.to_string())),
        },
    }
}

fn recipe_service() -> String {
    DEFAULT_RECIPE_SERVICE.into()
}

fn cache_root() -> String {
    (*CACHE_DIR).into()
}

fn network_timeout() -> u64 {
    30
}

fn parallelism() -> usize {
    0
}

fn vcs() -> String {
    GIT_EXECUTABLE.into()
}

fn build() -> String {
    MAKEPKG_EXECUTABLE.into()
}

fn keyring() -> String {
    GPG_EXECUTABLE.into()
}

fn manager() -> String {
    PACMAN_EXECUTABLE.into()
}

fn elevator() -> String {
    SUDO_EXECUTABLE.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_populate_absent_fields() {
        let config: Global = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config.recipe_service(), DEFAULT_RECIPE_SERVICE);
        assert_eq!(config.network_timeout(), 30);
        assert_eq!(config.parallelism(), 0);
        assert_eq!(config.tools().vcs(), GIT_EXECUTABLE);
        assert_eq!(config.tools().build(), MAKEPKG_EXECUTABLE);
        assert_eq!(config.tools().keyring(), GPG_EXECUTABLE);
        assert_eq!(config.tools().manager(), PACMAN_EXECUTABLE);
        assert_eq!(config.tools().elevator(), SUDO_EXECUTABLE);
    }

    #[test]
    fn partial_overrides_retain_defaults() {
        let config: Global = serde_yaml::from_str("network_timeout: 5\ntools:\n  build: /usr/bin/true\n").unwrap();

        assert_eq!(config.network_timeout(), 5);
        assert_eq!(config.tools().build(), "/usr/bin/true");
        assert_eq!(config.tools().vcs(), GIT_EXECUTABLE);
        assert_eq!(config.recipe_service(), DEFAULT_RECIPE_SERVICE);
    }
}
