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

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::{err, sync::SyncError, Error, ErrorGeneric, Result};

/// Source of recipe metadata, keyed by package name.
pub trait RecipeSource: Send + Sync {
    /// Query the service for a named recipe. `Ok(None)` signifies the name is
    /// unknown to the service, as distinct from a failure to reach it.
    fn lookup(&self, name: &str) -> Result<Option<Recipe>>;
}

/// Metadata for one recipe as served by the recipe service.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub base: String,
    pub version: String,
    pub requires: Vec<String>,
    pub build_requires: Vec<String>,
    pub optional: Vec<String>,
    pub source_url: String,
}

#[derive(Deserialize)]
struct InfoResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    results: Vec<InfoRecord>,
}

#[derive(Deserialize)]
struct InfoRecord {
    #[serde(rename = "PackageBase")]
    base: String,
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Depends", default)]
    depends: Vec<String>,
    #[serde(rename = "MakeDepends", default)]
    make_depends: Vec<String>,
    #[serde(rename = "OptDepends", default)]
    opt_depends: Vec<String>,
}

pub struct MetadataClient {
    agent: Client,
    service: String,
}

impl MetadataClient {
    pub fn new(service: &str, timeout: u64) -> Result<Self> {
        Ok(Self {
            agent: Client::builder().timeout(Duration::from_secs(timeout)).build().generic()?,
            service: service.trim_end_matches('/').into(),
        })
    }
}

impl RecipeSource for MetadataClient {
    fn lookup(&self, name: &str) -> Result<Option<Recipe>> {
        let url = format!("{}/rpc/?v=5&type=info&arg[]={}", self.service, name);
        let response = match self.agent.get(&url).send() {
            Ok(response) => response,
            Err(error) => err!(SyncError::LookupError(name.into(), error.to_string()))?,
        };

        if !response.status().is_success() {
            err!(SyncError::LookupError(name.into(), format!("service responded {}", response.status())))?
        }

        let info: InfoResponse = match response.json() {
            Ok(info) => info,
            Err(error) => err!(SyncError::LookupError(name.into(), error.to_string()))?,
        };

        if info.kind == "error" {
            err!(SyncError::LookupError(name.into(), info.error.unwrap_or_else(|| "unspecified service error".into())))?
        }

        Ok(info.results.into_iter().next().map(|record| record.into_recipe(&self.service)))
    }
}

impl InfoRecord {
    fn into_recipe(self, service: &str) -> Recipe {
        Recipe {
            source_url: format!("{}/{}.git", service, self.base),
            base: self.base,
            version: self.version,
            requires: self.depends,
            build_requires: self.make_depends,
            optional: self.opt_depends,
        }
    }
}
