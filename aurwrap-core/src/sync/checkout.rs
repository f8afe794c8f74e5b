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
    collections::HashMap,
    fs::create_dir_all,
    path::Path,
    sync::{Arc, Mutex},
};

use crate::{
    err,
    exec::{execute, execute_in},
    sync::SyncError,
    Error,
    ErrorKind,
    Result,
};

/// Version-control operations against the on-disk checkout cache.
pub trait Vcs: Send + Sync {
    /// Ensure a current checkout for `name` exists beneath `cache_root`,
    /// cloning on first contact and fetching thereafter. Yields the checkout
    /// directory and whether a prior checkout was present.
    fn materialize(&self, url: &str, cache_root: &str, name: &str) -> Result<(String, bool)>;

    /// Merge previously fetched upstream history into the local branch.
    fn merge_upstream(&self, dir: &str) -> Result<()>;

    /// Print the pending changes of a checkout. For fresh clones this is the
    /// entire recipe tree rather than a revision range.
    fn diff(&self, dir: &str, update: bool) -> Result<()>;
}

pub struct GitCheckout {
    tool: String,
    gates: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl GitCheckout {
    pub fn new(tool: &str) -> Self {
        Self {
            tool: tool.into(),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the single-flight gate for a checkout name. Concurrent
    /// materializations of the same name serialize on the returned lock
    /// rather than racing within one directory.
    fn gate(&self, name: &str) -> Arc<Mutex<()>> {
        let mut gates = self.gates.lock().unwrap();

        match gates.get(name) {
            Some(gate) => gate.clone(),
            None => {
                let gate = Arc::new(Mutex::new(()));

                gates.insert(name.into(), gate.clone());
                gate
            }
        }
    }
}

impl Vcs for GitCheckout {
    fn materialize(&self, url: &str, cache_root: &str, name: &str) -> Result<(String, bool)> {
        let gate = self.gate(name);
        let _held = gate.lock().unwrap();

        if let Err(error) = create_dir_all(cache_root) {
            err!(ErrorKind::IOError(cache_root.into(), error.kind()))?
        }

        let dir = format!("{}/{}", cache_root, name);
        let update = Path::new(&dir).join(".git").exists();
        let acquire = match update {
            true => execute_in(&dir, &self.tool, &["fetch", "--quiet", "origin"]),
            false => execute(&self.tool, &["clone", "--quiet", url, &dir]),
        };

        if let Err(error) = acquire {
            err!(SyncError::CheckoutError(name.into(), error.to_string()))?
        }

        Ok((dir, update))
    }

    fn merge_upstream(&self, dir: &str) -> Result<()> {
        execute_in(dir, &self.tool, &["merge", "--quiet", "FETCH_HEAD"])
    }

    fn diff(&self, dir: &str, update: bool) -> Result<()> {
        match update {
            true => execute_in(dir, &self.tool, &["--no-pager", "diff", "HEAD..FETCH_HEAD"]),
            false => execute_in(dir, &self.tool, &["--no-pager", "show", "HEAD"]),
        }
    }
}
