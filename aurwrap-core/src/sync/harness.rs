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
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use crate::{
    config::Global,
    err,
    exec::ExecutionError,
    sync::{
        checkout::Vcs,
        client::{Recipe, RecipeSource},
        pacman::{Dispatcher, LocalStore},
        Runtime,
        SyncError,
    },
    Error,
    Result,
};

pub(crate) fn recipe(base: &str, version: &str, requires: &[&str], build_requires: &[&str], optional: &[&str]) -> Recipe {
    Recipe {
        base: base.into(),
        version: version.into(),
        requires: requires.iter().map(|name| name.to_string()).collect(),
        build_requires: build_requires.iter().map(|name| name.to_string()).collect(),
        optional: optional.iter().map(|name| name.to_string()).collect(),
        source_url: format!("https://recipes.example.org/{base}.git"),
    }
}

pub(crate) fn config(yaml: &str) -> Global {
    serde_yaml::from_str(yaml).unwrap()
}

pub(crate) fn runtime(source: &Arc<FakeSource>, store: &Arc<FakeStore>, vcs: &Arc<FakeVcs>, dispatcher: &Arc<FakeDispatcher>) -> Runtime {
    runtime_with(Global::new(), source, store, vcs, dispatcher)
}

pub(crate) fn runtime_with(
    config: Global,
    source: &Arc<FakeSource>,
    store: &Arc<FakeStore>,
    vcs: &Arc<FakeVcs>,
    dispatcher: &Arc<FakeDispatcher>,
) -> Runtime {
    Runtime::with_components(config, source.clone(), store.clone(), vcs.clone(), dispatcher.clone()).unwrap()
}

#[derive(Default)]
pub(crate) struct FakeSource {
    recipes: HashMap<String, Recipe>,
    fail: HashSet<String>,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with(mut self, recipe: Recipe) -> Self {
        self.recipes.insert(recipe.base.clone(), recipe);
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.fail.insert(name.into());
        self
    }
}

impl RecipeSource for FakeSource {
    fn lookup(&self, name: &str) -> Result<Option<Recipe>> {
        self.lookups.lock().unwrap().push(name.into());

        if self.fail.contains(name) {
            err!(SyncError::LookupError(name.into(), "connection refused".into()))?
        }

        Ok(self.recipes.get(name).cloned())
    }
}

#[derive(Default)]
pub(crate) struct FakeStore {
    present: HashSet<String>,
}

impl FakeStore {
    pub fn with(mut self, name: &str) -> Self {
        self.present.insert(name.into());
        self
    }
}

impl LocalStore for FakeStore {
    fn installed(&self, name: &str) -> Result<bool> {
        Ok(self.present.contains(name))
    }

    fn installed_version(&self, name: &str) -> Result<Option<String>> {
        Ok(self.present.get(name).map(|_| "1.0.0-1".into()))
    }
}

#[derive(Default)]
pub(crate) struct FakeVcs {
    fail: HashSet<String>,
    dirs: HashMap<String, String>,
    pub materialized: Mutex<Vec<String>>,
    pub merged: Mutex<Vec<String>>,
}

impl FakeVcs {
    pub fn failing(mut self, name: &str) -> Self {
        self.fail.insert(name.into());
        self
    }

    pub fn mapped(mut self, name: &str, dir: &str) -> Self {
        self.dirs.insert(name.into(), dir.into());
        self
    }
}

impl Vcs for FakeVcs {
    fn materialize(&self, _: &str, cache_root: &str, name: &str) -> Result<(String, bool)> {
        self.materialized.lock().unwrap().push(name.into());

        if self.fail.contains(name) {
            err!(SyncError::CheckoutError(name.into(), "exited with code 128".into()))?
        }

        match self.dirs.get(name) {
            Some(dir) => Ok((dir.clone(), false)),
            None => Ok((format!("{cache_root}/{name}"), false)),
        }
    }

    fn merge_upstream(&self, dir: &str) -> Result<()> {
        self.merged.lock().unwrap().push(dir.into());
        Ok(())
    }

    fn diff(&self, _: &str, _: bool) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeDispatcher {
    fail: bool,
    fail_marks: bool,
    pub installs: Mutex<Vec<(Vec<String>, bool)>>,
    pub marked: Mutex<Vec<Vec<String>>>,
    pub removed: Mutex<Vec<Vec<String>>>,
}

impl FakeDispatcher {
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn failing_marks(mut self) -> Self {
        self.fail_marks = true;
        self
    }
}

impl Dispatcher for FakeDispatcher {
    fn install(&self, names: &[String], as_dependency: bool) -> Result<()> {
        self.installs.lock().unwrap().push((names.to_vec(), as_dependency));

        if self.fail {
            err!(ExecutionError::ToolFailure("pacman".into(), 1))?
        }

        Ok(())
    }

    fn mark_dependent(&self, names: &[String]) -> Result<()> {
        self.marked.lock().unwrap().push(names.to_vec());

        if self.fail_marks {
            err!(ExecutionError::ToolFailure("pacman".into(), 1))?
        }

        Ok(())
    }

    fn remove(&self, names: &[String]) -> Result<()> {
        self.removed.lock().unwrap().push(names.to_vec());
        Ok(())
    }
}
