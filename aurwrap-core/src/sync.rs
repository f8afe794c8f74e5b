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
    fs::create_dir_all,
    sync::{
        mpsc::{self, Sender},
        Arc,
    },
};

use indexmap::IndexMap;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    config::Global,
    constants::{ARROW_CYAN, ARROW_GREEN, ARROW_RED, BAR_GREEN, BOLD, DATA_DIR, DIM, RESET},
    err,
    impl_error,
    log::{Level, Logger},
    sync::{
        checkout::{GitCheckout, Vcs},
        client::{MetadataClient, RecipeSource},
        pacman::{Dispatcher, LocalStore, Pacman},
        resolver::Visited,
        transaction::{Installer, SyncFlags},
        unit::BuildUnit,
    },
    utils::print_error,
    Error,
    ErrorKind,
    ErrorTrait,
    Result,
};

pub mod checkout;
pub mod client;
pub mod filter;
pub mod pacman;
pub mod resolver;
pub mod srcinfo;
pub mod transaction;
pub mod unit;

#[cfg(test)]
pub(crate) mod harness;

#[derive(Debug, Clone)]
pub enum SyncError {
    LookupError(String, String),
    CheckoutError(String, String),
    ReviewAborted,
    DependencyError(String, String),
    TrustError(String),
    ConflictError(String, String),
    BuildError(String, String),
    NothingToDo,
    Incomplete(usize),
    InternalError(String),
}

impl Display for SyncError {
    fn fmt(&self, fmter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::LookupError(name, cause) => write!(fmter, "Lookup of {}{name}{} failed: {cause}", *BOLD, *RESET),
            Self::CheckoutError(name, cause) => write!(fmter, "Checkout of {}{name}{} failed: {cause}", *BOLD, *RESET),
            Self::ReviewAborted => write!(fmter, "Review aborted."),
            Self::DependencyError(name, cause) => write!(fmter, "Dependencies of {}{name}{} could not be acquired: {cause}", *BOLD, *RESET),
            Self::TrustError(key) => write!(fmter, "Signing key {}{key}{} was not imported.", *BOLD, *RESET),
            Self::ConflictError(name, other) => write!(fmter, "Installed package {}{other}{} conflicts with {}{name}{}.", *BOLD, *RESET, *BOLD, *RESET),
            Self::BuildError(name, cause) => write!(fmter, "Build of {}{name}{} failed: {cause}", *BOLD, *RESET),
            Self::NothingToDo => write!(fmter, "Nothing to do."),
            Self::Incomplete(count) => write!(fmter, "Failed to synchronize {}{count}{} target(s).\n{} Synchronization failed.", *BOLD, *RESET, *ARROW_RED),
            Self::InternalError(cause) => write!(fmter, "Internal failure: {cause}"),
        }
    }
}

impl_error!(SyncError);

/// Shared machinery of one synchronization run: configuration, the recipe
/// service, the checkout cache, the package manager seams and the worker
/// pool resolution fans out on.
pub struct Runtime {
    config: Global,
    source: Arc<dyn RecipeSource>,
    store: Arc<dyn LocalStore>,
    vcs: Arc<dyn Vcs>,
    dispatcher: Arc<dyn Dispatcher>,
    pool: ThreadPool,
}

impl Runtime {
    pub fn new(config: Global) -> Result<Self> {
        let source = Arc::new(MetadataClient::new(config.recipe_service(), config.network_timeout())?);
        let vcs = Arc::new(GitCheckout::new(config.tools().vcs()));
        let pacman = Arc::new(Pacman::new(config.tools().manager(), config.tools().elevator()));

        Self::with_components(config, source, pacman.clone(), vcs, pacman)
    }

    pub fn with_components(
        config: Global,
        source: Arc<dyn RecipeSource>,
        store: Arc<dyn LocalStore>,
        vcs: Arc<dyn Vcs>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Result<Self> {
        let pool = match ThreadPoolBuilder::new()
            .num_threads(config.parallelism())
            .thread_name(|worker| format!("AW-RESOLVER-{worker}"))
            .build()
        {
            Ok(pool) => pool,
            Err(error) => err!(SyncError::InternalError(error.to_string()))?,
        };

        Ok(Self {
            config,
            source,
            store,
            vcs,
            dispatcher,
            pool,
        })
    }

    pub fn config(&self) -> &Global {
        &self.config
    }

    pub fn source(&self) -> Arc<dyn RecipeSource> {
        self.source.clone()
    }

    pub fn store(&self) -> Arc<dyn LocalStore> {
        self.store.clone()
    }

    pub fn vcs(&self) -> Arc<dyn Vcs> {
        self.vcs.clone()
    }

    pub fn dispatcher(&self) -> Arc<dyn Dispatcher> {
        self.dispatcher.clone()
    }

    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }
}

enum SyncMessage {
    Recipe(BuildUnit),
    Repo(String),
    Failed(String, Error),
}

/// Entry point of a synchronization run. Requested names are acquired
/// concurrently, then installed one unit at a time in request order.
pub struct Synchronizer {
    runtime: Runtime,
    logger: Logger,
    flags: SyncFlags,
}

impl Synchronizer {
    pub fn new(config: Global, flags: SyncFlags) -> Result<Self> {
        if let Err(error) = create_dir_all(*DATA_DIR) {
            err!(ErrorKind::IOError((*DATA_DIR).into(), error.kind()))?
        }

        Ok(Self {
            runtime: Runtime::new(config)?,
            logger: Logger::new("aurwrap-sync").init()?,
            flags,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_runtime(runtime: Runtime, flags: SyncFlags) -> Self {
        Self {
            runtime,
            logger: Logger::new("aurwrap-sync"),
            flags,
        }
    }

    pub fn sync(&mut self, names: &[String]) -> Result<()> {
        if names.is_empty() {
            err!(SyncError::NothingToDo)?
        }

        let visited = Visited::new();
        let mut failures = IndexMap::new();
        let (mut recipes, mut binary) = match self.flags.contains(SyncFlags::PREFER_RECIPE) {
            true => self.partition(names, &visited, &mut failures)?,
            false => (Vec::new(), names.to_vec()),
        };

        recipes.sort_by_key(|unit| names.iter().position(|name| name.trim() == unit.name()).unwrap_or(usize::MAX));
        binary.sort_by_key(|entry| names.iter().position(|name| name.trim() == entry.as_str()).unwrap_or(usize::MAX));

        if !binary.is_empty() {
            println!("{} Dispatching {} package(s) to the repositories...", *ARROW_CYAN, binary.len());

            match self.runtime.dispatcher().install(&binary, false) {
                Ok(_) => self.logger.log(Level::Info, &format!("Dispatched to the repositories: {}", binary.join(", "))).ok(),
                Err(error) => {
                    error.error();

                    for name in &binary {
                        failures.insert(name.clone(), "repository dispatch failed".into());
                    }

                    self.logger.log(Level::Error, &format!("Repository dispatch failed: {}", binary.join(", "))).ok()
                }
            };
        }

        if !recipes.is_empty() {
            self.plan(&recipes);

            let mut installer = Installer::new(&self.runtime, &mut self.logger, self.flags, &visited);

            for unit in &recipes {
                if let Err(error) = installer.install(unit, false) {
                    error.error();
                    failures.insert(unit.name().into(), error.to_string());
                }
            }
        }

        self.conclude(failures)
    }

    /// Fan the requested names out onto the worker pool, sending each through
    /// lookup and checkout. Exactly one terminal message arrives per name;
    /// failures are recorded without tearing the run down.
    fn partition(
        &mut self,
        names: &[String],
        visited: &Visited,
        failures: &mut IndexMap<String, String>,
    ) -> Result<(Vec<BuildUnit>, Vec<String>)> {
        let mut pending = Vec::new();

        for name in names {
            let name = name.trim();

            if name.is_empty() || !visited.claim(name) {
                continue;
            }

            pending.push(name.to_owned());
        }

        let (tx, rx) = mpsc::channel();
        let dispatched = pending.len();

        for name in pending {
            self.dispatch_lookup(name, tx.clone());
        }

        drop(tx);

        let mut recipes = Vec::new();
        let mut binary = Vec::new();

        for _ in 0 .. dispatched {
            let message = match rx.recv() {
                Ok(message) => message,
                Err(_) => err!(SyncError::InternalError("acquisition worker hung up".into()))?,
            };

            match message {
                SyncMessage::Recipe(unit) => recipes.push(unit),
                SyncMessage::Repo(name) => binary.push(name),
                SyncMessage::Failed(name, error) => {
                    error.error();
                    self.logger.log(Level::Error, &format!("Acquisition of {name} failed: {error}")).ok();
                    failures.insert(name, error.to_string());
                }
            }
        }

        Ok((recipes, binary))
    }

    fn dispatch_lookup(&self, name: String, tx: Sender<SyncMessage>) {
        let source = self.runtime.source();
        let vcs = self.runtime.vcs();
        let cache_root: String = self.runtime.config().cache_root().into();

        self.runtime.pool().spawn(move || {
            let recipe = match source.lookup(&name) {
                Ok(Some(recipe)) => recipe,
                Ok(None) => {
                    tx.send(SyncMessage::Repo(name)).unwrap();
                    return;
                }
                Err(error) => {
                    tx.send(SyncMessage::Failed(name, error)).unwrap();
                    return;
                }
            };

            match vcs.materialize(&recipe.source_url, &cache_root, &recipe.base) {
                Ok((dir, update)) => tx.send(SyncMessage::Recipe(BuildUnit::from_recipe(recipe, dir, cache_root, update))).unwrap(),
                Err(error) => tx.send(SyncMessage::Failed(name, error)).unwrap(),
            }
        });
    }

    fn plan(&self, units: &[BuildUnit]) {
        let len = units.len();

        println!("{} {}Recipe packages{} ({len})", *BAR_GREEN, *BOLD, *RESET);

        for (index, unit) in units.iter().enumerate() {
            println!("{:>4} {} {}{}{}", len - index, unit.name(), *DIM, unit.version(), *RESET);
        }
    }

    fn conclude(&mut self, failures: IndexMap<String, String>) -> Result<()> {
        if !failures.is_empty() {
            for (name, cause) in &failures {
                print_error(format!("{}{name}{}: {cause}", *BOLD, *RESET));
            }

            self.logger.log(Level::Error, &format!("Synchronization incomplete: {} failure(s)", failures.len())).ok();
            err!(SyncError::Incomplete(failures.len()))?
        }

        println!("{} Synchronization complete.", *ARROW_GREEN);
        self.logger.log(Level::Info, "Synchronization complete").ok();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{fs::write, sync::Arc};

    use tempfile::tempdir;

    use crate::sync::harness::{config, recipe, runtime_with, FakeDispatcher, FakeSource, FakeStore, FakeVcs};

    fn pre_confirmed() -> SyncFlags {
        SyncFlags::NO_CONFIRM | SyncFlags::PREFER_RECIPE
    }

    #[test]
    fn mixed_targets_split_between_recipes_and_repositories() {
        let dir = tempdir().unwrap();

        write(dir.path().join(".SRCINFO"), "pkgbase = foo\n").unwrap();

        let source = Arc::new(FakeSource::default().with(recipe("foo", "1.0.0-1", &[], &[], &[])));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default().mapped("foo", dir.path().to_str().unwrap()));
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime_with(config("tools:\n  build: \"true\"\n"), &source, &store, &vcs, &dispatcher);
        let mut synchronizer = Synchronizer::with_runtime(runtime, pre_confirmed());

        synchronizer.sync(&["foo".into(), "bar".into()]).unwrap();

        assert_eq!(dispatcher.installs.lock().unwrap().as_slice(), &[(vec!["bar".to_string()], false)]);
        assert_eq!(vcs.materialized.lock().unwrap().as_slice(), &["foo".to_string()]);
    }

    #[test]
    fn duplicate_targets_collapse() {
        let dir = tempdir().unwrap();

        write(dir.path().join(".SRCINFO"), "pkgbase = foo\n").unwrap();

        let source = Arc::new(FakeSource::default().with(recipe("foo", "1.0.0-1", &[], &[], &[])));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default().mapped("foo", dir.path().to_str().unwrap()));
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime_with(config("tools:\n  build: \"true\"\n"), &source, &store, &vcs, &dispatcher);
        let mut synchronizer = Synchronizer::with_runtime(runtime, pre_confirmed());

        synchronizer.sync(&["foo".into(), "foo".into()]).unwrap();

        assert_eq!(vcs.materialized.lock().unwrap().len(), 1);
        assert_eq!(source.lookups.lock().unwrap().len(), 1);
    }

    #[test]
    fn empty_targets_are_an_error() {
        let source = Arc::new(FakeSource::default());
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime_with(config("{}"), &source, &store, &vcs, &dispatcher);
        let mut synchronizer = Synchronizer::with_runtime(runtime, pre_confirmed());
        let error = synchronizer.sync(&[]).unwrap_err();

        assert!(matches!(error.downcast::<SyncError>(), Ok(SyncError::NothingToDo)));
    }

    #[test]
    fn repo_flag_bypasses_recipe_lookup() {
        let source = Arc::new(FakeSource::default().with(recipe("foo", "1.0.0-1", &[], &[], &[])));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime_with(config("{}"), &source, &store, &vcs, &dispatcher);
        let mut synchronizer = Synchronizer::with_runtime(runtime, SyncFlags::NO_CONFIRM);

        synchronizer.sync(&["foo".into()]).unwrap();

        assert_eq!(dispatcher.installs.lock().unwrap().as_slice(), &[(vec!["foo".to_string()], false)]);
        assert!(source.lookups.lock().unwrap().is_empty());
    }

    #[test]
    fn dispatch_failures_render_the_run_incomplete() {
        let source = Arc::new(FakeSource::default());
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default().failing());
        let runtime = runtime_with(config("{}"), &source, &store, &vcs, &dispatcher);
        let mut synchronizer = Synchronizer::with_runtime(runtime, SyncFlags::NO_CONFIRM);
        let error = synchronizer.sync(&["foo".into(), "bar".into()]).unwrap_err();

        assert!(matches!(error.downcast::<SyncError>(), Ok(SyncError::Incomplete(2))));
        assert_eq!(dispatcher.installs.lock().unwrap().len(), 1);
    }

    #[test]
    fn lookup_failures_render_the_run_incomplete() {
        let source = Arc::new(FakeSource::default().failing("ghost"));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime_with(config("{}"), &source, &store, &vcs, &dispatcher);
        let mut synchronizer = Synchronizer::with_runtime(runtime, pre_confirmed());
        let error = synchronizer.sync(&["ghost".into()]).unwrap_err();

        assert!(matches!(error.downcast::<SyncError>(), Ok(SyncError::Incomplete(1))));
        assert!(dispatcher.installs.lock().unwrap().is_empty());
    }
}
