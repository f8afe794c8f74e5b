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
    collections::HashSet,
    fmt::{Display, Formatter, Result as FmtResult},
    sync::{
        mpsc::{self, Receiver, Sender},
        Mutex,
    },
};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    err,
    sync::{
        unit::{depname, BuildUnit},
        Runtime,
        SyncError,
    },
    Error,
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyClass {
    Required,
    Build,
    Optional,
}

impl Display for DependencyClass {
    fn fmt(&self, fmter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Required => write!(fmter, "Required"),
            Self::Build => write!(fmter, "Build-time"),
            Self::Optional => write!(fmter, "Optional"),
        }
    }
}

/// Names already dispatched for resolution during this synchronization run,
/// shared by every recursive descent and by the top-level fan-out.
#[derive(Default)]
pub struct Visited {
    seen: Mutex<HashSet<String>>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a name, yielding true only for the first claimant.
    pub fn claim(&self, name: &str) -> bool {
        self.seen.lock().unwrap().insert(name.into())
    }

    /// Surrender a claim. Units deselected after resolution release their
    /// name so a later unit may still depend on it.
    pub fn release(&self, name: &str) -> bool {
        self.seen.lock().unwrap().remove(name)
    }

    fn snapshot(&self) -> HashSet<String> {
        self.seen.lock().unwrap().clone()
    }

    fn restore(&self, snapshot: HashSet<String>) {
        *self.seen.lock().unwrap() = snapshot;
    }
}

/// Dependency-first sequences produced by one resolution call.
#[derive(Debug)]
pub struct ResolutionResult {
    required: Vec<BuildUnit>,
    build: Vec<BuildUnit>,
    optional: Vec<BuildUnit>,
    names: HashSet<String>,
}

impl ResolutionResult {
    fn new() -> Self {
        Self {
            required: Vec::new(),
            build: Vec::new(),
            optional: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// A recipe base reached through several specifier names is recorded once,
    /// under the class which first produced it.
    fn insert(&mut self, class: DependencyClass, unit: BuildUnit) {
        if !self.names.insert(unit.name().into()) {
            return;
        }

        match class {
            DependencyClass::Required => self.required.push(unit),
            DependencyClass::Build => self.build.push(unit),
            DependencyClass::Optional => self.optional.push(unit),
        }
    }

    pub fn required(&self) -> &[BuildUnit] {
        &self.required
    }

    pub fn build(&self) -> &[BuildUnit] {
        &self.build
    }

    pub fn optional(&self) -> &[BuildUnit] {
        &self.optional
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.build.is_empty() && self.optional.is_empty()
    }

    pub fn into_parts(self) -> (Vec<BuildUnit>, Vec<BuildUnit>, Vec<BuildUnit>) {
        (self.required, self.build, self.optional)
    }
}

enum ResolveMessage {
    Resolved(DependencyClass, BuildUnit),
    LookupFailed(Error),
    CheckoutFailed(Error),
}

pub struct Resolver<'a> {
    runtime: &'a Runtime,
    visited: &'a Visited,
}

impl<'a> Resolver<'a> {
    pub fn new(runtime: &'a Runtime, visited: &'a Visited) -> Self {
        Self { runtime, visited }
    }

    /// Resolve the transitive, unsatisfied dependencies of a unit into
    /// dependency-first sequences, one per dependency class. A failing call
    /// surrenders every claim it made, at any depth, so a later unit may
    /// resolve the names this one abandoned. Claims are only ever taken on
    /// the thread driving resolution, which keeps the rollback exact.
    pub fn resolve(&self, unit: &BuildUnit, attended: bool) -> Result<ResolutionResult> {
        let progress = match attended {
            true => spinner(),
            false => ProgressBar::hidden(),
        };
        let mut result = ResolutionResult::new();
        let claimed = self.visited.snapshot();
        let outcome = self.descend(unit, &mut result, &progress);

        progress.finish_and_clear();

        if outcome.is_err() {
            self.visited.restore(claimed);
        }

        outcome.map(|_| result)
    }

    fn descend(&self, unit: &BuildUnit, result: &mut ResolutionResult, progress: &ProgressBar) -> Result<()> {
        let mut pending = Vec::new();

        for (class, specifiers) in [
            (DependencyClass::Required, unit.requires()),
            (DependencyClass::Build, unit.build_requires()),
            (DependencyClass::Optional, unit.optional()),
        ] {
            for specifier in specifiers {
                let name = depname(specifier).trim();

                if name.is_empty() || self.runtime.store().installed(name)? || !self.visited.claim(name) {
                    continue;
                }

                pending.push((class, name.to_owned()));
            }
        }

        let (tx, rx) = mpsc::channel();
        let dispatched = pending.len();

        for (class, name) in pending {
            self.dispatch(class, name, tx.clone());
        }

        drop(tx);
        self.collect(dispatched, rx, result, progress)
    }

    fn dispatch(&self, class: DependencyClass, name: String, tx: Sender<ResolveMessage>) {
        let source = self.runtime.source();
        let vcs = self.runtime.vcs();
        let cache_root: String = self.runtime.config().cache_root().into();

        self.runtime.pool().spawn(move || {
            let recipe = match source.lookup(&name) {
                Ok(Some(recipe)) => recipe,
                Ok(None) => {
                    tx.send(ResolveMessage::Resolved(class, BuildUnit::from_repo(&name))).unwrap();
                    return;
                }
                Err(error) => {
                    tx.send(ResolveMessage::LookupFailed(error)).unwrap();
                    return;
                }
            };

            match vcs.materialize(&recipe.source_url, &cache_root, &recipe.base) {
                Ok((dir, update)) => {
                    let unit = BuildUnit::from_recipe(recipe, dir, cache_root, update);

                    tx.send(ResolveMessage::Resolved(class, unit)).unwrap()
                }
                Err(error) => tx.send(ResolveMessage::CheckoutFailed(error)).unwrap(),
            }
        });
    }

    /// Receive exactly one terminal message for every dispatched name before
    /// surfacing any failure. A failed lookup drops that branch with a
    /// warning; a failed checkout aborts resolution once the channel drains.
    fn collect(
        &self,
        dispatched: usize,
        rx: Receiver<ResolveMessage>,
        result: &mut ResolutionResult,
        progress: &ProgressBar,
    ) -> Result<()> {
        let mut failure: Option<Error> = None;

        for _ in 0 .. dispatched {
            let message = match rx.recv() {
                Ok(message) => message,
                Err(_) => err!(SyncError::InternalError("resolver worker hung up".into()))?,
            };

            match message {
                ResolveMessage::Resolved(class, unit) => {
                    progress.set_message(unit.name().to_owned());
                    progress.inc(1);

                    if failure.is_some() {
                        continue;
                    }

                    if !unit.is_binary() {
                        if let Err(error) = self.descend(&unit, result, progress) {
                            failure = Some(error);
                            continue;
                        }
                    }

                    result.insert(class, unit);
                }
                ResolveMessage::LookupFailed(error) => {
                    progress.inc(1);
                    error.warn();
                }
                ResolveMessage::CheckoutFailed(error) => {
                    progress.inc(1);

                    if failure.is_none() {
                        failure = Some(error);
                    }
                }
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn spinner() -> ProgressBar {
    let progress = ProgressBar::new_spinner();

    progress.set_style(
        ProgressStyle::with_template(" {spinner:.green} Resolving dependencies: {msg}")
            .unwrap()
            .tick_strings(&["-", "\\", "|", "/", " "]),
    );
    progress
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::sync::harness::{recipe, runtime, FakeDispatcher, FakeSource, FakeStore, FakeVcs};

    fn unit(name: &str, requires: &[&str], optional: &[&str]) -> BuildUnit {
        BuildUnit::from_recipe(
            recipe(name, "1.0.0-1", requires, &[], optional),
            format!("/tmp/{name}"),
            "/tmp".into(),
            false,
        )
    }

    fn names(units: &[BuildUnit]) -> Vec<&str> {
        units.iter().map(|unit| unit.name()).collect()
    }

    #[test]
    fn chains_resolve_dependency_first() {
        let source = Arc::new(FakeSource::default().with(recipe("b", "1", &["c"], &[], &[])).with(recipe("c", "1", &[], &[], &[])));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();
        let result = Resolver::new(&runtime, &visited).resolve(&unit("a", &["b"], &[]), false).unwrap();

        assert_eq!(names(result.required()), ["c", "b"]);
        assert!(result.build().is_empty());
        assert!(result.optional().is_empty());
    }

    #[test]
    fn diamonds_resolve_once() {
        let source = Arc::new(
            FakeSource::default()
                .with(recipe("b", "1", &["d"], &[], &[]))
                .with(recipe("c", "1", &["d"], &[], &[]))
                .with(recipe("d", "1", &[], &[], &[])),
        );
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();
        let result = Resolver::new(&runtime, &visited).resolve(&unit("a", &["b", "c"], &[]), false).unwrap();
        let mut resolved = names(result.required());

        resolved.sort();
        assert_eq!(resolved, ["b", "c", "d"]);
    }

    #[test]
    fn cycles_terminate() {
        let source = Arc::new(FakeSource::default().with(recipe("b", "1", &["a"], &[], &[])).with(recipe("a", "1", &["b"], &[], &[])));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();

        visited.claim("a");

        let result = Resolver::new(&runtime, &visited).resolve(&unit("a", &["b"], &[]), false).unwrap();

        assert_eq!(names(result.required()), ["b"]);
    }

    #[test]
    fn satisfied_names_are_skipped() {
        let source = Arc::new(FakeSource::default().with(recipe("y", "1", &[], &[], &[])));
        let store = Arc::new(FakeStore::default().with("x"));
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();
        let result = Resolver::new(&runtime, &visited).resolve(&unit("a", &["x>=2", "y"], &[]), false).unwrap();

        assert_eq!(names(result.required()), ["y"]);
        assert_eq!(source.lookups.lock().unwrap().as_slice(), &["y".to_string()]);
    }

    #[test]
    fn unknown_names_fall_back_to_the_repositories() {
        let source = Arc::new(FakeSource::default());
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();
        let result = Resolver::new(&runtime, &visited).resolve(&unit("a", &["zlib"], &[]), false).unwrap();

        assert_eq!(names(result.required()), ["zlib"]);
        assert!(result.required()[0].is_binary());
        assert!(vcs.materialized.lock().unwrap().is_empty());
    }

    #[test]
    fn lookup_failures_spare_siblings() {
        let source = Arc::new(FakeSource::default().with(recipe("good", "1", &[], &[], &[])).failing("bad"));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();
        let result = Resolver::new(&runtime, &visited).resolve(&unit("a", &["bad", "good"], &[]), false).unwrap();

        assert_eq!(names(result.required()), ["good"]);
    }

    #[test]
    fn checkout_failures_abort_after_draining() {
        let source = Arc::new(FakeSource::default().with(recipe("broken", "1", &[], &[], &[])).with(recipe("fine", "1", &[], &[], &[])));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default().failing("broken"));
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();
        let error = Resolver::new(&runtime, &visited).resolve(&unit("a", &["broken", "fine"], &[]), false).unwrap_err();

        assert!(matches!(error.downcast::<SyncError>(), Ok(SyncError::CheckoutError(..))));
        assert_eq!(vcs.materialized.lock().unwrap().len(), 2);
    }

    #[test]
    fn aborted_resolutions_surrender_their_claims() {
        let source = Arc::new(
            FakeSource::default()
                .with(recipe("fine", "1", &["leaf"], &[], &[]))
                .with(recipe("leaf", "1", &[], &[], &[]))
                .with(recipe("broken", "1", &[], &[], &[])),
        );
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default().failing("broken"));
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();
        let error = Resolver::new(&runtime, &visited).resolve(&unit("a", &["fine", "broken"], &[]), false).unwrap_err();

        assert!(matches!(error.downcast::<SyncError>(), Ok(SyncError::CheckoutError(..))));
        assert!(visited.claim("fine"));
        assert!(visited.claim("leaf"));
        assert!(visited.claim("broken"));
    }

    #[test]
    fn first_claimant_wins_across_classes() {
        let source = Arc::new(FakeSource::default().with(recipe("dup", "1", &[], &[], &[])));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();
        let result = Resolver::new(&runtime, &visited).resolve(&unit("a", &["dup"], &["dup"]), false).unwrap();

        assert_eq!(names(result.required()), ["dup"]);
        assert!(result.optional().is_empty());
    }

    #[test]
    fn visited_names_resolve_once_per_run() {
        let source = Arc::new(FakeSource::default().with(recipe("shared", "1", &[], &[], &[])));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();
        let resolver = Resolver::new(&runtime, &visited);
        let first = resolver.resolve(&unit("a", &["shared"], &[]), false).unwrap();
        let second = resolver.resolve(&unit("b", &["shared"], &[]), false).unwrap();

        assert_eq!(names(first.required()), ["shared"]);
        assert!(second.is_empty());
        assert_eq!(source.lookups.lock().unwrap().len(), 1);
    }

    #[test]
    fn released_claims_can_be_retaken() {
        let visited = Visited::new();

        assert!(visited.claim("x"));
        assert!(!visited.claim("x"));
        assert!(visited.release("x"));
        assert!(visited.claim("x"));
    }

    #[test]
    fn optional_specifier_descriptions_are_stripped() {
        let source = Arc::new(FakeSource::default().with(recipe("sudo", "1", &[], &[], &[])));
        let store = Arc::new(FakeStore::default());
        let vcs = Arc::new(FakeVcs::default());
        let dispatcher = Arc::new(FakeDispatcher::default());
        let runtime = runtime(&source, &store, &vcs, &dispatcher);
        let visited = Visited::new();
        let result = Resolver::new(&runtime, &visited)
            .resolve(&unit("a", &[], &["sudo: privilege elevation"]), false)
            .unwrap();

        assert_eq!(names(result.optional()), ["sudo"]);
    }
}
