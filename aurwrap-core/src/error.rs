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
    any::Any,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    process::exit,
    result::Result as StdResult,
};

use crate::utils::{print_error, print_warning};

pub type Result<T> = StdResult<T, Error>;

#[macro_export]
macro_rules! err {
    ( $x:expr ) => {
        Err(Error::new(Box::new($x)))
    };
}

#[macro_export]
macro_rules! error {
    ( $x:expr ) => {
        Error::new(Box::new($x))
    };
}

#[macro_export]
macro_rules! impl_error {
    ( $x:ident ) => {
        impl ErrorTrait for $x {
            fn code(&self) -> i32 {
                1
            }
        }
    };
}

pub trait ErrorTrait: Debug + Display + Downcast + Send {
    fn code(&self) -> i32;
}

pub trait Downcast {
    fn as_any(&self) -> &dyn Any;
}

impl<T: ErrorTrait + 'static> Downcast for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct Error {
    kind: Box<dyn ErrorTrait>,
}

impl Error {
    pub fn new(kind: Box<dyn ErrorTrait>) -> Self {
        Self { kind }
    }

    /// Print the contained error and exit with its error code.
    pub fn handle(&self) {
        print_error(&self.kind);
        exit(self.kind.code());
    }

    /// Print the contained error, then yield the error code to the caller.
    pub fn error(&self) -> i32 {
        print_error(&self.kind);
        self.kind.code()
    }

    pub fn warn(&self) {
        print_warning(&self.kind);
    }

    pub fn downcast<T: 'static>(&self) -> StdResult<&T, &Self> {
        match self.kind.as_any().downcast_ref::<T>() {
            Some(inner) => Ok(inner),
            None => Err(self),
        }
    }
}

impl Display for Error {
    fn fmt(&self, fmter: &mut Formatter<'_>) -> FmtResult {
        write!(fmter, "{}", self.kind)
    }
}

#[derive(Debug)]
pub struct GenericError(String);

impl Display for GenericError {
    fn fmt(&self, fmter: &mut Formatter<'_>) -> FmtResult {
        write!(fmter, "{}", self.0)
    }
}

impl ErrorTrait for GenericError {
    fn code(&self) -> i32 {
        1
    }
}

pub trait ErrorGeneric<R, E> {
    fn generic(self) -> Result<R>;
    fn prepend<F>(self, f: F) -> Result<R>
    where
        F: FnOnce() -> String;
    fn prepend_io<F>(self, f: F) -> Result<R>
    where
        F: FnOnce() -> String;
}

impl<R, E: Display> ErrorGeneric<R, E> for StdResult<R, E> {
    fn generic(self) -> Result<R> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => err!(GenericError(error.to_string())),
        }
    }

    fn prepend<F>(self, f: F) -> Result<R>
    where
        F: FnOnce() -> String,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => err!(GenericError(format!("{}: {}", f(), error))),
        }
    }

    fn prepend_io<F>(self, f: F) -> Result<R>
    where
        F: FnOnce() -> String,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => err!(GenericError(format!("'{}': {}", f(), error))),
        }
    }
}
