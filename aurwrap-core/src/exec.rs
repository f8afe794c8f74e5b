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
    io::Error as IOError,
    process::{Child, Command, Stdio},
};

use crate::{err, Error, ErrorKind, ErrorTrait, Result};

#[derive(Debug, Clone)]
pub enum ExecutionError {
    ToolFailure(String, i32),
    ToolTerminated(String),
}

impl Display for ExecutionError {
    fn fmt(&self, fmter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::ToolFailure(tool, code) => write!(fmter, "{tool}: exited with code {code}."),
            Self::ToolTerminated(tool) => write!(fmter, "{tool}: terminated by signal."),
        }
    }
}

impl ErrorTrait for ExecutionError {
    fn code(&self) -> i32 {
        match self {
            Self::ToolFailure(_, code) => *code,
            Self::ToolTerminated(_) => 1,
        }
    }
}

/// Spawn a tool with inherited stdio and wait for completion.
pub fn execute(tool: &str, args: &[&str]) -> Result<()> {
    handle_process(tool, Command::new(tool).args(args).spawn())
}

/// Spawn a tool with inherited stdio in the specified working directory.
pub fn execute_in(dir: &str, tool: &str, args: &[&str]) -> Result<()> {
    handle_process(tool, Command::new(tool).args(args).current_dir(dir).spawn())
}

/// Run a tool to completion, yielding its exit disposition alongside stdout.
pub fn status_output(tool: &str, args: &[&str]) -> Result<(bool, String)> {
    match Command::new(tool).args(args).stderr(Stdio::null()).output() {
        Ok(output) => Ok((output.status.success(), String::from_utf8_lossy(&output.stdout).into())),
        Err(error) => err!(ErrorKind::ProcessInitFailure(tool.into(), error.kind())),
    }
}

pub fn handle_process(name: &str, result: std::result::Result<Child, IOError>) -> Result<()> {
    match result {
        Ok(child) => wait_on_process(name, child),
        Err(error) => err!(ErrorKind::ProcessInitFailure(name.into(), error.kind())),
    }
}

fn wait_on_process(name: &str, mut child: Child) -> Result<()> {
    match child.wait() {
        Ok(status) => match status.code() {
            Some(0) => Ok(()),
            Some(code) => err!(ExecutionError::ToolFailure(name.into(), code)),
            None => err!(ExecutionError::ToolTerminated(name.into())),
        },
        Err(error) => err!(ErrorKind::ProcessWaitFailure(name.into(), error.kind())),
    }
}
