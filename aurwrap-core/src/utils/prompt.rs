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
    io::ErrorKind::{Interrupted, NotConnected},
};

use dialoguer::{
    console::{style, Style},
    theme::ColorfulTheme,
    Input,
};

use crate::{err, impl_error, Error, ErrorGeneric, ErrorTrait, Result};

#[derive(Debug)]
pub enum PromptError {
    PromptInterrupted,
    PromptNotTerminal,
}

impl Display for PromptError {
    fn fmt(&self, fmter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::PromptInterrupted => write!(fmter, "Prompt was interrupted."),
            Self::PromptNotTerminal => write!(fmter, "Input is not connected to a terminal."),
        }
    }
}

impl_error!(PromptError);

/// Present a yes/no confirmation, with `yn_prompt` selecting the affirmative default.
pub fn prompt(prefix: &str, prompt: impl Into<String>, yn_prompt: bool) -> Result<bool> {
    let suffix = match yn_prompt {
        true => "[Y/n]",
        false => "[y/N]",
    };
    let value = create_prompt(prompt.into(), prefix, suffix, yn_prompt)?;

    Ok(value.to_lowercase() == "y" || (yn_prompt && value.is_empty()))
}

/// Read a line of free-form input, an empty line being acceptable.
pub fn prompt_line(prefix: &str, prompt: impl Into<String>) -> Result<String> {
    create_prompt(prompt.into(), prefix, "", true)
}

fn create_prompt(message: String, prefix: &str, suffix: &str, affirm: bool) -> Result<String> {
    let prompt_prefix = match affirm {
        true => style(prefix.into()).cyan().bold(),
        false => style(prefix.into()).red().bold(),
    };
    let theme = ColorfulTheme {
        success_prefix: style(prefix.into()).green().bold(),
        error_prefix: style(prefix.into()).red().bold(),
        prompt_suffix: style(suffix.into()).bold(),
        success_suffix: style(suffix.into()).bold(),
        prompt_style: Style::new(),
        values_style: Style::new(),
        prompt_prefix,
        ..ColorfulTheme::default()
    };

    let input: String = match Input::with_theme(&theme).with_prompt(message).allow_empty(true).interact_text() {
        Ok(value) => value,
        Err(error) => match error.kind() {
            Interrupted => err!(PromptError::PromptInterrupted)?,
            NotConnected => err!(PromptError::PromptNotTerminal)?,
            _ => Err(error).generic()?,
        },
    };

    Ok(input)
}
