/*
 * aurwrap
 *
 * Copyright (C) 2023-2024 Xavier Moffett <sapphirus@azorium.net>
 * SPDX-License-Identifier: GPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use aurwrap_core::{
    config,
    err,
    sync::{transaction::SyncFlags, Synchronizer},
    utils::{
        arguments::{Arguments, InvalidArgument, Operand},
        check_root,
    },
    Error,
    Result,
};

pub fn synchronize(args: &mut Arguments) -> Result<()> {
    check_root()?;

    let mut flags = SyncFlags::PREFER_RECIPE;
    let mut targets = Vec::new();

    while let Some(arg) = args.next() {
        match arg {
            Operand::Long("noconfirm") => flags |= SyncFlags::NO_CONFIRM,
            Operand::Short('r') | Operand::Long("repo") => flags.remove(SyncFlags::PREFER_RECIPE),
            Operand::ShortPos(_, target) | Operand::LongPos(_, target) | Operand::Value(target) => targets.push(target.to_owned()),
            _ => args.invalid_operand()?,
        }
    }

    if targets.is_empty() {
        err!(InvalidArgument::TargetUnspecified)?
    }

    Synchronizer::new(config::global()?, flags)?.sync(&targets)
}
