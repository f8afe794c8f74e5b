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

use std::collections::HashSet;

/// Meaning assigned to marked positions by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    Install,
    Skip,
}

/// Parse a whitespace-delimited selection expression against a list of `len`
/// entries displayed with reversed numbering, where the first-listed entry
/// carries the highest number. Accepted tokens are `k`, `a-b` and `^k`;
/// malformed or out-of-bounds tokens are discarded without complaint.
pub fn parse(line: &str, len: usize) -> HashSet<usize> {
    let mut marked = HashSet::new();

    for token in line.split_whitespace() {
        if let Some(numeral) = token.strip_prefix('^') {
            if let Some(excluded) = position(numeral, len) {
                marked.extend((0 .. len).filter(|index| *index != excluded));
            }
        } else if let Some((start, end)) = token.split_once('-') {
            let (start, end) = match (position(start, len), position(end, len)) {
                (Some(a), Some(b)) => (a.min(b), a.max(b)),
                _ => continue,
            };

            marked.extend(start ..= end);
        } else if let Some(index) = position(token, len) {
            marked.insert(index);
        }
    }

    marked
}

/// Drop or retain marked positions according to the selection mode.
pub fn retain<T>(list: Vec<T>, marked: &HashSet<usize>, mode: SelectionMode) -> Vec<T> {
    list.into_iter()
        .enumerate()
        .filter(|(index, _)| match mode {
            SelectionMode::Install => marked.contains(index),
            SelectionMode::Skip => !marked.contains(index),
        })
        .map(|(_, entry)| entry)
        .collect()
}

/// Map a displayed number onto its zero-based list position.
fn position(numeral: &str, len: usize) -> Option<usize> {
    let displayed = match numeral.parse::<usize>() {
        Ok(displayed) => displayed,
        Err(_) => return None,
    };

    match displayed >= 1 && displayed <= len {
        true => Some(len - displayed),
        false => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_is_reversed() {
        let marked = parse("1 2 3", 4);

        assert_eq!(marked, HashSet::from([3, 2, 1]));
    }

    #[test]
    fn ranges_are_normalized() {
        assert_eq!(parse("1-3", 4), HashSet::from([1, 2, 3]));
        assert_eq!(parse("3-1", 4), HashSet::from([1, 2, 3]));
    }

    #[test]
    fn exclusion_marks_everything_else() {
        assert_eq!(parse("^2", 4), HashSet::from([0, 1, 3]));
    }

    #[test]
    fn malformed_tokens_are_discarded() {
        assert!(parse("x ^y 1-z -", 4).is_empty());
        assert_eq!(parse("junk 2", 4), HashSet::from([2]));
    }

    #[test]
    fn out_of_bounds_tokens_are_discarded() {
        assert!(parse("0 5 9-12 ^7", 4).is_empty());
    }

    #[test]
    fn retain_honors_selection_mode() {
        let marked = parse("1", 3);
        let skipped = retain(vec!["a", "b", "c"], &marked, SelectionMode::Skip);
        let installed = retain(vec!["a", "b", "c"], &marked, SelectionMode::Install);

        assert_eq!(skipped, vec!["a", "b"]);
        assert_eq!(installed, vec!["c"]);
    }

    #[test]
    fn empty_expression_marks_nothing() {
        assert!(parse("", 4).is_empty());
        assert!(parse("   ", 4).is_empty());
    }
}
