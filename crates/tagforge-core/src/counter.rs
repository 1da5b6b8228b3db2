//! Prefix computation and next-free-number derivation.
//!
//! The counter cache ([`Counters`]) stores the last-issued number per
//! `(project, prefix)`. [`next_number`] both reads and writes it — the write
//! is part of the contract, so a caller that generates immediately after
//! asking does not reissue the same number. [`peek_next_number`] is the pure
//! variant for previews.

use std::collections::BTreeMap;
use tracing::debug;

use crate::dataset::{CounterKey, Counters, Dataset};
use crate::model::template::Template;

/// Placeholder contributed to a prefix by blocks not yet resolved.
pub const UNRESOLVED_MARK: &str = "?";

/// Concatenate resolved block values strictly preceding the auto-number
/// block (or, if absent, the suffix block).
///
/// `values` maps block id → resolved value for every non-fixed block the
/// caller has resolved so far. Blocks awaiting input contribute
/// [`UNRESOLVED_MARK`] rather than failing, so a live preview can render
/// before the form is complete.
#[must_use]
pub fn compute_prefix(template: &Template, values: &BTreeMap<String, String>) -> String {
    let mut prefix = String::new();
    for block in template.prefix_blocks() {
        if let Some(text) = block.kind.fixed_text() {
            prefix.push_str(text);
        } else if let Some(value) = values.get(&block.id) {
            prefix.push_str(value);
        } else {
            prefix.push_str(UNRESOLVED_MARK);
        }
    }
    prefix
}

/// Longest leading run of ASCII digits in `s`, parsed as a number.
///
/// Returns `None` when `s` does not start with a digit or the run overflows.
fn leading_number(s: &str) -> Option<u64> {
    let digits: &str = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s, |(i, _)| &s[..i]);
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Highest number in use for `prefix` among a project's tags.
///
/// Strips `prefix` from each matching `full_tag` and parses the leading digit
/// run of the remainder. Returns 0 when no tag matches.
#[must_use]
pub fn scan_max_number(dataset: &Dataset, project_id: &str, prefix: &str) -> u64 {
    dataset
        .tags_in(project_id)
        .filter_map(|t| t.full_tag.strip_prefix(prefix))
        .filter_map(leading_number)
        .max()
        .unwrap_or(0)
}

/// Lowest number above `max_num` that no reserved range for this scope
/// covers. Ranges may be adjacent or overlapping, so skipping one can land
/// inside another; loop until clear.
fn skip_reserved(dataset: &Dataset, project_id: &str, prefix: &str, max_num: u64) -> u64 {
    let mut next = max_num + 1;
    loop {
        let blocking = dataset.ranges_for(project_id, prefix).find(|r| r.covers(next));
        match blocking {
            Some(range) => next = range.end + 1,
            None => return next,
        }
    }
}

fn candidate(dataset: &Dataset, counters: &Counters, key: &CounterKey) -> u64 {
    let max_num = match counters.get(key) {
        Some(n) if n > 0 => n,
        _ => scan_max_number(dataset, &key.project_id, &key.prefix),
    };
    skip_reserved(dataset, &key.project_id, &key.prefix, max_num)
}

/// Next free number for `(project, prefix)`, **recording it as issued**.
///
/// Monotonically increasing across successive calls for a fixed prefix and
/// dataset: the returned number is written to `counters` as last-issued, so
/// it is never handed out twice within a session. Numbers skipped by
/// reserved ranges stay skipped.
pub fn next_number(
    dataset: &Dataset,
    counters: &mut Counters,
    project_id: &str,
    prefix: &str,
) -> u64 {
    let key = CounterKey::new(project_id, prefix);
    let next = candidate(dataset, counters, &key);
    counters.set(key, next);
    debug!(project_id, prefix, next, "issued number");
    next
}

/// Pure variant of [`next_number`] for previews: same derivation, no cache
/// write, so repeated calls return the same value until a tag is created.
#[must_use]
pub fn peek_next_number(
    dataset: &Dataset,
    counters: &Counters,
    project_id: &str,
    prefix: &str,
) -> u64 {
    candidate(dataset, counters, &CounterKey::new(project_id, prefix))
}
