use std::collections::BTreeSet;

use shared::domain::StatusValue;

/// Resolves every status recorded for one project phase into a single value.
/// The most complete recognised status wins; unrecognised labels never do.
pub fn merge_statuses<S: AsRef<str>>(bucket: &[S]) -> Option<StatusValue> {
    let present: BTreeSet<StatusValue> = bucket
        .iter()
        .filter_map(|raw| StatusValue::parse_label(raw.as_ref()))
        .collect();

    StatusValue::PRIORITY
        .into_iter()
        .find(|status| present.contains(status))
}

#[cfg(test)]
#[path = "tests/aggregate_tests.rs"]
mod tests;
