use std::collections::HashSet;

use shared::domain::{OverallStatus, ProjectRow, SummaryCounts};

/// Scorecard counts. Projects are counted by distinct `project_code`, so two
/// ids sharing a code count once. Blank codes are not counted.
pub fn summarize(rows: &[ProjectRow]) -> SummaryCounts {
    SummaryCounts {
        total: distinct_codes(rows, None),
        open: distinct_codes(rows, Some(OverallStatus::Open)),
        in_progress: distinct_codes(rows, Some(OverallStatus::InProgress)),
        finished: distinct_codes(rows, Some(OverallStatus::Finished)),
    }
}

fn distinct_codes(rows: &[ProjectRow], status: Option<OverallStatus>) -> usize {
    rows.iter()
        .filter(|row| status.map_or(true, |status| row.overall_status == status))
        .map(|row| row.project_code.as_str())
        .filter(|code| !code.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
#[path = "tests/summary_tests.rs"]
mod tests;
