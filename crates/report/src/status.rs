use shared::domain::{OverallStatus, ProjectRow, StatusValue};

type Rule = (fn(&[StatusValue]) -> bool, OverallStatus);

// Evaluated top to bottom; the first matching rule wins. A project mixing
// FINALIZADO and EM ABERTO phases with nothing in progress matches none.
const OVERALL_RULES: [Rule; 3] = [
    (all_finished, OverallStatus::Finished),
    (any_in_progress, OverallStatus::InProgress),
    (only_open, OverallStatus::Open),
];

fn all_finished(values: &[StatusValue]) -> bool {
    !values.is_empty() && values.iter().all(|value| *value == StatusValue::Finished)
}

fn any_in_progress(values: &[StatusValue]) -> bool {
    values.contains(&StatusValue::InProgress)
}

fn only_open(values: &[StatusValue]) -> bool {
    values.contains(&StatusValue::Open)
        && !values
            .iter()
            .any(|value| matches!(value, StatusValue::InProgress | StatusValue::Finished))
}

pub fn classify(values: &[StatusValue]) -> OverallStatus {
    OVERALL_RULES
        .iter()
        .find(|(matches, _)| matches(values))
        .map(|(_, status)| *status)
        .unwrap_or(OverallStatus::Unknown)
}

/// Overall status of one project from the given phase columns. Phases the row
/// does not carry count as unset.
pub fn overall_status<S: AsRef<str>>(row: &ProjectRow, phase_columns: &[S]) -> OverallStatus {
    let values: Vec<StatusValue> = phase_columns
        .iter()
        .filter_map(|phase| row.phase(phase.as_ref()))
        .collect();
    classify(&values)
}

#[cfg(test)]
#[path = "tests/status_tests.rs"]
mod tests;
