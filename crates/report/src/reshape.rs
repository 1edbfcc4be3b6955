use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde_json::Value;
use shared::{
    domain::{
        OverallStatus, ProjectRow, ProjectTable, CANONICAL_PHASES, COL_ASSEMBLY_LINE,
        COL_DUE_DATE, COL_PROJECT_CODE, COL_PROJECT_ID, COL_SITE_NAME, COL_STATUS,
        REQUIRED_COLUMNS,
    },
    error::ReportError,
};
use snapshot::{Record, Table};
use tracing::debug;

use crate::{
    aggregate::merge_statuses,
    dates::{newest_first, parse_due_date},
    display::format_due_date,
    status::overall_status,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct GroupKey {
    project_id: String,
    project_code: String,
    site_name: String,
    due_date: Option<NaiveDateTime>,
}

type PhaseBuckets = BTreeMap<String, Vec<String>>;

/// Pivots one-row-per-(project, phase) records into one row per project with
/// a status column per observed assembly line.
pub fn reshape(table: &Table) -> Result<ProjectTable, ReportError> {
    if table.is_empty() {
        return Ok(ProjectTable::default());
    }
    ensure_required_columns(table)?;

    let mut groups: BTreeMap<GroupKey, PhaseBuckets> = BTreeMap::new();
    let mut assembly_lines: BTreeSet<String> = BTreeSet::new();

    for record in table.records() {
        let key = GroupKey {
            project_id: text(record, COL_PROJECT_ID).unwrap_or_default(),
            project_code: text(record, COL_PROJECT_CODE).unwrap_or_default(),
            site_name: text(record, COL_SITE_NAME).unwrap_or_default(),
            due_date: parse_due_date(record.get(COL_DUE_DATE)),
        };
        let buckets = groups.entry(key).or_default();

        // A record without an assembly line still yields its project row.
        let Some(line) = text(record, COL_ASSEMBLY_LINE) else {
            continue;
        };
        assembly_lines.insert(line.clone());
        let bucket = buckets.entry(line).or_default();
        if let Some(status) = text(record, COL_STATUS) {
            bucket.push(status);
        }
    }

    let phase_columns = order_phase_columns(assembly_lines);
    let mut rows: Vec<ProjectRow> = groups
        .into_iter()
        .map(|(key, buckets)| build_row(key, &buckets, &phase_columns))
        .collect();

    // Stable: rows sharing a due date keep group-key order.
    rows.sort_by(|a, b| newest_first(a.due_date, b.due_date));
    for row in &mut rows {
        row.due_date_display = format_due_date(row.due_date);
    }

    debug!(
        records = table.len(),
        projects = rows.len(),
        phases = phase_columns.len(),
        "reshaped snapshot"
    );
    Ok(ProjectTable {
        phase_columns,
        rows,
    })
}

fn ensure_required_columns(table: &Table) -> Result<(), ReportError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !table.has_column(column))
        .map(|column| column.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReportError::Schema { missing })
    }
}

/// Canonical phases in shop-floor order, then the rest alphabetically.
pub fn order_phase_columns(observed: BTreeSet<String>) -> Vec<String> {
    let mut ordered: Vec<String> = CANONICAL_PHASES
        .iter()
        .filter(|phase| observed.contains(**phase))
        .map(|phase| phase.to_string())
        .collect();
    ordered.extend(
        observed
            .into_iter()
            .filter(|line| !CANONICAL_PHASES.contains(&line.as_str())),
    );
    ordered
}

fn build_row(key: GroupKey, buckets: &PhaseBuckets, phase_columns: &[String]) -> ProjectRow {
    let phases = phase_columns
        .iter()
        .map(|column| {
            let merged = buckets
                .get(column)
                .and_then(|bucket| merge_statuses(bucket));
            (column.clone(), merged)
        })
        .collect();

    let mut row = ProjectRow {
        project_id: key.project_id,
        project_code: key.project_code,
        site_name: key.site_name,
        due_date: key.due_date,
        due_date_display: String::new(),
        phases,
        overall_status: OverallStatus::Unknown,
    };
    row.overall_status = overall_status(&row, &CANONICAL_PHASES);
    row
}

/// Scalar cell as text; null and absent cells are `None`.
fn text(record: &Record, column: &str) -> Option<String> {
    match record.get(column)? {
        Value::Null => None,
        Value::String(value) => Some(value.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/reshape_tests.rs"]
mod tests;
