pub mod aggregate;
pub mod dates;
pub mod display;
pub mod reshape;
pub mod status;
pub mod style;
pub mod summary;

pub use aggregate::merge_statuses;
pub use reshape::reshape;
pub use status::overall_status;
pub use summary::summarize;

use shared::{
    domain::{ProjectTable, SummaryCounts},
    error::ReportError,
    protocol::{DashboardPayload, RowPayload},
};
use snapshot::Table;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub projects: ProjectTable,
    pub summary: SummaryCounts,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn to_payload(&self, last_modified: Option<String>) -> DashboardPayload {
        DashboardPayload {
            columns: display::column_specs(&self.projects),
            rows: self
                .projects
                .rows
                .iter()
                .map(|row| RowPayload {
                    project_code: row.project_code.clone(),
                    site_name: row.site_name.clone(),
                    due_date: row.due_date_display.clone(),
                    phases: row.phases.clone(),
                    overall_status: row.overall_status,
                })
                .collect(),
            summary: self.summary,
            last_modified,
        }
    }
}

/// Full transform pass over a loaded snapshot.
pub fn build_dashboard(table: &Table) -> Result<Dashboard, ReportError> {
    let projects = reshape(table)?;
    let summary = summarize(&projects.rows);
    Ok(Dashboard { projects, summary })
}
