use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{OverallStatus, StatusValue, SummaryCounts};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPayload {
    pub project_code: String,
    pub site_name: String,
    pub due_date: String,
    pub phases: BTreeMap<String, Option<StatusValue>>,
    pub overall_status: OverallStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<RowPayload>,
    pub summary: SummaryCounts,
    pub last_modified: Option<String>,
}
