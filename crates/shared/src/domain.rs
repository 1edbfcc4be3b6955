use std::{collections::BTreeMap, fmt};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const COL_PROJECT_ID: &str = "ID_PROJETO";
pub const COL_PROJECT_CODE: &str = "PROJETO";
pub const COL_SITE_NAME: &str = "OBRA";
pub const COL_DUE_DATE: &str = "PRAZO_DE_ENTREGA";
pub const COL_ASSEMBLY_LINE: &str = "LINHA_MONTAGEM";
pub const COL_STATUS: &str = "SITUACAO_PROJETO";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_PROJECT_ID,
    COL_PROJECT_CODE,
    COL_SITE_NAME,
    COL_DUE_DATE,
    COL_ASSEMBLY_LINE,
    COL_STATUS,
];

/// Leading output columns, before any phase column.
pub const BASE_COLUMNS: [&str; 3] = [COL_PROJECT_CODE, COL_SITE_NAME, COL_DUE_DATE];

/// Assembly phases in shop-floor order. Only these feed the overall status.
pub const CANONICAL_PHASES: [&str; 5] = ["CHAPARIA", "BARRAMENTO", "FIAÇÃO", "ACABAMENTO", "TESTE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusValue {
    #[serde(rename = "EM ABERTO")]
    Open,
    #[serde(rename = "EM ANDAMENTO")]
    InProgress,
    #[serde(rename = "FINALIZADO")]
    Finished,
}

impl StatusValue {
    /// Highest priority first.
    pub const PRIORITY: [StatusValue; 3] = [
        StatusValue::Finished,
        StatusValue::InProgress,
        StatusValue::Open,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusValue::Open => "EM ABERTO",
            StatusValue::InProgress => "EM ANDAMENTO",
            StatusValue::Finished => "FINALIZADO",
        }
    }

    /// Case-insensitive match against the three known labels.
    pub fn parse_label(raw: &str) -> Option<Self> {
        let upper = raw.to_uppercase();
        Self::PRIORITY
            .into_iter()
            .find(|status| status.label() == upper)
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallStatus {
    #[serde(rename = "EM ABERTO")]
    Open,
    #[serde(rename = "EM ANDAMENTO")]
    InProgress,
    #[serde(rename = "FINALIZADO")]
    Finished,
    #[serde(rename = "DESCONHECIDO")]
    Unknown,
}

impl OverallStatus {
    pub fn label(self) -> &'static str {
        match self {
            OverallStatus::Open => StatusValue::Open.label(),
            OverallStatus::InProgress => StatusValue::InProgress.label(),
            OverallStatus::Finished => StatusValue::Finished.label(),
            OverallStatus::Unknown => "DESCONHECIDO",
        }
    }
}

impl From<StatusValue> for OverallStatus {
    fn from(value: StatusValue) -> Self {
        match value {
            StatusValue::Open => OverallStatus::Open,
            StatusValue::InProgress => OverallStatus::InProgress,
            StatusValue::Finished => OverallStatus::Finished,
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
    pub project_id: String,
    pub project_code: String,
    pub site_name: String,
    pub due_date: Option<NaiveDateTime>,
    /// `DD/MM/YYYY`, empty when the due date is unknown.
    pub due_date_display: String,
    pub phases: BTreeMap<String, Option<StatusValue>>,
    pub overall_status: OverallStatus,
}

impl ProjectRow {
    pub fn phase(&self, name: &str) -> Option<StatusValue> {
        self.phases.get(name).copied().flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTable {
    /// Canonical phases first, then every other observed assembly line.
    pub phase_columns: Vec<String>,
    pub rows: Vec<ProjectRow>,
}

impl ProjectTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> Vec<String> {
        BASE_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .chain(self.phase_columns.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub finished: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_labels_case_insensitively() {
        assert_eq!(
            StatusValue::parse_label("Em Andamento"),
            Some(StatusValue::InProgress)
        );
        assert_eq!(
            StatusValue::parse_label("finalizado"),
            Some(StatusValue::Finished)
        );
        assert_eq!(StatusValue::parse_label(" EM ABERTO"), None);
        assert_eq!(StatusValue::parse_label("DESCONHECIDO"), None);
    }

    #[test]
    fn status_ordering_follows_priority() {
        assert!(StatusValue::Finished > StatusValue::InProgress);
        assert!(StatusValue::InProgress > StatusValue::Open);
    }

    #[test]
    fn overall_status_serializes_with_portuguese_labels() {
        let json = serde_json::to_string(&OverallStatus::Unknown).expect("json");
        assert_eq!(json, "\"DESCONHECIDO\"");
        let json = serde_json::to_string(&StatusValue::InProgress).expect("json");
        assert_eq!(json, "\"EM ANDAMENTO\"");
    }
}
