use chrono::{DateTime, Local, NaiveDateTime};
use shared::{
    domain::{ProjectTable, COL_DUE_DATE, COL_PROJECT_CODE, COL_SITE_NAME},
    protocol::ColumnSpec,
};

const PHASE_HELP: [(&str, &str); 5] = [
    ("CHAPARIA", "Status da fase de Chaparia"),
    ("BARRAMENTO", "Status da fase de Barramento"),
    ("FIAÇÃO", "Status da fase de Fiação"),
    ("ACABAMENTO", "Status da fase de Acabamento"),
    ("TESTE", "Status da fase de Teste"),
];

pub fn format_due_date(due_date: Option<NaiveDateTime>) -> String {
    due_date
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%d/%m/%Y às %H:%M:%S").to_string()
}

/// Integer with pt-BR thousands grouping, e.g. `1.234.567`.
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn column_specs(table: &ProjectTable) -> Vec<ColumnSpec> {
    let base = [
        (COL_PROJECT_CODE, "PROJETO", "Número/código do projeto"),
        (COL_SITE_NAME, "OBRA", "Nome da obra associada ao projeto"),
        (
            COL_DUE_DATE,
            "PRAZO DE ENTREGA",
            "Data limite para entrega do projeto (DD/MM/AAAA)",
        ),
    ]
    .into_iter()
    .map(|(key, label, help)| ColumnSpec {
        key: key.to_string(),
        label: label.to_string(),
        help: Some(help.to_string()),
    });

    let phases = table.phase_columns.iter().map(|phase| ColumnSpec {
        key: phase.clone(),
        label: phase.clone(),
        help: PHASE_HELP
            .iter()
            .find(|(name, _)| *name == phase.as_str())
            .map(|(_, help)| help.to_string()),
    });

    base.chain(phases).collect()
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod tests;
