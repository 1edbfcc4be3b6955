use std::collections::HashSet;

use serde_json::json;
use shared::domain::StatusValue;

use super::*;

fn table(value: Value) -> Table {
    let records: Vec<Record> = serde_json::from_value(value).expect("records");
    Table::from_records(records)
}

fn record(id: i64, code: &str, site: &str, due: &str, line: &str, status: &str) -> Value {
    json!({
        "ID_PROJETO": id,
        "PROJETO": code,
        "OBRA": site,
        "PRAZO_DE_ENTREGA": due,
        "LINHA_MONTAGEM": line,
        "SITUACAO_PROJETO": status,
    })
}

#[test]
fn pivots_phases_of_one_project_into_one_row() {
    let input = table(json!([
        record(1, "P1", "Obra A", "2024-03-05", "CHAPARIA", "Finalizado"),
        record(1, "P1", "Obra A", "2024-03-05", "TESTE", "em andamento"),
    ]));

    let projects = reshape(&input).expect("reshape");
    assert_eq!(projects.phase_columns, ["CHAPARIA", "TESTE"]);
    assert_eq!(projects.rows.len(), 1);

    let row = &projects.rows[0];
    assert_eq!(row.project_id, "1");
    assert_eq!(row.project_code, "P1");
    assert_eq!(row.phase("CHAPARIA"), Some(StatusValue::Finished));
    assert_eq!(row.phase("TESTE"), Some(StatusValue::InProgress));
    assert_eq!(row.overall_status, OverallStatus::InProgress);
    assert_eq!(row.due_date_display, "05/03/2024");
}

#[test]
fn duplicate_phase_records_merge_by_priority() {
    let input = table(json!([
        record(1, "P1", "Obra A", "2024-03-05", "BARRAMENTO", "EM ABERTO"),
        record(1, "P1", "Obra A", "2024-03-05", "BARRAMENTO", "finalizado"),
        record(1, "P1", "Obra A", "2024-03-05", "BARRAMENTO", "Em Andamento"),
    ]));

    let projects = reshape(&input).expect("reshape");
    assert_eq!(projects.rows.len(), 1);
    assert_eq!(
        projects.rows[0].phase("BARRAMENTO"),
        Some(StatusValue::Finished)
    );
    assert_eq!(projects.rows[0].overall_status, OverallStatus::Finished);
}

#[test]
fn unrecognised_statuses_leave_phase_unset_but_keep_column() {
    let input = table(json!([
        record(1, "P1", "Obra A", "2024-03-05", "FIAÇÃO", "pausado"),
        record(1, "P1", "Obra A", "2024-03-05", "CHAPARIA", "EM ABERTO"),
    ]));

    let projects = reshape(&input).expect("reshape");
    assert_eq!(projects.phase_columns, ["CHAPARIA", "FIAÇÃO"]);
    let row = &projects.rows[0];
    assert_eq!(row.phases.get("FIAÇÃO"), Some(&None));
    assert_eq!(row.overall_status, OverallStatus::Open);
}

#[test]
fn missing_required_columns_is_schema_error() {
    let input = table(json!([
        { "ID_PROJETO": 1, "PROJETO": "P1", "LINHA_MONTAGEM": "TESTE" }
    ]));

    let err = reshape(&input).expect_err("should fail");
    match err {
        ReportError::Schema { missing } => {
            assert_eq!(missing, ["OBRA", "PRAZO_DE_ENTREGA", "SITUACAO_PROJETO"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn column_present_in_any_record_satisfies_schema() {
    let input = table(json!([
        record(1, "P1", "Obra A", "2024-03-05", "TESTE", "EM ABERTO"),
        { "ID_PROJETO": 2, "PROJETO": "P2" }
    ]));

    let projects = reshape(&input).expect("reshape");
    assert_eq!(projects.rows.len(), 2);
    let sparse = projects
        .rows
        .iter()
        .find(|row| row.project_code == "P2")
        .expect("P2 row");
    assert_eq!(sparse.site_name, "");
    assert_eq!(sparse.phase("TESTE"), None);
    assert_eq!(sparse.overall_status, OverallStatus::Unknown);
}

#[test]
fn empty_table_reshapes_to_empty_output() {
    let projects = reshape(&Table::empty()).expect("reshape");
    assert!(projects.is_empty());
    assert!(projects.phase_columns.is_empty());
}

#[test]
fn canonical_phases_lead_and_others_follow_alphabetically() {
    let input = table(json!([
        record(1, "P1", "Obra", "2024-01-01", "TESTE", "EM ABERTO"),
        record(1, "P1", "Obra", "2024-01-01", "PINTURA", "EM ABERTO"),
        record(1, "P1", "Obra", "2024-01-01", "CHAPARIA", "EM ABERTO"),
        record(1, "P1", "Obra", "2024-01-01", "ESTOQUE", "EM ABERTO"),
        record(1, "P1", "Obra", "2024-01-01", "ACABAMENTO", "EM ABERTO"),
    ]));

    let projects = reshape(&input).expect("reshape");
    assert_eq!(
        projects.phase_columns,
        ["CHAPARIA", "ACABAMENTO", "TESTE", "ESTOQUE", "PINTURA"]
    );
    assert_eq!(
        projects.columns(),
        [
            "PROJETO",
            "OBRA",
            "PRAZO_DE_ENTREGA",
            "CHAPARIA",
            "ACABAMENTO",
            "TESTE",
            "ESTOQUE",
            "PINTURA"
        ]
    );
}

#[test]
fn rows_sort_newest_first_with_missing_dates_last() {
    let input = table(json!([
        record(1, "P-OLD", "Obra", "2023-01-10", "TESTE", "EM ABERTO"),
        record(2, "P-NODATE", "Obra", "a definir", "TESTE", "EM ABERTO"),
        record(3, "P-NEW", "Obra", "15/08/2024", "TESTE", "EM ABERTO"),
        record(4, "P-MID", "Obra", "2024-03-05T10:00:00", "TESTE", "EM ABERTO"),
    ]));

    let projects = reshape(&input).expect("reshape");
    let order: Vec<(&str, &str)> = projects
        .rows
        .iter()
        .map(|row| (row.project_code.as_str(), row.due_date_display.as_str()))
        .collect();
    assert_eq!(
        order,
        [
            ("P-NEW", "15/08/2024"),
            ("P-MID", "05/03/2024"),
            ("P-OLD", "10/01/2023"),
            ("P-NODATE", ""),
        ]
    );
}

#[test]
fn null_due_dates_keep_group_order() {
    let input = table(json!([
        { "ID_PROJETO": 2, "PROJETO": "B", "OBRA": "x", "PRAZO_DE_ENTREGA": null,
          "LINHA_MONTAGEM": "TESTE", "SITUACAO_PROJETO": "EM ABERTO" },
        { "ID_PROJETO": 1, "PROJETO": "A", "OBRA": "x", "PRAZO_DE_ENTREGA": null,
          "LINHA_MONTAGEM": "TESTE", "SITUACAO_PROJETO": "EM ABERTO" },
    ]));

    let projects = reshape(&input).expect("reshape");
    let codes: Vec<&str> = projects
        .rows
        .iter()
        .map(|row| row.project_code.as_str())
        .collect();
    assert_eq!(codes, ["A", "B"]);
}

#[test]
fn same_id_with_different_site_stays_separate() {
    let input = table(json!([
        record(7, "P7", "Obra Norte", "2024-05-01", "CHAPARIA", "FINALIZADO"),
        record(7, "P7", "Obra Sul", "2024-05-01", "CHAPARIA", "EM ABERTO"),
    ]));

    let projects = reshape(&input).expect("reshape");
    assert_eq!(projects.rows.len(), 2);
}

#[test]
fn record_without_assembly_line_still_yields_project() {
    let input = table(json!([
        { "ID_PROJETO": 1, "PROJETO": "P1", "OBRA": "Obra", "PRAZO_DE_ENTREGA": "2024-01-01",
          "LINHA_MONTAGEM": null, "SITUACAO_PROJETO": "EM ABERTO" },
        record(2, "P2", "Obra", "2024-01-02", "TESTE", "FINALIZADO"),
    ]));

    let projects = reshape(&input).expect("reshape");
    assert_eq!(projects.phase_columns, ["TESTE"]);
    assert_eq!(projects.rows.len(), 2);
    let orphan = projects
        .rows
        .iter()
        .find(|row| row.project_code == "P1")
        .expect("P1 row");
    assert_eq!(orphan.phase("TESTE"), None);
}

#[test]
fn row_count_is_bounded_by_distinct_group_keys() {
    let datasets = [
        json!([
            record(1, "P1", "A", "2024-01-01", "TESTE", "EM ABERTO"),
            record(1, "P1", "A", "2024-01-01", "CHAPARIA", "FINALIZADO"),
            record(2, "P2", "B", "2024-02-01", "TESTE", "EM ANDAMENTO"),
        ]),
        json!([
            record(1, "P1", "A", "2024-01-01", "TESTE", "xyz"),
            record(1, "P1", "A", "01/01/2024", "TESTE", "EM ABERTO"),
            record(1, "P1", "A", "nunca", "TESTE", "EM ABERTO"),
            record(1, "P1", "A", "talvez", "TESTE", "EM ABERTO"),
        ]),
        json!([record(9, "P9", "Z", "", "FIAÇÃO", "")]),
    ];

    for dataset in datasets {
        let input = table(dataset);
        let distinct: HashSet<GroupKey> = input
            .records()
            .iter()
            .map(|record| GroupKey {
                project_id: text(record, COL_PROJECT_ID).unwrap_or_default(),
                project_code: text(record, COL_PROJECT_CODE).unwrap_or_default(),
                site_name: text(record, COL_SITE_NAME).unwrap_or_default(),
                due_date: parse_due_date(record.get(COL_DUE_DATE)),
            })
            .collect();

        let projects = reshape(&input).expect("reshape");
        assert!(!projects.rows.is_empty());
        assert!(projects.rows.len() <= distinct.len());
    }
}

#[test]
fn unparseable_dates_collapse_into_one_undated_group() {
    let input = table(json!([
        record(1, "P1", "A", "nunca", "TESTE", "EM ABERTO"),
        record(1, "P1", "A", "talvez", "CHAPARIA", "EM ABERTO"),
    ]));

    let projects = reshape(&input).expect("reshape");
    assert_eq!(projects.rows.len(), 1);
    assert_eq!(projects.rows[0].due_date, None);
    assert_eq!(projects.rows[0].due_date_display, "");
}

#[test]
fn non_string_scalars_are_coerced_to_text() {
    let input = table(json!([
        { "ID_PROJETO": 42, "PROJETO": 1001, "OBRA": "Obra", "PRAZO_DE_ENTREGA": "2024-01-01",
          "LINHA_MONTAGEM": "TESTE", "SITUACAO_PROJETO": "FINALIZADO" },
    ]));

    let projects = reshape(&input).expect("reshape");
    assert_eq!(projects.rows[0].project_id, "42");
    assert_eq!(projects.rows[0].project_code, "1001");
}
