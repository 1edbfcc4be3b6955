use std::path::Path;

use chrono::{DateTime, Local};
use report::{
    display::{column_specs, format_count, format_timestamp},
    style::{cell_style, scorecard_style},
    Dashboard,
};
use shared::{
    domain::{StatusValue, SummaryCounts},
    error::{LoadError, ReportError},
};
use snapshot::last_modified;

use crate::config::Settings;

#[derive(Debug)]
pub(crate) enum Freshness {
    Updated(DateTime<Local>),
    Unavailable(String),
    PathMissing,
}

impl Freshness {
    pub(crate) fn probe(path: &Path) -> Self {
        match last_modified(path) {
            Ok(timestamp) => Freshness::Updated(timestamp),
            Err(LoadError::NotFound { .. }) => Freshness::PathMissing,
            Err(error) => Freshness::Unavailable(error.to_string()),
        }
    }
}

#[derive(Debug)]
pub(crate) enum PageBody {
    Dashboard(Dashboard),
    /// Valid export with no records; the page stops after the header.
    NoData,
    LoadFailed(LoadError),
    Failed(ReportError),
    /// The pass died before producing a result.
    Crashed(String),
}

const PAGE_STYLE: &str = r#"
body { font-family: "Source Sans Pro", Arial, sans-serif; margin: 2rem 3rem; color: #262730; }
h1 { font-size: 2.2em; }
hr { border: none; border-top: 1px solid #d6d6d9; margin: 1.5rem 0; }
.notice { padding: 12px 16px; border-radius: 8px; margin: 8px 0; }
.notice.info { background-color: #e8f1fb; color: #0b4a8b; }
.notice.warning { background-color: #fff8e1; color: #7a5b00; }
.notice.error { background-color: #fdecea; color: #8a1c12; }
.scorecards { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; }
.scorecard { padding: 10px; border-radius: 8px; text-align: center; margin-bottom: 10px; }
.scorecard .value { font-size: 2.5em; font-weight: bold; }
.scorecard .label { font-size: 1.2em; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #e6e6ea; padding: 6px 10px; text-align: left; white-space: nowrap; }
th { background-color: #f6f6f8; }
footer { text-align: center; font-size: 0.9em; color: gray; }
"#;

pub(crate) fn render_page(settings: &Settings, freshness: &Freshness, body: &PageBody) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{}</title>\n<style>{PAGE_STYLE}</style>\n</head>\n<body>\n",
        escape_html(&settings.page_title)
    ));
    html.push_str(&format!(
        "<h1>{} | {}</h1>\n",
        escape_html(&settings.company_name),
        escape_html(&settings.page_title)
    ));

    html.push_str(&render_freshness(freshness));
    html.push_str("<hr>\n");

    match body {
        PageBody::Dashboard(dashboard) => {
            html.push_str("<h2>Resumo dos Projetos</h2>\n");
            html.push_str(&render_scorecards(&dashboard.summary));
            html.push_str("<hr>\n");
            html.push_str("<h2>Visão Geral dos Projetos e Fases de Montagem</h2>\n");
            html.push_str(&render_table(dashboard));
            html.push_str("<hr>\n");
        }
        PageBody::NoData => {}
        PageBody::LoadFailed(error) => html.push_str(&notice("error", &load_error_message(error))),
        PageBody::Failed(error) => html.push_str(&general_error(error)),
        PageBody::Crashed(detail) => html.push_str(&general_error(detail)),
    }

    html.push_str(&format!(
        "<footer>Dashboard Operacional - v.{}</footer>\n</body>\n</html>\n",
        env!("CARGO_PKG_VERSION")
    ));
    html
}

fn render_freshness(freshness: &Freshness) -> String {
    match freshness {
        Freshness::Updated(timestamp) => notice(
            "info",
            &format!(
                "Última atualização da base de dados {}",
                format_timestamp(timestamp)
            ),
        ),
        Freshness::Unavailable(detail) => notice(
            "warning",
            &format!("Não foi possível obter a data de modificação do arquivo JSON: {detail}"),
        ),
        Freshness::PathMissing => notice(
            "warning",
            "Caminho do arquivo JSON não encontrado para verificar a data de modificação.",
        ),
    }
}

fn general_error(detail: impl std::fmt::Display) -> String {
    notice(
        "error",
        &format!("Ocorreu um erro geral no aplicativo: {detail}"),
    )
}

fn load_error_message(error: &LoadError) -> String {
    let path = error.path().display().to_string();
    match error {
        LoadError::NotFound { .. } => format!(
            "Erro: O arquivo '{path}' não foi encontrado. Verifique o caminho e a existência do arquivo."
        ),
        LoadError::Unreadable { source, .. } => {
            format!("Erro ao carregar ou ler o arquivo JSON em '{path}': {source}")
        }
        LoadError::Parse { source, .. } => {
            format!("Erro ao carregar ou ler o arquivo JSON em '{path}': {source}")
        }
    }
}

fn render_scorecards(summary: &SummaryCounts) -> String {
    let cards = [
        (summary.total, "Projetos Totais", None),
        (summary.open, "Em Aberto", Some(StatusValue::Open)),
        (
            summary.in_progress,
            "Em Andamento",
            Some(StatusValue::InProgress),
        ),
        (summary.finished, "Finalizados", Some(StatusValue::Finished)),
    ];

    let mut html = String::from("<div class=\"scorecards\">\n");
    for (count, label, status) in cards {
        let style = scorecard_style(status);
        html.push_str(&format!(
            "<div class=\"scorecard\" style=\"background-color: {bg};\">\
             <div class=\"value\" style=\"color: {fg};\">{count}</div>\
             <div class=\"label\" style=\"color: {fg};\">{label}</div></div>\n",
            bg = style.background,
            fg = style.text,
            count = format_count(count),
        ));
    }
    html.push_str("</div>\n");
    html
}

fn render_table(dashboard: &Dashboard) -> String {
    let projects = &dashboard.projects;
    let mut html = String::from("<table>\n<thead><tr>");
    for column in column_specs(projects) {
        let title = column
            .help
            .map(|help| format!(" title=\"{}\"", escape_html(&help)))
            .unwrap_or_default();
        html.push_str(&format!("<th{title}>{}</th>", escape_html(&column.label)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in &projects.rows {
        html.push_str("<tr>");
        for value in [&row.project_code, &row.site_name, &row.due_date_display] {
            html.push_str(&format!("<td>{}</td>", escape_html(value)));
        }
        for phase in &projects.phase_columns {
            let status = row.phase(phase);
            let text = status.map(StatusValue::label).unwrap_or_default();
            let style = cell_style(status)
                .map(|style| format!(" style=\"{}\"", style.css()))
                .unwrap_or_default();
            html.push_str(&format!("<td{style}>{text}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn notice(kind: &str, message: &str) -> String {
    format!(
        "<div class=\"notice {kind}\">{}</div>\n",
        escape_html(message)
    )
}

pub(crate) fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
