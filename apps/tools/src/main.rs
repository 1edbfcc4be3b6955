use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use owo_colors::OwoColorize;
use report::{
    build_dashboard,
    display::{column_specs, format_count, format_timestamp},
    style::{cell_style, scorecard_style, CellStyle},
    Dashboard,
};
use shared::domain::{StatusValue, SummaryCounts};
use snapshot::{last_modified, SnapshotLoader};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "./data/saida.json")]
    data_path: PathBuf,
    /// Plain text output without ANSI colours.
    #[arg(long)]
    no_color: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scorecards followed by the project/phase table.
    Report {
        #[arg(long)]
        json: bool,
    },
    Summary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();
    let cli = Cli::parse();

    let loader = SnapshotLoader::new();
    let table = loader.load(&cli.data_path)?;
    let dashboard = build_dashboard(&table)?;

    match cli.command {
        Command::Report { json: true } => {
            let modified = last_modified(&cli.data_path)
                .ok()
                .map(|timestamp| format_timestamp(&timestamp));
            let payload = dashboard.to_payload(modified);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Report { json: false } => {
            if let Ok(timestamp) = last_modified(&cli.data_path) {
                println!(
                    "Última atualização da base de dados {}",
                    format_timestamp(&timestamp)
                );
            }
            println!("{}", render_summary(&dashboard.summary, !cli.no_color));
            if !dashboard.is_empty() {
                println!();
                print!("{}", render_table(&dashboard, !cli.no_color));
            }
        }
        Command::Summary => {
            println!("{}", render_summary(&dashboard.summary, !cli.no_color));
        }
    }

    Ok(())
}

fn render_summary(summary: &SummaryCounts, color: bool) -> String {
    let cards = [
        ("Projetos Totais", summary.total, None),
        ("Em Aberto", summary.open, Some(StatusValue::Open)),
        (
            "Em Andamento",
            summary.in_progress,
            Some(StatusValue::InProgress),
        ),
        ("Finalizados", summary.finished, Some(StatusValue::Finished)),
    ];

    cards
        .into_iter()
        .map(|(label, count, status)| {
            let text = format!("{label}: {}", format_count(count));
            if color {
                paint(&format!(" {text} "), scorecard_style(status))
            } else {
                text
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn render_table(dashboard: &Dashboard, color: bool) -> String {
    let projects = &dashboard.projects;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if color {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }

    table.set_header(column_specs(projects).into_iter().map(|column| {
        let cell = Cell::new(column.label);
        if color {
            cell.add_attribute(Attribute::Bold)
        } else {
            cell
        }
    }));

    for row in &projects.rows {
        let mut cells = vec![
            Cell::new(&row.project_code),
            Cell::new(&row.site_name),
            Cell::new(&row.due_date_display),
        ];
        cells.extend(projects.phase_columns.iter().map(|phase| {
            let status = row.phase(phase);
            let cell = Cell::new(status.map(StatusValue::label).unwrap_or_default());
            match cell_style(status) {
                Some(style) if color => cell
                    .bg(term_color(style.background))
                    .fg(term_color(style.text)),
                _ => cell,
            }
        }));
        table.add_row(cells);
    }

    format!("{table}\n")
}

fn paint(text: &str, style: CellStyle) -> String {
    let (br, bg, bb) = rgb(style.background);
    let (fr, fg, fb) = rgb(style.text);
    text.on_truecolor(br, bg, bb)
        .truecolor(fr, fg, fb)
        .to_string()
}

fn term_color(css: &str) -> Color {
    let (r, g, b) = rgb(css);
    Color::Rgb { r, g, b }
}

// Colours in report::style are `#RRGGBB` or one of a few CSS names.
fn rgb(css: &str) -> (u8, u8, u8) {
    if let Some(hex) = css.strip_prefix('#') {
        let channel = |at: usize| {
            hex.get(at..at + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .unwrap_or(0)
        };
        return (channel(0), channel(2), channel(4));
    }
    match css {
        "white" => (0xFF, 0xFF, 0xFF),
        "yellow" => (0xFF, 0xFF, 0x00),
        _ => (0x00, 0x00, 0x00),
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
