use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One row of the `ports` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortRow {
    pub kind: &'static str,
    pub name: String,
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct PortsOutput<'a> {
    ports: &'a [PortRow],
    midi_enumerated: bool,
}

pub fn print_ports(rows: &[PortRow], midi_enumerated: bool, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PortsOutput {
                ports: rows,
                midi_enumerated,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "NAME", "DETAIL"]);
            for row in rows {
                table.add_row(vec![
                    row.kind.to_string(),
                    row.name.clone(),
                    row.detail.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                match &row.detail {
                    Some(detail) => println!("{:<10} {} ({detail})", row.kind, row.name),
                    None => println!("{:<10} {}", row.kind, row.name),
                }
            }
        }
    }
}
