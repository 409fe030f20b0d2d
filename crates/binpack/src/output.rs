use std::io::{IsTerminal, Write};

use binpack_codec::Value;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::values::to_json;

const SCHEMA_BASE: &str = "https://schemas.3leaps.dev/binpack/cli/v1";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
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

/// One decoded field ready for display.
pub struct FieldRow {
    pub name: String,
    pub token: String,
    pub value: Value,
}

#[derive(Serialize)]
struct PackedOutput<'a> {
    schema_id: String,
    size: usize,
    hex: &'a str,
}

#[derive(Serialize)]
struct FieldOutput<'a> {
    name: &'a str,
    token: &'a str,
    kind: &'static str,
    value: serde_json::Value,
}

#[derive(Serialize)]
struct UnpackedOutput<'a> {
    schema_id: String,
    size: usize,
    fields: Vec<FieldOutput<'a>>,
}

#[derive(Serialize)]
struct SizeOutput<'a> {
    schema_id: String,
    format: &'a str,
    tokens: usize,
    size: usize,
}

/// Summary of one registered layout.
#[derive(Serialize)]
pub struct LayoutSummary {
    pub name: String,
    pub description: Option<String>,
    pub fields: usize,
    pub size: usize,
    pub format: String,
}

#[derive(Serialize)]
struct LayoutsOutput<'a> {
    schema_id: String,
    layouts: &'a [LayoutSummary],
}

fn schema_id(name: &str) -> String {
    format!("{SCHEMA_BASE}/{name}.schema.json")
}

fn print_json<T: Serialize>(out: &T) {
    println!(
        "{}",
        serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_packed(bytes: &[u8], format: OutputFormat) {
    let encoded = hex::encode(bytes);
    match format {
        OutputFormat::Json => print_json(&PackedOutput {
            schema_id: schema_id("packed"),
            size: bytes.len(),
            hex: &encoded,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SIZE", "HEX"])
                .add_row(vec![bytes.len().to_string(), encoded]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{encoded}"),
        OutputFormat::Raw => print_raw(bytes),
    }
}

pub fn print_fields(rows: &[FieldRow], size: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&UnpackedOutput {
            schema_id: schema_id("unpacked"),
            size,
            fields: rows
                .iter()
                .map(|row| FieldOutput {
                    name: &row.name,
                    token: &row.token,
                    kind: row.value.kind().name(),
                    value: to_json(&row.value),
                })
                .collect(),
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "TOKEN", "KIND", "VALUE"]);
            for row in rows {
                table.add_row(vec![
                    row.name.clone(),
                    row.token.clone(),
                    row.value.kind().to_string(),
                    row.value.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!("{}={} ({})", row.name, row.value, row.token);
            }
        }
        OutputFormat::Raw => {
            for row in rows {
                println!("{}", row.value);
            }
        }
    }
}

pub fn print_size(format_text: &str, tokens: usize, size: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&SizeOutput {
            schema_id: schema_id("size"),
            format: format_text,
            tokens,
            size,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FORMAT", "TOKENS", "SIZE"])
                .add_row(vec![
                    format_text.to_string(),
                    tokens.to_string(),
                    size.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{format_text}: {size} bytes"),
        OutputFormat::Raw => println!("{size}"),
    }
}

pub fn print_layouts(layouts: &[LayoutSummary], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&LayoutsOutput {
            schema_id: schema_id("layouts"),
            layouts,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NAME", "FIELDS", "SIZE", "FORMAT", "DESCRIPTION"]);
            for layout in layouts {
                table.add_row(vec![
                    layout.name.clone(),
                    layout.fields.to_string(),
                    layout.size.to_string(),
                    layout.format.clone(),
                    layout.description.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for layout in layouts {
                println!("{} ({} bytes): {}", layout.name, layout.size, layout.format);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
