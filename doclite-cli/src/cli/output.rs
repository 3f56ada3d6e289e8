// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result rendering for the CLI

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use doclite::{CommandDescription, QueryResult, Row};
use serde_json::json;

use super::commands::OutputFormat;

pub struct ResultFormatter;

impl ResultFormatter {
    pub fn format(result: &QueryResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Csv => Self::format_csv(result),
        }
    }

    /// Union of the column names of every row, in first-seen order
    fn columns(rows: &[Row]) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for name in row.column_names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }
        columns
    }

    fn cell(row: &Row, column: &str) -> String {
        row.get(column).map(|v| v.to_string()).unwrap_or_default()
    }

    fn format_table(result: &QueryResult) -> String {
        let elapsed = result.elapsed.as_secs_f64() * 1000.0;
        if result.rows.is_empty() {
            return match &result.value {
                Some(value) => format!("{}\n({:.3} ms)", value, elapsed),
                None => format!("OK ({:.3} ms)", elapsed),
            };
        }

        let columns = Self::columns(&result.rows);
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(columns.clone());
        for row in &result.rows {
            table.add_row(columns.iter().map(|c| Self::cell(row, c)).collect::<Vec<_>>());
        }

        let noun = if result.rows.len() == 1 { "row" } else { "rows" };
        format!("{}\n{} {} ({:.3} ms)", table, result.rows.len(), noun, elapsed)
    }

    fn format_json(result: &QueryResult) -> String {
        serde_json::to_string_pretty(&result.to_json()).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn format_csv(result: &QueryResult) -> String {
        if result.rows.is_empty() {
            return result.value.as_ref().map(|v| v.to_string()).unwrap_or_default();
        }
        let columns = Self::columns(&result.rows);
        let mut lines = vec![columns.iter().map(|c| escape_csv(c)).collect::<Vec<_>>().join(",")];
        for row in &result.rows {
            lines.push(
                columns
                    .iter()
                    .map(|c| escape_csv(&Self::cell(row, c)))
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        lines.join("\n")
    }

    pub fn format_description(description: &CommandDescription, format: OutputFormat) -> String {
        let fields = [
            ("syntax", description.syntax.to_string()),
            ("description", description.description.clone()),
            ("operation", description.operation.to_string()),
            ("quorum", description.quorum.to_string()),
            ("timeout", format!("{} ms", description.timeout.as_millis())),
            ("idempotent", description.idempotent.to_string()),
            ("involvedClusters", description.involved_clusters.join(", ")),
            ("permission", description.permission.clone().unwrap_or_else(|| "none".to_string())),
        ];

        match format {
            OutputFormat::Json => {
                let value = json!({
                    "syntax": description.syntax,
                    "description": description.description,
                    "operation": description.operation.to_string(),
                    "quorum": description.quorum.to_string(),
                    "timeout_ms": description.timeout.as_millis() as u64,
                    "idempotent": description.idempotent,
                    "involvedClusters": description.involved_clusters,
                    "permission": description.permission,
                });
                serde_json::to_string_pretty(&value).unwrap_or_default()
            }
            OutputFormat::Csv => fields
                .iter()
                .map(|(name, value)| format!("{},{}", name, escape_csv(value)))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Table => {
                let mut table = Table::new();
                table.load_preset(UTF8_FULL).set_header(vec!["property", "value"]);
                for (name, value) in fields {
                    table.add_row(vec![name.to_string(), value]);
                }
                table.to_string()
            }
        }
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
