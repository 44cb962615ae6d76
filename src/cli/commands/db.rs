use std::collections::BTreeMap;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::TableColumn;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Connect and report server time and version")]
    Check,

    #[command(about = "List tables and their columns")]
    Tables,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = connect_database().await?;

    let result = match cmd {
        DbCommands::Check => check(&db, &output_format).await,
        DbCommands::Tables => tables(&db, &output_format).await,
    };

    db.close().await;
    result
}

async fn check(db: &crate::database::Database, output_format: &OutputFormat) -> anyhow::Result<()> {
    let info = db.server_info().await?;
    output_success(
        output_format,
        &format!("Database connected ({})", info.postgres_version),
        Some(json!({
            "currentTime": info.current_time,
            "postgresVersion": info.postgres_version,
        })),
    )
}

fn group_by_table(columns: Vec<TableColumn>) -> BTreeMap<String, Vec<TableColumn>> {
    let mut tables: BTreeMap<String, Vec<TableColumn>> = BTreeMap::new();
    for column in columns {
        tables.entry(column.table_name.clone()).or_default().push(column);
    }
    tables
}

async fn tables(db: &crate::database::Database, output_format: &OutputFormat) -> anyhow::Result<()> {
    let columns = db.table_columns().await?;
    if columns.is_empty() {
        return output_empty_collection(output_format, "tables", "No tables found. Run `iot-energy migrate` first.");
    }

    let tables = group_by_table(columns);
    match output_format {
        OutputFormat::Json => output_json(&json!({ "tables": tables })),
        OutputFormat::Text => {
            for (table, columns) in &tables {
                println!("{} ({} columns)", table, columns.len());
                for column in columns {
                    let nullable = if column.is_nullable == "YES" { "null" } else { "not null" };
                    println!("  {:<24} {:<28} {}", column.column_name, column.data_type, nullable);
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(table: &str, name: &str) -> TableColumn {
        TableColumn {
            table_name: table.to_string(),
            column_name: name.to_string(),
            data_type: "integer".to_string(),
            is_nullable: "NO".to_string(),
        }
    }

    #[test]
    fn groups_keep_column_order() {
        let tables = group_by_table(vec![
            column("users", "id"),
            column("devices", "device_id"),
            column("users", "email"),
        ]);
        let names: Vec<_> = tables["users"].iter().map(|c| c.column_name.as_str()).collect();
        assert_eq!(names, ["id", "email"]);
        assert_eq!(tables.keys().next().map(String::as_str), Some("devices"));
    }
}
