use std::path::Path;

use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::migrate;

pub async fn handle(dir: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = connect_database().await?;
    let result = migrate::run(&db, Path::new(dir)).await;
    db.close().await;

    let report = result?;

    output_success(
        &output_format,
        &format!(
            "Applied {} migration files ({} statements, {} already present)",
            report.files.len(),
            report.executed,
            report.skipped
        ),
        Some(json!({
            "files": report.files,
            "executed": report.executed,
            "skipped": report.skipped,
        })),
    )
}
