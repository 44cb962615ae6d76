//! Linear SQL migrations.
//!
//! Files in the migrations directory are named `NNN_description.sql` and run
//! in numeric order. There is no version table: re-running is safe because
//! statements that fail with "already exists" are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::manager::Database;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Cannot read migrations from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Migration file name must start with a number: {0}")]
    InvalidFileName(String),

    #[error("Statement {index} of {file} failed: {source}")]
    Statement {
        file: String,
        index: usize,
        #[source]
        source: sqlx::Error,
    },
}

/// One `.sql` file, ordered by its numeric prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub number: u32,
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct MigrationReport {
    pub files: Vec<String>,
    pub executed: usize,
    pub skipped: usize,
}

/// List the migration files in `dir`, sorted by number then name
pub fn discover(dir: &Path) -> Result<Vec<MigrationFile>, MigrationError> {
    let entries = fs::read_dir(dir).map_err(|source| MigrationError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| MigrationError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("sql") {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let number = parse_number(&name).ok_or_else(|| MigrationError::InvalidFileName(name.clone()))?;
        files.push(MigrationFile { number, name, path });
    }

    files.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.name.cmp(&b.name)));
    Ok(files)
}

fn parse_number(file_name: &str) -> Option<u32> {
    let digits: String = file_name.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Split a script into statements on `;`, dropping blanks and comment-only chunks
pub fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(strip_line_comments)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn strip_line_comments(chunk: &str) -> String {
    chunk
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_already_exists(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().contains("already exists"),
        _ => false,
    }
}

/// Apply every migration in `dir` in order
pub async fn run(db: &Database, dir: &Path) -> Result<MigrationReport, MigrationError> {
    let mut report = MigrationReport::default();

    for file in discover(dir)? {
        let sql = fs::read_to_string(&file.path).map_err(|source| MigrationError::Io {
            path: file.path.clone(),
            source,
        })?;

        info!("Applying migration {}", file.name);
        for (index, statement) in split_statements(&sql).iter().enumerate() {
            match sqlx::query(statement).execute(db.pool()).await {
                Ok(_) => report.executed += 1,
                Err(err) if is_already_exists(&err) => {
                    warn!("Skipped statement {} of {}: {}", index + 1, file.name, err);
                    report.skipped += 1;
                }
                Err(source) => {
                    return Err(MigrationError::Statement {
                        file: file.name.clone(),
                        index: index + 1,
                        source,
                    })
                }
            }
        }
        report.files.push(file.name);
    }

    info!(
        "Migrations complete: {} files, {} statements executed, {} skipped",
        report.files.len(),
        report.executed,
        report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_statements_and_drops_comments() {
        let sql = "-- users table\nCREATE TABLE a (id INT);\n\n-- trailing comment\nCREATE INDEX i ON a (id);\n";
        let statements = split_statements(sql);
        assert_eq!(statements, vec!["CREATE TABLE a (id INT)", "CREATE INDEX i ON a (id)"]);
    }

    #[test]
    fn discovers_files_in_numeric_order() {
        let dir = std::env::temp_dir().join(format!("iot-energy-migrations-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for name in ["010_devices.sql", "002_faculties.sql", "001_users.sql", "notes.txt"] {
            fs::write(dir.join(name), "SELECT 1;").unwrap();
        }

        let names: Vec<String> = discover(&dir).unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["001_users.sql", "002_faculties.sql", "010_devices.sql"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rejects_unnumbered_sql_files() {
        let dir = std::env::temp_dir().join(format!("iot-energy-bad-migrations-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("users.sql"), "SELECT 1;").unwrap();

        assert!(matches!(discover(&dir), Err(MigrationError::InvalidFileName(_))));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn shipped_migrations_are_ordered() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
        let files = discover(&dir).unwrap();
        assert!(!files.is_empty());
        assert_eq!(files[0].name, "001_users.sql");
    }
}
