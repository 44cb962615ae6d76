use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::services::{format_last_login, UserService};

#[derive(Subcommand)]
pub enum UsersCommands {
    #[command(about = "List accounts with role, status and last login")]
    List,
}

pub async fn handle(cmd: UsersCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UsersCommands::List => {
            let db = connect_database().await?;
            let result = UserService::new(db.clone()).list().await;
            db.close().await;
            let users = result?;

            if users.is_empty() {
                return output_empty_collection(&output_format, "users", "No users found");
            }

            let now = Utc::now();
            match output_format {
                OutputFormat::Json => {
                    let rows: Vec<_> = users
                        .iter()
                        .map(|user| {
                            json!({
                                "user": user.summary(),
                                "isActive": user.is_active,
                                "lastLogin": user.last_login,
                                "createdAt": user.created_at,
                            })
                        })
                        .collect();
                    output_json(&json!({ "users": rows }))?;
                }
                OutputFormat::Text => {
                    let active = users.iter().filter(|u| u.is_active).count();
                    let admins = users.iter().filter(|u| u.role == "admin").count();
                    let logged_in = users.iter().filter(|u| u.last_login.is_some()).count();
                    println!(
                        "{} users, {} active, {} admins, {} have logged in",
                        users.len(),
                        active,
                        admins,
                        logged_in
                    );
                    println!();
                    println!("{:<5} {:<32} {:<24} {:<8} {:<7} {}", "ID", "EMAIL", "NAME", "ROLE", "ACTIVE", "LAST LOGIN");
                    println!("{}", "-".repeat(95));

                    for user in &users {
                        println!(
                            "{:<5} {:<32} {:<24} {:<8} {:<7} {}",
                            user.id,
                            truncate(&user.email, 32),
                            truncate(&user.display_name(), 24),
                            user.role,
                            if user.is_active { "yes" } else { "no" },
                            format_last_login(user.last_login, now)
                        );
                    }
                }
            }
            Ok(())
        }
    }
}
