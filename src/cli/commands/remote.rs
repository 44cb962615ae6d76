use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{auth_store_path, resolve_base_url};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::client::{ApiClient, AuthStore, DevicesResource, UsersResource};

#[derive(Subcommand)]
pub enum RemoteCommands {
    #[command(about = "Log in and keep the token for later commands")]
    Login {
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, env = "IOT_ENERGY_PASSWORD", help = "Account password")]
        password: String,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show the account behind the stored token")]
    Me,

    #[command(about = "List devices with their latest readings")]
    Devices,

    #[command(about = "List user accounts (admin only)")]
    Users,
}

pub async fn handle(url: Option<String>, cmd: RemoteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = AuthStore::load(auth_store_path()?)?;
    let mut client = ApiClient::new(resolve_base_url(url), store);

    match cmd {
        RemoteCommands::Login { email, password } => {
            let user = client.login(&email, &password).await?;
            output_success(
                &output_format,
                &format!("Logged in as {} ({})", user.email, user.role),
                Some(json!({ "user": user })),
            )
        }
        RemoteCommands::Logout => {
            client.logout().await?;
            output_success(&output_format, "Logged out", None)
        }
        RemoteCommands::Me => {
            if !client.store().is_authenticated() {
                if let OutputFormat::Json = output_format {
                    output_error(&output_format, "Not logged in", Some("NOT_AUTHENTICATED"))?;
                }
                anyhow::bail!("Not logged in. Run `iot-energy remote login` first.");
            }
            let user = client.me().await?;
            match output_format {
                OutputFormat::Json => output_json(&json!({ "user": user })),
                OutputFormat::Text => {
                    println!("ID:    {}", user.id);
                    println!("Email: {}", user.email);
                    println!("Role:  {}", user.role);
                    Ok(())
                }
            }
        }
        RemoteCommands::Devices => {
            let mut devices = DevicesResource::new();
            devices.refresh_devices(&client).await;
            if let Some(message) = devices.error {
                anyhow::bail!(message);
            }
            let Some(list) = devices.data else {
                return output_empty_collection(&output_format, "devices", "No devices found");
            };

            match output_format {
                OutputFormat::Json => output_json(&list),
                OutputFormat::Text => {
                    let stats = &list.stats;
                    println!(
                        "{} devices, {} active, {} online, {} offline, {} error",
                        stats.total_devices,
                        stats.active_devices,
                        stats.online_devices,
                        stats.offline_devices,
                        stats.error_devices
                    );
                    println!();
                    println!("{:<16} {:<28} {:<24} {:<8} {:>10}", "DEVICE", "NAME", "FACULTY", "NETWORK", "POWER (W)");
                    println!("{}", "-".repeat(90));
                    for device in &list.devices {
                        println!(
                            "{:<16} {:<28} {:<24} {:<8} {:>10}",
                            truncate(&device.device_id, 16),
                            truncate(&device.device_name, 28),
                            truncate(device.faculty_name.as_deref().unwrap_or("-"), 24),
                            device.network_status.as_deref().unwrap_or("-"),
                            device
                                .active_power
                                .map(|p| format!("{:.1}", p))
                                .unwrap_or_else(|| "-".to_string())
                        );
                    }
                    Ok(())
                }
            }
        }
        RemoteCommands::Users => {
            let mut users = UsersResource::new();
            users.refresh_users(&client).await;
            if let Some(message) = users.error {
                anyhow::bail!(message);
            }
            let Some(list) = users.data else {
                return output_empty_collection(&output_format, "users", "No users found");
            };

            match output_format {
                OutputFormat::Json => output_json(&json!({
                    "users": list.users.iter().map(|u| json!({
                        "id": u.id,
                        "name": u.name,
                        "email": u.email,
                        "role": u.role,
                        "status": u.status,
                        "lastLogin": u.last_login,
                    })).collect::<Vec<_>>(),
                    "totalUsers": list.total_users,
                    "activeUsers": list.active_users,
                    "admins": list.admins,
                    "newThisMonth": list.new_this_month,
                })),
                OutputFormat::Text => {
                    println!(
                        "{} users, {} active, {} admins, {} new this month",
                        list.total_users, list.active_users, list.admins, list.new_this_month
                    );
                    println!();
                    for user in &list.users {
                        println!(
                            "{:<5} {:<32} {:<8} {:<8} {}",
                            user.id,
                            truncate(&user.email, 32),
                            user.role,
                            user.status,
                            user.last_login
                        );
                    }
                    Ok(())
                }
            }
        }
    }
}
