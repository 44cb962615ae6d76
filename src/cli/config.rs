use std::fs;
use std::path::PathBuf;

const AUTH_FILE: &str = "auth.json";

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("IOT_ENERGY_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("iot-energy").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Where `remote login` keeps the token between invocations
pub fn auth_store_path() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join(AUTH_FILE))
}

/// Explicit `--url`, else the configured public URL
pub fn resolve_base_url(explicit: Option<String>) -> String {
    explicit.unwrap_or_else(|| crate::config::config().api.public_url.clone())
}
