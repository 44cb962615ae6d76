use rand::RngCore;
use serde_json::json;

use crate::cli::OutputFormat;

/// `bytes` of OS randomness, hex encoded
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let jwt_secret = random_hex(64);
    let session_secret = random_hex(32);

    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "JWT_SECRET": jwt_secret,
                    "NEXTAUTH_SECRET": session_secret,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("# Add these to your .env file");
            println!("JWT_SECRET={}", jwt_secret);
            println!("NEXTAUTH_SECRET={}", session_secret);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_length_is_twice_the_bytes() {
        let secret = random_hex(64);
        assert_eq!(secret.len(), 128);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(secret, random_hex(64));
        assert_eq!(hex::decode(random_hex(32)).unwrap().len(), 32);
    }
}
