use clap::Subcommand;
use serde_json::json;

use crate::auth::{is_valid_email, validate_strength};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::models::{NewFaculty, NewManufacturer, NewPowerSpec};
use crate::database::Database;
use crate::services::{FacultyService, ManufacturerService, NewUser, PowerSpecService, UserService};

#[derive(Subcommand)]
pub enum SeedCommands {
    #[command(about = "Create an admin account unless the email is already registered")]
    Admin {
        #[arg(long, help = "Admin email")]
        email: String,
        #[arg(long, help = "Admin password")]
        password: String,
        #[arg(long, default_value = "System")]
        first_name: String,
        #[arg(long, default_value = "Administrator")]
        last_name: String,
    },

    #[command(about = "Create or reset the demo admin, user and manager accounts")]
    Users,

    #[command(about = "Create or refresh the faculty list")]
    Faculties,

    #[command(about = "Faculties, manufacturers and power specifications")]
    Reference,
}

pub async fn handle(cmd: SeedCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = connect_database().await?;

    let result = match cmd {
        SeedCommands::Admin {
            email,
            password,
            first_name,
            last_name,
        } => {
            let admin = NewUser {
                email,
                password,
                first_name: Some(first_name),
                last_name: Some(last_name),
                role: Some("admin".to_string()),
            };
            seed_admin(&db, admin, &output_format).await
        }
        SeedCommands::Users => seed_users(&db, &output_format).await,
        SeedCommands::Faculties => seed_faculties(&db, &output_format).await,
        SeedCommands::Reference => seed_reference(&db, &output_format).await,
    };

    db.close().await;
    result
}

async fn seed_admin(db: &Database, admin: NewUser, output_format: &OutputFormat) -> anyhow::Result<()> {
    if !is_valid_email(&admin.email) {
        anyhow::bail!("Invalid email format");
    }
    validate_strength(&admin.password).map_err(|msg| anyhow::anyhow!(msg))?;

    match UserService::new(db.clone()).create_if_absent(&admin).await? {
        Some(user) => output_success(
            output_format,
            &format!("Created admin user {} (id {})", user.email, user.id),
            Some(json!({ "created": true, "user": user.summary() })),
        ),
        None => output_success(
            output_format,
            &format!("Admin user {} already exists", admin.email),
            Some(json!({ "created": false, "email": admin.email })),
        ),
    }
}

fn demo_users() -> Vec<NewUser> {
    let user = |email: &str, password: &str, first: &str, last: &str, role: &str| NewUser {
        email: email.to_string(),
        password: password.to_string(),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        role: Some(role.to_string()),
    };

    vec![
        user("admin@iot-energy.com", "Admin123!", "System", "Administrator", "admin"),
        user("user@iot-energy.com", "User123!", "Test", "User", "user"),
        user("manager@iot-energy.com", "Manager123!", "Energy", "Manager", "manager"),
    ]
}

async fn seed_users(db: &Database, output_format: &OutputFormat) -> anyhow::Result<()> {
    let service = UserService::new(db.clone());
    let mut seeded = Vec::new();

    for new_user in demo_users() {
        let user = service.upsert(&new_user).await?;
        if let OutputFormat::Text = output_format {
            println!("  {} ({})", user.email, user.role);
        }
        seeded.push(user.summary());
    }

    output_success(
        output_format,
        &format!("Seeded {} demo users", seeded.len()),
        Some(json!({ "users": seeded })),
    )
}

fn faculties() -> Vec<NewFaculty> {
    [
        ("institution", "หน่วยงานและพื้นที่บริการ", "admin@university.ac.th"),
        ("engineering", "คณะวิศวกรรมศาสตร์", "eng@university.ac.th"),
        ("liberal_arts", "คณะศิลปศาสตร์", "liberal@university.ac.th"),
        ("business_administration", "คณะบริหารธุรกิจ", "business@university.ac.th"),
        ("architecture", "คณะสถาปัตยกรรมศาสตร์", "arch@university.ac.th"),
        ("industrial_education", "ครุศาสตร์อุตสาหกรรมและเทคโนโลยี", "industrial@university.ac.th"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (code, name, email))| NewFaculty {
        faculty_code: code.to_string(),
        faculty_name: name.to_string(),
        contact_email: Some(email.to_string()),
        contact_phone: Some(format!("053-943-{:03}", i + 1)),
    })
    .collect()
}

fn manufacturers() -> Vec<NewManufacturer> {
    [
        ("Schneider Electric", "France"),
        ("ABB", "Switzerland"),
        ("Siemens", "Germany"),
        ("Eastron", "China"),
        ("Mitsubishi Electric", "Japan"),
    ]
    .iter()
    .map(|(name, country)| NewManufacturer {
        name: name.to_string(),
        country: Some(country.to_string()),
    })
    .collect()
}

fn power_specs() -> Vec<NewPowerSpec> {
    [
        (230.0, 5.0, 1150.0, "single", "Class 1"),
        (230.0, 10.0, 2300.0, "single", "Class 1"),
        (230.0, 32.0, 7360.0, "single", "Class 1"),
        (400.0, 32.0, 22170.0, "three", "Class 0.5S"),
        (400.0, 100.0, 69280.0, "three", "Class 0.5S"),
    ]
    .iter()
    .map(|(voltage, current, power, phase, accuracy)| NewPowerSpec {
        rated_voltage: *voltage,
        rated_current: *current,
        rated_power: *power,
        power_phase: phase.to_string(),
        frequency: 50.0,
        accuracy: Some(accuracy.to_string()),
    })
    .collect()
}

async fn seed_faculties(db: &Database, output_format: &OutputFormat) -> anyhow::Result<()> {
    let count = upsert_faculties(db, output_format).await?;
    output_success(
        output_format,
        &format!("Seeded {} faculties", count),
        Some(json!({ "faculties": count })),
    )
}

async fn upsert_faculties(db: &Database, output_format: &OutputFormat) -> anyhow::Result<usize> {
    let service = FacultyService::new(db.clone());
    let faculties = faculties();
    for faculty in &faculties {
        let stored = service.upsert(faculty).await?;
        if let OutputFormat::Text = output_format {
            println!("  {:<24} {}", stored.faculty_code, stored.faculty_name);
        }
    }
    Ok(faculties.len())
}

async fn seed_reference(db: &Database, output_format: &OutputFormat) -> anyhow::Result<()> {
    let faculties = upsert_faculties(db, output_format).await?;

    let manufacturer_service = ManufacturerService::new(db.clone());
    let manufacturers = manufacturers();
    for manufacturer in &manufacturers {
        manufacturer_service.upsert(manufacturer).await?;
    }

    let spec_service = PowerSpecService::new(db.clone());
    let specs = power_specs();
    for spec in &specs {
        spec_service.upsert(spec).await?;
    }

    output_success(
        output_format,
        &format!(
            "Seeded {} faculties, {} manufacturers and {} power specifications",
            faculties,
            manufacturers.len(),
            specs.len()
        ),
        Some(json!({
            "faculties": faculties,
            "manufacturers": manufacturers.len(),
            "powerSpecifications": specs.len(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_passwords_pass_strength_rules() {
        for user in demo_users() {
            assert!(validate_strength(&user.password).is_ok(), "{}", user.email);
            assert!(is_valid_email(&user.email));
        }
    }

    #[test]
    fn faculty_phones_are_sequential() {
        let faculties = faculties();
        assert_eq!(faculties[0].contact_phone.as_deref(), Some("053-943-001"));
        assert_eq!(faculties[5].faculty_code, "industrial_education");
        assert_eq!(faculties[5].contact_phone.as_deref(), Some("053-943-006"));
    }

    #[test]
    fn power_specs_use_known_phases() {
        assert!(power_specs().iter().all(|spec| spec.has_valid_phase()));
    }
}
