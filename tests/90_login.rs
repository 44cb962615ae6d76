mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use iot_energy_api::database::models::NewDevice;
use iot_energy_api::services::{DeviceService, NewUser, UserService};

fn new_user(email: &str, role: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: "Secret123!".to_string(),
        first_name: Some("Integration".to_string()),
        last_name: Some("Test".to_string()),
        role: Some(role.to_string()),
    }
}

#[tokio::test]
async fn login_then_me_returns_same_identity() -> Result<()> {
    let Some(app) = common::spawn_app_with_database().await? else {
        return Ok(());
    };
    let email = format!("{}@iot-energy.test", common::unique("login"));
    UserService::new(app.db.clone()).upsert(&new_user(&email, "manager")).await?;

    let res = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": email, "password": "Secret123!" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.starts_with("auth-token=")));

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Login successful");
    let token = body["data"]["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());

    let me = app
        .client
        .get(app.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(me["success"], true);
    assert_eq!(me["data"]["user"]["email"], email.as_str());
    assert_eq!(me["data"]["user"]["role"], "manager");
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_401() -> Result<()> {
    let Some(app) = common::spawn_app_with_database().await? else {
        return Ok(());
    };
    let email = format!("{}@iot-energy.test", common::unique("badpass"));
    UserService::new(app.db.clone()).upsert(&new_user(&email, "user")).await?;

    let res = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": email, "password": "Wrong123!" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await?["message"], "Invalid email or password");
    Ok(())
}

#[tokio::test]
async fn deleting_missing_user_is_404_envelope() -> Result<()> {
    let Some(app) = common::spawn_app_with_database().await? else {
        return Ok(());
    };
    let token = app.token(1, "admin@iot-energy.com", "admin")?;

    let res = app
        .client
        .delete(app.url(&format!("/api/users/{}", i32::MAX)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({ "success": false, "message": "User not found" }));
    Ok(())
}

#[tokio::test]
async fn history_without_snapshot_is_null() -> Result<()> {
    let Some(app) = common::spawn_app_with_database().await? else {
        return Ok(());
    };
    let device_id = common::unique("meter");
    DeviceService::new(app.db.clone())
        .create(&NewDevice {
            device_id: device_id.clone(),
            device_name: "Quiet meter".to_string(),
            faculty_id: None,
            manufacturer_id: None,
            power_spec_id: None,
            responsible_person_id: None,
            building: None,
            floor: None,
            room: None,
            status: "active".to_string(),
        })
        .await?;
    let token = app.token(1, "user@iot-energy.com", "user")?;

    let body = app
        .client
        .get(app.url(&format!("/api/devices/{}/history", device_id)))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["message"], "No data found for this device");

    DeviceService::new(app.db.clone()).delete(&device_id).await?;
    Ok(())
}

#[tokio::test]
async fn seeding_same_admin_twice_keeps_one_row() -> Result<()> {
    let Some(app) = common::spawn_app_with_database().await? else {
        return Ok(());
    };
    let email = format!("{}@iot-energy.test", common::unique("seed"));
    let users = UserService::new(app.db.clone());

    let first = users.create_if_absent(&new_user(&email, "admin")).await?;
    let second = users.create_if_absent(&new_user(&email, "admin")).await?;
    assert!(first.is_some());
    assert!(second.is_none(), "second seed should report already exists");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(app.db.pool())
        .await?;
    assert_eq!(count, 1);
    Ok(())
}
