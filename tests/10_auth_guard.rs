mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn missing_token_is_401() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(app.url("/api/admin/dashboard")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not authenticated");
    Ok(())
}

#[tokio::test]
async fn invalid_token_is_401() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .get(app.url("/api/users"))
        .bearer_auth("not.a.token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Invalid token");
    Ok(())
}

#[tokio::test]
async fn token_signed_with_other_secret_is_401() -> Result<()> {
    let app = common::spawn_app().await?;

    let mut other = app.config.clone();
    other.security.jwt_secret = "some-other-secret".to_string();
    let identity = iot_energy_api::auth::TokenIdentity {
        user_id: 1,
        email: "admin@iot-energy.com",
        role: "admin",
    };
    let forged = iot_energy_api::auth::issue_token(&identity, &other.security)?;

    let res = app.client.get(app.url("/api/profile")).bearer_auth(forged).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn non_admin_role_is_403() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.token(2, "user@iot-energy.com", "user")?;

    for path in ["/api/admin/dashboard", "/api/admin/faculties", "/api/users"] {
        let res = app.client.get(app.url(path)).bearer_auth(&token).send().await?;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{}", path);

        let body = res.json::<Value>().await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Access denied. Required roles: admin");
    }
    Ok(())
}

#[tokio::test]
async fn profile_reads_identity_from_token() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.token(7, "manager@iot-energy.com", "manager")?;

    let res = app.client.get(app.url("/api/profile")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["id"], 7);
    assert_eq!(body["data"]["user"]["email"], "manager@iot-energy.com");
    assert_eq!(body["data"]["user"]["role"], "manager");
    Ok(())
}

#[tokio::test]
async fn cookie_token_is_accepted() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.token(3, "user@iot-energy.com", "user")?;

    let res = app
        .client
        .get(app.url("/api/profile"))
        .header(reqwest::header::COOKIE, format!("theme=dark; auth-token={}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn login_requires_email_and_password() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "email": "admin@iot-energy.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Email and password are required");
    Ok(())
}

#[tokio::test]
async fn logout_expires_cookie() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.post(app.url("/api/auth/logout")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("auth-token="), "{}", cookie);
    assert!(cookie.contains("Max-Age=0"), "{}", cookie);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Logout successful");
    Ok(())
}

#[tokio::test]
async fn unknown_role_cannot_read_devices() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.token(9, "guest@iot-energy.com", "guest")?;

    let res = app.client.get(app.url("/api/profile")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Access denied. Required roles: user, manager, admin");
    Ok(())
}

#[tokio::test]
async fn register_validates_before_touching_database() -> Result<()> {
    let app = common::spawn_app().await?;

    let cases = [
        (serde_json::json!({ "email": "new@iot-energy.com" }), "Email and password are required"),
        (
            serde_json::json!({ "email": "not-an-email", "password": "Secret123!" }),
            "Invalid email format",
        ),
        (
            serde_json::json!({ "email": "new@iot-energy.com", "password": "secret123!" }),
            "Password must contain at least one uppercase letter",
        ),
        (
            serde_json::json!({ "email": "new@iot-energy.com", "password": "Ab1!" }),
            "Password must be at least 8 characters long",
        ),
    ];

    for (payload, message) in cases {
        let res = app.client.post(app.url("/api/auth/register")).json(&payload).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", payload);

        let body = res.json::<Value>().await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], message);
    }
    Ok(())
}
