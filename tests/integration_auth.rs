mod common;

use axum::http::StatusCode;
use common::{PASSWORD, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_sign_up_verify_and_sign_in() {
    let app = setup_test_app();
    let email = "jane@school.edu";

    let response = app
        .send(
            "POST",
            "/auth/sign-up",
            None,
            Some(json!({ "email": email, "password": PASSWORD, "role": "guidance" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["message"],
        "Registration successful. Please check your email to verify your account."
    );
    assert_eq!(
        app.provider.account_metadata(email),
        Some(json!({ "role": "guidance" }))
    );
    assert_eq!(app.provider.active_sessions(), 0);

    let response = app
        .send(
            "POST",
            "/auth/sign-in",
            None,
            Some(json!({ "email": email, "password": PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Email not confirmed");

    let user_id = app.provider.confirm(email).unwrap();
    app.data.seed(
        "users",
        json!({ "auth_user_id": user_id, "email": email, "role": "guidance" }),
    );

    let tab = app.sign_in(email).await;

    let response = app.send("GET", "/auth/session", Some(&tab), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["authenticated"], true);
    assert_eq!(response.body["user_id"], json!(user_id));
    assert_eq!(response.body["email"], email);
    assert_eq!(response.body["role"], "guidance");
    assert_eq!(response.body["sign_in_allowed"], true);
    assert_eq!(response.body["profile"]["email"], email);

    let response = app.send("GET", "/", Some(&tab), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let sections = response.body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0]["id"], "guidance");
    assert_eq!(sections[0]["accessible"], true);
    assert_eq!(sections[1]["accessible"], false);
    assert_eq!(sections[2]["accessible"], false);
}

#[tokio::test]
async fn test_duplicate_sign_up_reports_provider_message() {
    let app = setup_test_app();
    app.account("jane@school.edu", "guidance");

    let response = app
        .send(
            "POST",
            "/auth/sign-up",
            None,
            Some(json!({ "email": "jane@school.edu", "password": PASSWORD, "role": "pastoral" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "User already registered");
}

#[tokio::test]
async fn test_disallowed_role_is_signed_out_again() {
    let app = setup_test_app();
    app.account("clerk@school.edu", "registrar");

    let response = app
        .send(
            "POST",
            "/auth/sign-in",
            None,
            Some(json!({ "email": "clerk@school.edu", "password": PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.body["error"],
        "Your account role is not authorized to sign in to this application."
    );
    assert_eq!(app.provider.active_sessions(), 0);

    let tab = response.tab_token().unwrap();
    let response = app.send("GET", "/auth/session", Some(&tab), None).await;
    assert_eq!(response.body["authenticated"], false);
}

#[tokio::test]
async fn test_missing_profile_row_is_rejected() {
    let app = setup_test_app();
    app.provider
        .with_confirmed_account("nobody@school.edu", PASSWORD);

    let response = app
        .send(
            "POST",
            "/auth/sign-in",
            None,
            Some(json!({ "email": "nobody@school.edu", "password": PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.provider.active_sessions(), 0);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = setup_test_app();
    app.account("jane@school.edu", "guidance");

    let response = app
        .send(
            "POST",
            "/auth/sign-in",
            None,
            Some(json!({ "email": "jane@school.edu", "password": "wrong" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Invalid login credentials");
}

#[tokio::test]
async fn test_empty_fields_are_unprocessable() {
    let app = setup_test_app();

    let response = app
        .send(
            "POST",
            "/auth/sign-in",
            None,
            Some(json!({ "email": "jane@school.edu" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "Please fill in all fields");

    let response = app
        .send("POST", "/auth/sign-up", None, Some(json!({})))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "Please fill in all fields");
    assert_eq!(app.provider.active_sessions(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = setup_test_app();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/sign-in")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = app.execute(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_out_is_idempotent() {
    let app = setup_test_app();

    let response = app.send("POST", "/auth/sign-out", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Signed out");
    assert_eq!(app.provider.sign_out_calls(), 0);

    let tab = app.signed_in_as("jane@school.edu", "pastoral").await;
    let response = app.send("POST", "/auth/sign-out", Some(&tab), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.provider.sign_out_calls(), 1);
    assert_eq!(app.provider.active_sessions(), 0);

    let response = app.send("POST", "/auth/sign-out", Some(&tab), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.provider.sign_out_calls(), 1);

    let response = app.send("GET", "/", Some(&tab), None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_sign_out_after_token_expired_succeeds() {
    let app = setup_test_app();
    app.provider.set_session_ttl(0);
    let tab = app.signed_in_as("jane@school.edu", "pastoral").await;

    let response = app.send("POST", "/auth/sign-out", Some(&tab), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Signed out");

    let response = app.send("GET", "/auth/session", Some(&tab), None).await;
    assert_eq!(response.body["authenticated"], false);
}

#[tokio::test]
async fn test_failed_provider_sign_out_still_ends_local_session() {
    let app = setup_test_app();
    let tab = app.signed_in_as("jane@school.edu", "pastoral").await;
    app.provider.fail_sign_out(true);

    let response = app.send("POST", "/auth/sign-out", Some(&tab), None).await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "Sign out failed");

    let response = app.send("GET", "/auth/session", Some(&tab), None).await;
    assert_eq!(response.body["authenticated"], false);
}

#[tokio::test]
async fn test_auth_screen_redirects_signed_in_tab_home() {
    let app = setup_test_app();

    let response = app.send("GET", "/auth", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["sign_up_roles"],
        json!(["guidance", "pastoral", "student_records"])
    );

    let tab = app.signed_in_as("jane@school.edu", "guidance").await;
    let response = app.send("GET", "/auth", Some(&tab), None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_sign_in_without_embedded_user_looks_identity_up() {
    let app = setup_test_app();
    app.account("jane@school.edu", "student");
    app.provider.omit_user_on_sign_in(true);

    let tab = app.sign_in("jane@school.edu").await;
    let response = app.send("GET", "/", Some(&tab), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["role"], "student");
    assert_eq!(response.body["sections"][2]["accessible"], true);
}

#[tokio::test]
async fn test_dev_role_override_applies_to_one_tab() {
    let app = setup_test_app();
    app.account("jane@school.edu", "guidance");
    let first = app.sign_in("jane@school.edu").await;
    let second = app.sign_in("jane@school.edu").await;

    let response = app
        .send(
            "PUT",
            "/auth/dev-role-override",
            Some(&first),
            Some(json!({ "role": "pastoral" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.send("GET", "/auth/session", Some(&first), None).await;
    assert_eq!(response.body["role"], "pastoral");
    assert_eq!(response.body["profile"]["role"], "pastoral");

    let response = app.send("GET", "/", Some(&second), None).await;
    assert_eq!(response.body["role"], "guidance");

    let response = app
        .send("DELETE", "/auth/dev-role-override", Some(&first), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.send("GET", "/", Some(&first), None).await;
    assert_eq!(response.body["role"], "guidance");
    assert_eq!(response.body["sections"][0]["accessible"], true);
}
