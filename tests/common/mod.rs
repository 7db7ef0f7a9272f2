#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use boscocare::router::init_router;
use boscocare::state::AppState;
use boscocare_backend::{MemoryAuthProvider, MemoryDataStore};
use boscocare_config::{CorsConfig, DevConfig, ServerConfig, TabConfig};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "password123";
pub const TAB_HEADER: &str = "x-tab-token";

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MemoryAuthProvider>,
    pub data: Arc<MemoryDataStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn tab_token(&self) -> Option<String> {
        self.headers
            .get(TAB_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get("location").and_then(|v| v.to_str().ok())
    }
}

pub fn setup_test_app() -> TestApp {
    let provider = Arc::new(MemoryAuthProvider::new());
    let data = Arc::new(MemoryDataStore::new());

    let server_config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 3000,
        metrics_port: 9090,
        site_url: "http://localhost:3000".to_string(),
    };
    let tab_config = TabConfig {
        secret: "test-secret".to_string(),
        expiry_secs: 3600,
    };
    let cors_config = CorsConfig {
        allowed_origins: vec!["http://localhost:5173".to_string()],
    };
    let dev_config = DevConfig {
        role_override_enabled: true,
    };

    let state = AppState::new(
        provider.clone(),
        data.clone(),
        &server_config,
        tab_config,
        cors_config,
        dev_config,
    );

    TestApp {
        router: init_router(state),
        provider,
        data,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        tab: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = tab {
            builder = builder.header(TAB_HEADER, token);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.execute(request).await
    }

    pub async fn execute(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// A confirmed account with a `users` row carrying `role`.
    pub fn account(&self, email: &str, role: &str) -> Uuid {
        let id = self.provider.with_confirmed_account(email, PASSWORD);
        self.data.seed(
            "users",
            json!({
                "auth_user_id": id,
                "email": email,
                "first_name": "Jane",
                "last_name": "Cruz",
                "role": role,
                "student_profile": []
            }),
        );
        id
    }

    /// Signs in on a new tab and returns that tab's token.
    pub async fn sign_in(&self, email: &str) -> String {
        let response = self
            .send(
                "POST",
                "/auth/sign-in",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.tab_token().expect("new tab should be issued a token")
    }

    /// An account with `role`, signed in on a new tab.
    pub async fn signed_in_as(&self, email: &str, role: &str) -> String {
        self.account(email, role);
        self.sign_in(email).await
    }
}
