//! HTTP client for the hosted auth service.

use std::time::Duration;

use async_trait::async_trait;
use boscocare_config::BackendConfig;
use chrono::Utc;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use tracing::debug;

use crate::auth::{AuthProvider, Identity, Session, SignUpOutcome, SignUpRequest};
use crate::error::BackendError;

#[derive(Clone)]
pub struct GoTrueClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GoTrueClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.auth_url(),
            api_key: config.anon_key.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer.unwrap_or(&self.api_key))
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<Session, BackendError> {
        let response = self
            .request(reqwest::Method::POST, "/token", None)
            .query(&[("grant_type", grant_type)])
            .json(&body)
            .send()
            .await?;

        let body = BackendError::read_body(response).await?;
        let session: Session = serde_json::from_str(&body)?;
        Ok(session.stamp_expiry(Utc::now()))
    }
}

#[async_trait]
impl AuthProvider for GoTrueClient {
    async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpOutcome, BackendError> {
        let mut builder = self.request(reqwest::Method::POST, "/signup", None);
        if let Some(redirect_to) = request.redirect_to {
            builder = builder.query(&[("redirect_to", redirect_to)]);
        }

        let response = builder
            .json(&json!({
                "email": request.email,
                "password": request.password,
                "data": request.data,
            }))
            .send()
            .await?;

        let body = BackendError::read_body(response).await?;
        let value: Value = serde_json::from_str(&body)?;

        // With email confirmation on, the service answers with the bare user;
        // otherwise it answers with a full session.
        if value.get("access_token").is_some() {
            let session: Session = serde_json::from_value(value)?;
            let session = session.stamp_expiry(Utc::now());
            Ok(SignUpOutcome {
                user: session.user.clone(),
                session: Some(session),
            })
        } else {
            let user: Option<Identity> = match value.get("id") {
                Some(_) => Some(serde_json::from_value(value)?),
                None => None,
            };
            debug!(has_user = user.is_some(), "Sign-up awaiting email confirmation");
            Ok(SignUpOutcome {
                user,
                session: None,
            })
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        self.token_grant(
            "password",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn get_user(&self, access_token: &str) -> Result<Identity, BackendError> {
        let response = self
            .request(reqwest::Method::GET, "/user", Some(access_token))
            .send()
            .await?;

        let body = BackendError::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::POST, "/logout", Some(access_token))
            .send()
            .await?;

        BackendError::read_body(response).await?;
        Ok(())
    }
}
