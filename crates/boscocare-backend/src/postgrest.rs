//! HTTP client for the hosted data service.

use std::time::Duration;

use async_trait::async_trait;
use boscocare_config::BackendConfig;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use uuid::Uuid;

use crate::data::{DataStore, Query};
use crate::error::BackendError;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Clone)]
pub struct PostgrestClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl PostgrestClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.rest_url(),
            api_key: config.anon_key.clone(),
        })
    }

    fn request(&self, method: Method, table: &str, token: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(token.unwrap_or(&self.api_key))
    }

    fn by_id(id: Uuid) -> [(&'static str, String); 1] {
        [("id", format!("eq.{id}"))]
    }
}

#[async_trait]
impl DataStore for PostgrestClient {
    async fn select(
        &self,
        token: Option<&str>,
        table: &str,
        query: &Query,
    ) -> Result<Vec<Value>, BackendError> {
        let response = self
            .request(Method::GET, table, token)
            .query(&query.to_params())
            .send()
            .await?;

        let body = BackendError::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn select_single(
        &self,
        token: Option<&str>,
        table: &str,
        query: &Query,
    ) -> Result<Value, BackendError> {
        let response = self
            .request(Method::GET, table, token)
            .header("Accept", SINGLE_OBJECT)
            .query(&query.to_params())
            .send()
            .await?;

        let body = BackendError::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn insert(
        &self,
        token: Option<&str>,
        table: &str,
        row: &Value,
    ) -> Result<Value, BackendError> {
        let response = self
            .request(Method::POST, table, token)
            .header("Accept", SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let body = BackendError::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn update(
        &self,
        token: Option<&str>,
        table: &str,
        id: Uuid,
        changes: &Value,
    ) -> Result<(), BackendError> {
        let response = self
            .request(Method::PATCH, table, token)
            .query(&Self::by_id(id))
            .header("Prefer", "return=minimal")
            .json(changes)
            .send()
            .await?;

        BackendError::read_body(response).await?;
        Ok(())
    }

    async fn delete(
        &self,
        token: Option<&str>,
        table: &str,
        id: Uuid,
    ) -> Result<(), BackendError> {
        let response = self
            .request(Method::DELETE, table, token)
            .header("Prefer", "return=representation")
            .query(&Self::by_id(id))
            .send()
            .await?;

        let body = BackendError::read_body(response).await?;
        deleted_rows(&body)
    }
}

/// A delete that row policies filtered down to nothing still answers with
/// success, so an empty representation is reported as [`BackendError::NoRows`].
fn deleted_rows(body: &str) -> Result<(), BackendError> {
    let rows: Vec<Value> = serde_json::from_str(body)?;
    if rows.is_empty() {
        return Err(BackendError::NoRows);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_rows_requires_a_row() {
        assert!(deleted_rows(r#"[{"id":"1"}]"#).is_ok());
        assert!(deleted_rows("[]").unwrap_err().is_no_rows());
        assert!(matches!(deleted_rows(""), Err(BackendError::Decode(_))));
    }
}
