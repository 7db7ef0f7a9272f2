use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::BackendError;

/// Row filter and ordering for a select.
///
/// Only equality filters are needed; values are passed as text and compared
/// by the data service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub columns: Option<String>,
    pub filters: Vec<(String, String)>,
    pub order: Option<(String, bool)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column list, including embedded relations such as
    /// `*, student_profile(*)`.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((column.into(), value.to_string()));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some((column.into(), ascending));
        self
    }

    /// Query-string pairs in the data service's syntax.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 2);
        params.push((
            "select".to_string(),
            self.columns.clone().unwrap_or_else(|| "*".to_string()),
        ));
        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{value}")));
        }
        if let Some((column, ascending)) = &self.order {
            let direction = if *ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{column}.{direction}")));
        }
        params
    }
}

/// Table access on behalf of a caller.
///
/// `token` is the caller's access token; `None` sends the request with the
/// public key only. Rows are JSON objects and typed by the caller.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn select(
        &self,
        token: Option<&str>,
        table: &str,
        query: &Query,
    ) -> Result<Vec<Value>, BackendError>;

    /// Exactly one row. Zero rows yields [`BackendError::NoRows`].
    async fn select_single(
        &self,
        token: Option<&str>,
        table: &str,
        query: &Query,
    ) -> Result<Value, BackendError>;

    /// Returns the stored row, including generated columns.
    async fn insert(
        &self,
        token: Option<&str>,
        table: &str,
        row: &Value,
    ) -> Result<Value, BackendError>;

    async fn update(
        &self,
        token: Option<&str>,
        table: &str,
        id: Uuid,
        changes: &Value,
    ) -> Result<(), BackendError>;

    /// Fails with [`BackendError::NoRows`] when nothing visible to `token`
    /// was deleted.
    async fn delete(&self, token: Option<&str>, table: &str, id: Uuid)
    -> Result<(), BackendError>;
}
