//! In-process stand-ins for the hosted services.
//!
//! They follow the wire behavior the application depends on: accounts start
//! unconfirmed, a single-row select that matches nothing reports no rows, and
//! inserts return the stored row with generated `id` and `created_at`.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::auth::{AuthProvider, Identity, Session, SignUpOutcome, SignUpRequest};
use crate::data::{DataStore, Query};
use crate::error::BackendError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone)]
struct Account {
    id: Uuid,
    email: String,
    password: String,
    confirmed_at: Option<DateTime<Utc>>,
    metadata: Value,
}

impl Account {
    fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: Some(self.email.clone()),
            email_confirmed_at: self.confirmed_at,
            user_metadata: self.metadata.clone(),
        }
    }
}

pub struct MemoryAuthProvider {
    accounts: Mutex<HashMap<String, Account>>,
    /// Access token to owner and expiry timestamp.
    access_tokens: Mutex<HashMap<String, (Uuid, i64)>>,
    refresh_tokens: Mutex<HashMap<String, Uuid>>,
    session_ttl_secs: AtomicI64,
    omit_user: AtomicBool,
    fail_sign_out: AtomicBool,
    sign_out_calls: AtomicUsize,
}

impl Default for MemoryAuthProvider {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            access_tokens: Mutex::new(HashMap::new()),
            refresh_tokens: Mutex::new(HashMap::new()),
            session_ttl_secs: AtomicI64::new(3600),
            omit_user: AtomicBool::new(false),
            fail_sign_out: AtomicBool::new(false),
            sign_out_calls: AtomicUsize::new(0),
        }
    }
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account that can sign in immediately.
    pub fn with_confirmed_account(&self, email: &str, password: &str) -> Uuid {
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password: password.to_string(),
            confirmed_at: Some(Utc::now()),
            metadata: Value::Object(Map::new()),
        };
        let id = account.id;
        lock(&self.accounts).insert(email.to_lowercase(), account);
        id
    }

    /// Simulates the user following the verification link.
    pub fn confirm(&self, email: &str) -> Option<Uuid> {
        let mut accounts = lock(&self.accounts);
        let account = accounts.get_mut(&email.to_lowercase())?;
        account.confirmed_at = Some(Utc::now());
        Some(account.id)
    }

    pub fn account_metadata(&self, email: &str) -> Option<Value> {
        lock(&self.accounts)
            .get(&email.to_lowercase())
            .map(|a| a.metadata.clone())
    }

    pub fn active_sessions(&self) -> usize {
        lock(&self.access_tokens).len()
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(AtomicOrdering::SeqCst)
    }

    /// Lifetime of sessions issued from now on. Zero or negative issues
    /// sessions that are already expired.
    pub fn set_session_ttl(&self, secs: i64) {
        self.session_ttl_secs.store(secs, AtomicOrdering::SeqCst);
    }

    /// Password sign-in answers without the embedded user.
    pub fn omit_user_on_sign_in(&self, omit: bool) {
        self.omit_user.store(omit, AtomicOrdering::SeqCst);
    }

    pub fn fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, AtomicOrdering::SeqCst);
    }

    /// Invalidates every outstanding refresh token.
    pub fn revoke_refresh_tokens(&self) {
        lock(&self.refresh_tokens).clear();
    }

    fn issue(&self, account: &Account, include_user: bool) -> Session {
        let ttl = self.session_ttl_secs.load(AtomicOrdering::SeqCst);
        let access_token = format!("access-{}", Uuid::new_v4());
        let refresh_token = format!("refresh-{}", Uuid::new_v4());

        let expires_at = Utc::now().timestamp() + ttl;
        lock(&self.access_tokens).insert(access_token.clone(), (account.id, expires_at));
        lock(&self.refresh_tokens).insert(refresh_token.clone(), account.id);

        Session {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in: ttl,
            expires_at: Some(expires_at),
            user: include_user.then(|| account.identity()),
        }
    }

    /// Owner of a live access token; unknown and expired tokens are a 401.
    fn token_owner(&self, access_token: &str) -> Result<Uuid, BackendError> {
        match lock(&self.access_tokens).get(access_token) {
            Some(&(id, expires_at)) if Utc::now().timestamp() < expires_at => Ok(id),
            Some(_) => Err(BackendError::api(
                401,
                Some("bad_jwt"),
                "invalid JWT: token is expired",
            )),
            None => Err(BackendError::api(401, Some("bad_jwt"), "invalid JWT")),
        }
    }

    fn account_by_id(&self, id: Uuid) -> Option<Account> {
        lock(&self.accounts).values().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpOutcome, BackendError> {
        let key = request.email.to_lowercase();
        let mut accounts = lock(&self.accounts);
        if accounts.contains_key(&key) {
            return Err(BackendError::api(
                422,
                Some("user_already_exists"),
                "User already registered",
            ));
        }

        let account = Account {
            id: Uuid::new_v4(),
            email: request.email.to_string(),
            password: request.password.to_string(),
            confirmed_at: None,
            metadata: request.data,
        };
        let user = account.identity();
        accounts.insert(key, account);

        Ok(SignUpOutcome {
            user: Some(user),
            session: None,
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let account = lock(&self.accounts)
            .get(&email.to_lowercase())
            .filter(|a| a.password == password)
            .cloned()
            .ok_or_else(|| {
                BackendError::api(400, Some("invalid_credentials"), "Invalid login credentials")
            })?;

        if account.confirmed_at.is_none() {
            return Err(BackendError::api(
                400,
                Some("email_not_confirmed"),
                "Email not confirmed",
            ));
        }

        let include_user = !self.omit_user.load(AtomicOrdering::SeqCst);
        Ok(self.issue(&account, include_user))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let id = lock(&self.refresh_tokens)
            .remove(refresh_token)
            .ok_or_else(|| {
                BackendError::api(
                    400,
                    Some("refresh_token_not_found"),
                    "Invalid Refresh Token: Refresh Token Not Found",
                )
            })?;

        let account = self
            .account_by_id(id)
            .ok_or_else(|| BackendError::api(404, Some("user_not_found"), "User not found"))?;
        Ok(self.issue(&account, true))
    }

    async fn get_user(&self, access_token: &str) -> Result<Identity, BackendError> {
        let id = self.token_owner(access_token)?;

        self.account_by_id(id)
            .map(|a| a.identity())
            .ok_or_else(|| BackendError::api(404, Some("user_not_found"), "User not found"))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        self.sign_out_calls.fetch_add(1, AtomicOrdering::SeqCst);
        if self.fail_sign_out.load(AtomicOrdering::SeqCst) {
            return Err(BackendError::api(500, None, "Sign out failed"));
        }

        // Revokes every session of the user, as the hosted service does.
        let id = self.token_owner(access_token)?;
        lock(&self.access_tokens).retain(|_, (owner, _)| *owner != id);
        lock(&self.refresh_tokens).retain(|_, owner| *owner != id);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

/// Tables of JSON rows keyed by table name.
#[derive(Default)]
pub struct MemoryDataStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    failures: Mutex<HashSet<(String, Operation)>>,
    hidden: Mutex<HashSet<String>>,
    tokens: Mutex<Vec<Option<String>>>,
    clock: AtomicI64,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a row directly, filling `id` and `created_at` when absent.
    pub fn seed(&self, table: &str, row: Value) -> Uuid {
        let row = self.stamp(row);
        let id = row_id(&row).unwrap_or_default();
        lock(&self.tables)
            .entry(table.to_string())
            .or_default()
            .push(row);
        id
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        lock(&self.tables).get(table).cloned().unwrap_or_default()
    }

    /// Makes the next `operation` on `table` fail once.
    pub fn fail_next(&self, table: &str, operation: Operation) {
        lock(&self.failures).insert((table.to_string(), operation));
    }

    /// Makes the next delete on `table` match no rows, as a row policy that
    /// hides the row from the caller would.
    pub fn hide_next_delete(&self, table: &str) {
        lock(&self.hidden).insert(table.to_string());
    }

    /// Bearer tokens seen so far, in call order.
    pub fn tokens_seen(&self) -> Vec<Option<String>> {
        lock(&self.tokens).clone()
    }

    fn begin(&self, token: Option<&str>, table: &str, operation: Operation) -> Result<(), BackendError> {
        lock(&self.tokens).push(token.map(str::to_string));
        if lock(&self.failures).remove(&(table.to_string(), operation)) {
            return Err(BackendError::api(
                500,
                Some("XX000"),
                format!("simulated {operation:?} failure on {table}"),
            ));
        }
        Ok(())
    }

    /// Strictly increasing timestamps so `created_at` ordering is stable.
    fn next_timestamp(&self) -> String {
        let now = Utc::now().timestamp_micros();
        let previous = self
            .clock
            .fetch_max(now, AtomicOrdering::SeqCst);
        let micros = if now > previous {
            now
        } else {
            self.clock.fetch_add(1, AtomicOrdering::SeqCst) + 1
        };
        DateTime::<Utc>::from_timestamp_micros(micros)
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn stamp(&self, row: Value) -> Value {
        let mut object = match row {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if !matches!(object.get("id"), Some(Value::String(_))) {
            object.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }
        if !object.contains_key("created_at") {
            object.insert("created_at".to_string(), Value::String(self.next_timestamp()));
        }
        Value::Object(object)
    }

    fn matching(&self, table: &str, query: &Query) -> Vec<Value> {
        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|(column, value)| row.get(column).map(as_text).as_deref() == Some(value))
            })
            .collect();

        if let Some((column, ascending)) = &query.order {
            rows.sort_by(|a, b| compare(a.get(column), b.get(column)));
            if !ascending {
                rows.reverse();
            }
        }
        rows
    }
}

fn row_id(row: &Value) -> Option<Uuid> {
    row.get("id")?.as_str()?.parse().ok()
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Nulls sort after every value, so they come last ascending and first
/// descending.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => as_text(x).cmp(&as_text(y)),
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn select(
        &self,
        token: Option<&str>,
        table: &str,
        query: &Query,
    ) -> Result<Vec<Value>, BackendError> {
        self.begin(token, table, Operation::Select)?;
        Ok(self.matching(table, query))
    }

    async fn select_single(
        &self,
        token: Option<&str>,
        table: &str,
        query: &Query,
    ) -> Result<Value, BackendError> {
        self.begin(token, table, Operation::Select)?;
        let mut rows = self.matching(table, query);
        if rows.len() == 1 {
            Ok(rows.remove(0))
        } else {
            Err(BackendError::NoRows)
        }
    }

    async fn insert(
        &self,
        token: Option<&str>,
        table: &str,
        row: &Value,
    ) -> Result<Value, BackendError> {
        self.begin(token, table, Operation::Insert)?;
        if !row.is_object() {
            return Err(BackendError::api(400, Some("PGRST102"), "Empty or invalid json"));
        }
        let row = self.stamp(row.clone());
        lock(&self.tables)
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        token: Option<&str>,
        table: &str,
        id: Uuid,
        changes: &Value,
    ) -> Result<(), BackendError> {
        self.begin(token, table, Operation::Update)?;
        let mut tables = lock(&self.tables);
        let target = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id)));

        if let (Some(Value::Object(row)), Value::Object(changes)) = (target, changes) {
            for (key, value) in changes {
                row.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete(
        &self,
        token: Option<&str>,
        table: &str,
        id: Uuid,
    ) -> Result<(), BackendError> {
        self.begin(token, table, Operation::Delete)?;
        if lock(&self.hidden).remove(table) {
            return Err(BackendError::NoRows);
        }

        let mut tables = lock(&self.tables);
        let rows = tables.get_mut(table).ok_or(BackendError::NoRows)?;
        let before = rows.len();
        rows.retain(|row| row_id(row) != Some(id));
        if rows.len() == before {
            return Err(BackendError::NoRows);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_unconfirmed_account_cannot_sign_in() {
        let provider = MemoryAuthProvider::new();
        provider
            .sign_up(SignUpRequest {
                email: "jane@school.edu",
                password: "password123",
                redirect_to: None,
                data: json!({"role": "counselor"}),
            })
            .await
            .unwrap();

        let err = provider
            .sign_in_with_password("jane@school.edu", "password123")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email not confirmed");

        provider.confirm("jane@school.edu");
        let session = provider
            .sign_in_with_password("jane@school.edu", "password123")
            .await
            .unwrap();
        assert!(session.user.is_some());
        assert_eq!(provider.active_sessions(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_rejected() {
        let provider = MemoryAuthProvider::new();
        provider.with_confirmed_account("jane@school.edu", "pw");
        let err = provider
            .sign_up(SignUpRequest {
                email: "Jane@School.edu",
                password: "other",
                redirect_to: None,
                data: Value::Null,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User already registered");
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let provider = MemoryAuthProvider::new();
        provider.with_confirmed_account("a@b.c", "pw");
        let first = provider.sign_in_with_password("a@b.c", "pw").await.unwrap();

        let second = provider.refresh_session(&first.refresh_token).await.unwrap();
        assert_ne!(first.access_token, second.access_token);
        assert!(provider.refresh_session(&first.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_sign_out_revokes_access_token() {
        let provider = MemoryAuthProvider::new();
        provider.with_confirmed_account("a@b.c", "pw");
        let session = provider.sign_in_with_password("a@b.c", "pw").await.unwrap();

        provider.sign_out(&session.access_token).await.unwrap();
        assert_eq!(provider.active_sessions(), 0);
        assert!(provider.get_user(&session.access_token).await.is_err());
    }

    #[tokio::test]
    async fn test_sign_out_rejects_stale_tokens() {
        let provider = MemoryAuthProvider::new();
        provider.with_confirmed_account("a@b.c", "pw");

        let err = provider.sign_out("access-unknown").await.unwrap_err();
        assert_eq!(err.status(), Some(401));

        provider.set_session_ttl(0);
        let session = provider.sign_in_with_password("a@b.c", "pw").await.unwrap();
        let err = provider.sign_out(&session.access_token).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "invalid JWT: token is expired");
        assert_eq!(provider.sign_out_calls(), 2);
    }

    #[tokio::test]
    async fn test_select_filters_and_orders() {
        let store = MemoryDataStore::new();
        store.seed("records", json!({"level": "College", "date": "2024-03-01"}));
        store.seed("records", json!({"level": "Elementary", "date": "2024-01-01"}));
        store.seed("records", json!({"level": "College", "date": null}));
        store.seed("records", json!({"level": "College", "date": "2024-02-01"}));

        let rows = store
            .select(
                None,
                "records",
                &Query::new().eq("level", "College").order("date", false),
            )
            .await
            .unwrap();
        let dates: Vec<&Value> = rows.iter().map(|r| &r["date"]).collect();
        assert_eq!(dates, vec![&Value::Null, &json!("2024-03-01"), &json!("2024-02-01")]);
    }

    #[tokio::test]
    async fn test_select_single_reports_no_rows() {
        let store = MemoryDataStore::new();
        let err = store
            .select_single(None, "users", &Query::new().eq("auth_user_id", Uuid::nil()))
            .await
            .unwrap_err();
        assert!(err.is_no_rows());
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let store = MemoryDataStore::new();
        let row = store
            .insert(Some("t"), "notes", &json!({"title": "A"}))
            .await
            .unwrap();
        let id = row_id(&row).unwrap();
        assert!(row.get("created_at").is_some());

        store
            .update(Some("t"), "notes", id, &json!({"title": "B"}))
            .await
            .unwrap();
        assert_eq!(store.rows("notes")[0]["title"], "B");

        store.delete(Some("t"), "notes", id).await.unwrap();
        assert!(store.rows("notes").is_empty());
        assert_eq!(store.tokens_seen().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_matching_nothing_is_no_rows() {
        let store = MemoryDataStore::new();
        let id = store.seed("notes", json!({"title": "A"}));

        let err = store.delete(None, "notes", Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_no_rows());

        store.hide_next_delete("notes");
        assert!(store.delete(None, "notes", id).await.unwrap_err().is_no_rows());
        assert_eq!(store.rows("notes").len(), 1);

        store.delete(None, "notes", id).await.unwrap();
        assert!(store.rows("notes").is_empty());
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let store = MemoryDataStore::new();
        store.fail_next("notes", Operation::Insert);

        assert!(store.insert(None, "notes", &json!({})).await.is_err());
        assert!(store.insert(None, "notes", &json!({})).await.is_ok());
    }
}
