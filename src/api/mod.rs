use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::config::BackendConfig;
use crate::error::{DataError, DataResult};

mod auth;
mod error;
mod query;

pub use auth::{AuthSession, AuthUser, SignUp, SignUpMetadata};
pub use error::ApiError;
pub use query::Query;

const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// Client for the hosted backend: table access under `/rest/v1` and
/// session management under `/auth/v1`.
///
/// Cloning is cheap and clones share the signed-in session token.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: &BackendConfig) -> DataResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Adopt (or drop) the bearer token used for subsequent requests.
    pub fn set_access_token(&self, token: Option<String>) {
        let mut guard = self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = token;
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    fn bearer(&self) -> String {
        self.access_token().unwrap_or_else(|| self.anon_key.clone())
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
    }

    /// Send a request and turn any non-success status into an `ApiError`.
    async fn send(&self, request: RequestBuilder) -> DataResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            tracing::debug!("Backend returned {}: {}", status, error_text);
            Err(ApiError::from_status(status, error_text).into())
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> DataResult<T> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `GET /rest/v1/{table}` returning every matching row.
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> DataResult<Vec<T>> {
        tracing::debug!("Selecting from {} with {:?}", table, query);

        let request = self
            .request(Method::GET, &self.rest_url(table))
            .query(&query.to_params());

        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    /// Select at most one row. An empty result is `Ok(None)`, not an error.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> DataResult<Option<T>> {
        let query = query.clone().limit(1);
        let rows: Vec<T> = self.select(table, &query).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row and return its stored representation.
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> DataResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("Inserting into {}", table);

        let request = self
            .request(Method::POST, &self.rest_url(table))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body);

        let response = self.send(request).await?;
        let rows: Vec<T> = Self::read_json(response).await?;
        first_row(table, rows)
    }

    /// Patch every row matching `query` and return the updated rows.
    pub async fn update<B, T>(&self, table: &str, query: &Query, body: &B) -> DataResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("Updating {} with {:?}", table, query);

        let request = self
            .request(Method::PATCH, &self.rest_url(table))
            .query(&query.to_params())
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body);

        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    /// Delete every row matching `query`. Matching nothing is not an error.
    pub async fn delete(&self, table: &str, query: &Query) -> DataResult<()> {
        tracing::debug!("Deleting from {} with {:?}", table, query);

        let request = self
            .request(Method::DELETE, &self.rest_url(table))
            .query(&query.to_params());

        self.send(request).await?;
        Ok(())
    }

    /// Insert-or-update keyed by the unique constraint over `on_conflict`
    /// (a comma separated column list).
    pub async fn upsert<B, T>(&self, table: &str, body: &B, on_conflict: &str) -> DataResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("Upserting into {} on ({})", table, on_conflict);

        let request = self
            .request(Method::POST, &self.rest_url(table))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", MERGE_DUPLICATES)
            .json(body);

        let response = self.send(request).await?;
        let rows: Vec<T> = Self::read_json(response).await?;
        first_row(table, rows)
    }
}

fn first_row<T>(table: &str, rows: Vec<T>) -> DataResult<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| DataError::Decode(format!("{} returned no representation", table)))
}
