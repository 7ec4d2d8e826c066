//! PostgREST table client.
//!
//! Implements [`Collection`] against a Supabase-style REST endpoint.
//!
//! ### Wire format
//!
//! - **Endpoint**: `{base_url}/rest/v1/{table}`
//! - **Authentication**: the anon key is sent both as `apikey` and as a
//!   bearer token.
//! - **Reads**: `GET` with `select`, `order`, `offset`, `limit` and an
//!   optional `done=eq.{bool}` predicate. The total comes from a parallel
//!   `HEAD` with `Prefer: count=exact` and the same predicate.
//! - **Writes**: `POST`, `PATCH` and `DELETE` with
//!   `Prefer: return=representation`. Single-row writes select with
//!   `id=eq.{id}`; an empty representation means no row matched.

pub mod error;
pub mod request;
pub mod response;

pub use error::PostgrestError;
pub use request::{CountQuery, ListQuery};
pub use response::ApiError;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use todos_core::{AppConfig, Collection, ConfigError, Error, Item, ItemPatch, ListRequest, NewItem, Page, PageInfo};
use url::Url;

/// Default base URL of a local Supabase stack.
const DEFAULT_BASE_URL: &str = "http://localhost:54321";

const DEFAULT_TABLE: &str = "todos";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_USER_AGENT: &str = "mcp-todos/0.1";

const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_COUNT: &str = "count=exact";

/// PostgREST client configuration.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL, without the `/rest/v1` suffix.
    pub base_url: String,
    /// Anon (public) key.
    pub anon_key: String,
    pub table: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for PostgrestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            anon_key: String::new(),
            table: DEFAULT_TABLE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PostgrestConfig {
    /// Take connection settings from the application config.
    ///
    /// Fails when the URL or anon key is not configured.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let (url, key) = config.require_remote()?;
        Ok(Self {
            base_url: url.to_string(),
            anon_key: key.to_string(),
            table: config.table.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Client for one PostgREST table.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    config: PostgrestConfig,
    endpoint: Url,
}

impl PostgrestClient {
    pub fn new(config: PostgrestConfig) -> Result<Self, PostgrestError> {
        if config.anon_key.is_empty() {
            return Err(PostgrestError::MissingApiKey);
        }

        let endpoint = format!("{}/rest/v1/{}", config.base_url.trim_end_matches('/'), config.table);
        let endpoint = Url::parse(&endpoint).map_err(|e| PostgrestError::InvalidUrl(format!("{endpoint}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PostgrestError::Network(Arc::new(e)))?;

        Ok(Self { http, config, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.endpoint.clone())
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
    }

    /// Send and turn non-success statuses into errors.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, PostgrestError> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(%status, "postgrest response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await?;
        let message = ApiError::describe(&body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PostgrestError::Auth { message }),
            StatusCode::TOO_MANY_REQUESTS => Err(PostgrestError::RateLimited),
            _ => Err(PostgrestError::Http { status: status.as_u16(), message }),
        }
    }

    /// Rows for one page.
    pub async fn fetch_rows(&self, req: &ListRequest) -> Result<Vec<Item>, PostgrestError> {
        let response = self.send(self.request(Method::GET).query(&ListQuery::from(req))).await?;
        let body = response.bytes().await?;
        response::parse_rows(&body)
    }

    /// Total rows matching the request's filter, if the server reports it.
    pub async fn count(&self, req: &ListRequest) -> Result<Option<u64>, PostgrestError> {
        let response = self
            .send(self.request(Method::HEAD).query(&CountQuery::from(req)).header("Prefer", PREFER_COUNT))
            .await?;
        let count = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(response::parse_content_range);
        if count.is_none() {
            tracing::warn!(table = %self.config.table, "count request returned no usable Content-Range");
        }
        Ok(count)
    }

    pub async fn list_page(&self, req: &ListRequest) -> Result<Page<Item>, PostgrestError> {
        let start = Instant::now();
        let (rows, count) = tokio::try_join!(self.fetch_rows(req), self.count(req))?;
        tracing::debug!(
            table = %self.config.table,
            filter = %req.filter,
            offset = req.offset,
            rows = rows.len(),
            ?count,
            "listed page in {:?}",
            start.elapsed()
        );
        Ok(Page::new(rows, PageInfo::compute(count, req.limit, req.offset)))
    }

    pub async fn insert(&self, item: &NewItem) -> Result<Item, PostgrestError> {
        let builder = self.request(Method::POST).header("Prefer", PREFER_REPRESENTATION).json(item);
        let mut rows = self.representation(builder).await?;
        rows.pop().ok_or_else(|| PostgrestError::Parse("insert returned no row".into()))
    }

    pub async fn patch(&self, id: &str, patch: &ItemPatch) -> Result<Item, PostgrestError> {
        let builder = self
            .request(Method::PATCH)
            .query(&request::id_filter(id))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(patch);
        let mut rows = self.representation(builder).await?;
        rows.pop().ok_or_else(|| PostgrestError::MissingRow(id.to_string()))
    }

    /// Delete one row, returning it as it was.
    pub async fn remove(&self, id: &str) -> Result<Item, PostgrestError> {
        let builder = self
            .request(Method::DELETE)
            .query(&request::id_filter(id))
            .header("Prefer", PREFER_REPRESENTATION);
        let mut rows = self.representation(builder).await?;
        rows.pop().ok_or_else(|| PostgrestError::MissingRow(id.to_string()))
    }

    async fn representation(&self, builder: RequestBuilder) -> Result<Vec<Item>, PostgrestError> {
        let response = self.send(builder).await?;
        let body = response.bytes().await?;
        response::parse_rows(&body)
    }
}

#[async_trait]
impl Collection for PostgrestClient {
    fn name(&self) -> &str {
        &self.config.table
    }

    async fn list(&self, req: ListRequest) -> Result<Page<Item>, Error> {
        req.validate().map_err(Error::remote)?;
        Ok(self.list_page(&req).await?)
    }

    async fn create(&self, item: NewItem) -> Result<Item, Error> {
        item.validate().map_err(Error::remote)?;
        let row = self.insert(&item).await?;
        tracing::debug!(table = %self.config.table, id = %row.id, "row inserted");
        Ok(row)
    }

    async fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, Error> {
        patch.validate().map_err(Error::remote)?;
        Ok(self.patch(id, &patch).await?)
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.remove(id).await?;
        tracing::debug!(table = %self.config.table, id, "row deleted");
        Ok(())
    }
}
