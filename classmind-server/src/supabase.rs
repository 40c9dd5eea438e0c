use std::time::Duration;

use log::debug;
use reqwest::{header::HeaderValue, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid Supabase URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Row filters and modifiers, rendered as PostgREST query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    params: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Filter::default()
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_owned(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.params.push(("limit".to_owned(), limit.to_string()));
        self
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_owned(), columns.to_owned()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

#[derive(Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
}

/// Table access through the PostgREST API of a Supabase project.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    client: reqwest::Client,
    rest_url: Url,
    api_key: String,
}

impl SupabaseClient {
    pub fn builder() -> SupabaseClientBuilder {
        SupabaseClientBuilder::default()
    }

    pub async fn select<T>(&self, table: &str, filter: &Filter) -> Result<Vec<T>, SupabaseError>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, table, filter)?;
        Self::rows(request.send().await?).await
    }

    pub async fn insert<B, T>(&self, table: &str, body: &B) -> Result<Vec<T>, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, table, &Filter::new())?.json(body);
        Self::rows(request.send().await?).await
    }

    pub async fn update<B, T>(
        &self,
        table: &str,
        body: &B,
        filter: &Filter,
    ) -> Result<Vec<T>, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PATCH, table, filter)?.json(body);
        Self::rows(request.send().await?).await
    }

    pub async fn delete<T>(&self, table: &str, filter: &Filter) -> Result<Vec<T>, SupabaseError>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::DELETE, table, filter)?;
        Self::rows(request.send().await?).await
    }

    fn request(
        &self,
        method: Method,
        table: &str,
        filter: &Filter,
    ) -> Result<RequestBuilder, SupabaseError> {
        let url = self.rest_url.join(table)?;
        debug!("{} {} {:?}", method, url, filter.params());
        Ok(self
            .client
            .request(method, url)
            .query(filter.params())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", HeaderValue::from_static("return=representation")))
    }

    async fn rows<T>(response: Response) -> Result<Vec<T>, SupabaseError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let message = serde_json::from_str::<PostgrestErrorBody>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

pub struct SupabaseClientBuilder {
    client: Option<reqwest::Client>,
    timeout: Duration,
    connect_timeout: Duration,
}

impl Default for SupabaseClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            timeout: TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

impl SupabaseClientBuilder {
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// `project_url` is the project root, e.g. `https://<ref>.supabase.co`.
    pub fn build(
        self,
        project_url: &Url,
        api_key: impl Into<String>,
    ) -> Result<SupabaseClient, SupabaseError> {
        let client = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .connect_timeout(self.connect_timeout)
                .build()?,
        };
        let mut root = project_url.clone();
        if !root.path().ends_with('/') {
            root.set_path(&format!("{}/", root.path()));
        }
        Ok(SupabaseClient {
            client,
            rest_url: root.join("rest/v1/")?,
            api_key: api_key.into(),
        })
    }
}
