//! Zuper REST API adapter implementing every client port.

mod rate_limit;
mod teams;
mod users;
mod wire;

use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;
use zuper_application::{Annotated, Paged, SyncContext};
use zuper_core::{AppError, AppResult};
use zuper_domain::pagination::next_token;
use zuper_domain::{MutationReceipt, PageOptions};

use self::rate_limit::rate_limit_annotations;
use self::wire::{ListEnvelope, MessageEnvelope};

/// Base URL used when none is configured.
pub const DEFAULT_ZUPER_API_URL: &str = "https://staging.zuperpro.com";

const API_KEY_HEADER: &str = "x-api-key";
const JSON: &str = "application/json";

/// HTTP client for the Zuper API authenticated with an API key.
#[derive(Clone)]
pub struct ZuperHttpClient {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl ZuperHttpClient {
    /// Creates a client. Fails when `base_url` is not an absolute http(s) URL
    /// with a host.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        http_client: reqwest::Client,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|error| {
            AppError::Configuration(format!("invalid Zuper API URL '{base_url}': {error}"))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AppError::Configuration(format!(
                "Zuper API URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }
        if base_url.host_str().is_none_or(str::is_empty) {
            return Err(AppError::Configuration(
                "Zuper API URL must include a host".to_owned(),
            ));
        }

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Configuration(format!("Zuper API URL '{}' cannot be a base", self.base_url))
            })?
            .clear()
            .extend(segments);

        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
    }

    async fn get<T>(&self, ctx: &SyncContext, operation: &str, url: Url) -> AppResult<Annotated<T>>
    where
        T: DeserializeOwned,
    {
        self.execute(ctx, operation, self.request(Method::GET, url))
            .await
    }

    async fn send_json<B, T>(
        &self,
        ctx: &SyncContext,
        operation: &str,
        method: Method,
        url: Url,
        body: &B,
    ) -> AppResult<Annotated<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ctx, operation, self.request(method, url).json(body))
            .await
    }

    async fn list<T>(
        &self,
        ctx: &SyncContext,
        operation: &str,
        segments: &[&str],
        options: &PageOptions,
    ) -> AppResult<Paged<T>>
    where
        T: DeserializeOwned,
    {
        let page = options.page()?;
        let limit = options.effective_page_size();
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());

        let response: Annotated<ListEnvelope<T>> = self.get(ctx, operation, url).await?;
        let envelope = response.value;
        debug!(
            operation,
            page,
            current_page = envelope.current_page,
            total_pages = envelope.total_pages,
            items = envelope.data.len(),
            "fetched zuper page"
        );

        Ok(Paged::new(
            envelope.data,
            next_token(envelope.current_page, envelope.total_pages),
            response.annotations,
        ))
    }

    async fn mutate<B>(
        &self,
        ctx: &SyncContext,
        operation: &str,
        method: Method,
        url: Url,
        body: &B,
    ) -> AppResult<Annotated<MutationReceipt>>
    where
        B: Serialize + ?Sized,
    {
        let response: Annotated<MessageEnvelope> =
            self.send_json(ctx, operation, method, url, body).await?;
        let envelope = response.value;

        Ok(Annotated::new(
            MutationReceipt {
                kind: envelope.kind,
                title: envelope.title,
                message: envelope.message,
            },
            response.annotations,
        ))
    }

    async fn execute<T>(
        &self,
        ctx: &SyncContext,
        operation: &str,
        request: RequestBuilder,
    ) -> AppResult<Annotated<T>>
    where
        T: DeserializeOwned,
    {
        ctx.run(operation, async {
            let response = request.send().await.map_err(|error| {
                AppError::Transport(format!("{operation} request failed: {error}"))
            })?;
            let status = response.status();
            let annotations = rate_limit_annotations(status, response.headers(), Utc::now());
            let body = response.bytes().await.map_err(|error| {
                AppError::Transport(format!("{operation} response could not be read: {error}"))
            })?;

            if !status.is_success() {
                return Err(upstream_error(operation, status, &body));
            }

            let value = serde_json::from_slice(&body).map_err(|error| AppError::Upstream {
                status: status.as_u16(),
                kind: "decode".to_owned(),
                title: format!("{operation} returned an unexpected body"),
                message: error.to_string(),
            })?;

            Ok(Annotated::new(value, annotations))
        })
        .await
    }
}

fn upstream_error(operation: &str, status: StatusCode, body: &[u8]) -> AppError {
    let envelope = serde_json::from_slice::<MessageEnvelope>(body).unwrap_or_else(|_| {
        MessageEnvelope {
            message: String::from_utf8_lossy(body).into_owned(),
            ..MessageEnvelope::default()
        }
    });
    warn!(
        operation,
        status = status.as_u16(),
        title = %envelope.title,
        message = %envelope.message,
        "zuper request failed"
    );

    if status == StatusCode::NOT_FOUND {
        let detail = if envelope.message.is_empty() {
            status.to_string()
        } else {
            envelope.message
        };
        return AppError::NotFound(format!("{operation}: {detail}"));
    }

    AppError::Upstream {
        status: status.as_u16(),
        kind: envelope.kind,
        title: envelope.title,
        message: envelope.message,
    }
}
