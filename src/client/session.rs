//! HTTP session shared by the listing and detail clients
//!
//! A `Session` owns one reqwest client with a cookie jar. It is built once
//! per crawl, warmed up with a single anonymous GET of the landing page, and
//! then reused for every query so cookies set by the landing page ride along.

use crate::config::Config;
use crate::HarvestError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, ORIGIN, REFERER};
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Everything needed to build a session, independent of the config file
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub base_url: Url,
    pub graphql_path: String,
    pub landing_path: String,
    pub user_agent: String,
    pub accept_language: String,
    /// Applied to every listing and detail request
    pub request_timeout: Duration,
    /// Applied to the warm-up request only
    pub bootstrap_timeout: Duration,
}

impl SessionOptions {
    /// Builds session options from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        Ok(Self {
            base_url: Url::parse(&config.source.base_url)?,
            graphql_path: config.source.graphql_path.clone(),
            landing_path: config.source.landing_path.clone(),
            user_agent: config.client.user_agent.clone(),
            accept_language: config.client.accept_language.clone(),
            request_timeout: config.crawl.request_timeout(),
            bootstrap_timeout: config.crawl.bootstrap_timeout(),
        })
    }

    /// Options pointing at `base_url` with the standard paths and short timeouts
    pub fn for_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            graphql_path: "/graphql".to_string(),
            landing_path: "/problemset/".to_string(),
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            request_timeout: Duration::from_secs(5),
            bootstrap_timeout: Duration::from_secs(5),
        }
    }
}

/// Builds an HTTP client with a cookie store and browser-like headers
pub fn build_http_client(options: &SessionOptions) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert("DNT", HeaderValue::from_static("1"));
    match HeaderValue::from_str(&options.accept_language) {
        Ok(value) => {
            headers.insert(ACCEPT_LANGUAGE, value);
        }
        Err(_) => tracing::warn!(
            "Ignoring invalid accept-language value: {:?}",
            options.accept_language
        ),
    }

    Client::builder()
        .user_agent(options.user_agent.as_str())
        .default_headers(headers)
        .cookie_store(true)
        .timeout(options.request_timeout)
        .connect_timeout(options.request_timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// One crawl's HTTP session
#[derive(Debug)]
pub struct Session {
    client: Client,
    base_url: Url,
    graphql_url: Url,
    landing_url: Url,
    origin: String,
    bootstrap_timeout: Duration,
}

impl Session {
    /// Creates a session; no request is made until `bootstrap` or a query
    pub fn new(options: &SessionOptions) -> Result<Self, HarvestError> {
        let client = build_http_client(options)?;
        let graphql_url = options.base_url.join(&options.graphql_path)?;
        let landing_url = options.base_url.join(&options.landing_path)?;
        let origin = options.base_url.origin().ascii_serialization();

        Ok(Self {
            client,
            base_url: options.base_url.clone(),
            graphql_url,
            landing_url,
            origin,
            bootstrap_timeout: options.bootstrap_timeout,
        })
    }

    /// Base URL used to derive canonical problem URLs
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of the query endpoint
    pub fn graphql_url(&self) -> &Url {
        &self.graphql_url
    }

    /// Visits the landing page once to pick up cookies
    ///
    /// Failure is logged and reported as `false`; queries are attempted
    /// regardless and fail on their own terms if the cookies were required.
    pub async fn bootstrap(&self) -> bool {
        tracing::info!("Initializing session via {}", self.landing_url);

        match self
            .client
            .get(self.landing_url.clone())
            .timeout(self.bootstrap_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Session initialized");
                true
            }
            Ok(response) => {
                tracing::warn!(
                    "Session initialization returned HTTP {}",
                    response.status().as_u16()
                );
                false
            }
            Err(e) => {
                tracing::warn!("Session initialization failed: {}", e);
                false
            }
        }
    }

    /// Posts a `{query, variables}` body to the query endpoint
    ///
    /// `referer_path` is resolved against the base URL and sent as `Referer`.
    pub async fn post_query<B: Serialize + ?Sized>(
        &self,
        body: &B,
        referer_path: &str,
    ) -> Result<Response, reqwest::Error> {
        let referer = self
            .base_url
            .join(referer_path)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| self.base_url.to_string());

        self.client
            .post(self.graphql_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(REFERER, referer)
            .header(ORIGIN, self.origin.as_str())
            .json(body)
            .send()
            .await
    }
}
