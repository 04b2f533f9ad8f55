//! Request orchestrator and generic resource operations.

use std::sync::Arc;

use arc_swap::ArcSwap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::api::types::{ApiError, ApiResult, Href};
use crate::config::ClientConfig;
use crate::http::request::join_href;
use crate::http::{ApiRequest, ApiResponse, Transport};
use crate::label_groups::LabelGroupTable;
use crate::resilience::{retry_on_rate_limit, RateLimitPolicy, Sleeper, TokioSleeper};

/// Client for the policy server REST API.
pub struct PolicyClient {
    config: ClientConfig,
    transport: Transport,
    sleeper: Arc<dyn Sleeper>,
    rate_limit: RateLimitPolicy,
    /// Snapshot replaced wholesale by every successful label group fetch.
    pub(crate) label_groups: ArcSwap<LabelGroupTable>,
}

impl PolicyClient {
    /// Create a client that sleeps on the tokio timer.
    ///
    /// `config` is used as given. The `POLICY_CLIENT_FORCE_ASYNC` and
    /// `POLICY_CLIENT_VERBOSE` switches are applied by
    /// [`load_config`](crate::config::load_config); a config built in code
    /// picks them up only through
    /// [`apply_env_switches`](crate::config::apply_env_switches).
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Self::with_sleeper(config, Arc::new(TokioSleeper))
    }

    /// Create a client with a custom sleeper for backoff and polling pauses.
    pub fn with_sleeper(config: ClientConfig, sleeper: Arc<dyn Sleeper>) -> ApiResult<Self> {
        let transport = Transport::new(&config, sleeper.clone())?;
        let rate_limit = RateLimitPolicy::from_config(&config.requests);

        tracing::info!(
            base_url = %config.base_url(),
            org_id = config.server.org_id,
            force_async = config.requests.force_async,
            "Policy client initialized"
        );

        Ok(Self {
            config,
            transport,
            sleeper,
            rate_limit,
            label_groups: ArcSwap::from_pointee(LabelGroupTable::default()),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a request, retrying on 429 with the fixed backoff.
    ///
    /// Any async polling is re-run from scratch on every retry.
    pub async fn request(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "api_request",
            %request_id,
            method = %request.method(),
            url = %request.url(),
        );

        let transport = &self.transport;
        let request = &request;
        retry_on_rate_limit(self.rate_limit, self.sleeper.as_ref(), move || transport.execute(request))
            .instrument(span)
            .await
    }

    /// GET an organization-scoped collection, decoding a JSON array.
    pub async fn get_collection<T, K, V>(
        &self,
        endpoint: &str,
        async_mode: bool,
        query: &[(K, V)],
    ) -> ApiResult<(Vec<T>, ApiResponse)>
    where
        T: DeserializeOwned,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.org_url(endpoint)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k.as_ref(), v.as_ref());
            }
        }

        let response = self
            .request(ApiRequest::new(Method::GET, url).with_async(async_mode))
            .await?;
        let items = response.json()?;
        Ok((items, response))
    }

    /// GET a single object by href.
    pub async fn get_by_href<R: DeserializeOwned>(&self, href: &Href) -> ApiResult<(R, ApiResponse)> {
        let url = self.href_url(href)?;
        let response = self.request(ApiRequest::new(Method::GET, url)).await?;
        let item = response.json()?;
        Ok((item, response))
    }

    /// POST a JSON body to an organization-scoped endpoint and decode the
    /// created object.
    pub async fn post<T, R>(&self, endpoint: &str, body: &T) -> ApiResult<(R, ApiResponse)>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.org_url(endpoint)?;
        let response = self
            .request(ApiRequest::new(Method::POST, url).with_json(body)?)
            .await?;
        let created = response.json()?;
        Ok((created, response))
    }

    /// PUT a JSON body to an object's own href.
    pub async fn put<T>(&self, href: &Href, body: &T) -> ApiResult<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        let url = self.href_url(href)?;
        self.request(ApiRequest::new(Method::PUT, url).with_json(body)?)
            .await
    }

    fn org_url(&self, endpoint: &str) -> ApiResult<Url> {
        join_href(&self.config.org_url(), endpoint)
    }

    fn href_url(&self, href: &Href) -> ApiResult<Url> {
        if href.is_empty() {
            return Err(ApiError::MissingHref);
        }
        join_href(&self.config.base_url(), href.as_str())
    }
}
