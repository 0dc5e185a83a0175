use bon::Builder;
use core::fmt;
use futures_util::stream::BoxStream;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::Arc;

use healthhero_ox_common::request_builder::{Endpoint, HttpMethod, RequestBuilder, RequestConfig};

use crate::{
    analytics::{
        DistributionBucket, DistributionMetric, HealthOverview, TrendMetric, TrendPeriod,
        TrendSeries, UserHealthSummary,
    },
    chat::{self, ChatReply, ChatRequest, ChatSink, ChatStreamSession, StreamFrame},
    error::HealthHeroRequestError,
    records::{
        ExerciseLog, HealthRecord, NewExerciseLog, NewHealthRecord, NewSleepRecord, SleepRecord,
    },
    session::{MemorySession, SessionProvider},
    users::{LoginRequest, LoginResponse, RegisterRequest, User},
};

/// Default deployment address; point `base_url` elsewhere in production
const BASE_URL: &str = "http://localhost:8000/api/v1";

/// Route roots under the versioned API prefix
const USERS_URL: &str = "users";
const LOGIN_URL: &str = "users/login";
const HEALTH_DATA_URL: &str = "health-data";
const EXERCISE_LOG_URL: &str = "exercise-log";
const SLEEP_RECORD_URL: &str = "sleep-record";
const ANALYTICS_URL: &str = "health-analytics";
const CHAT_URL: &str = "ai/chat";
const CHAT_STREAM_URL: &str = "ai/chat/stream";
const HEALTH_CHAT_URL: &str = "ai/health/chat";
const HEALTH_CHAT_STREAM_URL: &str = "ai/health/chat/stream";

/// A fresh anonymous session for clients built without one
fn default_session() -> Arc<dyn SessionProvider> {
    Arc::new(MemorySession::new())
}

/// Client for the Health Hero backend.
///
/// Cheap to clone; the session provider is shared, so a login stored there is
/// picked up by every clone on its next request.
#[derive(Clone, Builder)]
pub struct HealthHero {
    #[builder(default)]
    pub(crate) client: reqwest::Client,
    #[builder(default = BASE_URL.to_string(), into)]
    pub(crate) base_url: String,
    #[builder(default = default_session())]
    pub(crate) session: Arc<dyn SessionProvider>,
    #[builder(default)]
    pub(crate) headers: HashMap<String, String>,
}

impl HealthHero {
    /// Create a client against the default base URL with a fresh session
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// The session provider this client authenticates from
    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    /// Create a request helper snapshotting the current auth state.
    ///
    /// Built per call so a token stored after construction is used
    /// immediately.
    fn request_helper(&self) -> RequestBuilder {
        let mut config = RequestConfig::new(self.base_url.as_str());

        if let Some(token) = self.session.token() {
            config = config.with_bearer_token(token);
        }
        for (key, value) in &self.headers {
            config = config.with_header(key, value);
        }

        RequestBuilder::new(self.client.clone(), config)
    }

    /// Generic method for API requests that return JSON
    async fn api_request<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
    ) -> Result<T, HealthHeroRequestError> {
        Ok(self.request_helper().request(&endpoint).await?)
    }

    /// Generic method for API requests with JSON body
    async fn api_request_with_body<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<T, HealthHeroRequestError> {
        Ok(self
            .request_helper()
            .request_json(&endpoint, Some(body))
            .await?)
    }

    /// Generic method for delete requests
    async fn api_delete(&self, endpoint: Endpoint) -> Result<(), HealthHeroRequestError> {
        Ok(self.request_helper().request_unit(&endpoint).await?)
    }

    /// Generic method for streaming chat requests
    fn api_stream<B: Serialize>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> BoxStream<'static, Result<StreamFrame, HealthHeroRequestError>> {
        chat::frame_stream(self.request_helper().stream(endpoint, Some(body)))
    }
}

// Accounts
impl HealthHero {
    /// Exchange credentials for a token and the user row.
    ///
    /// The result is usually handed to [`MemorySession::store_login`] so
    /// subsequent requests carry the bearer header.
    pub async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<LoginResponse, HealthHeroRequestError> {
        let endpoint = Endpoint::new(LOGIN_URL, HttpMethod::Post);
        self.api_request_with_body(endpoint, request).await
    }

    /// Register a new account
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<User, HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{USERS_URL}/"), HttpMethod::Post);
        self.api_request_with_body(endpoint, request).await
    }

    /// List all registered users
    pub async fn list_users(&self) -> Result<Vec<User>, HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{USERS_URL}/"), HttpMethod::Get);
        self.api_request(endpoint).await
    }
}

// Health data records
impl HealthHero {
    pub async fn create_health_record(
        &self,
        record: &NewHealthRecord,
    ) -> Result<HealthRecord, HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{HEALTH_DATA_URL}/"), HttpMethod::Post);
        self.api_request_with_body(endpoint, record).await
    }

    /// A user's vitals rows, newest first
    pub async fn list_health_records(
        &self,
        user_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<HealthRecord>, HealthHeroRequestError> {
        let endpoint = Endpoint::new(
            format!("{HEALTH_DATA_URL}/user/{user_id}"),
            HttpMethod::Get,
        )
        .with_query_params(limit_params(limit));
        self.api_request(endpoint).await
    }

    pub async fn get_health_record(
        &self,
        record_id: i64,
    ) -> Result<HealthRecord, HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{HEALTH_DATA_URL}/{record_id}"), HttpMethod::Get);
        self.api_request(endpoint).await
    }

    pub async fn delete_health_record(
        &self,
        record_id: i64,
    ) -> Result<(), HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{HEALTH_DATA_URL}/{record_id}"), HttpMethod::Delete);
        self.api_delete(endpoint).await
    }
}

// Exercise logs
impl HealthHero {
    pub async fn create_exercise_log(
        &self,
        log: &NewExerciseLog,
    ) -> Result<ExerciseLog, HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{EXERCISE_LOG_URL}/"), HttpMethod::Post);
        self.api_request_with_body(endpoint, log).await
    }

    pub async fn list_exercise_logs(
        &self,
        user_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<ExerciseLog>, HealthHeroRequestError> {
        let endpoint = Endpoint::new(
            format!("{EXERCISE_LOG_URL}/user/{user_id}"),
            HttpMethod::Get,
        )
        .with_query_params(limit_params(limit));
        self.api_request(endpoint).await
    }

    pub async fn get_exercise_log(
        &self,
        log_id: i64,
    ) -> Result<ExerciseLog, HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{EXERCISE_LOG_URL}/{log_id}"), HttpMethod::Get);
        self.api_request(endpoint).await
    }

    pub async fn delete_exercise_log(&self, log_id: i64) -> Result<(), HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{EXERCISE_LOG_URL}/{log_id}"), HttpMethod::Delete);
        self.api_delete(endpoint).await
    }
}

// Sleep records
impl HealthHero {
    pub async fn create_sleep_record(
        &self,
        record: &NewSleepRecord,
    ) -> Result<SleepRecord, HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{SLEEP_RECORD_URL}/"), HttpMethod::Post);
        self.api_request_with_body(endpoint, record).await
    }

    pub async fn list_sleep_records(
        &self,
        user_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<SleepRecord>, HealthHeroRequestError> {
        let endpoint = Endpoint::new(
            format!("{SLEEP_RECORD_URL}/user/{user_id}"),
            HttpMethod::Get,
        )
        .with_query_params(limit_params(limit));
        self.api_request(endpoint).await
    }

    pub async fn get_sleep_record(
        &self,
        sleep_id: i64,
    ) -> Result<SleepRecord, HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{SLEEP_RECORD_URL}/{sleep_id}"), HttpMethod::Get);
        self.api_request(endpoint).await
    }

    pub async fn delete_sleep_record(&self, sleep_id: i64) -> Result<(), HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{SLEEP_RECORD_URL}/{sleep_id}"), HttpMethod::Delete);
        self.api_delete(endpoint).await
    }
}

// Analytics
impl HealthHero {
    /// Aggregate stats, optionally scoped to one user
    pub async fn health_overview(
        &self,
        user_id: Option<i64>,
    ) -> Result<HealthOverview, HealthHeroRequestError> {
        let endpoint = Endpoint::new(format!("{ANALYTICS_URL}/overview"), HttpMethod::Get)
            .with_query_params(user_params(user_id));
        self.api_request(endpoint).await
    }

    /// Daily averages of one metric over the given window
    pub async fn health_trends(
        &self,
        metric: TrendMetric,
        user_id: Option<i64>,
        period: TrendPeriod,
    ) -> Result<TrendSeries, HealthHeroRequestError> {
        let mut query_params = user_params(user_id);
        query_params.push(("period".to_string(), period.to_string()));

        let endpoint = Endpoint::new(format!("{ANALYTICS_URL}/trends/{metric}"), HttpMethod::Get)
            .with_query_params(query_params);
        self.api_request(endpoint).await
    }

    /// Per-user snapshots ranked by the backend's health score
    pub async fn users_health_summary(
        &self,
        limit: Option<u32>,
        user_id: Option<i64>,
    ) -> Result<Vec<UserHealthSummary>, HealthHeroRequestError> {
        let mut query_params = limit_params(limit);
        query_params.extend(user_params(user_id));

        let endpoint = Endpoint::new(format!("{ANALYTICS_URL}/users/summary"), HttpMethod::Get)
            .with_query_params(query_params);
        self.api_request(endpoint).await
    }

    /// Category counts for one distribution metric
    pub async fn health_distribution(
        &self,
        metric: DistributionMetric,
        user_id: Option<i64>,
    ) -> Result<Vec<DistributionBucket>, HealthHeroRequestError> {
        let endpoint = Endpoint::new(
            format!("{ANALYTICS_URL}/distribution/{metric}"),
            HttpMethod::Get,
        )
        .with_query_params(user_params(user_id));
        self.api_request(endpoint).await
    }
}

// AI assistant
impl HealthHero {
    /// Ask a general question and wait for the full reply
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, HealthHeroRequestError> {
        let endpoint = Endpoint::new(CHAT_URL, HttpMethod::Post);
        self.api_request_with_body(endpoint, request).await
    }

    /// Ask a personalized question; `request.user_data` should be set
    pub async fn health_chat(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatReply, HealthHeroRequestError> {
        let endpoint = Endpoint::new(HEALTH_CHAT_URL, HttpMethod::Post);
        self.api_request_with_body(endpoint, request).await
    }

    /// Open a streamed general chat turn.
    ///
    /// The stream is finite and not restartable: it ends at a terminal frame
    /// or when the transport closes, and retrying means a new request.
    pub fn chat_stream(
        &self,
        request: &ChatRequest,
    ) -> BoxStream<'static, Result<StreamFrame, HealthHeroRequestError>> {
        let endpoint = Endpoint::new(CHAT_STREAM_URL, HttpMethod::Post);
        self.api_stream(&endpoint, request)
    }

    /// Open a streamed personalized chat turn
    pub fn health_chat_stream(
        &self,
        request: &ChatRequest,
    ) -> BoxStream<'static, Result<StreamFrame, HealthHeroRequestError>> {
        let endpoint = Endpoint::new(HEALTH_CHAT_STREAM_URL, HttpMethod::Post);
        self.api_stream(&endpoint, request)
    }

    /// Stream a general chat turn to completion, reporting through the sink,
    /// and resolve to the final accumulated text
    pub async fn chat_stream_text<S: ChatSink>(
        &self,
        request: &ChatRequest,
        sink: &mut S,
    ) -> Result<String, HealthHeroRequestError> {
        ChatStreamSession::run(self.chat_stream(request), sink).await
    }

    /// Stream a personalized chat turn to completion, reporting through the
    /// sink
    pub async fn health_chat_stream_text<S: ChatSink>(
        &self,
        request: &ChatRequest,
        sink: &mut S,
    ) -> Result<String, HealthHeroRequestError> {
        ChatStreamSession::run(self.health_chat_stream(request), sink).await
    }
}

/// Optional `limit` query parameter
fn limit_params(limit: Option<u32>) -> Vec<(String, String)> {
    limit
        .map(|limit| vec![("limit".to_string(), limit.to_string())])
        .unwrap_or_default()
}

/// Optional `user_id` query parameter
fn user_params(user_id: Option<i64>) -> Vec<(String, String)> {
    user_id
        .map(|user_id| vec![("user_id".to_string(), user_id.to_string())])
        .unwrap_or_default()
}

impl Default for HealthHero {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HealthHero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthHero")
            .field("client", &self.client)
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
