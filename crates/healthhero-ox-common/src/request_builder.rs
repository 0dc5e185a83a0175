use crate::{
    error::{self, CommonRequestError},
    streaming::SseParser,
};
use async_stream::try_stream;
use futures_util::stream::{self, BoxStream};
use reqwest::{Method, RequestBuilder as ReqwestRequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method for API endpoints
#[derive(Debug, Clone)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Represents an API endpoint with its configuration
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub query_params: Option<Vec<(String, String)>>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            query_params: None,
        }
    }

    pub fn with_query_params(mut self, params: Vec<(String, String)>) -> Self {
        self.query_params = Some(params);
        self
    }
}

/// Configuration for request building.
///
/// The bearer token is optional: some backend routes are unauthenticated, and
/// the client attaches the header opportunistically when a token exists.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub default_headers: HashMap<String, String>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            default_headers: HashMap::new(),
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }
}

/// Generic request builder that handles the common HTTP patterns
#[derive(Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(client: reqwest::Client, config: RequestConfig) -> Self {
        Self { client, config }
    }

    /// Build a reqwest RequestBuilder for the given endpoint
    pub fn build_request(&self, endpoint: &Endpoint) -> ReqwestRequestBuilder {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        );
        let method: Method = endpoint.method.clone().into();

        let mut req = self.client.request(method, &url);

        if let Some(ref params) = endpoint.query_params {
            req = req.query(&params);
        }

        if let Some(ref token) = self.config.bearer_token {
            req = req.bearer_auth(token);
        }

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        if matches!(endpoint.method, HttpMethod::Post) {
            req = req.header("content-type", "application/json");
        }

        req
    }

    /// Execute a request with JSON body and return deserialized response
    pub async fn request_json<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<T, CommonRequestError> {
        let mut req = self.build_request(endpoint);

        if let Some(body) = body {
            req = req.json(body);
        }

        tracing::debug!(path = %endpoint.path, "sending request");
        let res = req.send().await?;
        self.handle_response(res).await
    }

    /// Execute a request without body and return deserialized response
    pub async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, CommonRequestError> {
        self.request_json(endpoint, None::<&()>).await
    }

    /// Execute a request and return unit type (for delete operations)
    pub async fn request_unit(&self, endpoint: &Endpoint) -> Result<(), CommonRequestError> {
        let req = self.build_request(endpoint);
        let res = req.send().await?;

        if res.status().is_success() {
            Ok(())
        } else {
            let status = res.status();
            let bytes = res.bytes().await?;
            Err(error::parse_error_response(status, &bytes))
        }
    }

    /// Execute a streaming request, yielding the payload of each data frame.
    ///
    /// Frames are raw `data: `-line payloads; deserialization (and the policy
    /// for payloads that fail it) is the caller's concern. The stream is
    /// finite and ends when the transport closes.
    pub fn stream<B: Serialize>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> BoxStream<'static, Result<String, CommonRequestError>> {
        let body_value = match body.map(serde_json::to_value).transpose() {
            Ok(value) => value,
            Err(e) => {
                return Box::pin(stream::once(async move { Err(CommonRequestError::Json(e)) }));
            }
        };

        let builder = self.clone();
        let endpoint = endpoint.clone();

        Box::pin(try_stream! {
            let mut req = builder.build_request(&endpoint);

            if let Some(ref body_value) = body_value {
                req = req.json(body_value);
            }

            tracing::debug!(path = %endpoint.path, "opening stream");
            let response = req.send().await?;
            let status = response.status();

            if !status.is_success() {
                let bytes = response.bytes().await?;
                Err(error::parse_error_response(status, &bytes))?;
            } else {
                let mut parser = SseParser::new(response);

                while let Some(payload) = parser.next_frame().await? {
                    yield payload;
                }
            }
        })
    }

    /// Handle response and parse errors
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
    ) -> Result<T, CommonRequestError> {
        let status = res.status();
        let bytes = res.bytes().await?;

        if status.is_success() {
            match serde_json::from_slice::<T>(&bytes) {
                Ok(val) => Ok(val),
                Err(e) => {
                    let body_str = String::from_utf8_lossy(&bytes);
                    Err(CommonRequestError::UnexpectedResponse(format!(
                        "HTTP {} but failed to decode JSON: {}; body: {}",
                        status.as_u16(),
                        e,
                        body_str
                    )))
                }
            }
        } else {
            Err(error::parse_error_response(status, &bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_carries_query_params() {
        let endpoint = Endpoint::new("health-data/user/7", HttpMethod::Get)
            .with_query_params(vec![("limit".to_string(), "50".to_string())]);

        assert_eq!(endpoint.path, "health-data/user/7");
        assert_eq!(
            endpoint.query_params,
            Some(vec![("limit".to_string(), "50".to_string())])
        );
    }

    #[test]
    fn config_holds_optional_bearer() {
        let config = RequestConfig::new("http://localhost:8000/api/v1");
        assert!(config.bearer_token.is_none());

        let config = config.with_bearer_token("t0k3n");
        assert_eq!(config.bearer_token.as_deref(), Some("t0k3n"));
    }
}
