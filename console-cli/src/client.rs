// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! `reqwest`-backed API client.

use bencher_console_core::config::ConsoleConfig;
use bencher_console_core::{ApiClient, ConsoleError, ConsoleResult};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::error::CliError;

pub struct HttpClient {
    client: Client,
    /// Bearer token, present only when the header is to be attached.
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ConsoleConfig, env_token: Option<String>) -> Result<Self, CliError> {
        let client = Client::builder().timeout(config.api.timeout).build()?;

        let token = if config.auth.attach_header {
            let token = config.auth.resolve_token(env_token);
            if token.is_none() {
                tracing::warn!("Auth header enabled but no token configured");
            }
            token
        } else {
            None
        };

        Ok(Self { client, token })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn decode(url: &str, response: Response) -> ConsoleResult<Value> {
    response
        .json::<Value>()
        .await
        .map_err(|e| ConsoleError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

impl ApiClient for HttpClient {
    async fn get(&self, url: &str) -> ConsoleResult<Value> {
        let fetch_failed = |reason: String| ConsoleError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| fetch_failed(format!("Request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(fetch_failed(format!("HTTP {}", response.status())));
        }
        decode(url, response).await
    }

    async fn post(&self, url: &str, body: &Value) -> ConsoleResult<Value> {
        let submit_failed = |reason: String| ConsoleError::SubmitFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| submit_failed(format!("Request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(submit_failed(format!("HTTP {}", response.status())));
        }
        decode(url, response).await
    }
}
