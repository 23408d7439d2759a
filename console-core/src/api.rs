// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! HTTP seam between the console engine and the Bencher API.
//!
//! The engine never talks to the network directly. Screens are handed an
//! [`ApiClient`]; the CLI provides one backed by `reqwest`, tests provide a
//! recording mock.

use std::future::Future;

use serde_json::Value;

use crate::error::ConsoleResult;

/// JSON-over-HTTP access to the API.
///
/// Implementations report transport and status failures as
/// [`crate::ConsoleError::FetchFailed`] for reads and
/// [`crate::ConsoleError::SubmitFailed`] for writes, and undecodable bodies as
/// [`crate::ConsoleError::MalformedResponse`].
pub trait ApiClient {
    /// GET `url` and decode the JSON body.
    fn get(&self, url: &str) -> impl Future<Output = ConsoleResult<Value>> + Send;

    /// POST `body` as JSON to `url` and decode the JSON response.
    fn post(&self, url: &str, body: &Value) -> impl Future<Output = ConsoleResult<Value>> + Send;
}
