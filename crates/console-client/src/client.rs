// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A wrapper client for the introspection SQL HTTP service.

use http::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::errors::{ApiError, Error};
use crate::options::ClientOptions;

#[derive(Serialize, Debug, Clone)]
struct SqlQueryRequest {
    query: String,
}

#[derive(serde::Deserialize, Debug)]
struct SqlJsonResponse<T> {
    rows: Vec<T>,
}

/// A handy client for the introspection SQL HTTP service.
#[derive(Clone)]
pub struct QueryClient {
    inner: reqwest::Client,
    base_url: reqwest::Url,
    bearer_token: Option<String>,
}

impl QueryClient {
    pub fn new(options: ClientOptions) -> Result<Self, Error> {
        let raw_client = reqwest::Client::builder()
            .user_agent(format!(
                "{}/{} {}-{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH,
            ))
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self {
            inner: raw_client,
            base_url: options.base_url,
            bearer_token: options.bearer_token,
        })
    }

    /// Runs one SQL statement and deserializes every returned row into `T`.
    /// The endpoint streams rows as a JSON document, so column names must
    /// match `T`'s fields.
    pub async fn run_json_query<T: DeserializeOwned>(
        &self,
        query: String,
    ) -> Result<Vec<T>, Error> {
        let url = self.base_url.join("/api/query")?;

        debug!("Sending request sql query '{}'", query);
        let mut request = self
            .inner
            .request(reqwest::Method::POST, url)
            .header(ACCEPT, "application/json")
            .json(&SqlQueryRequest { query });
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await?;

        let http_status_code = resp.status();
        let url = resp.url().clone();
        if !http_status_code.is_success() {
            let body = resp.text().await?;
            info!("Response from {} ({})", url, http_status_code);
            info!("  {}", body);
            return Err(Error::Api(ApiError {
                http_status_code,
                url,
                body: serde_json::from_str(&body).unwrap_or_else(|_| body.into()),
            }));
        }

        let response: SqlJsonResponse<T> = serde_json::from_slice(&resp.bytes().await?)?;
        Ok(response.rows)
    }
}

// Ensure that client is Send + Sync. Compiler will fail if it's not.
const _: () = {
    const fn assert_send<T: Send + Sync>() {}
    assert_send::<QueryClient>();
};
