// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::time::Duration;

use url::Url;

pub const ADMIN_URL_ENV: &str = "RESTATE_ADMIN_URL";
pub const AUTH_TOKEN_ENV: &str = "RESTATE_AUTH_TOKEN";

const DEFAULT_ADMIN_URL: &str = "http://localhost:9070/";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`crate::QueryClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the admin endpoint serving `/api/query`.
    pub base_url: Url,
    /// Bearer token attached to every request, if set.
    pub bearer_token: Option<String>,
    pub request_timeout: Duration,
}

impl ClientOptions {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            bearer_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Reads the connection settings from the environment, falling back to
    /// the local default endpoint when `RESTATE_ADMIN_URL` is not set.
    pub fn from_env() -> Result<Self, url::ParseError> {
        let base_url = match std::env::var(ADMIN_URL_ENV) {
            Ok(raw) => raw.parse()?,
            Err(_) => DEFAULT_ADMIN_URL.parse()?,
        };
        Ok(Self {
            base_url,
            bearer_token: std::env::var(AUTH_TOKEN_ENV).ok(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
