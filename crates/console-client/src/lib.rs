// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Client for the runtime's introspection SQL endpoint. Sends statements to
//! `POST /api/query` and deserializes the JSON row output into typed row
//! structs. The journal engine sits on top of this crate and never speaks
//! HTTP itself.

mod client;
mod errors;
mod options;
mod rows;
pub mod sql;

pub use client::QueryClient;
pub use errors::{ApiError, ApiErrorBody, Error};
pub use options::ClientOptions;
pub use rows::{InvocationRow, JournalEventRow, JournalRow};
