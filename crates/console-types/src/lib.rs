// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Shared data model for the Restate console journal engine: identifiers,
//! failure types, both journal wire generations and the invocation summary
//! surface read from the introspection tables.

pub mod errors;
pub mod identifiers;
pub mod invocation;
pub mod journal_v1;
pub mod journal_v2;
pub mod time;
