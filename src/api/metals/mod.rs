// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Metal price API endpoints
//!
//! Provides `/api/metals` and `/api/metals/{name}`.

pub mod handler;

pub use handler::{get_all_handler, get_one_handler, FETCHED_AT_HEADER};
