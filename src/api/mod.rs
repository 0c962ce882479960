// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod metals;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::{HealthResponse, StatusResponse};
pub use http_server::{bind_listener, router, start_server, AppState};
pub use metals::{get_all_handler, get_one_handler, FETCHED_AT_HEADER};
