//! HTTP/REST API adapter.
//!
//! Inbound adapter exposing `GET /crypto/{symbol}` over the price gateway.

mod controller;
mod response;
mod server;

pub use controller::{AppState, create_router};
pub use response::{ApiError, ErrorResponse};
pub use server::{ApiServer, ApiServerError, join_servers, spawn_server};
