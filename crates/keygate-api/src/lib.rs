//! # keygate-api
//!
//! Authentication REST API server: token issuance on login, a bearer-token
//! request gate, and explicit dependency composition at startup.

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
