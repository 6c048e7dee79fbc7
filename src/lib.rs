// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod presenter;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
pub mod utils;

// Entry point used by the binary and the integration tests
pub use routes::create_router;
