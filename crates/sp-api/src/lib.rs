//! StockPilot assistant API — library crate for the retail backend server.
//!
//! Re-exports all modules so the binary (`main.rs`) and integration tests
//! can access internal types like `AppState`, `build_router`, and the
//! collaborator traits.

pub mod auth;
pub mod config;
pub mod corpus;
pub mod dispatch;
pub mod embedding;
pub mod error;
pub mod forecast;
pub mod provider;
pub mod routes;
pub mod scoring;
pub mod state;
