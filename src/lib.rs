//! OWL Network API
//!
//! Dealer-scoped backend for customers, service addresses, tanks, meters and
//! radios. Every data access is bound to the dealer resolved for the
//! authenticated user; see [`policy`].

pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod policy;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
