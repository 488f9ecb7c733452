// src/lib.rs
pub mod aggregate;
pub mod api;
pub mod auth;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use aggregate::{aggregate, aggregate_with, DebtTreatment, NetWorthPoint};
pub use api::ApiClient;
pub use error::{ApiError, ConfigError};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionRecord, SessionStore};
