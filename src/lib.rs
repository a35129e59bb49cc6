//! Campus - session-authenticated client for the campus learning platform
//!
//! The library keeps the authentication session, runs every API call
//! through a credential and failure-classification pipeline, and guards
//! navigation to views that need a session.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod notice;
pub mod router;

pub use api::{ApiClient, ApiError, ErrorKind};
pub use auth::{Role, Session, SessionStore, UserProfile};
pub use config::Config;
pub use context::AppContext;
pub use error::Error;
pub use router::{NavigationOutcome, Router};
