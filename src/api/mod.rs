//! Platform API client and request pipeline

pub mod auth;
pub mod chat;
pub mod classify;
pub mod client;
pub mod user;

pub use chat::ChatMessage;
pub use classify::{classify, ApiError, ErrorKind};
pub use client::{ApiClient, ApiRequest, Body};
