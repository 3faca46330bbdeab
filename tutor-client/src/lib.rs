//! tutor-client – typed access to the tutor `/api` and the state behind its
//! three views (general chat, paper grading, roster management).
//!
//! [`App`] owns the shared roster and refreshes it after every mutation;
//! the individual views never patch it locally.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod views;

#[cfg(test)]
mod test_support;

pub use api::ApiClient;
pub use app::App;
pub use config::ClientConfig;
pub use error::ClientError;
