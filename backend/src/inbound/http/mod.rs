//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod posts;
pub mod profiles;
pub mod state;
pub mod validation;

pub use error::ApiResult;
