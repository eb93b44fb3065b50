//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::TokenVerifier;
use crate::domain::ports::{PostCommand, PostQuery, ProfileQuery, ResumeCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub profiles: Arc<dyn ProfileQuery>,
    pub resume: Arc<dyn ResumeCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub verifier: Arc<TokenVerifier>,
}

impl HttpState {
    /// Construct state from the port implementations and token verifier.
    pub fn new(
        profiles: Arc<dyn ProfileQuery>,
        resume: Arc<dyn ResumeCommand>,
        posts_query: Arc<dyn PostQuery>,
        posts: Arc<dyn PostCommand>,
        verifier: Arc<TokenVerifier>,
    ) -> Self {
        Self {
            profiles,
            resume,
            posts_query,
            posts,
            verifier,
        }
    }
}
