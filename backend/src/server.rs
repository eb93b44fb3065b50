//! HTTP server assembly: configuration, dependency wiring and routes.

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::ports::{PostCommand, PostQuery, ProfileQuery, ResumeCommand};
use crate::domain::{PostService, ResumeService, TokenVerifier};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{posts, profiles};
use crate::outbound::persistence::MemoryStore;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_TOKEN_TTL_SECS: i64 = 360_000;

/// Server configuration, loaded from environment, config file or CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DEVLINK")]
pub struct ServerSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Secret used to sign and verify bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in seconds.
    pub token_ttl_secs: Option<i64>,
}

impl ServerSettings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the configured token lifetime, falling back to the default.
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS)
    }

    /// Return the signing secret.
    ///
    /// Debug builds fall back to an ephemeral secret so local runs work
    /// without setup; release builds refuse to start without one.
    pub fn jwt_secret(&self) -> io::Result<String> {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(secret.to_owned()),
            _ if cfg!(debug_assertions) => {
                warn!("using ephemeral signing secret (dev only)");
                Ok(uuid::Uuid::new_v4().to_string())
            }
            _ => Err(io::Error::other("DEVLINK_JWT_SECRET must be set")),
        }
    }
}

/// Wire the shared store and services into the handler state bundle.
pub fn build_state(store: Arc<MemoryStore>, verifier: Arc<TokenVerifier>) -> HttpState {
    let resume = Arc::new(ResumeService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
    ));
    let post_service = Arc::new(PostService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        store,
    ));
    let profiles: Arc<dyn ProfileQuery> = resume.clone();
    let resume: Arc<dyn ResumeCommand> = resume;
    let posts_query: Arc<dyn PostQuery> = post_service.clone();
    let posts: Arc<dyn PostCommand> = post_service;
    HttpState::new(profiles, resume, posts_query, posts, verifier)
}

/// Register every API route.
///
/// `/posts/all` and the comment routes are registered ahead of `/posts/{id}`
/// so their literal segments are not captured as post ids.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(profiles::upsert_profile)
        .service(profiles::my_profile)
        .service(profiles::all_profiles)
        .service(profiles::profile_by_user)
        .service(profiles::add_experience)
        .service(profiles::list_experience)
        .service(profiles::update_experience)
        .service(profiles::remove_experience)
        .service(profiles::add_education)
        .service(profiles::list_education)
        .service(profiles::update_education)
        .service(profiles::remove_education)
        .service(posts::create_post)
        .service(posts::all_posts)
        .service(posts::my_posts)
        .service(posts::update_comment)
        .service(posts::get_comment)
        .service(posts::get_post)
        .service(posts::delete_post)
        .service(posts::toggle_like)
        .service(posts::add_comment);
}

/// Load configuration and run the HTTP server until shutdown.
pub async fn run() -> io::Result<()> {
    let settings = ServerSettings::load().map_err(io::Error::other)?;
    let verifier = Arc::new(TokenVerifier::new(
        settings.jwt_secret()?,
        settings.token_ttl_secs(),
    ));
    let state = build_state(Arc::new(MemoryStore::new()), verifier);

    let bind_addr = settings.bind_addr().to_owned();
    info!(addr = %bind_addr, "starting HTTP server");
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .service(web::scope("/api").configure(configure_api))
    })
    .bind(bind_addr.as_str())?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(
        bind_addr: Option<&str>,
        jwt_secret: Option<&str>,
        token_ttl_secs: Option<i64>,
    ) -> ServerSettings {
        ServerSettings {
            bind_addr: bind_addr.map(ToOwned::to_owned),
            jwt_secret: jwt_secret.map(ToOwned::to_owned),
            token_ttl_secs,
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = settings(None, None, None);
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(settings.token_ttl_secs(), DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn configured_values_win() {
        let settings = settings(Some("127.0.0.1:9000"), Some("s3cret"), Some(3600));
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
        assert_eq!(settings.token_ttl_secs(), 3600);
        assert_eq!(settings.jwt_secret().expect("secret set"), "s3cret");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn release_builds_require_a_secret() {
        let settings = settings(None, None, None);
        assert!(settings.jwt_secret().is_err());
    }
}
