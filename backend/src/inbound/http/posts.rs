//! Post and comment HTTP handlers.
//!
//! ```text
//! POST   /api/posts                  Create a post
//! GET    /api/posts/all              List every post, newest first
//! GET    /api/posts                  List the caller's posts
//! GET    /api/posts/{id}             Fetch one post
//! DELETE /api/posts/{id}             Delete the caller's post
//! PUT    /api/posts/{id}/like        Toggle the caller's like
//! POST   /api/posts/{id}/comment     Comment on a post
//! PUT    /api/posts/comment/{id}     Edit a comment
//! GET    /api/posts/comment/{id}     Fetch one comment
//! ```
//!
//! Registration order matters: `/posts/all` and `/posts/comment/{id}` must be
//! registered before `/posts/{id}` or the literal segments are captured as
//! ids.

use actix_web::{delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Comment, Error, Post};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::FieldErrors;

/// Request payload for posts and comments.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

fn parse_text_request(payload: TextRequest) -> Result<String, Error> {
    let mut errors = FieldErrors::new();
    let text = errors.require_text("text", "Text is required", payload.text);
    errors.finish()?;
    Ok(text)
}

fn parse_post_id(raw: String) -> Result<Uuid, Error> {
    // A malformed id cannot match any post, so it reads as absence.
    Uuid::parse_str(&raw).map_err(|_| Error::not_found("Post not found"))
}

fn parse_comment_id(raw: String) -> Result<Uuid, Error> {
    Uuid::parse_str(&raw).map_err(|_| Error::resource_missing("Comment not found"))
}

/// Create a post authored by the caller.
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<TextRequest>,
) -> ApiResult<web::Json<Post>> {
    let text = parse_text_request(payload.into_inner())?;
    let post = state.posts.create(&auth.principal, text).await?;
    Ok(web::Json(post))
}

/// List every post, newest first.
#[get("/posts/all")]
pub async fn all_posts(
    state: web::Data<HttpState>,
    _auth: AuthContext,
) -> ApiResult<web::Json<Vec<Post>>> {
    Ok(web::Json(state.posts_query.list_all().await?))
}

/// List the caller's posts, newest first.
#[get("/posts")]
pub async fn my_posts(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<Vec<Post>>> {
    Ok(web::Json(
        state
            .posts_query
            .list_by_author(&auth.principal.user_id)
            .await?,
    ))
}

/// Edit a comment's text.
#[put("/posts/comment/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    _auth: AuthContext,
    path: web::Path<String>,
    payload: web::Json<TextRequest>,
) -> ApiResult<web::Json<Comment>> {
    let id = parse_comment_id(path.into_inner())?;
    let text = parse_text_request(payload.into_inner())?;
    Ok(web::Json(state.posts.update_comment(id, text).await?))
}

/// Fetch one comment by id.
#[get("/posts/comment/{id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    _auth: AuthContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Comment>> {
    let id = parse_comment_id(path.into_inner())?;
    Ok(web::Json(state.posts_query.fetch_comment(id).await?))
}

/// Fetch one post by id.
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    _auth: AuthContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Post>> {
    let id = parse_post_id(path.into_inner())?;
    Ok(web::Json(state.posts_query.fetch(id).await?))
}

/// Delete the caller's post. Comments are left in place.
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<serde_json::Value>> {
    let id = parse_post_id(path.into_inner())?;
    state.posts.delete(&auth.principal, id).await?;
    Ok(web::Json(json!({ "msg": "Post removed" })))
}

/// Toggle the caller's like on a post.
#[put("/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Post>> {
    let id = parse_post_id(path.into_inner())?;
    Ok(web::Json(state.posts.toggle_like(&auth.principal, id).await?))
}

/// Comment on a post as the caller.
#[post("/posts/{id}/comment")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<String>,
    payload: web::Json<TextRequest>,
) -> ApiResult<web::Json<Comment>> {
    let id = parse_post_id(path.into_inner())?;
    let text = parse_text_request(payload.into_inner())?;
    Ok(web::Json(
        state.posts.add_comment(&auth.principal, id, text).await?,
    ))
}
