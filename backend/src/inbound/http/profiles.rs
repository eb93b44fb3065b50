//! Profile and resume HTTP handlers.
//!
//! ```text
//! POST   /api/profile                    Create or update the caller's profile
//! GET    /api/profile                    List all profiles
//! GET    /api/profile/me                 Fetch the caller's profile
//! GET    /api/profile/user/{user_id}     Fetch a profile by user id
//! POST   /api/profile/experience         Add an experience record
//! GET    /api/profile/experience         List the caller's experience
//! PUT    /api/profile/experience/{id}    Update an experience record
//! DELETE /api/profile/experience/{id}    Remove an experience record
//! POST   /api/profile/education          Add an education record
//! GET    /api/profile/education          List the caller's education
//! PUT    /api/profile/education/{id}     Update an education record
//! DELETE /api/profile/education/{id}    Remove an education record
//! ```

use actix_web::{delete, get, post, put, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{
    Education, EducationFields, Error, ErrorCode, Experience, ExperienceFields, Profile,
    ProfileDraft, ProfileView, SocialLinks, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthContext, ProfileContext};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::FieldErrors;

/// Request payload for creating or updating a profile.
///
/// `skills` is a comma-separated list, mirroring how clients submit it.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub status: Option<String>,
    pub skills: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_user_name: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

fn parse_profile_request(payload: ProfileRequest) -> Result<ProfileDraft, Error> {
    let mut errors = FieldErrors::new();
    let status = errors.require_text("status", "Status is required", payload.status);
    let skills = errors.require_text("skills", "Skills is required", payload.skills);
    errors.finish()?;

    let skills = skills
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    Ok(ProfileDraft {
        status,
        skills,
        company: payload.company,
        website: payload.website,
        location: payload.location,
        bio: payload.bio,
        github_user_name: payload.github_user_name,
        social: SocialLinks {
            youtube: payload.youtube,
            twitter: payload.twitter,
            facebook: payload.facebook,
            linkedin: payload.linkedin,
            instagram: payload.instagram,
        },
    })
}

/// Request payload for adding or updating an experience record.
#[derive(Debug, Deserialize)]
pub struct ExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

fn parse_experience_request(payload: ExperienceRequest) -> Result<ExperienceFields, Error> {
    let mut errors = FieldErrors::new();
    let title = errors.require_text("title", "Title is required", payload.title);
    let company = errors.require_text("company", "Company is required", payload.company);
    let from = errors.require_date("from", "From date is required", payload.from);
    let to = errors.optional_date("to", payload.to);
    errors.finish()?;

    Ok(ExperienceFields {
        title,
        company,
        location: payload.location,
        from,
        to,
        current: payload.current,
        description: payload.description,
    })
}

/// Request payload for adding or updating an education record.
#[derive(Debug, Deserialize)]
pub struct EducationRequest {
    pub school: Option<String>,
    pub certificate: Option<String>,
    pub field_of_study: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

fn parse_education_request(payload: EducationRequest) -> Result<EducationFields, Error> {
    let mut errors = FieldErrors::new();
    let school = errors.require_text("school", "School is required", payload.school);
    let certificate =
        errors.require_text("certificate", "Certificate is required", payload.certificate);
    let field_of_study = errors.require_text(
        "field_of_study",
        "Field of study is required",
        payload.field_of_study,
    );
    let from = errors.require_date("from", "From date is required", payload.from);
    let to = errors.optional_date("to", payload.to);
    errors.finish()?;

    Ok(EducationFields {
        school,
        certificate,
        field_of_study: Some(field_of_study),
        from,
        to,
        current: payload.current,
        description: payload.description,
    })
}

/// Create the caller's profile, or update it if one already exists.
#[post("/profile")]
pub async fn upsert_profile(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<Profile>> {
    let draft = parse_profile_request(payload.into_inner())?;
    let profile = state.resume.upsert_profile(&auth.principal, draft).await?;
    Ok(web::Json(profile))
}

/// Fetch the caller's profile with its resume records expanded.
#[get("/profile/me")]
pub async fn my_profile(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<ProfileView>> {
    let view = state
        .profiles
        .fetch_by_user(&auth.principal.user_id)
        .await
        .map_err(|err| match err.code() {
            ErrorCode::ResourceMissing => {
                Error::resource_missing("There is no profile for this user")
            }
            _ => err,
        })?;
    Ok(web::Json(view))
}

/// List all profiles. Public.
#[get("/profile")]
pub async fn all_profiles(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<ProfileView>>> {
    Ok(web::Json(state.profiles.fetch_all().await?))
}

/// Fetch a profile by the owning user's id. Public.
#[get("/profile/user/{user_id}")]
pub async fn profile_by_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileView>> {
    // A malformed id cannot match any profile, so it reads as absence.
    let user = UserId::new(path.into_inner())
        .map_err(|_| Error::resource_missing("Profile not found"))?;
    Ok(web::Json(state.profiles.fetch_by_user(&user).await?))
}

/// Add an experience record to the caller's profile.
#[post("/profile/experience")]
pub async fn add_experience(
    state: web::Data<HttpState>,
    ctx: ProfileContext,
    payload: web::Json<ExperienceRequest>,
) -> ApiResult<web::Json<Experience>> {
    let fields = parse_experience_request(payload.into_inner())?;
    let record = state
        .resume
        .add_experience(&ctx.principal, ctx.profile_id, fields)
        .await?;
    Ok(web::Json(record))
}

/// List the caller's experience records.
#[get("/profile/experience")]
pub async fn list_experience(
    state: web::Data<HttpState>,
    ctx: ProfileContext,
) -> ApiResult<web::Json<Vec<Experience>>> {
    Ok(web::Json(state.profiles.list_experience(ctx.profile_id).await?))
}

/// Replace an experience record's fields.
#[put("/profile/experience/{id}")]
pub async fn update_experience(
    state: web::Data<HttpState>,
    _auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<ExperienceRequest>,
) -> ApiResult<web::Json<Experience>> {
    let fields = parse_experience_request(payload.into_inner())?;
    let record = state
        .resume
        .update_experience(path.into_inner(), fields)
        .await?;
    Ok(web::Json(record))
}

/// Remove an experience record and unlink it from the caller's profile.
#[delete("/profile/experience/{id}")]
pub async fn remove_experience(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Experience>> {
    let record = state
        .resume
        .remove_experience(&auth.principal, path.into_inner())
        .await?;
    Ok(web::Json(record))
}

/// Add an education record to the caller's profile.
#[post("/profile/education")]
pub async fn add_education(
    state: web::Data<HttpState>,
    ctx: ProfileContext,
    payload: web::Json<EducationRequest>,
) -> ApiResult<web::Json<Education>> {
    let fields = parse_education_request(payload.into_inner())?;
    let record = state
        .resume
        .add_education(&ctx.principal, ctx.profile_id, fields)
        .await?;
    Ok(web::Json(record))
}

/// List the caller's education records.
#[get("/profile/education")]
pub async fn list_education(
    state: web::Data<HttpState>,
    ctx: ProfileContext,
) -> ApiResult<web::Json<Vec<Education>>> {
    Ok(web::Json(state.profiles.list_education(ctx.profile_id).await?))
}

/// Replace an education record's fields.
#[put("/profile/education/{id}")]
pub async fn update_education(
    state: web::Data<HttpState>,
    _auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<EducationRequest>,
) -> ApiResult<web::Json<Education>> {
    let fields = parse_education_request(payload.into_inner())?;
    let record = state
        .resume
        .update_education(path.into_inner(), fields)
        .await?;
    Ok(web::Json(record))
}

/// Remove an education record and unlink it from the caller's profile.
#[delete("/profile/education/{id}")]
pub async fn remove_education(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Education>> {
    let record = state
        .resume
        .remove_education(&auth.principal, path.into_inner())
        .await?;
    Ok(web::Json(record))
}
