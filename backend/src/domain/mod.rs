//! Domain model and coordination services.
//!
//! The types here are persistence-agnostic. Repositories and the user
//! directory are expressed as ports in [`ports`]; the services in
//! [`resume_service`] and [`post_service`] coordinate multi-record
//! operations over those ports.

pub mod error;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod principal;
pub mod profile;
pub mod resume_service;
pub mod token;

pub use error::{Error, ErrorCode};
pub use post::{Comment, Post, UserDisplay};
pub use post_service::PostService;
pub use principal::{Principal, UserId, UserIdError};
pub use profile::{
    Education, EducationFields, Experience, ExperienceFields, Profile, ProfileDraft, ProfileView,
    SocialLinks,
};
pub use resume_service::ResumeService;
pub use token::TokenVerifier;
