//! Domain ports.
//!
//! Driven ports are per-entity repository traits embodying the document
//! store's access contract: `find_one`-style filtered lookups, `find_by_id`,
//! `insert`, `update_matching` (returning the post-mutation document, or
//! `None` when the filter matched nothing), and `delete_by_id`. Every method
//! call is one per-document atomic operation; no multi-document atomicity is
//! assumed. Aggregate mutations that must be owner-scoped take the owner's
//! [`UserId`] as part of their filter, never a client-supplied aggregate id
//! alone.
//!
//! Driving ports are the use-case traits HTTP handlers consume through
//! `Arc<dyn …>`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Comment, Education, EducationFields, Error, Experience, ExperienceFields, Post, Principal,
    Profile, ProfileDraft, ProfileView, UserDisplay, UserId,
};

/// Errors raised by storage adapters.
///
/// Adapters report transport-level failures only; "no match" is `None` in
/// the respective return types, not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached at all.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
    /// A query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query { message: String },
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable { message } => {
                Error::service_unavailable(format!("storage unavailable: {message}"))
            }
            StoreError::Query { message } => Error::internal(format!("storage error: {message}")),
        }
    }
}

/// Which profile reference list an aggregate mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeKind {
    Experience,
    Education,
}

impl ResumeKind {
    /// Human-readable record name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Experience => "Experience",
            Self::Education => "Education",
        }
    }
}

/// Port for profile aggregate storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile owned by a user.
    async fn find_by_user(&self, user: &UserId) -> Result<Option<Profile>, StoreError>;

    /// Fetch every profile.
    async fn find_all(&self) -> Result<Vec<Profile>, StoreError>;

    /// Insert a new profile document.
    async fn insert(&self, profile: Profile) -> Result<Profile, StoreError>;

    /// Apply a field draft to the profile matching the owner filter,
    /// returning the updated document, or `None` when no profile matched.
    async fn update_fields(
        &self,
        owner: &UserId,
        draft: ProfileDraft,
    ) -> Result<Option<Profile>, StoreError>;

    /// Insert `child` at the head of the owner's reference list for `kind`,
    /// returning the updated document, or `None` when no profile matched
    /// the owner filter.
    async fn push_child(
        &self,
        owner: &UserId,
        kind: ResumeKind,
        child: Uuid,
    ) -> Result<Option<Profile>, StoreError>;

    /// Remove `child` from the owner's reference list for `kind`, returning
    /// the updated document, or `None` when no profile matched the owner
    /// filter. Removing an id that is not present is a no-op on the list.
    async fn pull_child(
        &self,
        owner: &UserId,
        kind: ResumeKind,
        child: Uuid,
    ) -> Result<Option<Profile>, StoreError>;
}

/// Port for experience child-record storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn insert(&self, record: Experience) -> Result<Experience, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Experience>, StoreError>;
    /// Children whose back-reference points at `profile`, unordered.
    async fn find_by_profile(&self, profile: Uuid) -> Result<Vec<Experience>, StoreError>;
    /// Replace the mutable fields of the record with the given id.
    async fn update(
        &self,
        id: Uuid,
        fields: ExperienceFields,
    ) -> Result<Option<Experience>, StoreError>;
    /// Delete by id, returning the removed record, or `None` when absent.
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Experience>, StoreError>;
}

/// Port for education child-record storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EducationRepository: Send + Sync {
    async fn insert(&self, record: Education) -> Result<Education, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Education>, StoreError>;
    async fn find_by_profile(&self, profile: Uuid) -> Result<Vec<Education>, StoreError>;
    async fn update(
        &self,
        id: Uuid,
        fields: EducationFields,
    ) -> Result<Option<Education>, StoreError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Education>, StoreError>;
}

/// Port for post aggregate storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: Post) -> Result<Post, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError>;
    /// Every post, newest first.
    async fn find_all(&self) -> Result<Vec<Post>, StoreError>;
    /// One author's posts, newest first.
    async fn find_by_author(&self, author: &UserId) -> Result<Vec<Post>, StoreError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError>;

    /// Atomic like/unlike toggle: remove `liker` if present, otherwise
    /// insert it at the head of the like list. One store call, so two
    /// concurrent toggles from the same caller cannot double-apply.
    async fn toggle_like(&self, id: Uuid, liker: &UserId) -> Result<Option<Post>, StoreError>;

    /// Append `comment` to the tail of the post's comment list, returning
    /// the updated document, or `None` when the post no longer exists.
    async fn push_comment(&self, id: Uuid, comment: Uuid) -> Result<Option<Post>, StoreError>;
}

/// Port for comment child-record storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<Comment, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError>;
    /// Replace the comment text, leaving the snapshot and back-reference.
    async fn update_text(&self, id: Uuid, text: String) -> Result<Option<Comment>, StoreError>;
}

/// Query-only port over the external user store.
///
/// Credential issuance and user CRUD live outside this service; only the
/// display snapshot needed by posts and comments is exposed here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn display_info(&self, user: &UserId) -> Result<Option<UserDisplay>, StoreError>;
}

/// Driving port: profile reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Expanded profile for a user; dangling references are omitted.
    async fn fetch_by_user(&self, user: &UserId) -> Result<ProfileView, Error>;
    /// Every profile, expanded.
    async fn fetch_all(&self) -> Result<Vec<ProfileView>, Error>;
    /// Resolve a user's profile id without expanding children.
    async fn resolve_profile_id(&self, user: &UserId) -> Result<Uuid, Error>;
    /// Experience records owned by a profile.
    async fn list_experience(&self, profile: Uuid) -> Result<Vec<Experience>, Error>;
    /// Education records owned by a profile.
    async fn list_education(&self, profile: Uuid) -> Result<Vec<Education>, Error>;
}

/// Driving port: profile and resume-child mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResumeCommand: Send + Sync {
    /// Create the caller's profile, or update it if one already exists.
    async fn upsert_profile(
        &self,
        principal: &Principal,
        draft: ProfileDraft,
    ) -> Result<Profile, Error>;

    /// Add-child protocol for experience records.
    async fn add_experience(
        &self,
        principal: &Principal,
        profile: Uuid,
        fields: ExperienceFields,
    ) -> Result<Experience, Error>;

    /// Update-child protocol; never touches the aggregate's list.
    async fn update_experience(
        &self,
        id: Uuid,
        fields: ExperienceFields,
    ) -> Result<Experience, Error>;

    /// Remove-child protocol for experience records.
    async fn remove_experience(&self, principal: &Principal, id: Uuid)
    -> Result<Experience, Error>;

    /// Add-child protocol for education records.
    async fn add_education(
        &self,
        principal: &Principal,
        profile: Uuid,
        fields: EducationFields,
    ) -> Result<Education, Error>;

    /// Update-child protocol; never touches the aggregate's list.
    async fn update_education(&self, id: Uuid, fields: EducationFields)
    -> Result<Education, Error>;

    /// Remove-child protocol for education records.
    async fn remove_education(&self, principal: &Principal, id: Uuid) -> Result<Education, Error>;
}

/// Driving port: post reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    async fn fetch(&self, id: Uuid) -> Result<Post, Error>;
    async fn list_all(&self) -> Result<Vec<Post>, Error>;
    async fn list_by_author(&self, author: &UserId) -> Result<Vec<Post>, Error>;
    async fn fetch_comment(&self, id: Uuid) -> Result<Comment, Error>;
}

/// Driving port: post and comment mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Create a post with the caller's display snapshot.
    async fn create(&self, principal: &Principal, text: String) -> Result<Post, Error>;

    /// Delete the caller's own post; non-owners are rejected.
    async fn delete(&self, principal: &Principal, id: Uuid) -> Result<Post, Error>;

    /// Atomic like/unlike toggle.
    async fn toggle_like(&self, principal: &Principal, id: Uuid) -> Result<Post, Error>;

    /// Add-child protocol for comments (tail append).
    async fn add_comment(
        &self,
        principal: &Principal,
        post: Uuid,
        text: String,
    ) -> Result<Comment, Error>;

    /// Update-child protocol for comments.
    async fn update_comment(&self, id: Uuid, text: String) -> Result<Comment, Error>;
}
