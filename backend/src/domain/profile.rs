//! Profile aggregate and its child records.
//!
//! A [`Profile`] is an aggregate root holding ordered lists of references to
//! independently stored [`Experience`] and [`Education`] records. Each child
//! carries a back-reference to its owning profile; the back-reference is
//! informational and never used for authorisation. Reference lists and child
//! rows are kept convergent by the resume coordinator, not by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Optional social media links attached to a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Profile fields supplied by the caller on create-or-update.
///
/// Everything except reference lists and identity; applying a draft to an
/// existing profile never touches `experience`/`education`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_user_name: Option<String>,
    pub social: SocialLinks,
}

/// Aggregate root: one profile per user.
///
/// Invariant: every id in `experience`/`education` should reference an
/// existing child whose back-reference points here. The invariant is
/// best-effort (see the resume coordinator); readers must tolerate dangling
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user: UserId,
    pub status: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_user_name: Option<String>,
    #[serde(default)]
    pub social: SocialLinks,
    /// Ordered experience references, most recent first.
    pub experience: Vec<Uuid>,
    /// Ordered education references, most recent first.
    pub education: Vec<Uuid>,
    pub date: DateTime<Utc>,
}

impl Profile {
    /// Create a fresh profile for a user from a draft, with empty reference
    /// lists.
    pub fn create(user: UserId, draft: ProfileDraft) -> Self {
        let ProfileDraft {
            status,
            skills,
            company,
            website,
            location,
            bio,
            github_user_name,
            social,
        } = draft;
        Self {
            id: Uuid::new_v4(),
            user,
            status,
            skills,
            company,
            website,
            location,
            bio,
            github_user_name,
            social,
            experience: Vec::new(),
            education: Vec::new(),
            date: Utc::now(),
        }
    }

    /// Apply a draft to this profile, leaving identity, reference lists,
    /// and the creation date untouched.
    pub fn apply(&mut self, draft: ProfileDraft) {
        let ProfileDraft {
            status,
            skills,
            company,
            website,
            location,
            bio,
            github_user_name,
            social,
        } = draft;
        self.status = status;
        self.skills = skills;
        self.company = company;
        self.website = website;
        self.location = location;
        self.bio = bio;
        self.github_user_name = github_user_name;
        self.social = social;
    }
}

/// Mutable fields of an experience record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceFields {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: DateTime<Utc>,
    pub to: Option<DateTime<Utc>>,
    pub current: bool,
    pub description: Option<String>,
}

/// Work experience child record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    /// Back-reference to the owning profile.
    pub profile: Uuid,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Experience {
    /// Create a new record owned by `profile`.
    pub fn create(profile: Uuid, fields: ExperienceFields) -> Self {
        let ExperienceFields {
            title,
            company,
            location,
            from,
            to,
            current,
            description,
        } = fields;
        Self {
            id: Uuid::new_v4(),
            profile,
            title,
            company,
            location,
            from,
            to,
            current,
            description,
        }
    }

    /// Replace the mutable fields, keeping id and back-reference.
    pub fn apply(&mut self, fields: ExperienceFields) {
        let ExperienceFields {
            title,
            company,
            location,
            from,
            to,
            current,
            description,
        } = fields;
        self.title = title;
        self.company = company;
        self.location = location;
        self.from = from;
        self.to = to;
        self.current = current;
        self.description = description;
    }
}

/// Mutable fields of an education record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationFields {
    pub school: String,
    pub certificate: String,
    pub field_of_study: Option<String>,
    pub from: DateTime<Utc>,
    pub to: Option<DateTime<Utc>>,
    pub current: bool,
    pub description: Option<String>,
}

/// Education child record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    /// Back-reference to the owning profile.
    pub profile: Uuid,
    pub school: String,
    pub certificate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    pub from: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Education {
    /// Create a new record owned by `profile`.
    pub fn create(profile: Uuid, fields: EducationFields) -> Self {
        let EducationFields {
            school,
            certificate,
            field_of_study,
            from,
            to,
            current,
            description,
        } = fields;
        Self {
            id: Uuid::new_v4(),
            profile,
            school,
            certificate,
            field_of_study,
            from,
            to,
            current,
            description,
        }
    }

    /// Replace the mutable fields, keeping id and back-reference.
    pub fn apply(&mut self, fields: EducationFields) {
        let EducationFields {
            school,
            certificate,
            field_of_study,
            from,
            to,
            current,
            description,
        } = fields;
        self.school = school;
        self.certificate = certificate;
        self.field_of_study = field_of_study;
        self.from = from;
        self.to = to;
        self.current = current;
        self.description = description;
    }
}

/// A profile with its reference lists expanded into full child records.
///
/// Expansion is a best-effort join: references whose child no longer exists
/// are omitted, never treated as a fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub user: UserId,
    pub status: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_user_name: Option<String>,
    pub social: SocialLinks,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub date: DateTime<Utc>,
}

impl ProfileView {
    /// Assemble a view from an aggregate and its resolved children.
    ///
    /// `experience` and `education` must already be in reference-list order;
    /// unresolvable references are simply absent from the inputs.
    pub fn assemble(profile: Profile, experience: Vec<Experience>, education: Vec<Education>) -> Self {
        let Profile {
            id,
            user,
            status,
            skills,
            company,
            website,
            location,
            bio,
            github_user_name,
            social,
            experience: _,
            education: _,
            date,
        } = profile;
        Self {
            id,
            user,
            status,
            skills,
            company,
            website,
            location,
            bio,
            github_user_name,
            social,
            experience,
            education,
            date,
        }
    }
}
