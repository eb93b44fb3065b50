//! Resume coordination service.
//!
//! Implements the two-step protocols that keep a profile's reference lists
//! convergent with the independently stored experience/education records.
//! The store offers per-document atomicity only, so the protocols have a
//! fixed ordering and a distinct reported failure mode for a second phase
//! that fails after the first committed:
//!
//! - **Add**: insert the child (authoritative; failure aborts), then insert
//!   its id at the head of the owner's reference list. A phase-2 failure
//!   leaves an orphaned child; it is logged and surfaced as a link
//!   inconsistency, and the committed child is not returned to the caller.
//! - **Update**: single-document write on the child; the reference value
//!   never changes, so the aggregate is never touched.
//! - **Remove**: delete the child by id (absent means a hard miss, also on
//!   retry), then pull the id from the aggregate matched by the
//!   authenticated caller's owner key. A phase-2 failure leaves a dangling
//!   forward reference and surfaces as a link inconsistency; reads tolerate
//!   the dangle by omitting unresolvable references.
//!
//! No rollback of a committed first phase is ever attempted; there is no
//! cross-record undo in the store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::ports::{
    EducationRepository, ExperienceRepository, ProfileQuery, ProfileRepository, ResumeCommand,
    ResumeKind, StoreError,
};
use crate::domain::{
    Education, EducationFields, Error, Experience, ExperienceFields, Principal, Profile,
    ProfileDraft, ProfileView, UserId,
};

/// Coordinator for the profile aggregate and its child records.
#[derive(Clone)]
pub struct ResumeService<P, E, D> {
    profiles: Arc<P>,
    experience: Arc<E>,
    education: Arc<D>,
}

impl<P, E, D> ResumeService<P, E, D> {
    /// Create a new service over the given repositories.
    pub fn new(profiles: Arc<P>, experience: Arc<E>, education: Arc<D>) -> Self {
        Self {
            profiles,
            experience,
            education,
        }
    }
}

fn link_failed(kind: ResumeKind, child: Uuid, cause: Option<StoreError>) -> Error {
    // The child row is already committed; reconciliation is the system's
    // responsibility, but the caller must still see a failure.
    error!(
        kind = kind.label(),
        child = %child,
        cause = cause.as_ref().map(ToString::to_string),
        "aggregate link update failed after child write"
    );
    Error::link_inconsistency(format!(
        "{} saved but the profile reference list could not be updated",
        kind.label()
    ))
    .with_details(serde_json::json!({ "code": "aggregate_link_failed" }))
}

fn child_missing(kind: ResumeKind) -> Error {
    Error::resource_missing(format!("{} not found", kind.label()))
}

impl<P, E, D> ResumeService<P, E, D>
where
    P: ProfileRepository,
    E: ExperienceRepository,
    D: EducationRepository,
{
    async fn expand(&self, profile: Profile) -> Result<ProfileView, Error> {
        let mut experience = Vec::with_capacity(profile.experience.len());
        for id in &profile.experience {
            // Best-effort join: a dangling reference is omitted, not fatal.
            if let Some(record) = self.experience.find_by_id(*id).await? {
                experience.push(record);
            }
        }
        let mut education = Vec::with_capacity(profile.education.len());
        for id in &profile.education {
            if let Some(record) = self.education.find_by_id(*id).await? {
                education.push(record);
            }
        }
        Ok(ProfileView::assemble(profile, experience, education))
    }

    async fn link_child(
        &self,
        owner: &UserId,
        kind: ResumeKind,
        child: Uuid,
    ) -> Result<(), Error> {
        match self.profiles.push_child(owner, kind, child).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(link_failed(kind, child, None)),
            Err(err) => Err(link_failed(kind, child, Some(err))),
        }
    }

    async fn unlink_child(
        &self,
        owner: &UserId,
        kind: ResumeKind,
        child: Uuid,
    ) -> Result<(), Error> {
        match self.profiles.pull_child(owner, kind, child).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(link_failed(kind, child, None)),
            Err(err) => Err(link_failed(kind, child, Some(err))),
        }
    }
}

#[async_trait]
impl<P, E, D> ProfileQuery for ResumeService<P, E, D>
where
    P: ProfileRepository,
    E: ExperienceRepository,
    D: EducationRepository,
{
    async fn fetch_by_user(&self, user: &UserId) -> Result<ProfileView, Error> {
        let profile = self
            .profiles
            .find_by_user(user)
            .await?
            .ok_or_else(|| Error::resource_missing("Profile not found"))?;
        self.expand(profile).await
    }

    async fn fetch_all(&self) -> Result<Vec<ProfileView>, Error> {
        let profiles = self.profiles.find_all().await?;
        let mut views = Vec::with_capacity(profiles.len());
        for profile in profiles {
            views.push(self.expand(profile).await?);
        }
        Ok(views)
    }

    async fn resolve_profile_id(&self, user: &UserId) -> Result<Uuid, Error> {
        self.profiles
            .find_by_user(user)
            .await?
            .map(|profile| profile.id)
            .ok_or_else(|| Error::resource_missing("Profile not found"))
    }

    async fn list_experience(&self, profile: Uuid) -> Result<Vec<Experience>, Error> {
        Ok(self.experience.find_by_profile(profile).await?)
    }

    async fn list_education(&self, profile: Uuid) -> Result<Vec<Education>, Error> {
        Ok(self.education.find_by_profile(profile).await?)
    }
}

#[async_trait]
impl<P, E, D> ResumeCommand for ResumeService<P, E, D>
where
    P: ProfileRepository,
    E: ExperienceRepository,
    D: EducationRepository,
{
    async fn upsert_profile(
        &self,
        principal: &Principal,
        draft: ProfileDraft,
    ) -> Result<Profile, Error> {
        if let Some(updated) = self
            .profiles
            .update_fields(&principal.user_id, draft.clone())
            .await?
        {
            debug!(user = %principal.user_id, "updated user profile");
            return Ok(updated);
        }
        let created = self
            .profiles
            .insert(Profile::create(principal.user_id, draft))
            .await?;
        debug!(user = %principal.user_id, "created user profile");
        Ok(created)
    }

    async fn add_experience(
        &self,
        principal: &Principal,
        profile: Uuid,
        fields: ExperienceFields,
    ) -> Result<Experience, Error> {
        // Phase 1 is authoritative: no reference is appended if it fails.
        let record = self
            .experience
            .insert(Experience::create(profile, fields))
            .await?;
        self.link_child(&principal.user_id, ResumeKind::Experience, record.id)
            .await?;
        Ok(record)
    }

    async fn update_experience(
        &self,
        id: Uuid,
        fields: ExperienceFields,
    ) -> Result<Experience, Error> {
        self.experience
            .update(id, fields)
            .await?
            .ok_or_else(|| child_missing(ResumeKind::Experience))
    }

    async fn remove_experience(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> Result<Experience, Error> {
        let deleted = self
            .experience
            .delete_by_id(id)
            .await?
            .ok_or_else(|| child_missing(ResumeKind::Experience))?;
        self.unlink_child(&principal.user_id, ResumeKind::Experience, id)
            .await?;
        Ok(deleted)
    }

    async fn add_education(
        &self,
        principal: &Principal,
        profile: Uuid,
        fields: EducationFields,
    ) -> Result<Education, Error> {
        let record = self
            .education
            .insert(Education::create(profile, fields))
            .await?;
        self.link_child(&principal.user_id, ResumeKind::Education, record.id)
            .await?;
        Ok(record)
    }

    async fn update_education(
        &self,
        id: Uuid,
        fields: EducationFields,
    ) -> Result<Education, Error> {
        self.education
            .update(id, fields)
            .await?
            .ok_or_else(|| child_missing(ResumeKind::Education))
    }

    async fn remove_education(&self, principal: &Principal, id: Uuid) -> Result<Education, Error> {
        let deleted = self
            .education
            .delete_by_id(id)
            .await?
            .ok_or_else(|| child_missing(ResumeKind::Education))?;
        self.unlink_child(&principal.user_id, ResumeKind::Education, id)
            .await?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockEducationRepository, MockExperienceRepository, MockProfileRepository,
    };
    use chrono::Utc;

    fn service(
        profiles: MockProfileRepository,
        experience: MockExperienceRepository,
        education: MockEducationRepository,
    ) -> ResumeService<MockProfileRepository, MockExperienceRepository, MockEducationRepository>
    {
        ResumeService::new(Arc::new(profiles), Arc::new(experience), Arc::new(education))
    }

    fn experience_fields() -> ExperienceFields {
        ExperienceFields {
            title: "Engineer".into(),
            company: "Acme".into(),
            location: None,
            from: Utc::now(),
            to: None,
            current: true,
            description: None,
        }
    }

    fn sample_profile(user: UserId) -> Profile {
        Profile::create(
            user,
            ProfileDraft {
                status: "Developer".into(),
                skills: vec!["rust".into()],
                company: None,
                website: None,
                location: None,
                bio: None,
                github_user_name: None,
                social: Default::default(),
            },
        )
    }

    #[tokio::test]
    async fn add_experience_sets_back_reference_and_links_head() {
        let caller = Principal::new(UserId::random());
        let owner = caller.user_id;
        let profile = sample_profile(owner);
        let profile_id = profile.id;

        let mut experience = MockExperienceRepository::new();
        experience
            .expect_insert()
            .withf(move |record| record.profile == profile_id)
            .times(1)
            .return_once(|record| Ok(record));

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_push_child()
            .withf(move |user, kind, _| *user == owner && *kind == ResumeKind::Experience)
            .times(1)
            .return_once(move |_, _, child| {
                let mut updated = profile;
                updated.experience.insert(0, child);
                Ok(Some(updated))
            });

        let svc = service(profiles, experience, MockEducationRepository::new());
        let record = svc
            .add_experience(&caller, profile_id, experience_fields())
            .await
            .expect("add succeeds");
        assert_eq!(record.profile, profile_id);
    }

    #[tokio::test]
    async fn add_experience_reports_link_failure_without_returning_the_child() {
        let caller = Principal::new(UserId::random());
        let profile_id = Uuid::new_v4();

        let mut experience = MockExperienceRepository::new();
        experience
            .expect_insert()
            .times(1)
            .return_once(|record| Ok(record));

        // No aggregate matches the owner filter: phase 2 fails after the
        // child row committed.
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_push_child()
            .times(1)
            .return_once(|_, _, _| Ok(None));

        let svc = service(profiles, experience, MockEducationRepository::new());
        let err = svc
            .add_experience(&caller, profile_id, experience_fields())
            .await
            .expect_err("link failure surfaces");
        assert_eq!(err.code(), ErrorCode::LinkInconsistency);
    }

    #[tokio::test]
    async fn add_experience_aborts_when_child_insert_fails() {
        let caller = Principal::new(UserId::random());

        let mut experience = MockExperienceRepository::new();
        experience.expect_insert().times(1).return_once(|_| {
            Err(StoreError::Unavailable {
                message: "down".into(),
            })
        });

        // Phase 1 failed, so the aggregate must never be touched.
        let mut profiles = MockProfileRepository::new();
        profiles.expect_push_child().times(0);

        let svc = service(profiles, experience, MockEducationRepository::new());
        let err = svc
            .add_experience(&caller, Uuid::new_v4(), experience_fields())
            .await
            .expect_err("insert failure aborts");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn remove_experience_misses_are_idempotent_failures() {
        let caller = Principal::new(UserId::random());

        let mut experience = MockExperienceRepository::new();
        experience
            .expect_delete_by_id()
            .times(1)
            .return_once(|_| Ok(None));

        let mut profiles = MockProfileRepository::new();
        profiles.expect_pull_child().times(0);

        let svc = service(profiles, experience, MockEducationRepository::new());
        let err = svc
            .remove_experience(&caller, Uuid::new_v4())
            .await
            .expect_err("missing child is an error");
        assert_eq!(err.code(), ErrorCode::ResourceMissing);
        assert_eq!(err.message(), "Experience not found");
    }

    #[tokio::test]
    async fn remove_experience_surfaces_dangling_reference_as_link_error() {
        let caller = Principal::new(UserId::random());
        let owner = caller.user_id;
        let id = Uuid::new_v4();
        let record = Experience::create(Uuid::new_v4(), experience_fields());

        let mut experience = MockExperienceRepository::new();
        experience
            .expect_delete_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(record)));

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_pull_child()
            .withf(move |user, kind, child| {
                *user == owner && *kind == ResumeKind::Experience && *child == id
            })
            .times(1)
            .return_once(|_, _, _| Ok(None));

        let svc = service(profiles, experience, MockEducationRepository::new());
        let err = svc
            .remove_experience(&caller, id)
            .await
            .expect_err("phase-2 failure surfaces");
        assert_eq!(err.code(), ErrorCode::LinkInconsistency);
    }

    #[tokio::test]
    async fn fetch_by_user_omits_dangling_references() {
        let user = UserId::random();
        let mut profile = sample_profile(user);
        let live = Experience::create(profile.id, experience_fields());
        let live_id = live.id;
        let dangling = Uuid::new_v4();
        profile.experience = vec![live_id, dangling];

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_user()
            .times(1)
            .return_once(move |_| Ok(Some(profile)));

        let mut experience = MockExperienceRepository::new();
        experience
            .expect_find_by_id()
            .times(2)
            .returning(move |id| {
                if id == live_id {
                    Ok(Some(live.clone()))
                } else {
                    Ok(None)
                }
            });

        let svc = service(profiles, experience, MockEducationRepository::new());
        let view = svc.fetch_by_user(&user).await.expect("read succeeds");
        assert_eq!(view.experience.len(), 1);
        assert_eq!(view.experience.first().map(|r| r.id), Some(live_id));
    }

    #[tokio::test]
    async fn resolve_profile_id_misses_when_no_profile_exists() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_user()
            .times(1)
            .return_once(|_| Ok(None));

        let svc = service(
            profiles,
            MockExperienceRepository::new(),
            MockEducationRepository::new(),
        );
        let err = svc
            .resolve_profile_id(&UserId::random())
            .await
            .expect_err("missing profile");
        assert_eq!(err.code(), ErrorCode::ResourceMissing);
        assert_eq!(err.message(), "Profile not found");
    }

    #[tokio::test]
    async fn update_experience_never_touches_the_aggregate() {
        let id = Uuid::new_v4();
        let mut experience = MockExperienceRepository::new();
        experience.expect_update().times(1).return_once(move |_, fields| {
            let mut record = Experience::create(Uuid::new_v4(), fields);
            record.id = id;
            Ok(Some(record))
        });

        let mut profiles = MockProfileRepository::new();
        profiles.expect_push_child().times(0);
        profiles.expect_pull_child().times(0);

        let svc = service(profiles, experience, MockEducationRepository::new());
        let record = svc
            .update_experience(id, experience_fields())
            .await
            .expect("update succeeds");
        assert_eq!(record.id, id);
    }

    #[tokio::test]
    async fn upsert_profile_creates_when_no_match() {
        let caller = Principal::new(UserId::random());
        let owner = caller.user_id;

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_update_fields()
            .times(1)
            .return_once(|_, _| Ok(None));
        profiles
            .expect_insert()
            .withf(move |profile| profile.user == owner && profile.experience.is_empty())
            .times(1)
            .return_once(|profile| Ok(profile));

        let svc = service(
            profiles,
            MockExperienceRepository::new(),
            MockEducationRepository::new(),
        );
        let draft = ProfileDraft {
            status: "Developer".into(),
            skills: vec!["rust".into()],
            company: None,
            website: None,
            location: None,
            bio: None,
            github_user_name: None,
            social: Default::default(),
        };
        let profile = svc
            .upsert_profile(&caller, draft)
            .await
            .expect("create succeeds");
        assert_eq!(profile.user, owner);
    }
}
