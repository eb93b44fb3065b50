//! In-memory store backing every repository port.
//!
//! Each collection sits behind its own mutex and every trait method takes
//! exactly one lock, so a method call is atomic with respect to one record
//! and nothing wider. The store deliberately offers no cross-collection
//! transaction; the domain services are written against that constraint.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    CommentRepository, EducationRepository, ExperienceRepository, PostRepository,
    ProfileRepository, ResumeKind, StoreError, UserDirectory,
};
use crate::domain::{
    Comment, Education, EducationFields, Experience, ExperienceFields, Post, Profile,
    ProfileDraft, UserDisplay, UserId,
};

/// Process-local storage for profiles, resume records, posts, comments and
/// the user directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<Uuid, Profile>>,
    experience: Mutex<HashMap<Uuid, Experience>>,
    education: Mutex<HashMap<Uuid, Education>>,
    posts: Mutex<HashMap<Uuid, Post>>,
    comments: Mutex<HashMap<Uuid, Comment>>,
    users: Mutex<HashMap<UserId, UserDisplay>>,
}

fn lock<T>(collection: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    collection.lock().map_err(|_| StoreError::Unavailable {
        message: "store lock poisoned".to_owned(),
    })
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user to the directory, returning their generated id.
    pub fn register_user(
        &self,
        name: impl Into<String>,
        avatar: Option<String>,
    ) -> Result<UserId, StoreError> {
        let id = UserId::random();
        lock(&self.users)?.insert(
            id,
            UserDisplay {
                name: name.into(),
                avatar,
            },
        );
        Ok(id)
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_by_user(&self, user: &UserId) -> Result<Option<Profile>, StoreError> {
        let profiles = lock(&self.profiles)?;
        Ok(profiles
            .values()
            .find(|profile| profile.user == *user)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Profile>, StoreError> {
        let profiles = lock(&self.profiles)?;
        let mut all: Vec<Profile> = profiles.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    async fn insert(&self, profile: Profile) -> Result<Profile, StoreError> {
        lock(&self.profiles)?.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update_fields(
        &self,
        owner: &UserId,
        draft: ProfileDraft,
    ) -> Result<Option<Profile>, StoreError> {
        let mut profiles = lock(&self.profiles)?;
        let Some(profile) = profiles.values_mut().find(|profile| profile.user == *owner) else {
            return Ok(None);
        };
        profile.apply(draft);
        Ok(Some(profile.clone()))
    }

    async fn push_child(
        &self,
        owner: &UserId,
        kind: ResumeKind,
        child: Uuid,
    ) -> Result<Option<Profile>, StoreError> {
        let mut profiles = lock(&self.profiles)?;
        let Some(profile) = profiles.values_mut().find(|profile| profile.user == *owner) else {
            return Ok(None);
        };
        // Newest first, matching a list unshift.
        match kind {
            ResumeKind::Experience => profile.experience.insert(0, child),
            ResumeKind::Education => profile.education.insert(0, child),
        }
        Ok(Some(profile.clone()))
    }

    async fn pull_child(
        &self,
        owner: &UserId,
        kind: ResumeKind,
        child: Uuid,
    ) -> Result<Option<Profile>, StoreError> {
        let mut profiles = lock(&self.profiles)?;
        let Some(profile) = profiles.values_mut().find(|profile| profile.user == *owner) else {
            return Ok(None);
        };
        // Removing an id that is not present is a no-op, not a failure.
        match kind {
            ResumeKind::Experience => profile.experience.retain(|id| *id != child),
            ResumeKind::Education => profile.education.retain(|id| *id != child),
        }
        Ok(Some(profile.clone()))
    }
}

#[async_trait]
impl ExperienceRepository for MemoryStore {
    async fn insert(&self, record: Experience) -> Result<Experience, StoreError> {
        lock(&self.experience)?.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Experience>, StoreError> {
        Ok(lock(&self.experience)?.get(&id).cloned())
    }

    async fn find_by_profile(&self, profile: Uuid) -> Result<Vec<Experience>, StoreError> {
        let records = lock(&self.experience)?;
        let mut matching: Vec<Experience> = records
            .values()
            .filter(|record| record.profile == profile)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.from.cmp(&a.from));
        Ok(matching)
    }

    async fn update(
        &self,
        id: Uuid,
        fields: ExperienceFields,
    ) -> Result<Option<Experience>, StoreError> {
        let mut records = lock(&self.experience)?;
        let Some(record) = records.get_mut(&id) else {
            return Ok(None);
        };
        record.apply(fields);
        Ok(Some(record.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Experience>, StoreError> {
        Ok(lock(&self.experience)?.remove(&id))
    }
}

#[async_trait]
impl EducationRepository for MemoryStore {
    async fn insert(&self, record: Education) -> Result<Education, StoreError> {
        lock(&self.education)?.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Education>, StoreError> {
        Ok(lock(&self.education)?.get(&id).cloned())
    }

    async fn find_by_profile(&self, profile: Uuid) -> Result<Vec<Education>, StoreError> {
        let records = lock(&self.education)?;
        let mut matching: Vec<Education> = records
            .values()
            .filter(|record| record.profile == profile)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.from.cmp(&a.from));
        Ok(matching)
    }

    async fn update(
        &self,
        id: Uuid,
        fields: EducationFields,
    ) -> Result<Option<Education>, StoreError> {
        let mut records = lock(&self.education)?;
        let Some(record) = records.get_mut(&id) else {
            return Ok(None);
        };
        record.apply(fields);
        Ok(Some(record.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Education>, StoreError> {
        Ok(lock(&self.education)?.remove(&id))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn insert(&self, post: Post) -> Result<Post, StoreError> {
        lock(&self.posts)?.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(lock(&self.posts)?.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        let posts = lock(&self.posts)?;
        let mut all: Vec<Post> = posts.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    async fn find_by_author(&self, author: &UserId) -> Result<Vec<Post>, StoreError> {
        let posts = lock(&self.posts)?;
        let mut matching: Vec<Post> = posts
            .values()
            .filter(|post| post.user == *author)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(matching)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(lock(&self.posts)?.remove(&id))
    }

    async fn toggle_like(&self, id: Uuid, liker: &UserId) -> Result<Option<Post>, StoreError> {
        let mut posts = lock(&self.posts)?;
        let Some(post) = posts.get_mut(&id) else {
            return Ok(None);
        };
        // Check and flip under one lock so concurrent toggles cannot
        // duplicate an entry.
        if post.likes.contains(liker) {
            post.likes.retain(|user| user != liker);
        } else {
            post.likes.insert(0, *liker);
        }
        Ok(Some(post.clone()))
    }

    async fn push_comment(&self, id: Uuid, comment: Uuid) -> Result<Option<Post>, StoreError> {
        let mut posts = lock(&self.posts)?;
        let Some(post) = posts.get_mut(&id) else {
            return Ok(None);
        };
        post.comments.push(comment);
        Ok(Some(post.clone()))
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn insert(&self, comment: Comment) -> Result<Comment, StoreError> {
        lock(&self.comments)?.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        Ok(lock(&self.comments)?.get(&id).cloned())
    }

    async fn update_text(&self, id: Uuid, text: String) -> Result<Option<Comment>, StoreError> {
        let mut comments = lock(&self.comments)?;
        let Some(comment) = comments.get_mut(&id) else {
            return Ok(None);
        };
        comment.text = text;
        Ok(Some(comment.clone()))
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn display_info(&self, user: &UserId) -> Result<Option<UserDisplay>, StoreError> {
        Ok(lock(&self.users)?.get(user).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SocialLinks;

    fn draft(status: &str) -> ProfileDraft {
        ProfileDraft {
            status: status.to_owned(),
            skills: vec!["Rust".to_owned()],
            company: None,
            website: None,
            location: None,
            bio: None,
            github_user_name: None,
            social: SocialLinks::default(),
        }
    }

    fn display(name: &str) -> UserDisplay {
        UserDisplay {
            name: name.to_owned(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn push_child_inserts_at_the_head() {
        let store = MemoryStore::new();
        let owner = UserId::random();
        ProfileRepository::insert(&store, Profile::create(owner, draft("Dev")))
            .await
            .expect("insert profile");

        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        store
            .push_child(&owner, ResumeKind::Experience, first)
            .await
            .expect("push")
            .expect("profile exists");
        let updated = store
            .push_child(&owner, ResumeKind::Experience, second)
            .await
            .expect("push")
            .expect("profile exists");

        assert_eq!(updated.experience, vec![second, first]);
    }

    #[tokio::test]
    async fn pull_child_for_another_owner_leaves_the_list_unchanged() {
        let store = MemoryStore::new();
        let owner = UserId::random();
        let outsider = UserId::random();
        ProfileRepository::insert(&store, Profile::create(owner, draft("Dev")))
            .await
            .expect("insert profile");
        let child = Uuid::new_v4();
        store
            .push_child(&owner, ResumeKind::Education, child)
            .await
            .expect("push")
            .expect("profile exists");

        // The outsider has no profile, so an owner-filtered pull matches
        // nothing at all.
        let pulled = store
            .pull_child(&outsider, ResumeKind::Education, child)
            .await
            .expect("pull");
        assert!(pulled.is_none());

        let kept = store
            .find_by_user(&owner)
            .await
            .expect("find")
            .expect("profile exists");
        assert_eq!(kept.education, vec![child]);
    }

    #[tokio::test]
    async fn pull_child_tolerates_an_absent_id() {
        let store = MemoryStore::new();
        let owner = UserId::random();
        ProfileRepository::insert(&store, Profile::create(owner, draft("Dev")))
            .await
            .expect("insert profile");

        let pulled = store
            .pull_child(&owner, ResumeKind::Experience, Uuid::new_v4())
            .await
            .expect("pull");
        assert!(pulled.is_some());
    }

    #[tokio::test]
    async fn toggle_like_is_an_involution() {
        let store = MemoryStore::new();
        let author = UserId::random();
        let liker = UserId::random();
        let post = PostRepository::insert(
            &store,
            Post::create(author, "hello".to_owned(), display("Ann")),
        )
        .await
        .expect("insert post");

        let liked = store
            .toggle_like(post.id, &liker)
            .await
            .expect("toggle")
            .expect("post exists");
        assert_eq!(liked.likes, vec![liker]);

        let unliked = store
            .toggle_like(post.id, &liker)
            .await
            .expect("toggle")
            .expect("post exists");
        assert!(unliked.likes.is_empty());
    }

    #[tokio::test]
    async fn comments_append_at_the_tail() {
        let store = MemoryStore::new();
        let post = PostRepository::insert(
            &store,
            Post::create(UserId::random(), "hello".to_owned(), display("Ann")),
        )
        .await
        .expect("insert post");

        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        store
            .push_comment(post.id, first)
            .await
            .expect("push")
            .expect("post exists");
        let updated = store
            .push_comment(post.id, second)
            .await
            .expect("push")
            .expect("post exists");

        assert_eq!(updated.comments, vec![first, second]);
    }

    #[tokio::test]
    async fn update_fields_preserves_identity_and_references() {
        let store = MemoryStore::new();
        let owner = UserId::random();
        let created = ProfileRepository::insert(&store, Profile::create(owner, draft("Dev")))
            .await
            .expect("insert profile");
        let child = Uuid::new_v4();
        store
            .push_child(&owner, ResumeKind::Experience, child)
            .await
            .expect("push")
            .expect("profile exists");

        let updated = store
            .update_fields(&owner, draft("Senior Dev"))
            .await
            .expect("update")
            .expect("profile exists");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, "Senior Dev");
        assert_eq!(updated.experience, vec![child]);
    }

    #[tokio::test]
    async fn directory_misses_unknown_users() {
        let store = MemoryStore::new();
        let known = store.register_user("Ann", None).expect("register");

        assert!(
            store
                .display_info(&known)
                .await
                .expect("lookup")
                .is_some()
        );
        assert!(
            store
                .display_info(&UserId::random())
                .await
                .expect("lookup")
                .is_none()
        );
    }
}
