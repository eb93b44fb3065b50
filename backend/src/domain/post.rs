//! Post aggregate and comment child records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Display snapshot of a user, captured when a post or comment is created.
///
/// Snapshots are intentionally not kept in sync with later profile edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDisplay {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Post aggregate: text plus a like list and ordered comment references.
///
/// Invariant: no liker id appears twice in `likes`. The like toggle is a
/// single conditional store operation, so the invariant holds even under
/// concurrent toggles from the same caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user: UserId,
    pub text: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Liker ids, most recent first, unique per liker.
    pub likes: Vec<UserId>,
    /// Ordered comment references, chronological.
    pub comments: Vec<Uuid>,
    pub date: DateTime<Utc>,
}

impl Post {
    /// Create a post authored by `user` with their display snapshot.
    pub fn create(user: UserId, text: String, author: UserDisplay) -> Self {
        let UserDisplay { name, avatar } = author;
        Self {
            id: Uuid::new_v4(),
            user,
            text,
            name,
            avatar,
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now(),
        }
    }
}

/// Comment child record.
///
/// Comments survive the deletion of their post: the cleanup protocol is
/// one-way only, so a comment whose post is gone stays fetchable by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    /// Back-reference to the owning post.
    pub post: Uuid,
    pub text: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub date: DateTime<Utc>,
}

impl Comment {
    /// Create a comment on `post` with the author's display snapshot.
    pub fn create(post: Uuid, text: String, author: UserDisplay) -> Self {
        let UserDisplay { name, avatar } = author;
        Self {
            id: Uuid::new_v4(),
            post,
            text,
            name,
            avatar,
            date: Utc::now(),
        }
    }
}
