use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coerce;
use crate::error::ParseError;
use crate::json::{self, JsonObject};
use crate::model::{Entity, FromJson, IdNameEntity};

/// A comment on a message or post.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    id: String,
    from: Option<IdNameEntity>,
    message: Option<String>,
    created_time: Option<DateTime<Utc>>,
    like_count: Option<i32>,
    comment_count: Option<i32>,
    user_likes: Option<bool>,
    can_comment: Option<bool>,
    can_remove: Option<bool>,
    can_like: Option<bool>,
    can_hide: Option<bool>,
    is_hidden: Option<bool>,
}

impl Comment {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from(&self) -> Option<&IdNameEntity> {
        self.from.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.created_time
    }

    pub fn like_count(&self) -> Option<i32> {
        self.like_count
    }

    pub fn comment_count(&self) -> Option<i32> {
        self.comment_count
    }

    /// Whether the current user likes this comment.
    pub fn user_likes(&self) -> Option<bool> {
        self.user_likes
    }

    pub fn can_comment(&self) -> Option<bool> {
        self.can_comment
    }

    pub fn can_remove(&self) -> Option<bool> {
        self.can_remove
    }

    pub fn can_like(&self) -> Option<bool> {
        self.can_like
    }

    pub fn can_hide(&self) -> Option<bool> {
        self.can_hide
    }

    pub fn is_hidden(&self) -> Option<bool> {
        self.is_hidden
    }
}

impl FromJson for Comment {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError> {
        Ok(Self {
            id: coerce::require_string(json, "id")?,
            from: json::object(json, "from")?
                .map(IdNameEntity::from_json)
                .transpose()?,
            message: coerce::string(json, "message")?,
            created_time: coerce::datetime(json, "created_time")?,
            like_count: coerce::int(json, "like_count")?,
            comment_count: coerce::int(json, "comment_count")?,
            user_likes: coerce::boolean(json, "user_likes")?,
            can_comment: coerce::boolean(json, "can_comment")?,
            can_remove: coerce::boolean(json, "can_remove")?,
            can_like: coerce::boolean(json, "can_like")?,
            can_hide: coerce::boolean(json, "can_hide")?,
            is_hidden: coerce::boolean(json, "is_hidden")?,
        })
    }
}

impl Entity for Comment {
    const KIND: &'static str = "comment";

    fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Comment {}

impl Hash for Comment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
