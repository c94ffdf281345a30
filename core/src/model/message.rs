use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coerce;
use crate::error::ParseError;
use crate::json::{self, JsonObject};
use crate::model::id_name::id_name_list;
use crate::model::{Attachment, Comment, Entity, FromJson, IdNameEntity};
use crate::paged::{self, PagedList};

/// A single message in a conversation.
///
/// Two messages are equal when their ids are equal, whatever their content.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    id: String,
    from: Option<IdNameEntity>,
    to: Vec<IdNameEntity>,
    message: Option<String>,
    created_time: Option<DateTime<Utc>>,
    updated_time: Option<DateTime<Utc>>,
    comments: PagedList<Comment>,
    attachments: PagedList<Attachment>,
    unread: Option<i32>,
    unseen: Option<i32>,
}

impl Message {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sender.
    pub fn from(&self) -> Option<&IdNameEntity> {
        self.from.as_ref()
    }

    /// Recipients in the order the server listed them.
    pub fn to(&self) -> &[IdNameEntity] {
        &self.to
    }

    /// Body text.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.created_time
    }

    pub fn updated_time(&self) -> Option<DateTime<Utc>> {
        self.updated_time
    }

    pub fn comments(&self) -> &PagedList<Comment> {
        &self.comments
    }

    pub fn attachments(&self) -> &PagedList<Attachment> {
        &self.attachments
    }

    pub fn unread(&self) -> Option<i32> {
        self.unread
    }

    pub fn unseen(&self) -> Option<i32> {
        self.unseen
    }
}

impl FromJson for Message {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError> {
        let id = coerce::require_string(json, "id")?;
        let from = json::object(json, "from")?
            .map(IdNameEntity::from_json)
            .transpose()?;
        let to = id_name_list(json, "to")?;
        let message = coerce::string(json, "message")?;
        let created_time = coerce::datetime(json, "created_time")?;
        let updated_time = coerce::datetime(json, "updated_time")?;
        let comments = paged::nested(json, "comments", Comment::from_json)?;
        let attachments = paged::nested(json, "attachments", Attachment::from_json)?;
        let unread = coerce::int(json, "unread")?;
        let unseen = coerce::int(json, "unseen")?;

        Ok(Self {
            id,
            from,
            to,
            message,
            created_time,
            updated_time,
            comments,
            attachments,
            unread,
            unseen,
        })
    }
}

impl Entity for Message {
    const KIND: &'static str = "message";

    fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
