use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coerce;
use crate::error::ParseError;
use crate::json::{self, JsonObject};
use crate::model::id_name::id_name_list;
use crate::model::{Entity, FromJson, IdNameEntity, Message};
use crate::paged::{self, PagedList};

/// A thread of messages between participants.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    id: String,
    link: Option<String>,
    snippet: Option<String>,
    updated_time: Option<DateTime<Utc>>,
    message_count: Option<i32>,
    unread_count: Option<i32>,
    tags: Vec<String>,
    participants: Vec<IdNameEntity>,
    senders: Vec<IdNameEntity>,
    can_reply: Option<bool>,
    is_subscribed: Option<bool>,
    messages: PagedList<Message>,
}

impl Conversation {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Preview text of the latest message.
    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    pub fn updated_time(&self) -> Option<DateTime<Utc>> {
        self.updated_time
    }

    pub fn message_count(&self) -> Option<i32> {
        self.message_count
    }

    pub fn unread_count(&self) -> Option<i32> {
        self.unread_count
    }

    /// Folder tags such as `inbox` or `read`.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn participants(&self) -> &[IdNameEntity] {
        &self.participants
    }

    pub fn senders(&self) -> &[IdNameEntity] {
        &self.senders
    }

    pub fn can_reply(&self) -> Option<bool> {
        self.can_reply
    }

    pub fn is_subscribed(&self) -> Option<bool> {
        self.is_subscribed
    }

    /// The first page of messages, when requested through `fields`.
    pub fn messages(&self) -> &PagedList<Message> {
        &self.messages
    }
}

impl FromJson for Conversation {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError> {
        Ok(Self {
            id: coerce::require_string(json, "id")?,
            link: coerce::string(json, "link")?,
            snippet: coerce::string(json, "snippet")?,
            updated_time: coerce::datetime(json, "updated_time")?,
            message_count: coerce::int(json, "message_count")?,
            unread_count: coerce::int(json, "unread_count")?,
            tags: tags(json)?,
            participants: id_name_list(json, "participants")?,
            senders: id_name_list(json, "senders")?,
            can_reply: coerce::boolean(json, "can_reply")?,
            is_subscribed: coerce::boolean(json, "is_subscribed")?,
            messages: paged::nested(json, "messages", Message::from_json)?,
        })
    }
}

fn tags(json: &JsonObject) -> Result<Vec<String>, ParseError> {
    let Some(wrapper) = json::object(json, "tags")? else {
        return Ok(Vec::new());
    };
    let mut tags = Vec::new();
    for value in json::require_array(wrapper, "data")? {
        if let Some(name) = coerce::string(json::element(value, "tags")?, "name")? {
            tags.push(name);
        }
    }
    Ok(tags)
}

impl Entity for Conversation {
    const KIND: &'static str = "conversation";

    fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for Conversation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Conversation {}

impl Hash for Conversation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
