//! Typed Graph API entities.
//!
//! # Design
//! Each entity is built once from a JSON object by `FromJson::from_json` and
//! never mutated afterwards. Fields are private and read through accessors.
//! Nested values (attachments, media, targets) are standalone types owned by
//! their parent; ownership is a plain tree.
//!
//! Top-level entities (`Message`, `Comment`, `Conversation`) compare and hash
//! by id only. Value types compare every field.

mod attachment;
mod comment;
mod conversation;
mod id_name;
mod image;
mod message;

pub use attachment::{Attachment, AttachmentMedia, AttachmentTarget};
pub use comment::Comment;
pub use conversation::Conversation;
pub use id_name::IdNameEntity;
pub use image::Image;
pub use message::Message;

use crate::error::{MalformedResponse, ParseError};
use crate::json::{self, JsonObject};

/// Construction of an entity from its JSON object.
pub trait FromJson: Sized {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError>;

    /// Parse a whole response body holding a single entity.
    fn from_body(body: &str) -> Result<Self, MalformedResponse> {
        let json = json::parse_object(body)?;
        Ok(Self::from_json(&json)?)
    }
}

/// An entity with a Graph id.
pub trait Entity {
    /// Short name of the entity type, used to key stored raw JSON.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn from_body_wraps_parse_errors() {
        let message = Message::from_body(r#"{"id":"1","message":"hi"}"#).unwrap();
        assert_eq!(message.message(), Some("hi"));

        let err = Message::from_body("[]").unwrap_err();
        assert!(matches!(err.cause(), ParseError::WrongType { .. }));
        let err = Conversation::from_body(r#"{"snippet":"no id"}"#).unwrap_err();
        assert!(matches!(err.cause(), ParseError::MissingField(_)));
    }
}
