use serde::Serialize;

use crate::coerce;
use crate::error::ParseError;
use crate::json::{self, JsonObject};
use crate::model::{FromJson, Image};

/// A file or link attached to a message.
///
/// Every field is independently optional; an empty string is kept as such and
/// is not the same as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Attachment {
    description: Option<String>,
    media: Option<AttachmentMedia>,
    target: Option<AttachmentTarget>,
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    url: Option<String>,
}

impl Attachment {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn media(&self) -> Option<&AttachmentMedia> {
        self.media.as_ref()
    }

    pub fn target(&self) -> Option<&AttachmentTarget> {
        self.target.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The `type` field, e.g. `share` or `photo`.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl FromJson for Attachment {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError> {
        Ok(Self {
            description: coerce::string(json, "description")?,
            media: json::object(json, "media")?
                .map(AttachmentMedia::from_json)
                .transpose()?,
            target: json::object(json, "target")?
                .map(AttachmentTarget::from_json)
                .transpose()?,
            title: coerce::string(json, "title")?,
            kind: coerce::string(json, "type")?,
            url: coerce::string(json, "url")?,
        })
    }
}

/// Media preview of an attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AttachmentMedia {
    image: Image,
}

impl AttachmentMedia {
    pub fn image(&self) -> &Image {
        &self.image
    }
}

impl FromJson for AttachmentMedia {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError> {
        Ok(Self {
            image: Image::from_json(json::require_object(json, "image")?)?,
        })
    }
}

/// The object an attachment links to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AttachmentTarget {
    id: Option<String>,
    url: Option<String>,
}

impl AttachmentTarget {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl FromJson for AttachmentTarget {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError> {
        Ok(Self {
            id: coerce::string(json, "id")?,
            url: coerce::string(json, "url")?,
        })
    }
}
