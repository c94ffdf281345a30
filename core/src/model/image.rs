use serde::Serialize;

use crate::coerce;
use crate::error::ParseError;
use crate::json::JsonObject;
use crate::model::FromJson;

/// A picture with its dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Image {
    height: Option<i32>,
    width: Option<i32>,
    source: Option<String>,
}

impl Image {
    pub fn height(&self) -> Option<i32> {
        self.height
    }

    pub fn width(&self) -> Option<i32> {
        self.width
    }

    /// URL of the picture.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl FromJson for Image {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError> {
        let height = coerce::int(json, "height")?;
        let width = coerce::int(json, "width")?;
        // attachment media calls it `src`
        let source = match coerce::string(json, "source")? {
            Some(source) => Some(source),
            None => coerce::string(json, "src")?,
        };
        Ok(Self {
            height,
            width,
            source,
        })
    }
}
