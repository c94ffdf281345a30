use serde::Serialize;

use crate::coerce;
use crate::error::ParseError;
use crate::json::{self, JsonObject};
use crate::model::FromJson;

/// Id and display name of a user or page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct IdNameEntity {
    id: Option<String>,
    name: Option<String>,
}

impl IdNameEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl FromJson for IdNameEntity {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError> {
        Ok(Self {
            id: coerce::string(json, "id")?,
            name: coerce::string(json, "name")?,
        })
    }
}

/// Read `{key: {data: [...]}}` as a list of id/name pairs. Absent → empty.
pub(crate) fn id_name_list(json: &JsonObject, key: &str) -> Result<Vec<IdNameEntity>, ParseError> {
    let Some(wrapper) = json::object(json, key)? else {
        return Ok(Vec::new());
    };
    json::require_array(wrapper, "data")?
        .iter()
        .map(|value| IdNameEntity::from_json(json::element(value, key)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equal_only_when_both_fields_match() {
        let a = IdNameEntity::new("10", "A");
        assert_eq!(a, IdNameEntity::new("10", "A"));
        assert_ne!(a, IdNameEntity::new("10", "B"));
        assert_ne!(a, IdNameEntity::new("11", "A"));
    }

    #[test]
    fn list_reads_data_array_in_order() {
        let json = json!({ "to": { "data": [
            { "id": "1", "name": "One" },
            { "id": "2", "name": "Two" }
        ] } });
        let list = id_name_list(json.as_object().unwrap(), "to").unwrap();
        assert_eq!(list, vec![IdNameEntity::new("1", "One"), IdNameEntity::new("2", "Two")]);
    }

    #[test]
    fn list_without_data_is_malformed() {
        let json = json!({ "to": { "count": 2 } });
        let err = id_name_list(json.as_object().unwrap(), "to").unwrap_err();
        assert!(matches!(err, ParseError::MissingField(ref f) if f == "data"));
    }
}
