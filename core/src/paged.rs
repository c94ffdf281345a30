//! Paged list wrapper around Graph's list envelope.
//!
//! # Design
//! A list response looks like `{ "data": [...], "paging": {...}, "summary": {...} }`.
//! `decode_envelope` is generic over the per-entity decoder, so every entity
//! type shares one envelope implementation. The list is filled once while
//! decoding and is read-only afterwards.
//!
//! Nested `comments` and `attachments` objects are not always wrapped in
//! `data`. When `data` is absent the list is empty and only `paging` and
//! `summary` are read from the object.

use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coerce;
use crate::error::ParseError;
use crate::json::{self, JsonObject};

/// Page boundary tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cursors {
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Links to neighbouring pages of a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paging {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub cursors: Option<Cursors>,
}

impl Paging {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError> {
        let cursors = match json::object(json, "cursors")? {
            Some(c) => Some(Cursors {
                before: coerce::string(c, "before")?,
                after: coerce::string(c, "after")?,
            }),
            None => None,
        };
        Ok(Self {
            previous: coerce::string(json, "previous")?,
            next: coerce::string(json, "next")?,
            cursors,
        })
    }
}

/// Aggregate counts attached to a list. The inbox adds unread/unseen counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_count: Option<i64>,
    pub unread_count: Option<i32>,
    pub unseen_count: Option<i32>,
    pub updated_time: Option<DateTime<Utc>>,
}

impl Summary {
    fn from_json(json: &JsonObject) -> Result<Self, ParseError> {
        Ok(Self {
            total_count: coerce::long(json, "total_count")?,
            unread_count: coerce::int(json, "unread_count")?,
            unseen_count: coerce::int(json, "unseen_count")?,
            updated_time: coerce::datetime(json, "updated_time")?,
        })
    }
}

/// An ordered list of entities plus optional pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedList<T> {
    items: Vec<T>,
    paging: Option<Paging>,
    summary: Option<Summary>,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            paging: None,
            summary: None,
        }
    }
}

impl<T> PagedList<T> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn paging(&self) -> Option<&Paging> {
        self.paging.as_ref()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// `summary.total_count`, when the server sent it.
    pub fn total_count(&self) -> Option<i64> {
        self.summary.as_ref()?.total_count
    }

    pub fn next_page(&self) -> Option<&str> {
        self.paging.as_ref()?.next.as_deref()
    }

    pub fn previous_page(&self) -> Option<&str> {
        self.paging.as_ref()?.previous.as_deref()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Deref for PagedList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for PagedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Decode a list envelope with `decode` applied to every element.
pub fn decode_envelope<T, F>(envelope: &JsonObject, decode: F) -> Result<PagedList<T>, ParseError>
where
    F: Fn(&JsonObject) -> Result<T, ParseError>,
{
    let items = match json::array(envelope, "data")? {
        Some(data) => data
            .iter()
            .map(|value| decode(json::element(value, "data")?))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let paging = json::object(envelope, "paging")?
        .map(Paging::from_json)
        .transpose()?;
    let summary = json::object(envelope, "summary")?
        .map(Summary::from_json)
        .transpose()?;

    Ok(PagedList {
        items,
        paging,
        summary,
    })
}

/// Decode the list nested under `key`; absent or null yields an empty list.
pub fn nested<T, F>(json: &JsonObject, key: &str, decode: F) -> Result<PagedList<T>, ParseError>
where
    F: Fn(&JsonObject) -> Result<T, ParseError>,
{
    match json::object(json, key)? {
        Some(envelope) => decode_envelope(envelope, decode),
        None => Ok(PagedList::empty()),
    }
}
