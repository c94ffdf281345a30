//! Synchronous client core for the Graph API conversation endpoints.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). Response bodies are mapped
//! into immutable typed entities (`Conversation`, `Message`, `Comment`,
//! `Attachment` ...) and list envelopes into `PagedList`.
//!
//! # Design
//! - `GraphClient` is stateless: it holds its `Configuration` and an
//!   injected `ParseObserver`.
//! - `ConversationMethods` is the typed operation surface; `Facebook` drives
//!   it through any `Transport` the host provides.
//! - Malformed bodies surface as `MalformedResponse`, wrapped in the single
//!   `ServiceError` the operation layer returns.

pub mod client;
pub mod coerce;
pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod methods;
pub mod model;
pub mod observer;
pub mod paged;
pub mod reading;

pub use client::GraphClient;
pub use config::{Configuration, ConfigurationBuilder};
pub use error::{ConfigError, GraphApiError, MalformedResponse, ParseError, ServiceError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use methods::{ConversationMethods, Facebook, Transport};
pub use model::{
    Attachment, AttachmentMedia, AttachmentTarget, Comment, Conversation, Entity, FromJson, IdNameEntity, Image,
    Message,
};
pub use observer::{JsonStore, NoopObserver, ParseObserver};
pub use paged::{Cursors, PagedList, Paging, Summary};
pub use reading::Reading;
