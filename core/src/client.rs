//! Request builder and response parser for the Graph API conversation
//! endpoints.
//!
//! # Design
//! `GraphClient` holds only its configuration and an observer, and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The caller (or a `Transport`) executes the HTTP
//! round-trip in between, keeping this layer deterministic.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};
use url::form_urlencoded;

use crate::coerce;
use crate::config::Configuration;
use crate::error::{GraphApiError, MalformedResponse, ParseError, ServiceError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::json::{self, JsonObject};
use crate::model::{Conversation, Entity, FromJson, Message};
use crate::observer::{NoopObserver, ParseObserver};
use crate::paged::{self, PagedList, Paging};
use crate::reading::Reading;

const CURRENT_USER: &str = "me";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Stateless client for the conversation endpoints.
#[derive(Clone)]
pub struct GraphClient {
    config: Configuration,
    observer: Arc<dyn ParseObserver>,
}

impl fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GraphClient {
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Receive parsed top-level entities. Only used when the configuration
    /// enables the JSON store.
    pub fn with_observer(mut self, observer: Arc<dyn ParseObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// `GET /{user_id}/conversations`, defaulting to the current user.
    pub fn build_get_conversations(&self, user_id: Option<&str>, reading: Option<&Reading>) -> HttpRequest {
        let user = user_id.unwrap_or(CURRENT_USER);
        self.get(&[user, "conversations"], reading)
    }

    pub fn build_get_conversation(&self, conversation_id: &str, reading: Option<&Reading>) -> HttpRequest {
        self.get(&[conversation_id], reading)
    }

    pub fn build_get_conversation_messages(
        &self,
        conversation_id: &str,
        reading: Option<&Reading>,
    ) -> HttpRequest {
        self.get(&[conversation_id, "messages"], reading)
    }

    pub fn build_get_message(&self, message_id: &str, reading: Option<&Reading>) -> HttpRequest {
        self.get(&[message_id], reading)
    }

    /// `POST /{conversation_id}/messages` with the reply text as a form field.
    pub fn build_answer_conversation(&self, conversation_id: &str, message: &str) -> HttpRequest {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("message", message)
            .finish();
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.url(&[conversation_id, "messages"], None),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(body),
        };
        debug!(url = %request.url, "built POST request");
        request
    }

    /// Request for the page after `paging`, if there is one.
    pub fn build_fetch_next(&self, paging: &Paging) -> Option<HttpRequest> {
        paging.next.as_deref().map(page_request)
    }

    /// Request for the page before `paging`, if there is one.
    pub fn build_fetch_previous(&self, paging: &Paging) -> Option<HttpRequest> {
        paging.previous.as_deref().map(page_request)
    }

    pub fn parse_conversations(&self, response: HttpResponse) -> Result<PagedList<Conversation>, ServiceError> {
        self.parse_list(response, Conversation::from_json)
    }

    pub fn parse_conversation(&self, response: HttpResponse) -> Result<Conversation, ServiceError> {
        self.parse_single(response)
    }

    pub fn parse_messages(&self, response: HttpResponse) -> Result<PagedList<Message>, ServiceError> {
        self.parse_list(response, Message::from_json)
    }

    pub fn parse_message(&self, response: HttpResponse) -> Result<Message, ServiceError> {
        self.parse_single(response)
    }

    /// Id of the message created by `build_answer_conversation`.
    pub fn parse_answer(&self, response: HttpResponse) -> Result<String, ServiceError> {
        let json = success_body(&response)?;
        coerce::require_string(&json, "id").map_err(|e| malformed(&response, e))
    }

    fn parse_list<T, F>(&self, response: HttpResponse, decode: F) -> Result<PagedList<T>, ServiceError>
    where
        T: Entity,
        F: Fn(&JsonObject) -> Result<T, ParseError>,
    {
        let envelope = success_body(&response)?;
        let observing = self.start_call();
        let data = json::require_array(&envelope, "data").map_err(|e| malformed(&response, e))?;
        let list = paged::decode_envelope(&envelope, decode).map_err(|e| malformed(&response, e))?;
        // Register only once the whole page decoded; items pair up with `data` one to one.
        if observing {
            for (item, raw) in list.iter().zip(data) {
                if let Some(raw) = raw.as_object() {
                    self.observer.on_entity_parsed(T::KIND, item.id(), raw);
                }
            }
        }
        debug!(kind = T::KIND, count = list.len(), "parsed list");
        Ok(list)
    }

    fn parse_single<T>(&self, response: HttpResponse) -> Result<T, ServiceError>
    where
        T: Entity + FromJson,
    {
        let json = success_body(&response)?;
        let observing = self.start_call();
        let entity = T::from_json(&json).map_err(|e| malformed(&response, e))?;
        if observing {
            self.observer.on_entity_parsed(T::KIND, entity.id(), &json);
        }
        debug!(kind = T::KIND, id = entity.id(), "parsed entity");
        Ok(entity)
    }

    fn start_call(&self) -> bool {
        let enabled = self.config.json_store_enabled();
        if enabled {
            self.observer.on_call_started();
        }
        enabled
    }

    fn get(&self, segments: &[&str], reading: Option<&Reading>) -> HttpRequest {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: self.url(segments, reading),
            headers: Vec::new(),
            body: None,
        };
        debug!(url = %request.url, "built GET request");
        request
    }

    fn url(&self, segments: &[&str], reading: Option<&Reading>) -> String {
        let mut url = self.config.base_url().clone();
        // `Configuration` only holds URLs that can be a base.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        let pairs = reading.map(Reading::query_pairs).unwrap_or_default();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url.into()
    }
}

fn page_request(url: &str) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url: url.to_string(),
        headers: Vec::new(),
        body: None,
    }
}

/// Check for a 2xx status and parse the body as a JSON object.
fn success_body(response: &HttpResponse) -> Result<JsonObject, ServiceError> {
    if !response.is_success() {
        let graph_error = graph_error(&response.body);
        warn!(status = response.status, error = ?graph_error, "request rejected");
        return Err(ServiceError::status(response.status, &response.body, graph_error));
    }
    json::parse_object(&response.body).map_err(|e| malformed(response, e))
}

fn malformed(response: &HttpResponse, cause: ParseError) -> ServiceError {
    warn!(status = response.status, %cause, "malformed response");
    ServiceError::malformed(response.status, MalformedResponse::from(cause))
}

/// Graph's `{"error": {...}}` body, when the response has one.
fn graph_error(body: &str) -> Option<GraphApiError> {
    let json = json::parse_object(body).ok()?;
    let error = json::object(&json, "error").ok()??;
    // Each field degrades to `None` on its own.
    Some(GraphApiError {
        message: coerce::string(error, "message").ok().flatten(),
        error_type: coerce::string(error, "type").ok().flatten(),
        code: coerce::int(error, "code").ok().flatten(),
        error_subcode: coerce::int(error, "error_subcode").ok().flatten(),
        fbtrace_id: coerce::string(error, "fbtrace_id").ok().flatten(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::JsonStore;
    use serde_json::Value;

    const BASE: &str = "http://localhost:3000/v2.7";

    fn client() -> GraphClient {
        GraphClient::new(Configuration::builder().rest_base_url(BASE).build().unwrap())
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_conversations_defaults_to_current_user() {
        let req = client().build_get_conversations(None, None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, format!("{BASE}/me/conversations"));
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_conversations_with_reading() {
        let reading = Reading::new().fields(["id", "snippet"]).limit(5);
        let req = client().build_get_conversations(Some("1234"), Some(&reading));
        assert_eq!(
            req.url,
            format!("{BASE}/1234/conversations?fields=id%2Csnippet&limit=5")
        );
    }

    #[test]
    fn build_get_conversation_escapes_the_id() {
        let req = client().build_get_conversation("t_mid.1:a/b", None);
        assert_eq!(req.url, format!("{BASE}/t_mid.1:a%2Fb"));
    }

    #[test]
    fn path_segments_use_percent_encoding_not_form_encoding() {
        let req = client().build_get_message("a b+c", None);
        assert_eq!(req.url, format!("{BASE}/a%20b+c"));
    }

    #[test]
    fn trailing_slash_in_base_does_not_double_up() {
        let config = Configuration::builder()
            .rest_base_url("http://localhost:3000/v2.7/")
            .build()
            .unwrap();
        let req = GraphClient::new(config).build_get_message("m_1", None);
        assert_eq!(req.url, "http://localhost:3000/v2.7/m_1");
    }

    #[test]
    fn build_get_conversation_messages_produces_correct_request() {
        let req = client().build_get_conversation_messages("t_1", None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, format!("{BASE}/t_1/messages"));
    }

    #[test]
    fn build_answer_conversation_posts_form_body() {
        let req = client().build_answer_conversation("t_1", "see you & bye");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE}/t_1/messages"));
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())]
        );
        assert_eq!(req.body.as_deref(), Some("message=see+you+%26+bye"));
    }

    #[test]
    fn build_fetch_next_uses_paging_url() {
        let paging = Paging {
            next: Some("https://graph.facebook.com/v2.7/me/conversations?after=QQ".to_string()),
            ..Paging::default()
        };
        let req = client().build_fetch_next(&paging).unwrap();
        assert_eq!(req.url, "https://graph.facebook.com/v2.7/me/conversations?after=QQ");
        assert!(client().build_fetch_previous(&paging).is_none());
    }

    #[test]
    fn parse_messages_maps_example_envelope() {
        let list = client()
            .parse_messages(ok(r#"{"data":[{"id":"1","message":"hi","from":{"id":"10","name":"A"}}]}"#))
            .unwrap();
        assert_eq!(list.len(), 1);
        let message = &list[0];
        assert_eq!(message.id(), "1");
        assert_eq!(message.message(), Some("hi"));
        assert_eq!(message.from().and_then(|f| f.name()), Some("A"));
        assert!(message.to().is_empty());
    }

    #[test]
    fn parse_conversation_success() {
        let conversation = client()
            .parse_conversation(ok(r#"{"id":"t_1","snippet":"hey","unread_count":0}"#))
            .unwrap();
        assert_eq!(conversation.id(), "t_1");
        assert_eq!(conversation.snippet(), Some("hey"));
    }

    #[test]
    fn parse_answer_returns_new_id() {
        let id = client().parse_answer(ok(r#"{"id":"m_mid.42"}"#)).unwrap();
        assert_eq!(id, "m_mid.42");
    }

    #[test]
    fn non_success_status_carries_graph_error() {
        let response = HttpResponse {
            status: 400,
            headers: Vec::new(),
            body: r#"{"error":{"message":"Unsupported get request.","type":"GraphMethodException","code":100,"fbtrace_id":"AbC"}}"#.to_string(),
        };
        let err = client().parse_conversation(response).unwrap_err();
        assert_eq!(err.status_code(), Some(400));
        let graph = err.graph_error().unwrap();
        assert_eq!(graph.code, Some(100));
        assert_eq!(graph.error_type.as_deref(), Some("GraphMethodException"));
        assert_eq!(graph.fbtrace_id.as_deref(), Some("AbC"));
    }

    #[test]
    fn graph_error_fields_degrade_independently() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: r#"{"error":{"message":{"text":"nested"},"type":"OAuthException","code":1.5,"fbtrace_id":"Xy"}}"#.to_string(),
        };
        let err = client().parse_message(response).unwrap_err();
        let graph = err.graph_error().unwrap();
        assert_eq!(graph.message, None);
        assert_eq!(graph.code, None);
        assert_eq!(graph.error_type.as_deref(), Some("OAuthException"));
        assert_eq!(graph.fbtrace_id.as_deref(), Some("Xy"));
    }

    #[test]
    fn non_success_status_with_plain_body() {
        let response = HttpResponse {
            status: 502,
            headers: Vec::new(),
            body: "bad gateway".to_string(),
        };
        let err = client().parse_messages(response).unwrap_err();
        assert_eq!(err.status_code(), Some(502));
        assert!(err.graph_error().is_none());
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn bad_json_is_a_malformed_response() {
        let err = client().parse_conversations(ok("not json")).unwrap_err();
        let malformed = err.malformed_response().unwrap();
        assert!(matches!(malformed.cause(), ParseError::Syntax(_)));
    }

    #[test]
    fn bad_timestamp_is_a_malformed_response() {
        let err = client()
            .parse_message(ok(r#"{"id":"1","created_time":"not-a-date"}"#))
            .unwrap_err();
        assert!(matches!(
            err.malformed_response().map(MalformedResponse::cause),
            Some(ParseError::Timestamp { .. })
        ));
    }

    #[test]
    fn list_response_without_data_is_malformed() {
        for body in [r#"{"paging":{}}"#, r#"{"id":"t_1"}"#] {
            let err = client().parse_conversations(ok(body)).unwrap_err();
            assert!(matches!(
                err.malformed_response().map(MalformedResponse::cause),
                Some(ParseError::MissingField(f)) if f == "data"
            ));
        }
    }

    #[test]
    fn json_store_receives_entities_when_enabled() {
        let store = Arc::new(JsonStore::new());
        let config = Configuration::builder()
            .rest_base_url(BASE)
            .json_store_enabled(true)
            .build()
            .unwrap();
        let client = GraphClient::new(config).with_observer(store.clone());

        let list = client
            .parse_messages(ok(r#"{"data":[{"id":"1","message":"a"},{"id":"2","message":"b"}]}"#))
            .unwrap();
        assert_eq!(store.len(), 2);
        let raw = store.raw_json_of(&list[1]).unwrap();
        assert_eq!(raw["message"], Value::from("b"));

        client.parse_message(ok(r#"{"id":"3"}"#)).unwrap();
        assert_eq!(store.len(), 1, "a new call clears the previous entries");
    }

    #[test]
    fn failed_list_registers_nothing() {
        let store = Arc::new(JsonStore::new());
        let config = Configuration::builder()
            .rest_base_url(BASE)
            .json_store_enabled(true)
            .build()
            .unwrap();
        let client = GraphClient::new(config).with_observer(store.clone());

        let err = client
            .parse_messages(ok(r#"{"data":[{"id":"1"},{"message":"no id"}]}"#))
            .unwrap_err();
        assert!(err.malformed_response().is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn json_store_untouched_when_disabled() {
        let store = Arc::new(JsonStore::new());
        let client = client().with_observer(store.clone());
        client.parse_messages(ok(r#"{"data":[{"id":"1"}]}"#)).unwrap();
        assert!(store.is_empty());
    }
}
