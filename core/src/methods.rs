//! Typed remote operations on top of a pluggable transport.
//!
//! # Design
//! `ConversationMethods` is the surface callers program against. `Facebook`
//! implements it by pairing a `GraphClient` with a host-supplied `Transport`:
//! build the request, hand it to the transport, parse the response. Every
//! failure is reported as a `ServiceError`.

use std::error::Error as StdError;

use tracing::debug;

use crate::client::GraphClient;
use crate::error::ServiceError;
use crate::http::{HttpRequest, HttpResponse};
use crate::model::{Conversation, Message};
use crate::paged::{PagedList, Paging};
use crate::reading::Reading;

/// Executes one HTTP round-trip.
///
/// Non-2xx responses must be returned as `Ok`; status handling belongs to the
/// client. `Err` is for failures where no response was received.
pub trait Transport {
    type Error: StdError + Send + Sync + 'static;

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error>;
}

/// Conversation (inbox) operations.
pub trait ConversationMethods {
    /// Conversations of `user_id`, or of the current user when `None`.
    fn get_conversations(
        &self,
        user_id: Option<&str>,
        reading: Option<&Reading>,
    ) -> Result<PagedList<Conversation>, ServiceError>;

    fn get_conversation(
        &self,
        conversation_id: &str,
        reading: Option<&Reading>,
    ) -> Result<Conversation, ServiceError>;

    fn get_conversation_messages(
        &self,
        conversation_id: &str,
        reading: Option<&Reading>,
    ) -> Result<PagedList<Message>, ServiceError>;

    fn get_message(&self, message_id: &str, reading: Option<&Reading>) -> Result<Message, ServiceError>;

    /// Reply to a conversation. Returns the id of the new message.
    fn answer_conversation(&self, conversation_id: &str, message: &str) -> Result<String, ServiceError>;

    /// The page after `paging`, or `None` on the last page.
    fn fetch_next_conversations(
        &self,
        paging: &Paging,
    ) -> Result<Option<PagedList<Conversation>>, ServiceError>;

    /// The page before `paging`, or `None` on the first page.
    fn fetch_previous_conversations(
        &self,
        paging: &Paging,
    ) -> Result<Option<PagedList<Conversation>>, ServiceError>;
}

/// Graph API facade driving a `GraphClient` through a `Transport`.
#[derive(Debug, Clone)]
pub struct Facebook<T> {
    client: GraphClient,
    transport: T,
}

impl<T: Transport> Facebook<T> {
    pub fn new(client: GraphClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &GraphClient {
        &self.client
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ServiceError> {
        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.execute(request).map_err(ServiceError::transport)?;
        debug!(method = method.as_str(), %url, status = response.status, "request completed");
        Ok(response)
    }
}

impl<T: Transport> ConversationMethods for Facebook<T> {
    fn get_conversations(
        &self,
        user_id: Option<&str>,
        reading: Option<&Reading>,
    ) -> Result<PagedList<Conversation>, ServiceError> {
        let response = self.execute(self.client.build_get_conversations(user_id, reading))?;
        self.client.parse_conversations(response)
    }

    fn get_conversation(
        &self,
        conversation_id: &str,
        reading: Option<&Reading>,
    ) -> Result<Conversation, ServiceError> {
        let response = self.execute(self.client.build_get_conversation(conversation_id, reading))?;
        self.client.parse_conversation(response)
    }

    fn get_conversation_messages(
        &self,
        conversation_id: &str,
        reading: Option<&Reading>,
    ) -> Result<PagedList<Message>, ServiceError> {
        let request = self
            .client
            .build_get_conversation_messages(conversation_id, reading);
        let response = self.execute(request)?;
        self.client.parse_messages(response)
    }

    fn get_message(&self, message_id: &str, reading: Option<&Reading>) -> Result<Message, ServiceError> {
        let response = self.execute(self.client.build_get_message(message_id, reading))?;
        self.client.parse_message(response)
    }

    fn answer_conversation(&self, conversation_id: &str, message: &str) -> Result<String, ServiceError> {
        let response = self.execute(self.client.build_answer_conversation(conversation_id, message))?;
        self.client.parse_answer(response)
    }

    fn fetch_next_conversations(
        &self,
        paging: &Paging,
    ) -> Result<Option<PagedList<Conversation>>, ServiceError> {
        let Some(request) = self.client.build_fetch_next(paging) else {
            return Ok(None);
        };
        let response = self.execute(request)?;
        self.client.parse_conversations(response).map(Some)
    }

    fn fetch_previous_conversations(
        &self,
        paging: &Paging,
    ) -> Result<Option<PagedList<Conversation>>, ServiceError> {
        let Some(request) = self.client.build_fetch_previous(paging) else {
            return Ok(None);
        };
        let response = self.execute(request)?;
        self.client.parse_conversations(response).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::http::HttpMethod;
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::io;

    /// Replies with a fixed response and records every request.
    struct Canned {
        response: HttpResponse,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_string(),
                },
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        type Error = Infallible;

        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, Infallible> {
            self.requests.borrow_mut().push(request);
            Ok(self.response.clone())
        }
    }

    struct Offline;

    impl Transport for Offline {
        type Error = io::Error;

        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, io::Error> {
            Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
        }
    }

    fn facebook<T: Transport>(transport: T) -> Facebook<T> {
        let config = Configuration::builder()
            .rest_base_url("http://graph.test/v2.7")
            .build()
            .unwrap();
        Facebook::new(GraphClient::new(config), transport)
    }

    #[test]
    fn get_conversations_builds_and_parses() {
        let fb = facebook(Canned::new(
            200,
            r#"{"data":[{"id":"t_1"},{"id":"t_2"}],"summary":{"unread_count":1}}"#,
        ));
        let list = fb.get_conversations(None, None).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.summary().unwrap().unread_count, Some(1));

        let requests = fb.transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://graph.test/v2.7/me/conversations");
    }

    #[test]
    fn answer_conversation_returns_id() {
        let fb = facebook(Canned::new(200, r#"{"id":"m_9"}"#));
        assert_eq!(fb.answer_conversation("t_1", "ok").unwrap(), "m_9");
        assert_eq!(fb.transport.requests.borrow()[0].method, HttpMethod::Post);
    }

    #[test]
    fn fetch_next_without_next_link_is_none() {
        let fb = facebook(Canned::new(200, "{}"));
        assert!(fb.fetch_next_conversations(&Paging::default()).unwrap().is_none());
        assert!(fb.transport.requests.borrow().is_empty());
    }

    #[test]
    fn fetch_previous_follows_previous_link() {
        let fb = facebook(Canned::new(200, r#"{"data":[{"id":"t_1"}]}"#));
        let paging = Paging {
            previous: Some("http://graph.test/v2.7/me/conversations?before=idx0".to_string()),
            ..Paging::default()
        };
        let page = fb.fetch_previous_conversations(&paging).unwrap().unwrap();
        assert_eq!(page[0].id(), "t_1");
        assert_eq!(
            fb.transport.requests.borrow()[0].url,
            "http://graph.test/v2.7/me/conversations?before=idx0"
        );
    }

    #[test]
    fn transport_failure_becomes_service_error() {
        let fb = facebook(Offline);
        let err = fb.get_message("m_1", None).unwrap_err();
        assert_eq!(err.status_code(), None);
        let cause = err.source().unwrap().downcast_ref::<io::Error>().unwrap();
        assert_eq!(cause.kind(), io::ErrorKind::ConnectionRefused);
    }

    #[test]
    fn rejected_request_becomes_service_error() {
        let fb = facebook(Canned::new(
            400,
            r#"{"error":{"message":"Invalid OAuth access token.","type":"OAuthException","code":190}}"#,
        ));
        let err = fb.get_conversation("t_1", None).unwrap_err();
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.graph_error().unwrap().code, Some(190));
    }
}
