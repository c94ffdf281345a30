//! In-memory stand-in for the Graph API conversation endpoints.
//!
//! Serves the envelope shapes the real API returns (`data`, `paging`,
//! `summary`, Graph `error` bodies) from a seeded inbox, so the client can be
//! exercised end to end without credentials.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::HOST, HeaderMap, StatusCode},
    routing::get,
    Form, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const API_VERSION: &str = "v2.7";
pub const CURRENT_USER_ID: &str = "100";
const DEFAULT_LIMIT: usize = 25;
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub from: Participant,
    pub to: Vec<Participant>,
    pub message: String,
    pub created_time: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    pub participants: Vec<Participant>,
    pub unread_count: u32,
    /// Oldest first.
    pub messages: Vec<MessageRecord>,
}

impl ConversationRecord {
    fn updated_time(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.created_time)
    }
}

#[derive(Debug, Default)]
pub struct Inbox {
    /// Most recently updated first.
    pub conversations: Vec<ConversationRecord>,
}

impl Inbox {
    /// A small inbox for the current user with two threads.
    pub fn seeded() -> Self {
        let me = participant(CURRENT_USER_ID, "Me");
        let alice = participant("200", "Alice");
        let bob = participant("300", "Bob");
        let at = |s: &str| {
            DateTime::parse_from_str(s, TIME_FORMAT)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_default()
        };

        let with_alice = ConversationRecord {
            id: "t_1".to_string(),
            participants: vec![me.clone(), alice.clone()],
            unread_count: 1,
            messages: vec![
                MessageRecord {
                    id: "m_1".to_string(),
                    from: me.clone(),
                    to: vec![alice.clone()],
                    message: "Lunch tomorrow?".to_string(),
                    created_time: at("2016-08-01T09:00:00+0000"),
                },
                MessageRecord {
                    id: "m_2".to_string(),
                    from: alice.clone(),
                    to: vec![me.clone()],
                    message: "Sure, noon works".to_string(),
                    created_time: at("2016-08-01T09:05:00+0000"),
                },
            ],
        };
        let with_bob = ConversationRecord {
            id: "t_2".to_string(),
            participants: vec![me.clone(), bob.clone()],
            unread_count: 0,
            messages: vec![MessageRecord {
                id: "m_3".to_string(),
                from: bob,
                to: vec![me],
                message: "Sent you the slides".to_string(),
                created_time: at("2016-07-30T18:30:00+0000"),
            }],
        };

        Self {
            conversations: vec![with_alice, with_bob],
        }
    }

    fn conversation(&self, id: &str) -> Option<&ConversationRecord> {
        self.conversations.iter().find(|c| c.id == id)
    }

    fn message(&self, id: &str) -> Option<&MessageRecord> {
        self.conversations
            .iter()
            .flat_map(|c| c.messages.iter())
            .find(|m| m.id == id)
    }
}

fn participant(id: &str, name: &str) -> Participant {
    Participant {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub type Db = Arc<RwLock<Inbox>>;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyForm {
    pub message: String,
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    app_with(Inbox::seeded())
}

pub fn app_with(inbox: Inbox) -> Router {
    let db: Db = Arc::new(RwLock::new(inbox));
    let api = Router::new()
        .route("/{id}", get(get_object))
        .route("/{id}/conversations", get(list_conversations))
        .route("/{id}/messages", get(list_messages).post(post_message))
        .with_state(db);
    Router::new().nest(&format!("/{API_VERSION}"), api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), "mock Graph API listening");
    axum::serve(listener, app()).await
}

async fn list_conversations(
    State(db): State<Db>,
    Path(user_id): Path<String>,
    Query(page): Query<PageQuery>,
    headers: HeaderMap,
) -> ApiResult {
    if user_id != "me" && user_id != CURRENT_USER_ID {
        return Err(unknown_object(&user_id));
    }
    let inbox = db.read().await;
    let (start, end) = page_bounds(&page, inbox.conversations.len())?;
    let data: Vec<Value> = inbox.conversations[start..end]
        .iter()
        .map(|c| conversation_json(c, false))
        .collect();
    debug!(%user_id, start, end, "listing conversations");

    let path = format!("{user_id}/conversations");
    let mut envelope = json!({
        "data": data,
        "paging": paging_json(&headers, &path, &page, start, end, inbox.conversations.len()),
        "summary": {
            "unread_count": inbox.conversations.iter().filter(|c| c.unread_count > 0).count(),
            "unseen_count": 0,
        },
    });
    if let Some(updated) = inbox.conversations.iter().filter_map(ConversationRecord::updated_time).max() {
        envelope["summary"]["updated_time"] = json!(format_time(updated));
    }
    Ok(Json(envelope))
}

async fn get_object(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let inbox = db.read().await;
    if let Some(conversation) = inbox.conversation(&id) {
        return Ok(Json(conversation_json(conversation, true)));
    }
    if let Some(message) = inbox.message(&id) {
        return Ok(Json(message_json(message)));
    }
    Err(unknown_object(&id))
}

async fn list_messages(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(page): Query<PageQuery>,
    headers: HeaderMap,
) -> ApiResult {
    let inbox = db.read().await;
    let conversation = inbox.conversation(&id).ok_or_else(|| unknown_object(&id))?;
    let newest_first: Vec<&MessageRecord> = conversation.messages.iter().rev().collect();
    let (start, end) = page_bounds(&page, newest_first.len())?;
    let data: Vec<Value> = newest_first[start..end].iter().map(|m| message_json(m)).collect();

    let path = format!("{id}/messages");
    Ok(Json(json!({
        "data": data,
        "paging": paging_json(&headers, &path, &page, start, end, newest_first.len()),
    })))
}

async fn post_message(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(form): Form<ReplyForm>,
) -> ApiResult {
    if form.message.trim().is_empty() {
        return Err(graph_error(
            StatusCode::BAD_REQUEST,
            "(#100) Param message must be non-empty UTF-8 encoded string",
            "OAuthException",
            100,
        ));
    }
    let mut inbox = db.write().await;
    let position = inbox
        .conversations
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| unknown_object(&id))?;

    let mut conversation = inbox.conversations.remove(position);
    let from = conversation
        .participants
        .iter()
        .find(|p| p.id == CURRENT_USER_ID)
        .cloned()
        .unwrap_or_else(|| participant(CURRENT_USER_ID, "Me"));
    let to = conversation
        .participants
        .iter()
        .filter(|p| p.id != CURRENT_USER_ID)
        .cloned()
        .collect();
    let message_id = format!("m_{}", Uuid::new_v4().simple());
    conversation.messages.push(MessageRecord {
        id: message_id.clone(),
        from,
        to,
        message: form.message,
        created_time: Utc::now(),
    });
    inbox.conversations.insert(0, conversation);
    info!(conversation = %id, message = %message_id, "reply stored");

    Ok(Json(json!({ "id": message_id })))
}

fn page_bounds(page: &PageQuery, len: usize) -> Result<(usize, usize), (StatusCode, Json<Value>)> {
    let start = match &page.after {
        None => 0,
        Some(cursor) => decode_cursor(cursor)
            .ok_or_else(|| graph_error(StatusCode::BAD_REQUEST, "Invalid cursor", "OAuthException", 100))?
            .saturating_add(1),
    };
    let limit = page.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let start = start.min(len);
    Ok((start, start.saturating_add(limit).min(len)))
}

fn paging_json(
    headers: &HeaderMap,
    path: &str,
    page: &PageQuery,
    start: usize,
    end: usize,
    len: usize,
) -> Value {
    if start == end {
        return json!({});
    }
    let mut paging = json!({
        "cursors": { "before": encode_cursor(start), "after": encode_cursor(end - 1) },
    });
    if end < len {
        let host = headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost");
        let limit = page.limit.unwrap_or(DEFAULT_LIMIT);
        paging["next"] = json!(format!(
            "http://{host}/{API_VERSION}/{path}?limit={limit}&after={}",
            encode_cursor(end - 1)
        ));
    }
    paging
}

fn encode_cursor(index: usize) -> String {
    format!("idx{index}")
}

fn decode_cursor(cursor: &str) -> Option<usize> {
    cursor.strip_prefix("idx")?.parse().ok()
}

fn conversation_json(conversation: &ConversationRecord, with_messages: bool) -> Value {
    let mut value = json!({
        "id": conversation.id,
        "link": format!("/messages/{}", conversation.id),
        "snippet": conversation.messages.last().map(|m| m.message.as_str()),
        "updated_time": conversation.updated_time().map(format_time),
        "message_count": conversation.messages.len(),
        "unread_count": conversation.unread_count,
        "tags": { "data": [{ "name": "inbox" }] },
        "participants": { "data": conversation.participants },
        "senders": { "data": senders(conversation) },
        "can_reply": true,
        "is_subscribed": true,
    });
    if with_messages {
        let data: Vec<Value> = conversation.messages.iter().rev().map(message_json).collect();
        value["messages"] = json!({ "data": data });
    }
    value
}

fn senders(conversation: &ConversationRecord) -> Vec<Participant> {
    let mut senders: Vec<Participant> = Vec::new();
    for message in conversation.messages.iter().rev() {
        if !senders.contains(&message.from) {
            senders.push(message.from.clone());
        }
    }
    senders
}

fn message_json(message: &MessageRecord) -> Value {
    json!({
        "id": message.id,
        "from": message.from,
        "to": { "data": message.to },
        "message": message.message,
        "created_time": format_time(message.created_time),
    })
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn unknown_object(id: &str) -> (StatusCode, Json<Value>) {
    graph_error(
        StatusCode::BAD_REQUEST,
        &format!("Unsupported get request. Object with ID '{id}' does not exist"),
        "GraphMethodException",
        100,
    )
}

fn graph_error(status: StatusCode, message: &str, kind: &str, code: u32) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "error": {
                "message": message,
                "type": kind,
                "code": code,
                "fbtrace_id": "MockTrace",
            }
        })),
    )
}
