//! Per-session sliding-window conversation memory.
//!
//! Each session owns a bounded buffer behind its own mutex; the outer map is
//! only write-locked to create or drop a session. State is never persisted.
//!
//! At most `max_sessions` sessions are kept; creating one more evicts the
//! least recently used session.

use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Default for [`ConversationMemory::new`].
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

type SessionBuffer = Arc<Mutex<VecDeque<ConversationTurn>>>;

struct Session {
    buf: SessionBuffer,
    last_used: AtomicU64,
}

pub struct ConversationMemory {
    capacity: usize,
    max_sessions: usize,
    clock: AtomicU64,
    sessions: RwLock<HashMap<String, Session>>,
}

impl ConversationMemory {
    /// `capacity` is the number of turns kept per session (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        Self::with_max_sessions(capacity, DEFAULT_MAX_SESSIONS)
    }

    /// Same as [`ConversationMemory::new`] with an explicit session cap (at least 1).
    pub fn with_max_sessions(capacity: usize, max_sessions: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            max_sessions: max_sessions.max(1),
            clock: AtomicU64::new(0),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn buffer(&self, session_id: &str) -> SessionBuffer {
        if let Some(session) = self.sessions.read().await.get(session_id) {
            session.last_used.store(self.tick(), Ordering::Relaxed);
            return session.buf.clone();
        }

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get(session_id) {
            session.last_used.store(self.tick(), Ordering::Relaxed);
            return session.buf.clone();
        }
        if sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_used.load(Ordering::Relaxed))
                .map(|(id, _)| id.clone());
            if let Some(id) = oldest {
                sessions.remove(&id);
                debug!(evicted = %id, "session cap reached, evicted least recently used");
            }
        }
        let buf: SessionBuffer = Arc::new(Mutex::new(VecDeque::with_capacity(self.capacity)));
        sessions.insert(
            session_id.to_string(),
            Session {
                buf: buf.clone(),
                last_used: AtomicU64::new(self.tick()),
            },
        );
        buf
    }

    /// Adds `turn` at the tail, evicting the oldest turns beyond capacity.
    pub async fn append(&self, session_id: &str, turn: ConversationTurn) {
        let buf = self.buffer(session_id).await;
        let mut turns = buf.lock().await;
        turns.push_back(turn);
        while turns.len() > self.capacity {
            turns.pop_front();
        }
        debug!(session_id, turns = turns.len(), "turn appended");
    }

    /// Turns oldest→newest, optionally only the last `limit`.
    pub async fn get(&self, session_id: &str, limit: Option<usize>) -> Vec<ConversationTurn> {
        let Some(buf) = self.sessions.read().await.get(session_id).map(|s| {
            s.last_used.store(self.tick(), Ordering::Relaxed);
            s.buf.clone()
        }) else {
            return Vec::new();
        };
        let turns = buf.lock().await;
        let skip = limit.map_or(0, |n| turns.len().saturating_sub(n));
        turns.iter().skip(skip).cloned().collect()
    }

    /// Drops every turn of `session_id`. Returns whether the session existed.
    ///
    /// An `append` racing with this call may land in the dropped buffer and be lost.
    pub async fn clear(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }
}

/// Renders turns as `User: ...` / `Assistant: ...` lines for the prompt.
pub fn format_history(turns: &[ConversationTurn]) -> String {
    let mut out = String::new();
    for (i, t) in turns.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{}: {}", t.role.label(), t.content.trim());
    }
    out
}
