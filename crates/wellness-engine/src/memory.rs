//! Bounded per-user conversation memory.
//!
//! Each user gets a rolling message log capped at `max_messages` (oldest
//! dropped first). The store itself holds at most `max_users` logs; adding a
//! new user at capacity evicts the user that was inserted first, regardless of
//! how recently it was used.
//!
//! Concurrent requests for the same user are not serialized against each
//! other: appends land in whatever order the lock is acquired.

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;
use wellness_config::AppConfig;
use wellness_core::{Message, MessageRole};

/// Rolling message log and context map for one user.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    user_id: String,
    messages: VecDeque<Message>,
    context: Map<String, Value>,
    max_messages: usize,
}

impl ConversationMemory {
    pub fn new(user_id: impl Into<String>, max_messages: usize) -> Self {
        Self {
            user_id: user_id.into(),
            messages: VecDeque::with_capacity(max_messages.min(64)),
            context: Map::new(),
            max_messages,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Appends a message, dropping the oldest entries beyond `max_messages`.
    pub fn add_message(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push_back(Message { role, content: content.into() });
        while self.messages.len() > self.max_messages {
            self.messages.pop_front();
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Merges `update` into the context map, overwriting existing keys in place.
    /// Keys keep their first-insertion order.
    pub fn update_context(&mut self, update: Map<String, Value>) {
        self.context.extend(update);
    }

    /// Formats the last `window` messages, newest last, as `role: content` lines.
    pub fn context_string(&self, window: usize) -> String {
        let skip = self.messages.len().saturating_sub(window);
        self.messages
            .iter()
            .skip(skip)
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Snapshot of a user's memory for introspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryStats {
    pub user_id: String,
    pub message_count: usize,
    pub context_keys: Vec<String>,
    pub last_message: Option<Message>,
}

/// Shared store of conversation memories keyed by user ID.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<IndexMap<String, ConversationMemory>>,
    max_users: usize,
    max_messages: usize,
    context_window: usize,
}

impl MemoryStore {
    /// Creates an empty store. Capacities below 1 are raised to 1.
    pub fn new(max_users: usize, max_messages: usize, context_window: usize) -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
            max_users: max_users.max(1),
            max_messages: max_messages.max(1),
            context_window,
        }
    }

    /// Creates a store sized from the service configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.max_users, config.max_messages, config.context_window)
    }

    pub fn max_users(&self) -> usize {
        self.max_users
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn contains(&self, user_id: &str) -> bool {
        self.entries.read().await.contains_key(user_id)
    }

    /// User IDs in insertion order, oldest first.
    pub async fn user_ids(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    /// Runs `f` on the user's memory, creating it (and evicting the oldest user at capacity) if needed.
    async fn with_memory<R>(&self, user_id: &str, f: impl FnOnce(&mut ConversationMemory) -> R) -> R {
        let mut entries = self.entries.write().await;

        if !entries.contains_key(user_id) && entries.len() >= self.max_users {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                debug!("MEMORY: evicted user {} at capacity {}", evicted, self.max_users);
            }
        }

        let memory = entries
            .entry(user_id.to_string())
            .or_insert_with(|| ConversationMemory::new(user_id, self.max_messages));
        f(memory)
    }

    pub async fn add_user_message(&self, user_id: &str, content: &str) {
        self.with_memory(user_id, |m| m.add_message(MessageRole::User, content)).await;
    }

    pub async fn add_assistant_message(&self, user_id: &str, content: &str) {
        self.with_memory(user_id, |m| m.add_message(MessageRole::Assistant, content)).await;
    }

    pub async fn update_user_context(&self, user_id: &str, update: Map<String, Value>) {
        self.with_memory(user_id, |m| m.update_context(update)).await;
    }

    /// Formatted recent history for generators; empty for unknown users.
    pub async fn conversation_context(&self, user_id: &str) -> String {
        self.entries
            .read()
            .await
            .get(user_id)
            .map(|m| m.context_string(self.context_window))
            .unwrap_or_default()
    }

    /// Returns a copy of the user's memory, if any.
    pub async fn snapshot(&self, user_id: &str) -> Option<ConversationMemory> {
        self.entries.read().await.get(user_id).cloned()
    }

    /// Removes the user's memory. Returns whether anything was removed.
    pub async fn clear(&self, user_id: &str) -> bool {
        self.entries.write().await.shift_remove(user_id).is_some()
    }

    /// Returns stats for the user; unknown users report an empty memory.
    pub async fn stats(&self, user_id: &str) -> MemoryStats {
        let entries = self.entries.read().await;
        match entries.get(user_id) {
            Some(memory) => MemoryStats {
                user_id: user_id.to_string(),
                message_count: memory.len(),
                context_keys: memory.context().keys().cloned().collect(),
                last_message: memory.last_message().cloned(),
            },
            None => MemoryStats {
                user_id: user_id.to_string(),
                message_count: 0,
                context_keys: Vec::new(),
                last_message: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn add_message_drops_oldest_first() {
        let mut memory = ConversationMemory::new("u1", 3);
        for i in 0..5 {
            memory.add_message(MessageRole::User, format!("m{i}"));
        }
        let contents: Vec<_> = memory.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn context_string_uses_last_window_newest_last() {
        let mut memory = ConversationMemory::new("u1", 20);
        for i in 0..7 {
            let role = if i % 2 == 0 { MessageRole::User } else { MessageRole::Assistant };
            memory.add_message(role, format!("m{i}"));
        }
        assert_eq!(
            memory.context_string(5),
            "user: m2\nassistant: m3\nuser: m4\nassistant: m5\nuser: m6"
        );
        assert_eq!(ConversationMemory::new("u2", 20).context_string(5), "");
    }

    #[tokio::test]
    async fn store_evicts_oldest_inserted_user() {
        let store = MemoryStore::new(2, 20, 5);
        store.add_user_message("a", "first").await;
        store.add_user_message("b", "second").await;
        // touching "a" again must not refresh its position
        store.add_user_message("a", "again").await;
        store.add_user_message("c", "third").await;

        assert_eq!(store.len().await, 2);
        assert_eq!(store.user_ids().await, vec!["b".to_string(), "c".to_string()]);
        assert!(!store.contains("a").await);
    }

    #[tokio::test]
    async fn reads_do_not_create_entries() {
        let store = MemoryStore::new(2, 20, 5);
        assert_eq!(store.conversation_context("ghost").await, "");
        let stats = store.stats("ghost").await;
        assert_eq!(stats.message_count, 0);
        assert_eq!(stats.last_message, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn stats_report_count_keys_and_last_message() {
        let store = MemoryStore::new(10, 20, 5);
        store.add_user_message("u1", "I feel tired").await;
        store.add_assistant_message("u1", "Try sleeping more").await;
        let mut update = Map::new();
        update.insert("goal".into(), json!("sleep better"));
        store.update_user_context("u1", update).await;

        let stats = store.stats("u1").await;
        assert_eq!(stats.message_count, 2);
        assert_eq!(stats.context_keys, vec!["goal".to_string()]);
        assert_eq!(stats.last_message, Some(Message::assistant("Try sleeping more")));
    }

    #[tokio::test]
    async fn context_keys_keep_insertion_order() {
        let store = MemoryStore::new(10, 20, 5);
        let mut first = Map::new();
        first.insert("zeta".into(), json!(1));
        store.update_user_context("u1", first).await;
        let mut second = Map::new();
        second.insert("alpha".into(), json!(2));
        second.insert("zeta".into(), json!(3));
        store.update_user_context("u1", second).await;

        let stats = store.stats("u1").await;
        assert_eq!(stats.context_keys, vec!["zeta".to_string(), "alpha".to_string()]);
        let snapshot = store.snapshot("u1").await.unwrap();
        assert_eq!(snapshot.context()["zeta"], json!(3));
    }

    #[tokio::test]
    async fn clear_removes_user_and_keeps_order_of_others() {
        let store = MemoryStore::new(3, 20, 5);
        for user in ["a", "b", "c"] {
            store.add_user_message(user, "hi").await;
        }
        assert!(store.clear("b").await);
        assert!(!store.clear("b").await);
        store.add_user_message("d", "hi").await;
        store.add_user_message("e", "hi").await;
        assert_eq!(store.user_ids().await, vec!["c".to_string(), "d".to_string(), "e".to_string()]);
    }

    #[tokio::test]
    async fn from_config_applies_capacities() {
        let config = AppConfig { max_users: 1, max_messages: 2, ..AppConfig::default() };
        let store = MemoryStore::from_config(&config);
        for i in 0..4 {
            store.add_user_message("u1", &format!("m{i}")).await;
        }
        store.add_user_message("u2", "hello").await;
        assert_eq!(store.user_ids().await, vec!["u2".to_string()]);
        assert_eq!(store.max_users(), 1);
    }
}
