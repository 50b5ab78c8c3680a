//! Bounded execution log
//!
//! Observability only. Entries are appended per tool invocation and the
//! oldest are evicted once the capacity is reached.

use super::tool::ToolExecutionContext;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of retained entries
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Default number of entries returned by a log query
pub const DEFAULT_LOG_LIMIT: usize = 100;

/// One recorded tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLogEntry {
    /// Invocation context (agent, session, request, timestamp)
    pub context: ToolExecutionContext,

    /// Tool that was invoked
    pub tool_id: String,

    /// Whether the call succeeded
    pub success: bool,

    /// Wall-clock duration
    #[serde(with = "duration_millis")]
    pub duration: Duration,

    /// Error message for failed calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionLogEntry {
    /// Agent that made the call
    pub fn agent_id(&self) -> &str {
        &self.context.agent_id
    }
}

/// FIFO ring buffer of execution entries
#[derive(Debug, Clone)]
pub struct ExecutionLog {
    entries: VecDeque<ExecutionLogEntry>,
    capacity: usize,
}

impl Default for ExecutionLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl ExecutionLog {
    /// Create a log retaining at most `capacity` entries (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            // Grows on demand; `capacity` may be far larger than what is ever logged
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Append an entry, evicting from the front once over capacity
    pub fn push(&mut self, entry: ExecutionLogEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// The most recent `limit` entries, oldest first
    pub fn recent(&self, limit: usize) -> Vec<ExecutionLogEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
