//! crates/social_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs carry no I/O; the web layer maps them into its own DTOs.

use chrono::Local;
use uuid::Uuid;

/// Generation constraints for one social platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    pub name: &'static str,
    pub max_length: u32,
    pub tone: &'static str,
}

/// Who authored a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single entry of the chat history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Name of the platform that was active when the message was created.
    pub platform: String,
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
}

impl Message {
    /// Creates a message stamped with the current local time.
    pub fn new(role: Role, content: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            platform: platform.into(),
            time: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn user(content: impl Into<String>, platform: impl Into<String>) -> Self {
        Self::new(Role::User, content, platform)
    }

    pub fn assistant(content: impl Into<String>, platform: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, platform)
    }

    /// The line shown under a rendered message, e.g. `LinkedIn - 14:03:27`.
    pub fn caption(&self) -> String {
        format!("{} - {}", self.platform, self.time)
    }
}

/// A feedback score between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns `None` when `value` falls outside `1..=5`.
    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_only_one_through_five() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
        assert!(Rating::new(-3).is_none());
        assert_eq!(Rating::new(1).map(Rating::value), Some(1));
        assert_eq!(Rating::new(5).map(Rating::value), Some(5));
    }

    #[test]
    fn message_time_is_formatted_as_clock_time() {
        let msg = Message::user("hello", "General");
        let parts: Vec<&str> = msg.time.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_digit())));
        assert_eq!(msg.caption(), format!("General - {}", msg.time));
    }

    #[test]
    fn constructors_set_role() {
        assert_eq!(Message::user("a", "General").role, Role::User);
        assert_eq!(Message::assistant("b", "General").role, Role::Assistant);
    }
}
