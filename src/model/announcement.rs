use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ids::AnnouncementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// System-wide notice from the administrator. `is_read` reflects the viewer
/// the store was built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAnnouncement {
    pub id: AnnouncementId,
    pub title: String,
    pub content: String,
    pub priority: Priority,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}
