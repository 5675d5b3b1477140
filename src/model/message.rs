use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::attachment::FileAttachment;
use super::ids::{MessageId, ProfileId, ReactionId, RoomId};

/// Distinct emojis one profile may hold on a single message.
pub const MAX_REACTIONS_PER_PROFILE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sending,
    #[default]
    Sent,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRead {
    pub message_id: MessageId,
    pub profile_id: ProfileId,
    pub read_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReaction {
    pub id: ReactionId,
    pub message_id: MessageId,
    pub profile_id: ProfileId,
    pub emoji: String,
    pub created_at: OffsetDateTime,
}

/// unique: id
/// unique: (id, reads.profile_id)
/// unique: (id, reactions.profile_id, reactions.emoji)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: ProfileId,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub files: Vec<FileAttachment>,
    #[serde(default)]
    pub reads: Vec<MessageRead>,
    #[serde(default)]
    pub reactions: Vec<MessageReaction>,
    pub send_duration_ms: Option<u64>,
    #[serde(default)]
    pub status: MessageStatus,
}

impl Message {
    pub fn is_read_by(&self, profile_id: &ProfileId) -> bool {
        self.reads.iter().any(|read| &read.profile_id == profile_id)
    }

    pub fn reactions_by<'a>(
        &'a self,
        profile_id: &'a ProfileId,
    ) -> impl Iterator<Item = &'a MessageReaction> + 'a {
        self.reactions
            .iter()
            .filter(move |reaction| &reaction.profile_id == profile_id)
    }

    pub fn has_reaction(&self, profile_id: &ProfileId, emoji: &str) -> bool {
        self.reactions_by(profile_id).any(|reaction| reaction.emoji == emoji)
    }
}
