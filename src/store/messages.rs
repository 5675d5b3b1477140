use time::OffsetDateTime;
use tracing::debug;

use super::AppStore;
use crate::model::{
    Message, MessageId, MessageRead, MessageReaction, MessageStatus, ReactionId, RoomId, Upload,
    MAX_REACTIONS_PER_PROFILE,
};

impl AppStore {
    /// Appends a message from the current profile to the current room.
    ///
    /// Does nothing without both a current room and a current profile. Each
    /// upload becomes an attachment backed by a transient object URL. The
    /// sender stops counting as typing in that room.
    pub fn send_message(
        &mut self,
        content: impl Into<String>,
        files: Vec<Upload>,
        send_duration_ms: Option<u64>,
    ) -> Option<MessageId> {
        let room_id = self.current_chat_room()?.id.clone();
        let sender_id = self.current_profile()?.id.clone();

        let now = OffsetDateTime::now_utc();
        let id = MessageId::generate();
        let files = files
            .into_iter()
            .map(|upload| upload.into_attachment(&id, now))
            .collect();

        self.typing.clear(&room_id, &sender_id);
        debug!(message = %id, room = %room_id, sender = %sender_id, "message sent");
        self.messages.push(Message {
            id: id.clone(),
            room_id,
            sender_id,
            content: content.into(),
            created_at: now,
            updated_at: None,
            files,
            reads: Vec::new(),
            reactions: Vec::new(),
            send_duration_ms,
            status: MessageStatus::Sent,
        });
        Some(id)
    }

    /// Records that the current profile has seen `message_id`. Returns
    /// whether a new read was recorded; repeated calls are no-ops.
    ///
    /// Callers skip their own messages; the store does not check the sender.
    pub fn mark_message_as_read(&mut self, message_id: &MessageId) -> bool {
        let Some(profile_id) = self.selection.profile.clone() else {
            return false;
        };
        let Some(message) = self.messages.iter_mut().find(|message| &message.id == message_id) else {
            return false;
        };
        if message.is_read_by(&profile_id) {
            return false;
        }
        message.reads.push(MessageRead {
            message_id: message_id.clone(),
            profile_id,
            read_at: OffsetDateTime::now_utc(),
        });
        true
    }

    /// Marks every message in `room_id` that the current profile did not send.
    /// Returns how many reads were added.
    pub fn mark_room_as_read(&mut self, room_id: &RoomId) -> usize {
        let Some(profile_id) = self.selection.profile.clone() else {
            return 0;
        };
        let now = OffsetDateTime::now_utc();
        let mut marked = 0;
        for message in self
            .messages
            .iter_mut()
            .filter(|message| &message.room_id == room_id && message.sender_id != profile_id)
        {
            if !message.is_read_by(&profile_id) {
                message.reads.push(MessageRead {
                    message_id: message.id.clone(),
                    profile_id: profile_id.clone(),
                    read_at: now,
                });
                marked += 1;
            }
        }
        marked
    }

    /// Adds a reaction from the current profile.
    ///
    /// Returns `false` without a current profile, for an unknown message, for
    /// an emoji this profile already used on the message, or once the profile
    /// holds [`MAX_REACTIONS_PER_PROFILE`] reactions on it.
    pub fn add_reaction(&mut self, message_id: &MessageId, emoji: &str) -> bool {
        let Some(profile_id) = self.selection.profile.clone() else {
            return false;
        };
        let Some(message) = self.messages.iter_mut().find(|message| &message.id == message_id) else {
            return false;
        };
        if message.has_reaction(&profile_id, emoji) {
            return false;
        }
        if message.reactions_by(&profile_id).count() >= MAX_REACTIONS_PER_PROFILE {
            debug!(message = %message_id, profile = %profile_id, "reaction cap reached");
            return false;
        }
        message.reactions.push(MessageReaction {
            id: ReactionId::generate(),
            message_id: message_id.clone(),
            profile_id,
            emoji: emoji.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        });
        true
    }

    /// Removes the current profile's `emoji` reaction, if any.
    pub fn remove_reaction(&mut self, message_id: &MessageId, emoji: &str) -> bool {
        let Some(profile_id) = self.selection.profile.clone() else {
            return false;
        };
        let Some(message) = self.messages.iter_mut().find(|message| &message.id == message_id) else {
            return false;
        };
        let before = message.reactions.len();
        message
            .reactions
            .retain(|reaction| !(reaction.profile_id == profile_id && reaction.emoji == emoji));
        message.reactions.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn in_general() -> AppStore {
        let mut store = AppStore::in_memory(seed::demo());
        store.authenticate("user-1");
        store.select_organization(Some(&"org-1".into()));
        store.select_chat_room(Some(&"chat-1".into()));
        store
    }

    #[test]
    fn send_requires_room_and_profile() {
        let mut store = AppStore::in_memory(seed::demo());
        assert!(store.send_message("nobody home", Vec::new(), None).is_none());

        store.authenticate("user-2");
        store.select_organization(Some(&"org-2".into()));
        store.select_chat_room(Some(&"chat-4".into()));
        // user-2 has no profile in org-2
        assert!(store.send_message("still nobody", Vec::new(), None).is_none());
        assert_eq!(store.messages().len(), 2);
    }

    #[test]
    fn attachments_belong_to_the_new_message() {
        let mut store = in_general();
        let id = store
            .send_message(
                "see attached",
                vec![Upload::new("a.png", "image/png", 10), Upload::new("b.pdf", "application/pdf", 20)],
                Some(42),
            )
            .unwrap();
        let message = store.message(&id).unwrap();
        assert_eq!(message.files.len(), 2);
        assert!(message.files.iter().all(|f| f.message_id == id));
        assert_ne!(message.files[0].file_url, message.files[1].file_url);
        assert_eq!(message.files[1].file_size, 20);
        assert_eq!(message.status, MessageStatus::Sent);
    }

    #[test]
    fn sending_clears_own_typing() {
        let mut store = in_general();
        store.set_typing(&"chat-1".into(), &"profile-1".into());
        store.send_message("done typing", Vec::new(), None);
        assert!(store.typing_entries(&"chat-1".into(), OffsetDateTime::now_utc()).is_empty());
    }

    #[test]
    fn read_of_unknown_message_is_a_no_op() {
        let mut store = in_general();
        assert!(!store.mark_message_as_read(&"msg-404".into()));
    }

    #[test]
    fn room_read_skips_own_messages() {
        let mut store = in_general();
        store.send_message("mine", Vec::new(), None);
        assert_eq!(store.mark_room_as_read(&"chat-1".into()), 1);
        assert_eq!(store.mark_room_as_read(&"chat-1".into()), 0);
        let own = store.messages().last().unwrap();
        assert!(own.reads.is_empty());
    }

    #[test]
    fn reaction_cap_counts_distinct_emojis() {
        let mut store = in_general();
        let id = MessageId::from("msg-2");
        for emoji in ["👍", "🎉", "😂", "❤️", "👀"] {
            assert!(store.add_reaction(&id, emoji), "{emoji}");
        }
        assert!(!store.add_reaction(&id, "🔥"));

        assert!(store.remove_reaction(&id, "👀"));
        assert!(!store.remove_reaction(&id, "👀"));
        assert!(store.add_reaction(&id, "🔥"));
        assert_eq!(store.message(&id).unwrap().reactions.len(), 5);
    }

    #[test]
    fn cap_is_per_profile() {
        let mut store = in_general();
        let id = MessageId::from("msg-1");
        for emoji in ["a", "b", "c", "d", "e"] {
            store.add_reaction(&id, emoji);
        }
        store.authenticate("user-2");
        store.select_organization(Some(&"org-1".into()));
        assert!(store.add_reaction(&id, "a"));
        assert_eq!(store.message(&id).unwrap().reactions.len(), 6);
    }
}
