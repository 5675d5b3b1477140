use std::collections::HashMap;

use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::AppStore;
use crate::model::{ProfileId, RoomId};

/// Entries older than this are treated as stale.
pub const DEFAULT_TYPING_WINDOW: Duration = Duration::seconds(3);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypingEntry {
    pub profile_id: ProfileId,
    pub timestamp: OffsetDateTime,
}

/// Per-room typing presence. Entries are never expired on write; readers
/// filter by the window and `sweep` prunes.
#[derive(Debug, Clone)]
pub(super) struct TypingPresence {
    rooms: HashMap<RoomId, Vec<TypingEntry>>,
    window: Duration,
}

impl TypingPresence {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            rooms: HashMap::new(),
            window,
        }
    }

    fn is_fresh(&self, entry: &TypingEntry, now: OffsetDateTime) -> bool {
        now - entry.timestamp < self.window
    }

    pub(super) fn touch(&mut self, room_id: &RoomId, profile_id: &ProfileId, now: OffsetDateTime) {
        let entries = self.rooms.entry(room_id.clone()).or_default();
        match entries.iter_mut().find(|entry| &entry.profile_id == profile_id) {
            Some(entry) => entry.timestamp = now,
            None => entries.push(TypingEntry {
                profile_id: profile_id.clone(),
                timestamp: now,
            }),
        }
    }

    pub(super) fn clear(&mut self, room_id: &RoomId, profile_id: &ProfileId) -> bool {
        let Some(entries) = self.rooms.get_mut(room_id) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| &entry.profile_id != profile_id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.rooms.remove(room_id);
        }
        removed
    }

    pub(super) fn active(&self, room_id: &RoomId, now: OffsetDateTime) -> Vec<&TypingEntry> {
        self.rooms
            .get(room_id)
            .map(|entries| entries.iter().filter(|entry| self.is_fresh(entry, now)).collect())
            .unwrap_or_default()
    }

    pub(super) fn sweep(&mut self, now: OffsetDateTime) -> usize {
        let window = self.window;
        let mut removed = 0;
        self.rooms.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|entry| now - entry.timestamp < window);
            removed += before - entries.len();
            !entries.is_empty()
        });
        removed
    }

    pub(super) fn forget_room(&mut self, room_id: &RoomId) {
        self.rooms.remove(room_id);
    }
}

impl AppStore {
    /// Records a keystroke by `profile_id` in `room_id`, refreshing the
    /// timestamp if the profile is already listed.
    pub fn set_typing(&mut self, room_id: &RoomId, profile_id: &ProfileId) {
        self.typing.touch(room_id, profile_id, OffsetDateTime::now_utc());
    }

    pub fn clear_typing(&mut self, room_id: &RoomId, profile_id: &ProfileId) -> bool {
        self.typing.clear(room_id, profile_id)
    }

    /// Drops every entry that is stale at `now`. Returns how many went.
    pub fn sweep_typing(&mut self, now: OffsetDateTime) -> usize {
        let removed = self.typing.sweep(now);
        if removed > 0 {
            debug!(removed, "stale typing entries swept");
        }
        removed
    }

    /// Entries in `room_id` that are still fresh at `now`, in arrival order.
    pub fn typing_entries(&self, room_id: &RoomId, now: OffsetDateTime) -> Vec<&TypingEntry> {
        self.typing.active(room_id, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const T0: OffsetDateTime = datetime!(2024-05-01 12:00 UTC);

    fn room() -> RoomId {
        "chat-1".into()
    }

    #[test]
    fn touch_upserts() {
        let mut presence = TypingPresence::new(DEFAULT_TYPING_WINDOW);
        presence.touch(&room(), &"p1".into(), T0);
        presence.touch(&room(), &"p1".into(), T0 + Duration::seconds(2));
        let active = presence.active(&room(), T0 + Duration::seconds(4));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].timestamp, T0 + Duration::seconds(2));
    }

    #[test]
    fn stale_entries_are_hidden_then_swept() {
        let mut presence = TypingPresence::new(DEFAULT_TYPING_WINDOW);
        presence.touch(&room(), &"p1".into(), T0);
        presence.touch(&room(), &"p2".into(), T0 + Duration::seconds(2));

        let later = T0 + Duration::seconds(3);
        let active: Vec<_> = presence.active(&room(), later).into_iter().map(|e| e.profile_id.clone()).collect();
        assert_eq!(active, [ProfileId::from("p2")]);

        assert_eq!(presence.sweep(later), 1);
        assert_eq!(presence.sweep(later + Duration::seconds(10)), 1);
        assert!(presence.rooms.is_empty());
    }

    #[test]
    fn clear_removes_only_that_profile() {
        let mut presence = TypingPresence::new(DEFAULT_TYPING_WINDOW);
        presence.touch(&room(), &"p1".into(), T0);
        presence.touch(&room(), &"p2".into(), T0);
        assert!(presence.clear(&room(), &"p1".into()));
        assert!(!presence.clear(&room(), &"p1".into()));
        assert_eq!(presence.active(&room(), T0).len(), 1);
    }

    #[test]
    fn custom_window_applies_through_store() {
        let mut store = AppStore::in_memory(crate::seed::demo()).with_typing_window(Duration::milliseconds(500));
        store.set_typing(&room(), &"profile-1".into());
        let now = OffsetDateTime::now_utc();
        assert_eq!(store.typing_entries(&room(), now).len(), 1);
        assert!(store.typing_entries(&room(), now + Duration::seconds(1)).is_empty());
        assert_eq!(store.sweep_typing(now + Duration::seconds(1)), 1);
    }
}
