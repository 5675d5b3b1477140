//! Read-only projections over the store. Nothing here caches: every call
//! reflects the state as it is at that moment.

mod message_view;

use time::OffsetDateTime;

use crate::model::{ChatRoom, Message, OrgId, Organization, Profile, RoomId, UserId};
use crate::AppStore;

pub use message_view::{render_markdown, MessageView, ReactionSummary};

/// Name shown for a typer whose profile cannot be resolved.
pub const UNKNOWN_TYPER: &str = "Someone";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminOverview {
    pub organizations: usize,
    pub profiles: usize,
    pub messages: usize,
    pub unread_announcements: usize,
}

impl AppStore {
    /// Organizations in which `user_id` has a profile.
    pub fn organizations_for_user(&self, user_id: &UserId) -> Vec<&Organization> {
        self.organizations()
            .iter()
            .filter(|org| self.membership(user_id, &org.id).is_some())
            .collect()
    }

    pub fn chat_rooms_for_organization(&self, org_id: &OrgId) -> Vec<&ChatRoom> {
        self.chat_rooms().iter().filter(|room| &room.org_id == org_id).collect()
    }

    /// Messages of `room_id` in the order they were sent.
    pub fn messages_for_room(&self, room_id: &RoomId) -> Vec<&Message> {
        self.messages().iter().filter(|message| &message.room_id == room_id).collect()
    }

    pub fn profiles_for_organization(&self, org_id: &OrgId) -> Vec<&Profile> {
        self.profiles().iter().filter(|profile| &profile.org_id == org_id).collect()
    }

    pub fn current_user_organizations(&self) -> Vec<&Organization> {
        self.current_user_id()
            .map(|user_id| self.organizations_for_user(user_id))
            .unwrap_or_default()
    }

    pub fn current_organization_chat_rooms(&self) -> Vec<&ChatRoom> {
        self.current_organization()
            .map(|org| self.chat_rooms_for_organization(&org.id))
            .unwrap_or_default()
    }

    pub fn current_chat_messages(&self) -> Vec<&Message> {
        self.current_chat_room()
            .map(|room| self.messages_for_room(&room.id))
            .unwrap_or_default()
    }

    pub fn unread_announcement_count(&self) -> usize {
        self.announcements().iter().filter(|announcement| !announcement.is_read).count()
    }

    /// Display names of everyone still typing in `room_id` at `now`, except
    /// the current profile.
    pub fn typing_names(&self, room_id: &RoomId, now: OffsetDateTime) -> Vec<String> {
        let me = self.current_profile().map(|profile| &profile.id);
        self.typing_entries(room_id, now)
            .into_iter()
            .filter(|entry| Some(&entry.profile_id) != me)
            .map(|entry| {
                self.profile(&entry.profile_id)
                    .map_or_else(|| UNKNOWN_TYPER.to_owned(), |profile| profile.display_name.clone())
            })
            .collect()
    }

    /// Case-insensitive match on organization name or slug. An empty query
    /// matches everything.
    pub fn search_organizations(&self, query: &str) -> Vec<&Organization> {
        let query = query.trim().to_lowercase();
        self.organizations()
            .iter()
            .filter(|org| org.name.to_lowercase().contains(&query) || org.slug.to_lowercase().contains(&query))
            .collect()
    }

    pub fn admin_overview(&self) -> AdminOverview {
        AdminOverview {
            organizations: self.organizations().len(),
            profiles: self.profiles().len(),
            messages: self.messages().len(),
            unread_announcements: self.unread_announcement_count(),
        }
    }
}
