//! The application store: every entity collection plus session and UI state,
//! mutated only through the command methods in the submodules.
//!
//! Commands never panic and never return errors. A command that cannot apply
//! returns `false`/`None` (or does nothing) and leaves the store untouched.

mod announcements;
mod messages;
mod orgs;
mod session;
mod typing;

use time::Duration;
use tracing::debug;

use crate::credentials::AdminCredentials;
use crate::model::{
    AdminAnnouncement, ChatRoom, Message, MessageId, OrgId, Organization, Profile, ProfileId, RoomId, User,
    UserId,
};
use crate::persistence::{AnnouncementReads, MemoryKv, Viewer};
use crate::seed::InitialState;

pub use orgs::NewOrganization;
pub use session::{AdminLogin, ADMIN_USER_ID};
pub use typing::{TypingEntry, DEFAULT_TYPING_WINDOW};

use typing::TypingPresence;

/// Authentication and mode flags for the current client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub current_user_id: Option<UserId>,
    pub is_system_admin: bool,
    pub is_demo_mode: bool,
    pub demo_session_id: Option<String>,
    /// An admin looking at an organization they are not a member of. Callers
    /// are expected to hide mutating controls; the store does not check it.
    pub is_observer_mode: bool,
}

#[derive(Debug, Clone, Default)]
struct Selection {
    org: Option<OrgId>,
    room: Option<RoomId>,
    profile: Option<ProfileId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiFlags {
    pub dark_mode: bool,
    pub sidebar_open: bool,
}

impl Default for UiFlags {
    fn default() -> Self {
        Self {
            dark_mode: false,
            sidebar_open: true,
        }
    }
}

#[derive(Debug)]
pub struct AppStore {
    users: Vec<User>,
    organizations: Vec<Organization>,
    profiles: Vec<Profile>,
    chat_rooms: Vec<ChatRoom>,
    messages: Vec<Message>,
    announcements: Vec<AdminAnnouncement>,

    session: Session,
    admin_credentials: Option<AdminCredentials>,
    selection: Selection,
    typing: TypingPresence,
    ui: UiFlags,
    announcement_reads: AnnouncementReads,
}

impl AppStore {
    /// Builds a store over `seed`. Announcement read flags are taken from
    /// `announcement_reads`, not from the seed.
    pub fn new(seed: InitialState, announcement_reads: AnnouncementReads) -> Self {
        let read_ids = announcement_reads.load();
        let announcements = seed
            .announcements
            .into_iter()
            .map(|announcement| AdminAnnouncement {
                is_read: read_ids.contains(&announcement.id),
                ..announcement
            })
            .collect();

        debug!(
            organizations = seed.organizations.len(),
            profiles = seed.profiles.len(),
            rooms = seed.chat_rooms.len(),
            messages = seed.messages.len(),
            restored_reads = read_ids.len(),
            "store initialized"
        );

        Self {
            users: seed.users,
            organizations: seed.organizations,
            profiles: seed.profiles,
            chat_rooms: seed.chat_rooms,
            messages: seed.messages,
            announcements,
            session: Session::default(),
            admin_credentials: None,
            selection: Selection::default(),
            typing: TypingPresence::new(DEFAULT_TYPING_WINDOW),
            ui: UiFlags::default(),
            announcement_reads,
        }
    }

    /// A store whose announcement reads live only as long as the process.
    pub fn in_memory(seed: InitialState) -> Self {
        Self::new(seed, AnnouncementReads::new(MemoryKv::new(), &Viewer::Local))
    }

    /// How long a typing entry stays fresh after its last keystroke.
    pub fn with_typing_window(mut self, window: Duration) -> Self {
        self.typing = TypingPresence::new(window);
        self
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn chat_rooms(&self) -> &[ChatRoom] {
        &self.chat_rooms
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn announcements(&self) -> &[AdminAnnouncement] {
        &self.announcements
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn is_system_admin(&self) -> bool {
        self.session.is_system_admin
    }

    pub fn admin_setup_completed(&self) -> bool {
        self.admin_credentials.is_some()
    }

    pub fn current_user_id(&self) -> Option<&UserId> {
        self.session.current_user_id.as_ref()
    }

    pub fn ui(&self) -> UiFlags {
        self.ui
    }

    pub fn organization(&self, id: &OrgId) -> Option<&Organization> {
        self.organizations.iter().find(|org| &org.id == id)
    }

    pub fn organization_by_slug(&self, slug: &str) -> Option<&Organization> {
        self.organizations.iter().find(|org| org.slug == slug)
    }

    pub fn profile(&self, id: &ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|profile| &profile.id == id)
    }

    /// The unique profile of `user_id` inside `org_id`.
    pub fn membership(&self, user_id: &UserId, org_id: &OrgId) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|profile| &profile.user_id == user_id && &profile.org_id == org_id)
    }

    pub fn chat_room(&self, id: &RoomId) -> Option<&ChatRoom> {
        self.chat_rooms.iter().find(|room| &room.id == id)
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|message| &message.id == id)
    }

    pub fn current_organization(&self) -> Option<&Organization> {
        self.selection.org.as_ref().and_then(|id| self.organization(id))
    }

    pub fn current_chat_room(&self) -> Option<&ChatRoom> {
        self.selection.room.as_ref().and_then(|id| self.chat_room(id))
    }

    pub fn current_profile(&self) -> Option<&Profile> {
        self.selection.profile.as_ref().and_then(|id| self.profile(id))
    }

    pub fn toggle_dark_mode(&mut self) {
        self.ui.dark_mode = !self.ui.dark_mode;
        debug!(dark_mode = self.ui.dark_mode, "dark mode toggled");
    }

    pub fn toggle_sidebar(&mut self) {
        self.ui.sidebar_open = !self.ui.sidebar_open;
    }

    /// Re-derives the current profile from the current user and organization.
    fn resolve_current_profile(&mut self) {
        let profile = match (&self.session.current_user_id, &self.selection.org) {
            (Some(user_id), Some(org_id)) => self.membership(user_id, org_id).map(|profile| profile.id.clone()),
            _ => None,
        };
        self.selection.profile = profile;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn starts_signed_out_with_nothing_selected() {
        let store = AppStore::in_memory(seed::demo());
        assert!(!store.is_authenticated());
        assert!(!store.admin_setup_completed());
        assert!(store.current_organization().is_none());
        assert!(store.current_chat_room().is_none());
        assert!(store.current_profile().is_none());
        assert_eq!(store.ui(), UiFlags { dark_mode: false, sidebar_open: true });
    }

    #[test]
    fn seed_read_flags_are_ignored() {
        let mut seed = seed::demo();
        seed.announcements[0].is_read = true;
        let store = AppStore::in_memory(seed);
        assert!(store.announcements().iter().all(|a| !a.is_read));
    }

    #[test]
    fn ui_toggles_flip() {
        let mut store = AppStore::in_memory(InitialState::default());
        store.toggle_dark_mode();
        store.toggle_sidebar();
        assert_eq!(store.ui(), UiFlags { dark_mode: true, sidebar_open: false });
        store.toggle_dark_mode();
        assert!(!store.ui().dark_mode);
    }
}
