use time::OffsetDateTime;
use tracing::{debug, info};

use super::AppStore;
use crate::invite;
use crate::model::{
    ChatRoom, OrgCategory, OrgId, Organization, OrganizationPatch, Profile, ProfileId, ProfilePatch, Role, RoomId,
};

/// Input of the "create organization" flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganization {
    pub name: String,
    /// Requested slug, normalized with [`invite::slugify`].
    pub slug: String,
    pub category: OrgCategory,
    /// Display name of the founder inside the new organization.
    pub display_name: String,
}

impl AppStore {
    /// Selects an organization and re-resolves the current profile for it.
    /// Always clears the room selection.
    pub fn select_organization(&mut self, org_id: Option<&OrgId>) {
        self.selection.org = org_id.and_then(|id| self.organization(id)).map(|org| org.id.clone());
        self.selection.room = None;
        self.resolve_current_profile();
        debug!(org = ?self.selection.org, profile = ?self.selection.profile, "organization selected");
    }

    pub fn select_chat_room(&mut self, room_id: Option<&RoomId>) {
        self.selection.room = room_id.and_then(|id| self.chat_room(id)).map(|room| room.id.clone());
    }

    /// Looks up the organization a room belongs to, only if it is `org_id`.
    pub fn chat_room_in_organization(&self, org_id: &OrgId, room_id: &RoomId) -> Option<&ChatRoom> {
        self.chat_room(room_id).filter(|room| &room.org_id == org_id)
    }

    /// Appends an organization. Rejects a taken id, slug or invite code.
    pub fn add_organization(&mut self, mut org: Organization) -> bool {
        org.invite_code = org.invite_code.as_deref().map(invite::normalize_invite_code);
        if self.organization(&org.id).is_some()
            || self.identity_conflict(None, &org.slug, org.invite_code.as_deref())
        {
            debug!(org = %org.id, slug = %org.slug, "organization rejected: duplicate id, slug or invite code");
            return false;
        }
        info!(org = %org.id, slug = %org.slug, "organization added");
        self.organizations.push(org);
        true
    }

    /// Appends a profile. Rejects a taken id, an unknown organization or a
    /// second membership for the same user.
    pub fn add_profile(&mut self, profile: Profile) -> bool {
        if self.profile(&profile.id).is_some()
            || self.organization(&profile.org_id).is_none()
            || self.membership(&profile.user_id, &profile.org_id).is_some()
        {
            debug!(profile = %profile.id, "profile rejected");
            return false;
        }
        self.profiles.push(profile);
        true
    }

    pub fn add_chat_room(&mut self, room: ChatRoom) -> bool {
        if self.chat_room(&room.id).is_some() || self.organization(&room.org_id).is_none() {
            debug!(room = %room.id, "chat room rejected");
            return false;
        }
        self.chat_rooms.push(room);
        true
    }

    pub fn update_profile(&mut self, id: &ProfileId, patch: ProfilePatch) -> bool {
        let Some(profile) = self.profiles.iter_mut().find(|profile| &profile.id == id) else {
            return false;
        };
        patch.apply(profile);
        true
    }

    /// Shallow-merges `patch`. A patch that would give this organization
    /// another organization's slug or invite code is rejected as a whole.
    pub fn update_organization(&mut self, id: &OrgId, mut patch: OrganizationPatch) -> bool {
        let Some(current) = self.organization(id) else {
            return false;
        };
        if let Some(Some(code)) = &mut patch.invite_code {
            *code = invite::normalize_invite_code(code);
        }
        let slug = patch.slug.as_deref().unwrap_or(&current.slug);
        let invite_code = match &patch.invite_code {
            Some(code) => code.as_deref(),
            None => current.invite_code.as_deref(),
        };
        if self.identity_conflict(Some(id), slug, invite_code) {
            debug!(org = %id, "organization update rejected: slug or invite code taken");
            return false;
        }

        let Some(org) = self.organizations.iter_mut().find(|org| &org.id == id) else {
            return false;
        };
        patch.apply(org);
        org.updated_at = Some(OffsetDateTime::now_utc());
        true
    }

    pub fn toggle_read_receipt(&mut self, id: &OrgId) -> bool {
        let Some(org) = self.organizations.iter_mut().find(|org| &org.id == id) else {
            return false;
        };
        org.read_receipt_enabled = !org.read_receipt_enabled;
        debug!(org = %id, enabled = org.read_receipt_enabled, "read receipts toggled");
        true
    }

    /// Replaces the invite code with a fresh one no other organization uses.
    /// The previous code stops matching immediately.
    pub fn regenerate_invite_code(&mut self, id: &OrgId) -> Option<String> {
        self.organization(id)?;
        let code = invite::generate_unique_invite_code(|code| {
            self.organizations.iter().any(|org| org.invite_code.as_deref() == Some(code))
        });
        let org = self.organizations.iter_mut().find(|org| &org.id == id)?;
        org.invite_code = Some(code.clone());
        org.updated_at = Some(OffsetDateTime::now_utc());
        info!(org = %id, "invite code regenerated");
        Some(code)
    }

    /// Removes a room together with its messages and typing entries.
    pub fn delete_chat_room(&mut self, id: &RoomId) -> bool {
        let before = self.chat_rooms.len();
        self.chat_rooms.retain(|room| &room.id != id);
        if self.chat_rooms.len() == before {
            return false;
        }
        self.messages.retain(|message| &message.room_id != id);
        self.typing.forget_room(id);
        if self.selection.room.as_ref() == Some(id) {
            self.selection.room = None;
        }
        info!(room = %id, "chat room deleted");
        true
    }

    /// Removes an organization with every profile, room and message that
    /// belongs to it, and drops selections pointing into it.
    pub fn delete_organization(&mut self, id: &OrgId) -> bool {
        let before = self.organizations.len();
        self.organizations.retain(|org| &org.id != id);
        if self.organizations.len() == before {
            return false;
        }

        let room_ids: Vec<RoomId> = self
            .chat_rooms
            .iter()
            .filter(|room| &room.org_id == id)
            .map(|room| room.id.clone())
            .collect();
        self.chat_rooms.retain(|room| &room.org_id != id);
        self.messages.retain(|message| !room_ids.contains(&message.room_id));
        self.profiles.retain(|profile| &profile.org_id != id);
        for room_id in &room_ids {
            self.typing.forget_room(room_id);
        }

        if self.selection.org.as_ref() == Some(id) {
            self.selection.org = None;
            self.selection.profile = None;
        }
        if self.selection.room.as_ref().is_some_and(|room| room_ids.contains(room)) {
            self.selection.room = None;
        }
        info!(org = %id, rooms = room_ids.len(), "organization deleted");
        true
    }

    pub fn find_organization_by_invite(&self, invite_code: &str) -> Option<&Organization> {
        let code = invite::normalize_invite_code(invite_code);
        if code.is_empty() {
            return None;
        }
        self.organizations
            .iter()
            .find(|org| org.invite_code.as_deref() == Some(code.as_str()))
    }

    /// Joins the organization behind `invite_code` as the current user.
    ///
    /// Returns `None` when signed out, for a blank display name or when no
    /// organization matches. An existing membership is returned as is,
    /// without a second profile.
    pub fn join_organization(&mut self, invite_code: &str, display_name: &str) -> Option<&Organization> {
        let user_id = self.session.current_user_id.clone()?;
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return None;
        }
        let (org_id, category) = {
            let org = self.find_organization_by_invite(invite_code)?;
            (org.id.clone(), org.category)
        };

        if self.membership(&user_id, &org_id).is_none() {
            let profile = Profile {
                id: ProfileId::generate(),
                user_id,
                org_id: org_id.clone(),
                display_name: display_name.to_owned(),
                avatar_url: None,
                role: category.member_role(),
                joined_at: OffsetDateTime::now_utc(),
            };
            info!(org = %org_id, profile = %profile.id, "joined organization");
            self.profiles.push(profile);
        }
        self.organization(&org_id)
    }

    /// Creates an organization with a unique invite code, makes the current
    /// user its founder and selects it.
    pub fn create_organization(&mut self, new: NewOrganization) -> Option<OrgId> {
        let user_id = self.session.current_user_id.clone()?;
        let name = new.name.trim();
        let display_name = new.display_name.trim();
        let slug = invite::slugify(&new.slug);
        if name.is_empty() || display_name.is_empty() || slug.is_empty() {
            return None;
        }

        let invite_code = invite::generate_unique_invite_code(|code| {
            self.organizations.iter().any(|org| org.invite_code.as_deref() == Some(code))
        });
        let now = OffsetDateTime::now_utc();
        let org = Organization {
            id: OrgId::generate(),
            slug,
            name: name.to_owned(),
            description: None,
            category: new.category,
            icon_url: None,
            invite_code: Some(invite_code),
            read_receipt_enabled: true,
            created_at: now,
            updated_at: None,
        };
        let org_id = org.id.clone();
        if !self.add_organization(org) {
            return None;
        }

        self.profiles.push(Profile {
            id: ProfileId::generate(),
            user_id,
            org_id: org_id.clone(),
            display_name: display_name.to_owned(),
            avatar_url: None,
            role: Role::Owner,
            joined_at: now,
        });
        self.select_organization(Some(&org_id));
        Some(org_id)
    }

    fn identity_conflict(&self, except: Option<&OrgId>, slug: &str, invite_code: Option<&str>) -> bool {
        self.organizations
            .iter()
            .filter(|org| Some(&org.id) != except)
            .any(|org| org.slug == slug || (invite_code.is_some() && org.invite_code.as_deref() == invite_code))
    }
}
