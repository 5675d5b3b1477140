use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ids::{OrgId, ProfileId, RoomId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgCategory {
    Company,
    School,
    Community,
}

impl OrgCategory {
    pub fn label(self) -> &'static str {
        use OrgCategory::*;
        match self {
            Company => "Company",
            School => "School (club / committee)",
            Community => "Community",
        }
    }

    /// Roles offered when assigning a member of this kind of organization.
    /// Highest rank first.
    pub fn suggested_roles(self) -> [Role; 3] {
        use OrgCategory::*;
        match self {
            Company => [Role::Owner, Role::Manager, Role::Member],
            School => [Role::Advisor, Role::Captain, Role::Member],
            Community => [Role::Admin, Role::Staff, Role::Member],
        }
    }

    /// Role given to anyone joining through an invite code.
    pub fn member_role(self) -> Role {
        Role::Member
    }
}

/// A role label inside one organization. The suggested set per category is
/// advisory; anything else is kept verbatim as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Manager,
    Advisor,
    Captain,
    Admin,
    Staff,
    Member,
    Custom(String),
}

impl Role {
    pub fn label(&self) -> &str {
        use Role::*;
        match self {
            Owner => "Owner",
            Manager => "Manager",
            Advisor => "Advisor",
            Captain => "Captain",
            Admin => "Admin",
            Staff => "Staff",
            Member => "Member",
            Custom(label) => label,
        }
    }

    /// Parses a label picked from a role selector, falling back to `Custom`.
    pub fn from_label(label: &str) -> Role {
        let label = label.trim();
        [
            Role::Owner,
            Role::Manager,
            Role::Advisor,
            Role::Captain,
            Role::Admin,
            Role::Staff,
            Role::Member,
        ]
        .into_iter()
        .find(|role| role.label().eq_ignore_ascii_case(label))
        .unwrap_or_else(|| Role::Custom(label.to_owned()))
    }

    pub fn is_suggested_for(&self, category: OrgCategory) -> bool {
        category.suggested_roles().contains(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub default_name: String,
    pub default_avatar_url: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub category: OrgCategory,
    pub icon_url: Option<String>,
    pub invite_code: Option<String>,
    pub read_receipt_enabled: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

/// A user's identity inside one organization.
///
/// unique: id
/// unique: user_id, org_id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub org_id: OrgId,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub joined_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: RoomId,
    pub org_id: OrgId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Shallow patch for [`Profile`]. `None` leaves a field alone; the nested
/// `Option` on nullable fields lets a patch clear them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub avatar_url: Option<Option<String>>,
    pub role: Option<Role>,
}

impl ProfilePatch {
    pub(crate) fn apply(self, profile: &mut Profile) {
        if let Some(display_name) = self.display_name {
            profile.display_name = display_name;
        }
        if let Some(avatar_url) = self.avatar_url {
            profile.avatar_url = avatar_url;
        }
        if let Some(role) = self.role {
            profile.role = role;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<OrgCategory>,
    pub icon_url: Option<Option<String>>,
    pub invite_code: Option<Option<String>>,
    pub read_receipt_enabled: Option<bool>,
}

impl OrganizationPatch {
    pub(crate) fn apply(self, org: &mut Organization) {
        if let Some(name) = self.name {
            org.name = name;
        }
        if let Some(slug) = self.slug {
            org.slug = slug;
        }
        if let Some(description) = self.description {
            org.description = description;
        }
        if let Some(category) = self.category {
            org.category = category;
        }
        if let Some(icon_url) = self.icon_url {
            org.icon_url = icon_url;
        }
        if let Some(invite_code) = self.invite_code {
            org.invite_code = invite_code;
        }
        if let Some(read_receipt_enabled) = self.read_receipt_enabled {
            org.read_receipt_enabled = read_receipt_enabled;
        }
    }
}
