//! Initial population handed to [`AppStore::new`](crate::AppStore::new).

use time::macros::datetime;

use crate::model::{
    AdminAnnouncement, ChatRoom, Message, MessageRead, MessageStatus, OrgCategory, Organization, Priority,
    Profile, Role, User,
};

/// Everything the store starts with. `Default` is an empty world.
#[derive(Debug, Clone, Default)]
pub struct InitialState {
    pub users: Vec<User>,
    pub organizations: Vec<Organization>,
    pub profiles: Vec<Profile>,
    pub chat_rooms: Vec<ChatRoom>,
    pub messages: Vec<Message>,
    pub announcements: Vec<AdminAnnouncement>,
}

/// Id the demo login signs in as.
pub const DEMO_USER_ID: &str = "user-1";

/// The deterministic demo world: two users, three organizations (one per
/// category), seven channels, a short conversation and two announcements.
pub fn demo() -> InitialState {
    InitialState {
        users: vec![
            User {
                id: DEMO_USER_ID.into(),
                email: "demo@groupin.jp".to_owned(),
                default_name: "Demo User".to_owned(),
                default_avatar_url: None,
                created_at: datetime!(2024-01-15 00:00 UTC),
            },
            User {
                id: "user-2".into(),
                email: "tanaka@example.com".to_owned(),
                default_name: "Taro Tanaka".to_owned(),
                default_avatar_url: None,
                created_at: datetime!(2024-02-01 00:00 UTC),
            },
        ],
        organizations: vec![
            Organization {
                id: "org-1".into(),
                slug: "tech-startup".to_owned(),
                name: "Tech Startup Inc.".to_owned(),
                description: Some("A team of builders shipping new ideas".to_owned()),
                category: OrgCategory::Company,
                icon_url: None,
                invite_code: Some("GR-TECH12".to_owned()),
                read_receipt_enabled: true,
                created_at: datetime!(2024-01-01 00:00 UTC),
                updated_at: None,
            },
            Organization {
                id: "org-2".into(),
                slug: "soccer-club".to_owned(),
                name: "Tokyo High School Soccer Club".to_owned(),
                description: Some("Training every day for the nationals".to_owned()),
                category: OrgCategory::School,
                icon_url: None,
                invite_code: Some("GR-SOCC45".to_owned()),
                read_receipt_enabled: true,
                created_at: datetime!(2024-02-01 00:00 UTC),
                updated_at: None,
            },
            Organization {
                id: "org-3".into(),
                slug: "design-community".to_owned(),
                name: "Design Community".to_owned(),
                description: Some("A place for designers to meet".to_owned()),
                category: OrgCategory::Community,
                icon_url: None,
                invite_code: Some("GR-DSGN78".to_owned()),
                read_receipt_enabled: false,
                created_at: datetime!(2024-03-01 00:00 UTC),
                updated_at: None,
            },
        ],
        profiles: vec![
            profile("profile-1", DEMO_USER_ID, "org-1", "Dev Lead", Role::Owner, datetime!(2024-01-01 00:00 UTC)),
            profile("profile-2", "user-2", "org-1", "Tanaka (Engineer)", Role::Member, datetime!(2024-01-05 00:00 UTC)),
            profile("profile-3", DEMO_USER_ID, "org-2", "Soccer Taro", Role::Member, datetime!(2024-02-01 00:00 UTC)),
            profile("profile-4", DEMO_USER_ID, "org-3", "Designer D", Role::Member, datetime!(2024-03-01 00:00 UTC)),
        ],
        chat_rooms: vec![
            room("chat-1", "org-1", "general", "Company-wide topics", datetime!(2024-01-01 00:00 UTC)),
            room("chat-2", "org-1", "dev-team", "Engineering discussion", datetime!(2024-01-02 00:00 UTC)),
            room("chat-3", "org-1", "random", "Small talk", datetime!(2024-01-03 00:00 UTC)),
            room("chat-4", "org-2", "notices", "Practice and match schedule", datetime!(2024-02-01 00:00 UTC)),
            room("chat-5", "org-2", "chatter", "Off-pitch talk", datetime!(2024-02-02 00:00 UTC)),
            room("chat-6", "org-3", "reviews", "Feedback on work", datetime!(2024-03-01 00:00 UTC)),
            room("chat-7", "org-3", "inspiration", "Share ideas", datetime!(2024-03-02 00:00 UTC)),
        ],
        messages: vec![
            Message {
                id: "msg-1".into(),
                room_id: "chat-1".into(),
                sender_id: "profile-1".into(),
                content: "Good morning! Today's meeting starts at 10:00.".to_owned(),
                created_at: datetime!(2024-03-20 09:00 UTC),
                updated_at: None,
                files: Vec::new(),
                reads: vec![MessageRead {
                    message_id: "msg-1".into(),
                    profile_id: "profile-2".into(),
                    read_at: datetime!(2024-03-20 09:05 UTC),
                }],
                reactions: Vec::new(),
                send_duration_ms: None,
                status: MessageStatus::Sent,
            },
            Message {
                id: "msg-2".into(),
                room_id: "chat-1".into(),
                sender_id: "profile-2".into(),
                content: "Got it, I'll be ready.".to_owned(),
                created_at: datetime!(2024-03-20 09:05 UTC),
                updated_at: None,
                files: Vec::new(),
                reads: Vec::new(),
                reactions: Vec::new(),
                send_duration_ms: None,
                status: MessageStatus::Sent,
            },
        ],
        announcements: vec![
            AdminAnnouncement {
                id: "ann-1".into(),
                title: "Welcome to Groupin!".to_owned(),
                content: "Thanks for using Groupin. Keep a separate profile for every organization you belong to."
                    .to_owned(),
                priority: Priority::Normal,
                is_read: false,
                created_at: datetime!(2024-03-15 14:00 UTC),
            },
            AdminAnnouncement {
                id: "ann-2".into(),
                title: "File sharing".to_owned(),
                content: "Drag and drop files of up to 200MB into any channel.".to_owned(),
                priority: Priority::Normal,
                is_read: false,
                created_at: datetime!(2024-03-10 09:00 UTC),
            },
        ],
    }
}

fn profile(
    id: &str,
    user_id: &str,
    org_id: &str,
    display_name: &str,
    role: Role,
    joined_at: time::OffsetDateTime,
) -> Profile {
    Profile {
        id: id.into(),
        user_id: user_id.into(),
        org_id: org_id.into(),
        display_name: display_name.to_owned(),
        avatar_url: None,
        role,
        joined_at,
    }
}

fn room(id: &str, org_id: &str, name: &str, description: &str, created_at: time::OffsetDateTime) -> ChatRoom {
    ChatRoom {
        id: id.into(),
        org_id: org_id.into(),
        name: name.to_owned(),
        description: Some(description.to_owned()),
        created_at,
    }
}
