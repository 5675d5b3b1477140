//! Entities held by the store.

mod announcement;
mod attachment;
pub mod ids;
mod message;
mod org;

pub use announcement::{AdminAnnouncement, Priority};
pub use attachment::{partition_uploads, FileAttachment, Upload, UploadTooLarge, MAX_FILE_SIZE_BYTES};
pub use ids::{AnnouncementId, FileId, MessageId, OrgId, ProfileId, ReactionId, RoomId, UserId};
pub use message::{Message, MessageRead, MessageReaction, MessageStatus, MAX_REACTIONS_PER_PROFILE};
pub use org::{ChatRoom, OrgCategory, Organization, OrganizationPatch, Profile, ProfilePatch, Role, User};
