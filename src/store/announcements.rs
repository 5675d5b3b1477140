use time::OffsetDateTime;
use tracing::info;

use super::AppStore;
use crate::model::{AdminAnnouncement, AnnouncementId, Priority};

impl AppStore {
    /// Marks an announcement read and persists the fact for this viewer.
    pub fn mark_announcement_as_read(&mut self, id: &AnnouncementId) -> bool {
        let Some(announcement) = self.announcements.iter_mut().find(|announcement| &announcement.id == id) else {
            return false;
        };
        announcement.is_read = true;
        self.announcement_reads.record_read(id);
        true
    }

    /// Publishes a system-wide announcement, newest first. Only a signed-in
    /// system admin may publish, and title and content must not be blank.
    pub fn publish_announcement(&mut self, title: &str, content: &str, priority: Priority) -> Option<AnnouncementId> {
        if !self.session.is_system_admin {
            return None;
        }
        let (title, content) = (title.trim(), content.trim());
        if title.is_empty() || content.is_empty() {
            return None;
        }

        let id = AnnouncementId::generate();
        info!(announcement = %id, ?priority, "announcement published");
        self.announcements.insert(
            0,
            AdminAnnouncement {
                id: id.clone(),
                title: title.to_owned(),
                content: content.to_owned(),
                priority,
                is_read: false,
                created_at: OffsetDateTime::now_utc(),
            },
        );
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn unknown_announcement_is_not_marked() {
        let mut store = AppStore::in_memory(seed::demo());
        assert!(!store.mark_announcement_as_read(&"ann-404".into()));
    }

    #[test]
    fn publishing_requires_system_admin() {
        let mut store = AppStore::in_memory(seed::demo());
        store.authenticate("user-1");
        assert!(store.publish_announcement("Hi", "there", Priority::High).is_none());

        store.complete_admin_setup("root@groupin.jp", "Adm1n!pass");
        assert!(store.publish_announcement("  ", "body", Priority::Low).is_none());
        let id = store.publish_announcement("Maintenance", "Down at 2am", Priority::Urgent).unwrap();
        assert_eq!(store.announcements()[0].id, id);
        assert!(!store.announcements()[0].is_read);
    }
}
