use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::ids::{FileId, MessageId};

/// 200 MiB.
pub const MAX_FILE_SIZE_BYTES: u64 = 200 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub id: FileId,
    pub message_id: MessageId,
    pub file_url: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub uploaded_at: OffsetDateTime,
}

/// A file handed over by the picker, before it belongs to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl Upload {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    pub fn check_size(&self) -> Result<(), UploadTooLarge> {
        if self.size > MAX_FILE_SIZE_BYTES {
            return Err(UploadTooLarge {
                name: self.name.clone(),
                size: self.size,
            });
        }
        Ok(())
    }

    /// Turns the upload into an attachment of `message_id`, backed by a
    /// transient object URL that only lives as long as this client.
    pub(crate) fn into_attachment(self, message_id: &MessageId, now: OffsetDateTime) -> FileAttachment {
        FileAttachment {
            id: FileId::generate(),
            message_id: message_id.clone(),
            file_url: object_url(),
            file_name: self.name,
            file_type: self.mime_type,
            file_size: self.size,
            uploaded_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name} is {size} bytes, over the 200 MiB limit")]
pub struct UploadTooLarge {
    pub name: String,
    pub size: u64,
}

/// Splits picked files into the ones that may be attached and the ones that
/// are over the size limit, preserving order in both.
pub fn partition_uploads(uploads: Vec<Upload>) -> (Vec<Upload>, Vec<UploadTooLarge>) {
    let mut accepted = Vec::with_capacity(uploads.len());
    let mut rejected = Vec::new();
    for upload in uploads {
        match upload.check_size() {
            Ok(()) => accepted.push(upload),
            Err(err) => rejected.push(err),
        }
    }
    (accepted, rejected)
}

fn object_url() -> String {
    format!("blob:groupin/{}", Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_inclusive() {
        assert!(Upload::new("a.bin", "application/octet-stream", MAX_FILE_SIZE_BYTES).check_size().is_ok());
        assert!(Upload::new("b.bin", "application/octet-stream", MAX_FILE_SIZE_BYTES + 1).check_size().is_err());
    }

    #[test]
    fn partition_keeps_order() {
        let (accepted, rejected) = partition_uploads(vec![
            Upload::new("one.png", "image/png", 10),
            Upload::new("huge.mov", "video/quicktime", 209_715_201),
            Upload::new("two.pdf", "application/pdf", 20),
        ]);
        let names: Vec<_> = accepted.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["one.png", "two.pdf"]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].name, "huge.mov");
    }

    #[test]
    fn attachment_points_back_at_message() {
        let message_id = MessageId::generate();
        let attachment = Upload::new("notes.txt", "text/plain", 3)
            .into_attachment(&message_id, OffsetDateTime::now_utc());
        assert_eq!(attachment.message_id, message_id);
        assert!(attachment.file_url.starts_with("blob:groupin/"));
    }
}
