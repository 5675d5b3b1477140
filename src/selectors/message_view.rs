use pulldown_cmark::{Event, Parser};
use serde::Serialize;

use crate::model::{Message, Profile, ProfileId, RoomId};
use crate::AppStore;

/// One emoji under a message, with how many profiles used it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionSummary {
    pub emoji: String,
    pub count: usize,
    pub reacted_by_me: bool,
}

/// A message joined with what a chat view needs to draw it.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView<'a> {
    pub message: &'a Message,
    /// `None` when the sender profile no longer resolves.
    pub sender: Option<&'a Profile>,
    pub content_html: String,
    pub is_own: bool,
    /// Reactions grouped by emoji, in order of first use.
    pub reactions: Vec<ReactionSummary>,
    /// Whether read receipts are shown: own message in an organization that
    /// has them enabled.
    pub shows_read_receipts: bool,
    /// Profiles that read the message; empty unless receipts are shown.
    pub read_by: Vec<&'a Profile>,
}

/// Renders message markdown to HTML. Raw HTML in the source is escaped, not
/// passed through.
pub fn render_markdown(content: &str) -> String {
    let parser = Parser::new(content).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        _ => event,
    });
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

impl AppStore {
    /// View-models for every message in `room_id`, oldest first, from the
    /// point of view of the current profile.
    pub fn message_views(&self, room_id: &RoomId) -> Vec<MessageView<'_>> {
        let me = self.current_profile().map(|profile| &profile.id);
        let receipts_enabled = self
            .chat_room(room_id)
            .and_then(|room| self.organization(&room.org_id))
            .is_some_and(|org| org.read_receipt_enabled);

        self.messages_for_room(room_id)
            .into_iter()
            .map(|message| {
                let is_own = Some(&message.sender_id) == me;
                let shows_read_receipts = is_own && receipts_enabled;
                let read_by = if shows_read_receipts {
                    message.reads.iter().filter_map(|read| self.profile(&read.profile_id)).collect()
                } else {
                    Vec::new()
                };

                MessageView {
                    message,
                    sender: self.profile(&message.sender_id),
                    content_html: render_markdown(&message.content),
                    is_own,
                    reactions: summarize_reactions(message, me),
                    shows_read_receipts,
                    read_by,
                }
            })
            .collect()
    }
}

fn summarize_reactions(message: &Message, me: Option<&ProfileId>) -> Vec<ReactionSummary> {
    let mut summaries: Vec<ReactionSummary> = Vec::new();
    for reaction in &message.reactions {
        let mine = Some(&reaction.profile_id) == me;
        match summaries.iter_mut().find(|summary| summary.emoji == reaction.emoji) {
            Some(summary) => {
                summary.count += 1;
                summary.reacted_by_me |= mine;
            }
            None => summaries.push(ReactionSummary {
                emoji: reaction.emoji.clone(),
                count: 1,
                reacted_by_me: mine,
            }),
        }
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn viewing_general() -> AppStore {
        let mut store = AppStore::in_memory(seed::demo());
        store.demo_authenticate();
        store.select_organization(Some(&"org-1".into()));
        store.select_chat_room(Some(&"chat-1".into()));
        store
    }

    #[test]
    fn markdown_renders_and_escapes_html() {
        assert_eq!(render_markdown("**hi**"), "<p><strong>hi</strong></p>\n");
        let html = render_markdown("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn own_messages_show_readers_when_enabled() {
        let store = viewing_general();
        let views = store.message_views(&"chat-1".into());
        assert_eq!(views.len(), 2);

        let own = &views[0];
        assert!(own.is_own);
        assert!(own.shows_read_receipts);
        assert_eq!(own.read_by.len(), 1);
        assert_eq!(own.read_by[0].id, "profile-2");
        assert_eq!(own.sender.unwrap().display_name, "Dev Lead");

        let theirs = &views[1];
        assert!(!theirs.is_own);
        assert!(theirs.read_by.is_empty());
    }

    #[test]
    fn disabled_receipts_hide_readers() {
        let mut store = viewing_general();
        store.toggle_read_receipt(&"org-1".into());
        let views = store.message_views(&"chat-1".into());
        assert!(!views[0].shows_read_receipts);
        assert!(views[0].read_by.is_empty());
    }

    #[test]
    fn reactions_group_by_emoji() {
        let mut store = viewing_general();
        let msg = "msg-2".into();
        store.add_reaction(&msg, "👍");
        store.add_reaction(&msg, "🎉");
        store.authenticate("user-2");
        store.select_organization(Some(&"org-1".into()));
        store.add_reaction(&msg, "👍");

        let views = store.message_views(&"chat-1".into());
        assert_eq!(
            views[1].reactions,
            [
                ReactionSummary { emoji: "👍".to_owned(), count: 2, reacted_by_me: true },
                ReactionSummary { emoji: "🎉".to_owned(), count: 1, reacted_by_me: false },
            ]
        );
    }
}
