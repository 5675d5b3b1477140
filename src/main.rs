use std::time::Duration;

use groupin::{
    runtime::{self, TypingDebouncer, TYPING_IDLE},
    seed, AppResult, Config,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Plays a short scripted session against the demo world.
#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("groupin=info")))
        .init();

    let config = Config::from_env()?;
    info!(data_dir = %config.data_dir.display(), "starting");

    let store = runtime::shared(config.open_store(seed::demo()));
    let sweeper = runtime::spawn_typing_sweeper(store.clone(), Duration::from_secs(1));

    let (room_id, profile_id) = {
        let mut store = store.lock().await;
        store.demo_authenticate();
        let org_id = store
            .organization_by_slug("tech-startup")
            .map(|org| org.id.clone())
            .ok_or("demo organization missing")?;
        store.select_organization(Some(&org_id));
        let room_id = store
            .current_organization_chat_rooms()
            .first()
            .map(|room| room.id.clone())
            .ok_or("demo organization has no rooms")?;
        store.select_chat_room(Some(&room_id));
        store.mark_room_as_read(&room_id);
        let profile_id = store.current_profile().map(|p| p.id.clone()).ok_or("no demo profile")?;
        (room_id, profile_id)
    };

    let mut debouncer = TypingDebouncer::new(store.clone(), TYPING_IDLE);
    debouncer.keystroke(room_id.clone(), profile_id).await;
    runtime::send_with_latency(&store, "Hello from the **demo** session", Vec::new(), runtime::simulated_latency())
        .await;

    let mut store = store.lock().await;
    for view in store.message_views(&room_id) {
        info!(
            sender = view.sender.map_or("?", |p| p.display_name.as_str()),
            took_ms = view.message.send_duration_ms,
            reads = view.read_by.len(),
            "{}",
            view.content_html.trim_end()
        );
    }

    let unread: Vec<_> = store
        .announcements()
        .iter()
        .filter(|a| !a.is_read)
        .map(|a| a.id.clone())
        .collect();
    for id in &unread {
        store.mark_announcement_as_read(id);
    }
    info!(marked = unread.len(), "announcements read");

    sweeper.abort();
    Ok(())
}
