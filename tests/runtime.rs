use std::time::Duration;

use groupin::model::{ProfileId, RoomId};
use groupin::runtime::{self, TypingDebouncer};
use groupin::{seed, AppStore};
use time::OffsetDateTime;
use tokio::time::sleep;

fn demo_in_general() -> AppStore {
    let mut store = AppStore::in_memory(seed::demo());
    store.demo_authenticate();
    store.select_organization(Some(&"org-1".into()));
    store.select_chat_room(Some(&"chat-1".into()));
    store
}

#[tokio::test(start_paused = true)]
async fn send_records_latency() {
    let store = runtime::shared(demo_in_general());
    let id = runtime::send_with_latency(&store, "late hello", Vec::new(), Duration::from_millis(250))
        .await
        .unwrap();

    let store = store.lock().await;
    let message = store.message(&id).unwrap();
    assert!(message.send_duration_ms.unwrap() >= 250);
    assert_eq!(message.content, "late hello");
}

#[tokio::test(start_paused = true)]
async fn send_without_room_is_dropped_after_wait() {
    let store = runtime::shared(AppStore::in_memory(seed::demo()));
    let sent = runtime::send_with_latency(&store, "void", Vec::new(), Duration::from_millis(100)).await;
    assert!(sent.is_none());
}

#[tokio::test(start_paused = true)]
async fn later_keystroke_supersedes_pending_clear() {
    let store = runtime::shared(demo_in_general());
    let room = RoomId::from("chat-1");
    let typer = ProfileId::from("profile-2");
    let mut debouncer = TypingDebouncer::new(store.clone(), Duration::from_secs(2));

    debouncer.keystroke(room.clone(), typer.clone()).await;
    sleep(Duration::from_millis(1500)).await;
    debouncer.keystroke(room.clone(), typer.clone()).await;
    sleep(Duration::from_millis(1500)).await;

    // first timer would have fired by now
    assert_eq!(store.lock().await.typing_entries(&room, OffsetDateTime::now_utc()).len(), 1);

    sleep(Duration::from_secs(1)).await;
    assert!(store.lock().await.typing_entries(&room, OffsetDateTime::now_utc()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelled_debouncer_leaves_presence_to_the_window() {
    let store = runtime::shared(demo_in_general());
    let room = RoomId::from("chat-1");
    let mut debouncer = TypingDebouncer::new(store.clone(), Duration::from_secs(2));
    debouncer.keystroke(room.clone(), "profile-2".into()).await;
    debouncer.cancel();
    sleep(Duration::from_secs(5)).await;

    let store = store.lock().await;
    let now = OffsetDateTime::now_utc();
    assert_eq!(store.typing_entries(&room, now).len(), 1);
    assert!(store.typing_entries(&room, now + time::Duration::seconds(10)).is_empty());
}

#[tokio::test]
async fn sweeper_prunes_stale_entries() {
    let store = runtime::shared(demo_in_general().with_typing_window(time::Duration::milliseconds(50)));
    let room = RoomId::from("chat-1");
    store.lock().await.set_typing(&room, &"profile-2".into());

    let sweeper = runtime::spawn_typing_sweeper(store.clone(), Duration::from_millis(20));
    sleep(Duration::from_millis(300)).await;
    sweeper.abort();

    let mut store = store.lock().await;
    // already swept, so a sweep far in the future finds nothing left
    assert_eq!(store.sweep_typing(OffsetDateTime::now_utc() + time::Duration::hours(1)), 0);
}
