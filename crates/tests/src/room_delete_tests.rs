use crate::fixtures::{study_room, TestApp};
use serde_json::Value;

#[tokio::test]
async fn creator_delete_removes_every_copy() {
    let app = TestApp::spawn().await;

    let mut room = study_room("r-gone", "Ephemeral", "user_a");
    room.participants = 3;
    app.seed_member("user_a", "Alex", &[room.clone()]);
    app.seed_member("user_b", "Blair", &[room.clone()]);
    app.seed_member("user_c", "Casey", &[room.clone()]);

    let resp = app
        .auth_delete("/api/rooms/r-gone", &app.token("user_a", "Alex"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["deleted"], true);

    for identity in ["user_a", "user_b", "user_c"] {
        assert!(app.store.get(identity).unwrap().room("r-gone").is_none());
    }

    // With no copies left the room does not exist.
    let resp = app
        .auth_get("/api/rooms/r-gone", &app.token("user_b", "Blair"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Room not found");
}

#[tokio::test]
async fn non_creator_delete_is_forbidden_and_changes_nothing() {
    let app = TestApp::spawn().await;

    let room = study_room("r-keep", "Keeper", "user_a");
    app.seed_member("user_a", "Alex", &[room.clone()]);
    app.seed_member("user_b", "Blair", &[room.clone()]);

    let resp = app
        .auth_delete("/api/rooms/r-keep", &app.token("user_b", "Blair"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Only room creator can delete room");

    assert!(app.store.get("user_a").unwrap().room("r-keep").is_some());
    assert!(app.store.get("user_b").unwrap().room("r-keep").is_some());
}

#[tokio::test]
async fn delete_unknown_room_returns_404() {
    let app = TestApp::spawn().await;
    app.seed_user("user_a", "Alex");

    let resp = app
        .auth_delete("/api/rooms/room-404", &app.token("user_a", "Alex"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Room not found");
}
