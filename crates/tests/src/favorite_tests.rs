use crate::fixtures::{study_room, TestApp};
use serde_json::Value;

#[tokio::test]
async fn toggle_flips_only_the_callers_flag() {
    let app = TestApp::spawn().await;

    let room = study_room("r-star", "Starred", "user_a");
    app.seed_member("user_a", "Alex", &[room.clone()]);
    app.seed_member("user_b", "Blair", &[room.clone()]);

    let resp = app
        .auth_patch("/api/rooms/r-star/favorite", &app.token("user_b", "Blair"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["favorite"], true);

    assert!(app.store.get("user_b").unwrap().room("r-star").unwrap().favorite);
    assert!(!app.store.get("user_a").unwrap().room("r-star").unwrap().favorite);
}

#[tokio::test]
async fn toggling_twice_restores_the_original_state() {
    let app = TestApp::spawn().await;
    app.seed_member(
        "user_a",
        "Alex",
        &[study_room("r-flip", "Flip", "user_a")],
    );
    let token = app.token("user_a", "Alex");

    let first: Value = app
        .auth_patch("/api/rooms/r-flip/favorite", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["favorite"], true);

    let second: Value = app
        .auth_patch("/api/rooms/r-flip/favorite", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["favorite"], false);

    assert!(!app.store.get("user_a").unwrap().room("r-flip").unwrap().favorite);
}

#[tokio::test]
async fn any_member_may_favorite_not_just_the_creator() {
    let app = TestApp::spawn().await;

    let room = study_room("r-anyone", "Anyone", "user_a");
    app.seed_member("user_a", "Alex", &[room.clone()]);
    app.seed_member("user_b", "Blair", &[room.clone()]);

    let resp = app
        .auth_patch("/api/rooms/r-anyone/favorite", &app.token("user_b", "Blair"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn favorite_on_a_room_the_caller_does_not_hold_returns_404() {
    let app = TestApp::spawn().await;
    app.seed_member(
        "user_a",
        "Alex",
        &[study_room("r-held", "Held", "user_a")],
    );
    app.seed_user("user_b", "Blair");

    let resp = app
        .auth_patch("/api/rooms/r-held/favorite", &app.token("user_b", "Blair"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Room not found");
}

#[tokio::test]
async fn toggle_does_not_touch_shared_fields() {
    let app = TestApp::spawn().await;

    let mut room = study_room("r-shared", "Shared", "user_a");
    room.participants = 2;
    app.seed_member("user_a", "Alex", &[room.clone()]);
    app.seed_member("user_b", "Blair", &[room.clone()]);

    app.auth_patch("/api/rooms/r-shared/favorite", &app.token("user_b", "Blair"))
        .send()
        .await
        .unwrap();

    let copy = app.store.get("user_b").unwrap().room("r-shared").unwrap().clone();
    assert_eq!(copy.name, "Shared");
    assert_eq!(copy.participants, 2);
    assert_eq!(copy.last_active, room.last_active);
}
