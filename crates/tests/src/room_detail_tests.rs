use crate::fixtures::{study_room, TestApp};
use serde_json::Value;

#[tokio::test]
async fn get_room_detail_aggregates_members() {
    let app = TestApp::spawn().await;

    let mut room = study_room("r-quiet", "Quiet Hour", "user_a");
    room.participants = 3;
    app.seed_member("user_a", "Alex", &[room.clone()]);
    let mut b_copy = room.clone();
    b_copy.favorite = true;
    app.seed_member("user_b", "Blair", &[b_copy]);
    app.seed_member("user_c", "Casey", &[room.clone()]);

    let resp = app
        .auth_get("/api/rooms/r-quiet", &app.token("user_a", "Alex"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["room"]["id"], "r-quiet");
    assert_eq!(json["room"]["name"], "Quiet Hour");
    assert_eq!(json["room"]["maxParticipants"], 4);
    assert_eq!(json["memberCount"], 3);

    let names: Vec<&str> = json["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Alex"));
    assert!(names.contains(&"Blair"));
    assert!(names.contains(&"Casey"));
}

#[tokio::test]
async fn detail_favorite_is_the_callers_own_flag() {
    let app = TestApp::spawn().await;

    let room = study_room("r-fav", "Deep Work", "user_a");
    app.seed_member("user_a", "Alex", &[room.clone()]);
    let mut b_copy = room.clone();
    b_copy.favorite = true;
    app.seed_member("user_b", "Blair", &[b_copy]);

    let as_b: Value = app
        .auth_get("/api/rooms/r-fav", &app.token("user_b", "Blair"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(as_b["room"]["favorite"], true);

    // Blair's flag must never leak into Alex's view.
    let as_a: Value = app
        .auth_get("/api/rooms/r-fav", &app.token("user_a", "Alex"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(as_a["room"]["favorite"], false);
}

#[tokio::test]
async fn detail_never_exposes_the_private_key() {
    let app = TestApp::spawn().await;

    let mut room = study_room("r-priv", "Secret Study", "user_a");
    room.is_private = true;
    room.private_key = Some("k3y".to_string());
    app.seed_member("user_a", "Alex", &[room]);

    let json: Value = app
        .auth_get("/api/rooms/r-priv", &app.token("user_a", "Alex"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(json["room"]["isPrivate"], true);
    assert!(json["room"].get("privateKey").is_none());
}

#[tokio::test]
async fn unknown_room_returns_404() {
    let app = TestApp::spawn().await;
    app.seed_user("user_a", "Alex");

    let resp = app
        .auth_get("/api/rooms/room-404", &app.token("user_a", "Alex"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Room not found");
}

#[tokio::test]
async fn missing_or_garbage_token_returns_401() {
    let app = TestApp::spawn().await;
    app.seed_member(
        "user_a",
        "Alex",
        &[study_room("r-auth", "Focus", "user_a")],
    );

    let resp = app.client.get(app.url("/api/rooms/r-auth")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = app
        .auth_get("/api/rooms/r-auth", "not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Unauthorized");
}

#[tokio::test]
async fn any_authenticated_caller_may_fetch_detail() {
    let app = TestApp::spawn().await;
    app.seed_member(
        "user_a",
        "Alex",
        &[study_room("r-open", "Open Desk", "user_a")],
    );

    // No user document for the caller, and not a member either.
    let resp = app
        .auth_get("/api/rooms/r-open", &app.token("user_z", "Zoe"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["room"]["favorite"], false);
    assert_eq!(json["memberCount"], 1);
}
