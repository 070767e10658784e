use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::{post, put};
use axum::{Json, Router};
use chat_webapi::models::{LoginRequest, LoginResponse, Message, UpdateGroupRequest, User};
use chat_webapi::{Config, Payload, Server};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn do_login(Payload(req): Payload<LoginRequest>) -> Json<LoginResponse> {
    assert_eq!(req.name, "alice");
    Json(LoginResponse {
        identifier: "u-123".to_string(),
    })
}

async fn rename_group(Payload(req): Payload<UpdateGroupRequest>) -> Json<Value> {
    Json(json!({ "renamedTo": req.name }))
}

async fn echo_message(Payload(msg): Payload<Message>) -> Json<Message> {
    Json(msg)
}

async fn echo_user(Payload(user): Payload<User>) -> Json<User> {
    Json(user)
}

fn app() -> Router {
    let routes = Router::new()
        .route("/session", post(do_login))
        .route("/groups/g-1/name", put(rename_group))
        .route("/messages", post(echo_message))
        .route("/users", post(echo_user));
    Server::new(Config::default()).with_routes(routes).router()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn login_round_trip_uses_exact_field_names() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/session",
            json!({"name": "alice", "photo": "aGVsbG8="}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(read_json(response).await, json!({"identifier": "u-123"}));
}

#[tokio::test]
async fn login_missing_photo_is_malformed() {
    let response = app()
        .oneshot(json_request("POST", "/session", json!({"name": "alice"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "malformed_payload");
    assert!(body["message"].as_str().unwrap().contains("photo"));
}

#[tokio::test]
async fn wrong_type_is_malformed() {
    let response = app()
        .oneshot(json_request(
            "PUT",
            "/groups/g-1/name",
            json!({"groupName": 42}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "malformed_payload");
}

#[tokio::test]
async fn missing_content_type_is_malformed() {
    let request = Request::post("/session")
        .body(Body::from(r#"{"name":"alice","photo":""}"#))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "malformed_payload");
}

#[tokio::test]
async fn group_rename_reads_group_name() {
    let response = app()
        .oneshot(json_request(
            "PUT",
            "/groups/g-1/name",
            json!({"groupName": "rustaceans"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"renamedTo": "rustaceans"}));
}

#[tokio::test]
async fn message_without_reply_comes_back_untouched() {
    let sent = json!({
        "id": "m-1",
        "conversationId": "c-1",
        "senderId": "u-1",
        "senderName": "alice",
        "content": "hi",
        "timestamp": "2024-05-01T10:15:00Z",
        "attachment": "AAEC",
        "replyTo": "",
        "replyContent": "",
        "replySenderName": "",
        "replyAttachment": ""
    });
    let response = app()
        .oneshot(json_request("POST", "/messages", sent.clone()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, sent);
}

#[tokio::test]
async fn message_reply_snapshot_is_not_resolved() {
    let sent = json!({
        "id": "m-2",
        "conversationId": "c-1",
        "senderId": "u-2",
        "senderName": "bob",
        "content": "agreed",
        "timestamp": "2024-05-01T10:16:00Z",
        "attachment": null,
        "replyTo": "m-unknown",
        "replyContent": "stale copy",
        "replySenderName": "alice",
        "replyAttachment": "AQID"
    });
    let response = app()
        .oneshot(json_request("POST", "/messages", sent))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["attachment"], "");
    assert_eq!(body["replyTo"], "m-unknown");
    assert_eq!(body["replyContent"], "stale copy");
    assert_eq!(body["replySenderName"], "alice");
    assert_eq!(body["replyAttachment"], "AQID");
}

#[tokio::test]
async fn user_photo_bytes_survive_the_boundary() {
    let photo: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
    let user = User {
        id: "u-1".to_string(),
        name: "alice".to_string(),
        photo: photo.clone(),
    };
    let response = app()
        .oneshot(json_request("POST", "/users", serde_json::to_value(&user).unwrap()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let echoed: User = serde_json::from_slice(&body).unwrap();
    assert_eq!(echoed.photo, photo);
}

#[tokio::test]
async fn invalid_base64_is_malformed() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/users",
            json!({"id": "u-1", "name": "alice", "photo": "not base64!"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
