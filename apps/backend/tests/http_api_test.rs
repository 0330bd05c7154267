//! HTTP-level tests: wire codes, bearer auth, and problem+json errors.

mod support;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use backend::routes;
use serde_json::{json, Value};

use crate::support::test_state;

async fn register<S, B>(app: &S, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/user/create")
        .set_json(json!({"user_name": name, "leader_card_id": 42}))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    body["user_token"]
        .as_str()
        .expect("user_token in response")
        .to_string()
}

#[actix_web::test]
async fn health_endpoint_answers_ok() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn user_create_and_me_round_trip() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let token = register(&app, "Rin").await;

    let req = test::TestRequest::get()
        .uri("/api/user/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "Rin");
    assert_eq!(body["leader_card_id"], 42);
    assert!(body["id"].as_i64().is_some());
    assert!(body.get("token").is_none(), "token never leaves the server");
}

#[actix_web::test]
async fn unknown_token_yields_problem_json_401() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/user/me")
        .insert_header(("Authorization", "Bearer no-such-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/problem+json"
    );

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "UNAUTHENTICATED");
    assert_eq!(body["status"], 401);
}

#[actix_web::test]
async fn room_flow_speaks_numeric_wire_codes() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let host_token = register(&app, "Hostess").await;
    let guest_token = register(&app, "Guest").await;

    // Create
    let req = test::TestRequest::post()
        .uri("/api/room/create")
        .insert_header(("Authorization", format!("Bearer {host_token}")))
        .set_json(json!({"live_id": 31, "select_difficulty": 2}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let room_id = body["room_id"].as_i64().expect("room_id");

    // List (unauthenticated) shows the open room with its own live_id.
    let req = test::TestRequest::post()
        .uri("/api/room/list")
        .set_json(json!({"live_id": 0}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let listed = body["room_info_list"].as_array().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["room_id"], room_id);
    assert_eq!(listed[0]["live_id"], 31);
    assert_eq!(listed[0]["joined_user_count"], 1);
    assert_eq!(listed[0]["max_user_count"], 4);

    // Join: 1 = OK
    let req = test::TestRequest::post()
        .uri("/api/room/join")
        .insert_header(("Authorization", format!("Bearer {guest_token}")))
        .set_json(json!({"room_id": room_id, "select_difficulty": 1}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["join_room_result"], 1);

    // Wait: 1 = Waiting, membership view annotated with is_me/is_host.
    let req = test::TestRequest::post()
        .uri("/api/room/wait")
        .insert_header(("Authorization", format!("Bearer {guest_token}")))
        .set_json(json!({"room_id": room_id}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], 1);
    let members = body["room_user_list"].as_array().expect("members");
    assert_eq!(members.len(), 2);
    let me = members
        .iter()
        .find(|m| m["is_me"] == true)
        .expect("self in view");
    assert_eq!(me["name"], "Guest");
    assert_eq!(me["is_host"], false);
    assert_eq!(me["select_difficulty"], 1);

    // Start, then wait: 2 = LiveStart
    let req = test::TestRequest::post()
        .uri("/api/room/start")
        .insert_header(("Authorization", format!("Bearer {host_token}")))
        .set_json(json!({"room_id": room_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::post()
        .uri("/api/room/wait")
        .insert_header(("Authorization", format!("Bearer {host_token}")))
        .set_json(json!({"room_id": room_id}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], 2);

    // Both submit; result lists one entry per member.
    for token in [&host_token, &guest_token] {
        let req = test::TestRequest::post()
            .uri("/api/room/end")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"room_id": room_id, "judge_count_list": [4, 3, 2, 1, 3], "score": 1234}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::post()
        .uri("/api/room/result")
        .insert_header(("Authorization", format!("Bearer {guest_token}")))
        .set_json(json!({"room_id": room_id}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let result_list = body["result_user_list"].as_array().expect("results");
    assert_eq!(result_list.len(), 2);
    assert_eq!(result_list[0]["score"], 1234);
    assert_eq!(result_list[0]["judge_count_list"], json!([4, 3, 2, 1, 3]));
}

#[actix_web::test]
async fn out_of_range_difficulty_is_rejected() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let token = register(&app, "Picky").await;

    let req = test::TestRequest::post()
        .uri("/api/room/create")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"live_id": 1, "select_difficulty": 9}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_DIFFICULTY");
}
