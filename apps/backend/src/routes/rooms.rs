//! Room lifecycle and result routes. Handlers are thin: decode the wire
//! codes, delegate to the coordinator/aggregator services, re-encode.

use actix_web::web;
use serde::{Deserialize, Serialize};

use crate::entities::room_members::LiveDifficulty;
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::services::results::ResultService;
use crate::services::rooms::RoomService;
use crate::state::app_state::AppState;

#[derive(Serialize)]
struct Empty {}

fn parse_difficulty(code: i32) -> Result<LiveDifficulty, AppError> {
    LiveDifficulty::from_code(code).ok_or_else(|| {
        AppError::bad_request(
            "INVALID_DIFFICULTY",
            format!("select_difficulty must be 1 (normal) or 2 (hard), got {code}"),
        )
    })
}

fn parse_judge_counts(list: Vec<i32>) -> Result<[i32; 5], AppError> {
    let len = list.len();
    list.try_into().map_err(|_| {
        AppError::bad_request(
            "INVALID_JUDGE_COUNTS",
            format!("judge_count_list must have exactly 5 entries, got {len}"),
        )
    })
}

// ---- Create ----

#[derive(Deserialize)]
struct RoomCreateRequest {
    live_id: i64,
    select_difficulty: i32,
}

#[derive(Serialize)]
struct RoomCreateResponse {
    room_id: i64,
}

/// POST /api/room/create
async fn room_create(
    state: web::Data<AppState>,
    auth: AuthToken,
    req: web::Json<RoomCreateRequest>,
) -> Result<web::Json<RoomCreateResponse>, AppError> {
    let body = req.into_inner();
    let difficulty = parse_difficulty(body.select_difficulty)?;

    let room_id = RoomService::new()
        .create_room(&state, &auth.token, body.live_id, difficulty)
        .await?;

    Ok(web::Json(RoomCreateResponse { room_id }))
}

// ---- List ----

#[derive(Deserialize)]
struct RoomListRequest {
    live_id: i64,
}

#[derive(Serialize)]
struct RoomInfoDto {
    room_id: i64,
    live_id: i64,
    joined_user_count: u32,
    max_user_count: u32,
}

#[derive(Serialize)]
struct RoomListResponse {
    room_info_list: Vec<RoomInfoDto>,
}

/// POST /api/room/list
///
/// The only unauthenticated room endpoint; the lobby browser calls it
/// before the player has picked a session.
async fn room_list(
    state: web::Data<AppState>,
    req: web::Json<RoomListRequest>,
) -> Result<web::Json<RoomListResponse>, AppError> {
    let rooms = RoomService::new()
        .list_rooms(&state, req.live_id)
        .await?;

    let room_info_list = rooms
        .into_iter()
        .map(|r| RoomInfoDto {
            room_id: r.room_id,
            live_id: r.live_id,
            joined_user_count: r.joined_user_count,
            max_user_count: r.max_user_count,
        })
        .collect();

    Ok(web::Json(RoomListResponse { room_info_list }))
}

// ---- Join ----

#[derive(Deserialize)]
struct RoomJoinRequest {
    room_id: i64,
    select_difficulty: i32,
}

#[derive(Serialize)]
struct RoomJoinResponse {
    join_room_result: i32,
}

/// POST /api/room/join
async fn room_join(
    state: web::Data<AppState>,
    auth: AuthToken,
    req: web::Json<RoomJoinRequest>,
) -> Result<web::Json<RoomJoinResponse>, AppError> {
    let body = req.into_inner();
    let difficulty = parse_difficulty(body.select_difficulty)?;

    let result = RoomService::new()
        .join_room(&state, &auth.token, body.room_id, difficulty)
        .await?;

    Ok(web::Json(RoomJoinResponse {
        join_room_result: result.code(),
    }))
}

// ---- Wait ----

#[derive(Deserialize)]
struct RoomWaitRequest {
    room_id: i64,
}

#[derive(Serialize)]
struct RoomUserDto {
    user_id: i64,
    name: String,
    leader_card_id: i32,
    select_difficulty: i32,
    is_me: bool,
    is_host: bool,
}

#[derive(Serialize)]
struct RoomWaitResponse {
    status: i32,
    room_user_list: Vec<RoomUserDto>,
}

/// POST /api/room/wait
async fn room_wait(
    state: web::Data<AppState>,
    auth: AuthToken,
    req: web::Json<RoomWaitRequest>,
) -> Result<web::Json<RoomWaitResponse>, AppError> {
    let (status, members) = RoomService::new()
        .wait_status(&state, &auth.token, req.room_id)
        .await?;

    let room_user_list = members
        .into_iter()
        .map(|m| RoomUserDto {
            user_id: m.user_id,
            name: m.name,
            leader_card_id: m.leader_card_id,
            select_difficulty: m.select_difficulty.code(),
            is_me: m.is_me,
            is_host: m.is_host,
        })
        .collect();

    Ok(web::Json(RoomWaitResponse {
        status: status.code(),
        room_user_list,
    }))
}

// ---- Start ----

#[derive(Deserialize)]
struct RoomStartRequest {
    room_id: i64,
}

/// POST /api/room/start
async fn room_start(
    state: web::Data<AppState>,
    auth: AuthToken,
    req: web::Json<RoomStartRequest>,
) -> Result<web::Json<Empty>, AppError> {
    RoomService::new()
        .start_room(&state, &auth.token, req.room_id)
        .await?;
    Ok(web::Json(Empty {}))
}

// ---- End (submit result) ----

#[derive(Deserialize)]
struct RoomEndRequest {
    room_id: i64,
    judge_count_list: Vec<i32>,
    score: i32,
}

/// POST /api/room/end
async fn room_end(
    state: web::Data<AppState>,
    auth: AuthToken,
    req: web::Json<RoomEndRequest>,
) -> Result<web::Json<Empty>, AppError> {
    let body = req.into_inner();
    let judge_count_list = parse_judge_counts(body.judge_count_list)?;

    ResultService::new()
        .submit_result(&state, &auth.token, body.room_id, judge_count_list, body.score)
        .await?;
    Ok(web::Json(Empty {}))
}

// ---- Result ----

#[derive(Deserialize)]
struct RoomResultRequest {
    room_id: i64,
}

#[derive(Serialize)]
struct ResultUserDto {
    user_id: i64,
    judge_count_list: [i32; 5],
    score: i32,
}

#[derive(Serialize)]
struct RoomResultResponse {
    result_user_list: Vec<ResultUserDto>,
}

/// POST /api/room/result
async fn room_result(
    state: web::Data<AppState>,
    auth: AuthToken,
    req: web::Json<RoomResultRequest>,
) -> Result<web::Json<RoomResultResponse>, AppError> {
    let results = ResultService::new()
        .collect_results(&state, &auth.token, req.room_id)
        .await?;

    let result_user_list = results
        .into_iter()
        .map(|r| ResultUserDto {
            user_id: r.user_id,
            judge_count_list: r.judge_count_list,
            score: r.score,
        })
        .collect();

    Ok(web::Json(RoomResultResponse { result_user_list }))
}

// ---- Leave ----

#[derive(Deserialize)]
struct RoomLeaveRequest {
    room_id: i64,
}

/// POST /api/room/leave
async fn room_leave(
    state: web::Data<AppState>,
    auth: AuthToken,
    req: web::Json<RoomLeaveRequest>,
) -> Result<web::Json<Empty>, AppError> {
    RoomService::new()
        .leave_room(&state, &auth.token, req.room_id)
        .await?;
    Ok(web::Json(Empty {}))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/create", web::post().to(room_create))
        .route("/list", web::post().to(room_list))
        .route("/join", web::post().to(room_join))
        .route("/wait", web::post().to(room_wait))
        .route("/start", web::post().to(room_start))
        .route("/end", web::post().to(room_end))
        .route("/result", web::post().to(room_result))
        .route("/leave", web::post().to(room_leave));
}
