// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member CRUD handlers. Every operation is scoped to the calling manager.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Principal,
    error::ApiError,
    models::{CreateMemberRequest, Member, UpdateMemberRequest},
    state::AppState,
};

fn parse_member_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid member ID"))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

#[utoipa::path(
    get,
    path = "/api/v1/members",
    tag = "Members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [Member]),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<Member>>, ApiError> {
    let members = state.members.list(&principal.manager_id)?;
    Ok(Json(members))
}

#[utoipa::path(
    get,
    path = "/api/v1/members/{member_id}",
    params(("member_id" = u64, Path, description = "Identifier of the member")),
    tag = "Members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Member),
        (status = 400, description = "Member ID is not a number"),
        (status = 403, description = "Member belongs to another manager"),
        (status = 404, description = "No member with this ID")
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    principal: Principal,
    Path(member_id): Path<String>,
) -> Result<Json<Member>, ApiError> {
    let id = parse_member_id(&member_id)?;
    let member = state.members.get(&principal.manager_id, id)?;
    Ok(Json(member))
}

#[utoipa::path(
    post,
    path = "/api/v1/members",
    request_body = CreateMemberRequest,
    tag = "Members",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = Member),
        (status = 400, description = "Malformed or invalid member"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    principal: Principal,
    body: Result<Json<CreateMemberRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let request = json_body(body)?;
    request.validate()?;

    let member = state.members.create(&principal.manager_id, request)?;
    tracing::info!(member_id = member.id, manager_id = %principal.manager_id, "Created member");
    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    put,
    path = "/api/v1/members/{member_id}",
    params(("member_id" = u64, Path, description = "Identifier of the member")),
    request_body = UpdateMemberRequest,
    tag = "Members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Member),
        (status = 400, description = "Malformed or invalid update"),
        (status = 403, description = "Member belongs to another manager"),
        (status = 404, description = "No member with this ID"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    principal: Principal,
    Path(member_id): Path<String>,
    body: Result<Json<UpdateMemberRequest>, JsonRejection>,
) -> Result<Json<Member>, ApiError> {
    let id = parse_member_id(&member_id)?;
    let request = json_body(body)?;
    request.validate()?;

    let member = state.members.update(&principal.manager_id, id, request)?;
    Ok(Json(member))
}

#[utoipa::path(
    delete,
    path = "/api/v1/members/{member_id}",
    params(("member_id" = u64, Path, description = "Identifier of the member")),
    tag = "Members",
    security(("bearer_auth" = [])),
    responses(
        (status = 204),
        (status = 403, description = "Member belongs to another manager"),
        (status = 404, description = "No member with this ID")
    )
)]
pub async fn delete_member(
    State(state): State<AppState>,
    principal: Principal,
    Path(member_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_member_id(&member_id)?;
    state.members.delete(&principal.manager_id, id)?;
    tracing::info!(member_id = id, manager_id = %principal.manager_id, "Deleted member");
    Ok(StatusCode::NO_CONTENT)
}
