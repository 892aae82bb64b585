// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::{from_fn, from_fn_with_state},
    response::Redirect,
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::authenticate,
    error::problem_details,
    models::{CreateMemberRequest, Member, ServiceType, UpdateMemberRequest},
    state::AppState,
};

pub mod health;
pub mod members;

pub const OPENAPI_JSON_PATH: &str = "/v3/api-docs/openapi.json";

/// Build the application router.
///
/// Layers, outermost first: CORS, request id, tracing, bearer authentication.
/// Member routes additionally render their errors as problem details.
pub fn router(state: AppState) -> Router {
    let authenticator = state.authenticator.clone();

    let member_routes = Router::new()
        .route(
            "/api/v1/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/api/v1/members/{member_id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .layer(from_fn(problem_details));

    Router::new()
        .merge(member_routes)
        .route("/actuator/health", get(health::health))
        .route("/actuator/info", get(health::info))
        .route(
            "/swagger-ui.html",
            get(|| async { Redirect::permanent("/swagger-ui/") }),
        )
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .with_state(state)
        .layer(from_fn_with_state(authenticator, authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        health::health,
        health::info
    ),
    components(
        schemas(
            Member,
            ServiceType,
            CreateMemberRequest,
            UpdateMemberRequest,
            health::HealthResponse,
            health::InfoResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Members", description = "Members managed by the calling manager"),
        (name = "Actuator", description = "Health and build information")
    )
)]
pub struct ApiDoc;
