use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::application_dto::{
        ApplicationListQuery, CreateApplicationPayload, StatusChangePayload,
        UpdateApplicationPayload,
    },
    error::{Error, Result},
    models::application::{Application, ApplicationStats},
    AppState,
};

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| Error::BadRequest(rejection.body_text()))
}

#[utoipa::path(
    get,
    path = "/applications",
    params(
        ("positionId" = Option<String>, Query, description = "Only applications for this position")
    ),
    responses(
        (status = 200, description = "Applications, newest first", body = Json<Vec<Application>>)
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let items = state
        .application_service
        .list(query.position_id.as_deref())
        .await;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/applications",
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Application created", body = Json<Application>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateApplicationPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let payload = body(payload)?;
    payload.validate()?;
    let application = state.application_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/applications/{id}",
    params(
        ("id" = String, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application found", body = Json<Application>),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.get_by_id(&id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    put,
    path = "/applications/{id}",
    params(
        ("id" = String, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationPayload,
    responses(
        (status = 200, description = "Application updated", body = Json<Application>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateApplicationPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let payload = body(payload)?;
    payload.validate()?;
    let application = state.application_service.update(&id, payload).await?;
    Ok(Json(application))
}

#[utoipa::path(
    patch,
    path = "/applications/{id}/status",
    params(
        ("id" = String, Path, description = "Application ID")
    ),
    request_body = StatusChangePayload,
    responses(
        (status = 200, description = "Status changed", body = Json<Application>),
        (status = 400, description = "Unknown status or invalid rating"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<StatusChangePayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let payload = body(payload)?;
    payload.validate()?;
    let application = state
        .application_service
        .update_status(&id, payload)
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    delete,
    path = "/applications/{id}",
    params(
        ("id" = String, Path, description = "Application ID")
    ),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.application_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/applications/stats",
    responses(
        (status = 200, description = "Applications per stage", body = Json<ApplicationStats>)
    )
)]
#[axum::debug_handler]
pub async fn application_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.application_service.stats().await))
}
