//! Charger API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{ChargerDto, CreateChargerRequest, NearbyQuery, UpdateChargerRequest};
use crate::application::ChargerService;
use crate::domain::{Caller, ProximityFilter};
use crate::interfaces::http::common::{error_response, ApiError, ApiResponse, ValidatedJson};

/// Charger handler state
#[derive(Clone)]
pub struct ChargerHandlerState {
    pub service: Arc<ChargerService>,
    pub default_radius_km: f64,
}

fn to_dtos(records: Vec<crate::domain::ChargerRecord>) -> Vec<ChargerDto> {
    records.into_iter().map(ChargerDto::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/v1/chargers",
    tag = "Chargers",
    responses(
        (status = 200, description = "Chargers visible to the caller", body = ApiResponse<Vec<ChargerDto>>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_chargers(
    State(state): State<ChargerHandlerState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ApiResponse<Vec<ChargerDto>>>, ApiError<Vec<ChargerDto>>> {
    let records = state.service.list(&caller).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(to_dtos(records))))
}

#[utoipa::path(
    get,
    path = "/api/v1/chargers/admin/all",
    tag = "Chargers",
    responses(
        (status = 200, description = "Every charger", body = ApiResponse<Vec<ChargerDto>>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_all_chargers(
    State(state): State<ChargerHandlerState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ApiResponse<Vec<ChargerDto>>>, ApiError<Vec<ChargerDto>>> {
    let records = state
        .service
        .list_all(&caller)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(to_dtos(records))))
}

#[utoipa::path(
    get,
    path = "/api/v1/chargers/nearby",
    tag = "Chargers",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Active chargers within the radius", body = ApiResponse<Vec<ChargerDto>>),
        (status = 400, description = "Missing or invalid coordinates")
    )
)]
pub async fn nearby_chargers(
    State(state): State<ChargerHandlerState>,
    caller: Option<Extension<Caller>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<Vec<ChargerDto>>>, ApiError<Vec<ChargerDto>>> {
    let filter = ProximityFilter::from_query(
        query.latitude.as_deref(),
        query.longitude.as_deref(),
        query.radius.as_deref(),
        state.default_radius_km,
    )
    .map_err(error_response)?;

    let records = state.service.nearby(&filter).await.map_err(error_response)?;
    tracing::debug!(
        caller = caller.as_ref().map(|Extension(c)| c.id.as_str()).unwrap_or("anonymous"),
        radius_km = filter.radius_km(),
        found = records.len(),
        "Nearby search"
    );
    Ok(Json(ApiResponse::success(to_dtos(records))))
}

#[utoipa::path(
    get,
    path = "/api/v1/chargers/{id}",
    tag = "Chargers",
    params(("id" = String, Path, description = "Charger ID")),
    responses(
        (status = 200, description = "Charger details", body = ApiResponse<ChargerDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Charger not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_charger(
    State(state): State<ChargerHandlerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ChargerDto>>, ApiError<ChargerDto>> {
    let record = state
        .service
        .get(&caller, &id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(record.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/chargers",
    tag = "Chargers",
    request_body = CreateChargerRequest,
    responses(
        (status = 201, description = "Charger created", body = ApiResponse<ChargerDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_charger(
    State(state): State<ChargerHandlerState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(body): ValidatedJson<CreateChargerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ChargerDto>>), ApiError<ChargerDto>> {
    let fields = body.into_domain().map_err(error_response)?;
    let record = state
        .service
        .create(&caller, fields)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/chargers/{id}",
    tag = "Chargers",
    params(("id" = String, Path, description = "Charger ID")),
    request_body = UpdateChargerRequest,
    responses(
        (status = 200, description = "Charger updated", body = ApiResponse<ChargerDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Charger not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_charger(
    State(state): State<ChargerHandlerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateChargerRequest>,
) -> Result<Json<ApiResponse<ChargerDto>>, ApiError<ChargerDto>> {
    let changes = body.into_domain().map_err(error_response)?;
    let record = state
        .service
        .update(&caller, &id, changes)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(record.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/chargers/{id}",
    tag = "Chargers",
    params(("id" = String, Path, description = "Charger ID")),
    responses(
        (status = 200, description = "Charger deleted", body = ApiResponse<String>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Charger not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_charger(
    State(state): State<ChargerHandlerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, ApiError<String>> {
    state
        .service
        .delete(&caller, &id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(format!("Charger {} deleted", id))))
}
