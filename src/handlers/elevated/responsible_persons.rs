// handlers/elevated/responsible_persons.rs - contacts accountable for faculty meters

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    Json, Path, Query, State,
};
use serde_json::Value;

use crate::auth::is_valid_email;
use crate::database::models::{NewResponsiblePerson, ResponsiblePerson, ResponsiblePersonFilter};
use crate::error::ApiError;
use crate::handlers::{json_body, path_param, query_params};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ResponsiblePersonService;
use crate::state::AppState;

fn validate(person: &NewResponsiblePerson) -> Result<(), ApiError> {
    if person.name.trim().is_empty() || person.email.trim().is_empty() {
        return Err(ApiError::bad_request("Name and email are required"));
    }
    if !is_valid_email(&person.email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    Ok(())
}

/// GET /api/admin/responsible-persons?faculty_id=&is_active=
pub async fn responsible_persons_get(
    State(state): State<AppState>,
    filter: Result<Query<ResponsiblePersonFilter>, QueryRejection>,
) -> ApiResult<Vec<ResponsiblePerson>> {
    let filter = query_params(filter)?;
    let persons = ResponsiblePersonService::new(state.db.clone()).list(&filter).await?;
    Ok(ApiResponse::success(persons).with_message("Responsible persons retrieved successfully"))
}

pub async fn responsible_persons_post(
    State(state): State<AppState>,
    payload: Result<Json<NewResponsiblePerson>, JsonRejection>,
) -> ApiResult<ResponsiblePerson> {
    let person = json_body(payload)?;
    validate(&person)?;

    let created = ResponsiblePersonService::new(state.db.clone()).create(&person).await?;
    Ok(ApiResponse::created(created).with_message("Responsible person created successfully"))
}

pub async fn responsible_person_put(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<NewResponsiblePerson>, JsonRejection>,
) -> ApiResult<ResponsiblePerson> {
    let id = path_param(id)?;
    let person = json_body(payload)?;
    validate(&person)?;

    let updated = ResponsiblePersonService::new(state.db.clone()).update(id, &person).await?;
    Ok(ApiResponse::success(updated).with_message("Responsible person updated successfully"))
}

/// DELETE marks the contact inactive instead of removing the row
pub async fn responsible_person_delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    ResponsiblePersonService::new(state.db.clone()).deactivate(path_param(id)?).await?;
    Ok(ApiResponse::message_only("Responsible person deactivated successfully"))
}
