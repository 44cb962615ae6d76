// handlers/elevated/reference.rs - reference data used to describe devices

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Json, Path, State,
};
use serde_json::Value;

use crate::database::models::{Faculty, Manufacturer, NewFaculty, NewManufacturer, NewPowerSpec, PowerSpec};
use crate::error::ApiError;
use crate::handlers::{json_body, path_param};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{FacultyService, ManufacturerService, PowerSpecService};
use crate::state::AppState;

fn require(value: &str, message: &'static str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(message));
    }
    Ok(())
}

// Faculties

pub async fn faculties_get(State(state): State<AppState>) -> ApiResult<Vec<Faculty>> {
    let faculties = FacultyService::new(state.db.clone()).list().await?;
    Ok(ApiResponse::success(faculties).with_message("Faculties retrieved successfully"))
}

pub async fn faculties_post(
    State(state): State<AppState>,
    payload: Result<Json<NewFaculty>, JsonRejection>,
) -> ApiResult<Faculty> {
    let faculty = json_body(payload)?;
    require(&faculty.faculty_code, "Faculty code is required")?;
    require(&faculty.faculty_name, "Faculty name is required")?;

    let created = FacultyService::new(state.db.clone()).create(&faculty).await?;
    Ok(ApiResponse::created(created).with_message("Faculty created successfully"))
}

pub async fn faculty_delete(State(state): State<AppState>, id: Result<Path<i32>, PathRejection>) -> ApiResult<Value> {
    FacultyService::new(state.db.clone()).delete(path_param(id)?).await?;
    Ok(ApiResponse::message_only("Faculty deleted successfully"))
}

// Manufacturers

pub async fn manufacturers_get(State(state): State<AppState>) -> ApiResult<Vec<Manufacturer>> {
    let manufacturers = ManufacturerService::new(state.db.clone()).list().await?;
    Ok(ApiResponse::success(manufacturers).with_message("Manufacturers retrieved successfully"))
}

pub async fn manufacturers_post(
    State(state): State<AppState>,
    payload: Result<Json<NewManufacturer>, JsonRejection>,
) -> ApiResult<Manufacturer> {
    let manufacturer = json_body(payload)?;
    require(&manufacturer.name, "Manufacturer name is required")?;

    let created = ManufacturerService::new(state.db.clone()).create(&manufacturer).await?;
    Ok(ApiResponse::created(created).with_message("Manufacturer created successfully"))
}

pub async fn manufacturer_delete(State(state): State<AppState>, id: Result<Path<i32>, PathRejection>) -> ApiResult<Value> {
    ManufacturerService::new(state.db.clone()).delete(path_param(id)?).await?;
    Ok(ApiResponse::message_only("Manufacturer deleted successfully"))
}

// Power specifications

pub async fn power_specs_get(State(state): State<AppState>) -> ApiResult<Vec<PowerSpec>> {
    let specs = PowerSpecService::new(state.db.clone()).list().await?;
    Ok(ApiResponse::success(specs).with_message("Power specifications retrieved successfully"))
}

pub async fn power_specs_post(
    State(state): State<AppState>,
    payload: Result<Json<NewPowerSpec>, JsonRejection>,
) -> ApiResult<PowerSpec> {
    let spec = json_body(payload)?;
    if !spec.has_valid_phase() {
        return Err(ApiError::bad_request("power_phase must be 'single' or 'three'"));
    }
    if spec.rated_voltage <= 0.0 || spec.rated_current <= 0.0 || spec.rated_power <= 0.0 {
        return Err(ApiError::bad_request("Rated voltage, current and power must be positive"));
    }

    let created = PowerSpecService::new(state.db.clone()).create(&spec).await?;
    Ok(ApiResponse::created(created).with_message("Power specification created successfully"))
}

pub async fn power_spec_delete(State(state): State<AppState>, id: Result<Path<i32>, PathRejection>) -> ApiResult<Value> {
    PowerSpecService::new(state.db.clone()).delete(path_param(id)?).await?;
    Ok(ApiResponse::message_only("Power specification deleted successfully"))
}
