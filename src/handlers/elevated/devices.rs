// handlers/elevated/devices.rs - device registry and snapshot writes

use axum::extract::{rejection::JsonRejection, Json, Path, State};
use serde_json::Value;

use crate::database::models::{Device, DeviceData, DeviceUpdate, NewDevice, NewDeviceData};
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::DeviceService;
use crate::state::AppState;

/// POST /api/admin/devices
pub async fn device_post(
    State(state): State<AppState>,
    payload: Result<Json<NewDevice>, JsonRejection>,
) -> ApiResult<Device> {
    let device = json_body(payload)?;
    if device.device_id.trim().is_empty() || device.device_name.trim().is_empty() {
        return Err(ApiError::bad_request("Device ID and device name are required"));
    }

    let created = DeviceService::new(state.db.clone()).create(&device).await?;
    Ok(ApiResponse::created(created).with_message("Device created successfully"))
}

/// PUT /api/admin/devices/:device_id
pub async fn device_put(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    payload: Result<Json<DeviceUpdate>, JsonRejection>,
) -> ApiResult<Device> {
    let update = json_body(payload)?;
    if update.device_name.trim().is_empty() {
        return Err(ApiError::bad_request("Device name is required"));
    }

    let updated = DeviceService::new(state.db.clone()).update(&device_id, &update).await?;
    Ok(ApiResponse::success(updated).with_message("Device updated successfully"))
}

/// DELETE /api/admin/devices/:device_id
pub async fn device_delete(State(state): State<AppState>, Path(device_id): Path<String>) -> ApiResult<Value> {
    DeviceService::new(state.db.clone()).delete(&device_id).await?;
    Ok(ApiResponse::message_only("Device deleted successfully"))
}

/// PUT /api/admin/devices/:device_id/data - replace the stored snapshot
pub async fn device_data_put(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    payload: Result<Json<NewDeviceData>, JsonRejection>,
) -> ApiResult<DeviceData> {
    let data = json_body(payload)?;
    if !data.has_valid_network_status() {
        return Err(ApiError::bad_request("network_status must be 'online', 'offline' or 'error'"));
    }

    let stored = DeviceService::new(state.db.clone()).upsert_data(&device_id, &data).await?;
    Ok(ApiResponse::success(stored).with_message("Device data updated successfully"))
}
