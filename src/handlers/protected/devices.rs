// handlers/protected/devices.rs - device views for signed-in users

use axum::extract::{Path, State};

use crate::database::models::DeviceData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::device_service::{DataByFaculty, DeviceDetail, DeviceList};
use crate::services::DeviceService;
use crate::state::AppState;

/// GET /api/devices - every device with reference names, latest readings and stats
pub async fn devices_get(State(state): State<AppState>) -> ApiResult<DeviceList> {
    let list = DeviceService::new(state.db.clone()).list().await?;
    tracing::debug!("Listed {} devices", list.devices.len());
    Ok(ApiResponse::success(list).with_message("Devices retrieved successfully"))
}

/// GET /api/devices/:device_id
pub async fn device_get(State(state): State<AppState>, Path(device_id): Path<String>) -> ApiResult<DeviceDetail> {
    let detail = DeviceService::new(state.db.clone()).get(&device_id).await?;
    Ok(ApiResponse::success(detail).with_message("Device details retrieved successfully"))
}

/**
 * GET /api/devices/:device_id/history
 *
 * Only the latest snapshot is stored. A device that never reported (or an
 * unknown id) is not an error: `{ success: true, data: null }`.
 */
pub async fn device_history_get(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> ApiResult<Option<DeviceData>> {
    let latest = DeviceService::new(state.db.clone()).latest_data(&device_id).await?;

    let message = if latest.is_some() {
        "Current device data retrieved successfully"
    } else {
        "No data found for this device"
    };
    Ok(ApiResponse::success(latest).with_message(message))
}

/// GET /api/devices/data - latest readings grouped by faculty
pub async fn device_data_get(State(state): State<AppState>) -> ApiResult<DataByFaculty> {
    let grouped = DeviceService::new(state.db.clone()).data_by_faculty().await?;
    Ok(ApiResponse::success(grouped).with_message("Device data retrieved successfully"))
}
