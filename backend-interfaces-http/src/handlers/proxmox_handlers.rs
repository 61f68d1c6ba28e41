use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use backend_application::queries::proxmox_queries;
use backend_application::AppState;
use backend_domain::{VmInventory, VmQuery};

use crate::error::HttpError;

#[derive(Serialize)]
pub struct VmStatusList {
    pub status_list: VmInventory,
}

pub async fn vm_status_list(State(state): State<AppState>) -> Result<Json<VmStatusList>, HttpError> {
    let status_list = proxmox_queries::all_vm_status(&state).await?;
    Ok(Json(VmStatusList { status_list }))
}

pub async fn vm_status(
    State(state): State<AppState>,
    Query(query): Query<VmQuery>,
) -> Result<Json<Value>, HttpError> {
    let vmid = required_vmid(query)?;
    let status = proxmox_queries::vm_status(&state, &vmid).await?;
    Ok(Json(json!({ "status": status })))
}

pub async fn vm_detailed_status(
    State(state): State<AppState>,
    Query(query): Query<VmQuery>,
) -> Result<Json<Value>, HttpError> {
    let vmid = required_vmid(query)?;
    let status = match proxmox_queries::vm_detail(&state, &vmid).await? {
        Some(vm) => Value::Object(vm),
        None => Value::String(String::new()),
    };
    Ok(Json(json!({ "status": status })))
}

fn required_vmid(query: VmQuery) -> Result<String, HttpError> {
    query
        .vmid
        .map(|vmid| vmid.trim().to_string())
        .filter(|vmid| !vmid.is_empty())
        .ok_or_else(|| HttpError::BadRequest("vmid is required".to_string()))
}
