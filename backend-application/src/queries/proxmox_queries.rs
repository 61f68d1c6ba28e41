use tracing::warn;

use crate::{AppError, AppState};
use backend_domain::{vm_matches, HypervisorError, VmInfo, VmInventory};

pub const VM_NOT_FOUND: &str = "VM not found";

pub async fn all_vm_status(state: &AppState) -> Result<VmInventory, AppError> {
    state.hypervisor.vm_inventory().await.map_err(map_hypervisor_error)
}

/// The `status` field of the VM with `vmid`, or `VM not found`.
pub async fn vm_status(state: &AppState, vmid: &str) -> Result<String, AppError> {
    let status = vm_detail(state, vmid)
        .await?
        .and_then(|vm| vm.get("status").and_then(|value| value.as_str().map(str::to_string)));
    Ok(status.unwrap_or_else(|| VM_NOT_FOUND.to_string()))
}

pub async fn vm_detail(state: &AppState, vmid: &str) -> Result<Option<VmInfo>, AppError> {
    let inventory = all_vm_status(state).await?;
    Ok(inventory
        .into_values()
        .flatten()
        .find(|vm| vm_matches(vm, vmid)))
}

fn map_hypervisor_error(err: HypervisorError) -> AppError {
    match err {
        HypervisorError::Unauthorized(inner) => {
            warn!("hypervisor login rejected: {:#}", inner);
            AppError::Unauthorized
        }
        HypervisorError::Unavailable(inner) => AppError::Internal(inner),
    }
}
