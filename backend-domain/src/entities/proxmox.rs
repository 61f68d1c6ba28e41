// Proxmox VE inventory entities

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// One VM as reported by `/nodes/{node}/qemu`; kept as raw JSON since the
/// field set varies between Proxmox releases.
pub type VmInfo = serde_json::Map<String, serde_json::Value>;

/// VMs grouped by node name.
pub type VmInventory = BTreeMap<String, Vec<VmInfo>>;

#[derive(Debug, Default, Deserialize)]
pub struct VmQuery {
    pub vmid: Option<String>,
}

#[derive(Debug, Error)]
pub enum HypervisorError {
    #[error("hypervisor login failed: {0}")]
    Unauthorized(anyhow::Error),
    #[error("hypervisor unavailable: {0}")]
    Unavailable(anyhow::Error),
}

pub fn vm_matches(vm: &VmInfo, vmid: &str) -> bool {
    let wanted = vmid.trim();
    match vm.get("vmid") {
        Some(serde_json::Value::Number(number)) => number.to_string() == wanted,
        Some(serde_json::Value::String(text)) => text.trim() == wanted,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vm(value: serde_json::Value) -> VmInfo {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn vm_matches_numeric_and_string_ids() {
        assert!(vm_matches(&vm(json!({"vmid": 101, "status": "running"})), "101"));
        assert!(vm_matches(&vm(json!({"vmid": "102"})), " 102 "));
        assert!(!vm_matches(&vm(json!({"vmid": 101})), "10"));
        assert!(!vm_matches(&vm(json!({"name": "no-id"})), "101"));
    }
}
