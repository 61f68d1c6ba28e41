use chrono::Utc;

use crate::{AppError, AppState};
use backend_domain::{find_drift, ReconcileReport};

/// One reconciliation cycle: fetch the public IP, compare it against every
/// A record, patch the ones that drifted and append an audit row.
///
/// Every failure is written to the journal before it is returned, so the
/// background job can drop the error.
pub async fn reconcile_public_ip(state: &AppState) -> Result<ReconcileReport, AppError> {
    let ip = match state.ip_source.current_ip().await {
        Ok(ip) => ip,
        Err(err) => {
            state.metrics.record_reconcile_error();
            state
                .journal
                .error(format!("Error fetching current public IP: {:#}", err))
                .await;
            return Err(AppError::Internal(err));
        }
    };

    let records = match state.dns_provider.list_a_records().await {
        Ok(records) => records,
        Err(err) => {
            state.metrics.record_reconcile_error();
            state
                .journal
                .error(format!("Error listing DNS records: {:#}", err))
                .await;
            return Err(AppError::Internal(err));
        }
    };
    state.metrics.record_reconcile();

    let mut report = ReconcileReport {
        public_ip: ip.clone(),
        records_checked: records.len(),
        ..ReconcileReport::default()
    };

    for record in find_drift(&records, &ip) {
        report.drifted.push(record.name.clone());
        state
            .journal
            .warn(format!(
                "DNS record {} has IP {}, expected {}",
                record.name, record.content, ip
            ))
            .await;
        match state.dns_provider.update_record(record, &ip).await {
            Ok(()) => {
                state.metrics.record_dns_update();
                report.updated.push(record.name.clone());
                state
                    .journal
                    .info(format!("Updated DNS record {} to IP {}", record.name, ip))
                    .await;
            }
            Err(err) => {
                state.metrics.record_dns_update_error();
                report.failed.push(record.name.clone());
                state
                    .journal
                    .error(format!("Failed to update DNS record {}: {:#}", record.name, err))
                    .await;
            }
        }
    }

    append_audit_row(state, &ip).await?;
    report.audit_recorded = true;
    Ok(report)
}

async fn append_audit_row(state: &AppState, ip: &str) -> Result<(), AppError> {
    let _guard = state.ip_audit_lock.lock().await;
    let last_known = match state.public_ip_repo.last_known_ip().await {
        Ok(last) => last,
        Err(err) => {
            state
                .journal
                .error(format!("Error fetching last public IP record: {:#}", err))
                .await;
            return Err(AppError::Internal(err));
        }
    };
    if let Err(err) = state
        .public_ip_repo
        .insert_record(ip, last_known.as_deref(), Utc::now())
        .await
    {
        state
            .journal
            .error(format!("Error inserting new public IP record: {:#}", err))
            .await;
        return Err(AppError::Internal(err));
    }
    Ok(())
}
