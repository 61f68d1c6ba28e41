use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    reconcile_runs: AtomicU64,
    reconcile_errors: AtomicU64,
    dns_updates: AtomicU64,
    dns_update_errors: AtomicU64,
    playtime_ticks: AtomicU64,
    playtime_errors: AtomicU64,
}

impl Metrics {
    pub fn record_reconcile(&self) {
        self.reconcile_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reconcile_error(&self) {
        self.reconcile_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dns_update(&self) {
        self.dns_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dns_update_error(&self) {
        self.dns_update_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_playtime_tick(&self) {
        self.playtime_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_playtime_errors(&self, count: usize) {
        self.playtime_errors.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let reconcile_runs = self.reconcile_runs.load(Ordering::Relaxed);
        let reconcile_errors = self.reconcile_errors.load(Ordering::Relaxed);
        let dns_updates = self.dns_updates.load(Ordering::Relaxed);
        let dns_update_errors = self.dns_update_errors.load(Ordering::Relaxed);
        let playtime_ticks = self.playtime_ticks.load(Ordering::Relaxed);
        let playtime_errors = self.playtime_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE site_reconcile_runs_total counter\n\
site_reconcile_runs_total {}\n\
# TYPE site_reconcile_errors_total counter\n\
site_reconcile_errors_total {}\n\
# TYPE site_dns_updates_total counter\n\
site_dns_updates_total {}\n\
# TYPE site_dns_update_errors_total counter\n\
site_dns_update_errors_total {}\n\
# TYPE site_playtime_ticks_total counter\n\
site_playtime_ticks_total {}\n\
# TYPE site_playtime_errors_total counter\n\
site_playtime_errors_total {}\n",
            reconcile_runs,
            reconcile_errors,
            dns_updates,
            dns_update_errors,
            playtime_ticks,
            playtime_errors
        )
    }
}
