//! Lifecycle metrics.
//!
//! # Metrics
//! - `quantum_runs_total` (counter): runs that reached the running state
//! - `quantum_running` (gauge): 1 while a run is active, 0 otherwise
//! - `quantum_shutdowns_total` (counter): completed teardowns by `reason`
//! - `quantum_duplicate_listen_total` (counter): rejected concurrent `listen` calls
//! - `quantum_startup_failures_total` (counter): fatal startup failures by `stage`
//!
//! Only the `metrics` facade is used; installing a recorder/exporter is left
//! to the embedding application.

pub fn record_run_started() {
    ::metrics::counter!("quantum_runs_total").increment(1);
    ::metrics::gauge!("quantum_running").set(1.0);
}

pub fn record_run_stopped(reason: &'static str) {
    ::metrics::counter!("quantum_shutdowns_total", "reason" => reason).increment(1);
    ::metrics::gauge!("quantum_running").set(0.0);
}

pub fn record_duplicate_listen() {
    ::metrics::counter!("quantum_duplicate_listen_total").increment(1);
}

pub fn record_startup_failure(stage: &'static str) {
    ::metrics::counter!("quantum_startup_failures_total", "stage" => stage).increment(1);
}
