//! # Status Reporting Tests
//!
//! Verifies the Ready condition shape and the requeue policy: 5 minutes
//! after success, 1 minute after failure.

use kube_runtime::controller::Action;
use pg_operator::k8s::status::{ready_condition, requeue_after};
use std::time::Duration;

#[test]
fn ready_yields_five_minute_requeue() {
    assert_eq!(
        requeue_after(true),
        Action::requeue(Duration::from_secs(300))
    );
}

#[test]
fn not_ready_yields_one_minute_requeue() {
    assert_eq!(
        requeue_after(false),
        Action::requeue(Duration::from_secs(60))
    );
}

#[test]
fn ready_condition_is_true_with_success_reason() {
    let condition = ready_condition(true, "Database and users ready");
    assert_eq!(condition.r#type, "Ready");
    assert_eq!(condition.status, "True");
    assert_eq!(condition.reason, "ReconciliationSucceeded");
    assert_eq!(condition.message, "Database and users ready");
    assert!(!condition.last_transition_time.is_empty());
}

#[test]
fn failed_condition_is_false_with_failure_reason() {
    let condition = ready_condition(false, "failed to connect to postgres: timeout");
    assert_eq!(condition.status, "False");
    assert_eq!(condition.reason, "ReconciliationFailed");
    assert_eq!(condition.message, "failed to connect to postgres: timeout");
}
