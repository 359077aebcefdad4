pub mod reconcile_report;
pub mod reconcile_request;

pub use reconcile_report::{ReconcileOutcome, ReconcileReport, ReferenceOutcome};
pub use reconcile_request::ReconcileRequest;
