pub mod reconcile_findings;

pub use reconcile_findings::ReconcileFindingsUseCase;
