/// Reconciliation domain layer - Pure business logic
///
/// Everything in this module is free of I/O: event-shape traversal,
/// reference extraction, and the derived field computation that forms
/// the unit of comparison for the idempotent update protocol.
pub mod domain;
