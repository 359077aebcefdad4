/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with the two external services: the source-of-truth
/// scanning service and the downstream findings aggregator.
pub mod detail_repository;
pub mod finding_store;

pub use detail_repository::{DetailBatch, DetailError, DetailRepository};
pub use finding_store::{FindingIdentifier, FindingStore, RejectedUpdate, UpdateReceipt};
