//! Core business logic, independent of the HTTP layer.

/// Catalog store and id-keyed reference lookups
pub mod catalog;
/// Read projections over transactions
pub mod listing;
/// Cash payment transition
pub mod payment;
/// Order price computation
pub mod pricing;
/// Transaction lifecycle: create, edit, bulk status update, delete
pub mod transaction;
/// User directory
pub mod user;
