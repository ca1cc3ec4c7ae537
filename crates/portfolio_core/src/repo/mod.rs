//! Project store contract and its implementations.
//!
//! # Responsibility
//! - Define the backend-agnostic `ProjectStore` contract.
//! - Provide in-memory and SQLite implementations.
//!
//! # Invariants
//! - Stores are the only writers of `id`, `created_at` and `updated_at`.
//! - Missing ids surface as `StoreError::NotFound`, never as a panic.

pub mod project_store;
pub mod sqlite_store;
