//! Domain model for the portfolio backoffice.
//!
//! # Responsibility
//! - Define canonical data structures shared by stores, services and forms.
//!
//! # Invariants
//! - Every project is identified by a store-assigned `ProjectId`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod project;
