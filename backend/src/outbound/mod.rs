//! Outbound adapters implementing domain ports for infrastructure.
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic; in particular the
//! two-step aggregate protocols live in the domain services, and each
//! repository method here is a single atomic operation on one record.

pub mod persistence;
