//! towergrid-state — per-tower policy state storage.
//!
//! The policy engine never touches a global map. It is handed a
//! [`PolicyStore`] and performs every read-modify-write through
//! [`PolicyStore::update`], which is atomic per tower id.
//!
//! # Backends
//!
//! - [`MemoryPolicyStore`] — `DashMap` shards, each behind its own lock.
//!   Updates for the same tower serialize on the shard lock; updates for
//!   towers on different shards run in parallel.
//! - [`RedbPolicyStore`] — persistent (or in-memory) redb database. redb
//!   serializes write transactions, and each update is one transaction.
//!
//! Both are `Clone` + `Send` + `Sync` and can be shared across tasks.

pub mod error;
pub mod memory;
pub mod redb_store;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use memory::MemoryPolicyStore;
pub use redb_store::RedbPolicyStore;
pub use store::PolicyStore;
pub use types::{PolicyDecision, PolicyState};
