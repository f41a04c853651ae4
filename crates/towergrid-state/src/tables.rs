//! redb table definitions for the policy state store.
//!
//! Values are JSON-serialized [`PolicyState`](crate::PolicyState) records.

use redb::TableDefinition;

/// Policy state keyed by numeric tower id.
pub const POLICY_STATES: TableDefinition<u32, &[u8]> = TableDefinition::new("policy_states");
