//! Channel roster types: participants and their roles.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Channel privileges a participant can hold.
///
/// Owners and admins (`~` / `&` prefixes on networks that have them) are
/// folded into `Operator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Operator,
    HalfOperator,
    Voiced,
}

/// Set of roles held by one participant. Empty means a plain member.
pub type RoleSet = BTreeSet<Role>;

/// A nick present in the channel together with its roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub nick: String,
    #[serde(default)]
    pub roles: RoleSet,
}
