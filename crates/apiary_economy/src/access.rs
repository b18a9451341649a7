//! # Access Control
//!
//! The store asks an [`AccessControl`] implementation whether the caller
//! holds a role before every mutation. Embedders usually back this with
//! their own permission system; [`RoleRegistry`] is the in-memory one.
//!
//! | Operation                         | Required role        |
//! |-----------------------------------|----------------------|
//! | create apiary, set items, claim   | `Operator`           |
//! | add bees, add slots               | `Operator` or `Minter` |
//! | catalog setters                   | `Admin`              |

use std::collections::{HashMap, HashSet};

use apiary_shared::AccountId;
use parking_lot::RwLock;

use crate::error::{LandError, LandResult};

/// Permission role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Balance tables: bee profits, items, sets, mood recovery time.
    Admin,
    /// Trusted game server acting on behalf of players.
    Operator,
    /// Shop/mint flow that grants bees and slots.
    Minter,
}

/// Role lookup consumed by the store.
pub trait AccessControl: Send + Sync {
    /// True if `account` holds `role`.
    fn has_role(&self, role: Role, account: &AccountId) -> bool;
}

/// Rejects the caller unless it holds one of `roles`.
///
/// # Errors
///
/// Returns `LandError::Unauthorized` naming `action`.
pub fn require_any<A: AccessControl + ?Sized>(
    access: &A,
    caller: &AccountId,
    roles: &[Role],
    action: &'static str,
) -> LandResult<()> {
    if roles.iter().any(|&role| access.has_role(role, caller)) {
        Ok(())
    } else {
        tracing::warn!(caller = %caller, action, "Unauthorized call");
        Err(LandError::Unauthorized { caller: *caller, action })
    }
}

/// In-memory role table.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    members: RwLock<HashMap<Role, HashSet<AccountId>>>,
}

impl RoleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry where `admin` holds every role.
    #[must_use]
    pub fn with_admin(admin: AccountId) -> Self {
        let registry = Self::new();
        for role in [Role::Admin, Role::Operator, Role::Minter] {
            registry.grant(role, admin);
        }
        registry
    }

    /// Grants `role` to `account`. Returns false if it was already held.
    pub fn grant(&self, role: Role, account: AccountId) -> bool {
        let added = self.members.write().entry(role).or_default().insert(account);
        if added {
            tracing::info!(?role, account = %account, "Role granted");
        }
        added
    }

    /// Revokes `role` from `account`. Returns false if it was not held.
    pub fn revoke(&self, role: Role, account: &AccountId) -> bool {
        let removed = self
            .members
            .write()
            .get_mut(&role)
            .is_some_and(|set| set.remove(account));
        if removed {
            tracing::info!(?role, account = %account, "Role revoked");
        }
        removed
    }
}

impl AccessControl for RoleRegistry {
    fn has_role(&self, role: Role, account: &AccountId) -> bool {
        self.members
            .read()
            .get(&role)
            .is_some_and(|set| set.contains(account))
    }
}
