//! Contrôle de propriété : seul le propriétaire modifie sa playlist.

use crate::error::{Error, Result};
use uuid::Uuid;

/// Compare le propriétaire et l'appelant sans tenir compte de la casse
pub fn is_owner(owner: &str, caller: &str) -> bool {
    owner.to_lowercase() == caller.to_lowercase()
}

/// Refuse un appelant anonyme ou qui n'est pas le propriétaire
pub fn authorize(playlist_id: Uuid, owner: &str, caller: Option<&str>) -> Result<()> {
    let caller = caller.ok_or(Error::Unauthenticated)?;
    if is_owner(owner, caller) {
        Ok(())
    } else {
        Err(Error::Forbidden {
            playlist_id,
            caller: caller.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_comparison_ignores_case() {
        assert!(is_owner("alice", "ALICE"));
        assert!(is_owner("Alice", "alice"));
        assert!(!is_owner("alice", "bob"));
        assert!(!is_owner("alice", "alice2"));
    }

    #[test]
    fn test_authorize() {
        let id = Uuid::new_v4();
        assert!(authorize(id, "alice", Some("Alice")).is_ok());
        assert!(matches!(
            authorize(id, "alice", None),
            Err(Error::Unauthenticated)
        ));
        assert!(matches!(
            authorize(id, "alice", Some("bob")),
            Err(Error::Forbidden { caller, .. }) if caller == "bob"
        ));
    }
}
