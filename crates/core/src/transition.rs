//! Status transition tables.
//!
//! Each workflow resource declares which target statuses are reachable from
//! each source status. Transition handlers check the table before writing.

use crate::error::CoreError;

/// `(from, allowed targets)` pairs. Statuses absent from the table are terminal.
pub type TransitionTable = &'static [(&'static str, &'static [&'static str])];

/// Returns `true` if `from -> to` is listed in `table`.
pub fn is_allowed(table: TransitionTable, from: &str, to: &str) -> bool {
    table
        .iter()
        .find(|(source, _)| *source == from)
        .is_some_and(|(_, targets)| targets.contains(&to))
}

/// Check a transition, producing a [`CoreError::Conflict`] naming the entity
/// when it is not allowed.
pub fn ensure_allowed(
    entity: &str,
    table: TransitionTable,
    from: &str,
    to: &str,
) -> Result<(), CoreError> {
    if is_allowed(table, from, to) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "{entity} cannot move from '{from}' to '{to}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TABLE: TransitionTable = &[("pending", &["approved", "rejected"]), ("approved", &["done"])];

    #[test]
    fn listed_transitions_are_allowed() {
        assert!(is_allowed(TABLE, "pending", "approved"));
        assert!(is_allowed(TABLE, "approved", "done"));
    }

    #[test]
    fn terminal_status_has_no_exit() {
        assert!(!is_allowed(TABLE, "rejected", "pending"));
        assert_matches!(
            ensure_allowed("Leave request", TABLE, "rejected", "approved"),
            Err(CoreError::Conflict(msg)) if msg.contains("'rejected'")
        );
    }
}
