//! Action and prerequisite operations.
//!
//! Actions are the ordered steps of a strategy; each action may require
//! other strategies of the same domain as prerequisites.

use crate::db::Connection;
use crate::domain::model::{Action, PrerequisiteRef};
use crate::error::{Error, Result};

/// Add an action to a strategy with the next free ordinal.
pub fn add_action(conn: &mut Connection, strategy_id: i64, description: String) -> Result<Action> {
    let ordinal: i64 = conn.query_row(
        "SELECT COALESCE(MAX(ordinal), 0) + 1 FROM actions WHERE strategy_id = ?",
        &[&strategy_id as &dyn rusqlite::ToSql],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT INTO actions (strategy_id, ordinal, description) VALUES (?, ?, ?)",
        &[
            &strategy_id as &dyn rusqlite::ToSql,
            &ordinal as &dyn rusqlite::ToSql,
            &description as &dyn rusqlite::ToSql,
        ],
    )?;

    get_action(conn, strategy_id, ordinal)
}

/// Get an action by its ordinal within a strategy.
pub fn get_action(conn: &mut Connection, strategy_id: i64, ordinal: i64) -> Result<Action> {
    conn.query_row(
        "SELECT * FROM actions WHERE strategy_id = ? AND ordinal = ?",
        &[
            &strategy_id as &dyn rusqlite::ToSql,
            &ordinal as &dyn rusqlite::ToSql,
        ],
        Action::from_row,
    )
    .map_err(|_| Error::ActionNotFound(ordinal))
}

/// List the actions of a strategy in ordinal order.
pub fn list_actions(conn: &mut Connection, strategy_id: i64) -> Result<Vec<Action>> {
    conn.query(
        "SELECT * FROM actions WHERE strategy_id = ? ORDER BY ordinal",
        &[&strategy_id as &dyn rusqlite::ToSql],
        Action::from_row,
    )
}

/// Replace the description of an action.
pub fn update_action(
    conn: &mut Connection,
    strategy_id: i64,
    ordinal: i64,
    description: String,
) -> Result<Action> {
    let action = get_action(conn, strategy_id, ordinal)?;
    conn.execute(
        "UPDATE actions SET description = ? WHERE id = ?",
        &[
            &description as &dyn rusqlite::ToSql,
            &action.id as &dyn rusqlite::ToSql,
        ],
    )?;
    get_action(conn, strategy_id, ordinal)
}

/// Remove an action (and, via cascade, its prerequisite links).
pub fn remove_action(conn: &mut Connection, strategy_id: i64, ordinal: i64) -> Result<()> {
    let action = get_action(conn, strategy_id, ordinal)?;
    conn.execute(
        "DELETE FROM actions WHERE id = ?",
        &[&action.id as &dyn rusqlite::ToSql],
    )?;
    Ok(())
}

/// Link a prerequisite strategy to an action.
pub fn add_prerequisite(conn: &mut Connection, action_id: i64, strategy_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO prerequisites (action_id, strategy_id) VALUES (?, ?)",
        &[
            &action_id as &dyn rusqlite::ToSql,
            &strategy_id as &dyn rusqlite::ToSql,
        ],
    )?;
    Ok(())
}

/// Check whether an action already requires a strategy.
pub fn has_prerequisite(conn: &mut Connection, action_id: i64, strategy_id: i64) -> Result<bool> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT action_id FROM prerequisites WHERE action_id = ? AND strategy_id = ?",
            &[
                &action_id as &dyn rusqlite::ToSql,
                &strategy_id as &dyn rusqlite::ToSql,
            ],
            |row| row.get(0),
        )
        .ok();
    Ok(existing.is_some())
}

/// Unlink a prerequisite strategy from an action. Removing a link that
/// does not exist is a no-op.
pub fn remove_prerequisite(conn: &mut Connection, action_id: i64, strategy_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM prerequisites WHERE action_id = ? AND strategy_id = ?",
        &[
            &action_id as &dyn rusqlite::ToSql,
            &strategy_id as &dyn rusqlite::ToSql,
        ],
    )?;
    Ok(())
}

/// List the prerequisites of an action as code paths within its domain,
/// in (skill code, strategy code) order.
pub fn list_prerequisites(conn: &mut Connection, action_id: i64) -> Result<Vec<PrerequisiteRef>> {
    conn.query(
        "SELECT sk.code AS skill_code, st.code AS strategy_code, st.name AS strategy_name
         FROM prerequisites p
         JOIN strategies st ON st.id = p.strategy_id
         JOIN skills sk ON sk.id = st.skill_id
         WHERE p.action_id = ?
         ORDER BY sk.code, st.code",
        &[&action_id as &dyn rusqlite::ToSql],
        PrerequisiteRef::from_row,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Schema;

    /// Seed one domain / skill / strategy and return the strategy id.
    fn setup_db() -> (Connection, i64) {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();

        conn.execute(
            "INSERT INTO domains (code, name) VALUES (1, 'Math')",
            &[],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO skills (domain_id, code, name) VALUES (1, 1, 'Algebra')",
            &[],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO strategies (skill_id, code, name) VALUES (1, 1, 'Factoring')",
            &[],
        )
        .unwrap();

        (conn, 1)
    }

    #[test]
    fn test_add_action_assigns_ordinals() {
        let (mut conn, strategy_id) = setup_db();

        let a1 = add_action(&mut conn, strategy_id, "first".to_string()).unwrap();
        let a2 = add_action(&mut conn, strategy_id, "second".to_string()).unwrap();

        assert_eq!(a1.ordinal, 1);
        assert_eq!(a2.ordinal, 2);
    }

    #[test]
    fn test_get_action_not_found() {
        let (mut conn, strategy_id) = setup_db();

        let result = get_action(&mut conn, strategy_id, 5);
        assert!(matches!(result, Err(Error::ActionNotFound(5))));
    }

    #[test]
    fn test_update_action() {
        let (mut conn, strategy_id) = setup_db();

        add_action(&mut conn, strategy_id, "draft".to_string()).unwrap();
        let updated = update_action(&mut conn, strategy_id, 1, "final".to_string()).unwrap();
        assert_eq!(updated.description, "final");
    }

    #[test]
    fn test_remove_action_keeps_other_ordinals() {
        let (mut conn, strategy_id) = setup_db();

        add_action(&mut conn, strategy_id, "first".to_string()).unwrap();
        add_action(&mut conn, strategy_id, "second".to_string()).unwrap();

        remove_action(&mut conn, strategy_id, 1).unwrap();

        let remaining = list_actions(&mut conn, strategy_id).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].ordinal, 2);
    }

    #[test]
    fn test_prerequisites_roundtrip() {
        let (mut conn, strategy_id) = setup_db();

        conn.execute(
            "INSERT INTO strategies (skill_id, code, name) VALUES (1, 2, 'Graphing')",
            &[],
        )
        .unwrap();

        let action = add_action(&mut conn, strategy_id, "solve".to_string()).unwrap();
        assert!(!has_prerequisite(&mut conn, action.id, 2).unwrap());

        add_prerequisite(&mut conn, action.id, 2).unwrap();
        assert!(has_prerequisite(&mut conn, action.id, 2).unwrap());

        let prereqs = list_prerequisites(&mut conn, action.id).unwrap();
        assert_eq!(prereqs.len(), 1);
        assert_eq!(prereqs[0].skill_code, 1);
        assert_eq!(prereqs[0].strategy_code, 2);
        assert_eq!(prereqs[0].strategy_name, "Graphing");

        remove_prerequisite(&mut conn, action.id, 2).unwrap();
        assert!(list_prerequisites(&mut conn, action.id).unwrap().is_empty());
    }

    #[test]
    fn test_remove_missing_prerequisite_is_noop() {
        let (mut conn, strategy_id) = setup_db();
        let action = add_action(&mut conn, strategy_id, "solve".to_string()).unwrap();

        remove_prerequisite(&mut conn, action.id, 99).unwrap();
    }
}
