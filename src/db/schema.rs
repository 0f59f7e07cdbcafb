//! Database schema management.

use crate::db::Connection as DbConnection;
use crate::error::Result;

/// Schema version and management.
pub struct Schema;

impl Schema {
    /// Current schema version.
    pub const VERSION: i32 = 1;

    /// Initialize the database schema.
    ///
    /// Creates all tables and indexes for both the instructional-design
    /// hierarchy and the graph editor. Returns an error if the database
    /// is already initialized.
    pub fn init(conn: &mut DbConnection) -> Result<()> {
        {
            let mut check = conn
                .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='domains'")?;
            let exists = check.exists(())?;
            drop(check);

            if exists {
                return Err(crate::error::Error::AlreadyInitialized);
            }
        }

        conn.execute_pragma("PRAGMA foreign_keys = ON", &[])?;
        conn.execute_pragma("PRAGMA journal_mode = WAL", &[])?;

        // Instructional-design hierarchy: Domain -> Skill -> Strategy -> Action.
        conn.execute(
            "CREATE TABLE domains (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now'))
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE skills (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                domain_id INTEGER NOT NULL,
                code INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                UNIQUE (domain_id, code),
                FOREIGN KEY (domain_id) REFERENCES domains(id) ON DELETE CASCADE
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE strategies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                skill_id INTEGER NOT NULL,
                code INTEGER NOT NULL,
                name TEXT NOT NULL,
                problem_formulation TEXT,
                UNIQUE (skill_id, code),
                FOREIGN KEY (skill_id) REFERENCES skills(id) ON DELETE CASCADE
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE actions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                strategy_id INTEGER NOT NULL,
                ordinal INTEGER NOT NULL,
                description TEXT NOT NULL,
                FOREIGN KEY (strategy_id) REFERENCES strategies(id) ON DELETE CASCADE
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE prerequisites (
                action_id INTEGER NOT NULL,
                strategy_id INTEGER NOT NULL,
                PRIMARY KEY (action_id, strategy_id),
                FOREIGN KEY (action_id) REFERENCES actions(id) ON DELETE CASCADE,
                FOREIGN KEY (strategy_id) REFERENCES strategies(id) ON DELETE CASCADE
            )",
            &[],
        )?;

        // Graph editor: Graph -> Vertex -> Edge. The vid is the user-visible
        // per-graph vertex identifier, distinct from the storage id.
        conn.execute(
            "CREATE TABLE graphs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now'))
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE vertices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                graph_id INTEGER NOT NULL,
                vid INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                UNIQUE (graph_id, vid),
                FOREIGN KEY (graph_id) REFERENCES graphs(id) ON DELETE CASCADE
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE edges (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_id INTEGER NOT NULL,
                target_id INTEGER NOT NULL,
                description TEXT,
                FOREIGN KEY (source_id) REFERENCES vertices(id) ON DELETE CASCADE,
                FOREIGN KEY (target_id) REFERENCES vertices(id) ON DELETE CASCADE
            )",
            &[],
        )?;

        conn.execute("CREATE INDEX idx_skills_domain_id ON skills(domain_id)", &[])?;
        conn.execute(
            "CREATE INDEX idx_strategies_skill_id ON strategies(skill_id)",
            &[],
        )?;
        conn.execute(
            "CREATE INDEX idx_actions_strategy_id ON actions(strategy_id)",
            &[],
        )?;
        conn.execute(
            "CREATE INDEX idx_prerequisites_strategy_id ON prerequisites(strategy_id)",
            &[],
        )?;
        conn.execute(
            "CREATE INDEX idx_vertices_graph_vid ON vertices(graph_id, vid)",
            &[],
        )?;
        conn.execute("CREATE INDEX idx_edges_source_id ON edges(source_id)", &[])?;
        conn.execute("CREATE INDEX idx_edges_target_id ON edges(target_id)", &[])?;

        conn.execute_pragma(&format!("PRAGMA user_version = {}", Self::VERSION), &[])?;

        Ok(())
    }

    /// Check if the database schema is already initialized.
    pub fn is_initialized(conn: &mut DbConnection) -> bool {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='domains'")
            .and_then(|mut stmt| Ok(stmt.exists(())?))
            .unwrap_or(false)
    }
}
