//! Domain repository - high-level operations on the instructional-design
//! hierarchy.
//!
//! Every entity below a domain is addressed by its code path (for example
//! strategy `1.2.3` is domain 1, skill 2, strategy 3), never by storage id.

use crate::db::Connection;
use crate::domain::action;
use crate::domain::model::{Action, Domain, PrerequisiteRef, Skill, Strategy};
use crate::error::{Error, Result};

/// Name given to the code-0 skill inserted with every new domain.
pub const PLACEHOLDER_SKILL: &str = "placeholder";

/// Repository over the Domain -> Skill -> Strategy -> Action hierarchy.
pub struct DomainRepository {
    conn: Connection,
}

impl DomainRepository {
    /// Open a repository over the default database file.
    pub fn open() -> Result<Self> {
        let conn = Connection::open_default()?;
        Ok(Self { conn })
    }

    /// Open an in-memory repository for testing.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Get the underlying connection.
    pub fn conn(&mut self) -> &mut Connection {
        &mut self.conn
    }

    // --- domains ---

    /// Create a new domain with the next free code.
    ///
    /// Also inserts the code-0 placeholder skill that anchors the
    /// per-domain skill numbering.
    pub fn create_domain(&mut self, name: String, description: Option<String>) -> Result<Domain> {
        if self.domain_name_exists(&name)? {
            return Err(Error::DomainNameTaken(name));
        }

        let code: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(code), 0) + 1 FROM domains",
            &[],
            |row| row.get(0),
        )?;

        // The domain and its placeholder skill land together or not at all.
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO domains (code, name, description) VALUES (?, ?, ?)",
            rusqlite::params![code, name, description],
        )?;
        let domain_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO skills (domain_id, code, name) VALUES (?, 0, ?)",
            rusqlite::params![domain_id, PLACEHOLDER_SKILL],
        )?;
        tx.commit()?;

        self.get_domain(code)
    }

    /// Get a domain by code.
    pub fn get_domain(&mut self, code: i64) -> Result<Domain> {
        self.conn
            .query_row(
                "SELECT * FROM domains WHERE code = ?",
                &[&code as &dyn rusqlite::ToSql],
                Domain::from_row,
            )
            .map_err(|_| Error::DomainNotFound(code))
    }

    /// List all domains in code order.
    pub fn list_domains(&mut self) -> Result<Vec<Domain>> {
        self.conn
            .query("SELECT * FROM domains ORDER BY code", &[], Domain::from_row)
    }

    /// Update a domain's name and/or description.
    pub fn update_domain(
        &mut self,
        code: i64,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Domain> {
        let domain = self.get_domain(code)?;

        if let Some(n) = name {
            if n != domain.name && self.domain_name_exists(&n)? {
                return Err(Error::DomainNameTaken(n));
            }
            self.conn.execute(
                "UPDATE domains SET name = ? WHERE id = ?",
                &[&n as &dyn rusqlite::ToSql, &domain.id as &dyn rusqlite::ToSql],
            )?;
        }
        if description.is_some() {
            self.conn.execute(
                "UPDATE domains SET description = ? WHERE id = ?",
                &[
                    &description as &dyn rusqlite::ToSql,
                    &domain.id as &dyn rusqlite::ToSql,
                ],
            )?;
        }

        self.get_domain(code)
    }

    fn domain_name_exists(&mut self, name: &str) -> Result<bool> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM domains WHERE name = ?",
                &[&name as &dyn rusqlite::ToSql],
                |row| row.get(0),
            )
            .ok();
        Ok(existing.is_some())
    }

    // --- skills ---

    /// Create a skill in a domain with the next free code.
    pub fn create_skill(
        &mut self,
        domain_code: i64,
        name: String,
        description: Option<String>,
    ) -> Result<Skill> {
        let domain = self.get_domain(domain_code)?;

        let code: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(code), 0) + 1 FROM skills WHERE domain_id = ?",
            &[&domain.id as &dyn rusqlite::ToSql],
            |row| row.get(0),
        )?;

        self.conn.execute(
            "INSERT INTO skills (domain_id, code, name, description) VALUES (?, ?, ?, ?)",
            &[
                &domain.id as &dyn rusqlite::ToSql,
                &code as &dyn rusqlite::ToSql,
                &name as &dyn rusqlite::ToSql,
                &description as &dyn rusqlite::ToSql,
            ],
        )?;

        self.get_skill(domain_code, code)
    }

    /// Get a skill by its code within a domain.
    pub fn get_skill(&mut self, domain_code: i64, skill_code: i64) -> Result<Skill> {
        let domain = self.get_domain(domain_code)?;
        self.conn
            .query_row(
                "SELECT * FROM skills WHERE domain_id = ? AND code = ?",
                &[
                    &domain.id as &dyn rusqlite::ToSql,
                    &skill_code as &dyn rusqlite::ToSql,
                ],
                Skill::from_row,
            )
            .map_err(|_| Error::SkillNotFound(domain_code, skill_code))
    }

    /// List the skills of a domain in code order.
    pub fn list_skills(&mut self, domain_code: i64) -> Result<Vec<Skill>> {
        let domain = self.get_domain(domain_code)?;
        self.conn.query(
            "SELECT * FROM skills WHERE domain_id = ? ORDER BY code",
            &[&domain.id as &dyn rusqlite::ToSql],
            Skill::from_row,
        )
    }

    /// Update a skill's name and/or description.
    pub fn update_skill(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Skill> {
        let skill = self.get_skill(domain_code, skill_code)?;

        if let Some(n) = name {
            self.conn.execute(
                "UPDATE skills SET name = ? WHERE id = ?",
                &[&n as &dyn rusqlite::ToSql, &skill.id as &dyn rusqlite::ToSql],
            )?;
        }
        if description.is_some() {
            self.conn.execute(
                "UPDATE skills SET description = ? WHERE id = ?",
                &[
                    &description as &dyn rusqlite::ToSql,
                    &skill.id as &dyn rusqlite::ToSql,
                ],
            )?;
        }

        self.get_skill(domain_code, skill_code)
    }

    // --- strategies ---

    /// Create a strategy toward a skill with the next free code.
    pub fn create_strategy(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        name: String,
        problem_formulation: Option<String>,
    ) -> Result<Strategy> {
        let skill = self.get_skill(domain_code, skill_code)?;

        let code: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(code), 0) + 1 FROM strategies WHERE skill_id = ?",
            &[&skill.id as &dyn rusqlite::ToSql],
            |row| row.get(0),
        )?;

        self.conn.execute(
            "INSERT INTO strategies (skill_id, code, name, problem_formulation)
             VALUES (?, ?, ?, ?)",
            &[
                &skill.id as &dyn rusqlite::ToSql,
                &code as &dyn rusqlite::ToSql,
                &name as &dyn rusqlite::ToSql,
                &problem_formulation as &dyn rusqlite::ToSql,
            ],
        )?;

        self.get_strategy(domain_code, skill_code, code)
    }

    /// Get a strategy by its code path.
    pub fn get_strategy(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        strategy_code: i64,
    ) -> Result<Strategy> {
        let skill = self.get_skill(domain_code, skill_code)?;
        self.conn
            .query_row(
                "SELECT * FROM strategies WHERE skill_id = ? AND code = ?",
                &[
                    &skill.id as &dyn rusqlite::ToSql,
                    &strategy_code as &dyn rusqlite::ToSql,
                ],
                Strategy::from_row,
            )
            .map_err(|_| Error::StrategyNotFound(domain_code, skill_code, strategy_code))
    }

    /// Update a strategy's name and/or problem formulation.
    pub fn update_strategy(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        strategy_code: i64,
        name: Option<String>,
        problem_formulation: Option<String>,
    ) -> Result<Strategy> {
        let strategy = self.get_strategy(domain_code, skill_code, strategy_code)?;

        if let Some(n) = name {
            self.conn.execute(
                "UPDATE strategies SET name = ? WHERE id = ?",
                &[
                    &n as &dyn rusqlite::ToSql,
                    &strategy.id as &dyn rusqlite::ToSql,
                ],
            )?;
        }
        if problem_formulation.is_some() {
            self.conn.execute(
                "UPDATE strategies SET problem_formulation = ? WHERE id = ?",
                &[
                    &problem_formulation as &dyn rusqlite::ToSql,
                    &strategy.id as &dyn rusqlite::ToSql,
                ],
            )?;
        }

        self.get_strategy(domain_code, skill_code, strategy_code)
    }

    /// List the strategies of a skill in code order.
    pub fn list_strategies_of_skill(
        &mut self,
        domain_code: i64,
        skill_code: i64,
    ) -> Result<Vec<Strategy>> {
        let skill = self.get_skill(domain_code, skill_code)?;
        self.conn.query(
            "SELECT * FROM strategies WHERE skill_id = ? ORDER BY code",
            &[&skill.id as &dyn rusqlite::ToSql],
            Strategy::from_row,
        )
    }

    /// List every strategy of a domain grouped by skill, in
    /// (skill code, strategy code) order. Skills without strategies are
    /// omitted. This is the listing used when choosing prerequisites.
    pub fn list_strategies(&mut self, domain_code: i64) -> Result<Vec<(Skill, Vec<Strategy>)>> {
        let skills = self.list_skills(domain_code)?;

        let mut groups = Vec::new();
        for skill in skills {
            let strategies = self.conn.query(
                "SELECT * FROM strategies WHERE skill_id = ? ORDER BY code",
                &[&skill.id as &dyn rusqlite::ToSql],
                Strategy::from_row,
            )?;
            if !strategies.is_empty() {
                groups.push((skill, strategies));
            }
        }
        Ok(groups)
    }

    // --- actions and prerequisites ---

    /// Add an action to a strategy; the ordinal is assigned automatically.
    pub fn add_action(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        strategy_code: i64,
        description: String,
    ) -> Result<Action> {
        let strategy = self.get_strategy(domain_code, skill_code, strategy_code)?;
        action::add_action(&mut self.conn, strategy.id, description)
    }

    /// Replace an action's description.
    pub fn update_action(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        strategy_code: i64,
        ordinal: i64,
        description: String,
    ) -> Result<Action> {
        let strategy = self.get_strategy(domain_code, skill_code, strategy_code)?;
        action::update_action(&mut self.conn, strategy.id, ordinal, description)
    }

    /// Remove an action from a strategy.
    pub fn remove_action(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        strategy_code: i64,
        ordinal: i64,
    ) -> Result<()> {
        let strategy = self.get_strategy(domain_code, skill_code, strategy_code)?;
        action::remove_action(&mut self.conn, strategy.id, ordinal)
    }

    /// List the actions of a strategy in ordinal order.
    pub fn list_actions(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        strategy_code: i64,
    ) -> Result<Vec<Action>> {
        let strategy = self.get_strategy(domain_code, skill_code, strategy_code)?;
        action::list_actions(&mut self.conn, strategy.id)
    }

    /// List the prerequisites of an action.
    pub fn list_prerequisites(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        strategy_code: i64,
        ordinal: i64,
    ) -> Result<Vec<PrerequisiteRef>> {
        let strategy = self.get_strategy(domain_code, skill_code, strategy_code)?;
        let act = action::get_action(&mut self.conn, strategy.id, ordinal)?;
        action::list_prerequisites(&mut self.conn, act.id)
    }

    /// Require a strategy as a prerequisite of an action.
    ///
    /// The prerequisite is addressed by `(skill_code, strategy_code)`
    /// within the action's own domain; strategies of other domains are
    /// not eligible.
    pub fn require(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        strategy_code: i64,
        ordinal: i64,
        on_skill_code: i64,
        on_strategy_code: i64,
    ) -> Result<()> {
        let strategy = self.get_strategy(domain_code, skill_code, strategy_code)?;
        let act = action::get_action(&mut self.conn, strategy.id, ordinal)?;
        let prerequisite = self.get_strategy(domain_code, on_skill_code, on_strategy_code)?;

        if action::has_prerequisite(&mut self.conn, act.id, prerequisite.id)? {
            return Err(Error::DuplicatePrerequisite(
                on_skill_code,
                on_strategy_code,
            ));
        }

        action::add_prerequisite(&mut self.conn, act.id, prerequisite.id)
    }

    /// Drop a prerequisite from an action. Dropping a link that does not
    /// exist is a no-op.
    pub fn unrequire(
        &mut self,
        domain_code: i64,
        skill_code: i64,
        strategy_code: i64,
        ordinal: i64,
        on_skill_code: i64,
        on_strategy_code: i64,
    ) -> Result<()> {
        let strategy = self.get_strategy(domain_code, skill_code, strategy_code)?;
        let act = action::get_action(&mut self.conn, strategy.id, ordinal)?;
        let prerequisite = self.get_strategy(domain_code, on_skill_code, on_strategy_code)?;
        action::remove_prerequisite(&mut self.conn, act.id, prerequisite.id)
    }
}
