//! Models for the instructional-design hierarchy.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A top-level subject area. Domains are numbered globally by `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub id: i64,
    pub code: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl Domain {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            code: row.get("code")?,
            name: row.get("name")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// A skill within a domain, numbered per domain by `code`.
///
/// Every domain carries a code-0 placeholder skill that anchors the
/// per-domain numbering; real skills start at code 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    pub domain_id: i64,
    pub code: i64,
    pub name: String,
    pub description: Option<String>,
}

impl Skill {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            domain_id: row.get("domain_id")?,
            code: row.get("code")?,
            name: row.get("name")?,
            description: row.get("description")?,
        })
    }

    /// Whether this is the code-0 placeholder created with the domain.
    pub fn is_placeholder(&self) -> bool {
        self.code == 0
    }
}

/// A strategy toward a skill goal, numbered per skill by `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub id: i64,
    pub skill_id: i64,
    pub code: i64,
    pub name: String,
    pub problem_formulation: Option<String>,
}

impl Strategy {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            skill_id: row.get("skill_id")?,
            code: row.get("code")?,
            name: row.get("name")?,
            problem_formulation: row.get("problem_formulation")?,
        })
    }
}

/// A step of a strategy, numbered per strategy by `ordinal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    pub strategy_id: i64,
    pub ordinal: i64,
    pub description: String,
}

impl Action {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            strategy_id: row.get("strategy_id")?,
            ordinal: row.get("ordinal")?,
            description: row.get("description")?,
        })
    }
}

/// A prerequisite strategy of an action, addressed by its code path
/// within the action's own domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrerequisiteRef {
    pub skill_code: i64,
    pub strategy_code: i64,
    pub strategy_name: String,
}

impl PrerequisiteRef {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            skill_code: row.get("skill_code")?,
            strategy_code: row.get("strategy_code")?,
            strategy_name: row.get("strategy_name")?,
        })
    }
}
