//! Instructional-design hierarchy: Domain -> Skill -> Strategy -> Action.

pub mod action;
pub mod model;
pub mod repository;

pub use model::{Action, Domain, PrerequisiteRef, Skill, Strategy};
pub use repository::{DomainRepository, PLACEHOLDER_SKILL};
