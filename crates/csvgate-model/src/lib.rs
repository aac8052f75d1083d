//! Core types shared by every csvgate crate.
//!
//! The resolved [`Schema`] tree lives here together with the violation model
//! ([`Issue`], [`IssueSuite`]) that every validation stage produces.

pub mod column;
pub mod issue;
pub mod schema;

pub use column::ColumnId;
pub use issue::{Issue, IssueSuite, Line};
pub use schema::{Column, CsvConfig, Encoding, RuleMap, Schema, StructuralRules};
