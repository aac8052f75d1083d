//! Rule evaluation for csvgate.
//!
//! Rules come in two kinds: [`CellRule`]s check one value at a time and
//! [`AggregateRule`]s check a whole column once its values are collected.
//! Most numeric families are "combo" rules: one computation registered under
//! six names that differ only in how the actual value is compared
//! (see [`Combo`]).

pub mod aggregate;
pub mod cell;
pub mod combo;
pub mod error;
pub mod number;
pub mod options;
pub mod pattern;
pub mod registry;
pub mod ruleset;
pub mod stats;

pub use aggregate::AggregateRule;
pub use cell::{CellRule, parse_date, parse_date_expression};
pub use combo::Combo;
pub use error::{Result, RuleError};
pub use options::RuleArgs;
pub use pattern::compile_pattern;
pub use registry::{RuleKind, RuleRegistry, RuleSpec};
pub use ruleset::{AGGREGATE_PREFIX, AggregateRuleset, CellRuleset};
