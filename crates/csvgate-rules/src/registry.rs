//! Rule registry: canonical rule name to factory.
//!
//! The registry is built once at startup and fails fast on unknown names, so
//! schema mistakes surface before any CSV row is read.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use serde_json::Value;

use crate::aggregate::{self, AggregateRule};
use crate::cell::{self, CellRule};
use crate::combo::Combo;
use crate::error::{Result, RuleError};
use crate::options::RuleArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Cell,
    Aggregate,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Cell => f.write_str("cell"),
            RuleKind::Aggregate => f.write_str("aggregate"),
        }
    }
}

pub type CellFactory = Arc<dyn Fn(&RuleArgs) -> Result<Box<dyn CellRule>> + Send + Sync>;
pub type AggregateFactory =
    Arc<dyn Fn(&RuleArgs) -> Result<Box<dyn AggregateRule>> + Send + Sync>;

#[derive(Clone)]
pub enum RuleFactory {
    Cell(CellFactory),
    Aggregate(AggregateFactory),
}

impl RuleFactory {
    pub fn kind(&self) -> RuleKind {
        match self {
            RuleFactory::Cell(_) => RuleKind::Cell,
            RuleFactory::Aggregate(_) => RuleKind::Aggregate,
        }
    }
}

/// A registered rule with its documentation metadata.
#[derive(Clone)]
pub struct RuleSpec {
    pub name: String,
    pub help: &'static str,
    /// Example option value, as it would be written in a schema.
    pub example: &'static str,
    pub factory: RuleFactory,
}

impl fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSpec")
            .field("name", &self.name)
            .field("kind", &self.factory.kind())
            .finish()
    }
}

/// Alternative spellings accepted in schemas.
const ALIASES: &[(&str, &str)] = &[("min_date", "date_min"), ("max_date", "date_max")];

#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<String, RuleSpec>,
}

static BUILTIN: LazyLock<Arc<RuleRegistry>> = LazyLock::new(|| Arc::new(RuleRegistry::builtin()));

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in cell and aggregate rule.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        cell::register(&mut registry);
        aggregate::register(&mut registry);
        registry
    }

    /// Shared instance of [`RuleRegistry::builtin`].
    pub fn shared() -> Arc<RuleRegistry> {
        Arc::clone(&BUILTIN)
    }

    pub fn register_cell<F>(&mut self, name: &str, help: &'static str, example: &'static str, factory: F)
    where
        F: Fn(&RuleArgs) -> Result<Box<dyn CellRule>> + Send + Sync + 'static,
    {
        self.insert(name.to_string(), help, example, RuleFactory::Cell(Arc::new(factory)));
    }

    pub fn register_aggregate<F>(
        &mut self,
        name: &str,
        help: &'static str,
        example: &'static str,
        factory: F,
    ) where
        F: Fn(&RuleArgs) -> Result<Box<dyn AggregateRule>> + Send + Sync + 'static,
    {
        self.insert(
            name.to_string(),
            help,
            example,
            RuleFactory::Aggregate(Arc::new(factory)),
        );
    }

    /// Register the six comparison variants of a cell rule family.
    pub fn register_cell_combo<F>(&mut self, base: &str, help: &'static str, example: &'static str, factory: F)
    where
        F: Fn(Combo, &RuleArgs) -> Result<Box<dyn CellRule>> + Send + Sync + 'static,
    {
        let factory = Arc::new(factory);
        for combo in Combo::ALL {
            let factory = Arc::clone(&factory);
            self.register_cell(&combo.rule_name(base), help, example, move |args| {
                factory(combo, args)
            });
        }
    }

    /// Register the six comparison variants of an aggregate rule family.
    pub fn register_aggregate_combo<F>(
        &mut self,
        base: &str,
        help: &'static str,
        example: &'static str,
        factory: F,
    ) where
        F: Fn(Combo, &RuleArgs) -> Result<Box<dyn AggregateRule>> + Send + Sync + 'static,
    {
        let factory = Arc::new(factory);
        for combo in Combo::ALL {
            let factory = Arc::clone(&factory);
            self.register_aggregate(&combo.rule_name(base), help, example, move |args| {
                factory(combo, args)
            });
        }
    }

    fn insert(&mut self, name: String, help: &'static str, example: &'static str, factory: RuleFactory) {
        self.rules.insert(
            name.clone(),
            RuleSpec {
                name,
                help,
                example,
                factory,
            },
        );
    }

    /// Canonical spelling of a rule name: snake_case with aliases applied.
    pub fn canonical_name(raw: &str) -> String {
        let name = raw.trim().replace('-', "_");
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, target)| (*target).to_string())
    }

    pub fn get(&self, name: &str) -> Option<&RuleSpec> {
        self.rules.get(&Self::canonical_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over all rules in name order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleSpec> {
        self.rules.values()
    }

    fn lookup(&self, name: &str, kind: RuleKind) -> Result<&RuleSpec> {
        let canonical = Self::canonical_name(name);
        let spec = self
            .rules
            .get(&canonical)
            .ok_or_else(|| RuleError::UnknownRule {
                name: name.to_string(),
                kind,
                expected: implementation_name(kind, &canonical),
            })?;
        let actual = spec.factory.kind();
        if actual != kind {
            return Err(RuleError::WrongKind {
                name: name.to_string(),
                expected: kind,
                actual,
            });
        }
        Ok(spec)
    }

    /// Instantiate a cell rule.
    pub fn cell_rule(&self, name: &str, options: &Value) -> Result<Box<dyn CellRule>> {
        let spec = self.lookup(name, RuleKind::Cell)?;
        let RuleFactory::Cell(factory) = &spec.factory else {
            unreachable!("kind checked by lookup");
        };
        factory(&RuleArgs::new(spec.name.clone(), options.clone()))
    }

    /// Instantiate an aggregate rule.
    pub fn aggregate_rule(&self, name: &str, options: &Value) -> Result<Box<dyn AggregateRule>> {
        let spec = self.lookup(name, RuleKind::Aggregate)?;
        let RuleFactory::Aggregate(factory) = &spec.factory else {
            unreachable!("kind checked by lookup");
        };
        factory(&RuleArgs::new(spec.name.clone(), options.clone()))
    }
}

/// Name an implementation would be registered under, e.g. `cell::DateMin`.
fn implementation_name(kind: RuleKind, canonical: &str) -> String {
    let pascal: String = canonical
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    format!("{kind}::{pascal}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_names() {
        assert_eq!(RuleRegistry::canonical_name("date-min"), "date_min");
        assert_eq!(RuleRegistry::canonical_name("min_date"), "date_min");
        assert_eq!(RuleRegistry::canonical_name(" not_empty "), "not_empty");
    }

    #[test]
    fn unknown_rule_names_requested_and_expected() {
        let registry = RuleRegistry::builtin();
        let err = registry.cell_rule("no_such_rule", &json!(true)).err().unwrap();
        assert_eq!(
            err.to_string(),
            "unknown cell rule \"no_such_rule\": no implementation is registered as \"cell::NoSuchRule\""
        );
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let registry = RuleRegistry::builtin();
        let err = registry.cell_rule("sum_max", &json!(6)).err().unwrap();
        assert!(matches!(err, RuleError::WrongKind { .. }));
        let err = registry.aggregate_rule("not_empty", &json!(true)).err().unwrap();
        assert!(matches!(err, RuleError::WrongKind { .. }));
    }

    #[test]
    fn combo_families_register_six_variants() {
        let registry = RuleRegistry::builtin();
        for name in ["sum", "sum_not", "sum_min", "sum_greater", "sum_max", "sum_less"] {
            let spec = registry.get(name).unwrap();
            assert_eq!(spec.factory.kind(), RuleKind::Aggregate, "{name}");
        }
        for name in ["length", "length_not", "length_min", "length_greater", "length_max", "length_less"] {
            assert_eq!(registry.get(name).unwrap().factory.kind(), RuleKind::Cell, "{name}");
        }
    }
}
