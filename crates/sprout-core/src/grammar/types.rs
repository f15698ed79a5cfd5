//! Grammar container.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::json::GrammarError;
use crate::operator::Operator;

/// Stable index of a rule within its grammar (declaration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u32);

impl RuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub operator: Operator,
    /// Parameter names; empty for ordinary rules.
    #[serde(default)]
    pub formal_args: Vec<String>,
}

impl Rule {
    pub fn is_parameterized(&self) -> bool {
        !self.formal_args.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.formal_args.len()
    }
}

/// A named, ordered collection of rules plus metadata.
///
/// Rules are append-only: redefining a name is a [`GrammarError::DuplicateRule`].
/// Once handed to an engine, a grammar is only read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrammar", into = "RawGrammar")]
pub struct Grammar {
    rules: IndexMap<String, Rule>,
    setup_actions: Vec<String>,
    foreign_grammars: IndexMap<String, Grammar>,
    variables: IndexMap<String, String>,
}

/// Serialized shape. Rules are a list so a duplicated name is rejected on
/// load instead of silently overwriting the earlier rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawGrammar {
    rules: Vec<Rule>,
    #[serde(default)]
    setup_actions: Vec<String>,
    #[serde(default)]
    foreign_grammars: IndexMap<String, Grammar>,
    #[serde(default)]
    variables: IndexMap<String, String>,
}

impl TryFrom<RawGrammar> for Grammar {
    type Error = GrammarError;

    fn try_from(raw: RawGrammar) -> Result<Self, Self::Error> {
        let mut grammar = Grammar {
            setup_actions: raw.setup_actions,
            foreign_grammars: raw.foreign_grammars,
            variables: raw.variables,
            ..Grammar::default()
        };
        for rule in raw.rules {
            grammar.insert(rule)?;
        }
        Ok(grammar)
    }
}

impl From<Grammar> for RawGrammar {
    fn from(grammar: Grammar) -> Self {
        Self {
            rules: grammar.rules.into_values().collect(),
            setup_actions: grammar.setup_actions,
            foreign_grammars: grammar.foreign_grammars,
            variables: grammar.variables,
        }
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        operator: Operator,
    ) -> Result<RuleId, GrammarError> {
        self.set_with_args(name, Vec::<String>::new(), operator)
    }

    /// Append a parameterized rule.
    pub fn set_with_args(
        &mut self,
        name: impl Into<String>,
        formal_args: impl IntoIterator<Item = impl Into<String>>,
        operator: Operator,
    ) -> Result<RuleId, GrammarError> {
        self.insert(Rule {
            name: name.into(),
            operator,
            formal_args: formal_args.into_iter().map(Into::into).collect(),
        })
    }

    fn insert(&mut self, rule: Rule) -> Result<RuleId, GrammarError> {
        if self.rules.contains_key(&rule.name) {
            return Err(GrammarError::DuplicateRule(rule.name));
        }
        let id = RuleId(self.rules.len() as u32);
        self.rules.insert(rule.name.clone(), rule);
        Ok(id)
    }

    pub fn find(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.rules.get_index_of(name).map(|i| RuleId(i as u32))
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get_index(id.index()).map(|(_, rule)| rule)
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Rule names in declaration order.
    pub fn rule_order(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Entry rule: the one named `root`, else the first declared.
    pub fn entry(&self) -> Option<RuleId> {
        self.rule_id("root")
            .or_else(|| (!self.rules.is_empty()).then_some(RuleId(0)))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn setup_actions(&self) -> &[String] {
        &self.setup_actions
    }

    pub fn add_setup_action(&mut self, code: impl Into<String>) {
        self.setup_actions.push(code.into());
    }

    /// Embedded grammars keyed by alias.
    pub fn foreign_grammars(&self) -> impl Iterator<Item = (&str, &Grammar)> {
        self.foreign_grammars.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn foreign(&self, alias: &str) -> Option<&Grammar> {
        self.foreign_grammars.get(alias)
    }

    pub fn add_foreign(
        &mut self,
        alias: impl Into<String>,
        grammar: Grammar,
    ) -> Result<(), GrammarError> {
        let alias = alias.into();
        if self.foreign_grammars.contains_key(&alias) {
            return Err(GrammarError::DuplicateForeign(alias));
        }
        self.foreign_grammars.insert(alias, grammar);
        Ok(())
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Set a free-form variable. Later values replace earlier ones.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }
}
