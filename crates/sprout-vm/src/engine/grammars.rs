//! Grammar slots: the root grammar plus every reachable foreign grammar.
//!
//! Each slot owns its own memo table in the engine, because rule ids are
//! only meaningful within one grammar.

use std::collections::HashMap;

use sprout_core::{Grammar, Rule, RuleId};

use super::error::RuntimeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GrammarId(pub u16);

impl GrammarId {
    pub const ROOT: Self = Self(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Slot<'a> {
    grammar: &'a Grammar,
    /// Dotted alias path from the root, empty for the root itself.
    path: String,
    aliases: HashMap<&'a str, GrammarId>,
}

#[derive(Debug)]
pub struct GrammarSet<'a> {
    slots: Vec<Slot<'a>>,
}

impl<'a> GrammarSet<'a> {
    pub fn new(root: &'a Grammar) -> Self {
        let mut set = Self { slots: Vec::new() };
        set.add(root, String::new());
        set
    }

    fn add(&mut self, grammar: &'a Grammar, path: String) -> GrammarId {
        let id = GrammarId(self.slots.len() as u16);
        self.slots.push(Slot {
            grammar,
            path: path.clone(),
            aliases: HashMap::new(),
        });
        for (alias, foreign) in grammar.foreign_grammars() {
            let child_path = if path.is_empty() {
                alias.to_string()
            } else {
                format!("{path}.{alias}")
            };
            let child = self.add(foreign, child_path);
            self.slots[id.index()].aliases.insert(alias, child);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn grammar(&self, id: GrammarId) -> &'a Grammar {
        self.slots[id.index()].grammar
    }

    /// Display name of a slot: `root` or its alias path.
    pub fn name(&self, id: GrammarId) -> &str {
        let path = &self.slots[id.index()].path;
        if path.is_empty() { "root" } else { path.as_str() }
    }

    /// Resolve a foreign alias declared by grammar `from`.
    pub fn resolve_alias(
        &self,
        from: GrammarId,
        alias: &str,
    ) -> Result<GrammarId, RuntimeError> {
        self.slots[from.index()]
            .aliases
            .get(alias)
            .copied()
            .ok_or_else(|| RuntimeError::UnknownGrammar(alias.to_string()))
    }

    /// Resolve a rule by name within grammar `id`.
    pub fn resolve_rule(
        &self,
        id: GrammarId,
        name: &str,
    ) -> Result<(RuleId, &'a Rule), RuntimeError> {
        let grammar = self.grammar(id);
        grammar
            .rule_id(name)
            .and_then(|rid| grammar.rule(rid).map(|rule| (rid, rule)))
            .ok_or_else(|| RuntimeError::UnknownRule {
                grammar: self.name(id).to_string(),
                name: name.to_string(),
            })
    }

    pub fn rule(&self, id: GrammarId, rule: RuleId) -> &'a Rule {
        self.grammar(id)
            .rule(rule)
            .unwrap_or_else(|| panic!("rule {rule:?} missing from grammar slot {id:?}"))
    }
}
