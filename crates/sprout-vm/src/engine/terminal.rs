//! Terminal matchers. Each returns the end offset of a match at `pos`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use regex_automata::dfa::dense::{self, DFA};
use regex_automata::dfa::{Automaton, StartKind};
use regex_automata::{Anchored, Input};

use super::error::RuntimeError;

pub(crate) fn dot(input: &str, pos: usize) -> Option<usize> {
    input[pos..].chars().next().map(|c| pos + c.len_utf8())
}

pub(crate) fn literal(input: &str, pos: usize, text: &str) -> Option<usize> {
    input[pos..].starts_with(text).then_some(pos + text.len())
}

pub(crate) fn char_range(input: &str, pos: usize, lo: char, hi: char) -> Option<usize> {
    let c = input[pos..].chars().next()?;
    (lo..=hi).contains(&c).then_some(pos + c.len_utf8())
}

/// Anchored DFAs, compiled on first use and keyed by pattern text.
#[derive(Default)]
pub(crate) struct RegexCache<'a> {
    dfas: HashMap<&'a str, DFA<Vec<u32>>>,
}

impl<'a> RegexCache<'a> {
    pub fn find(
        &mut self,
        pattern: &'a str,
        input: &str,
        pos: usize,
    ) -> Result<Option<usize>, RuntimeError> {
        let invalid = |message: String| RuntimeError::InvalidPattern {
            pattern: pattern.to_string(),
            message,
        };

        let dfa = match self.dfas.entry(pattern) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let dfa = dense::DFA::builder()
                    .configure(dense::DFA::config().start_kind(StartKind::Anchored))
                    .build(pattern)
                    .map_err(|err| invalid(err.to_string()))?;
                e.insert(dfa)
            }
        };

        let search = Input::new(input).range(pos..).anchored(Anchored::Yes);
        let found = dfa
            .try_search_fwd(&search)
            .map_err(|err| invalid(err.to_string()))?;
        // Byte-oriented patterns may stop inside a character.
        Ok(found
            .map(|m| m.offset())
            .filter(|&end| input.is_char_boundary(end)))
    }
}
