//! Packrat matching engine.

use sprout_core::{Grammar, OpKind, Operator, Rule, RuleId, Span};

use super::error::RuntimeError;
use super::failure::{Failure, FailureTracker};
use super::frame::{Frame, FrameArena};
use super::grammars::{GrammarId, GrammarSet};
use super::memo::{MemoKey, MemoState, MemoStats, MemoTable};
use super::node::{Match, MatchNode};
use super::terminal::{self, RegexCache};
use super::trace::{NoopTracer, Tracer};

/// Runtime limits for a parse.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    /// Maximum operator evaluations per parse (default: 10,000,000).
    pub(crate) exec_fuel: u32,
    /// Maximum nesting of rule evaluations and composite operators
    /// (default: 512). Each level holds native stack frames.
    pub(crate) recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 10_000_000,
            recursion_limit: 512,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// An active memoized rule application.
#[derive(Debug)]
struct CallRecord {
    grammar: GrammarId,
    rule: RuleId,
    pos: usize,
    /// Rules that were active between this application and a left-recursive
    /// call back into it, all at `pos`. Their memo entries depend on the
    /// seed and are dropped whenever the seed changes.
    involved: Vec<(GrammarId, RuleId)>,
}

enum MemoHit<'a> {
    Done(Option<Match<'a>>, usize),
    Pending,
}

/// Matching state for one input and one grammar.
///
/// A grammar is only borrowed, so any number of engines may share it.
pub struct Engine<'a, T: Tracer = NoopTracer> {
    input: &'a str,
    grammars: GrammarSet<'a>,
    /// One table per grammar slot.
    memo: Vec<MemoTable<'a>>,
    regexes: RegexCache<'a>,
    frames: FrameArena<'a>,
    failures: FailureTracker<'a>,
    calls: Vec<CallRecord>,

    pos: usize,
    /// Grammar slot whose rules plain references resolve in.
    grammar: GrammarId,

    // Fuel tracking
    exec_fuel: u32,
    depth: u32,
    limits: FuelLimits,
    growths: u32,

    tracer: T,
}

/// Builder for engine instances.
pub struct EngineBuilder<'a, T: Tracer = NoopTracer> {
    input: &'a str,
    grammar: &'a Grammar,
    limits: FuelLimits,
    tracer: T,
}

impl<'a> EngineBuilder<'a, NoopTracer> {
    pub fn new(input: &'a str, grammar: &'a Grammar) -> Self {
        Self {
            input,
            grammar,
            limits: FuelLimits::default(),
            tracer: NoopTracer,
        }
    }
}

impl<'a, T: Tracer> EngineBuilder<'a, T> {
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.limits = self.limits.recursion_limit(limit);
        self
    }

    /// Replace the tracer. `NoopTracer` calls compile away; `PrintTracer`
    /// collects a readable trace.
    pub fn tracer<U: Tracer>(self, tracer: U) -> EngineBuilder<'a, U> {
        EngineBuilder {
            input: self.input,
            grammar: self.grammar,
            limits: self.limits,
            tracer,
        }
    }

    pub fn build(self) -> Engine<'a, T> {
        let grammars = GrammarSet::new(self.grammar);
        let memo = (0..grammars.len()).map(|_| MemoTable::new()).collect();
        Engine {
            input: self.input,
            grammars,
            memo,
            regexes: RegexCache::default(),
            frames: FrameArena::new(),
            failures: FailureTracker::default(),
            calls: Vec::new(),
            pos: 0,
            grammar: GrammarId::ROOT,
            exec_fuel: self.limits.get_exec_fuel(),
            depth: 0,
            limits: self.limits,
            growths: 0,
            tracer: self.tracer,
        }
    }
}

impl<'a> Engine<'a, NoopTracer> {
    pub fn new(input: &'a str, grammar: &'a Grammar) -> Self {
        EngineBuilder::new(input, grammar).build()
    }

    pub fn builder(input: &'a str, grammar: &'a Grammar) -> EngineBuilder<'a, NoopTracer> {
        EngineBuilder::new(input, grammar)
    }
}

impl<'a, T: Tracer> Engine<'a, T> {
    /// Parse from offset 0 with `rule`, or the grammar's entry rule.
    ///
    /// A match does not have to consume the whole input; grammars that
    /// need that end with an end-of-input predicate. `Ok(None)` means the
    /// input was rejected; [`failure`](Self::failure) explains where.
    pub fn parse(&mut self, rule: Option<&str>) -> Result<Option<Match<'a>>, RuntimeError> {
        self.reset();
        let rule_id = match rule {
            Some(name) => self.grammars.resolve_rule(GrammarId::ROOT, name)?.0,
            None => self
                .grammars
                .grammar(GrammarId::ROOT)
                .entry()
                .ok_or_else(|| RuntimeError::UnknownRule {
                    grammar: self.grammars.name(GrammarId::ROOT).to_string(),
                    name: "root".to_string(),
                })?,
        };
        self.apply(rule_id)
    }

    fn reset(&mut self) {
        self.pos = 0;
        self.grammar = GrammarId::ROOT;
        for table in &mut self.memo {
            table.clear();
        }
        self.frames.clear();
        self.failures.clear();
        self.calls.clear();
        self.exec_fuel = self.limits.get_exec_fuel();
        self.depth = 0;
        self.growths = 0;
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Cursor position after the last parse.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Deepest offset at which anything failed; 0 before any failure.
    pub fn failure_position(&self) -> usize {
        self.failures.furthest().map_or(0, |f| f.pos)
    }

    /// First operator that failed at [`failure_position`](Self::failure_position).
    pub fn failure_operator(&self) -> Option<&'a Operator> {
        self.failures
            .furthest()
            .and_then(|f| f.expected.first().copied())
    }

    pub fn failure(&self) -> Option<&Failure<'a>> {
        self.failures.furthest()
    }

    pub fn memo_stats(&self) -> MemoStats {
        MemoStats {
            entries: self.memo.iter().map(MemoTable::len).sum(),
            hits: self.memo.iter().map(MemoTable::hits).sum(),
            growths: self.growths,
        }
    }

    /// Hit count of the root grammar's entry for `rule` at `pos`.
    pub fn use_count(&self, rule: &str, pos: usize) -> Option<u32> {
        let rule_id = self.grammars.grammar(GrammarId::ROOT).rule_id(rule)?;
        self.memo[GrammarId::ROOT.index()]
            .get((rule_id, pos))
            .map(|e| e.use_count)
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// Memoized application of a rule of the current grammar at the cursor.
    fn apply(&mut self, rule_id: RuleId) -> Result<Option<Match<'a>>, RuntimeError> {
        let g = self.grammar;
        let rule = self.grammars.rule(g, rule_id);
        let start = self.pos;
        let key: MemoKey = (rule_id, start);

        let hit = self.memo[g.index()].get_mut(key).map(|entry| match &mut entry.state {
            MemoState::Done(ans) => {
                entry.use_count += 1;
                MemoHit::Done(ans.clone(), entry.end)
            }
            MemoState::Pending { detected } => {
                *detected = true;
                MemoHit::Pending
            }
        });

        match hit {
            Some(MemoHit::Done(ans, end)) => {
                self.tracer
                    .trace_memo_hit(&rule.name, start, ans.as_ref().map(|_| end));
                if ans.is_some() {
                    self.pos = end;
                }
                return Ok(ans);
            }
            Some(MemoHit::Pending) => {
                self.tracer.trace_left_recursion(&rule.name, start);
                self.mark_involved(g, rule_id, start);
                return Ok(None);
            }
            None => {}
        }

        self.memo[g.index()].insert_pending(key);
        let (ans, mut involved) = self.eval_rule(g, rule_id, rule, start)?;
        let detected = self.memo[g.index()].detected(key);
        let end = self.pos;
        self.memo[g.index()].store(key, ans.clone(), end);

        match ans {
            Some(seed) if detected => self.grow(g, rule_id, rule, start, seed, end, &mut involved),
            ans => Ok(ans),
        }
    }

    /// Evaluate a rule body as a fresh application: empty parameter
    /// environment, recorded on the call stack.
    fn eval_rule(
        &mut self,
        g: GrammarId,
        rule_id: RuleId,
        rule: &'a Rule,
        start: usize,
    ) -> Result<(Option<Match<'a>>, Vec<(GrammarId, RuleId)>), RuntimeError> {
        self.descend()?;
        self.tracer.trace_enter(&rule.name, start);
        self.calls.push(CallRecord {
            grammar: g,
            rule: rule_id,
            pos: start,
            involved: Vec::new(),
        });
        let env = self.frames.current();
        self.frames.restore(None);

        let result = self.match_op(&rule.operator);

        self.frames.restore(env);
        let record = self.calls.pop().expect("call stack is balanced");
        self.depth -= 1;

        let ans = result?;
        self.tracer
            .trace_exit(&rule.name, start, ans.as_ref().map(|_| self.pos));
        Ok((ans, record.involved))
    }

    /// Grow a left-recursive seed until re-evaluation stops consuming more.
    #[allow(clippy::too_many_arguments)]
    #[inline(never)]
    fn grow(
        &mut self,
        g: GrammarId,
        rule_id: RuleId,
        rule: &'a Rule,
        start: usize,
        seed: Match<'a>,
        seed_end: usize,
        involved: &mut Vec<(GrammarId, RuleId)>,
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        self.growths += 1;
        let key = (rule_id, start);
        let mut best = seed;
        let mut best_end = seed_end;

        // Every productive iteration consumes at least one more byte.
        let budget = self.input.len() - start + 1;
        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > budget {
                return Err(RuntimeError::GrowthStalled {
                    rule: rule.name.clone(),
                    pos: start,
                });
            }

            self.evict(involved, start);
            self.pos = start;
            let (next, more) = self.eval_rule(g, rule_id, rule, start)?;
            for entry in more {
                if !involved.contains(&entry) {
                    involved.push(entry);
                }
            }

            match next {
                Some(grown) if self.pos > best_end => {
                    best = grown;
                    best_end = self.pos;
                    self.memo[g.index()].store(key, Some(best.clone()), best_end);
                    self.tracer.trace_grow(&rule.name, start, best_end);
                }
                _ => break,
            }
        }

        self.evict(involved, start);
        self.pos = best_end;
        Ok(Some(best))
    }

    /// A call hit the pending entry of `(g, rule_id, pos)`: every application
    /// stacked above that one is part of the recursion cycle.
    fn mark_involved(&mut self, g: GrammarId, rule_id: RuleId, pos: usize) {
        let Some(head) = self
            .calls
            .iter()
            .rposition(|c| c.grammar == g && c.rule == rule_id && c.pos == pos)
        else {
            return;
        };
        let (below, above) = self.calls.split_at_mut(head + 1);
        let head = &mut below[head];
        for record in above {
            let entry = (record.grammar, record.rule);
            if !head.involved.contains(&entry) {
                head.involved.push(entry);
            }
        }
    }

    fn evict(&mut self, involved: &[(GrammarId, RuleId)], pos: usize) {
        for &(g, rule_id) in involved {
            self.memo[g.index()].evict((rule_id, pos));
        }
    }

    fn descend(&mut self) -> Result<(), RuntimeError> {
        if self.depth >= self.limits.recursion_limit {
            return Err(RuntimeError::RecursionLimitExceeded(
                self.limits.recursion_limit,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Match `op` at the cursor. On failure the cursor is left where it was.
    ///
    /// Every composite operator is one level of the recursion limit and runs
    /// in its own out-of-line helper; terminals and actions are free.
    fn match_op(&mut self, op: &'a Operator) -> Result<Option<Match<'a>>, RuntimeError> {
        if self.exec_fuel == 0 {
            return Err(RuntimeError::ExecFuelExhausted(self.limits.exec_fuel));
        }
        self.exec_fuel -= 1;

        if op.is_terminal() || op.is_action() {
            return self.match_terminal(op);
        }

        self.descend()?;
        let result = self.match_composite(op);
        self.depth -= 1;
        result
    }

    #[inline(never)]
    fn match_terminal(&mut self, op: &'a Operator) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        let end = match op.kind() {
            OpKind::Dot => terminal::dot(self.input, start),
            OpKind::Literal(text) => terminal::literal(self.input, start, text),
            OpKind::Regex(pattern) => self.regexes.find(pattern, self.input, start)?,
            OpKind::CharRange { lo, hi } => terminal::char_range(self.input, start, *lo, *hi),
            _ => return Ok(Some(MatchNode::leaf(op, Span::new(start, start), ""))),
        };
        Ok(self.terminal(op, end))
    }

    fn match_composite(&mut self, op: &'a Operator) -> Result<Option<Match<'a>>, RuntimeError> {
        match op.kind() {
            OpKind::Sequence(ops) => self.match_sequence(op, ops),
            OpKind::Choice(ops) => self.match_choice(op, ops),
            OpKind::Repeat { op: inner, min, max } => self.match_repeat(op, inner, *min, *max),
            OpKind::And(inner) => self.match_and(op, inner),
            OpKind::Not(inner) => self.match_not(op, inner),
            OpKind::RuleRef {
                name,
                grammar: None,
            } => self.match_rule_ref(op, name),
            OpKind::RuleRef {
                name,
                grammar: Some(alias),
            } => self.match_foreign_ref(op, alias, name),
            OpKind::Invoke { name, args } => {
                let (_, rule) = self.grammars.resolve_rule(self.grammar, name)?;
                self.invoke(op, self.grammar, rule, args)
            }
            OpKind::ForeignInvoke {
                grammar: alias,
                name,
                args,
            } => self.match_foreign_invoke(op, alias, name, args),
            OpKind::Tag { op: inner, .. } => self.match_tag(op, inner),
            OpKind::Collect(inner) | OpKind::Bounds(inner) => self.match_capture(op, inner),
            OpKind::Dot
            | OpKind::Literal(_)
            | OpKind::Regex(_)
            | OpKind::CharRange { .. }
            | OpKind::Action(_) => self.match_terminal(op),
        }
    }

    #[inline(never)]
    fn match_sequence(
        &mut self,
        op: &'a Operator,
        ops: &'a [Operator],
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        let mut children = Vec::with_capacity(ops.len());
        for child in ops {
            let Some(m) = self.match_op(child)? else {
                self.pos = start;
                return Ok(None);
            };
            children.push(m);
        }
        Ok(Some(self.node(op, start, children)))
    }

    #[inline(never)]
    fn match_choice(
        &mut self,
        op: &'a Operator,
        ops: &'a [Operator],
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        for alt in ops {
            if let Some(m) = self.match_op(alt)? {
                return Ok(Some(self.node(op, start, vec![m])));
            }
            self.pos = start;
        }
        Ok(None)
    }

    #[inline(never)]
    fn match_repeat(
        &mut self,
        op: &'a Operator,
        inner: &'a Operator,
        min: u32,
        max: Option<u32>,
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        let mut children = Vec::new();
        let mut stalled = false;
        while max.is_none_or(|max| children.len() < max as usize) {
            let before = self.pos;
            let Some(m) = self.match_op(inner)? else {
                break;
            };
            children.push(m);
            // Further iterations would match the same empty span forever.
            if self.pos == before {
                stalled = true;
                break;
            }
        }
        if children.len() < min as usize && !stalled {
            self.pos = start;
            return Ok(None);
        }
        Ok(Some(self.node(op, start, children)))
    }

    #[inline(never)]
    fn match_and(
        &mut self,
        op: &'a Operator,
        inner: &'a Operator,
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        let found = self.match_op(inner)?.is_some();
        self.pos = start;
        Ok(found.then(|| self.node(op, start, Vec::new())))
    }

    #[inline(never)]
    fn match_not(
        &mut self,
        op: &'a Operator,
        inner: &'a Operator,
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        self.failures.suppress();
        let found = self.match_op(inner);
        self.failures.unsuppress();
        let found = found?.is_some();
        self.pos = start;
        if found {
            self.record_failure(start, op);
            return Ok(None);
        }
        Ok(Some(self.node(op, start, Vec::new())))
    }

    #[inline(never)]
    fn match_rule_ref(
        &mut self,
        op: &'a Operator,
        name: &str,
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        if let Some(frame) = self.frames.current_frame().copied()
            && let Some(arg) = frame.lookup(name)
        {
            return self.eval_arg(op, arg, frame);
        }
        let start = self.pos;
        let (rule_id, rule) = self.grammars.resolve_rule(self.grammar, name)?;
        check_arity(rule, 0)?;
        let body = self.apply(rule_id)?;
        Ok(body.map(|m| self.node(op, start, vec![m])))
    }

    #[inline(never)]
    fn match_foreign_ref(
        &mut self,
        op: &'a Operator,
        alias: &str,
        name: &str,
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        let target = self.grammars.resolve_alias(self.grammar, alias)?;
        let (rule_id, rule) = self.grammars.resolve_rule(target, name)?;
        check_arity(rule, 0)?;
        self.tracer.trace_foreign(alias, name, start);

        let caller = self.grammar;
        self.grammar = target;
        let body = self.apply(rule_id);
        self.grammar = caller;
        self.delegated(op, start, body?)
    }

    #[inline(never)]
    fn match_foreign_invoke(
        &mut self,
        op: &'a Operator,
        alias: &str,
        name: &str,
        args: &'a [Operator],
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        let target = self.grammars.resolve_alias(self.grammar, alias)?;
        let (_, rule) = self.grammars.resolve_rule(target, name)?;
        self.tracer.trace_foreign(alias, name, start);
        let body = self.invoke(op, target, rule, args)?;
        self.delegated(op, start, body)
    }

    #[inline(never)]
    fn match_tag(
        &mut self,
        op: &'a Operator,
        inner: &'a Operator,
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        let inner = self.match_op(inner)?;
        Ok(inner.map(|m| self.node(op, start, vec![m])))
    }

    #[inline(never)]
    fn match_capture(
        &mut self,
        op: &'a Operator,
        inner: &'a Operator,
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        let inner = self.match_op(inner)?;
        Ok(inner.map(|_| {
            MatchNode::leaf(op, Span::new(start, self.pos), &self.input[start..self.pos])
        }))
    }

    /// Direct call: bind arguments in a new frame and run the body without
    /// touching the memo table.
    #[inline(never)]
    fn invoke(
        &mut self,
        op: &'a Operator,
        target: GrammarId,
        rule: &'a Rule,
        args: &'a [Operator],
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        check_arity(rule, args.len())?;
        let start = self.pos;
        self.descend()?;
        self.tracer.trace_invoke(&rule.name, start);

        let mark = self.frames.mark();
        self.frames.push(&rule.formal_args, args, self.grammar);
        let caller = self.grammar;
        self.grammar = target;

        let result = self.match_op(&rule.operator);

        self.grammar = caller;
        self.frames.pop_to(mark);
        self.depth -= 1;

        let body = result?;
        self.tracer
            .trace_exit(&rule.name, start, body.as_ref().map(|_| self.pos));
        Ok(body.map(|m| self.node(op, start, vec![m])))
    }

    /// Evaluate an argument operator in the environment that supplied it.
    fn eval_arg(
        &mut self,
        op: &'a Operator,
        arg: &'a Operator,
        frame: Frame<'a>,
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        let start = self.pos;
        let env = self.frames.current();
        let caller = self.grammar;
        self.frames.restore(frame.parent);
        self.grammar = frame.grammar;

        let result = self.match_op(arg);

        self.grammar = caller;
        self.frames.restore(env);
        Ok(result?.map(|m| self.node(op, start, vec![m])))
    }

    /// Wrap the result of a foreign call. A failed delegation is attributed
    /// to the calling operator.
    fn delegated(
        &mut self,
        op: &'a Operator,
        start: usize,
        body: Option<Match<'a>>,
    ) -> Result<Option<Match<'a>>, RuntimeError> {
        match body {
            Some(m) if matches!(op.kind(), OpKind::ForeignInvoke { .. }) => Ok(Some(m)),
            Some(m) => Ok(Some(self.node(op, start, vec![m]))),
            None => {
                self.pos = start;
                self.record_failure(start, op);
                Ok(None)
            }
        }
    }

    fn terminal(&mut self, op: &'a Operator, end: Option<usize>) -> Option<Match<'a>> {
        let start = self.pos;
        match end {
            Some(end) => {
                self.pos = end;
                Some(MatchNode::leaf(
                    op,
                    Span::new(start, end),
                    &self.input[start..end],
                ))
            }
            None => {
                self.tracer.trace_terminal_failure(op, start);
                self.record_failure(start, op);
                None
            }
        }
    }

    fn node(&self, op: &'a Operator, start: usize, children: Vec<Match<'a>>) -> Match<'a> {
        MatchNode::node(op, Span::new(start, self.pos), children)
    }

    fn record_failure(&mut self, pos: usize, op: &'a Operator) {
        let calls = &self.calls;
        let grammars = &self.grammars;
        self.failures.record(pos, op, || {
            calls
                .last()
                .map(|c| grammars.rule(c.grammar, c.rule).name.clone())
        });
    }
}

fn check_arity(rule: &Rule, found: usize) -> Result<(), RuntimeError> {
    if rule.arity() == found {
        return Ok(());
    }
    Err(RuntimeError::ArityMismatch {
        rule: rule.name.clone(),
        expected: rule.arity(),
        found,
    })
}
