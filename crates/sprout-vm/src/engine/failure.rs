//! Furthest-failure bookkeeping for diagnostics.

use sprout_core::Operator;

/// The deepest position any operator failed at, and what was expected there.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure<'a> {
    pub pos: usize,
    /// Distinct operators that failed at `pos`, in the order they failed.
    pub expected: Vec<&'a Operator>,
    /// Innermost rule being evaluated when the first of them failed.
    pub rule: Option<String>,
}

impl Failure<'_> {
    /// Human-readable summary such as `expected '+' or end of input`.
    pub fn message(&self) -> String {
        let mut names: Vec<String> = Vec::new();
        for op in &self.expected {
            let desc = op.describe();
            if !names.contains(&desc) {
                names.push(desc);
            }
        }
        match names.split_last() {
            None => "unexpected input".to_string(),
            Some((last, [])) => format!("expected {last}"),
            Some((last, rest)) => format!("expected {} or {last}", rest.join(", ")),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FailureTracker<'a> {
    furthest: Option<Failure<'a>>,
    /// While positive, failures are expected (inside a negative lookahead).
    suppress_depth: u32,
}

impl<'a> FailureTracker<'a> {
    pub fn record(
        &mut self,
        pos: usize,
        op: &'a Operator,
        rule: impl FnOnce() -> Option<String>,
    ) {
        if self.suppress_depth > 0 {
            return;
        }
        match &mut self.furthest {
            Some(f) if f.pos > pos => {}
            Some(f) if f.pos == pos => {
                if !f.expected.iter().any(|e| std::ptr::eq(*e, op)) {
                    f.expected.push(op);
                }
            }
            _ => {
                self.furthest = Some(Failure {
                    pos,
                    expected: vec![op],
                    rule: rule(),
                })
            }
        }
    }

    #[inline]
    pub fn suppress(&mut self) {
        self.suppress_depth += 1;
    }

    #[inline]
    pub fn unsuppress(&mut self) {
        self.suppress_depth -= 1;
    }

    pub fn furthest(&self) -> Option<&Failure<'a>> {
        self.furthest.as_ref()
    }

    pub fn clear(&mut self) {
        self.furthest = None;
        self.suppress_depth = 0;
    }
}
