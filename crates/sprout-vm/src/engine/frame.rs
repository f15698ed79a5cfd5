//! Parameter environments for invoked rules.
//!
//! Implements the cactus stack pattern: every invocation pushes a frame
//! binding the callee's formal arguments to the caller's operators. An
//! argument is evaluated in the environment of the frame that supplied it,
//! so the "current" pointer can temporarily move below the top of the
//! arena while newer frames stay allocated.

use sprout_core::Operator;

use super::grammars::GrammarId;

#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Formal argument names of the invoked rule.
    pub names: &'a [String],
    /// Operators supplied by the caller, positionally.
    pub args: &'a [Operator],
    /// Environment the arguments are evaluated in.
    pub parent: Option<u32>,
    /// Grammar the arguments belong to.
    pub grammar: GrammarId,
}

impl<'a> Frame<'a> {
    /// Operator bound to `name`, if it names a formal argument.
    pub fn lookup(&self, name: &str) -> Option<&'a Operator> {
        let index = self.names.iter().position(|n| n == name)?;
        self.args.get(index)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FrameMark {
    len: usize,
    current: Option<u32>,
}

/// Append-only arena of parameter frames.
#[derive(Debug, Default)]
pub struct FrameArena<'a> {
    frames: Vec<Frame<'a>>,
    current: Option<u32>,
}

impl<'a> FrameArena<'a> {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            current: None,
        }
    }

    /// Push a frame whose arguments close over the current environment.
    pub fn push(
        &mut self,
        names: &'a [String],
        args: &'a [Operator],
        grammar: GrammarId,
    ) -> u32 {
        let idx = self.frames.len() as u32;
        self.frames.push(Frame {
            names,
            args,
            parent: self.current,
            grammar,
        });
        self.current = Some(idx);
        idx
    }

    /// Snapshot to return to once an invocation completes.
    #[inline]
    pub fn mark(&self) -> FrameMark {
        FrameMark {
            len: self.frames.len(),
            current: self.current,
        }
    }

    /// Drop every frame allocated since `mark` and restore its environment.
    ///
    /// Nothing outside an invocation refers to its frames, so they can be
    /// released as soon as it returns.
    pub fn pop_to(&mut self, mark: FrameMark) {
        self.frames.truncate(mark.len);
        self.current = mark.current;
    }

    #[inline]
    pub fn restore(&mut self, env: Option<u32>) {
        self.current = env;
    }

    #[inline]
    pub fn current(&self) -> Option<u32> {
        self.current
    }

    #[inline]
    pub fn current_frame(&self) -> Option<&Frame<'a>> {
        self.current.map(|i| &self.frames[i as usize])
    }

    /// Number of allocated frames, including ones below the current pointer.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.current = None;
    }
}
