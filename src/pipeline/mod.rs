//! Ordered middleware chain for a single operation.
//!
//! Each step gets the shared context and a [`Next`] continuation. Code before
//! `next.run(ctx)` runs on the way in, code after it on the way out. A step that
//! never calls `next.run` ends the pipeline there.
mod add;

use std::cell::Cell;

pub(crate) use add::{add_transaction, PipelineSettings};

use crate::error::{LedgerError, Result};

pub(crate) trait Step<C> {
    fn name(&self) -> &'static str;
    fn handle(&self, ctx: &mut C, next: &mut Next<'_, C>) -> Result<()>;
}

pub(crate) type Terminal<C> = Box<dyn Fn(&mut C) -> Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The terminal handler ran.
    Completed,
    /// `at` returned without calling its continuation.
    Halted { at: &'static str },
}

#[derive(Default)]
struct Progress {
    last: Cell<&'static str>,
    completed: Cell<bool>,
}

pub(crate) struct Pipeline<C> {
    steps: Vec<Box<dyn Step<C>>>,
    terminal: Terminal<C>,
}

impl<C> Pipeline<C> {
    pub(crate) fn new(terminal: Terminal<C>) -> Self {
        Self {
            steps: Vec::new(),
            terminal,
        }
    }

    pub(crate) fn step(mut self, step: impl Step<C> + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub(crate) fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub(crate) fn run(&self, ctx: &mut C) -> Result<Outcome> {
        let progress = Progress::default();
        dispatch(&self.steps, self.terminal.as_ref(), &progress, ctx)?;
        if progress.completed.get() {
            Ok(Outcome::Completed)
        } else {
            Ok(Outcome::Halted {
                at: progress.last.get(),
            })
        }
    }
}

/// Continuation handed to a step. Runs the remainder of the pipeline at most once.
pub(crate) struct Next<'p, C> {
    step: &'static str,
    rest: &'p [Box<dyn Step<C>>],
    terminal: &'p dyn Fn(&mut C) -> Result<()>,
    progress: &'p Progress,
    called: bool,
}

impl<C> Next<'_, C> {
    pub(crate) fn run(&mut self, ctx: &mut C) -> Result<()> {
        if self.called {
            tracing::error!("step '{}' re-entered its continuation", self.step);
            return Err(LedgerError::InternalReentry {
                step: self.step.to_string(),
            });
        }
        self.called = true;
        dispatch(self.rest, self.terminal, self.progress, ctx)
    }
}

fn dispatch<C>(
    steps: &[Box<dyn Step<C>>],
    terminal: &dyn Fn(&mut C) -> Result<()>,
    progress: &Progress,
    ctx: &mut C,
) -> Result<()> {
    match steps.split_first() {
        Some((step, rest)) => {
            progress.last.set(step.name());
            tracing::trace!("pipeline step {}", step.name());
            let mut next = Next {
                step: step.name(),
                rest,
                terminal,
                progress,
                called: false,
            };
            step.handle(ctx, &mut next)
        }
        None => {
            terminal(ctx)?;
            progress.completed.set(true);
            Ok(())
        }
    }
}
