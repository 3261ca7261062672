//! # Processing Pipeline
//!
//! An ordered chain of transformations over raw mitem bytes. Each step
//! receives the previous step's output; the first failure stops the chain
//! and is returned unchanged. An empty pipeline returns its input.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Errors from a processing step.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// A step rejected its input.
    #[error("step {step:?} failed: {reason}")]
    StepFailed {
        /// Name of the failing step.
        step: String,
        /// Why it failed.
        reason: String,
    },

    /// A step could not read or write JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One transformation of raw mitem bytes.
pub trait ProcessStep: Send + Sync + fmt::Debug {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Transform `input` into the next document.
    fn apply(&self, input: &[u8]) -> Result<Vec<u8>, ProcessError>;
}

/// A named step backed by a closure.
pub struct FnStep<F> {
    name: String,
    f: F,
}

impl<F> FnStep<F>
where
    F: Fn(&[u8]) -> Result<Vec<u8>, ProcessError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnStep<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep").field("name", &self.name).finish()
    }
}

impl<F> ProcessStep for FnStep<F>
where
    F: Fn(&[u8]) -> Result<Vec<u8>, ProcessError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, input: &[u8]) -> Result<Vec<u8>, ProcessError> {
        (self.f)(input)
    }
}

/// Ordered chain of [`ProcessStep`]s. Cheap to clone; steps are shared.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn ProcessStep>>,
}

impl Pipeline {
    /// An empty pipeline (the identity).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn with_step(mut self, step: impl ProcessStep + 'static) -> Self {
        self.push(step);
        self
    }

    /// Append a step in place.
    pub fn push(&mut self, step: impl ProcessStep + 'static) {
        self.steps.push(Arc::new(step));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names, in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order, feeding each the previous output.
    pub fn process(&self, input: &[u8]) -> Result<Vec<u8>, ProcessError> {
        if self.steps.is_empty() {
            return Ok(input.to_vec());
        }
        tracing::debug!(steps = ?self.step_names(), "running pipeline");
        let mut current = input.to_vec();
        for step in &self.steps {
            current = step.apply(&current).map_err(|e| {
                tracing::warn!(step = step.name(), error = %e, "processing step failed");
                e
            })?;
            tracing::trace!(step = step.name(), bytes = current.len(), "processing step applied");
        }
        Ok(current)
    }
}
