//! Binding registry: output id → (callback, ordered input ids).

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{BindingError, BindingResult};
use crate::value::ControlValue;

/// Pure function from (context, input values in declared order) to output.
pub type Callback<C, F> = Arc<dyn Fn(&C, &[ControlValue]) -> BindingResult<F> + Send + Sync>;

/// One registered output and the inputs it subscribes to.
pub struct Binding<C, F> {
    output: String,
    inputs: Vec<String>,
    callback: Callback<C, F>,
}

impl<C, F> Binding<C, F> {
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn reads(&self, input: &str) -> bool {
        self.inputs.iter().any(|i| i == input)
    }

    pub fn evaluate(&self, context: &C, values: &[ControlValue]) -> BindingResult<F> {
        (self.callback)(context, values)
    }
}

impl<C, F> fmt::Debug for Binding<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// Registry of bindings, built once at startup and shared read-only.
pub struct BindingRegistry<C, F> {
    bindings: Vec<Binding<C, F>>,
}

impl<C, F> Default for BindingRegistry<C, F> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<C, F> BindingRegistry<C, F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `output` to `callback`, fed by `inputs` in the given order.
    /// Each output may be bound once.
    pub fn register<I, S>(
        &mut self,
        output: &str,
        inputs: I,
        callback: impl Fn(&C, &[ControlValue]) -> BindingResult<F> + Send + Sync + 'static,
    ) -> BindingResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.get(output).is_some() {
            return Err(BindingError::DuplicateOutput(output.to_string()));
        }
        let inputs: Vec<String> = inputs.into_iter().map(Into::into).collect();
        if inputs.is_empty() {
            return Err(BindingError::NoInputs(output.to_string()));
        }
        debug!(output, ?inputs, "binding registered");
        self.bindings.push(Binding {
            output: output.to_string(),
            inputs,
            callback: Arc::new(callback),
        });
        Ok(())
    }

    pub fn get(&self, output: &str) -> Option<&Binding<C, F>> {
        self.bindings.iter().find(|b| b.output == output)
    }

    /// Bindings that read `input`, in registration order.
    pub fn subscribers<'a>(&'a self, input: &'a str) -> impl Iterator<Item = &'a Binding<C, F>> {
        self.bindings.iter().filter(move |b| b.reads(input))
    }

    pub fn bindings(&self) -> &[Binding<C, F>] {
        &self.bindings
    }

    /// True if at least one binding reads `input`.
    pub fn is_input(&self, input: &str) -> bool {
        self.subscribers(input).next().is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
