//! Dispatcher: current input values, output slots, and re-evaluation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{BindingError, BindingResult};
use crate::registry::{Binding, BindingRegistry};
use crate::value::ControlValue;

/// Holds input values and output results for one interaction scope.
///
/// The registry and context are shared; the value maps are owned, so a
/// dispatcher can be created per request without locking.
pub struct Dispatcher<C, F> {
    registry: Arc<BindingRegistry<C, F>>,
    context: Arc<C>,
    inputs: HashMap<String, ControlValue>,
    outputs: HashMap<String, F>,
}

impl<C, F> Dispatcher<C, F> {
    pub fn new(registry: Arc<BindingRegistry<C, F>>, context: Arc<C>) -> Self {
        Self {
            registry,
            context,
            inputs: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    /// Store an input value without evaluating anything.
    pub fn seed(&mut self, input: &str, value: ControlValue) -> BindingResult<()> {
        if !self.registry.is_input(input) {
            return Err(BindingError::UnknownInput(input.to_string()));
        }
        self.inputs.insert(input.to_string(), value);
        Ok(())
    }

    /// Update an input. If the value changed, every binding reading it is
    /// re-evaluated and its output slot replaced. Returns the refreshed
    /// output ids in registration order; empty when nothing changed.
    ///
    /// Either every subscriber succeeds and the value and outputs are
    /// committed together, or nothing is stored.
    pub fn set_input(&mut self, input: &str, value: ControlValue) -> BindingResult<Vec<String>> {
        if !self.registry.is_input(input) {
            return Err(BindingError::UnknownInput(input.to_string()));
        }
        if self.inputs.get(input) == Some(&value) {
            trace!(input, "input unchanged");
            return Ok(Vec::new());
        }

        let registry = Arc::clone(&self.registry);
        let staged = registry
            .subscribers(input)
            .map(|binding| {
                let result = self.compute(binding, Some((input, &value)))?;
                Ok((binding.output(), result))
            })
            .collect::<BindingResult<Vec<_>>>()?;

        self.inputs.insert(input.to_string(), value);
        let refreshed = self.commit(staged);
        debug!(input, ?refreshed, "input changed");
        Ok(refreshed)
    }

    /// Evaluate every binding, e.g. for the first render. Outputs are only
    /// replaced when all bindings succeed.
    pub fn evaluate_all(&mut self) -> BindingResult<Vec<String>> {
        let registry = Arc::clone(&self.registry);
        let staged = registry
            .bindings()
            .iter()
            .map(|binding| Ok((binding.output(), self.compute(binding, None)?)))
            .collect::<BindingResult<Vec<_>>>()?;
        Ok(self.commit(staged))
    }

    /// Evaluate one output against the current inputs without touching
    /// its slot.
    pub fn evaluate(&self, output: &str) -> BindingResult<F> {
        let binding = self
            .registry
            .get(output)
            .ok_or_else(|| BindingError::UnknownOutput(output.to_string()))?;
        self.compute(binding, None)
    }

    /// Run one binding. `pending` overrides a stored input value.
    fn compute(
        &self,
        binding: &Binding<C, F>,
        pending: Option<(&str, &ControlValue)>,
    ) -> BindingResult<F> {
        let values = binding
            .inputs()
            .iter()
            .map(|input| {
                let value = match pending {
                    Some((id, value)) if id == input => Some(value),
                    _ => self.inputs.get(input),
                };
                value.cloned().ok_or_else(|| BindingError::MissingInput {
                    output: binding.output().to_string(),
                    input: input.clone(),
                })
            })
            .collect::<BindingResult<Vec<_>>>()?;

        binding.evaluate(&self.context, &values)
    }

    fn commit(&mut self, staged: Vec<(&str, F)>) -> Vec<String> {
        staged
            .into_iter()
            .map(|(output, result)| {
                self.outputs.insert(output.to_string(), result);
                output.to_string()
            })
            .collect()
    }

    pub fn input(&self, input: &str) -> Option<&ControlValue> {
        self.inputs.get(input)
    }

    pub fn output(&self, output: &str) -> Option<&F> {
        self.outputs.get(output)
    }

    pub fn context(&self) -> &C {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Context counting callback invocations.
    #[derive(Default)]
    struct Calls {
        label: AtomicUsize,
        sum: AtomicUsize,
    }

    fn registry() -> Arc<BindingRegistry<Calls, String>> {
        let mut registry: BindingRegistry<Calls, String> = BindingRegistry::new();
        registry
            .register("label", ["site"], |ctx: &Calls, values: &[ControlValue]| {
                ctx.label.fetch_add(1, Ordering::SeqCst);
                Ok(format!("site={}", values[0].as_text("site")?))
            })
            .unwrap();
        registry
            .register(
                "summary",
                ["site", "range"],
                |ctx: &Calls, values: &[ControlValue]| {
                    ctx.sum.fetch_add(1, Ordering::SeqCst);
                    let site = values[0].as_text("site")?;
                    let (low, high) = values[1].as_range("range")?;
                    Ok(format!("{site}:{low}-{high}"))
                },
            )
            .unwrap();
        Arc::new(registry)
    }

    fn dispatcher() -> Dispatcher<Calls, String> {
        Dispatcher::new(registry(), Arc::new(Calls::default()))
    }

    #[test]
    fn evaluate_all_fills_every_output() {
        let mut d = dispatcher();
        d.seed("site", ControlValue::text("ALL")).unwrap();
        d.seed("range", ControlValue::range(0.0, 10.0)).unwrap();

        let refreshed = d.evaluate_all().unwrap();
        assert_eq!(refreshed, vec!["label", "summary"]);
        assert_eq!(d.output("label").unwrap(), "site=ALL");
        assert_eq!(d.output("summary").unwrap(), "ALL:0-10");
    }

    #[test]
    fn shared_input_refreshes_both_outputs() {
        let mut d = dispatcher();
        d.seed("range", ControlValue::range(0.0, 10.0)).unwrap();

        let refreshed = d.set_input("site", ControlValue::text("KSC")).unwrap();
        assert_eq!(refreshed, vec!["label", "summary"]);
        assert_eq!(d.output("summary").unwrap(), "KSC:0-10");
    }

    #[test]
    fn private_input_refreshes_only_its_output() {
        let mut d = dispatcher();
        d.seed("site", ControlValue::text("ALL")).unwrap();
        d.seed("range", ControlValue::range(0.0, 10.0)).unwrap();
        d.evaluate_all().unwrap();

        let refreshed = d.set_input("range", ControlValue::range(5.0, 10.0)).unwrap();
        assert_eq!(refreshed, vec!["summary"]);
        assert_eq!(d.context().label.load(Ordering::SeqCst), 1);
        assert_eq!(d.context().sum.load(Ordering::SeqCst), 2);
        assert_eq!(d.output("summary").unwrap(), "ALL:5-10");
    }

    #[test]
    fn unchanged_value_refreshes_nothing() {
        let mut d = dispatcher();
        d.seed("range", ControlValue::range(0.0, 10.0)).unwrap();
        d.set_input("site", ControlValue::text("ALL")).unwrap();

        let refreshed = d.set_input("site", ControlValue::text("ALL")).unwrap();
        assert!(refreshed.is_empty());
        assert_eq!(d.context().label.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_input_rejected() {
        let mut d = dispatcher();
        assert_eq!(
            d.set_input("colour", ControlValue::text("red")),
            Err(BindingError::UnknownInput("colour".to_string()))
        );
        assert!(d.seed("colour", ControlValue::text("red")).is_err());
    }

    #[test]
    fn missing_input_reported() {
        let mut d = dispatcher();
        let err = d.set_input("site", ControlValue::text("ALL")).unwrap_err();
        assert_eq!(
            err,
            BindingError::MissingInput {
                output: "summary".to_string(),
                input: "range".to_string(),
            }
        );
    }

    #[test]
    fn type_mismatch_surfaces_from_callback() {
        let mut d = dispatcher();
        d.seed("site", ControlValue::text("ALL")).unwrap();
        let err = d.set_input("range", ControlValue::text("wide")).unwrap_err();
        assert!(matches!(err, BindingError::InputType { expected: "range", .. }));
    }

    #[test]
    fn evaluate_leaves_slot_untouched() {
        let mut d = dispatcher();
        d.seed("site", ControlValue::text("ALL")).unwrap();
        d.seed("range", ControlValue::range(1.0, 2.0)).unwrap();

        assert_eq!(d.evaluate("summary").unwrap(), "ALL:1-2");
        assert!(d.output("summary").is_none());
        assert_eq!(d.context().label.load(Ordering::SeqCst), 0);
        assert_eq!(
            d.evaluate("chart"),
            Err(BindingError::UnknownOutput("chart".to_string()))
        );
    }

    #[test]
    fn failed_refresh_commits_nothing() {
        let mut d = dispatcher();
        d.seed("site", ControlValue::text("ALL")).unwrap();
        d.seed("range", ControlValue::range(0.0, 1.0)).unwrap();
        d.evaluate_all().unwrap();

        // A bad range is rejected and never stored.
        assert!(d.set_input("range", ControlValue::text("bad")).is_err());
        assert_eq!(d.input("range"), Some(&ControlValue::range(0.0, 1.0)));
        assert_eq!(d.output("summary").unwrap(), "ALL:0-1");

        // "label" succeeds but "summary" fails: neither output moves.
        d.seed("range", ControlValue::text("bad")).unwrap();
        assert!(d.set_input("site", ControlValue::text("KSC")).is_err());
        assert_eq!(d.input("site"), Some(&ControlValue::text("ALL")));
        assert_eq!(d.output("label").unwrap(), "site=ALL");
        assert_eq!(d.output("summary").unwrap(), "ALL:0-1");

        // Once the range is valid again, the same site change goes through.
        d.seed("range", ControlValue::range(0.0, 1.0)).unwrap();
        let refreshed = d.set_input("site", ControlValue::text("KSC")).unwrap();
        assert_eq!(refreshed, vec!["label", "summary"]);
        assert_eq!(d.output("label").unwrap(), "site=KSC");
        assert_eq!(d.output("summary").unwrap(), "KSC:0-1");
    }

    #[test]
    fn failed_evaluate_all_keeps_outputs() {
        let mut d = dispatcher();
        d.seed("site", ControlValue::text("ALL")).unwrap();
        d.seed("range", ControlValue::range(0.0, 1.0)).unwrap();
        d.evaluate_all().unwrap();

        d.seed("range", ControlValue::text("bad")).unwrap();
        assert!(d.evaluate_all().is_err());
        assert_eq!(d.output("label").unwrap(), "site=ALL");
        assert_eq!(d.output("summary").unwrap(), "ALL:0-1");
    }
}
