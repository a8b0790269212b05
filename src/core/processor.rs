//! The Processor trait and stock processors.
//!
//! A processor is a named, callable transformation attached to a node. The
//! graph never looks inside one; nodes call it with keyword-style
//! [`Inputs`] and get back an optional output value.

use crate::core::context::Inputs;
use crate::core::error::ProcessorResult;
use crate::core::types::Value;
use std::fmt;
use std::sync::Arc;

/// A named callable transformation.
pub trait Processor: Send + Sync {
    /// Display name of this processor.
    fn name(&self) -> &str;

    /// Run the processor. `Ok(None)` means it only had a side effect.
    fn call(&self, inputs: &Inputs) -> ProcessorResult<Option<Value>>;
}

/// Shared handle to a processor.
pub type SharedProcessor = Arc<dyn Processor>;

/// A processor backed by a closure.
pub struct FnProcessor<F> {
    name: String,
    func: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(&Inputs) -> ProcessorResult<Option<Value>> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Processor for FnProcessor<F>
where
    F: Fn(&Inputs) -> ProcessorResult<Option<Value>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, inputs: &Inputs) -> ProcessorResult<Option<Value>> {
        (self.func)(inputs)
    }
}

impl<F> fmt::Debug for FnProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProcessor").field("name", &self.name).finish()
    }
}

/// Prints its `data` argument to stdout and produces nothing.
#[derive(Debug, Clone)]
pub struct PrintProcessor {
    name: String,
}

impl PrintProcessor {
    /// Create a printer with a display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The line printed for a given input.
    pub fn format_line(&self, inputs: &Inputs) -> ProcessorResult<String> {
        let data = inputs.require(&self.name, "data")?;
        Ok(format!("Processor ({}): {}", self.name, data))
    }
}

impl Processor for PrintProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, inputs: &Inputs) -> ProcessorResult<Option<Value>> {
        println!("{}", self.format_line(inputs)?);
        Ok(None)
    }
}

/// Returns its `data` argument unchanged.
#[derive(Debug, Clone, Default)]
pub struct IdentityProcessor;

impl Processor for IdentityProcessor {
    fn name(&self) -> &str {
        "identity"
    }

    fn call(&self, inputs: &Inputs) -> ProcessorResult<Option<Value>> {
        Ok(inputs.get("data").cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProcessorError;

    #[test]
    fn test_fn_processor() {
        let upper = FnProcessor::new("upper", |inputs: &Inputs| {
            let text = inputs.require_str("upper", "data")?;
            Ok(Some(Value::String(text.to_uppercase())))
        });

        assert_eq!(upper.name(), "upper");
        let out = upper.call(&Inputs::new().with("data", "abc")).unwrap();
        assert_eq!(out, Some(Value::from("ABC")));
    }

    #[test]
    fn test_print_processor() {
        let printer = PrintProcessor::new("console");
        let line = printer.format_line(&Inputs::new().with("data", "hi")).unwrap();
        assert_eq!(line, "Processor (console): hi");

        assert!(matches!(
            printer.call(&Inputs::new()),
            Err(ProcessorError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_identity_processor() {
        let out = IdentityProcessor.call(&Inputs::new().with("data", 9i64)).unwrap();
        assert_eq!(out, Some(Value::Integer(9)));
        assert_eq!(IdentityProcessor.call(&Inputs::new()).unwrap(), None);
    }
}
