//! Static description of a registered handler.

use std::fmt;

use rivet_core::{ShapeLint, StructShape};

/// The four handler shapes the adapter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    NoInputNoOutput,
    NoInputOutput,
    InputNoOutput,
    InputOutput,
}

impl Arity {
    pub fn new(has_input: bool, has_output: bool) -> Self {
        match (has_input, has_output) {
            (false, false) => Self::NoInputNoOutput,
            (false, true) => Self::NoInputOutput,
            (true, false) => Self::InputNoOutput,
            (true, true) => Self::InputOutput,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoInputNoOutput => "no-input/no-output",
            Self::NoInputOutput => "no-input/output",
            Self::InputNoOutput => "input/no-output",
            Self::InputOutput => "input/output",
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The handler's input struct.
#[derive(Debug, Clone, Copy)]
pub struct InputDescriptor {
    /// Full Rust type name.
    pub type_name: &'static str,
    /// Binding shape of the type.
    pub shape: &'static StructShape,
}

/// Everything learned about a handler when it is registered.
///
/// Computed once from the handler's type and kept with its route.
#[derive(Debug, Clone)]
pub struct HandlerDescriptor {
    /// Full Rust path of the handler function.
    pub name: &'static str,
    pub input: Option<InputDescriptor>,
    /// Output type name; `None` when the handler returns `()`.
    pub output: Option<&'static str>,
}

impl HandlerDescriptor {
    pub fn arity(&self) -> Arity {
        Arity::new(self.input.is_some(), self.output.is_some())
    }

    /// Problems in the input shape that will fail requests at bind time.
    pub fn lints(&self) -> Vec<ShapeLint> {
        self.input
            .map(|input| input.shape.lint())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_display() {
        assert_eq!(Arity::new(false, false).to_string(), "no-input/no-output");
        assert_eq!(Arity::new(false, true).to_string(), "no-input/output");
        assert_eq!(Arity::new(true, false).to_string(), "input/no-output");
        assert_eq!(Arity::new(true, true).to_string(), "input/output");
    }

    #[test]
    fn test_descriptor_without_input_has_no_lints() {
        let descriptor = HandlerDescriptor {
            name: "health",
            input: None,
            output: None,
        };
        assert_eq!(descriptor.arity(), Arity::NoInputNoOutput);
        assert!(descriptor.lints().is_empty());
    }
}
