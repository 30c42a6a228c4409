//! Conversions that may run script code, and value rendering.

use crate::interpreter::error::{EvalResult, RuntimeError};
use crate::interpreter::object::{self, Callable, ObjectKind, PropertyKey};
use crate::interpreter::value::Value;
use crate::interpreter::Interpreter;
use crate::parser::interner::sym;
use std::rc::Rc;

/// Preferred result type for `ToPrimitive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hint {
    Default,
    Number,
    String,
}

/// Arrays nested deeper than this render as `[...]`.
const MAX_RENDER_DEPTH: usize = 3;

impl Interpreter {
    /// ToPrimitive: objects try `valueOf` and `toString` in hint order.
    pub(crate) fn to_primitive(&mut self, value: &Value, hint: Hint) -> EvalResult<Value> {
        let object = match value {
            Value::Object(object) => object.clone(),
            _ => return Ok(value.clone()),
        };

        let order = match hint {
            Hint::String => [sym::TO_STRING, sym::VALUE_OF],
            Hint::Default | Hint::Number => [sym::VALUE_OF, sym::TO_STRING],
        };
        for method in order {
            let function = object::get(&object, PropertyKey::Name(method));
            if function.is_callable() {
                let result = self.call(&function, value.clone(), &[])?;
                if !matches!(result, Value::Object(_)) {
                    return Ok(result);
                }
            }
        }

        Err(RuntimeError::type_error("cannot convert object to primitive value"))
    }

    pub(crate) fn to_number(&mut self, value: &Value) -> EvalResult<f64> {
        Ok(self.to_primitive(value, Hint::Number)?.primitive_to_number())
    }

    pub(crate) fn to_string(&mut self, value: &Value) -> EvalResult<Rc<str>> {
        Ok(self.to_primitive(value, Hint::String)?.primitive_to_string())
    }

    /// ToPropertyKey
    pub(crate) fn to_property_key(&mut self, value: &Value) -> EvalResult<PropertyKey> {
        match value {
            Value::Number(n) => Ok(PropertyKey::from_number(&mut self.interner, *n)),
            Value::String(s) => Ok(PropertyKey::from_text(&mut self.interner, s)),
            other => {
                let text = self.to_string(other)?;
                Ok(PropertyKey::from_text(&mut self.interner, &text))
            }
        }
    }

    /// Render a value without running script code, quoting strings.
    /// Used in assertion messages.
    pub fn inspect(&self, value: &Value) -> String {
        match value {
            Value::String(s) => format!("{:?}", s),
            other => self.render_depth(other, 0),
        }
    }

    /// Render a value without running script code, the way `print` would
    /// show it for the common cases.
    pub fn render(&self, value: &Value) -> String {
        self.render_depth(value, 0)
    }

    fn render_depth(&self, value: &Value, depth: usize) -> String {
        let object = match value {
            Value::Object(object) => object,
            primitive => return primitive.primitive_to_string().to_string(),
        };

        let obj = object.borrow();
        match &obj.kind {
            ObjectKind::Function(Callable::Closure(closure)) => closure.source.to_string(),
            ObjectKind::Function(_) => {
                let name = match obj.get_own(PropertyKey::Name(sym::NAME)) {
                    Some(Value::String(name)) => name,
                    _ => Rc::from(""),
                };
                format!("function {}() {{ [native code] }}", name)
            }
            ObjectKind::Array(elements) => {
                if depth >= MAX_RENDER_DEPTH {
                    return "[...]".to_string();
                }
                elements
                    .iter()
                    .map(|element| match element {
                        Value::Undefined | Value::Null => String::new(),
                        other => self.render_depth(other, depth + 1),
                    })
                    .collect::<Vec<_>>()
                    .join(",")
            }
            ObjectKind::Error(kind) => {
                // Shared borrows only, so reading through the chain is fine
                let name = match object::get(object, PropertyKey::Name(sym::NAME)) {
                    Value::String(name) => name.to_string(),
                    _ => kind.name().to_string(),
                };
                match object::get(object, PropertyKey::Name(sym::MESSAGE)) {
                    Value::String(message) if !message.is_empty() => format!("{}: {}", name, message),
                    _ => name,
                }
            }
            _ => format!("[object {}]", obj.class_name()),
        }
    }
}
