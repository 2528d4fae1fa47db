//! The swappable argument/result codec.
//!
//! The dispatcher hands frame bodies to a [`Serializer`] for argument
//! binding and return-value encoding; the wire representation is a policy
//! choice outside the dispatch core. [`JsonSerializer`] is the default: a
//! request body is a JSON array of arguments, a response body is the JSON
//! encoding of the return value.

use serde_json::Value;

use crate::fault::DispatchFault;
use crate::registry::ParamShape;

/// Encodes return values and binds frame bodies to declared parameter
/// shapes.
pub trait Serializer: Send + Sync {
    /// Encode a return value into a response frame body.
    fn serialize(&self, value: &Value) -> Result<Vec<u8>, DispatchFault>;

    /// Decode a request body into one argument per declared shape.
    ///
    /// Arity or type mismatches (and undecodable bodies) are binding
    /// faults.
    fn bind(&self, body: &[u8], shapes: &[ParamShape]) -> Result<Vec<Value>, DispatchFault>;
}

/// Default codec: JSON-array request bodies, JSON response bodies.
///
/// An empty body binds as zero arguments, so no-argument actions can be
/// invoked without a payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl JsonSerializer {
    /// Create the JSON codec.
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<Vec<u8>, DispatchFault> {
        serde_json::to_vec(value).map_err(|e| DispatchFault::Binding(e.to_string()))
    }

    fn bind(&self, body: &[u8], shapes: &[ParamShape]) -> Result<Vec<Value>, DispatchFault> {
        let args: Vec<Value> = if body.is_empty() {
            Vec::new()
        } else {
            match serde_json::from_slice(body) {
                Ok(Value::Array(args)) => args,
                Ok(other) => {
                    return Err(DispatchFault::Binding(format!(
                        "expected argument array, got {}",
                        kind_of(&other)
                    )))
                }
                Err(e) => return Err(DispatchFault::Binding(e.to_string())),
            }
        };

        if args.len() != shapes.len() {
            return Err(DispatchFault::Binding(format!(
                "expected {} arguments, got {}",
                shapes.len(),
                args.len()
            )));
        }
        for (index, (arg, shape)) in args.iter().zip(shapes).enumerate() {
            if !shape.matches(arg) {
                return Err(DispatchFault::Binding(format!(
                    "argument {} does not match shape {}",
                    index,
                    shape.name()
                )));
            }
        }
        Ok(args)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
