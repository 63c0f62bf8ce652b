//! SDK identity and POST body stamping.

use crate::{Error, Result};
use serde_json::{Map, Value};

/// Body field that carries the SDK identity on POST requests.
pub const ORIGIN_FIELD: &str = "origin";

/// The name and version of the SDK issuing requests.
///
/// Resolved once when a client is built and stamped into every POST body as
/// `"origin": "<name>@<version>"`.
///
/// # Examples
///
/// ```
/// use homebound::SdkIdentity;
///
/// let identity = SdkIdentity::new("rust-sdk", "2.1.0");
/// assert_eq!(identity.tag(), "rust-sdk@2.1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkIdentity {
    name: String,
    version: String,
}

impl SdkIdentity {
    /// Creates an identity from an explicit name and version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// The identity of this crate, taken from its package metadata.
    pub fn current() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// The SDK name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The SDK version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The `<name>@<version>` tag written to the origin field.
    pub fn tag(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Returns `body` with the origin field set to this identity's tag.
    ///
    /// Any caller-supplied `origin` value is overwritten. A `null` body becomes
    /// an object holding only the origin field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if `body` is neither an object
    /// nor `null`.
    pub fn stamp(&self, body: Value) -> Result<Value> {
        let mut object = match body {
            Value::Object(object) => object,
            Value::Null => Map::new(),
            other => {
                return Err(Error::SerializationFailed(format!(
                    "POST body must be a JSON object, got {}",
                    kind(&other)
                )))
            }
        };
        object.insert(ORIGIN_FIELD.to_string(), Value::String(self.tag()));
        Ok(Value::Object(object))
    }
}

impl Default for SdkIdentity {
    fn default() -> Self {
        Self::current()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
