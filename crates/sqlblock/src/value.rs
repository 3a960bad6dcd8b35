//! Bound values and value handlers.
//!
//! [`Value`] is what ends up in [`ParamQuery::values`](crate::ParamQuery) and what
//! gets formatted into literal SQL by `to_sql()`. Types the engine has no
//! built-in formatting for travel as [`Value::Custom`] and are rendered through a
//! handler registered on the [`Options`](crate::Options) of the builder.

use crate::error::{QbError, QbResult};
use crate::options::Options;
use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value bound to a statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    Uuid(Uuid),
    Json(serde_json::Value),
    /// Expands to `(v1, v2, ...)`, one placeholder per element.
    List(Vec<Value>),
    Custom(CustomValue),
}

impl Value {
    /// Wrap an arbitrary Rust value. It can only be rendered once a handler for
    /// `T` is registered.
    pub fn custom<T: Any + Send + Sync + fmt::Debug>(value: T) -> Self {
        Value::Custom(CustomValue::new(value))
    }

    /// The Rust type a value handler must be registered for to intercept this value.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Null => TypeId::of::<()>(),
            Value::Bool(_) => TypeId::of::<bool>(),
            Value::Int(_) => TypeId::of::<i64>(),
            Value::Float(_) => TypeId::of::<f64>(),
            Value::Text(_) => TypeId::of::<String>(),
            Value::Timestamp(_) => TypeId::of::<NaiveDateTime>(),
            Value::Uuid(_) => TypeId::of::<Uuid>(),
            Value::Json(_) => TypeId::of::<serde_json::Value>(),
            Value::List(_) => TypeId::of::<Vec<Value>>(),
            Value::Custom(c) => c.type_id(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

trait AnyValue: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync + fmt::Debug> AnyValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A caller-defined value carried by [`Value::Custom`].
#[derive(Clone)]
pub struct CustomValue {
    type_name: &'static str,
    inner: Arc<dyn AnyValue>,
}

impl CustomValue {
    pub fn new<T: Any + Send + Sync + fmt::Debug>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn type_id(&self) -> TypeId {
        (*self.inner).as_any().type_id()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomValue").field(&self.inner).finish()
    }
}

// Identity comparison: custom payloads need not implement PartialEq.
impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Timestamp(ts) => ts.serialize(serializer),
            Value::Uuid(id) => id.serialize(serializer),
            Value::Json(json) => json.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Custom(c) => serializer.serialize_str(&format!("{:?}", c.inner)),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(i64::from(v))
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// What a value handler produced.
#[derive(Clone, Debug, PartialEq)]
pub enum HandlerOutput {
    /// Bind (parameterized) or format (string mode) this value instead.
    Value(Value),
    /// Embed this text verbatim. It is never bound as a parameter.
    Raw(String),
}

/// Handler signature: `(value, as_param)`.
///
/// With `as_param = true` the result is handed to the driver, so returning the
/// value unchanged is the usual choice. With `as_param = false` the result is
/// embedded in SQL text and must be literal-safe.
pub type ValueHandlerFn = dyn Fn(&Value, bool) -> HandlerOutput + Send + Sync;

/// Value handlers keyed by the Rust type they intercept.
#[derive(Clone, Default)]
pub struct ValueHandlers {
    handlers: Vec<(TypeId, Arc<ValueHandlerFn>)>,
}

impl ValueHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for values of type `T`, replacing any earlier one.
    pub fn register<T, F>(&mut self, handler: F)
    where
        T: Any,
        F: Fn(&Value, bool) -> HandlerOutput + Send + Sync + 'static,
    {
        let id = TypeId::of::<T>();
        self.handlers.retain(|(tid, _)| *tid != id);
        self.handlers.push((id, Arc::new(handler)));
    }

    pub fn get(&self, type_id: TypeId) -> Option<&ValueHandlerFn> {
        self.handlers
            .iter()
            .find(|(tid, _)| *tid == type_id)
            .map(|(_, handler)| handler.as_ref())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ValueHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueHandlers")
            .field("count", &self.handlers.len())
            .finish()
    }
}

/// Format a value as a SQL literal, consulting registered handlers first.
pub(crate) fn format_literal(value: &Value, options: &Options) -> QbResult<String> {
    if let Some(handler) = options.value_handlers.get(value.type_id()) {
        return match handler(value, false) {
            HandlerOutput::Raw(text) => Ok(text),
            HandlerOutput::Value(v) => format_builtin(&v, options),
        };
    }
    format_builtin(value, options)
}

fn format_builtin(value: &Value, options: &Options) -> QbResult<String> {
    Ok(match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_nan() => "'NaN'".to_string(),
        Value::Float(f) if f.is_infinite() => {
            if f.is_sign_positive() {
                "'Infinity'".to_string()
            } else {
                "'-Infinity'".to_string()
            }
        }
        Value::Float(f) => f.to_string(),
        Value::Text(s) => quote_string(s, options),
        Value::Timestamp(ts) => format!("'{}'", ts.format(TIMESTAMP_FORMAT)),
        Value::Uuid(id) => format!("'{id}'"),
        Value::Json(json) => quote_string(&json.to_string(), options),
        Value::List(items) => {
            let parts = items
                .iter()
                .map(|item| format_literal(item, options))
                .collect::<QbResult<Vec<_>>>()?;
            format!("({})", parts.join(", "))
        }
        Value::Custom(c) => {
            return Err(QbError::invalid(format!(
                "no value handler registered for {}",
                c.type_name()
            )));
        }
    })
}

fn quote_string(s: &str, options: &Options) -> String {
    if options.replace_single_quotes {
        format!("'{}'", s.replace('\'', &options.single_quote_replacement))
    } else {
        format!("'{s}'")
    }
}
