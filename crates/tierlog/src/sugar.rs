//! Loosely typed logging: format strings and alternating key/value lists

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use tierlog_core::{Field, Result, Severity};
use tierlog_sink::Caller;

use crate::escalation::Fault;
use crate::logger::Logger;

const ODD_NUMBER_ERR_MSG: &str = "Ignored key without a value.";
const NON_STRING_KEY_ERR_MSG: &str = "Ignored key-value pairs with non-string keys.";

/// One argument of the `*w` methods: either half of a key/value pair, or a
/// complete typed field.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    Field(Field),
    Value(Value),
}

impl KeyValue {
    /// A typed field used in value position becomes a `{key: value}` object
    fn to_value(&self) -> Value {
        match self {
            KeyValue::Value(value) => value.clone(),
            KeyValue::Field(field) => {
                let mut object = serde_json::Map::new();
                object.insert(field.key.clone(), field.value.clone());
                Value::Object(object)
            }
        }
    }
}

impl From<Field> for KeyValue {
    fn from(field: Field) -> Self {
        KeyValue::Field(field)
    }
}

impl From<Value> for KeyValue {
    fn from(value: Value) -> Self {
        KeyValue::Value(value)
    }
}

macro_rules! key_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for KeyValue {
                fn from(value: $ty) -> Self {
                    KeyValue::Value(Value::from(value))
                }
            }
        )*
    };
}

key_value_from!(&str, String, bool, i32, i64, u32, u64, f64);

/// Wraps a [`Logger`] with `*f` (formatted) and `*w` (key/value) methods.
///
/// Both views write through the same cores as the logger they came from.
#[derive(Clone, Debug)]
pub struct SugaredLogger {
    base: Logger,
}

impl SugaredLogger {
    pub fn new(base: Logger) -> Self {
        Self { base }
    }

    pub fn desugar(&self) -> &Logger {
        &self.base
    }

    pub fn sync(&self) -> Result<()> {
        self.base.sync()
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        let _ = self.log(Severity::Debug, args, &[]);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        let _ = self.log(Severity::Info, args, &[]);
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        let _ = self.log(Severity::Warn, args, &[]);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        let _ = self.log(Severity::Error, args, &[]);
    }

    #[track_caller]
    pub fn dpanicf(&self, args: fmt::Arguments<'_>) -> std::result::Result<(), Fault> {
        self.log(Severity::DPanic, args, &[])
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> Fault {
        let message = message(args);
        self.write(Severity::Panic, &message, &[]);
        Fault::new(Severity::Panic, message)
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.write(Severity::Fatal, &message(args), &[]);
        self.base.terminate(1)
    }

    #[track_caller]
    pub fn debugw(&self, msg: &str, keys_and_values: &[KeyValue]) {
        let _ = self.log(Severity::Debug, format_args!("{}", msg), keys_and_values);
    }

    #[track_caller]
    pub fn infow(&self, msg: &str, keys_and_values: &[KeyValue]) {
        let _ = self.log(Severity::Info, format_args!("{}", msg), keys_and_values);
    }

    #[track_caller]
    pub fn warnw(&self, msg: &str, keys_and_values: &[KeyValue]) {
        let _ = self.log(Severity::Warn, format_args!("{}", msg), keys_and_values);
    }

    #[track_caller]
    pub fn errorw(&self, msg: &str, keys_and_values: &[KeyValue]) {
        let _ = self.log(Severity::Error, format_args!("{}", msg), keys_and_values);
    }

    #[track_caller]
    pub fn dpanicw(&self, msg: &str, keys_and_values: &[KeyValue]) -> std::result::Result<(), Fault> {
        self.log(Severity::DPanic, format_args!("{}", msg), keys_and_values)
    }

    #[track_caller]
    pub fn panicw(&self, msg: &str, keys_and_values: &[KeyValue]) -> Fault {
        self.write(Severity::Panic, msg, keys_and_values);
        Fault::new(Severity::Panic, msg)
    }

    #[track_caller]
    pub fn fatalw(&self, msg: &str, keys_and_values: &[KeyValue]) -> ! {
        self.write(Severity::Fatal, msg, keys_and_values);
        self.base.terminate(1)
    }

    #[track_caller]
    fn log(
        &self,
        level: Severity,
        args: fmt::Arguments<'_>,
        keys_and_values: &[KeyValue],
    ) -> std::result::Result<(), Fault> {
        let message = message(args);
        self.write(level, &message, keys_and_values);
        self.base.escalate(level, &message)
    }

    #[track_caller]
    fn write(&self, level: Severity, msg: &str, keys_and_values: &[KeyValue]) {
        let caller = Caller::from(Location::caller());
        if !self.base.enabled(level) {
            return;
        }
        let fields = self.sweeten(keys_and_values, caller);
        self.base.write(level, msg, &fields, Some(caller));
    }

    /// Pair up keys and values; typed fields pass through as they are.
    /// Malformed input is reported, not dropped silently.
    fn sweeten(&self, keys_and_values: &[KeyValue], caller: Caller) -> Vec<Field> {
        let mut fields = Vec::with_capacity(keys_and_values.len() / 2);
        let mut invalid = Vec::new();

        let mut idx = 0;
        while idx < keys_and_values.len() {
            let key = match &keys_and_values[idx] {
                KeyValue::Field(field) => {
                    fields.push(field.clone());
                    idx += 1;
                    continue;
                }
                KeyValue::Value(key) => key,
            };

            let Some(value) = keys_and_values.get(idx + 1) else {
                self.base.write(
                    Severity::Error,
                    ODD_NUMBER_ERR_MSG,
                    &[Field::new("ignored", key.clone())],
                    Some(caller),
                );
                break;
            };
            let value = value.to_value();

            match key {
                Value::String(key) => fields.push(Field::new(key.clone(), value)),
                key => invalid.push(serde_json::json!({
                    "position": idx,
                    "key": key,
                    "value": value,
                })),
            }
            idx += 2;
        }

        if !invalid.is_empty() {
            self.base.write(
                Severity::Error,
                NON_STRING_KEY_ERR_MSG,
                &[Field::new("invalid", Value::Array(invalid))],
                Some(caller),
            );
        }
        fields
    }
}

/// A template without arguments is used verbatim
fn message(args: fmt::Arguments<'_>) -> Cow<'static, str> {
    match args.as_str() {
        Some(template) => Cow::Borrowed(template),
        None => Cow::Owned(args.to_string()),
    }
}
