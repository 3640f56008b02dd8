//! Log events and their attached context.

use crate::finite::check_finite;
use crate::level::Level;
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use std::time::SystemTime;

/// Value of an extra field attached at emission time.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A JSON-safe value
    Json(serde_json::Value),
    /// A value whose conversion to JSON failed, with the reason
    Unencodable(String),
}

impl FieldValue {
    /// Convert any serializable value, recording a failure instead of dropping it.
    ///
    /// Non-finite floats count as failures; JSON has no spelling for them.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        if let Err(e) = check_finite(value) {
            return Self::Unencodable(e.to_string());
        }
        match serde_json::to_value(value) {
            Ok(json) => Self::Json(json),
            Err(e) => Self::Unencodable(e.to_string()),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Structured error context: kind, message, formatted trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub kind: String,
    pub message: String,
    pub trace: String,
}

impl ErrorContext {
    pub fn new(
        kind: impl Into<String>,
        message: impl Into<String>,
        trace: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            trace: trace.into(),
        }
    }

    /// Build context from a native error; the `source()` chain becomes the trace.
    pub fn from_error<E: StdError + ?Sized>(error: &E) -> Self {
        let kind = short_type_name(std::any::type_name::<E>());

        let mut trace = String::new();
        let mut source = error.source();
        let mut depth = 0;
        while let Some(cause) = source {
            if depth == 0 {
                trace.push_str("Caused by:");
            }
            trace.push_str(&format!("\n    {depth}: {cause}"));
            depth += 1;
            source = cause.source();
        }

        Self::new(kind, error.to_string(), trace)
    }

    /// Render as a single block of text: trace first, then `kind: message`.
    pub fn render(&self) -> String {
        if self.trace.is_empty() {
            format!("{}: {}", self.kind, self.message)
        } else {
            format!("{}\n{}: {}", self.trace, self.kind, self.message)
        }
    }
}

/// Strip the module path from every type in a name (`(a::B, c::D<e::F>)` → `(B, D<F>)`).
///
/// Only the static type is known, so `std::io::Error` reports as `Error`
/// whatever its kind; the kind is still visible in the message.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut path = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
            continue;
        }
        out.push_str(path.rsplit("::").next().unwrap_or(&path));
        path.clear();
        out.push(c);
    }
    out.push_str(path.rsplit("::").next().unwrap_or(&path));
    out
}

/// An immutable record produced at a call site.
#[derive(Debug, Clone)]
pub struct LogEvent {
    name: String,
    level: Level,
    template: String,
    args: Vec<String>,
    created: SystemTime,
    error: Option<ErrorContext>,
    stack: Option<String>,
    extra: Vec<(String, FieldValue)>,
}

impl LogEvent {
    /// Create an event stamped with the current wall-clock time.
    pub fn new(name: impl Into<String>, level: Level, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            template: template.into(),
            args: Vec::new(),
            created: SystemTime::now(),
            error: None,
            stack: None,
            extra: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_created(mut self, created: SystemTime) -> Self {
        self.created = created;
        self
    }

    pub fn with_error(mut self, error: ErrorContext) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Attach an extra field. A later value for the same key replaces the earlier one.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.extra.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.extra.push((key, value)),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn created(&self) -> SystemTime {
        self.created
    }

    pub fn error(&self) -> Option<&ErrorContext> {
        self.error.as_ref()
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// Look up an extra field by name.
    pub fn extra(&self, key: &str) -> Option<&FieldValue> {
        self.extra.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn extras(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.extra.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The template merged with its positional arguments.
    pub fn message(&self) -> String {
        interpolate(&self.template, &self.args)
    }
}

/// Fill `{}` placeholders left to right; `{{` and `}}` are literal braces.
///
/// With no arguments the template is returned untouched. Placeholders without
/// a matching argument stay as `{}`; surplus arguments are ignored.
pub fn interpolate(template: &str, args: &[String]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut remaining = args.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('{', Some('{')) | ('}', Some('}')) => {
                out.push(c);
                chars.next();
            }
            ('{', Some('}')) => {
                chars.next();
                match remaining.next() {
                    Some(arg) => out.push_str(arg),
                    None => out.push_str("{}"),
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Render positional arguments the way they are stored on an event.
pub fn render_args(args: &[&dyn fmt::Display]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}
