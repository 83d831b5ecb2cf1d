//! Write destinations for animated values.

use crate::error::{AnimateError, Result};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("unknown property `{property}`")]
    UnknownProperty { property: String },

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single settable key/value slot, such as one style property of one
/// element.
pub trait StyleSink {
    fn set(&mut self, property: &str, value: &str) -> std::result::Result<(), SinkError>;
}

impl<S: StyleSink + ?Sized> StyleSink for Box<S> {
    fn set(&mut self, property: &str, value: &str) -> std::result::Result<(), SinkError> {
        (**self).set(property, value)
    }
}

/// Records every write in order.
#[derive(Default, Debug)]
pub struct RecordingSink {
    pub writes: Vec<(String, String)>,
}

impl RecordingSink {
    /// The written values for `property`, in write order.
    pub fn values_of<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.writes
            .iter()
            .filter(move |(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }
}

impl StyleSink for RecordingSink {
    fn set(&mut self, property: &str, value: &str) -> std::result::Result<(), SinkError> {
        self.writes.push((property.to_string(), value.to_string()));
        Ok(())
    }
}

/// Where a sweep writes: one property of one element, with a unit suffix.
#[derive(Debug)]
pub struct StyleTarget<S> {
    element: String,
    property: String,
    unit: String,
    sink: S,
}

impl<S: StyleSink> StyleTarget<S> {
    pub fn new(
        element: impl Into<String>,
        property: impl Into<String>,
        unit: impl Into<String>,
        sink: S,
    ) -> Self {
        Self {
            element: element.into(),
            property: property.into(),
            unit: unit.into(),
            sink,
        }
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Render `value` with the unit appended, e.g. `19px`.
    pub fn format(&self, value: f64) -> String {
        format!("{value}{}", self.unit)
    }

    pub fn write(&mut self, value: f64) -> Result<()> {
        let text = self.format(value);
        self.sink
            .set(&self.property, &text)
            .map_err(|source| AnimateError::SinkWrite {
                element: self.element.clone(),
                property: self.property.clone(),
                value: text,
                source,
            })
    }
}
