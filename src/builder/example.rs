//! Example builder
//!
//! An example carries at most one value form: `dataValue`, `serializedValue`,
//! `externalValue` or the inline `value`. Setting a second form fails right
//! away; setting the same form again replaces it.

use serde_json::Value;

use super::{BuildsModel, Persistent};
use crate::error::{BuildError, Result};
use crate::model::{self, Extensions};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Example {
    summary: Option<String>,
    description: Option<String>,
    data_value: Option<Value>,
    serialized_value: Option<String>,
    external_value: Option<String>,
    value: Option<Value>,
    extensions: Extensions,
}

builder_node!(Example, "Example");

impl Example {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn summary(&self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        self.update(|e| e.summary = Some(summary))
    }

    pub fn description(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.update(|e| e.description = Some(description))
    }

    /// Structured data the example represents
    pub fn data_value(&self, data: impl Into<Value>) -> Result<Self> {
        if self.value.is_some() {
            return Err(BuildError::because("Example: dataValue requires value to be unset"));
        }
        self.check_vacant("dataValue")?;
        let data = data.into();
        Ok(self.update(|e| e.data_value = Some(data)))
    }

    /// The example as it appears on the wire
    pub fn serialized_value(&self, serialized: impl Into<String>) -> Result<Self> {
        if self.value.is_some() || self.external_value.is_some() {
            return Err(BuildError::because(
                "Example: serializedValue requires value and externalValue to be unset",
            ));
        }
        self.check_vacant("serializedValue")?;
        let serialized = serialized.into();
        Ok(self.update(|e| e.serialized_value = Some(serialized)))
    }

    /// URI of an externally hosted example
    pub fn external_value(&self, uri: impl Into<String>) -> Result<Self> {
        if self.value.is_some() || self.serialized_value.is_some() {
            return Err(BuildError::because(
                "Example: externalValue requires value and serializedValue to be unset",
            ));
        }
        self.check_vacant("externalValue")?;
        let uri = uri.into();
        Ok(self.update(|e| e.external_value = Some(uri)))
    }

    /// Inline literal value
    pub fn value(&self, value: impl Into<Value>) -> Result<Self> {
        if self.external_value.is_some() {
            return Err(BuildError::because("Example: value and externalValue are mutually exclusive"));
        }
        if self.data_value.is_some() {
            return Err(BuildError::because("Example: value and dataValue are mutually exclusive"));
        }
        if self.serialized_value.is_some() {
            return Err(BuildError::because(
                "Example: value and serializedValue are mutually exclusive",
            ));
        }
        let value = value.into();
        Ok(self.update(|e| e.value = Some(value)))
    }

    /// Name of the value form currently held, if any
    pub fn held_value(&self) -> Option<&'static str> {
        if self.data_value.is_some() {
            Some("dataValue")
        } else if self.serialized_value.is_some() {
            Some("serializedValue")
        } else if self.external_value.is_some() {
            Some("externalValue")
        } else if self.value.is_some() {
            Some("value")
        } else {
            None
        }
    }

    fn check_vacant(&self, setting: &str) -> Result<()> {
        match self.held_value() {
            Some(held) if held != setting => Err(BuildError::because(format!(
                "Example: cannot set {} while it already holds {}",
                setting, held
            ))),
            _ => Ok(()),
        }
    }
}

impl BuildsModel for Example {
    type Model = model::Example;

    fn to_model(&self) -> Result<model::Example> {
        let example = model::Example {
            summary: self.summary.clone(),
            description: self.description.clone(),
            data_value: self.data_value.clone(),
            serialized_value: self.serialized_value.clone(),
            external_value: self.external_value.clone(),
            value: self.value.clone(),
            extensions: self.extensions.clone(),
        };
        Ok(example.checked()?)
    }
}
