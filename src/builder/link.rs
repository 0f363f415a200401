//! Link builder

use serde_json::Value;

use super::assembler::assemble_opt;
use super::{check_key, BuildsModel, Persistent, Server};
use crate::error::{BuildError, Result};
use crate::model::{self, Extensions};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    operation_ref: Option<String>,
    operation_id: Option<String>,
    parameters: serde_json::Map<String, Value>,
    request_body: Option<Value>,
    description: Option<String>,
    server: Option<Server>,
    extensions: Extensions,
}

builder_node!(Link, "Link");

impl Link {
    pub fn create() -> Self {
        Self::default()
    }

    /// Link targeting an operation by id
    pub fn to_operation(operation_id: impl Into<String>) -> Result<Self> {
        Self::create().operation_id(operation_id)
    }

    pub fn operation_ref(&self, reference: impl Into<String>) -> Result<Self> {
        if self.operation_id.is_some() {
            return Err(BuildError::because("Link: operationRef and operationId are mutually exclusive"));
        }
        let reference = reference.into();
        super::check_text("Link", "operationRef", &reference)?;
        Ok(self.update(|l| l.operation_ref = Some(reference)))
    }

    pub fn operation_id(&self, id: impl Into<String>) -> Result<Self> {
        if self.operation_ref.is_some() {
            return Err(BuildError::because("Link: operationRef and operationId are mutually exclusive"));
        }
        let id = id.into();
        super::check_text("Link", "operationId", &id)?;
        Ok(self.update(|l| l.operation_id = Some(id)))
    }

    /// Runtime expression or constant passed to the target operation
    pub fn parameter(&self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let name = name.into();
        check_key("Link", "parameters", &name)?;
        let value = value.into();
        Ok(self.update(|l| {
            l.parameters.insert(name, value);
        }))
    }

    pub fn request_body(&self, body: impl Into<Value>) -> Self {
        let body = body.into();
        self.update(|l| l.request_body = Some(body))
    }

    pub fn description(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.update(|l| l.description = Some(description))
    }

    pub fn server(&self, server: Server) -> Self {
        self.update(|l| l.server = Some(server))
    }
}

impl BuildsModel for Link {
    type Model = model::Link;

    fn to_model(&self) -> Result<model::Link> {
        let link = model::Link {
            operation_ref: self.operation_ref.clone(),
            operation_id: self.operation_id.clone(),
            parameters: self.parameters.clone(),
            request_body: self.request_body.clone(),
            description: self.description.clone(),
            server: assemble_opt(self.server.as_ref())?,
            extensions: self.extensions.clone(),
        };
        Ok(link.checked()?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_operation_link() {
        let model = Link::to_operation("getOwner")
            .unwrap()
            .parameter("ownerId", "$response.body#/ownerId")
            .unwrap()
            .to_model()
            .unwrap();
        assert_eq!(model.operation_id.as_deref(), Some("getOwner"));
        assert_eq!(model.parameters.get("ownerId"), Some(&json!("$response.body#/ownerId")));
    }

    #[test]
    fn test_targets_are_exclusive() {
        let link = Link::to_operation("getOwner").unwrap();
        assert!(matches!(
            link.operation_ref("#/paths/~1owners/get"),
            Err(BuildError::InvalidCombination(_))
        ));
    }

    #[test]
    fn test_target_required_at_assembly() {
        assert!(matches!(Link::create().to_model(), Err(BuildError::Model(_))));
    }
}
