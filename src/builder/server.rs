//! Server and server variable builders

use super::assembler::assemble_keyed;
use super::{check_key, check_text, BuildsModel, Persistent};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, Extensions, OrderedMap};

#[derive(Debug, Clone, PartialEq)]
pub struct Server {
    url: String,
    description: Option<String>,
    variables: OrderedMap<ServerVariable>,
    extensions: Extensions,
}

builder_node!(Server, "Server");

impl Server {
    /// Server at `url`; the url may contain `{variable}` placeholders
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        check_text("Server", "url", &url)?;
        Ok(Self {
            url,
            description: None,
            variables: OrderedMap::new(),
            extensions: Extensions::new(),
        })
    }

    pub fn description(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.update(|s| s.description = Some(description))
    }

    pub fn variable(&self, name: impl Into<String>, variable: ServerVariable) -> Result<Self> {
        let name = name.into();
        check_key("Server", "variables", &name)?;
        Ok(self.update(|s| {
            s.variables.insert(name, variable);
        }))
    }
}

impl BuildsModel for Server {
    type Model = model::Server;

    fn to_model(&self) -> Result<model::Server> {
        let server = model::Server {
            url: self.url.clone(),
            description: self.description.clone(),
            variables: assemble_keyed(CollectionKind::ServerVariables, &self.variables)?,
            extensions: self.extensions.clone(),
        };
        Ok(server.checked()?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerVariable {
    default: String,
    description: Option<String>,
    enum_values: Vec<String>,
    extensions: Extensions,
}

builder_node!(ServerVariable, "ServerVariable");

impl ServerVariable {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            description: None,
            enum_values: Vec::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn description(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.update(|v| v.description = Some(description))
    }

    /// Allowed values; the default must be among them
    pub fn enum_values<S: Into<String>>(&self, values: impl IntoIterator<Item = S>) -> Result<Self> {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(BuildError::invalid("ServerVariable: enum must not be empty"));
        }
        if !values.contains(&self.default) {
            return Err(BuildError::because(format!(
                "ServerVariable: default '{}' is not one of the enum values",
                self.default
            )));
        }
        Ok(self.update(|v| v.enum_values = values))
    }
}

impl BuildsModel for ServerVariable {
    type Model = model::ServerVariable;

    fn to_model(&self) -> Result<model::ServerVariable> {
        let variable = model::ServerVariable {
            default: self.default.clone(),
            description: self.description.clone(),
            enum_values: self.enum_values.clone(),
            extensions: self.extensions.clone(),
        };
        Ok(variable.checked()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_with_variables() {
        let server = Server::new("https://{region}.api.example.com")
            .unwrap()
            .description("Regional")
            .variable(
                "region",
                ServerVariable::new("eu").enum_values(["eu", "us"]).unwrap(),
            )
            .unwrap();
        let model = server.to_model().unwrap();
        let vars = model.variables.unwrap();
        assert_eq!(vars.get("region").unwrap().default, "eu");
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(matches!(Server::new(""), Err(BuildError::InvalidCombination(_))));
    }

    #[test]
    fn test_default_must_be_in_enum() {
        assert!(ServerVariable::new("ap").enum_values(["eu", "us"]).is_err());
    }
}
