//! Small shared nodes: external docs, discriminator, XML hints

use std::sync::Arc;

use super::{BuildsModel, Extensible, Persistent};
use crate::error::{BuildError, Result};
use crate::model::{self, Extensions, OrderedMap, XmlNodeType};
use crate::profile::{FeatureGuard, ProfileRef};

// =============================================================================
// ExternalDocs
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalDocs {
    url: String,
    description: Option<String>,
    extensions: Extensions,
}

builder_node!(ExternalDocs, "ExternalDocumentation");

impl ExternalDocs {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            extensions: Extensions::new(),
        }
    }

    pub fn description(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.update(|d| d.description = Some(description))
    }
}

impl BuildsModel for ExternalDocs {
    type Model = model::ExternalDocumentation;

    fn to_model(&self) -> Result<Self::Model> {
        if self.url.is_empty() {
            return Err(BuildError::required("ExternalDocumentation", "url"));
        }
        let docs = model::ExternalDocumentation {
            url: self.url.clone(),
            description: self.description.clone(),
            extensions: self.extensions.clone(),
        };
        Ok(docs.checked()?)
    }
}

// =============================================================================
// Discriminator
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Discriminator {
    guard: FeatureGuard,
    property_name: String,
    mapping: OrderedMap<String>,
    default_mapping: Option<String>,
    extensions: Extensions,
}

builder_node!(Discriminator, "Discriminator", guarded);

impl Discriminator {
    pub fn new(profile: &ProfileRef, property_name: impl Into<String>) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            property_name: property_name.into(),
            mapping: OrderedMap::new(),
            default_mapping: None,
            extensions: Extensions::new(),
        }
    }

    /// Discriminator under the ambient profile
    pub fn of(property_name: impl Into<String>) -> Result<Self> {
        let guard = FeatureGuard::current()?;
        Ok(Self::new(guard.profile(), property_name))
    }

    /// Map a discriminator value to a schema name or `$ref`
    pub fn mapping(&self, value: impl Into<String>, target: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "mapping")?;
        let value = value.into();
        super::check_key(Self::NODE_TYPE, "mapping", &value)?;
        let target = target.into();
        super::check_text(Self::NODE_TYPE, "mapping target", &target)?;
        Ok(self.update(|d| {
            d.mapping.insert(value, target);
        }))
    }

    /// Schema used when the value matches no mapping (3.2)
    pub fn default_mapping(&self, target: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "defaultMapping")?;
        let target = target.into();
        super::check_text(Self::NODE_TYPE, "defaultMapping", &target)?;
        Ok(self.update(|d| d.default_mapping = Some(target)))
    }
}

impl BuildsModel for Discriminator {
    type Model = model::Discriminator;

    fn to_model(&self) -> Result<Self::Model> {
        if self.property_name.is_empty() {
            return Err(BuildError::required(Self::NODE_TYPE, "propertyName"));
        }
        let discriminator = model::Discriminator {
            property_name: self.property_name.clone(),
            mapping: (!self.mapping.is_empty()).then(|| self.mapping.clone()),
            default_mapping: self.default_mapping.clone(),
            extensions: self.extensions.clone(),
        };
        Ok(discriminator.checked()?)
    }
}

// =============================================================================
// Xml
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Xml {
    guard: FeatureGuard,
    node_type: Option<XmlNodeType>,
    name: Option<String>,
    namespace: Option<String>,
    prefix: Option<String>,
    attribute: Option<bool>,
    wrapped: Option<bool>,
    extensions: Extensions,
}

builder_node!(Xml, "Xml", guarded);

impl Xml {
    pub fn with_profile(profile: &ProfileRef) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            node_type: None,
            name: None,
            namespace: None,
            prefix: None,
            attribute: None,
            wrapped: None,
            extensions: Extensions::new(),
        }
    }

    pub fn create() -> Result<Self> {
        Ok(Self::with_profile(FeatureGuard::current()?.profile()))
    }

    pub fn name(&self, name: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "name")?;
        let name = name.into();
        Ok(self.update(|x| x.name = Some(name)))
    }

    pub fn namespace(&self, namespace: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "namespace")?;
        let namespace = namespace.into();
        Ok(self.update(|x| x.namespace = Some(namespace)))
    }

    pub fn prefix(&self, prefix: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "prefix")?;
        let prefix = prefix.into();
        Ok(self.update(|x| x.prefix = Some(prefix)))
    }

    pub fn attribute(&self, attribute: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "attribute")?;
        if self.node_type.is_some() {
            return Err(BuildError::because("Xml: attribute cannot be combined with nodeType"));
        }
        Ok(self.update(|x| x.attribute = Some(attribute)))
    }

    pub fn wrapped(&self, wrapped: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "wrapped")?;
        if self.node_type.is_some() {
            return Err(BuildError::because("Xml: wrapped cannot be combined with nodeType"));
        }
        Ok(self.update(|x| x.wrapped = Some(wrapped)))
    }

    /// 3.2 replacement for the attribute/wrapped flags
    pub fn node_type(&self, node_type: XmlNodeType) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "nodeType")?;
        if self.attribute.is_some() || self.wrapped.is_some() {
            return Err(BuildError::because(
                "Xml: nodeType cannot be combined with attribute or wrapped",
            ));
        }
        Ok(self.update(|x| x.node_type = Some(node_type)))
    }
}

impl BuildsModel for Xml {
    type Model = model::Xml;

    fn to_model(&self) -> Result<Self::Model> {
        let xml = model::Xml {
            node_type: self.node_type,
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            prefix: self.prefix.clone(),
            attribute: self.attribute,
            wrapped: self.wrapped,
            extensions: self.extensions.clone(),
        };
        Ok(xml.checked()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile;

    #[test]
    fn test_default_mapping_gated() {
        let v31 = profile::builtin("3.1").unwrap();
        let v32 = profile::builtin("3.2").unwrap();

        let err = Discriminator::new(&v31, "petType")
            .default_mapping("Pet")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Feature 'Discriminator.defaultMapping' is not supported by profile 3.1"
        );

        let model = Discriminator::new(&v32, "petType")
            .mapping("cat", "#/components/schemas/Cat")
            .unwrap()
            .default_mapping("Pet")
            .unwrap()
            .to_model()
            .unwrap();
        assert_eq!(model.default_mapping.as_deref(), Some("Pet"));
        assert_eq!(model.mapping.unwrap().get("cat").map(String::as_str), Some("#/components/schemas/Cat"));
    }

    #[test]
    fn test_empty_mapping_is_absent() {
        let v31 = profile::builtin("3.1").unwrap();
        let model = Discriminator::new(&v31, "kind").to_model().unwrap();
        assert!(model.mapping.is_none());
    }

    #[test]
    fn test_xml_node_type_excludes_wrapped() {
        let v32 = profile::builtin("3.2").unwrap();
        let xml = Xml::with_profile(&v32).wrapped(true).unwrap();
        assert!(matches!(
            xml.node_type(XmlNodeType::Element),
            Err(BuildError::InvalidCombination(_))
        ));

        let v31 = profile::builtin("3.1").unwrap();
        assert!(matches!(
            Xml::with_profile(&v31).node_type(XmlNodeType::Text),
            Err(BuildError::FeatureNotSupported { .. })
        ));
    }

    #[test]
    fn test_external_docs_requires_url() {
        assert!(ExternalDocs::new("").to_model().is_err());
        let docs = ExternalDocs::new("https://docs.example.com").description("Guides");
        assert_eq!(docs.to_model().unwrap().description.as_deref(), Some("Guides"));
    }
}
