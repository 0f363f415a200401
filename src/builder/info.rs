//! Info, Contact and License builders

use std::sync::Arc;

use super::assembler::assemble_opt;
use super::{check_text, BuildsModel, Extensible, Persistent};
use crate::error::{BuildError, Result};
use crate::model::{self, Extensions};
use crate::profile::{FeatureGuard, ProfileRef};

// =============================================================================
// Info
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    guard: FeatureGuard,
    title: Option<String>,
    version: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    terms_of_service: Option<String>,
    contact: Option<Contact>,
    license: Option<License>,
    extensions: Extensions,
}

builder_node!(Info, "Info", guarded);

impl Info {
    pub fn with_profile(profile: &ProfileRef) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            title: None,
            version: None,
            summary: None,
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
            extensions: Extensions::new(),
        }
    }

    pub fn create() -> Result<Self> {
        Ok(Self::with_profile(FeatureGuard::current()?.profile()))
    }

    /// Info with title and API version under the ambient profile
    pub fn of(title: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        Self::create()?.title(title)?.version(version)
    }

    pub fn title(&self, title: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "title")?;
        let title = title.into();
        check_text(Self::NODE_TYPE, "title", &title)?;
        Ok(self.update(|i| i.title = Some(title)))
    }

    /// Version of the described API (not the dialect version)
    pub fn version(&self, version: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "version")?;
        let version = version.into();
        check_text(Self::NODE_TYPE, "version", &version)?;
        Ok(self.update(|i| i.version = Some(version)))
    }

    pub fn summary(&self, summary: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "summary")?;
        let summary = summary.into();
        Ok(self.update(|i| i.summary = Some(summary)))
    }

    pub fn description(&self, description: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "description")?;
        let description = description.into();
        Ok(self.update(|i| i.description = Some(description)))
    }

    pub fn terms_of_service(&self, url: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "termsOfService")?;
        let url = url.into();
        Ok(self.update(|i| i.terms_of_service = Some(url)))
    }

    pub fn contact(&self, contact: Contact) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "contact")?;
        Ok(self.update(|i| i.contact = Some(contact)))
    }

    pub fn license(&self, license: License) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "license")?;
        Ok(self.update(|i| i.license = Some(license)))
    }
}

impl BuildsModel for Info {
    type Model = model::Info;

    fn to_model(&self) -> Result<model::Info> {
        let title = self.title.clone().ok_or_else(|| BuildError::required("Info", "title"))?;
        let version = self
            .version
            .clone()
            .ok_or_else(|| BuildError::required("Info", "version"))?;

        let info = model::Info {
            title,
            version,
            summary: self.summary.clone(),
            description: self.description.clone(),
            terms_of_service: self.terms_of_service.clone(),
            contact: assemble_opt(self.contact.as_ref())?,
            license: assemble_opt(self.license.as_ref())?,
            extensions: self.extensions.clone(),
        };
        Ok(info.checked()?)
    }
}

// =============================================================================
// Contact
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contact {
    name: Option<String>,
    url: Option<String>,
    email: Option<String>,
    extensions: Extensions,
}

builder_node!(Contact, "Contact");

impl Contact {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn name(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|c| c.name = Some(name))
    }

    pub fn url(&self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.update(|c| c.url = Some(url))
    }

    pub fn email(&self, email: impl Into<String>) -> Result<Self> {
        let email = email.into();
        if !email.contains('@') {
            return Err(BuildError::invalid(format!("Contact: '{}' is not an email address", email)));
        }
        Ok(self.update(|c| c.email = Some(email)))
    }
}

impl BuildsModel for Contact {
    type Model = model::Contact;

    fn to_model(&self) -> Result<model::Contact> {
        let contact = model::Contact {
            name: self.name.clone(),
            url: self.url.clone(),
            email: self.email.clone(),
            extensions: self.extensions.clone(),
        };
        Ok(contact.checked()?)
    }
}

// =============================================================================
// License
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct License {
    name: String,
    identifier: Option<String>,
    url: Option<String>,
    extensions: Extensions,
}

builder_node!(License, "License");

impl License {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            url: None,
            extensions: Extensions::new(),
        }
    }

    /// SPDX license expression
    pub fn identifier(&self, identifier: impl Into<String>) -> Result<Self> {
        if self.url.is_some() {
            return Err(BuildError::because("License: identifier and url are mutually exclusive"));
        }
        let identifier = identifier.into();
        Ok(self.update(|l| l.identifier = Some(identifier)))
    }

    pub fn url(&self, url: impl Into<String>) -> Result<Self> {
        if self.identifier.is_some() {
            return Err(BuildError::because("License: identifier and url are mutually exclusive"));
        }
        let url = url.into();
        Ok(self.update(|l| l.url = Some(url)))
    }
}

impl BuildsModel for License {
    type Model = model::License;

    fn to_model(&self) -> Result<model::License> {
        if self.name.is_empty() {
            return Err(BuildError::required("License", "name"));
        }
        let license = model::License {
            name: self.name.clone(),
            identifier: self.identifier.clone(),
            url: self.url.clone(),
            extensions: self.extensions.clone(),
        };
        Ok(license.checked()?)
    }
}
