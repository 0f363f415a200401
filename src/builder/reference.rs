//! Reference placeholders
//!
//! Anywhere a node may be given inline, a `$ref` may be given instead. A
//! plain string converts into a reference placeholder, so
//! `.schema("#/components/schemas/Pet")` and `.schema(Schema::object())`
//! both work.

use super::assembler::{check_token, to_reference};
use super::{BuildsModel, Persistent};
use crate::error::Result;
use crate::model;

/// `$ref` builder with optional summary/description overrides
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    token: String,
    summary: Option<String>,
    description: Option<String>,
}

impl Persistent for Reference {}

impl Reference {
    pub fn to(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            summary: None,
            description: None,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn summary(&self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        self.update(|r| r.summary = Some(summary))
    }

    pub fn description(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.update(|r| r.description = Some(description))
    }

    pub(crate) fn check(&self) -> Result<()> {
        check_token(&self.token)
    }
}

impl BuildsModel for Reference {
    type Model = model::Reference;

    fn to_model(&self) -> Result<model::Reference> {
        let mut reference = to_reference(&self.token)?;
        reference.summary = self.summary.clone();
        reference.description = self.description.clone();
        Ok(reference)
    }
}

/// Either a nested builder or a reference placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum RefOr<B> {
    Builder(B),
    Ref(Reference),
}

impl<B> RefOr<B> {
    pub fn is_ref(&self) -> bool {
        matches!(self, RefOr::Ref(_))
    }

    pub fn as_builder(&self) -> Option<&B> {
        match self {
            RefOr::Builder(b) => Some(b),
            RefOr::Ref(_) => None,
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        match self {
            RefOr::Ref(r) => r.check(),
            RefOr::Builder(_) => Ok(()),
        }
    }
}

impl<B> From<Reference> for RefOr<B> {
    fn from(reference: Reference) -> Self {
        RefOr::Ref(reference)
    }
}

impl<B> From<&str> for RefOr<B> {
    fn from(token: &str) -> Self {
        RefOr::Ref(Reference::to(token))
    }
}

impl<B> From<String> for RefOr<B> {
    fn from(token: String) -> Self {
        RefOr::Ref(Reference::to(token))
    }
}

/// `From<Builder> for RefOr<Builder>` for each nested builder type
macro_rules! ref_or_from {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<super::$ty> for RefOr<super::$ty> {
                fn from(builder: super::$ty) -> Self {
                    RefOr::Builder(builder)
                }
            }
        )*
    };
}

ref_or_from!(
    Schema,
    Parameter,
    RequestBody,
    Response,
    Example,
    Header,
    Link,
    SecurityScheme,
    PathItem,
    MediaType,
);

impl<B: BuildsModel> BuildsModel for RefOr<B> {
    type Model = model::RefOr<B::Model>;

    fn to_model(&self) -> Result<Self::Model> {
        match self {
            RefOr::Builder(b) => Ok(model::RefOr::Item(b.to_model()?)),
            RefOr::Ref(r) => Ok(model::RefOr::Ref(r.to_model()?)),
        }
    }
}
