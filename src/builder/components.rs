//! Components builder
//!
//! Each section takes only its own builder type or a `$ref` placeholder.
//! [`ComponentEntry`] carries whichever was supplied so `put` can check it
//! against the section before storing.

use std::fmt;
use std::sync::Arc;

use super::assembler::assemble_keyed;
use super::{
    check_key, BuildsModel, Example, Extensible, Header, Link, MediaType, Parameter, PathItem,
    Persistent, RefOr, Reference, RequestBody, Response, Schema, SecurityScheme,
};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, Extensions, OrderedMap};
use crate::profile::{FeatureGuard, ProfileRef};

/// Named sections of the components object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Schemas,
    Responses,
    Parameters,
    Examples,
    RequestBodies,
    Headers,
    SecuritySchemes,
    Links,
    Callbacks,
    PathItems,
    /// 3.2 only
    MediaTypes,
}

impl Section {
    pub const ALL: [Section; 11] = [
        Section::Schemas,
        Section::Responses,
        Section::Parameters,
        Section::Examples,
        Section::RequestBodies,
        Section::Headers,
        Section::SecuritySchemes,
        Section::Links,
        Section::Callbacks,
        Section::PathItems,
        Section::MediaTypes,
    ];

    /// Key of the section in the serialized document
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schemas => "schemas",
            Self::Responses => "responses",
            Self::Parameters => "parameters",
            Self::Examples => "examples",
            Self::RequestBodies => "requestBodies",
            Self::Headers => "headers",
            Self::SecuritySchemes => "securitySchemes",
            Self::Links => "links",
            Self::Callbacks => "callbacks",
            Self::PathItems => "pathItems",
            Self::MediaTypes => "mediaTypes",
        }
    }

    /// Builder type the section accepts
    pub fn expects(&self) -> &'static str {
        match self {
            Self::Schemas => "Schema",
            Self::Responses => "Response",
            Self::Parameters => "Parameter",
            Self::Examples => "Example",
            Self::RequestBodies => "RequestBody",
            Self::Headers => "Header",
            Self::SecuritySchemes => "SecurityScheme",
            Self::Links => "Link",
            Self::Callbacks | Self::PathItems => "PathItem",
            Self::MediaTypes => "MediaType",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value offered to a components section
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentEntry {
    Schema(Schema),
    Response(Response),
    Parameter(Parameter),
    Example(Example),
    RequestBody(RequestBody),
    Header(Header),
    SecurityScheme(SecurityScheme),
    Link(Link),
    PathItem(PathItem),
    MediaType(MediaType),
    Ref(Reference),
}

impl ComponentEntry {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Schema(_) => "Schema",
            Self::Response(_) => "Response",
            Self::Parameter(_) => "Parameter",
            Self::Example(_) => "Example",
            Self::RequestBody(_) => "RequestBody",
            Self::Header(_) => "Header",
            Self::SecurityScheme(_) => "SecurityScheme",
            Self::Link(_) => "Link",
            Self::PathItem(_) => "PathItem",
            Self::MediaType(_) => "MediaType",
            Self::Ref(_) => "Reference",
        }
    }
}

impl From<Reference> for ComponentEntry {
    fn from(reference: Reference) -> Self {
        Self::Ref(reference)
    }
}

impl From<&str> for ComponentEntry {
    fn from(token: &str) -> Self {
        Self::Ref(Reference::to(token))
    }
}

impl From<String> for ComponentEntry {
    fn from(token: String) -> Self {
        Self::Ref(Reference::to(token))
    }
}

/// Pull a concrete builder back out of an entry
trait FromEntry: Sized {
    fn from_entry(entry: ComponentEntry) -> std::result::Result<Self, ComponentEntry>;
}

macro_rules! component_entry {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ComponentEntry {
                fn from(builder: $variant) -> Self {
                    Self::$variant(builder)
                }
            }

            impl FromEntry for $variant {
                fn from_entry(entry: ComponentEntry) -> std::result::Result<Self, ComponentEntry> {
                    match entry {
                        ComponentEntry::$variant(builder) => Ok(builder),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

component_entry!(
    Schema,
    Response,
    Parameter,
    Example,
    RequestBody,
    Header,
    SecurityScheme,
    Link,
    PathItem,
    MediaType,
);

fn place<B: FromEntry>(
    map: &mut OrderedMap<RefOr<B>>,
    section: Section,
    name: String,
    entry: ComponentEntry,
) -> Result<()> {
    let value = match entry {
        ComponentEntry::Ref(reference) => {
            reference.check()?;
            RefOr::Ref(reference)
        }
        other => RefOr::Builder(B::from_entry(other).map_err(|rejected| {
            BuildError::because(format!(
                "Components: section '{}' expects {} or a reference, got {} for '{}'",
                section,
                section.expects(),
                rejected.kind(),
                name
            ))
        })?),
    };
    map.insert(name, value);
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Components {
    guard: FeatureGuard,
    schemas: OrderedMap<RefOr<Schema>>,
    responses: OrderedMap<RefOr<Response>>,
    parameters: OrderedMap<RefOr<Parameter>>,
    examples: OrderedMap<RefOr<Example>>,
    request_bodies: OrderedMap<RefOr<RequestBody>>,
    headers: OrderedMap<RefOr<Header>>,
    security_schemes: OrderedMap<RefOr<SecurityScheme>>,
    links: OrderedMap<RefOr<Link>>,
    callbacks: OrderedMap<RefOr<PathItem>>,
    path_items: OrderedMap<RefOr<PathItem>>,
    media_types: OrderedMap<RefOr<MediaType>>,
    extensions: Extensions,
}

builder_node!(Components, "Components", guarded);

impl Components {
    pub fn with_profile(profile: &ProfileRef) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            schemas: OrderedMap::new(),
            responses: OrderedMap::new(),
            parameters: OrderedMap::new(),
            examples: OrderedMap::new(),
            request_bodies: OrderedMap::new(),
            headers: OrderedMap::new(),
            security_schemes: OrderedMap::new(),
            links: OrderedMap::new(),
            callbacks: OrderedMap::new(),
            path_items: OrderedMap::new(),
            media_types: OrderedMap::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn create() -> Result<Self> {
        Ok(Self::with_profile(FeatureGuard::current()?.profile()))
    }

    /// Store one entry under `section`, replacing any previous one with that name
    pub fn put(
        &self,
        section: Section,
        name: impl Into<String>,
        entry: impl Into<ComponentEntry>,
    ) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, section.as_str())?;
        let name = name.into();
        check_key(Self::NODE_TYPE, section.as_str(), &name)?;
        let entry = entry.into();
        self.try_update(|c| c.place(section, name, entry))
    }

    /// Replace a whole section. Nothing is stored unless every entry fits.
    pub fn set_all<K, V>(
        &self,
        section: Section,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self>
    where
        K: Into<String>,
        V: Into<ComponentEntry>,
    {
        self.guard.assert_allowed_key(Self::NODE_TYPE, section.as_str())?;
        self.try_update(|c| {
            c.clear(section);
            for (name, entry) in entries {
                let name = name.into();
                check_key(Self::NODE_TYPE, section.as_str(), &name)?;
                c.place(section, name, entry.into())?;
            }
            Ok(())
        })
    }

    pub fn schema(&self, name: impl Into<String>, schema: impl Into<ComponentEntry>) -> Result<Self> {
        self.put(Section::Schemas, name, schema)
    }

    /// Register a schema under its own name
    pub fn named_schema(&self, schema: Schema) -> Result<Self> {
        let name = schema
            .name()
            .map(str::to_owned)
            .ok_or_else(|| BuildError::because("Components: schema has no name"))?;
        self.put(Section::Schemas, name, schema)
    }

    pub fn response(&self, name: impl Into<String>, response: impl Into<ComponentEntry>) -> Result<Self> {
        self.put(Section::Responses, name, response)
    }

    pub fn parameter(&self, name: impl Into<String>, parameter: impl Into<ComponentEntry>) -> Result<Self> {
        self.put(Section::Parameters, name, parameter)
    }

    pub fn example(&self, name: impl Into<String>, example: impl Into<ComponentEntry>) -> Result<Self> {
        self.put(Section::Examples, name, example)
    }

    pub fn request_body(&self, name: impl Into<String>, body: impl Into<ComponentEntry>) -> Result<Self> {
        self.put(Section::RequestBodies, name, body)
    }

    pub fn header(&self, name: impl Into<String>, header: impl Into<ComponentEntry>) -> Result<Self> {
        self.put(Section::Headers, name, header)
    }

    pub fn security_scheme(
        &self,
        name: impl Into<String>,
        scheme: impl Into<ComponentEntry>,
    ) -> Result<Self> {
        self.put(Section::SecuritySchemes, name, scheme)
    }

    pub fn link(&self, name: impl Into<String>, link: impl Into<ComponentEntry>) -> Result<Self> {
        self.put(Section::Links, name, link)
    }

    pub fn callback(&self, name: impl Into<String>, item: impl Into<ComponentEntry>) -> Result<Self> {
        self.put(Section::Callbacks, name, item)
    }

    pub fn path_item(&self, name: impl Into<String>, item: impl Into<ComponentEntry>) -> Result<Self> {
        self.put(Section::PathItems, name, item)
    }

    pub fn media_type(&self, name: impl Into<String>, media: impl Into<ComponentEntry>) -> Result<Self> {
        self.put(Section::MediaTypes, name, media)
    }

    pub fn contains(&self, section: Section, name: &str) -> bool {
        match section {
            Section::Schemas => self.schemas.contains_key(name),
            Section::Responses => self.responses.contains_key(name),
            Section::Parameters => self.parameters.contains_key(name),
            Section::Examples => self.examples.contains_key(name),
            Section::RequestBodies => self.request_bodies.contains_key(name),
            Section::Headers => self.headers.contains_key(name),
            Section::SecuritySchemes => self.security_schemes.contains_key(name),
            Section::Links => self.links.contains_key(name),
            Section::Callbacks => self.callbacks.contains_key(name),
            Section::PathItems => self.path_items.contains_key(name),
            Section::MediaTypes => self.media_types.contains_key(name),
        }
    }

    fn place(&mut self, section: Section, name: String, entry: ComponentEntry) -> Result<()> {
        match section {
            Section::Schemas => place(&mut self.schemas, section, name, entry),
            Section::Responses => place(&mut self.responses, section, name, entry),
            Section::Parameters => place(&mut self.parameters, section, name, entry),
            Section::Examples => place(&mut self.examples, section, name, entry),
            Section::RequestBodies => place(&mut self.request_bodies, section, name, entry),
            Section::Headers => place(&mut self.headers, section, name, entry),
            Section::SecuritySchemes => place(&mut self.security_schemes, section, name, entry),
            Section::Links => place(&mut self.links, section, name, entry),
            Section::Callbacks => place(&mut self.callbacks, section, name, entry),
            Section::PathItems => place(&mut self.path_items, section, name, entry),
            Section::MediaTypes => place(&mut self.media_types, section, name, entry),
        }
    }

    fn clear(&mut self, section: Section) {
        match section {
            Section::Schemas => self.schemas = OrderedMap::new(),
            Section::Responses => self.responses = OrderedMap::new(),
            Section::Parameters => self.parameters = OrderedMap::new(),
            Section::Examples => self.examples = OrderedMap::new(),
            Section::RequestBodies => self.request_bodies = OrderedMap::new(),
            Section::Headers => self.headers = OrderedMap::new(),
            Section::SecuritySchemes => self.security_schemes = OrderedMap::new(),
            Section::Links => self.links = OrderedMap::new(),
            Section::Callbacks => self.callbacks = OrderedMap::new(),
            Section::PathItems => self.path_items = OrderedMap::new(),
            Section::MediaTypes => self.media_types = OrderedMap::new(),
        }
    }
}

impl BuildsModel for Components {
    type Model = model::Components;

    fn to_model(&self) -> Result<model::Components> {
        let components = model::Components {
            schemas: assemble_keyed(CollectionKind::Schemas, &self.schemas)?,
            responses: assemble_keyed(CollectionKind::Responses, &self.responses)?,
            parameters: assemble_keyed(CollectionKind::Parameters, &self.parameters)?,
            examples: assemble_keyed(CollectionKind::Examples, &self.examples)?,
            request_bodies: assemble_keyed(CollectionKind::RequestBodies, &self.request_bodies)?,
            headers: assemble_keyed(CollectionKind::Headers, &self.headers)?,
            security_schemes: assemble_keyed(CollectionKind::SecuritySchemes, &self.security_schemes)?,
            links: assemble_keyed(CollectionKind::Links, &self.links)?,
            callbacks: assemble_keyed(CollectionKind::Callbacks, &self.callbacks)?,
            path_items: assemble_keyed(CollectionKind::PathItems, &self.path_items)?,
            media_types: assemble_keyed(CollectionKind::MediaTypes, &self.media_types)?,
            extensions: self.extensions.clone(),
        };
        Ok(components.checked()?)
    }
}
