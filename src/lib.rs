//! Fluent OpenAPI Builders
//!
//! Immutable, chainable builders for OpenAPI 3.1 / 3.2 documents. Every
//! mutator returns a new value; keys are checked against a dialect profile
//! before they are accepted; `to_model()` assembles the
//! canonical document.
//!
//! ## Features
//!
//! - **Persistent builders**: partial documents can be shared and extended freely
//! - **Profile gating**: keys a dialect lacks fail fast, e.g. 3.2-only keys under 3.1
//! - **Data-driven dialects**: profiles are TOML tables, custom ones load from disk
//! - **Absent-on-empty**: empty collections never reach the canonical model
//!
//! ## Architecture
//!
//! ```text
//! builder/   fluent builders, references, assembly helpers
//!    │  to_model()
//!    ▼
//! model/     canonical, validated document nodes
//!
//! profile/   dialect key tables, guard, ambient profile context
//! ```
//!
//! ## Example
//!
//! ```
//! use oas_fluent::builder::{BuildsModel, Info, OpenApi, Operation, Paths, Response};
//! use oas_fluent::profile::{self, ProfileContext};
//!
//! let v31 = profile::builtin("3.1")?;
//! let doc = ProfileContext::scoped(v31, || -> oas_fluent::Result<_> {
//!     let list = Operation::create()?
//!         .operation_id("listPets")?
//!         .response(Response::ok()?)?;
//!     OpenApi::create()?
//!         .openapi("3.1.0")?
//!         .info(Info::of("Pets", "1.0.0")?)?
//!         .paths(Paths::create().get("/pets", list)?)?
//!         .to_model()
//! })?;
//! assert_eq!(doc.openapi, "3.1.0");
//! # Ok::<(), oas_fluent::BuildError>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod profile;

pub use builder::{BuildsModel, Extensible, Persistent, ProfileAware};
pub use config::FluentConfig;
pub use error::{BuildError, Result};
pub use model::ModelError;
pub use profile::{FeatureGuard, Profile, ProfileContext, ProfileRef, ProfileRegistry};
