//! Descriptor-based entity framework for the Scrive e-signature API.
//!
//! Every Scrive entity (document, signatory, field, placement, ...) is an
//! [`Object`] whose attributes are declared once, statically, as a table of
//! [`Descriptor`]s on an [`EntityKind`]:
//! - [`Rule`]: validates and coerces candidate values (type-value unifier)
//! - [`Descriptor`]: one attribute: rule, default, wire name, wire codec
//! - [`Object`]: shared entity handle: keyword construction, guarded
//!   get/set, JSON (de)serialization, lifecycle
//! - [`ObjectSet`] / [`EntitySet`]: owned, lifecycle-aware collections
//! - [`Lifecycle`]: recursive invalidate / make-read-only over the owned graph
//!
//! The framework is single-threaded and performs no I/O. Fetching and pushing
//! JSON is the transport's business; this crate only turns JSON into
//! validated entities and back.

mod descriptor;
mod error;
mod object;
mod rule;
mod set;
mod value;
mod variant;

pub use descriptor::{Codec, Descriptor, Kwargs};
pub use error::{Result, ScriveError, ValidationError};
pub use object::{ApiHandle, Entity, EntityKind, Lifecycle, LifecycleState, Object};
pub use rule::{CustomRule, RATIO, Rule};
pub use set::{EntitySet, ObjectSet};
pub use value::{FromValue, Value};
pub use variant::{EnumSpec, Variant, VariantSpec, WireEnum};
