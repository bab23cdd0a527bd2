//! The entity base: descriptor-driven construction, access, lifecycle and JSON.

use crate::descriptor::{Descriptor, Kwargs};
use crate::error::{Result, ScriveError};
use crate::value::{FromValue, Value};
use serde_json::{Map, Value as Json};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Static registration of one entity type: its name and ordered descriptors.
///
/// The descriptor order is the construction, deserialization and
/// serialization order.
pub struct EntityKind {
    pub name: &'static str,
    pub descriptors: &'static [Descriptor],
}

impl EntityKind {
    /// Finds a descriptor by its public name, with its slot index.
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<(usize, &'static Descriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .find(|(_, d)| d.name() == name)
    }
}

impl PartialEq for EntityKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityKind").field("name", &self.name).finish()
    }
}

/// Lifecycle of one entity or collection.
///
/// `ReadWrite -> ReadOnly` and `* -> Invalidated` are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    ReadWrite,
    ReadOnly,
    Invalidated,
}

impl LifecycleState {
    pub fn check_read(self) -> Result<()> {
        match self {
            Self::Invalidated => Err(ScriveError::InvalidEntity),
            Self::ReadWrite | Self::ReadOnly => Ok(()),
        }
    }

    pub fn check_write(self) -> Result<()> {
        match self {
            Self::Invalidated => Err(ScriveError::InvalidEntity),
            Self::ReadOnly => Err(ScriveError::EntityIsReadOnly),
            Self::ReadWrite => Ok(()),
        }
    }

    /// State after a read-only transition. Invalidation stays terminal.
    #[must_use]
    pub fn read_only(self) -> Self {
        match self {
            Self::Invalidated => Self::Invalidated,
            Self::ReadWrite | Self::ReadOnly => Self::ReadOnly,
        }
    }
}

/// Recursive lifecycle transitions over an owned entity graph.
///
/// Implementations apply the transition to everything they own before
/// themselves. The walk has no cycle detection: an entity must never
/// transitively own itself.
pub trait Lifecycle {
    fn invalidate(&self);

    fn make_read_only(&self);
}

/// Session handle that entity-specific remote operations reach through.
pub trait ApiHandle {
    /// Scheme and host, e.g. `https://scrive.com`.
    fn base_url(&self) -> String;
}

pub(crate) struct ObjectData {
    pub(crate) state: LifecycleState,
    pub(crate) slots: Vec<Value>,
    api: Option<Weak<dyn ApiHandle>>,
}

/// Shared handle to one entity instance.
///
/// Clones refer to the same entity, so a child fetched from its parent
/// observes a later invalidation of that parent.
#[derive(Clone)]
pub struct Object {
    kind: &'static EntityKind,
    inner: Rc<RefCell<ObjectData>>,
}

impl Object {
    fn bare(kind: &'static EntityKind) -> Self {
        Self {
            kind,
            inner: Rc::new(RefCell::new(ObjectData {
                state: LifecycleState::ReadWrite,
                slots: vec![Value::Null; kind.descriptors.len()],
                api: None,
            })),
        }
    }

    /// Keyword construction: every descriptor consumes its argument or
    /// falls back to its default, then leftovers are rejected.
    pub fn new(kind: &'static EntityKind, mut kwargs: Kwargs) -> Result<Self> {
        let object = Self::bare(kind);
        {
            let mut data = object.inner.borrow_mut();
            for (slot, descriptor) in kind.descriptors.iter().enumerate() {
                descriptor.initialize(&mut data, slot, &mut kwargs, kind.name)?;
            }
        }
        if let Some(name) = kwargs.into_leftover() {
            return Err(ScriveError::UnexpectedArgument {
                entity: kind.name,
                name,
            });
        }
        Ok(object)
    }

    /// Builds an entity from a server JSON object. Any failing descriptor
    /// aborts the whole construction with `InvalidResponse`.
    pub fn from_json_object(kind: &'static EntityKind, json: &Map<String, Json>) -> Result<Self> {
        let object = Self::bare(kind);
        {
            let mut data = object.inner.borrow_mut();
            for (slot, descriptor) in kind.descriptors.iter().enumerate() {
                if let Err(e) = descriptor.deserialize(&mut data, slot, json, kind.name) {
                    debug!(entity = kind.name, field = descriptor.wire_name(), error = %e, "rejecting server response");
                    return Err(e);
                }
            }
        }
        Ok(object)
    }

    /// Parses JSON text and builds an entity from it. Text that is not
    /// JSON is an `InvalidResponse` like any other malformed payload.
    pub fn from_json_str(kind: &'static EntityKind, json: &str) -> Result<Self> {
        let parsed = serde_json::from_str::<Json>(json).map_err(|e| {
            ScriveError::invalid_response_from(
                format!("server's response for {} is not valid JSON", kind.name),
                e,
            )
        })?;
        match parsed {
            Json::Object(map) => Self::from_json_object(kind, &map),
            _ => Err(ScriveError::invalid_response(format!(
                "server's JSON response for {} is not an object",
                kind.name
            ))),
        }
    }

    /// Serializes through every descriptor, recursing into owned entities.
    #[must_use]
    pub fn to_json_object(&self) -> Map<String, Json> {
        let data = self.inner.borrow();
        let mut out = Map::new();
        for (slot, descriptor) in self.kind.descriptors.iter().enumerate() {
            descriptor.serialize(&data, slot, &mut out);
        }
        out
    }

    #[must_use]
    pub fn kind(&self) -> &'static EntityKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.inner.borrow().state
    }

    pub fn check_read(&self) -> Result<()> {
        self.state().check_read()
    }

    pub fn check_write(&self) -> Result<()> {
        self.state().check_write()
    }

    fn lookup(&self, name: &str) -> Result<(usize, &'static Descriptor)> {
        self.kind.descriptor(name).ok_or_else(|| ScriveError::UnknownAttribute {
            entity: self.kind.name,
            name: name.to_owned(),
        })
    }

    /// Reads an attribute. Fails with `InvalidEntity` once invalidated.
    pub fn get(&self, name: &str) -> Result<Value> {
        let (slot, descriptor) = self.lookup(name)?;
        descriptor.get(&self.inner.borrow(), slot)
    }

    /// Reads an attribute and converts it to `T`.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.get(name)?).ok_or_else(|| ScriveError::UnexpectedValue(name.to_owned()))
    }

    /// Assigns a public attribute through its descriptor.
    ///
    /// Unknown names are refused; on an invalidated entity the refusal is
    /// `InvalidEntity` rather than `UnknownAttribute`.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let Some((slot, descriptor)) = self.kind.descriptor(name) else {
            self.check_read()?;
            return Err(ScriveError::UnknownAttribute {
                entity: self.kind.name,
                name: name.to_owned(),
            });
        };
        descriptor.set(&mut self.inner.borrow_mut(), slot, value.into())
    }

    /// Attaches a session handle to this entity and everything it owns.
    pub fn attach_api(&self, api: &Weak<dyn ApiHandle>) {
        {
            let data = self.inner.borrow();
            for value in &data.slots {
                attach_value(value, api);
            }
        }
        self.inner.borrow_mut().api = Some(api.clone());
    }

    /// The attached session, if any is attached and still alive.
    #[must_use]
    pub fn api(&self) -> Option<Rc<dyn ApiHandle>> {
        self.inner.borrow().api.as_ref().and_then(Weak::upgrade)
    }

    /// True if both handles refer to the same entity.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

fn attach_value(value: &Value, api: &Weak<dyn ApiHandle>) {
    match value {
        Value::Object(o) => o.attach_api(api),
        Value::Set(s) => {
            for o in s.snapshot() {
                o.attach_api(api);
            }
        }
        Value::List(items) => items.iter().for_each(|v| attach_value(v, api)),
        _ => {}
    }
}

impl Lifecycle for Object {
    fn invalidate(&self) {
        {
            let data = self.inner.borrow();
            for value in &data.slots {
                value.invalidate();
            }
        }
        self.inner.borrow_mut().state = LifecycleState::Invalidated;
        trace!(entity = self.kind.name, "invalidated");
    }

    fn make_read_only(&self) {
        {
            let data = self.inner.borrow();
            for value in &data.slots {
                value.make_read_only();
            }
        }
        let mut data = self.inner.borrow_mut();
        data.state = data.state.read_only();
        trace!(entity = self.kind.name, state = ?data.state, "made read only");
    }
}

impl Lifecycle for Value {
    fn invalidate(&self) {
        match self {
            Self::Object(o) => o.invalidate(),
            Self::Set(s) => s.invalidate(),
            Self::List(items) => items.iter().for_each(Lifecycle::invalidate),
            _ => {}
        }
    }

    fn make_read_only(&self) {
        match self {
            Self::Object(o) => o.make_read_only(),
            Self::Set(s) => s.make_read_only(),
            Self::List(items) => items.iter().for_each(Lifecycle::make_read_only),
            _ => {}
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("kind", &self.kind.name)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// A typed entity wrapping an [`Object`] of a fixed kind.
pub trait Entity: Sized + Clone {
    const KIND: &'static EntityKind;

    /// Wraps an object already known to be of `KIND`.
    fn from_object(object: Object) -> Self;

    fn as_object(&self) -> &Object;

    /// Keyword construction.
    fn with_kwargs(kwargs: Kwargs) -> Result<Self> {
        Object::new(Self::KIND, kwargs).map(Self::from_object)
    }

    fn from_json_object(json: &Map<String, Json>) -> Result<Self> {
        Object::from_json_object(Self::KIND, json).map(Self::from_object)
    }

    fn from_json_str(json: &str) -> Result<Self> {
        Object::from_json_str(Self::KIND, json).map(Self::from_object)
    }

    fn to_json_object(&self) -> Map<String, Json> {
        self.as_object().to_json_object()
    }

    fn invalidate(&self) {
        self.as_object().invalidate();
    }

    fn make_read_only(&self) {
        self.as_object().make_read_only();
    }

    fn state(&self) -> LifecycleState {
        self.as_object().state()
    }
}
