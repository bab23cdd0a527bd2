//! Owned collections of entities.
//!
//! A set is itself lifecycle-aware: once its owner is made read-only or
//! invalidated, the set handle a caller already holds refuses mutation
//! (or any access) as well.

use crate::error::{Result, ScriveError, ValidationError};
use crate::object::{Entity, EntityKind, Lifecycle, LifecycleState, Object};
use crate::value::{FromValue, Value};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

struct SetData {
    state: LifecycleState,
    items: Vec<Object>,
}

/// Shared handle to an insertion-ordered set of entities of one kind.
#[derive(Clone)]
pub struct ObjectSet {
    kind: &'static EntityKind,
    inner: Rc<RefCell<SetData>>,
}

impl ObjectSet {
    #[must_use]
    pub fn new(kind: &'static EntityKind) -> Self {
        Self::from_objects(kind, Vec::new())
    }

    /// Builds a set, dropping repeated handles. Callers guarantee the kind.
    pub(crate) fn from_objects(kind: &'static EntityKind, objects: Vec<Object>) -> Self {
        let mut items: Vec<Object> = Vec::with_capacity(objects.len());
        for object in objects {
            if !items.iter().any(|o| o.ptr_eq(&object)) {
                items.push(object);
            }
        }
        Self {
            kind,
            inner: Rc::new(RefCell::new(SetData {
                state: LifecycleState::ReadWrite,
                items,
            })),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static EntityKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.inner.borrow().state
    }

    /// Element handles regardless of lifecycle state.
    pub(crate) fn snapshot(&self) -> Vec<Object> {
        self.inner.borrow().items.clone()
    }

    /// Adds an entity. Returns false if this handle was already present.
    pub fn insert(&self, object: Object) -> Result<bool> {
        let mut data = self.inner.borrow_mut();
        data.state.check_write()?;
        if object.kind() != self.kind {
            return Err(ScriveError::Validation(ValidationError::TypeMismatch {
                attribute: "elem".to_owned(),
                expected: self.kind.name.to_owned(),
                value: Value::Object(object).to_string(),
            }));
        }
        if data.items.iter().any(|o| o.ptr_eq(&object)) {
            return Ok(false);
        }
        data.items.push(object);
        Ok(true)
    }

    /// Removes an entity. Returns false if it was not present.
    pub fn remove(&self, object: &Object) -> Result<bool> {
        let mut data = self.inner.borrow_mut();
        data.state.check_write()?;
        let before = data.items.len();
        data.items.retain(|o| !o.ptr_eq(object));
        Ok(data.items.len() != before)
    }

    pub fn clear(&self) -> Result<()> {
        let mut data = self.inner.borrow_mut();
        data.state.check_write()?;
        data.items.clear();
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let data = self.inner.borrow();
        data.state.check_read()?;
        Ok(data.items.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }

    pub fn contains(&self, object: &Object) -> Result<bool> {
        let data = self.inner.borrow();
        data.state.check_read()?;
        Ok(data.items.iter().any(|o| o.ptr_eq(object)))
    }

    /// The elements, in insertion order.
    pub fn to_vec(&self) -> Result<Vec<Object>> {
        let data = self.inner.borrow();
        data.state.check_read()?;
        Ok(data.items.clone())
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Lifecycle for ObjectSet {
    fn invalidate(&self) {
        for object in self.snapshot() {
            object.invalidate();
        }
        self.inner.borrow_mut().state = LifecycleState::Invalidated;
    }

    fn make_read_only(&self) {
        for object in self.snapshot() {
            object.make_read_only();
        }
        let mut data = self.inner.borrow_mut();
        data.state = data.state.read_only();
    }
}

impl PartialEq for ObjectSet {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("ObjectSet")
            .field("kind", &self.kind.name)
            .field("state", &data.state)
            .field("len", &data.items.len())
            .finish()
    }
}

/// Typed view over an [`ObjectSet`] whose elements are `T`.
pub struct EntitySet<T> {
    set: ObjectSet,
    _marker: PhantomData<T>,
}

impl<T: Entity> EntitySet<T> {
    /// An empty, unowned set.
    #[must_use]
    pub fn new() -> Self {
        Self::wrap(ObjectSet::new(T::KIND))
    }

    fn wrap(set: ObjectSet) -> Self {
        Self {
            set,
            _marker: PhantomData,
        }
    }

    pub fn insert(&self, item: T) -> Result<bool> {
        self.set.insert(item.as_object().clone())
    }

    pub fn extend<I: IntoIterator<Item = T>>(&self, items: I) -> Result<()> {
        for item in items {
            self.insert(item)?;
        }
        Ok(())
    }

    pub fn remove(&self, item: &T) -> Result<bool> {
        self.set.remove(item.as_object())
    }

    pub fn clear(&self) -> Result<()> {
        self.set.clear()
    }

    pub fn len(&self) -> Result<usize> {
        self.set.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.set.is_empty()
    }

    pub fn contains(&self, item: &T) -> Result<bool> {
        self.set.contains(item.as_object())
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        Ok(self.set.to_vec()?.into_iter().map(T::from_object).collect())
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.set.state()
    }
}

impl<T: Entity> Default for EntitySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EntitySet<T> {
    fn clone(&self) -> Self {
        Self {
            set: self.set.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for EntitySet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.set.fmt(f)
    }
}

impl<T> From<EntitySet<T>> for Value {
    fn from(value: EntitySet<T>) -> Self {
        Value::Set(value.set)
    }
}

impl<T: Entity> FromValue for EntitySet<T> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Set(set) if set.kind() == T::KIND => Some(Self::wrap(set)),
            _ => None,
        }
    }
}
