//! Attribute descriptors: one named, typed slot of an entity kind.
//!
//! A descriptor ties together construction-time defaulting, get/set access
//! control and JSON (de)serialization under a wire name. Descriptors are
//! declared in `static` tables, one per [`EntityKind`](crate::EntityKind):
//!
//! ```
//! use scrive_model::{Descriptor, Rule, Value};
//!
//! static TITLE: Descriptor = Descriptor::new("title")
//!     .rule(Rule::Text)
//!     .default_to(|| Value::from(""));
//! assert_eq!(TITLE.wire_name(), "title");
//! ```

use crate::error::{Result, ScriveError};
use crate::object::{EntityKind, Object, ObjectData};
use crate::rule::Rule;
use crate::set::ObjectSet;
use crate::value::Value;
use crate::variant::EnumSpec;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

/// Keyword arguments for entity construction.
#[derive(Debug, Clone, Default)]
pub struct Kwargs(BTreeMap<String, Value>);

impl Kwargs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument, builder style.
    #[must_use]
    pub fn arg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_owned(), value.into());
    }

    /// Pops the argument named `name`.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Name of the first argument nobody consumed, if any.
    #[must_use]
    pub fn into_leftover(self) -> Option<String> {
        self.0.into_keys().next()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Kwargs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Translation between a stored value and its wire JSON.
#[derive(Debug, Clone, Copy)]
pub enum Codec {
    /// Scalars and lists as-is; variants as their wire value.
    Plain,
    /// Wire text decoded straight into a variant, after legacy aliases
    /// (`(legacy, current)` pairs) are applied. `null` decodes as the
    /// `null_as` wire value when one is given, else stays null.
    Variant {
        spec: fn() -> &'static EnumSpec,
        aliases: &'static [(&'static str, &'static str)],
        null_as: Option<&'static str>,
    },
    /// Nullable RFC 3339 timestamp.
    Timestamp,
    /// Array of nested entity objects.
    Entities(&'static EntityKind),
    /// `[{"name": k, "value": v}, ...]` on the wire, a text map in memory.
    TagList,
    /// `""` on the wire for a missing text, blank text decodes to null.
    BlankAsNull,
    /// Boolean stored inverted on the wire.
    Negated,
}

enum DecodeError {
    Shape(String),
    Nested(ScriveError),
}

impl Codec {
    fn encode(&self, value: &Value) -> Json {
        match (self, value) {
            (Self::TagList, Value::TextMap(map)) => Json::Array(
                map.iter()
                    .map(|(name, value)| {
                        let mut tag = Map::new();
                        tag.insert("name".to_owned(), Json::String(name.clone()));
                        tag.insert("value".to_owned(), Json::String(value.clone()));
                        Json::Object(tag)
                    })
                    .collect(),
            ),
            (Self::BlankAsNull, Value::Null) => Json::String(String::new()),
            (Self::Negated, Value::Bool(b)) => Json::Bool(!b),
            _ => value.to_json(),
        }
    }

    fn decode(&self, json: &Json) -> std::result::Result<Value, DecodeError> {
        match self {
            Self::Plain => {
                Value::from_json(json).ok_or_else(|| DecodeError::Shape(format!("unsupported value {json}")))
            }
            Self::Variant {
                spec,
                aliases,
                null_as,
            } => match json {
                Json::Null => match null_as {
                    Some(wire) => Self::Variant {
                        spec: *spec,
                        aliases: *aliases,
                        null_as: None,
                    }
                    .decode(&Json::String((*wire).to_owned())),
                    None => Ok(Value::Null),
                },
                Json::String(s) => {
                    let wire = aliases
                        .iter()
                        .find(|(legacy, _)| *legacy == s.as_str())
                        .map_or(s.as_str(), |(_, current)| *current);
                    let spec = spec();
                    spec.by_wire(wire).map(Value::Variant).ok_or_else(|| {
                        DecodeError::Shape(format!("'{s}' is not a valid {}", spec.type_name))
                    })
                }
                other => Err(DecodeError::Shape(format!("expected text, got {other}"))),
            },
            Self::Timestamp => match json {
                Json::Null => Ok(Value::Null),
                Json::String(s) => DateTime::parse_from_rfc3339(s)
                    .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
                    .map_err(|e| DecodeError::Shape(format!("unparseable date '{s}': {e}"))),
                other => Err(DecodeError::Shape(format!("expected date text, got {other}"))),
            },
            Self::Entities(kind) => {
                let Json::Array(items) = json else {
                    return Err(DecodeError::Shape(format!("expected a list of {}", kind.name)));
                };
                let mut objects = Vec::with_capacity(items.len());
                for item in items {
                    let Json::Object(map) = item else {
                        return Err(DecodeError::Shape(format!("expected {} object, got {item}", kind.name)));
                    };
                    objects.push(Object::from_json_object(*kind, map).map_err(DecodeError::Nested)?);
                }
                Ok(Value::Set(ObjectSet::from_objects(*kind, objects)))
            }
            Self::TagList => {
                let Json::Array(items) = json else {
                    return Err(DecodeError::Shape("expected a list of tags".to_owned()));
                };
                items
                    .iter()
                    .map(|tag| match (tag.get("name"), tag.get("value")) {
                        (Some(Json::String(name)), Some(Json::String(value))) => {
                            Ok((name.clone(), value.clone()))
                        }
                        _ => Err(DecodeError::Shape(format!("malformed tag {tag}"))),
                    })
                    .collect::<std::result::Result<BTreeMap<_, _>, _>>()
                    .map(Value::TextMap)
            }
            Self::BlankAsNull => match json {
                Json::String(s) if s.trim().is_empty() => Ok(Value::Null),
                other => Self::Plain.decode(other),
            },
            Self::Negated => match json {
                Json::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(DecodeError::Shape(format!("expected a boolean, got {other}"))),
            },
        }
    }
}

/// One attribute slot of an entity kind.
///
/// A descriptor without a rule is derived: callers can read it but never
/// assign it. Its `wire_rule` type-checks server values and keyword
/// arguments; an absent argument falls back to the default, or null.
/// Without a `wire_rule` the attribute takes no keyword argument at all.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    name: &'static str,
    wire_name: Option<&'static str>,
    rule: Option<Rule>,
    wire_rule: Option<Rule>,
    default: Option<fn() -> Value>,
    codec: Codec,
    optional_on_wire: bool,
}

impl Descriptor {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            wire_name: None,
            rule: None,
            wire_rule: None,
            default: None,
            codec: Codec::Plain,
            optional_on_wire: false,
        }
    }

    /// Serialized under `wire_name` instead of the public name.
    #[must_use]
    pub const fn wire(self, wire_name: &'static str) -> Self {
        Self {
            wire_name: Some(wire_name),
            ..self
        }
    }

    #[must_use]
    pub const fn rule(self, rule: Rule) -> Self {
        Self {
            rule: Some(rule),
            ..self
        }
    }

    /// Type check for a derived attribute. It never makes the attribute
    /// writable.
    #[must_use]
    pub const fn wire_rule(self, rule: Rule) -> Self {
        Self {
            wire_rule: Some(rule),
            ..self
        }
    }

    /// Value used when keyword construction omits the argument.
    #[must_use]
    pub const fn default_to(self, default: fn() -> Value) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    #[must_use]
    pub const fn codec(self, codec: Codec) -> Self {
        Self { codec, ..self }
    }

    /// A missing wire key yields the default instead of failing.
    #[must_use]
    pub const fn optional_on_wire(self) -> Self {
        Self {
            optional_on_wire: true,
            ..self
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }

    fn default_value(&self) -> Value {
        self.default.map_or(Value::Null, |f| f())
    }

    pub(crate) fn initialize(
        &self,
        data: &mut ObjectData,
        slot: usize,
        kwargs: &mut Kwargs,
        entity: &'static str,
    ) -> Result<()> {
        let value = match (&self.rule, &self.wire_rule) {
            // Left in `kwargs`, so it is reported as unexpected.
            (None, None) => self.default_value(),
            (None, Some(wire_rule)) => match kwargs.take(self.name) {
                Some(given) => wire_rule.unify_validate(self.name, given)?,
                None => self.default_value(),
            },
            (Some(rule), _) => {
                let raw = match (kwargs.take(self.name), self.default) {
                    (Some(value), _) => value,
                    (None, Some(default)) => default(),
                    (None, None) => {
                        return Err(ScriveError::MissingArgument {
                            entity,
                            name: self.name.to_owned(),
                        });
                    }
                };
                rule.unify_validate(self.name, raw)?
            }
        };
        data.slots[slot] = value;
        Ok(())
    }

    pub(crate) fn get(&self, data: &ObjectData, slot: usize) -> Result<Value> {
        data.state.check_read()?;
        Ok(data.slots[slot].clone())
    }

    pub(crate) fn set(&self, data: &mut ObjectData, slot: usize, value: Value) -> Result<()> {
        let Some(rule) = &self.rule else {
            return Err(ScriveError::AttributeIsReadOnly(self.name.to_owned()));
        };
        data.state.check_write()?;
        data.slots[slot] = rule.unify_validate(self.name, value)?;
        Ok(())
    }

    pub(crate) fn serialize(&self, data: &ObjectData, slot: usize, out: &mut Map<String, Json>) {
        out.insert(self.wire_name().to_owned(), self.codec.encode(&data.slots[slot]));
    }

    pub(crate) fn deserialize(
        &self,
        data: &mut ObjectData,
        slot: usize,
        input: &Map<String, Json>,
        entity: &'static str,
    ) -> Result<()> {
        let wire = self.wire_name();
        let value = match input.get(wire) {
            Some(json) => self.codec.decode(json).map_err(|e| match e {
                DecodeError::Shape(reason) => ScriveError::invalid_response(format!(
                    "'{wire}' in server's JSON response for {entity} is invalid: {reason}"
                )),
                DecodeError::Nested(e) => e,
            })?,
            None if self.optional_on_wire => self.default_value(),
            None => {
                return Err(ScriveError::invalid_response(format!(
                    "'{wire}' missing in server's JSON response for {entity}"
                )));
            }
        };
        data.slots[slot] = match self.rule.as_ref().or(self.wire_rule.as_ref()) {
            Some(rule) => rule
                .unify_validate(self.name, value)
                .map_err(|e| ScriveError::invalid_response_from(e.to_string(), e))?,
            None => value,
        };
        Ok(())
    }
}
