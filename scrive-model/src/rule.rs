//! Type-value unifier: declarative rules that validate and coerce values.
//!
//! A [`Rule`] takes an attribute name and a candidate [`Value`] and either
//! returns the canonical value or a [`ValidationError`] naming the
//! attribute, the expected type and the offending value.
//!
//! Numeric policy: an integral float (`14.0`) is accepted where a whole
//! number is required and converted losslessly; `14.5` is rejected as
//! "not a round number", never truncated. Float rules accept ints as they
//! are, so an integral ratio read from the wire is written back unchanged.

use crate::error::ValidationError;
use crate::object::EntityKind;
use crate::set::ObjectSet;
use crate::value::Value;
use crate::variant::EnumSpec;
use chrono::{DateTime, Utc};

/// A named predicate plus coercion, for rules the built-ins don't cover.
#[derive(Debug)]
pub struct CustomRule {
    /// Used as the expected type in mismatch messages.
    pub expected: &'static str,
    pub unify: fn(&str, Value) -> Result<Value, ValidationError>,
}

/// Validation and coercion rule for one attribute.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Bool,
    Text,
    NonEmptyText,
    /// Any whole number.
    Int,
    /// Whole number `>= 1`.
    PositiveInt,
    /// Whole number within inclusive bounds.
    BoundedInt { min: i64, max: i64 },
    /// Finite number within inclusive bounds. Ints pass through unchanged.
    BoundedFloat { min: f64, max: f64 },
    /// Membership in a wire enum, by variant, symbolic name or wire value.
    Enum(fn() -> &'static EnumSpec),
    /// String-keyed mapping of text values.
    TextMap,
    /// A timestamp, or RFC 3339 text that parses to one.
    Timestamp,
    /// `Null` always passes; anything else goes through the inner rule.
    Nullable(&'static Rule),
    /// A collection of entities of one kind.
    SetOf(&'static EntityKind),
    Custom(&'static CustomRule),
}

/// Ratio rule used by placements: a float in `[0, 1]`.
pub const RATIO: Rule = Rule::BoundedFloat { min: 0.0, max: 1.0 };

impl Rule {
    /// Human-readable description of the accepted type.
    #[must_use]
    pub fn expected(&self) -> String {
        match self {
            Self::Bool => "bool".to_owned(),
            Self::Text | Self::NonEmptyText => "text".to_owned(),
            Self::Int | Self::PositiveInt | Self::BoundedInt { .. } => "int or float".to_owned(),
            Self::BoundedFloat { .. } => "float or int".to_owned(),
            Self::Enum(spec) => spec().type_name.to_owned(),
            Self::TextMap => "map of text to text".to_owned(),
            Self::Timestamp => "datetime".to_owned(),
            Self::Nullable(inner) => format!("{} or None", inner.expected()),
            Self::SetOf(kind) => format!("set of {} objects", kind.name),
            Self::Custom(custom) => custom.expected.to_owned(),
        }
    }

    /// Validates `value` for the attribute `name`, returning its canonical form.
    pub fn unify_validate(&self, name: &str, value: Value) -> Result<Value, ValidationError> {
        match self {
            Self::Bool => match value {
                Value::Bool(_) => Ok(value),
                other => Err(self.mismatch(name, &other)),
            },
            Self::Text => match value {
                Value::Text(_) => Ok(value),
                other => Err(self.mismatch(name, &other)),
            },
            Self::NonEmptyText => match value {
                Value::Text(s) if s.is_empty() => Err(ValidationError::Empty {
                    attribute: name.to_owned(),
                }),
                Value::Text(_) => Ok(value),
                other => Err(self.mismatch(name, &other)),
            },
            Self::Int => self.whole_number(name, value).map(Value::Int),
            Self::PositiveInt => {
                let n = self.whole_number(name, value)?;
                if n < 1 {
                    return Err(ValidationError::RangeViolation {
                        attribute: name.to_owned(),
                        bounds: "an integer greater or equal to 1".to_owned(),
                        value: n.to_string(),
                    });
                }
                Ok(Value::Int(n))
            }
            Self::BoundedInt { min, max } => {
                let n = self.whole_number(name, value)?;
                if n < *min || n > *max {
                    return Err(ValidationError::RangeViolation {
                        attribute: name.to_owned(),
                        bounds: format!("in the <{min},{max}> range (inclusive)"),
                        value: n.to_string(),
                    });
                }
                Ok(Value::Int(n))
            }
            Self::BoundedFloat { min, max } => {
                let x = match value {
                    Value::Float(x) => x,
                    Value::Int(n) => n as f64,
                    ref other => return Err(self.mismatch(name, other)),
                };
                // NaN fails both comparisons and lands here too.
                if !(x >= *min && x <= *max) {
                    return Err(ValidationError::RangeViolation {
                        attribute: name.to_owned(),
                        bounds: format!("in the <{min},{max}> range (inclusive)"),
                        value: x.to_string(),
                    });
                }
                // Ints are stored as given.
                Ok(value)
            }
            Self::Enum(spec) => {
                let spec = spec();
                match value {
                    Value::Variant(v) if v.same_enum(spec) => Ok(value),
                    Value::Text(s) => spec
                        .by_name(&s)
                        .or_else(|| spec.by_wire(&s))
                        .map(Value::Variant)
                        .ok_or_else(|| ValidationError::EnumNameMismatch {
                            attribute: name.to_owned(),
                            enum_name: spec.type_name.to_owned(),
                            value: s,
                        }),
                    other => Err(self.mismatch(name, &other)),
                }
            }
            Self::TextMap => match value {
                Value::TextMap(_) => Ok(value),
                other => Err(self.mismatch(name, &other)),
            },
            Self::Timestamp => match value {
                Value::Timestamp(_) => Ok(value),
                Value::Text(ref s) => DateTime::parse_from_rfc3339(s)
                    .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
                    .map_err(|_| self.mismatch(name, &value)),
                other => Err(self.mismatch(name, &other)),
            },
            Self::Nullable(inner) => match value {
                Value::Null => Ok(Value::Null),
                other => inner.unify_validate(name, other).map_err(|e| match e {
                    ValidationError::TypeMismatch {
                        attribute, value, ..
                    } => ValidationError::TypeMismatch {
                        attribute,
                        expected: self.expected(),
                        value,
                    },
                    e => e,
                }),
            },
            Self::SetOf(kind) => self.unify_set(name, *kind, value),
            Self::Custom(custom) => (custom.unify)(name, value),
        }
    }

    fn mismatch(&self, name: &str, value: &Value) -> ValidationError {
        ValidationError::TypeMismatch {
            attribute: name.to_owned(),
            expected: self.expected(),
            value: value.to_string(),
        }
    }

    fn whole_number(&self, name: &str, value: Value) -> Result<i64, ValidationError> {
        match value {
            Value::Int(n) => Ok(n),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64 => {
                Ok(x as i64)
            }
            Value::Float(x) => Err(ValidationError::NotRound {
                attribute: name.to_owned(),
                value: x.to_string(),
            }),
            other => Err(self.mismatch(name, &other)),
        }
    }

    /// Accepts a set or list of entities of `kind` and returns a fresh set
    /// owned by the caller. Elements are shared, the container is not.
    fn unify_set(
        &self,
        name: &str,
        kind: &'static EntityKind,
        value: Value,
    ) -> Result<Value, ValidationError> {
        let items = match value {
            Value::Set(set) if set.kind() == kind => set.snapshot(),
            Value::List(items) => {
                let mut objects = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(o) if o.kind() == kind => objects.push(o),
                        other => {
                            return Err(ValidationError::CompositeElementInvalid {
                                attribute: name.to_owned(),
                                expected: self.expected(),
                                element_type: kind.name.to_owned(),
                                value: other.to_string(),
                            });
                        }
                    }
                }
                objects
            }
            other => return Err(self.mismatch(name, &other)),
        };
        Ok(Value::Set(ObjectSet::from_objects(kind, items)))
    }
}

