//! Wire enums: Rust enums whose variants carry a symbolic name and a wire value.
//!
//! The symbolic name is what callers may pass as text (`"email_and_mobile"`),
//! the wire value is what the service sends and expects (`"email_mobile"`).
//! Use [`wire_enum!`](crate::wire_enum) to declare one.

use std::fmt;

/// Static description of one wire enum.
#[derive(Debug)]
pub struct EnumSpec {
    pub type_name: &'static str,
    pub variants: &'static [VariantSpec],
}

/// Symbolic name and wire value of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    pub name: &'static str,
    pub wire: &'static str,
}

impl EnumSpec {
    /// Looks up a variant by its symbolic name.
    pub fn by_name(&'static self, name: &str) -> Option<Variant> {
        self.variants
            .iter()
            .position(|v| v.name == name)
            .map(|index| Variant { spec: self, index })
    }

    /// Looks up a variant by its wire value.
    pub fn by_wire(&'static self, wire: &str) -> Option<Variant> {
        self.variants
            .iter()
            .position(|v| v.wire == wire)
            .map(|index| Variant { spec: self, index })
    }
}

/// A type-erased enum variant, as stored inside a [`Value`](crate::Value).
#[derive(Clone, Copy)]
pub struct Variant {
    spec: &'static EnumSpec,
    index: usize,
}

impl Variant {
    #[must_use]
    pub fn spec(&self) -> &'static EnumSpec {
        self.spec
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Symbolic name, e.g. `email_and_mobile`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.spec.variants[self.index].name
    }

    /// Wire value, e.g. `email_mobile`.
    #[must_use]
    pub fn wire(&self) -> &'static str {
        self.spec.variants[self.index].wire
    }

    /// Returns true if both variants belong to the same enum type.
    #[must_use]
    pub fn same_enum(&self, spec: &EnumSpec) -> bool {
        self.spec.type_name == spec.type_name
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.same_enum(other.spec) && self.index == other.index
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.spec.type_name, self.name())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.spec.type_name, self.name())
    }
}

/// A typed Rust enum backed by an [`EnumSpec`].
pub trait WireEnum: Copy + Sized + 'static {
    fn spec() -> &'static EnumSpec;

    fn from_index(index: usize) -> Option<Self>;

    fn index(self) -> usize;

    fn name(self) -> &'static str;

    fn wire_value(self) -> &'static str;

    /// Converts a type-erased variant back, if it belongs to this enum.
    fn from_variant(variant: Variant) -> Option<Self> {
        if variant.same_enum(Self::spec()) {
            Self::from_index(variant.index())
        } else {
            None
        }
    }

    fn to_variant(self) -> Variant {
        Variant {
            spec: Self::spec(),
            index: self.index(),
        }
    }

    /// Parses a wire value.
    fn from_wire(wire: &str) -> Option<Self> {
        Self::spec()
            .by_wire(wire)
            .and_then(|v| Self::from_index(v.index()))
    }
}

/// Declares a [`WireEnum`] together with its value conversions.
///
/// ```
/// scrive_model::wire_enum! {
///     /// Where a tooltip points.
///     pub enum Tip {
///         Left = ("left", "left"),
///         Right = ("right", "right"),
///     }
/// }
///
/// use scrive_model::WireEnum;
/// assert_eq!(Tip::from_wire("right"), Some(Tip::Right));
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = ($vname:literal, $wire:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::WireEnum for $name {
            fn spec() -> &'static $crate::EnumSpec {
                static SPEC: $crate::EnumSpec = $crate::EnumSpec {
                    type_name: stringify!($name),
                    variants: &[
                        $($crate::VariantSpec { name: $vname, wire: $wire },)+
                    ],
                };
                &SPEC
            }

            fn from_index(index: usize) -> Option<Self> {
                [$(Self::$variant),+].get(index).copied()
            }

            fn index(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $vname,)+
                }
            }

            fn wire_value(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::WireEnum::wire_value(*self))
            }
        }

        impl From<$name> for $crate::Value {
            fn from(value: $name) -> Self {
                $crate::Value::Variant($crate::WireEnum::to_variant(value))
            }
        }

        impl $crate::FromValue for $name {
            fn from_value(value: $crate::Value) -> Option<Self> {
                match value {
                    $crate::Value::Variant(v) => <$name as $crate::WireEnum>::from_variant(v),
                    _ => None,
                }
            }
        }
    };
}
