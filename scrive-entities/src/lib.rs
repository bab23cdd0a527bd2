//! Scrive entity definitions.
//!
//! Each entity is a thin typed wrapper over a [`scrive_model::Object`] of a
//! static [`scrive_model::EntityKind`]. Typed accessors read and write
//! through the descriptors, so every assignment is validated and every
//! access honours the entity lifecycle.

/// Implements [`scrive_model::Entity`] and the `Value` conversion for a
/// newtype over `Object`.
macro_rules! entity_handle {
    ($name:ident, $kind:expr) => {
        impl scrive_model::Entity for $name {
            const KIND: &'static scrive_model::EntityKind = $kind;

            fn from_object(object: scrive_model::Object) -> Self {
                Self(object)
            }

            fn as_object(&self) -> &scrive_model::Object {
                &self.0
            }
        }

        impl From<$name> for scrive_model::Value {
            fn from(value: $name) -> Self {
                scrive_model::Value::Object(value.0)
            }
        }

        impl scrive_model::FromValue for $name {
            fn from_value(value: scrive_model::Value) -> Option<Self> {
                match value {
                    scrive_model::Value::Object(o)
                        if o.kind() == <$name as scrive_model::Entity>::KIND =>
                    {
                        Some(Self(o))
                    }
                    _ => None,
                }
            }
        }
    };
}

mod attachment;
mod document;
mod enums;
mod field;
mod placement;
mod signatory;

pub use attachment::{ATTACHMENT, SignatoryAttachment};
pub use document::{Consensus, DOCUMENT, Document};
pub use enums::{
    AuthenticationMethod, ConfirmationDeliveryMethod, DocumentStatus, FieldType,
    InvitationDeliveryMethod, Language, StandardFieldType, Tip,
};
pub use field::{FIELD, Field};
pub use placement::{ANCHOR, Anchor, PLACEMENT, Placement};
pub use signatory::{SIGNATORY, Signatory};
