//! Signatory fields: predefined ("standard") personal data and custom fields.

use crate::enums::{FieldType, StandardFieldType};
use crate::placement::{PLACEMENT, Placement};
use scrive_model::{
    Codec, Descriptor, Entity, EntityKind, EntitySet, Kwargs, Object, Result, Rule, Value,
    WireEnum,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Field(Object);

pub static FIELD: EntityKind = EntityKind {
    name: "Field",
    descriptors: &[
        Descriptor::new("field_type")
            .wire("type")
            .rule(Rule::Enum(FieldType::spec))
            .default_to(|| Value::from(FieldType::Custom)),
        Descriptor::new("name").rule(Rule::NonEmptyText),
        Descriptor::new("value")
            .rule(Rule::Text)
            .default_to(|| Value::from("")),
        Descriptor::new("obligatory")
            .rule(Rule::Bool)
            .default_to(|| Value::Bool(true)),
        Descriptor::new("should_be_filled_by_sender")
            .wire("shouldbefilledbysender")
            .rule(Rule::Bool)
            .default_to(|| Value::Bool(false)),
        Descriptor::new("placements")
            .rule(Rule::SetOf(&PLACEMENT))
            .default_to(|| Value::List(Vec::new()))
            .codec(Codec::Entities(&PLACEMENT)),
    ],
};

entity_handle!(Field, &FIELD);

impl Field {
    pub fn new(kwargs: Kwargs) -> Result<Self> {
        Self::with_kwargs(kwargs)
    }

    /// A standard field, named after the wire value of `standard_type`.
    pub fn standard(standard_type: StandardFieldType, value: &str) -> Result<Self> {
        Self::with_kwargs(
            Kwargs::new()
                .arg("field_type", FieldType::Standard)
                .arg("name", standard_type.wire_value())
                .arg("value", value),
        )
    }

    pub fn custom(name: &str, value: &str) -> Result<Self> {
        Self::with_kwargs(
            Kwargs::new()
                .arg("field_type", FieldType::Custom)
                .arg("name", name)
                .arg("value", value),
        )
    }

    /// The predefined field this is, if it is a standard field with a known name.
    pub fn standard_type(&self) -> Result<Option<StandardFieldType>> {
        if self.field_type()? != FieldType::Standard {
            return Ok(None);
        }
        Ok(StandardFieldType::from_wire(&self.name()?))
    }

    pub fn field_type(&self) -> Result<FieldType> {
        self.0.get_as("field_type")
    }

    pub fn set_field_type(&self, field_type: FieldType) -> Result<()> {
        self.0.set("field_type", field_type)
    }

    pub fn name(&self) -> Result<String> {
        self.0.get_as("name")
    }

    pub fn set_name(&self, name: &str) -> Result<()> {
        self.0.set("name", name)
    }

    pub fn value(&self) -> Result<String> {
        self.0.get_as("value")
    }

    pub fn set_value(&self, value: &str) -> Result<()> {
        self.0.set("value", value)
    }

    pub fn obligatory(&self) -> Result<bool> {
        self.0.get_as("obligatory")
    }

    pub fn set_obligatory(&self, obligatory: bool) -> Result<()> {
        self.0.set("obligatory", obligatory)
    }

    pub fn should_be_filled_by_sender(&self) -> Result<bool> {
        self.0.get_as("should_be_filled_by_sender")
    }

    pub fn set_should_be_filled_by_sender(&self, value: bool) -> Result<()> {
        self.0.set("should_be_filled_by_sender", value)
    }

    pub fn placements(&self) -> Result<EntitySet<Placement>> {
        self.0.get_as("placements")
    }

    pub fn set_placements(&self, placements: Vec<Placement>) -> Result<()> {
        self.0.set("placements", placements)
    }
}
