use scrive_model::{Descriptor, Entity, EntityKind, Kwargs, Object, Result, Rule};

/// A file the signatory is asked to upload while signing.
#[derive(Clone, Debug, PartialEq)]
pub struct SignatoryAttachment(Object);

pub static ATTACHMENT: EntityKind = EntityKind {
    name: "SignatoryAttachment",
    descriptors: &[
        Descriptor::new("requested_name")
            .wire("name")
            .rule(Rule::NonEmptyText),
        Descriptor::new("description").rule(Rule::NonEmptyText),
    ],
};

entity_handle!(SignatoryAttachment, &ATTACHMENT);

impl SignatoryAttachment {
    pub fn new(requested_name: &str, description: &str) -> Result<Self> {
        Self::with_kwargs(
            Kwargs::new()
                .arg("requested_name", requested_name)
                .arg("description", description),
        )
    }

    pub fn requested_name(&self) -> Result<String> {
        self.0.get_as("requested_name")
    }

    pub fn set_requested_name(&self, name: &str) -> Result<()> {
        self.0.set("requested_name", name)
    }

    pub fn description(&self) -> Result<String> {
        self.0.get_as("description")
    }

    pub fn set_description(&self, description: &str) -> Result<()> {
        self.0.set("description", description)
    }
}
