//! Document signatories.
//!
//! A signatory owns its fields and requested attachments. Most of its state
//! is reported by the server (delivery status, sign and view times, the
//! sign link); only the writable attributes are sent back meaningfully.

use crate::attachment::{ATTACHMENT, SignatoryAttachment};
use crate::enums::{
    AuthenticationMethod, ConfirmationDeliveryMethod, InvitationDeliveryMethod, StandardFieldType,
};
use crate::field::{FIELD, Field};
use chrono::{DateTime, Utc};
use scrive_model::{
    Codec, Descriptor, Entity, EntityKind, EntitySet, Kwargs, Object, Result, Rule, ScriveError,
    Value, WireEnum,
};
use tracing::trace;

#[derive(Clone, Debug, PartialEq)]
pub struct Signatory(Object);

const NULLABLE_TEXT: Rule = Rule::Nullable(&Rule::Text);
const NULLABLE_BOOL: Rule = Rule::Nullable(&Rule::Bool);
const NULLABLE_TIMESTAMP: Rule = Rule::Nullable(&Rule::Timestamp);

pub static SIGNATORY: EntityKind = EntityKind {
    name: "Signatory",
    descriptors: &[
        Descriptor::new("id").wire_rule(NULLABLE_TEXT),
        Descriptor::new("current").wire_rule(NULLABLE_BOOL),
        Descriptor::new("sign_order")
            .wire("signorder")
            .rule(Rule::PositiveInt)
            .default_to(|| Value::Int(1)),
        Descriptor::new("undelivered_invitation")
            .wire("undeliveredInvitation")
            .wire_rule(NULLABLE_BOOL),
        Descriptor::new("undelivered_email_invitation")
            .wire("undeliveredMailInvitation")
            .wire_rule(NULLABLE_BOOL),
        Descriptor::new("undelivered_sms_invitation")
            .wire("undeliveredSMSInvitation")
            .wire_rule(NULLABLE_BOOL),
        Descriptor::new("delivered_invitation")
            .wire("deliveredInvitation")
            .wire_rule(NULLABLE_BOOL),
        Descriptor::new("invitation_delivery_method")
            .wire("delivery")
            .rule(Rule::Enum(InvitationDeliveryMethod::spec))
            .default_to(|| Value::from(InvitationDeliveryMethod::Email)),
        Descriptor::new("confirmation_delivery_method")
            .wire("confirmationdelivery")
            .rule(Rule::Enum(ConfirmationDeliveryMethod::spec))
            .default_to(|| Value::from(ConfirmationDeliveryMethod::Email)),
        Descriptor::new("authentication_method")
            .wire("authentication")
            .rule(Rule::Enum(AuthenticationMethod::spec))
            .default_to(|| Value::from(AuthenticationMethod::Standard))
            .optional_on_wire(),
        Descriptor::new("viewer")
            .wire("signs")
            .rule(Rule::Bool)
            .default_to(|| Value::Bool(false))
            .codec(Codec::Negated),
        Descriptor::new("author")
            .wire_rule(Rule::Bool)
            .default_to(|| Value::Bool(false)),
        Descriptor::new("has_account")
            .wire("saved")
            .wire_rule(NULLABLE_BOOL),
        Descriptor::new("eleg_mismatch_message")
            .wire("datamismatch")
            .wire_rule(NULLABLE_TEXT),
        Descriptor::new("allows_highlighting")
            .wire("allowshighlighting")
            .rule(Rule::Bool)
            .default_to(|| Value::Bool(false))
            .optional_on_wire(),
        Descriptor::new("sign_time")
            .wire("signdate")
            .wire_rule(NULLABLE_TIMESTAMP)
            .codec(Codec::Timestamp),
        Descriptor::new("view_time")
            .wire("seendate")
            .wire_rule(NULLABLE_TIMESTAMP)
            .codec(Codec::Timestamp),
        Descriptor::new("invitation_view_time")
            .wire("readdate")
            .wire_rule(NULLABLE_TIMESTAMP)
            .codec(Codec::Timestamp),
        Descriptor::new("rejection_time")
            .wire("rejecteddate")
            .wire_rule(NULLABLE_TIMESTAMP)
            .codec(Codec::Timestamp),
        Descriptor::new("rejection_message")
            .wire("rejectionreason")
            .wire_rule(NULLABLE_TEXT)
            .optional_on_wire(),
        Descriptor::new("sign_success_redirect_url")
            .wire("signsuccessredirect")
            .rule(NULLABLE_TEXT)
            .default_to(|| Value::Null)
            .optional_on_wire(),
        Descriptor::new("rejection_redirect_url")
            .wire("rejectredirect")
            .rule(NULLABLE_TEXT)
            .default_to(|| Value::Null)
            .optional_on_wire(),
        Descriptor::new("sign_url")
            .wire("signlink")
            .wire_rule(NULLABLE_TEXT)
            .optional_on_wire(),
        Descriptor::new("fields")
            .rule(Rule::SetOf(&FIELD))
            .default_to(|| Value::List(Vec::new()))
            .codec(Codec::Entities(&FIELD)),
        Descriptor::new("attachments")
            .rule(Rule::SetOf(&ATTACHMENT))
            .default_to(|| Value::List(Vec::new()))
            .codec(Codec::Entities(&ATTACHMENT))
            .optional_on_wire(),
    ],
};

entity_handle!(Signatory, &SIGNATORY);

impl Signatory {
    pub fn new(kwargs: Kwargs) -> Result<Self> {
        Self::with_kwargs(kwargs)
    }

    pub fn id(&self) -> Result<Option<String>> {
        self.0.get_as("id")
    }

    /// True for the signatory whose turn it is to sign.
    pub fn current(&self) -> Result<Option<bool>> {
        self.0.get_as("current")
    }

    pub fn sign_order(&self) -> Result<i64> {
        self.0.get_as("sign_order")
    }

    pub fn set_sign_order(&self, sign_order: i64) -> Result<()> {
        self.0.set("sign_order", sign_order)
    }

    pub fn undelivered_invitation(&self) -> Result<Option<bool>> {
        self.0.get_as("undelivered_invitation")
    }

    pub fn undelivered_email_invitation(&self) -> Result<Option<bool>> {
        self.0.get_as("undelivered_email_invitation")
    }

    pub fn undelivered_sms_invitation(&self) -> Result<Option<bool>> {
        self.0.get_as("undelivered_sms_invitation")
    }

    pub fn delivered_invitation(&self) -> Result<Option<bool>> {
        self.0.get_as("delivered_invitation")
    }

    pub fn invitation_delivery_method(&self) -> Result<InvitationDeliveryMethod> {
        self.0.get_as("invitation_delivery_method")
    }

    pub fn set_invitation_delivery_method(&self, method: InvitationDeliveryMethod) -> Result<()> {
        self.0.set("invitation_delivery_method", method)
    }

    pub fn confirmation_delivery_method(&self) -> Result<ConfirmationDeliveryMethod> {
        self.0.get_as("confirmation_delivery_method")
    }

    pub fn set_confirmation_delivery_method(
        &self,
        method: ConfirmationDeliveryMethod,
    ) -> Result<()> {
        self.0.set("confirmation_delivery_method", method)
    }

    pub fn authentication_method(&self) -> Result<AuthenticationMethod> {
        self.0.get_as("authentication_method")
    }

    pub fn set_authentication_method(&self, method: AuthenticationMethod) -> Result<()> {
        self.0.set("authentication_method", method)
    }

    /// A viewer receives the document but does not sign it.
    pub fn viewer(&self) -> Result<bool> {
        self.0.get_as("viewer")
    }

    pub fn set_viewer(&self, viewer: bool) -> Result<()> {
        self.0.set("viewer", viewer)
    }

    pub fn author(&self) -> Result<bool> {
        self.0.get_as("author")
    }

    pub fn has_account(&self) -> Result<Option<bool>> {
        self.0.get_as("has_account")
    }

    pub fn eleg_mismatch_message(&self) -> Result<Option<String>> {
        self.0.get_as("eleg_mismatch_message")
    }

    pub fn allows_highlighting(&self) -> Result<bool> {
        self.0.get_as("allows_highlighting")
    }

    pub fn set_allows_highlighting(&self, allows: bool) -> Result<()> {
        self.0.set("allows_highlighting", allows)
    }

    pub fn sign_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.0.get_as("sign_time")
    }

    pub fn view_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.0.get_as("view_time")
    }

    pub fn invitation_view_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.0.get_as("invitation_view_time")
    }

    pub fn rejection_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.0.get_as("rejection_time")
    }

    pub fn rejection_message(&self) -> Result<Option<String>> {
        self.0.get_as("rejection_message")
    }

    pub fn sign_success_redirect_url(&self) -> Result<Option<String>> {
        self.0.get_as("sign_success_redirect_url")
    }

    pub fn set_sign_success_redirect_url(&self, url: Option<&str>) -> Result<()> {
        self.0.set("sign_success_redirect_url", url)
    }

    pub fn rejection_redirect_url(&self) -> Result<Option<String>> {
        self.0.get_as("rejection_redirect_url")
    }

    pub fn set_rejection_redirect_url(&self, url: Option<&str>) -> Result<()> {
        self.0.set("rejection_redirect_url", url)
    }

    /// Server-relative sign link, present only in some responses.
    pub fn sign_url(&self) -> Result<Option<String>> {
        self.0.get_as("sign_url")
    }

    /// The sign link prefixed with the attached session's base URL.
    pub fn absolute_sign_url(&self) -> Result<Option<String>> {
        let Some(sign_url) = self.sign_url()? else {
            return Ok(None);
        };
        let api = self.0.api().ok_or(ScriveError::ApiNotSet)?;
        Ok(Some(format!("{}{sign_url}", api.base_url())))
    }

    pub fn fields(&self) -> Result<EntitySet<Field>> {
        self.0.get_as("fields")
    }

    pub fn set_fields(&self, fields: Vec<Field>) -> Result<()> {
        self.0.set("fields", fields)
    }

    pub fn attachments(&self) -> Result<EntitySet<SignatoryAttachment>> {
        self.0.get_as("attachments")
    }

    pub fn set_attachments(&self, attachments: Vec<SignatoryAttachment>) -> Result<()> {
        self.0.set("attachments", attachments)
    }

    fn standard_field(&self, standard_type: StandardFieldType) -> Result<Option<Field>> {
        for field in self.fields()?.to_vec()? {
            if field.standard_type()? == Some(standard_type) {
                return Ok(Some(field));
            }
        }
        Ok(None)
    }

    /// First and last name fields joined by a space; empty parts are skipped.
    pub fn full_name(&self) -> Result<String> {
        let mut parts = Vec::with_capacity(2);
        for standard_type in [StandardFieldType::FirstName, StandardFieldType::LastName] {
            if let Some(field) = self.standard_field(standard_type)? {
                let value = field.value()?;
                if !value.is_empty() {
                    parts.push(value);
                }
            }
        }
        Ok(parts.join(" "))
    }

    /// Splits on the first space into first and last name, creating the
    /// standard fields that are missing.
    pub fn set_full_name(&self, full_name: &str) -> Result<()> {
        self.0.check_write()?;
        let (first, last) = full_name.split_once(' ').unwrap_or((full_name, ""));
        let fields = self.fields()?;
        for (standard_type, part) in [
            (StandardFieldType::FirstName, first),
            (StandardFieldType::LastName, last),
        ] {
            match self.standard_field(standard_type)? {
                Some(field) => field.set_value(part)?,
                None => {
                    trace!(field = standard_type.wire_value(), "adding standard field");
                    fields.insert(Field::standard(standard_type, part)?)?;
                }
            }
        }
        Ok(())
    }
}
