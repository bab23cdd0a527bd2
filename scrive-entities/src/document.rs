//! Documents: the root entity exchanged with the service.

use crate::enums::{AuthenticationMethod, DocumentStatus, InvitationDeliveryMethod, Language};
use crate::signatory::{SIGNATORY, Signatory};
use chrono::{DateTime, Utc};
use scrive_model::{
    Codec, CustomRule, Descriptor, Entity, EntityKind, EntitySet, Kwargs, Object, Result, Rule,
    ValidationError, Value, WireEnum,
};
use std::collections::BTreeMap;
use std::fmt;

/// Text where blank input means "no message".
static OPTIONAL_MESSAGE: CustomRule = CustomRule {
    expected: "text or None",
    unify: unify_optional_message,
};

fn unify_optional_message(name: &str, value: Value) -> std::result::Result<Value, ValidationError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Text(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::Text(_) => Ok(value),
        other => Err(ValidationError::TypeMismatch {
            attribute: name.to_owned(),
            expected: OPTIONAL_MESSAGE.expected.to_owned(),
            value: other.to_string(),
        }),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Document(Object);

pub static DOCUMENT: EntityKind = EntityKind {
    name: "Document",
    descriptors: &[
        Descriptor::new("id").wire_rule(Rule::Nullable(&Rule::Text)),
        Descriptor::new("title")
            .rule(Rule::Text)
            .default_to(|| Value::from("")),
        Descriptor::new("number_of_days_to_sign")
            .wire("daystosign")
            .rule(Rule::BoundedInt { min: 1, max: 90 })
            .default_to(|| Value::Int(14)),
        Descriptor::new("number_of_days_to_remind")
            .wire("daystoremind")
            .rule(Rule::Nullable(&Rule::PositiveInt))
            .default_to(|| Value::Null),
        Descriptor::new("status")
            .wire_rule(Rule::Nullable(&Rule::Enum(DocumentStatus::spec)))
            .codec(Codec::Variant {
                spec: DocumentStatus::spec,
                aliases: &[],
                null_as: None,
            }),
        Descriptor::new("modification_time")
            .wire("time")
            .wire_rule(Rule::Nullable(&Rule::Timestamp))
            .codec(Codec::Timestamp),
        Descriptor::new("creation_time")
            .wire("ctime")
            .wire_rule(Rule::Nullable(&Rule::Timestamp))
            .codec(Codec::Timestamp),
        Descriptor::new("signing_deadline")
            .wire("timeouttime")
            .wire_rule(Rule::Nullable(&Rule::Timestamp))
            .codec(Codec::Timestamp),
        Descriptor::new("autoremind_time")
            .wire("autoremindtime")
            .wire_rule(Rule::Nullable(&Rule::Timestamp))
            .codec(Codec::Timestamp),
        Descriptor::new("current_sign_order")
            .wire("signorder")
            .wire_rule(Rule::Nullable(&Rule::PositiveInt)),
        Descriptor::new("is_template")
            .wire("template")
            .rule(Rule::Bool)
            .default_to(|| Value::Bool(false)),
        Descriptor::new("show_header")
            .wire("showheader")
            .rule(Rule::Bool)
            .default_to(|| Value::Bool(true)),
        Descriptor::new("show_pdf_download")
            .wire("showpdfdownload")
            .rule(Rule::Bool)
            .default_to(|| Value::Bool(true)),
        Descriptor::new("show_reject_option")
            .wire("showrejectoption")
            .rule(Rule::Bool)
            .default_to(|| Value::Bool(true)),
        Descriptor::new("show_footer")
            .wire("showfooter")
            .rule(Rule::Bool)
            .default_to(|| Value::Bool(true)),
        Descriptor::new("invitation_message")
            .wire("invitationmessage")
            .rule(Rule::Custom(&OPTIONAL_MESSAGE))
            .default_to(|| Value::Null)
            .codec(Codec::BlankAsNull),
        Descriptor::new("confirmation_message")
            .wire("confirmationmessage")
            .rule(Rule::Custom(&OPTIONAL_MESSAGE))
            .default_to(|| Value::Null)
            .codec(Codec::BlankAsNull),
        Descriptor::new("api_callback_url")
            .wire("apicallbackurl")
            .rule(Rule::Nullable(&Rule::Text))
            .default_to(|| Value::Null),
        Descriptor::new("language")
            .wire("lang")
            .rule(Rule::Enum(Language::spec))
            .default_to(|| Value::from(Language::Swedish))
            .codec(Codec::Variant {
                spec: Language::spec,
                aliases: &[("gb", "en")],
                null_as: None,
            }),
        Descriptor::new("tags")
            .rule(Rule::TextMap)
            .default_to(|| Value::TextMap(BTreeMap::new()))
            .codec(Codec::TagList),
        Descriptor::new("signatories")
            .rule(Rule::SetOf(&SIGNATORY))
            .default_to(|| Value::List(Vec::new()))
            .codec(Codec::Entities(&SIGNATORY)),
    ],
};

entity_handle!(Document, &DOCUMENT);

/// A property aggregated over all signatories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consensus<T> {
    /// No signatories, or signatories that disagree.
    Mixed,
    Uniform(T),
}

impl<T: PartialEq> Consensus<T> {
    fn of(values: impl IntoIterator<Item = T>) -> Self {
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            return Self::Mixed;
        };
        for value in values {
            if value != first {
                return Self::Mixed;
            }
        }
        Self::Uniform(first)
    }
}

impl<T: fmt::Display> fmt::Display for Consensus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mixed => f.write_str("mixed"),
            Self::Uniform(value) => value.fmt(f),
        }
    }
}

impl Document {
    /// Keyword construction; every writable attribute has a default.
    pub fn new(kwargs: Kwargs) -> Result<Self> {
        Self::with_kwargs(kwargs)
    }

    pub fn id(&self) -> Result<Option<String>> {
        self.0.get_as("id")
    }

    pub fn title(&self) -> Result<String> {
        self.0.get_as("title")
    }

    pub fn set_title(&self, title: &str) -> Result<()> {
        self.0.set("title", title)
    }

    pub fn number_of_days_to_sign(&self) -> Result<i64> {
        self.0.get_as("number_of_days_to_sign")
    }

    pub fn set_number_of_days_to_sign(&self, days: i64) -> Result<()> {
        self.0.set("number_of_days_to_sign", days)
    }

    pub fn number_of_days_to_remind(&self) -> Result<Option<i64>> {
        self.0.get_as("number_of_days_to_remind")
    }

    pub fn set_number_of_days_to_remind(&self, days: Option<i64>) -> Result<()> {
        self.0.set("number_of_days_to_remind", days)
    }

    /// `None` until the document has been saved on the server.
    pub fn status(&self) -> Result<Option<DocumentStatus>> {
        self.0.get_as("status")
    }

    pub fn modification_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.0.get_as("modification_time")
    }

    pub fn creation_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.0.get_as("creation_time")
    }

    pub fn signing_deadline(&self) -> Result<Option<DateTime<Utc>>> {
        self.0.get_as("signing_deadline")
    }

    pub fn autoremind_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.0.get_as("autoremind_time")
    }

    pub fn current_sign_order(&self) -> Result<Option<i64>> {
        self.0.get_as("current_sign_order")
    }

    pub fn is_template(&self) -> Result<bool> {
        self.0.get_as("is_template")
    }

    pub fn set_is_template(&self, is_template: bool) -> Result<()> {
        self.0.set("is_template", is_template)
    }

    pub fn show_header(&self) -> Result<bool> {
        self.0.get_as("show_header")
    }

    pub fn set_show_header(&self, show: bool) -> Result<()> {
        self.0.set("show_header", show)
    }

    pub fn show_pdf_download(&self) -> Result<bool> {
        self.0.get_as("show_pdf_download")
    }

    pub fn set_show_pdf_download(&self, show: bool) -> Result<()> {
        self.0.set("show_pdf_download", show)
    }

    pub fn show_reject_option(&self) -> Result<bool> {
        self.0.get_as("show_reject_option")
    }

    pub fn set_show_reject_option(&self, show: bool) -> Result<()> {
        self.0.set("show_reject_option", show)
    }

    pub fn show_footer(&self) -> Result<bool> {
        self.0.get_as("show_footer")
    }

    pub fn set_show_footer(&self, show: bool) -> Result<()> {
        self.0.set("show_footer", show)
    }

    pub fn invitation_message(&self) -> Result<Option<String>> {
        self.0.get_as("invitation_message")
    }

    pub fn set_invitation_message(&self, message: Option<&str>) -> Result<()> {
        self.0.set("invitation_message", message)
    }

    pub fn confirmation_message(&self) -> Result<Option<String>> {
        self.0.get_as("confirmation_message")
    }

    pub fn set_confirmation_message(&self, message: Option<&str>) -> Result<()> {
        self.0.set("confirmation_message", message)
    }

    pub fn api_callback_url(&self) -> Result<Option<String>> {
        self.0.get_as("api_callback_url")
    }

    pub fn set_api_callback_url(&self, url: Option<&str>) -> Result<()> {
        self.0.set("api_callback_url", url)
    }

    pub fn language(&self) -> Result<Language> {
        self.0.get_as("language")
    }

    pub fn set_language(&self, language: Language) -> Result<()> {
        self.0.set("language", language)
    }

    pub fn tags(&self) -> Result<BTreeMap<String, String>> {
        self.0.get_as("tags")
    }

    pub fn set_tags(&self, tags: BTreeMap<String, String>) -> Result<()> {
        self.0.set("tags", tags)
    }

    pub fn signatories(&self) -> Result<EntitySet<Signatory>> {
        self.0.get_as("signatories")
    }

    pub fn set_signatories(&self, signatories: Vec<Signatory>) -> Result<()> {
        self.0.set("signatories", signatories)
    }

    /// The signatory flagged as the document's author, if any.
    pub fn author(&self) -> Result<Option<Signatory>> {
        for signatory in self.signatories()?.to_vec()? {
            if signatory.author()? {
                return Ok(Some(signatory));
            }
        }
        Ok(None)
    }

    pub fn invitation_delivery_method(&self) -> Result<Consensus<InvitationDeliveryMethod>> {
        let methods = self
            .signatories()?
            .to_vec()?
            .iter()
            .map(Signatory::invitation_delivery_method)
            .collect::<Result<Vec<_>>>()?;
        Ok(Consensus::of(methods))
    }

    pub fn authentication_method(&self) -> Result<Consensus<AuthenticationMethod>> {
        let methods = self
            .signatories()?
            .to_vec()?
            .iter()
            .map(Signatory::authentication_method)
            .collect::<Result<Vec<_>>>()?;
        Ok(Consensus::of(methods))
    }
}
