use chrono::{Datelike, Timelike};
use pretty_assertions::assert_eq;
use scrive_entities::{
    AuthenticationMethod, ConfirmationDeliveryMethod, Field, InvitationDeliveryMethod, Signatory,
    SignatoryAttachment, StandardFieldType,
};
use scrive_model::{ApiHandle, Entity, Kwargs, LifecycleState, ScriveError, Value};
use serde_json::json;
use std::rc::{Rc, Weak};

fn signatory() -> Signatory {
    Signatory::new(Kwargs::new()).unwrap()
}

fn signatory_json() -> serde_json::Value {
    json!({
        "id": "1",
        "current": true,
        "signorder": 2,
        "undeliveredInvitation": false,
        "undeliveredMailInvitation": false,
        "undeliveredSMSInvitation": true,
        "deliveredInvitation": true,
        "delivery": "email_mobile",
        "confirmationdelivery": "none",
        "authentication": "sms_pin",
        "signs": false,
        "author": true,
        "saved": false,
        "datamismatch": null,
        "allowshighlighting": true,
        "signdate": "2014-10-29T15:40:20Z",
        "seendate": null,
        "readdate": null,
        "rejecteddate": null,
        "rejectionreason": null,
        "signsuccessredirect": "https://example.com/ok",
        "rejectredirect": null,
        "signlink": "/s/1/2/abc",
        "fields": [{
            "type": "standard",
            "name": "fstname",
            "value": "John",
            "obligatory": true,
            "shouldbefilledbysender": false,
            "placements": []
        }],
        "attachments": [{"name": "id1", "description": "Scan of your ID"}]
    })
}

fn from_json(json: &serde_json::Value) -> scrive_model::Result<Signatory> {
    Signatory::from_json_str(&json.to_string())
}

struct FakeApi;

impl ApiHandle for FakeApi {
    fn base_url(&self) -> String {
        "https://scrive.com".to_string()
    }
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn defaults() {
    let s = signatory();
    assert_eq!(s.sign_order().unwrap(), 1);
    assert_eq!(s.invitation_delivery_method().unwrap(), InvitationDeliveryMethod::Email);
    assert_eq!(s.confirmation_delivery_method().unwrap(), ConfirmationDeliveryMethod::Email);
    assert_eq!(s.authentication_method().unwrap(), AuthenticationMethod::Standard);
    assert!(!s.viewer().unwrap());
    assert!(!s.author().unwrap());
    assert!(!s.allows_highlighting().unwrap());
    assert!(s.fields().unwrap().is_empty().unwrap());
    assert!(s.attachments().unwrap().is_empty().unwrap());
}

#[test]
fn redirect_urls_default_to_none() {
    let s = signatory();
    assert_eq!(s.sign_success_redirect_url().unwrap(), None);
    assert_eq!(s.rejection_redirect_url().unwrap(), None);
    s.set_sign_success_redirect_url(Some("https://example.com/ok")).unwrap();
    assert_eq!(
        s.sign_success_redirect_url().unwrap().as_deref(),
        Some("https://example.com/ok")
    );
    assert_eq!(s.to_json_object()["rejectredirect"], serde_json::Value::Null);
}

#[test]
fn server_fields_are_none_until_fetched() {
    let s = signatory();
    assert_eq!(s.id().unwrap(), None);
    assert_eq!(s.current().unwrap(), None);
    assert_eq!(s.delivered_invitation().unwrap(), None);
    assert_eq!(s.has_account().unwrap(), None);
    assert_eq!(s.sign_time().unwrap(), None);
    assert_eq!(s.rejection_message().unwrap(), None);
    assert_eq!(s.sign_url().unwrap(), None);
}

#[test]
fn server_fields_cannot_be_assigned() {
    let s = signatory();
    assert!(matches!(
        s.as_object().set("id", "1"),
        Err(ScriveError::AttributeIsReadOnly(_))
    ));
    assert!(matches!(
        s.as_object().set("sign_url", "/s"),
        Err(ScriveError::AttributeIsReadOnly(_))
    ));
}

#[test]
fn delivery_accepts_name_or_wire_value() {
    let s = Signatory::new(Kwargs::new().arg("invitation_delivery_method", "email_mobile")).unwrap();
    assert_eq!(s.invitation_delivery_method().unwrap(), InvitationDeliveryMethod::EmailAndMobile);
    s.as_object().set("invitation_delivery_method", "pad").unwrap();
    assert_eq!(s.invitation_delivery_method().unwrap(), InvitationDeliveryMethod::Pad);

    let err = s.as_object().set("invitation_delivery_method", "fax").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invitation_delivery_method could be InvitationDeliveryMethod's variant name, not: fax"
    );
}

#[test]
fn sign_order_must_be_positive() {
    let err = Signatory::new(Kwargs::new().arg("sign_order", 0)).unwrap_err();
    assert_eq!(err.to_string(), "sign_order must be an integer greater or equal to 1, not: 0");
}

#[test]
fn fields_reject_foreign_elements() {
    let err = Signatory::new(Kwargs::new().arg("fields", vec![Value::Int(5)])).unwrap_err();
    assert_eq!(err.to_string(), "fields must be set of Field objects: elem must be Field, not 5");
}

#[test]
fn wrongly_typed_server_fields_are_invalid_responses() {
    for (key, bad) in [
        ("id", json!(1)),
        ("current", json!("yes")),
        ("saved", json!(0)),
        ("datamismatch", json!(false)),
        ("author", json!(null)),
        ("signlink", json!(["/s"])),
        ("signdate", json!(true)),
    ] {
        let mut json = signatory_json();
        json[key] = bad;
        let err = from_json(&json).unwrap_err();
        assert!(matches!(err, ScriveError::InvalidResponse { .. }), "{key}: {err}");
    }
}

// ── Serialization ────────────────────────────────────────────────

#[test]
fn viewer_is_sent_as_negated_signs() {
    let s = Signatory::new(Kwargs::new().arg("viewer", true)).unwrap();
    let json = s.to_json_object();
    assert_eq!(json["signs"], json!(false));
    assert_eq!(json["delivery"], json!("email"));
    assert_eq!(json["signorder"], json!(1));
    assert_eq!(json["signlink"], serde_json::Value::Null);
}

#[test]
fn deserializes_server_state() {
    let s = from_json(&signatory_json()).unwrap();
    assert_eq!(s.id().unwrap().as_deref(), Some("1"));
    assert_eq!(s.current().unwrap(), Some(true));
    assert_eq!(s.sign_order().unwrap(), 2);
    assert_eq!(s.undelivered_sms_invitation().unwrap(), Some(true));
    assert_eq!(s.invitation_delivery_method().unwrap(), InvitationDeliveryMethod::EmailAndMobile);
    assert_eq!(
        s.confirmation_delivery_method().unwrap(),
        ConfirmationDeliveryMethod::NoDelivery
    );
    assert_eq!(s.authentication_method().unwrap(), AuthenticationMethod::SmsPin);
    assert!(s.viewer().unwrap());
    assert!(s.author().unwrap());
    assert_eq!(s.has_account().unwrap(), Some(false));
    assert_eq!(s.eleg_mismatch_message().unwrap(), None);
    assert_eq!(
        s.sign_success_redirect_url().unwrap().as_deref(),
        Some("https://example.com/ok")
    );
    assert_eq!(s.attachments().unwrap().len().unwrap(), 1);
}

#[test]
fn sign_time_is_parsed() {
    let s = from_json(&signatory_json()).unwrap();
    let t = s.sign_time().unwrap().unwrap();
    assert_eq!((t.year(), t.month(), t.day()), (2014, 10, 29));
    assert_eq!((t.hour(), t.minute(), t.second()), (15, 40, 20));
    assert_eq!(t.timestamp_subsec_micros(), 0);
    assert_eq!(s.view_time().unwrap(), None);
}

#[test]
fn round_trips() {
    let json = signatory_json();
    let s = from_json(&json).unwrap();
    assert_eq!(serde_json::Value::Object(s.to_json_object()), json);
}

#[test]
fn newer_keys_are_optional() {
    let mut json = signatory_json();
    let map = json.as_object_mut().unwrap();
    for key in [
        "authentication",
        "allowshighlighting",
        "rejectionreason",
        "signsuccessredirect",
        "rejectredirect",
        "signlink",
        "attachments",
    ] {
        map.remove(key);
    }
    let s = from_json(&json).unwrap();
    assert_eq!(s.authentication_method().unwrap(), AuthenticationMethod::Standard);
    assert_eq!(s.sign_url().unwrap(), None);
    assert!(s.attachments().unwrap().is_empty().unwrap());
}

#[test]
fn missing_base_key_is_invalid_response() {
    let mut json = signatory_json();
    json.as_object_mut().unwrap().remove("signs");
    let err = from_json(&json).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid response: 'signs' missing in server's JSON response for Signatory"
    );
}

#[test]
fn unknown_delivery_is_invalid_response() {
    let mut json = signatory_json();
    json["delivery"] = json!("carrier_pigeon");
    assert!(matches!(from_json(&json), Err(ScriveError::InvalidResponse { .. })));
}

// ── Full name ────────────────────────────────────────────────────

#[test]
fn full_name_joins_first_and_last_name() {
    let s = signatory();
    assert_eq!(s.full_name().unwrap(), "");
    s.set_fields(vec![Field::standard(StandardFieldType::LastName, "Smith").unwrap()])
        .unwrap();
    assert_eq!(s.full_name().unwrap(), "Smith");
    s.fields()
        .unwrap()
        .insert(Field::standard(StandardFieldType::FirstName, "John").unwrap())
        .unwrap();
    assert_eq!(s.full_name().unwrap(), "John Smith");
}

#[test]
fn set_full_name_creates_missing_fields() {
    let s = signatory();
    s.set_full_name("John Ronald Tolkien").unwrap();
    assert_eq!(s.fields().unwrap().len().unwrap(), 2);
    assert_eq!(s.full_name().unwrap(), "John Ronald Tolkien");

    let last = s
        .fields()
        .unwrap()
        .to_vec()
        .unwrap()
        .into_iter()
        .find(|f| f.standard_type().unwrap() == Some(StandardFieldType::LastName))
        .unwrap();
    assert_eq!(last.value().unwrap(), "Ronald Tolkien");
}

#[test]
fn set_full_name_updates_existing_fields() {
    let first = Field::standard(StandardFieldType::FirstName, "Jane").unwrap();
    let s = Signatory::new(Kwargs::new().arg("fields", vec![first.clone()])).unwrap();
    s.set_full_name("Ada").unwrap();
    assert_eq!(first.value().unwrap(), "Ada");
    assert_eq!(s.fields().unwrap().len().unwrap(), 2);
    assert_eq!(s.full_name().unwrap(), "Ada");
}

#[test]
fn set_full_name_honours_lifecycle() {
    let s = signatory();
    s.make_read_only();
    assert!(matches!(s.set_full_name("John Smith"), Err(ScriveError::EntityIsReadOnly)));
    s.invalidate();
    assert!(matches!(s.set_full_name("John Smith"), Err(ScriveError::InvalidEntity)));
    assert!(matches!(s.full_name(), Err(ScriveError::InvalidEntity)));
}

// ── Absolute sign URL ────────────────────────────────────────────

#[test]
fn absolute_sign_url_without_sign_link_is_none() {
    assert_eq!(signatory().absolute_sign_url().unwrap(), None);
}

#[test]
fn absolute_sign_url_needs_an_api() {
    let s = from_json(&signatory_json()).unwrap();
    assert!(matches!(s.absolute_sign_url(), Err(ScriveError::ApiNotSet)));

    let api: Rc<dyn ApiHandle> = Rc::new(FakeApi);
    let weak: Weak<dyn ApiHandle> = Rc::downgrade(&api);
    s.as_object().attach_api(&weak);
    assert_eq!(
        s.absolute_sign_url().unwrap().as_deref(),
        Some("https://scrive.com/s/1/2/abc")
    );
}

// ── Lifecycle ────────────────────────────────────────────────────

#[test]
fn invalidation_reaches_fields_and_attachments() {
    let field = Field::custom("x", "").unwrap();
    let attachment = SignatoryAttachment::new("id1", "Scan").unwrap();
    let s = signatory();
    s.set_fields(vec![field.clone()]).unwrap();
    s.set_attachments(vec![attachment.clone()]).unwrap();

    s.invalidate();
    assert_eq!(field.state(), LifecycleState::Invalidated);
    assert_eq!(attachment.state(), LifecycleState::Invalidated);
    assert!(matches!(s.sign_order(), Err(ScriveError::InvalidEntity)));
}

#[test]
fn read_only_keeps_server_fields_readable() {
    let s = from_json(&signatory_json()).unwrap();
    s.make_read_only();
    assert_eq!(s.id().unwrap().as_deref(), Some("1"));
    assert!(matches!(s.set_viewer(false), Err(ScriveError::EntityIsReadOnly)));
}
