use pretty_assertions::assert_eq;
use scrive_model::{
    ApiHandle, Codec, Descriptor, EntityKind, Kwargs, Lifecycle, LifecycleState, Object,
    ObjectSet, Rule, ScriveError, Value, WireEnum, wire_enum,
};
use serde_json::json;
use std::rc::{Rc, Weak};

wire_enum! {
    pub enum Mood {
        Calm = ("calm", "Calm"),
        Angry = ("angry", "Angry"),
    }
}

static TWIG: EntityKind = EntityKind {
    name: "Twig",
    descriptors: &[
        Descriptor::new("label").rule(Rule::NonEmptyText),
        Descriptor::new("sign_url").wire("signlink").optional_on_wire(),
    ],
};

static TREE: EntityKind = EntityKind {
    name: "Tree",
    descriptors: &[
        Descriptor::new("id").wire_rule(Rule::Nullable(&Rule::Text)),
        Descriptor::new("title")
            .rule(Rule::Text)
            .default_to(|| Value::from("")),
        Descriptor::new("days")
            .wire("daystosign")
            .rule(Rule::BoundedInt { min: 1, max: 90 })
            .default_to(|| Value::Int(14)),
        Descriptor::new("mood")
            .rule(Rule::Enum(Mood::spec))
            .default_to(|| Value::from(Mood::Calm))
            .codec(Codec::Variant {
                spec: Mood::spec,
                aliases: &[("Furious", "Angry")],
                null_as: Some("Calm"),
            }),
        Descriptor::new("status")
            .wire_rule(Rule::Nullable(&Rule::Enum(Mood::spec)))
            .codec(Codec::Variant {
                spec: Mood::spec,
                aliases: &[],
                null_as: None,
            }),
        Descriptor::new("hidden")
            .wire("shown")
            .rule(Rule::Bool)
            .default_to(|| Value::Bool(false))
            .codec(Codec::Negated),
        Descriptor::new("note")
            .rule(Rule::Nullable(&Rule::Text))
            .default_to(|| Value::Null)
            .codec(Codec::BlankAsNull),
        Descriptor::new("tags")
            .rule(Rule::TextMap)
            .default_to(|| Value::TextMap(Default::default()))
            .codec(Codec::TagList),
        Descriptor::new("planted")
            .wire("ctime")
            .wire_rule(Rule::Nullable(&Rule::Timestamp))
            .codec(Codec::Timestamp),
        Descriptor::new("twigs")
            .rule(Rule::SetOf(&TWIG))
            .default_to(|| Value::List(Vec::new()))
            .codec(Codec::Entities(&TWIG)),
    ],
};

fn twig(label: &str) -> Object {
    Object::new(&TWIG, Kwargs::new().arg("label", label)).unwrap()
}

fn tree_with_twig() -> (Object, Object) {
    let t = twig("a");
    let tree = Object::new(&TREE, Kwargs::new().arg("twigs", vec![t.clone()])).unwrap();
    (tree, t)
}

fn server_json() -> serde_json::Value {
    json!({
        "id": "42",
        "title": "Contract",
        "daystosign": 30,
        "mood": "Angry",
        "status": "Calm",
        "shown": true,
        "note": "",
        "tags": [{"name": "k", "value": "v"}],
        "ctime": "2014-10-29T15:40:20Z",
        "twigs": [{"label": "x", "signlink": "/s/1"}]
    })
}

fn from_json(json: serde_json::Value) -> scrive_model::Result<Object> {
    Object::from_json_str(&TREE, &json.to_string())
}

// ── Keyword construction ─────────────────────────────────────────

#[test]
fn defaults_fill_missing_arguments() {
    let tree = Object::new(&TREE, Kwargs::new()).unwrap();
    assert_eq!(tree.get("title").unwrap(), Value::from(""));
    assert_eq!(tree.get("days").unwrap(), Value::Int(14));
    assert_eq!(tree.get("mood").unwrap(), Value::from(Mood::Calm));
    assert_eq!(tree.get("id").unwrap(), Value::Null);
    assert_eq!(tree.state(), LifecycleState::ReadWrite);
}

#[test]
fn arguments_are_validated() {
    let err = Object::new(&TREE, Kwargs::new().arg("days", 91)).unwrap_err();
    assert_eq!(err.to_string(), "days must be in the <1,90> range (inclusive), not: 91");
}

#[test]
fn required_argument_must_be_given() {
    let err = Object::new(&TWIG, Kwargs::new()).unwrap_err();
    assert!(matches!(err, ScriveError::MissingArgument { entity: "Twig", ref name } if name == "label"));
}

#[test]
fn unexpected_argument_is_rejected() {
    let err = Object::new(&TREE, Kwargs::new().arg("colour", "red")).unwrap_err();
    assert!(matches!(err, ScriveError::UnexpectedArgument { ref name, .. } if name == "colour"));
}

#[test]
fn derived_argument_is_checked_by_its_wire_rule() {
    let tree = Object::new(&TREE, Kwargs::new().arg("status", "Angry")).unwrap();
    assert_eq!(tree.get_as::<Option<Mood>>("status").unwrap(), Some(Mood::Angry));
    assert!(matches!(tree.set("status", "Calm"), Err(ScriveError::AttributeIsReadOnly(_))));

    let err = Object::new(&TREE, Kwargs::new().arg("id", 7)).unwrap_err();
    assert_eq!(err.to_string(), "id must be text or None, not 7");
}

#[test]
fn derived_attribute_without_wire_rule_takes_no_argument() {
    let err = Object::new(&TWIG, Kwargs::new().arg("label", "a").arg("sign_url", "/s/1")).unwrap_err();
    assert!(matches!(err, ScriveError::UnexpectedArgument { ref name, .. } if name == "sign_url"));
}

// ── Get and set ──────────────────────────────────────────────────

#[test]
fn set_coerces_and_stores() {
    let tree = Object::new(&TREE, Kwargs::new()).unwrap();
    tree.set("days", 30.0).unwrap();
    assert_eq!(tree.get_as::<i64>("days").unwrap(), 30);
    tree.set("mood", "angry").unwrap();
    assert_eq!(tree.get_as::<Mood>("mood").unwrap(), Mood::Angry);
}

#[test]
fn failed_set_keeps_old_value() {
    let tree = Object::new(&TREE, Kwargs::new()).unwrap();
    assert!(tree.set("days", 0).is_err());
    assert_eq!(tree.get("days").unwrap(), Value::Int(14));
}

#[test]
fn derived_attribute_cannot_be_set() {
    let tree = Object::new(&TREE, Kwargs::new()).unwrap();
    let err = tree.set("id", "7").unwrap_err();
    assert!(matches!(err, ScriveError::AttributeIsReadOnly(ref name) if name == "id"));
}

#[test]
fn unknown_attribute_is_refused() {
    let tree = Object::new(&TREE, Kwargs::new()).unwrap();
    assert!(matches!(tree.set("colour", 1), Err(ScriveError::UnknownAttribute { .. })));
    assert!(matches!(tree.get("colour"), Err(ScriveError::UnknownAttribute { .. })));

    tree.invalidate();
    assert!(matches!(tree.set("colour", 1), Err(ScriveError::InvalidEntity)));
}

// ── Lifecycle ────────────────────────────────────────────────────

#[test]
fn read_only_allows_reads_and_refuses_writes() {
    let (tree, t) = tree_with_twig();
    tree.make_read_only();
    assert_eq!(tree.get("title").unwrap(), Value::from(""));
    assert!(matches!(tree.set("title", "x"), Err(ScriveError::EntityIsReadOnly)));
    assert!(matches!(t.set("label", "b"), Err(ScriveError::EntityIsReadOnly)));
    assert_eq!(t.state(), LifecycleState::ReadOnly);
}

#[test]
fn read_only_is_idempotent() {
    let tree = Object::new(&TREE, Kwargs::new()).unwrap();
    tree.make_read_only();
    tree.make_read_only();
    assert_eq!(tree.state(), LifecycleState::ReadOnly);
}

#[test]
fn invalidation_is_terminal() {
    let tree = Object::new(&TREE, Kwargs::new()).unwrap();
    tree.invalidate();
    tree.make_read_only();
    assert_eq!(tree.state(), LifecycleState::Invalidated);
    assert!(matches!(tree.get("title"), Err(ScriveError::InvalidEntity)));
    assert!(matches!(tree.set("title", "x"), Err(ScriveError::InvalidEntity)));
}

#[test]
fn invalidation_reaches_children_fetched_earlier() {
    let (tree, t) = tree_with_twig();
    let twigs: ObjectSet = tree.get_as("twigs").unwrap();
    tree.invalidate();
    assert!(matches!(t.get("label"), Err(ScriveError::InvalidEntity)));
    assert!(matches!(twigs.len(), Err(ScriveError::InvalidEntity)));
}

#[test]
fn held_set_refuses_mutation_after_read_only() {
    let (tree, _) = tree_with_twig();
    let twigs: ObjectSet = tree.get_as("twigs").unwrap();
    tree.make_read_only();
    assert_eq!(twigs.len().unwrap(), 1);
    assert!(matches!(twigs.insert(twig("b")), Err(ScriveError::EntityIsReadOnly)));
    assert!(matches!(twigs.clear(), Err(ScriveError::EntityIsReadOnly)));
}

// ── Collections ──────────────────────────────────────────────────

#[test]
fn set_keeps_order_and_ignores_duplicates() {
    let set = ObjectSet::new(&TWIG);
    let (a, b) = (twig("a"), twig("b"));
    assert!(set.insert(a.clone()).unwrap());
    assert!(set.insert(b.clone()).unwrap());
    assert!(!set.insert(a.clone()).unwrap());
    assert_eq!(set.to_vec().unwrap(), vec![a.clone(), b.clone()]);
    assert!(set.remove(&a).unwrap());
    assert!(!set.remove(&a).unwrap());
    assert!(!set.contains(&a).unwrap());
    assert_eq!(set.len().unwrap(), 1);
}

#[test]
fn set_rejects_other_kinds() {
    let set = ObjectSet::new(&TWIG);
    let tree = Object::new(&TREE, Kwargs::new()).unwrap();
    assert!(matches!(set.insert(tree), Err(ScriveError::Validation(_))));
    assert!(set.is_empty().unwrap());
}

// ── Serialization ────────────────────────────────────────────────

#[test]
fn serializes_every_descriptor_under_its_wire_name() {
    let tree = Object::new(&TREE, Kwargs::new().arg("title", "Contract").arg("days", 30)).unwrap();
    assert_eq!(
        serde_json::Value::Object(tree.to_json_object()),
        json!({
            "id": null,
            "title": "Contract",
            "daystosign": 30,
            "mood": "Calm",
            "status": null,
            "shown": true,
            "note": "",
            "tags": [],
            "ctime": null,
            "twigs": []
        })
    );
}

#[test]
fn deserializes_through_codecs() {
    let tree = from_json(server_json()).unwrap();
    assert_eq!(tree.get_as::<String>("id").unwrap(), "42");
    assert_eq!(tree.get_as::<i64>("days").unwrap(), 30);
    assert_eq!(tree.get_as::<Mood>("mood").unwrap(), Mood::Angry);
    assert_eq!(tree.get_as::<Option<Mood>>("status").unwrap(), Some(Mood::Calm));
    assert!(!tree.get_as::<bool>("hidden").unwrap());
    assert_eq!(tree.get("note").unwrap(), Value::Null);
    assert_eq!(
        tree.get_as::<std::collections::BTreeMap<String, String>>("tags").unwrap()["k"],
        "v"
    );
    let planted: chrono::DateTime<chrono::Utc> = tree.get_as("planted").unwrap();
    assert_eq!(planted.to_rfc3339(), "2014-10-29T15:40:20+00:00");

    let twigs = tree.get_as::<ObjectSet>("twigs").unwrap().to_vec().unwrap();
    assert_eq!(twigs.len(), 1);
    assert_eq!(twigs[0].get_as::<String>("sign_url").unwrap(), "/s/1");
}

#[test]
fn round_trip_preserves_json() {
    let json = server_json();
    let tree = from_json(json.clone()).unwrap();
    assert_eq!(serde_json::Value::Object(tree.to_json_object()), json);
}

#[test]
fn variant_codec_applies_aliases_and_null_default() {
    let mut json = server_json();
    json["mood"] = json!("Furious");
    assert_eq!(from_json(json.clone()).unwrap().get_as::<Mood>("mood").unwrap(), Mood::Angry);
    json["mood"] = serde_json::Value::Null;
    assert_eq!(from_json(json).unwrap().get_as::<Mood>("mood").unwrap(), Mood::Calm);
}

#[test]
fn optional_wire_key_may_be_absent() {
    let mut json = server_json();
    json["twigs"] = json!([{"label": "x"}]);
    let tree = from_json(json).unwrap();
    let twigs = tree.get_as::<ObjectSet>("twigs").unwrap().to_vec().unwrap();
    assert_eq!(twigs[0].get("sign_url").unwrap(), Value::Null);
}

#[test]
fn missing_key_names_field_and_entity() {
    let mut json = server_json();
    json.as_object_mut().unwrap().remove("twigs");
    let err = from_json(json).unwrap_err();
    assert!(matches!(err, ScriveError::InvalidResponse { .. }));
    assert_eq!(err.to_string(), "invalid response: 'twigs' missing in server's JSON response for Tree");
}

#[test]
fn rule_failure_in_response_is_invalid_response() {
    let mut json = server_json();
    json["daystosign"] = json!(0);
    let err = from_json(json).unwrap_err();
    assert!(matches!(err, ScriveError::InvalidResponse { source: Some(_), .. }));
}

#[test]
fn nested_failure_aborts_parent() {
    let mut json = server_json();
    json["twigs"] = json!([{"label": "x"}, {"signlink": null}]);
    let err = from_json(json).unwrap_err();
    assert!(err.to_string().contains("for Twig"));
}

#[test]
fn malformed_shapes_are_invalid_responses() {
    for (key, bad) in [
        ("ctime", json!("not a date")),
        ("tags", json!({"k": "v"})),
        ("mood", json!("Sleepy")),
        ("shown", json!("yes")),
        ("twigs", json!({"label": "x"})),
        ("id", json!(5)),
        ("status", json!(true)),
    ] {
        let mut json = server_json();
        json[key] = bad;
        let err = from_json(json).unwrap_err();
        assert!(matches!(err, ScriveError::InvalidResponse { .. }), "{key}: {err}");
    }
}

#[test]
fn non_object_payload_is_rejected() {
    assert!(matches!(
        Object::from_json_str(&TREE, "[1, 2]"),
        Err(ScriveError::InvalidResponse { .. })
    ));
    let err = Object::from_json_str(&TREE, "{not json").unwrap_err();
    assert!(matches!(err, ScriveError::InvalidResponse { .. }));
    assert!(err.to_string().contains("not valid JSON"));
}

// ── API handle ───────────────────────────────────────────────────

struct FakeApi;

impl ApiHandle for FakeApi {
    fn base_url(&self) -> String {
        "https://example.test".to_string()
    }
}

#[test]
fn api_handle_propagates_to_children_and_expires() {
    let (tree, t) = tree_with_twig();
    let api: Rc<dyn ApiHandle> = Rc::new(FakeApi);
    let weak: Weak<dyn ApiHandle> = Rc::downgrade(&api);
    tree.attach_api(&weak);
    assert_eq!(t.api().unwrap().base_url(), "https://example.test");
    drop(api);
    assert!(tree.api().is_none());
}
