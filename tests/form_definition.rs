use formctl::{
    FormUI, ResolvedValue, UiOptions,
    domain::{BindingMode, Variant},
    io::{DocumentFormat, input::load_document},
};
use serde_json::json;
use time::macros::date;

fn client_definition() -> serde_json::Value {
    json!({
        "title": "Client",
        "description": "Onboarding",
        "fields": [
            {"name": "company", "label": "Company", "variant": "text", "rules": {"required": true}},
            {"name": "owners", "label": "Owners", "variant": "select", "allowMultiple": true,
             "options": [{"group": "Team", "items": ["Alice", "Bob"]}], "default": "Alice"},
            {"name": "renewal", "label": "Renewal", "variant": "date", "dateMode": "expiry",
             "default": "2024-07-15"},
            {"name": "channels", "label": "Channels", "variant": "checkbox-group",
             "options": ["Email", "SMS"], "binding": "direct"},
            {"name": "notes", "variant": "textarea", "binding": "delegated"}
        ]
    })
}

#[test]
fn builds_controls_in_declaration_order_with_seeded_defaults() {
    let form = FormUI::new(client_definition())
        .with_options(UiOptions::default().with_today(date!(2024 - 06 - 15)))
        .build_state()
        .expect("form builds");

    assert_eq!(form.title(), "Client");
    assert_eq!(form.description(), Some("Onboarding"));
    let variants = form
        .controls()
        .iter()
        .map(|control| control.spec().variant)
        .collect::<Vec<_>>();
    assert_eq!(
        variants,
        [
            Variant::Text,
            Variant::Select,
            Variant::Date,
            Variant::CheckboxGroup,
            Variant::Textarea
        ]
    );

    let owners = form.control("owners").unwrap();
    assert_eq!(owners.value(), ResolvedValue::List(vec!["Alice".into()]));
    let renewal = form.control("renewal").unwrap();
    assert_eq!(renewal.badge().as_deref(), Some("in 1 month"));
    assert_eq!(
        form.control("channels").unwrap().binding_mode(),
        BindingMode::Direct
    );
    assert_eq!(
        form.control("notes").unwrap().binding_mode(),
        BindingMode::Delegated
    );
    assert!(!form.is_dirty(), "defaults do not count as edits");
    assert_eq!(
        form.values(),
        json!({
            "company": null,
            "owners": ["Alice"],
            "renewal": "2024-07-15",
            "channels": null,
            "notes": null
        })
    );
}

#[test]
fn title_override_wins() {
    let form = FormUI::new(client_definition())
        .with_title("Renamed")
        .build_state()
        .unwrap();
    assert_eq!(form.title(), "Renamed");
}

#[test]
fn invalid_definitions_are_reported_with_their_location() {
    let unknown = FormUI::new(json!({"fields": [{"name": "a", "variant": "slider"}]}));
    let err = unknown.definition().unwrap_err();
    assert!(format!("{err:#}").contains("slider"));

    let multi_text = FormUI::new(json!({
        "fields": [{"name": "a", "variant": "text", "allowMultiple": true}]
    }));
    let err = multi_text.build_state().unwrap_err();
    assert!(format!("{err:#}").contains("/fields/0"));

    let bad_rules = FormUI::new(json!({
        "fields": [{"name": "a", "variant": "text", "rules": ["required"]}]
    }));
    let err = bad_rules.build_state().unwrap_err();
    assert!(format!("{err:#}").contains("invalid rules for field `a`"));
}

#[test]
fn documents_load_from_disk_by_extension() {
    let dir = std::env::temp_dir().join(format!("formctl-definition-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("client.json");
    std::fs::write(&path, client_definition().to_string()).unwrap();

    let value = load_document(&path, None).unwrap();
    let form = FormUI::from_document(&value.to_string(), DocumentFormat::Json)
        .unwrap()
        .build_state()
        .unwrap();
    assert_eq!(form.controls().len(), 5);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn controls_are_addressable_by_element_id() {
    let form = FormUI::new(json!({
        "fields": [
            {"name": "company", "id": "company-name", "variant": "text"},
            {"name": "notes", "variant": "textarea"}
        ]
    }))
    .build_state()
    .unwrap();
    assert_eq!(
        form.control_by_id("company-name").unwrap().spec().name,
        "company"
    );
    assert_eq!(form.control_by_id("notes").unwrap().spec().id, "notes");
    assert!(form.control_by_id("company").is_none());
}
