use anyhow::Result;
use formctl::{
    FormUI, UiOptions,
    io::{DocumentFormat, output::OutputOptions},
};
use serde_json::json;

fn main() -> Result<()> {
    let definition = json!({
        "title": "Client onboarding",
        "description": "Account owner, access and contract dates",
        "fields": [
            {"name": "company", "label": "Company", "variant": "text",
             "rules": {"required": "Company name is required", "minLength": 2}},
            {"name": "password", "label": "Portal password", "variant": "password",
             "rules": {"minLength": 8, "message": "Use at least 8 characters"}},
            {"name": "owners", "label": "Account owners", "variant": "select", "allowMultiple": true,
             "rules": {"required": true},
             "options": [
                 {"group": "Team", "items": ["Alice", "Bob"]},
                 {"group": "Partners", "items": [{"value": "carol", "label": "Carol (agency)"}]}
             ]},
            {"name": "tier", "label": "Tier", "variant": "select", "showAsBars": true,
             "options": ["Starter", "Growth", {"value": "ent", "label": "Enterprise"}]},
            {"name": "region", "label": "Region", "variant": "select",
             "options": ["EU", "US", "APAC"], "default": "EU"},
            {"name": "contactBirthday", "label": "Contact birthday", "variant": "date",
             "dateMode": "birth", "maxDate": "2010-12-31"},
            {"name": "contractEnd", "label": "Contract end", "variant": "date", "dateMode": "expiry",
             "minDate": "2024-01-01", "binding": "direct"},
            {"name": "channels", "label": "Notify via", "variant": "checkbox-group",
             "options": ["Email", "SMS", "Phone"], "default": ["Email"]},
            {"name": "billing", "label": "Billing", "variant": "radio-group",
             "options": ["Monthly", "Yearly"]},
            {"name": "newsletter", "label": "Subscribe to newsletter", "variant": "checkbox"},
            {"name": "notes", "label": "Notes", "variant": "textarea"}
        ]
    });

    let options = UiOptions::default()
        .with_overlay_gap(0)
        .with_max_dropdown_rows(6);
    FormUI::new(definition)
        .with_options(options)
        .with_output(OutputOptions::new(DocumentFormat::Json))
        .run()?;
    Ok(())
}
