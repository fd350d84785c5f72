#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use ui_fixture::browser::mock::MockDriver;
use ui_fixture::config::parser::ConfigParser;
use ui_fixture::config::properties::FixtureProperties;
use ui_fixture::config::settings::FixtureSettings;
use ui_fixture::fixture::fixture::UiFixture;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn orders_properties() -> FixtureProperties {
    ConfigParser::new()
        .parse_file(fixture_path("orders.xml"))
        .expect("orders.xml must parse")
}

/// Wrap form elements in a valid `<ui>` root.
pub fn ui(forms: &str) -> String {
    format!(
        r#"<ui name="Test UI" application="APP" category="Cat" menuname="Menu">{}</ui>"#,
        forms
    )
}

pub fn main_form(definition_id: &str, existence: &str, widgets: &str) -> String {
    format!(
        r#"<form type="main" definitionID="{}" existenceValidationWidget="{}">{}</form>"#,
        definition_id, existence, widgets
    )
}

pub fn popup_form(name: &str, definition_id: &str, existence: &str, widgets: &str) -> String {
    format!(
        r#"<form type="popup" name="{}" definitionID="{}" existenceValidationWidget="{}">{}</form>"#,
        name, definition_id, existence, widgets
    )
}

pub fn widget(name: &str, id: &str, kind: &str) -> String {
    format!(r#"<widget name="{}" id="{}" type="{}"/>"#, name, id, kind)
}

pub fn parse(xml: &str) -> Result<FixtureProperties, ui_fixture::ConfigError> {
    ConfigParser::new().parse_str(xml)
}

/// Three forms: main and popups "A" and "B"; "w1" on main and A, "w2" on B.
pub fn three_form_properties() -> FixtureProperties {
    let xml = ui(&[
        main_form("Main", "w1", &widget("w1", "W1", "textbox")),
        popup_form("A", "PopA", "w1", &widget("w1", "W1", "textbox")),
        popup_form("B", "PopB", "w2", &widget("w2", "W2", "label")),
    ]
    .concat());
    parse(&xml).expect("three-form descriptor must parse")
}

pub fn fixture(properties: FixtureProperties, driver: MockDriver) -> UiFixture<MockDriver> {
    UiFixture::new(Arc::new(properties), FixtureSettings::default(), driver)
}

pub fn fixture_with_settings(
    properties: FixtureProperties,
    settings: FixtureSettings,
    driver: MockDriver,
) -> UiFixture<MockDriver> {
    UiFixture::new(Arc::new(properties), settings, driver)
}
