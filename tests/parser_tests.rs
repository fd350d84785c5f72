use std::collections::BTreeSet;
use std::io::Write;

use ui_fixture::config::parser::ConfigParser;
use ui_fixture::config::properties::{FixtureProperties, FormKind, FormProperties, MAIN_FORM};
use ui_fixture::error::ConfigError;
use ui_fixture::widget::factory::{FactoryOutcome, WidgetFactory};
use ui_fixture::widget::widget_model::{Widget, WidgetKind};

use crate::common::{
    fixture_path, main_form, orders_properties, parse, popup_form, three_form_properties, ui,
    widget,
};

mod common;

// =========================================================================
// Well-formed descriptors
// =========================================================================

#[test]
fn orders_descriptor_exposes_ui_metadata() {
    let props = orders_properties();
    let ui = props.ui();

    assert_eq!(ui.name, "Orders");
    assert_eq!(ui.application, "ERP");
    assert_eq!(ui.application_full_name, "Enterprise Resource Planning");
    assert_eq!(ui.category, "Sales");
    assert_eq!(ui.menu_name, "Order Entry");
    assert_eq!(ui.url_base.as_deref(), Some("https://erp.example.com/app"));
}

#[test]
fn form_keys_are_main_plus_popup_names() {
    let props = three_form_properties();
    let keys: BTreeSet<&str> = props.form_keys().collect();
    assert_eq!(keys, BTreeSet::from(["", "A", "B"]));
    assert_eq!(props.registries().len(), 3);
    assert_eq!(props.existence_validation_widgets().len(), 3);
}

#[test]
fn widget_locators_use_form_id_base() {
    let props = orders_properties();
    let main = props.main_form();
    assert_eq!(main.kind, FormKind::Main);
    assert_eq!(main.id_base, "OrderMain_");

    let order = main.registry.get("orderNumber").unwrap();
    assert_eq!(order.kind, WidgetKind::TextBox);
    assert_eq!(order.locator, "OrderMain_OrderNumber");

    let pin = main.registry.get("pin").unwrap();
    assert_eq!(pin.locator, "OrderMain_Pin_pwd");

    let search = props.form("customerSearch").unwrap();
    assert_eq!(search.kind, FormKind::Popup);
    assert_eq!(
        search.registry.get("searchText").unwrap().locator,
        "CustSearch_SearchText"
    );
}

#[test]
fn sign_in_locator_is_main_existence_widget_wait_target() {
    let props = orders_properties();
    assert_eq!(props.sign_in_validation_locator(), "OrderMain_OrderNumber");
    assert_eq!(
        props.existence_validation_widget(MAIN_FORM).unwrap().name,
        "orderNumber"
    );
    assert_eq!(
        props.existence_validation_widget("customerSearch").unwrap().name,
        "searchText"
    );
}

#[test]
fn sign_in_locator_follows_wait_target_suffix() {
    let xml = ui(&main_form("Home", "due", &widget("due", "Due", "datebox")));
    let props = parse(&xml).unwrap();
    assert_eq!(props.sign_in_validation_locator(), "Home_Due_input");
}

#[test]
fn nested_widgets_link_to_their_parent() {
    let props = orders_properties();
    let registry = props.registry(MAIN_FORM).unwrap();

    assert_eq!(registry.parent_of("rush").unwrap().name, "details");
    assert_eq!(registry.parent_of("shipVia").unwrap().name, "details");
    assert!(registry.parent_of("details").is_none());

    let children: Vec<&str> = registry
        .children_of("details")
        .iter()
        .map(|w| w.name.as_str())
        .collect();
    assert_eq!(children, vec!["rush", "shipVia", "express"]);
}

#[test]
fn main_form_name_attribute_is_ignored() {
    let xml = ui(
        r#"<form type="main" name="Home" definitionID="Main" existenceValidationWidget="a"><widget name="a" id="A" type="label"/></form>"#,
    );
    let props = parse(&xml).unwrap();
    let keys: Vec<&str> = props.form_keys().collect();
    assert_eq!(keys, vec![""]);
}

#[test]
fn form_type_and_element_names_are_case_insensitive() {
    let xml = r#"<UI name="X" application="APP">
        <Form type="MAIN" definitionId="Main" existenceValidationWidget="a">
            <Widget name="a" id="A" type="Label"/>
        </Form>
    </UI>"#;
    let props = parse(xml).unwrap();
    assert!(props.registry(MAIN_FORM).unwrap().contains("a"));
}

// =========================================================================
// Form-level configuration errors
// =========================================================================

#[test]
fn zero_main_forms_is_an_error() {
    let xml = ui(&popup_form("P", "Pop", "a", &widget("a", "A", "label")));
    assert!(matches!(parse(&xml), Err(ConfigError::MissingMainForm { .. })));
}

#[test]
fn empty_ui_is_missing_main_form() {
    assert!(matches!(parse(&ui("")), Err(ConfigError::MissingMainForm { .. })));
}

#[test]
fn two_main_forms_is_an_error() {
    let xml = ui(&[
        main_form("First", "a", &widget("a", "A", "label")),
        main_form("Second", "b", &widget("b", "B", "label")),
    ]
    .concat());
    match parse(&xml) {
        Err(ConfigError::DuplicateMainForm { definition_id }) => assert_eq!(definition_id, "Second"),
        other => panic!("Expected DuplicateMainForm, got {:?}", other),
    }
}

#[test]
fn popup_without_name_is_an_error() {
    let xml = ui(&[
        main_form("Main", "a", &widget("a", "A", "label")),
        r#"<form type="popup" definitionID="Pop" existenceValidationWidget="b"><widget name="b" id="B" type="label"/></form>"#.to_string(),
    ]
    .concat());
    assert!(matches!(parse(&xml), Err(ConfigError::PopupWithoutName { .. })));
}

#[test]
fn duplicate_popup_names_are_an_error() {
    let xml = ui(&[
        main_form("Main", "a", &widget("a", "A", "label")),
        popup_form("P", "Pop1", "b", &widget("b", "B", "label")),
        popup_form("P", "Pop2", "c", &widget("c", "C", "label")),
    ]
    .concat());
    assert!(matches!(parse(&xml), Err(ConfigError::DuplicateForm { form }) if form == "P"));
}

#[test]
fn unknown_form_type_is_an_error() {
    let xml = ui(
        r#"<form type="dialog" name="D" definitionID="Dlg" existenceValidationWidget="a"><widget name="a" id="A" type="label"/></form>"#,
    );
    assert!(matches!(
        parse(&xml),
        Err(ConfigError::InvalidFormType { value, .. }) if value == "dialog"
    ));
}

#[test]
fn form_without_existence_widget_attribute_is_an_error() {
    let xml = ui(r#"<form type="main" definitionID="Main"><widget name="a" id="A" type="label"/></form>"#);
    assert!(matches!(
        parse(&xml),
        Err(ConfigError::MissingAttribute { attribute: "existenceValidationWidget", .. })
    ));
}

#[test]
fn existence_widget_must_be_on_its_own_form() {
    // "a" exists, but only on the main form
    let xml = ui(&[
        main_form("Main", "a", &widget("a", "A", "label")),
        popup_form("P", "Pop", "a", &widget("b", "B", "label")),
    ]
    .concat());
    match parse(&xml) {
        Err(ConfigError::MissingExistenceWidget { form, widget }) => {
            assert_eq!(form, "P");
            assert_eq!(widget, "a");
        }
        other => panic!("Expected MissingExistenceWidget, got {:?}", other),
    }
}

#[test]
fn existence_widget_of_unsupported_type_does_not_count() {
    let xml = ui(&main_form("Main", "panel", &widget("panel", "Panel", "panel")));
    assert!(matches!(parse(&xml), Err(ConfigError::MissingExistenceWidget { .. })));
}

// =========================================================================
// Invariants enforced when assembling properties directly
// =========================================================================

fn orders_forms() -> (FixtureProperties, FormProperties, FormProperties) {
    let props = orders_properties();
    let main = props.main_form().clone();
    let popup = props.form("customerSearch").unwrap().clone();
    (props, main, popup)
}

#[test]
fn assembling_from_parsed_forms_reproduces_the_parse() {
    let (props, main, popup) = orders_forms();
    let rebuilt = FixtureProperties::new(props.ui().clone(), vec![popup, main]).unwrap();
    assert_eq!(rebuilt, props);
}

#[test]
fn second_main_form_under_another_key_is_rejected() {
    let (props, main, popup) = orders_forms();
    let mut second = main.clone();
    second.key = "X".into();
    second.definition_id = "OrderMain2".into();

    let result = FixtureProperties::new(props.ui().clone(), vec![main, popup, second]);
    assert!(matches!(
        result,
        Err(ConfigError::DuplicateMainForm { definition_id }) if definition_id == "OrderMain2"
    ));
}

#[test]
fn popup_under_the_main_key_is_not_a_main_form() {
    let (props, mut main, _) = orders_forms();
    main.kind = FormKind::Popup;

    let result = FixtureProperties::new(props.ui().clone(), vec![main]);
    assert!(matches!(result, Err(ConfigError::MissingMainForm { .. })));
}

#[test]
fn main_key_belongs_to_the_main_form_only() {
    let (props, main, mut popup) = orders_forms();
    let mut renamed = main.clone();
    renamed.key = "relocated".into();
    popup.key = MAIN_FORM.into();

    let result = FixtureProperties::new(props.ui().clone(), vec![renamed, popup]);
    assert!(matches!(result, Err(ConfigError::MainFormWithKey { form, .. }) if form == "relocated"));

    let (props, main, mut popup) = orders_forms();
    popup.key = MAIN_FORM.into();
    let result = FixtureProperties::new(props.ui().clone(), vec![main, popup]);
    assert!(matches!(
        result,
        Err(ConfigError::PopupWithoutName { definition_id }) if definition_id == "CustSearch"
    ));
}

#[test]
fn repeated_popup_key_is_rejected() {
    let (props, main, popup) = orders_forms();
    let result = FixtureProperties::new(props.ui().clone(), vec![main, popup.clone(), popup]);
    assert!(matches!(
        result,
        Err(ConfigError::DuplicateForm { form }) if form == "customerSearch"
    ));
}

// =========================================================================
// Widget-level configuration errors and namespaces
// =========================================================================

#[test]
fn duplicate_widget_names_in_one_form_is_an_error() {
    let widgets = [widget("a", "A", "label"), widget("a", "A2", "button")].concat();
    let xml = ui(&main_form("Main", "a", &widgets));
    assert!(matches!(
        parse(&xml),
        Err(ConfigError::DuplicateWidget { form, widget }) if form.is_empty() && widget == "a"
    ));
}

#[test]
fn duplicate_names_are_detected_across_nesting_levels() {
    let widgets = r#"<widget name="tab" id="Tab" type="tab"><widget name="tab" id="Inner" type="label"/></widget>"#;
    let xml = ui(&main_form("Main", "tab", widgets));
    assert!(matches!(parse(&xml), Err(ConfigError::DuplicateWidget { .. })));
}

#[test]
fn unsupported_widget_names_count_as_duplicates() {
    let widgets = [
        widget("status", "Status", "label"),
        widget("status", "StatusBox", "groupbox"),
    ]
    .concat();
    let xml = ui(&main_form("Main", "status", &widgets));
    assert!(matches!(
        parse(&xml),
        Err(ConfigError::DuplicateWidget { widget, .. }) if widget == "status"
    ));

    // Same rule when the unsupported element comes first
    let widgets = [
        widget("status", "StatusBox", "groupbox"),
        widget("status", "Status", "label"),
    ]
    .concat();
    let xml = ui(&main_form("Main", "status", &widgets));
    assert!(matches!(parse(&xml), Err(ConfigError::DuplicateWidget { .. })));
}

#[test]
fn same_widget_name_in_two_forms_is_allowed() {
    let props = three_form_properties();
    let main_w1 = props.resolve(MAIN_FORM, "w1").unwrap();
    let popup_w1 = props.resolve("A", "w1").unwrap();
    assert_eq!(main_w1.locator, "Main_W1");
    assert_eq!(popup_w1.locator, "PopA_W1");
    assert!(!std::ptr::eq(main_w1, popup_w1));
}

#[test]
fn widget_missing_id_is_an_error() {
    let xml = ui(&main_form("Main", "a", r#"<widget name="a" type="label"/>"#));
    assert!(matches!(
        parse(&xml),
        Err(ConfigError::MissingAttribute { attribute: "id", .. })
    ));
}

#[test]
fn widget_with_empty_name_is_an_error() {
    let xml = ui(&main_form("Main", "a", r#"<widget name="  " id="A" type="label"/>"#));
    assert!(matches!(
        parse(&xml),
        Err(ConfigError::MissingAttribute { attribute: "name", .. })
    ));
}

#[test]
fn widget_missing_type_is_an_error() {
    let xml = ui(&main_form("Main", "a", r#"<widget name="a" id="A"/>"#));
    assert!(matches!(
        parse(&xml),
        Err(ConfigError::MissingAttribute { attribute: "type", .. })
    ));
}

// =========================================================================
// Unsupported widget types
// =========================================================================

#[test]
fn unsupported_top_level_wrapper_is_transparent() {
    let widgets = r#"
        <widget name="anchor" id="Anchor" type="label"/>
        <widget name="group" id="Group" type="groupbox">
            <widget name="first" id="First" type="textbox"/>
            <widget name="second" id="Second" type="button"/>
        </widget>"#;
    let props = parse(&ui(&main_form("Main", "anchor", widgets))).unwrap();
    let registry = props.registry(MAIN_FORM).unwrap();

    assert!(!registry.contains("group"));
    assert!(registry.contains("first"));
    assert!(registry.contains("second"));
    assert!(registry.parent_of("first").is_none());
    assert!(registry.parent_of("second").is_none());
    assert_eq!(registry.len(), 3);
}

#[test]
fn unsupported_nested_wrapper_reparents_to_grandparent() {
    let widgets = r#"
        <widget name="tab" id="Tab" type="tab">
            <widget name="layout" id="Layout" type="gridlayout">
                <widget name="inner" id="Inner" type="checkbox">
                    <widget name="hint" id="Hint" type="label"/>
                </widget>
            </widget>
        </widget>"#;
    let props = parse(&ui(&main_form("Main", "tab", widgets))).unwrap();
    let registry = props.registry(MAIN_FORM).unwrap();

    assert!(!registry.contains("layout"));
    assert_eq!(registry.parent_of("inner").unwrap().name, "tab");
    assert_eq!(registry.parent_of("hint").unwrap().name, "inner");
    let tab_children: Vec<&str> = registry
        .children_of("tab")
        .iter()
        .map(|w| w.name.as_str())
        .collect();
    assert_eq!(tab_children, vec!["inner"]);
}

#[test]
fn structural_markup_between_widgets_is_walked() {
    let widgets = r#"
        <section>
            <row><widget name="a" id="A" type="textbox"/></row>
        </section>"#;
    let props = parse(&ui(&main_form("Main", "a", widgets))).unwrap();
    assert_eq!(props.registry(MAIN_FORM).unwrap().get("a").unwrap().locator, "Main_A");
}

// =========================================================================
// Root element and UI attributes
// =========================================================================

#[test]
fn wrong_root_element_is_an_error() {
    let xml = r#"<screen name="X" application="APP"/>"#;
    assert!(matches!(
        parse(xml),
        Err(ConfigError::WrongRoot { found, .. }) if found == "screen"
    ));
}

#[test]
fn malformed_xml_is_an_error() {
    assert!(matches!(parse("<ui name=\"x\""), Err(ConfigError::Xml(_))));
}

#[test]
fn missing_application_is_an_error() {
    let xml = format!(
        r#"<ui name="X">{}</ui>"#,
        main_form("Main", "a", &widget("a", "A", "label"))
    );
    assert!(matches!(
        parse(&xml),
        Err(ConfigError::MissingAttribute { attribute: "application", .. })
    ));
}

#[test]
fn empty_application_is_treated_as_missing() {
    let xml = format!(
        r#"<ui name="X" application="   ">{}</ui>"#,
        main_form("Main", "a", &widget("a", "A", "label"))
    );
    assert!(matches!(
        parse(&xml),
        Err(ConfigError::MissingAttribute { attribute: "application", .. })
    ));
}

#[test]
fn optional_ui_attributes_default_to_empty() {
    let xml = format!(
        r#"<ui name="X" application="APP">{}</ui>"#,
        main_form("Main", "a", &widget("a", "A", "label"))
    );
    let props = parse(&xml).unwrap();
    assert_eq!(props.ui().category, "");
    assert_eq!(props.ui().menu_name, "");
    assert_eq!(props.ui().application_full_name, "");
    assert_eq!(props.ui().url_base, None);
}

// =========================================================================
// Entry points converge and are idempotent
// =========================================================================

#[test]
fn file_reader_and_document_inputs_agree() {
    let parser = ConfigParser::new();
    let from_path = parser.parse_file(fixture_path("orders.xml")).unwrap();

    let file = std::fs::File::open(fixture_path("orders.xml")).unwrap();
    let from_reader = parser.parse_reader(file).unwrap();

    let xml = std::fs::read_to_string(fixture_path("orders.xml")).unwrap();
    let document = roxmltree::Document::parse(&xml).unwrap();
    let from_document = parser.parse_document(&document).unwrap();

    assert_eq!(from_path, from_reader);
    assert_eq!(from_path, from_document);
}

#[test]
fn parsing_twice_gives_equal_results() {
    let parser = ConfigParser::new();
    let xml = std::fs::read_to_string(fixture_path("orders.xml")).unwrap();
    assert_eq!(parser.parse_str(&xml).unwrap(), parser.parse_str(&xml).unwrap());
}

#[test]
fn parse_file_from_temp_dir() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        ui(&main_form("Main", "a", &widget("a", "A", "button")))
    )
    .unwrap();

    let props = ConfigParser::new().parse_file(file.path()).unwrap();
    assert_eq!(props.application(), "APP");
}

#[test]
fn missing_file_is_an_io_error() {
    let result = ConfigParser::new().parse_file(fixture_path("does-not-exist.xml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

// =========================================================================
// Custom factories
// =========================================================================

/// Treats every widget as a label, except "skip" which is unsupported.
struct LabelsOnly;

impl WidgetFactory for LabelsOnly {
    fn create(
        &self,
        name: &str,
        id: &str,
        type_tag: Option<&str>,
        id_base: &str,
    ) -> Result<FactoryOutcome, ConfigError> {
        if type_tag == Some("skip") {
            return Ok(FactoryOutcome::Unsupported {
                type_tag: type_tag.map(str::to_string),
            });
        }
        Ok(FactoryOutcome::Created(Widget::new(name, id, WidgetKind::Label, id_base)))
    }
}

#[test]
fn parser_uses_the_supplied_factory() {
    let widgets = [widget("a", "A", "textbox"), widget("b", "B", "skip")].concat();
    let xml = ui(&main_form("Main", "a", &widgets));

    let props = ConfigParser::with_factory(LabelsOnly).parse_str(&xml).unwrap();
    let registry = props.registry(MAIN_FORM).unwrap();
    assert_eq!(registry.get("a").unwrap().kind, WidgetKind::Label);
    assert!(!registry.contains("b"));
}

#[test]
fn describe_lists_every_form_and_nested_widget() {
    let outline = orders_properties().describe();
    println!("{}", outline);
    assert!(outline.contains("UI 'Orders'"));
    assert!(outline.contains("the main form [OrderMain]"));
    assert!(outline.contains("form 'customerSearch' [CustSearch]"));
    assert!(outline.contains("      - rush (Check Box) -> OrderMain_Rush"));
}
