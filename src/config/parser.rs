use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::config::properties::{
    FixtureProperties, FormKind, FormProperties, MAIN_FORM, UiProperties,
};
use crate::config::registry::{NodeId, WidgetDescriptor, WidgetRegistry};
use crate::error::ConfigError;
use crate::widget::factory::{FactoryOutcome, StandardWidgetFactory, WidgetFactory};

pub const ROOT_ELEMENT: &str = "ui";
pub const FORM_ELEMENT: &str = "form";
pub const WIDGET_ELEMENT: &str = "widget";

/// Joins a form's definition id and a widget id into a locator.
pub const ID_SEPARATOR: char = '_';

// ============================================================================
// ConfigParser: UI descriptor XML into FixtureProperties
// ============================================================================

/// Builds [`FixtureProperties`] from a UI descriptor.
///
/// Every entry point converges on [`ConfigParser::parse_document`]. Parsing
/// holds no state between calls, so one parser can be reused freely.
pub struct ConfigParser {
    factory: Box<dyn WidgetFactory>,
}

impl Default for ConfigParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser {
    pub fn new() -> Self {
        Self::with_factory(StandardWidgetFactory)
    }

    pub fn with_factory(factory: impl WidgetFactory + 'static) -> Self {
        ConfigParser {
            factory: Box::new(factory),
        }
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<FixtureProperties, ConfigError> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "parsing UI descriptor");
        self.parse_str(&xml)
    }

    pub fn parse_reader(&self, mut reader: impl Read) -> Result<FixtureProperties, ConfigError> {
        let mut xml = String::new();
        reader
            .read_to_string(&mut xml)
            .map_err(|e| ConfigError::Io {
                path: PathBuf::from("<reader>"),
                source: e,
            })?;
        self.parse_str(&xml)
    }

    pub fn parse_str(&self, xml: &str) -> Result<FixtureProperties, ConfigError> {
        let document = Document::parse(xml)?;
        self.parse_document(&document)
    }

    pub fn parse_document(&self, document: &Document<'_>) -> Result<FixtureProperties, ConfigError> {
        let root = document.root_element();
        if !is_element_named(root, ROOT_ELEMENT) {
            return Err(ConfigError::WrongRoot {
                expected: ROOT_ELEMENT,
                found: root.tag_name().name().to_string(),
            });
        }

        let ui = parse_ui(root)?;
        let mut forms = Vec::new();
        let mut seen_keys = HashSet::new();

        for node in root.children().filter(|n| n.is_element()) {
            if !is_element_named(node, FORM_ELEMENT) {
                tracing::debug!(element = node.tag_name().name(), "ignoring non-form element under <ui>");
                continue;
            }
            let header = parse_form_header(node)?;

            if !seen_keys.insert(header.key.clone()) {
                return Err(match header.kind {
                    FormKind::Main => ConfigError::DuplicateMainForm {
                        definition_id: header.definition_id,
                    },
                    FormKind::Popup => ConfigError::DuplicateForm { form: header.key },
                });
            }

            forms.push(self.parse_form(node, header)?);
        }

        if !seen_keys.contains(MAIN_FORM) {
            return Err(ConfigError::MissingMainForm { ui: ui.name });
        }

        let properties = FixtureProperties::new(ui, forms)?;
        tracing::debug!(
            ui = %properties.ui().name,
            forms = properties.form_keys().count(),
            "UI descriptor parsed"
        );
        Ok(properties)
    }

    fn parse_form(&self, node: Node<'_, '_>, header: FormHeader) -> Result<FormProperties, ConfigError> {
        let id_base = format!("{}{}", header.definition_id, ID_SEPARATOR);
        let mut builder = FormBuilder {
            factory: self.factory.as_ref(),
            form: &header.key,
            id_base: &id_base,
            registry: WidgetRegistry::new(),
            seen: HashSet::new(),
        };
        builder.walk(node, None)?;
        let registry = builder.registry;

        if !registry.contains(&header.existence_validation_widget) {
            return Err(ConfigError::MissingExistenceWidget {
                form: header.key,
                widget: header.existence_validation_widget,
            });
        }

        tracing::debug!(
            form = %header.key,
            definition_id = %header.definition_id,
            widgets = registry.len(),
            "form parsed"
        );

        Ok(FormProperties {
            key: header.key,
            kind: header.kind,
            definition_id: header.definition_id,
            id_base,
            existence_validation_widget: header.existence_validation_widget,
            registry,
        })
    }
}

// ============================================================================
// Root and form attributes
// ============================================================================

fn parse_ui(root: Node<'_, '_>) -> Result<UiProperties, ConfigError> {
    Ok(UiProperties {
        name: required_attribute(root, "name")?,
        application: required_attribute(root, "application")?,
        application_full_name: optional_attribute(root, "applicationfullname").unwrap_or_default(),
        category: optional_attribute(root, "category").unwrap_or_default(),
        menu_name: optional_attribute(root, "menuname").unwrap_or_default(),
        url_base: optional_attribute(root, "url"),
    })
}

struct FormHeader {
    key: String,
    kind: FormKind,
    definition_id: String,
    existence_validation_widget: String,
}

fn parse_form_header(node: Node<'_, '_>) -> Result<FormHeader, ConfigError> {
    let definition_id = required_attribute(node, "definitionID")?;
    let form_type = required_attribute(node, "type")?;
    let existence_validation_widget = required_attribute(node, "existenceValidationWidget")?;

    let (kind, key) = if form_type.eq_ignore_ascii_case("main") {
        // Any name on the main form is ignored.
        (FormKind::Main, MAIN_FORM.to_string())
    } else if form_type.eq_ignore_ascii_case("popup") {
        let name = optional_attribute(node, "name").ok_or_else(|| ConfigError::PopupWithoutName {
            definition_id: definition_id.clone(),
        })?;
        (FormKind::Popup, name)
    } else {
        return Err(ConfigError::InvalidFormType {
            form: definition_id,
            value: form_type,
        });
    };

    Ok(FormHeader {
        key,
        kind,
        definition_id,
        existence_validation_widget,
    })
}

// ============================================================================
// Widget tree walk
// ============================================================================

struct FormBuilder<'a> {
    factory: &'a dyn WidgetFactory,
    form: &'a str,
    id_base: &'a str,
    registry: WidgetRegistry,
    /// Names of every `<widget>` element seen, supported or not
    seen: HashSet<String>,
}

impl FormBuilder<'_> {
    /// Depth-first walk of `node`'s element children. Elements that do not
    /// become registry entries (unsupported widgets, structural markup) are
    /// transparent: their children attach to `parent`.
    fn walk(&mut self, node: Node<'_, '_>, parent: Option<NodeId>) -> Result<(), ConfigError> {
        for child in node.children().filter(|n| n.is_element()) {
            if !is_element_named(child, WIDGET_ELEMENT) {
                self.walk(child, parent)?;
                continue;
            }

            let descriptor = self.read_descriptor(child, parent)?;
            let outcome = self.factory.create(
                &descriptor.name,
                &descriptor.id,
                descriptor.type_tag.as_deref(),
                self.id_base,
            )?;

            match outcome {
                FactoryOutcome::Created(widget) => {
                    let id = self.registry.insert(widget, descriptor.parent);
                    self.walk(child, Some(id))?;
                }
                FactoryOutcome::Unsupported { .. } => {
                    self.walk(child, descriptor.parent)?;
                }
            }
        }
        Ok(())
    }

    fn read_descriptor(
        &mut self,
        node: Node<'_, '_>,
        parent: Option<NodeId>,
    ) -> Result<WidgetDescriptor, ConfigError> {
        let name = required_attribute(node, "name")?;
        let id = required_attribute(node, "id")?;
        let type_tag = required_attribute(node, "type")?;

        if !self.seen.insert(name.clone()) {
            return Err(ConfigError::DuplicateWidget {
                form: self.form.to_string(),
                widget: name,
            });
        }

        Ok(WidgetDescriptor {
            name,
            id,
            type_tag: Some(type_tag),
            parent,
        })
    }
}

// ============================================================================
// Attribute helpers
// ============================================================================

fn is_element_named(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name().eq_ignore_ascii_case(name)
}

/// Trimmed attribute value, matched ASCII case-insensitively. Empty values
/// count as absent.
fn optional_attribute(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attributes()
        .find(|attribute| attribute.name().eq_ignore_ascii_case(name))
        .map(|attribute| attribute.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required_attribute(node: Node<'_, '_>, name: &'static str) -> Result<String, ConfigError> {
    optional_attribute(node, name).ok_or_else(|| ConfigError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: name,
    })
}
