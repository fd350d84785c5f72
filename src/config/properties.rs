use std::collections::BTreeMap;
use std::fmt::Write;

use crate::config::registry::{NodeId, WidgetRegistry};
use crate::error::{ConfigError, form_label};
use crate::widget::widget_model::Widget;

/// Form key of the main UI window.
pub const MAIN_FORM: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Main,
    Popup,
}

/// UI-level metadata from the descriptor's root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiProperties {
    pub name: String,
    pub application: String,
    pub application_full_name: String,
    pub category: String,
    pub menu_name: String,
    pub url_base: Option<String>,
}

/// One parsed form with its widget namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormProperties {
    /// `""` for the main form, the popup name otherwise
    pub key: String,
    pub kind: FormKind,
    pub definition_id: String,
    /// Locator prefix shared by every widget on the form
    pub id_base: String,
    pub existence_validation_widget: String,
    pub registry: WidgetRegistry,
}

impl FormProperties {
    /// The widget whose presence confirms the form has opened.
    pub fn existence_widget(&self) -> Option<&Widget> {
        self.registry.get(&self.existence_validation_widget)
    }
}

/// Validated result of parsing one UI descriptor.
///
/// Immutable once built; share it between fixtures behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureProperties {
    ui: UiProperties,
    forms: BTreeMap<String, FormProperties>,
    sign_in_validation_locator: String,
}

impl FixtureProperties {
    /// Assemble properties, enforcing the aggregate invariants: a non-empty
    /// application id, exactly one main form keyed `""`, named popups with
    /// unique keys, and an existence validation widget that resolves on
    /// every form.
    pub fn new(ui: UiProperties, forms: Vec<FormProperties>) -> Result<Self, ConfigError> {
        if ui.application.trim().is_empty() {
            return Err(ConfigError::MissingAttribute {
                element: "ui".into(),
                attribute: "application",
            });
        }

        let mut mains = forms.iter().filter(|form| form.kind == FormKind::Main);
        if mains.next().is_none() {
            return Err(ConfigError::MissingMainForm {
                ui: ui.name.clone(),
            });
        }
        if let Some(second) = mains.next() {
            return Err(ConfigError::DuplicateMainForm {
                definition_id: second.definition_id.clone(),
            });
        }

        let mut by_key: BTreeMap<String, FormProperties> = BTreeMap::new();
        for form in forms {
            match form.kind {
                FormKind::Main if form.key != MAIN_FORM => {
                    return Err(ConfigError::MainFormWithKey {
                        definition_id: form.definition_id.clone(),
                        form: form.key.clone(),
                    });
                }
                FormKind::Popup if form.key.is_empty() => {
                    return Err(ConfigError::PopupWithoutName {
                        definition_id: form.definition_id.clone(),
                    });
                }
                _ => {}
            }
            if form.existence_widget().is_none() {
                return Err(ConfigError::MissingExistenceWidget {
                    form: form.key.clone(),
                    widget: form.existence_validation_widget.clone(),
                });
            }
            if by_key.contains_key(&form.key) {
                return Err(ConfigError::DuplicateForm {
                    form: form.key.clone(),
                });
            }
            by_key.insert(form.key.clone(), form);
        }

        let sign_in_validation_locator = by_key
            .get(MAIN_FORM)
            .and_then(FormProperties::existence_widget)
            .map(|widget| widget.wait_target.clone())
            .filter(|locator| !locator.is_empty())
            .ok_or_else(|| ConfigError::MissingMainForm {
                ui: ui.name.clone(),
            })?;

        Ok(FixtureProperties {
            ui,
            forms: by_key,
            sign_in_validation_locator,
        })
    }

    pub fn ui(&self) -> &UiProperties {
        &self.ui
    }

    pub fn application(&self) -> &str {
        &self.ui.application
    }

    /// Wait-target locator of the main form's existence validation widget.
    pub fn sign_in_validation_locator(&self) -> &str {
        &self.sign_in_validation_locator
    }

    pub fn form(&self, key: &str) -> Option<&FormProperties> {
        self.forms.get(key)
    }

    pub fn has_form(&self, key: &str) -> bool {
        self.forms.contains_key(key)
    }

    pub fn main_form(&self) -> &FormProperties {
        // Presence is checked in `new`.
        &self.forms[MAIN_FORM]
    }

    /// Form keys in sorted order; the main form (`""`) comes first.
    pub fn form_keys(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }

    pub fn forms(&self) -> impl Iterator<Item = &FormProperties> {
        self.forms.values()
    }

    pub fn registry(&self, form: &str) -> Option<&WidgetRegistry> {
        self.forms.get(form).map(|f| &f.registry)
    }

    pub fn registries(&self) -> BTreeMap<&str, &WidgetRegistry> {
        self.forms
            .iter()
            .map(|(key, form)| (key.as_str(), &form.registry))
            .collect()
    }

    pub fn existence_validation_widget(&self, form: &str) -> Option<&Widget> {
        self.forms.get(form).and_then(FormProperties::existence_widget)
    }

    pub fn existence_validation_widgets(&self) -> BTreeMap<&str, &Widget> {
        self.forms
            .iter()
            .filter_map(|(key, form)| Some((key.as_str(), form.existence_widget()?)))
            .collect()
    }

    /// Resolve a widget name within one form's namespace.
    pub fn resolve(&self, form: &str, widget: &str) -> Result<&Widget, ConfigError> {
        let registry = self.registry(form).ok_or_else(|| ConfigError::UnknownForm {
            form: form.to_string(),
        })?;
        registry.get(widget).ok_or_else(|| ConfigError::UnknownWidget {
            widget: widget.to_string(),
            form: form.to_string(),
        })
    }

    /// Human-readable outline of every form and its widget tree.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "UI '{}' ({} / {})",
            self.ui.name, self.ui.application, self.ui.category
        );
        for form in self.forms.values() {
            let _ = writeln!(
                out,
                "  {} [{}] ({} widgets, ready when '{}' is present)",
                form_label(&form.key),
                form.definition_id,
                form.registry.len(),
                form.existence_validation_widget
            );
            for (id, _) in form.registry.roots() {
                describe_node(&form.registry, id, 2, &mut out);
            }
        }
        out
    }
}

fn describe_node(registry: &WidgetRegistry, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = registry.node(id) else {
        return;
    };
    let _ = writeln!(
        out,
        "{}- {} ({}) -> {}",
        "  ".repeat(depth),
        node.widget.name,
        node.widget.type_name(),
        node.widget.locator
    );
    for child in &node.children {
        describe_node(registry, *child, depth + 1, out);
    }
}
