use crate::error::ConfigError;
use crate::widget::widget_model::{Widget, WidgetKind};

/// Result of asking a factory for a widget.
///
/// `Unsupported` is not an error: descriptors are shared with tooling that
/// adds structural elements the fixture cannot automate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryOutcome {
    Created(Widget),
    Unsupported { type_tag: Option<String> },
}

impl FactoryOutcome {
    pub fn widget(self) -> Option<Widget> {
        match self {
            FactoryOutcome::Created(widget) => Some(widget),
            FactoryOutcome::Unsupported { .. } => None,
        }
    }
}

/// Produces widgets from descriptor attributes.
pub trait WidgetFactory {
    /// Fails only when `name` or `id` is empty; an absent, empty or unknown
    /// `type_tag` yields [`FactoryOutcome::Unsupported`].
    fn create(
        &self,
        name: &str,
        id: &str,
        type_tag: Option<&str>,
        id_base: &str,
    ) -> Result<FactoryOutcome, ConfigError>;
}

/// Factory covering every [`WidgetKind`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardWidgetFactory;

impl WidgetFactory for StandardWidgetFactory {
    fn create(
        &self,
        name: &str,
        id: &str,
        type_tag: Option<&str>,
        id_base: &str,
    ) -> Result<FactoryOutcome, ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidWidgetArgument(format!(
                "empty name for widget id '{}'",
                id
            )));
        }
        if id.trim().is_empty() {
            return Err(ConfigError::InvalidWidgetArgument(format!(
                "empty id for widget '{}'",
                name
            )));
        }

        match type_tag.and_then(WidgetKind::from_tag) {
            Some(kind) => Ok(FactoryOutcome::Created(Widget::new(name, id, kind, id_base))),
            None => {
                tracing::warn!(
                    widget = name,
                    widget_type = type_tag.unwrap_or("<none>"),
                    "unsupported widget type, skipping"
                );
                Ok(FactoryOutcome::Unsupported {
                    type_tag: type_tag.map(str::to_string),
                })
            }
        }
    }
}
