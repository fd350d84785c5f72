use crate::config::properties::{FixtureProperties, MAIN_FORM};
use crate::error::ConfigError;

/// Run-time state of one fixture: which form widget names resolve against,
/// and which iframe the driver was last pointed at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormContext {
    current_form: String,
    current_iframe: Option<String>,
}

impl FormContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of the active form; `""` is the main form.
    pub fn current_form(&self) -> &str {
        &self.current_form
    }

    pub fn is_main(&self) -> bool {
        self.current_form == MAIN_FORM
    }

    /// Select a form. `None` and `Some("")` both select the main form and
    /// always succeed. An unknown name fails and leaves the state unchanged.
    pub fn switch_to(
        &mut self,
        form: Option<&str>,
        properties: &FixtureProperties,
    ) -> Result<(), ConfigError> {
        let target = form.unwrap_or(MAIN_FORM);
        if !target.is_empty() && !properties.has_form(target) {
            return Err(ConfigError::UnknownForm {
                form: target.to_string(),
            });
        }
        self.current_form.clear();
        self.current_form.push_str(target);
        Ok(())
    }

    pub fn current_iframe(&self) -> Option<&str> {
        self.current_iframe.as_deref()
    }

    /// Record the iframe selected by the last navigation.
    pub fn set_iframe(&mut self, frame: Option<&str>) {
        self.current_iframe = frame.map(str::to_string);
    }
}
