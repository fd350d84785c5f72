use std::sync::Arc;

use crate::browser::driver::{Driver, Navigator};
use crate::config::properties::FixtureProperties;
use crate::config::settings::FixtureSettings;
use crate::error::{ConfigError, FixtureError, form_label};
use crate::fixture::context::FormContext;
use crate::widget::widget_model::Widget;

/// Drives one UI through a [`Driver`], resolving widget names against the
/// active form.
///
/// One fixture drives one browser session from a single thread. The parsed
/// properties are shared and read-only; the form context is the fixture's own.
pub struct UiFixture<D: Driver> {
    properties: Arc<FixtureProperties>,
    settings: FixtureSettings,
    context: FormContext,
    driver: D,
}

impl<D: Driver> UiFixture<D> {
    pub fn new(properties: Arc<FixtureProperties>, settings: FixtureSettings, driver: D) -> Self {
        UiFixture {
            properties,
            settings,
            context: FormContext::new(),
            driver,
        }
    }

    pub fn properties(&self) -> &FixtureProperties {
        &self.properties
    }

    pub fn settings(&self) -> &FixtureSettings {
        &self.settings
    }

    pub fn context(&self) -> &FormContext {
        &self.context
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn current_form(&self) -> &str {
        self.context.current_form()
    }

    // ------------------------------------------------------------------
    // Form context
    // ------------------------------------------------------------------

    /// Make `form` the namespace for subsequent widget names. `None` or `""`
    /// returns to the main form.
    pub fn switch_form_context(&mut self, form: Option<&str>) -> Result<(), FixtureError> {
        match self.context.switch_to(form, &self.properties) {
            Ok(()) => {
                tracing::debug!(form = self.context.current_form(), "switched form context");
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, "form context switch rejected");
                Err(e.into())
            }
        }
    }

    pub fn switch_to_main(&mut self) -> Result<(), FixtureError> {
        self.switch_form_context(None)
    }

    /// Look up a widget in the active form only.
    pub fn widget(&self, name: &str) -> Result<&Widget, FixtureError> {
        Ok(lookup(&self.properties, &self.context, name)?)
    }

    fn resolve(&mut self, name: &str) -> Result<(&Widget, &mut dyn Driver), FixtureError> {
        let widget = lookup(&self.properties, &self.context, name)?;
        Ok((widget, &mut self.driver))
    }

    // ------------------------------------------------------------------
    // Name-resolved widget operations
    // ------------------------------------------------------------------

    pub fn clear(&mut self, widget: &str) -> Result<bool, FixtureError> {
        let (widget, driver) = self.resolve(widget)?;
        widget.clear(driver)
    }

    /// Type `value` into a text-entry widget after expanding settings
    /// placeholders such as `{user}`.
    pub fn type_text(&mut self, widget: &str, value: &str) -> Result<bool, FixtureError> {
        let value = self.settings.expand(value);
        let (widget, driver) = self.resolve(widget)?;
        widget.set_value(driver, &value)
    }

    pub fn click(&mut self, widget: &str) -> Result<bool, FixtureError> {
        let (widget, driver) = self.resolve(widget)?;
        widget.click(driver)
    }

    pub fn get_text(&mut self, widget: &str) -> Result<String, FixtureError> {
        let (widget, driver) = self.resolve(widget)?;
        widget.get_value(driver)
    }

    pub fn is_visible(&mut self, widget: &str) -> Result<bool, FixtureError> {
        let (widget, driver) = self.resolve(widget)?;
        widget.is_visible(driver)
    }

    pub fn exists(&mut self, widget: &str) -> Result<bool, FixtureError> {
        let (widget, driver) = self.resolve(widget)?;
        widget.exists(driver)
    }

    pub fn check(&mut self, widget: &str) -> Result<bool, FixtureError> {
        let (widget, driver) = self.resolve(widget)?;
        widget.check(driver)
    }

    pub fn uncheck(&mut self, widget: &str) -> Result<bool, FixtureError> {
        let (widget, driver) = self.resolve(widget)?;
        widget.uncheck(driver)
    }

    pub fn is_checked(&mut self, widget: &str) -> Result<bool, FixtureError> {
        let (widget, driver) = self.resolve(widget)?;
        widget.is_checked(driver)
    }

    pub fn select(&mut self, widget: &str, option: &str) -> Result<bool, FixtureError> {
        let option = self.settings.expand(option);
        let (widget, driver) = self.resolve(widget)?;
        widget.select(driver, &option)
    }

    pub fn cell_text(&mut self, widget: &str, row: usize, col: usize) -> Result<String, FixtureError> {
        let (widget, driver) = self.resolve(widget)?;
        widget.cell_text(driver, row, col)
    }

    // ------------------------------------------------------------------
    // Readiness checks
    // ------------------------------------------------------------------

    /// Wait for the active form's existence validation widget.
    pub fn verify_form_open(&mut self) -> Result<bool, FixtureError> {
        let form = self.context.current_form();
        let widget = self
            .properties
            .existence_validation_widget(form)
            .ok_or_else(|| ConfigError::UnknownForm {
                form: form.to_string(),
            })?;
        let open = widget.wait_until_present(&mut self.driver)?;
        if !open {
            tracing::warn!(
                form = %form_label(form),
                widget = %widget.name,
                "form did not open"
            );
        }
        Ok(open)
    }

    /// Wait for the main form's existence validation widget, which marks a
    /// completed sign-in.
    pub fn wait_for_sign_in(&mut self) -> Result<bool, FixtureError> {
        let locator = self.properties.sign_in_validation_locator();
        Ok(self.driver.wait_for_element(locator)?)
    }
}

impl<D: Driver + Navigator> UiFixture<D> {
    /// Navigate to `target`. Relative targets are joined to the configured
    /// base URL, or the UI's own `url` when none is configured.
    pub fn navigate(&mut self, target: &str) -> Result<(), FixtureError> {
        let url = self.resolve_url(target);
        tracing::debug!(url = %url, "navigating");
        self.driver.navigate(&url)?;
        // A fresh page starts in the top-level document.
        self.context.set_iframe(None);
        Ok(())
    }

    /// Point the driver at an iframe, or back at the top-level document.
    pub fn select_frame(&mut self, frame: Option<&str>) -> Result<(), FixtureError> {
        let frame = frame.filter(|f| !f.is_empty());
        self.driver.select_frame(frame)?;
        self.context.set_iframe(frame);
        Ok(())
    }

    pub fn resolve_url(&self, target: &str) -> String {
        if target.contains("://") {
            return target.to_string();
        }
        let base = self
            .settings
            .base_url
            .as_deref()
            .or(self.properties.ui().url_base.as_deref());
        match base {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                target.trim_start_matches('/')
            ),
            None => target.to_string(),
        }
    }
}

fn lookup<'p>(
    properties: &'p FixtureProperties,
    context: &FormContext,
    name: &str,
) -> Result<&'p Widget, ConfigError> {
    properties.resolve(context.current_form(), name)
}
