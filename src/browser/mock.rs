use std::collections::{HashMap, HashSet};

use crate::browser::driver::{Driver, Navigator};
use crate::error::DriverError;

/// One call observed by [`MockDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Click(String),
    Type(String, String),
    GetText(String),
    IsVisible(String),
    Exists(String),
    WaitFor(String),
    Navigate(String),
    SelectFrame(Option<String>),
}

/// In-memory driver for exercising fixtures without a browser.
///
/// Elements are present only once registered with [`MockDriver::with_element`].
/// Typing stores the text so that a later `get_text` on the same locator sees it,
/// and clicking a locator toggles its `"true"`/`"false"` text, which is how
/// checkboxes report their state.
#[derive(Debug, Default)]
pub struct MockDriver {
    pub calls: Vec<DriverCall>,
    present: HashSet<String>,
    hidden: HashSet<String>,
    texts: HashMap<String, String>,
    toggles: HashSet<String>,
    failing: HashSet<String>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a visible element.
    pub fn with_element(mut self, locator: &str) -> Self {
        self.present.insert(locator.to_string());
        self
    }

    /// Register a present but hidden element.
    pub fn with_hidden_element(mut self, locator: &str) -> Self {
        self.present.insert(locator.to_string());
        self.hidden.insert(locator.to_string());
        self
    }

    /// Register an element with initial text.
    pub fn with_text(mut self, locator: &str, text: &str) -> Self {
        self.present.insert(locator.to_string());
        self.texts.insert(locator.to_string(), text.to_string());
        self
    }

    /// Register a checkbox-like element whose text flips on every click.
    pub fn with_toggle(mut self, locator: &str, checked: bool) -> Self {
        self.present.insert(locator.to_string());
        self.toggles.insert(locator.to_string());
        self.texts
            .insert(locator.to_string(), checked.to_string());
        self
    }

    /// Any call against this locator fails with a protocol error.
    pub fn with_failure(mut self, locator: &str) -> Self {
        self.failing.insert(locator.to_string());
        self
    }

    pub fn text_of(&self, locator: &str) -> Option<&str> {
        self.texts.get(locator).map(String::as_str)
    }

    fn check_failure(&self, command: &str, locator: &str) -> Result<(), DriverError> {
        if self.failing.contains(locator) {
            return Err(DriverError::SessionProtocol {
                command: command.to_string(),
                error: format!("element '{}' is detached", locator),
            });
        }
        Ok(())
    }
}

impl Driver for MockDriver {
    fn click(&mut self, locator: &str) -> Result<bool, DriverError> {
        self.calls.push(DriverCall::Click(locator.to_string()));
        self.check_failure("click", locator)?;
        if !self.present.contains(locator) {
            return Ok(false);
        }
        if self.toggles.contains(locator) {
            let checked = self.texts.get(locator).is_some_and(|t| t == "true");
            self.texts
                .insert(locator.to_string(), (!checked).to_string());
        }
        Ok(true)
    }

    fn type_text(&mut self, locator: &str, text: &str) -> Result<bool, DriverError> {
        self.calls
            .push(DriverCall::Type(locator.to_string(), text.to_string()));
        self.check_failure("type", locator)?;
        if !self.present.contains(locator) {
            return Ok(false);
        }
        self.texts.insert(locator.to_string(), text.to_string());
        Ok(true)
    }

    fn get_text(&mut self, locator: &str) -> Result<String, DriverError> {
        self.calls.push(DriverCall::GetText(locator.to_string()));
        self.check_failure("get_text", locator)?;
        Ok(self.texts.get(locator).cloned().unwrap_or_default())
    }

    fn is_visible(&mut self, locator: &str) -> Result<bool, DriverError> {
        self.calls.push(DriverCall::IsVisible(locator.to_string()));
        self.check_failure("is_visible", locator)?;
        Ok(self.present.contains(locator) && !self.hidden.contains(locator))
    }

    fn exists(&mut self, locator: &str) -> Result<bool, DriverError> {
        self.calls.push(DriverCall::Exists(locator.to_string()));
        self.check_failure("exists", locator)?;
        Ok(self.present.contains(locator))
    }

    fn wait_for_element(&mut self, locator: &str) -> Result<bool, DriverError> {
        self.calls.push(DriverCall::WaitFor(locator.to_string()));
        self.check_failure("wait_for", locator)?;
        Ok(self.present.contains(locator))
    }
}

impl Navigator for MockDriver {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Navigate(url.to_string()));
        Ok(())
    }

    fn select_frame(&mut self, frame: Option<&str>) -> Result<(), DriverError> {
        self.calls
            .push(DriverCall::SelectFrame(frame.map(str::to_string)));
        Ok(())
    }
}
