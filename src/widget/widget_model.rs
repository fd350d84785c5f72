use serde::Serialize;

use crate::browser::driver::Driver;
use crate::error::FixtureError;

/// Every widget variant the fixture knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Button,
    CheckBox,
    Label,
    ListBox,
    RadioButton,
    Tab,
    Table,
    TextBox,
    PasswordTextBox,
    DateBox,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 10] = [
        WidgetKind::Button,
        WidgetKind::CheckBox,
        WidgetKind::Label,
        WidgetKind::ListBox,
        WidgetKind::RadioButton,
        WidgetKind::Tab,
        WidgetKind::Table,
        WidgetKind::TextBox,
        WidgetKind::PasswordTextBox,
        WidgetKind::DateBox,
    ];

    /// Descriptor `type` attribute for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            WidgetKind::Button => "button",
            WidgetKind::CheckBox => "checkbox",
            WidgetKind::Label => "label",
            WidgetKind::ListBox => "listbox",
            WidgetKind::RadioButton => "radiobutton",
            WidgetKind::Tab => "tab",
            WidgetKind::Table => "table",
            WidgetKind::TextBox => "textbox",
            WidgetKind::PasswordTextBox => "passwordtextbox",
            WidgetKind::DateBox => "datebox",
        }
    }

    /// Map a descriptor `type` attribute to a kind (ASCII case-insensitive).
    pub fn from_tag(tag: &str) -> Option<WidgetKind> {
        let tag = tag.trim();
        WidgetKind::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }

    pub fn friendly_name(self) -> &'static str {
        match self {
            WidgetKind::Button => "Button",
            WidgetKind::CheckBox => "Check Box",
            WidgetKind::Label => "Label",
            WidgetKind::ListBox => "List Box",
            WidgetKind::RadioButton => "Radio Button",
            WidgetKind::Tab => "Tab",
            WidgetKind::Table => "Table",
            WidgetKind::TextBox => "Text Box",
            WidgetKind::PasswordTextBox => "Password Text Box",
            WidgetKind::DateBox => "Date Box",
        }
    }

    fn locator_suffix(self) -> &'static str {
        match self {
            WidgetKind::PasswordTextBox => "_pwd",
            _ => "",
        }
    }

    fn wait_target_suffix(self) -> &'static str {
        match self {
            WidgetKind::DateBox => "_input",
            WidgetKind::Table => "_body",
            _ => "",
        }
    }

    fn accepts_text(self) -> bool {
        matches!(
            self,
            WidgetKind::TextBox | WidgetKind::PasswordTextBox | WidgetKind::DateBox
        )
    }

    fn is_clickable(self) -> bool {
        matches!(
            self,
            WidgetKind::Button | WidgetKind::CheckBox | WidgetKind::RadioButton | WidgetKind::Tab
        )
    }
}

/// A named, typed UI element with its derived locators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Widget {
    pub name: String,
    pub kind: WidgetKind,
    /// Locator passed to the driver for every interaction
    pub locator: String,
    /// Locator whose presence means the widget has rendered
    pub wait_target: String,
}

impl Widget {
    /// Build a widget, deriving both locators from the form's ID base.
    pub fn new(name: &str, id: &str, kind: WidgetKind, id_base: &str) -> Self {
        let locator = format!("{}{}{}", id_base, id, kind.locator_suffix());
        let wait_target = format!("{}{}", locator, kind.wait_target_suffix());
        Widget {
            name: name.to_string(),
            kind,
            locator,
            wait_target,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.friendly_name()
    }

    fn unsupported(&self, operation: &'static str) -> FixtureError {
        FixtureError::UnsupportedOperation {
            widget: self.name.clone(),
            kind: self.kind.friendly_name(),
            operation,
        }
    }

    // ------------------------------------------------------------------
    // Common surface
    // ------------------------------------------------------------------

    pub fn is_visible(&self, driver: &mut dyn Driver) -> Result<bool, FixtureError> {
        Ok(driver.is_visible(&self.locator)?)
    }

    pub fn exists(&self, driver: &mut dyn Driver) -> Result<bool, FixtureError> {
        Ok(driver.exists(&self.wait_target)?)
    }

    /// Block until the driver reports the wait target present.
    pub fn wait_until_present(&self, driver: &mut dyn Driver) -> Result<bool, FixtureError> {
        Ok(driver.wait_for_element(&self.wait_target)?)
    }

    /// Current value: typed text for entry widgets, the caption for labels
    /// and buttons, the selected entry for list boxes.
    pub fn get_value(&self, driver: &mut dyn Driver) -> Result<String, FixtureError> {
        match self.kind {
            WidgetKind::Table => Err(self.unsupported("get_value")),
            _ => Ok(driver.get_text(&self.locator)?),
        }
    }

    // ------------------------------------------------------------------
    // Type-specific operations
    // ------------------------------------------------------------------

    pub fn click(&self, driver: &mut dyn Driver) -> Result<bool, FixtureError> {
        if !self.kind.is_clickable() {
            return Err(self.unsupported("click"));
        }
        Ok(driver.click(&self.locator)?)
    }

    pub fn set_value(&self, driver: &mut dyn Driver, value: &str) -> Result<bool, FixtureError> {
        if !self.kind.accepts_text() {
            return Err(self.unsupported("type"));
        }
        Ok(driver.type_text(&self.locator, value)?)
    }

    pub fn clear(&self, driver: &mut dyn Driver) -> Result<bool, FixtureError> {
        if !self.kind.accepts_text() {
            return Err(self.unsupported("clear"));
        }
        Ok(driver.type_text(&self.locator, "")?)
    }

    /// Checked state as reported by the driver through `get_text`.
    pub fn is_checked(&self, driver: &mut dyn Driver) -> Result<bool, FixtureError> {
        match self.kind {
            WidgetKind::CheckBox | WidgetKind::RadioButton => {
                let state = driver.get_text(&self.locator)?;
                Ok(matches!(
                    state.trim().to_ascii_lowercase().as_str(),
                    "true" | "on" | "checked" | "yes"
                ))
            }
            _ => Err(self.unsupported("is_checked")),
        }
    }

    /// Select the widget. Clicks only when it is not already checked.
    pub fn check(&self, driver: &mut dyn Driver) -> Result<bool, FixtureError> {
        match self.kind {
            WidgetKind::CheckBox | WidgetKind::RadioButton => {
                if self.is_checked(driver)? {
                    return Ok(true);
                }
                Ok(driver.click(&self.locator)?)
            }
            _ => Err(self.unsupported("check")),
        }
    }

    pub fn uncheck(&self, driver: &mut dyn Driver) -> Result<bool, FixtureError> {
        // Radio buttons are cleared by selecting a sibling, never directly.
        if self.kind != WidgetKind::CheckBox {
            return Err(self.unsupported("uncheck"));
        }
        if !self.is_checked(driver)? {
            return Ok(true);
        }
        Ok(driver.click(&self.locator)?)
    }

    pub fn select(&self, driver: &mut dyn Driver, option: &str) -> Result<bool, FixtureError> {
        if self.kind != WidgetKind::ListBox {
            return Err(self.unsupported("select"));
        }
        Ok(driver.type_text(&self.locator, option)?)
    }

    /// Locator of a table cell, rows and columns counted from zero.
    pub fn cell_locator(&self, row: usize, col: usize) -> Option<String> {
        (self.kind == WidgetKind::Table).then(|| format!("{}_{}_{}", self.locator, row, col))
    }

    pub fn cell_text(
        &self,
        driver: &mut dyn Driver,
        row: usize,
        col: usize,
    ) -> Result<String, FixtureError> {
        let locator = self
            .cell_locator(row, col)
            .ok_or_else(|| self.unsupported("cell_text"))?;
        Ok(driver.get_text(&locator)?)
    }
}
