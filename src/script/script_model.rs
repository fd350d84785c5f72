use serde::{Deserialize, Serialize};

/// A fixture script: rows of widget actions run against one UI, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureScript {
    /// Human-readable name for this script
    pub name: String,

    /// URL (absolute or relative to the base URL) to open before the steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,

    /// Ordered list of steps to execute
    pub steps: Vec<ScriptStep>,
}

/// A single row of a fixture script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Resolve subsequent widget names against a popup, or the main form
    /// when `form` is omitted or empty
    SwitchForm {
        #[serde(default)]
        form: Option<String>,
    },

    Type { widget: String, value: String },

    Clear { widget: String },

    Click { widget: String },

    Check { widget: String },

    Uncheck { widget: String },

    Select { widget: String, option: String },

    /// Wait for the active form's existence validation widget
    WaitForForm,

    Navigate { url: String },

    /// Enter an iframe, or return to the top-level document without `frame`
    SelectFrame {
        #[serde(default)]
        frame: Option<String>,
    },

    Assert { assertions: Vec<ScriptAssertion> },
}

/// A check evaluated against widgets of the active form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptAssertion {
    TextEquals { widget: String, expected: String },

    TextContains { widget: String, expected: String },

    Visible { widget: String },

    Hidden { widget: String },

    Exists { widget: String },

    Checked {
        widget: String,
        #[serde(default = "default_true")]
        expected: bool,
    },

    CellText {
        widget: String,
        row: usize,
        col: usize,
        expected: String,
    },
}

fn default_true() -> bool {
    true
}

impl ScriptAssertion {
    pub fn widget(&self) -> &str {
        match self {
            ScriptAssertion::TextEquals { widget, .. }
            | ScriptAssertion::TextContains { widget, .. }
            | ScriptAssertion::Visible { widget }
            | ScriptAssertion::Hidden { widget }
            | ScriptAssertion::Exists { widget }
            | ScriptAssertion::Checked { widget, .. }
            | ScriptAssertion::CellText { widget, .. } => widget,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ScriptAssertion::TextEquals { .. } => "TextEquals",
            ScriptAssertion::TextContains { .. } => "TextContains",
            ScriptAssertion::Visible { .. } => "Visible",
            ScriptAssertion::Hidden { .. } => "Hidden",
            ScriptAssertion::Exists { .. } => "Exists",
            ScriptAssertion::Checked { .. } => "Checked",
            ScriptAssertion::CellText { .. } => "CellText",
        }
    }
}

/// Outcome of one assertion.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssertionResult {
    /// Which step this assertion belongs to (0-indexed)
    pub step_index: usize,

    /// Form context the assertion resolved its widget in
    pub form: String,

    pub assertion: ScriptAssertion,

    pub passed: bool,

    /// Actual value found (for debugging failed assertions)
    pub actual: Option<String>,

    pub message: Option<String>,
}

/// Outcome of running a complete script.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptResult {
    pub script_name: String,

    /// Whether all steps ran and all assertions passed
    pub passed: bool,

    pub steps_run: usize,

    pub assertion_results: Vec<AssertionResult>,

    /// Error that stopped the script, if any (not an assertion failure)
    pub error: Option<String>,
}

impl ScriptResult {
    pub fn failed_assertions(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertion_results.iter().filter(|r| !r.passed)
    }
}
