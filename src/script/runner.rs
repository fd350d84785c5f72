use std::path::Path;

use crate::browser::driver::{Driver, Navigator};
use crate::error::{FixtureError, form_label};
use crate::fixture::fixture::UiFixture;
use crate::script::script_model::{AssertionResult, FixtureScript, ScriptAssertion, ScriptResult, ScriptStep};

/// Executes a FixtureScript step-by-step through a UiFixture.
pub struct ScriptRunner;

impl ScriptRunner {
    /// Run a complete script.
    ///
    /// The fixture starts every script on the main form. The first step that
    /// fails (unknown form or widget, unsupported operation, driver failure,
    /// or a driver refusing the action) stops the run. Assertions that merely
    /// do not hold are recorded and the run continues.
    pub fn run<D: Driver + Navigator>(script: &FixtureScript, fixture: &mut UiFixture<D>) -> ScriptResult {
        let mut assertion_results = Vec::new();

        let started = fixture.switch_to_main().and_then(|()| match &script.start_url {
            Some(url) => fixture.navigate(url),
            None => Ok(()),
        });
        if let Err(e) = started {
            return ScriptResult {
                script_name: script.name.clone(),
                passed: false,
                steps_run: 0,
                assertion_results,
                error: Some(format!("Failed to open start_url: {}", e)),
            };
        }

        for (i, step) in script.steps.iter().enumerate() {
            if let Err(e) = Self::execute_step(step, i, fixture, &mut assertion_results) {
                tracing::debug!(script = %script.name, step = i, error = %e, "script stopped");
                return ScriptResult {
                    script_name: script.name.clone(),
                    passed: false,
                    steps_run: i + 1,
                    assertion_results,
                    error: Some(format!("Step {} failed: {}", i, e)),
                };
            }
        }

        let passed = assertion_results.iter().all(|r| r.passed);
        ScriptResult {
            script_name: script.name.clone(),
            passed,
            steps_run: script.steps.len(),
            assertion_results,
            error: None,
        }
    }

    fn execute_step<D: Driver + Navigator>(
        step: &ScriptStep,
        step_index: usize,
        fixture: &mut UiFixture<D>,
        results: &mut Vec<AssertionResult>,
    ) -> Result<(), StepError> {
        let done = match step {
            ScriptStep::SwitchForm { form } => {
                fixture.switch_form_context(form.as_deref())?;
                true
            }
            ScriptStep::Type { widget, value } => fixture.type_text(widget, value)?,
            ScriptStep::Clear { widget } => fixture.clear(widget)?,
            ScriptStep::Click { widget } => fixture.click(widget)?,
            ScriptStep::Check { widget } => fixture.check(widget)?,
            ScriptStep::Uncheck { widget } => fixture.uncheck(widget)?,
            ScriptStep::Select { widget, option } => fixture.select(widget, option)?,
            ScriptStep::WaitForForm => {
                if !fixture.verify_form_open()? {
                    return Err(StepError::FormNotOpen(form_label(fixture.current_form())));
                }
                true
            }
            ScriptStep::Navigate { url } => {
                fixture.navigate(url)?;
                true
            }
            ScriptStep::SelectFrame { frame } => {
                fixture.select_frame(frame.as_deref())?;
                true
            }
            ScriptStep::Assert { assertions } => {
                for assertion in assertions {
                    let result = Self::evaluate_one(assertion, step_index, fixture)?;
                    results.push(result);
                }
                true
            }
        };

        if done {
            Ok(())
        } else {
            Err(StepError::Refused)
        }
    }

    /// Evaluate one assertion. Configuration errors propagate; driver and
    /// operation failures become a failed result.
    fn evaluate_one<D: Driver + Navigator>(
        assertion: &ScriptAssertion,
        step_index: usize,
        fixture: &mut UiFixture<D>,
    ) -> Result<AssertionResult, FixtureError> {
        let outcome = match assertion {
            ScriptAssertion::TextEquals { widget, expected } => fixture
                .get_text(widget)
                .map(|text| (text.trim() == expected.trim(), text)),
            ScriptAssertion::TextContains { widget, expected } => fixture
                .get_text(widget)
                .map(|text| (text.to_lowercase().contains(&expected.to_lowercase()), text)),
            ScriptAssertion::Visible { widget } => fixture
                .is_visible(widget)
                .map(|visible| (visible, visible.to_string())),
            ScriptAssertion::Hidden { widget } => fixture
                .is_visible(widget)
                .map(|visible| (!visible, visible.to_string())),
            ScriptAssertion::Exists { widget } => fixture
                .exists(widget)
                .map(|found| (found, found.to_string())),
            ScriptAssertion::Checked { widget, expected } => fixture
                .is_checked(widget)
                .map(|checked| (checked == *expected, checked.to_string())),
            ScriptAssertion::CellText {
                widget,
                row,
                col,
                expected,
            } => fixture
                .cell_text(widget, *row, *col)
                .map(|text| (text.trim() == expected.trim(), text)),
        };

        let form = fixture.current_form().to_string();
        match outcome {
            Ok((passed, actual)) => Ok(AssertionResult {
                step_index,
                form,
                assertion: assertion.clone(),
                passed,
                message: (!passed).then(|| failure_message(assertion, &actual)),
                actual: Some(actual),
            }),
            Err(e) if e.is_config() => Err(e),
            Err(e) => Ok(AssertionResult {
                step_index,
                form,
                assertion: assertion.clone(),
                passed: false,
                actual: None,
                message: Some(e.to_string()),
            }),
        }
    }
}

fn failure_message(assertion: &ScriptAssertion, actual: &str) -> String {
    match assertion {
        ScriptAssertion::TextEquals { widget, expected } => {
            format!("'{}' text is '{}' but expected '{}'", widget, actual, expected)
        }
        ScriptAssertion::TextContains { widget, expected } => {
            format!("'{}' text '{}' does not contain '{}'", widget, actual, expected)
        }
        ScriptAssertion::Visible { widget } => format!("'{}' is not visible", widget),
        ScriptAssertion::Hidden { widget } => format!("'{}' is visible but should be hidden", widget),
        ScriptAssertion::Exists { widget } => format!("'{}' is not on the page", widget),
        ScriptAssertion::Checked { widget, expected } => {
            format!("'{}' checked state is {} but expected {}", widget, actual, expected)
        }
        ScriptAssertion::CellText {
            widget,
            row,
            col,
            expected,
        } => format!(
            "'{}' cell ({}, {}) is '{}' but expected '{}'",
            widget, row, col, actual, expected
        ),
    }
}

/// Why a step stopped the script.
#[derive(Debug, thiserror::Error)]
enum StepError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("{0} did not open")]
    FormNotOpen(String),

    #[error("the driver could not perform the action")]
    Refused,
}

// ============================================================================
// Script loading
// ============================================================================

/// Load scripts from a single YAML file or a directory of YAML files.
pub fn load_scripts(path: &Path) -> Result<Vec<FixtureScript>, Box<dyn std::error::Error>> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        let mut scripts: Vec<FixtureScript> = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let p = entry?.path();
            if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
                let content = std::fs::read_to_string(&p)?;
                scripts.push(serde_yaml::from_str(&content)?);
            }
        }
        // Sort by name for deterministic order
        scripts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(scripts)
    } else {
        let content = std::fs::read_to_string(path)?;
        Ok(vec![serde_yaml::from_str(&content)?])
    }
}
