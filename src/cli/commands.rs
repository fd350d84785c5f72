use std::path::Path;
use std::sync::Arc;

use crate::browser::session::BrowserSession;
use crate::config::parser::ConfigParser;
use crate::config::properties::FixtureProperties;
use crate::config::settings::FixtureSettings;
use crate::error::form_label;
use crate::fixture::fixture::UiFixture;
use crate::script::runner::{ScriptRunner, load_scripts};
use crate::script::script_model::ScriptResult;

// ============================================================================
// validate / inspect subcommands
// ============================================================================

pub fn cmd_validate(ui_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let properties = ConfigParser::new().parse_file(ui_path)?;
    print!("{}", format_summary(&properties));
    Ok(())
}

pub fn cmd_inspect(ui_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let properties = ConfigParser::new().parse_file(ui_path)?;
    print!("{}", properties.describe());
    Ok(())
}

/// One line per form with its widget count.
pub fn format_summary(properties: &FixtureProperties) -> String {
    let mut out = format!(
        "UI '{}' is valid ({} forms)\n",
        properties.ui().name,
        properties.form_keys().count()
    );
    for form in properties.forms() {
        out.push_str(&format!(
            "  {}: {} widgets\n",
            form_label(&form.key),
            form.registry.len()
        ));
    }
    out
}

// ============================================================================
// run subcommand
// ============================================================================

/// Run scripts and return whether all passed.
pub fn cmd_run(
    ui_path: &str,
    script_path: &str,
    settings: FixtureSettings,
) -> Result<bool, Box<dyn std::error::Error>> {
    let properties = Arc::new(ConfigParser::new().parse_file(ui_path)?);
    let scripts = load_scripts(Path::new(script_path))?;

    if scripts.is_empty() {
        tracing::warn!(path = script_path, "no fixture scripts found");
        return Ok(true);
    }

    tracing::info!(count = scripts.len(), "running fixture scripts");

    let session = BrowserSession::launch(&settings.browser_server, settings.wait_timeout_ms)?;
    let mut fixture = UiFixture::new(properties, settings, session);
    let start = std::time::Instant::now();

    let mut results = Vec::new();
    for script in &scripts {
        tracing::info!(script = %script.name, "running");
        results.push(ScriptRunner::run(script, &mut fixture));
    }

    fixture.driver_mut().quit()?;

    print!("{}", format_results(&results, start.elapsed().as_millis()));
    Ok(results.iter().all(|r| r.passed))
}

/// Format script results for terminal output.
pub fn format_results(results: &[ScriptResult], duration_ms: u128) -> String {
    let mut out = String::new();

    for result in results {
        let marker = if result.passed { "\u{2713} PASS" } else { "\u{2717} FAIL" };
        out.push_str(&format!(
            "{}  {} ({} steps, {} assertions)\n",
            marker,
            result.script_name,
            result.steps_run,
            result.assertion_results.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for ar in result.failed_assertions() {
            out.push_str(&format!(
                "    [FAIL] Step {} on {}: {} {}: {}\n",
                ar.step_index,
                form_label(&ar.form),
                ar.assertion.kind_name(),
                ar.assertion.widget(),
                ar.message.as_deref().unwrap_or("assertion failed")
            ));
        }
    }

    let passed = results.iter().filter(|r| r.passed).count();
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total) in {:.1}s ===\n",
        passed,
        results.len() - passed,
        results.len(),
        duration_ms as f64 / 1000.0
    ));

    out
}
