use std::path::PathBuf;

use thiserror::Error;

/// Problems with a UI descriptor, a settings file, or a name/context pair
/// passed in by test code. None of these are recoverable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed UI descriptor: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected root <{expected}>, found <{found}>")]
    WrongRoot { expected: &'static str, found: String },

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("form '{form}' has type '{value}'; expected 'main' or 'popup'")]
    InvalidFormType { form: String, value: String },

    #[error("more than one main form declared (second has definitionID '{definition_id}')")]
    DuplicateMainForm { definition_id: String },

    #[error("main form with definitionID '{definition_id}' is keyed as '{form}'")]
    MainFormWithKey { definition_id: String, form: String },

    #[error("no main form declared in UI '{ui}'")]
    MissingMainForm { ui: String },

    #[error("popup form with definitionID '{definition_id}' has no name")]
    PopupWithoutName { definition_id: String },

    #[error("popup form '{form}' declared more than once")]
    DuplicateForm { form: String },

    #[error("widget '{widget}' declared more than once on {}", form_label(form))]
    DuplicateWidget { form: String, widget: String },

    #[error("existence validation widget '{widget}' is not defined on {}", form_label(form))]
    MissingExistenceWidget { form: String, widget: String },

    #[error("cannot create widget: {0}")]
    InvalidWidgetArgument(String),

    #[error("unknown form '{form}'")]
    UnknownForm { form: String },

    #[error("widget '{widget}' is not defined on {}", form_label(form))]
    UnknownWidget { widget: String, form: String },

    #[error("invalid settings file '{path}': {source}")]
    InvalidSettings {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failures reported by the browser-driver collaborator.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    #[error("browser session I/O: {0}")]
    SessionIo(String),

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },
}

/// Error returned by fixture operations.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("widget '{widget}' ({kind}) does not support '{operation}'")]
    UnsupportedOperation {
        widget: String,
        kind: &'static str,
        operation: &'static str,
    },
}

impl FixtureError {
    /// True when the failure is a configuration error rather than a driver or
    /// operation failure.
    pub fn is_config(&self) -> bool {
        matches!(self, FixtureError::Config(_))
    }
}

/// Label used in messages for a form key: the empty key is the main form.
pub fn form_label(form: &str) -> String {
    if form.is_empty() {
        "the main form".to_string()
    } else {
        format!("form '{}'", form)
    }
}
