use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::browser::driver::{Driver, Navigator};
use crate::error::DriverError;

pub const DEFAULT_BROWSER_SERVER: &str = "node/browser_server.js";

/// Request sent to browser_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BrowserRequest {
    Navigate { url: String },
    SelectFrame {
        #[serde(skip_serializing_if = "Option::is_none")]
        frame: Option<String>,
    },
    Click { locator: String },
    Type { locator: String, text: String },
    /// The server answers with `text`, and also with `checked` when the
    /// element is a checkbox or radio input.
    GetText { locator: String },
    IsVisible { locator: String },
    Exists { locator: String },
    WaitFor { locator: String, timeout_ms: u64 },
    Quit,
}

impl BrowserRequest {
    /// Command name as it appears on the wire and in error messages.
    pub fn command(&self) -> &'static str {
        match self {
            BrowserRequest::Navigate { .. } => "navigate",
            BrowserRequest::SelectFrame { .. } => "select_frame",
            BrowserRequest::Click { .. } => "click",
            BrowserRequest::Type { .. } => "type",
            BrowserRequest::GetText { .. } => "get_text",
            BrowserRequest::IsVisible { .. } => "is_visible",
            BrowserRequest::Exists { .. } => "exists",
            BrowserRequest::WaitFor { .. } => "wait_for",
            BrowserRequest::Quit => "quit",
        }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Default, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub found: Option<bool>,
    #[serde(default)]
    pub checked: Option<bool>,
}

impl BrowserResponse {
    /// Text of a `get_text` reply. A checkable input has no text of its own,
    /// so its `checked` state is reported as `"true"` or `"false"`.
    pub fn into_text(self) -> String {
        match self.checked {
            Some(checked) => checked.to_string(),
            None => self.text.unwrap_or_default(),
        }
    }
}

/// A persistent browser session backed by browser_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium browser open.
/// Commands are sent as NDJSON over stdin, responses read from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    wait_timeout_ms: u64,
    closed: bool,
}

impl BrowserSession {
    /// Launch a new browser session by spawning the given server script.
    pub fn launch(script: &str, wait_timeout_ms: u64) -> Result<Self, DriverError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| DriverError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DriverError::SessionIo(format!(
                    "failed to capture stdio of {}",
                    script
                )));
            }
        };

        let mut session = BrowserSession {
            child,
            stdin,
            reader: BufReader::new(stdout),
            wait_timeout_ms,
            closed: false,
        };

        // Dropping the session on any error below reaps the child.
        let response = session.read_response("ready signal")?;
        if !response.ok || response.ready != Some(true) {
            return Err(DriverError::SessionProtocol {
                command: "launch".into(),
                error: format!("did not receive ready signal from {}", script),
            });
        }

        tracing::info!(script, "browser session ready");
        Ok(session)
    }

    fn read_response(&mut self, context: &str) -> Result<BrowserResponse, DriverError> {
        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            DriverError::SessionIo(format!("failed to read {}: {}", context, e))
        })?;

        if line.trim().is_empty() {
            return Err(DriverError::SessionIo(
                "empty response from browser server (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| DriverError::JsonParse {
            context: context.to_string(),
            source: e,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, DriverError> {
        let json = serde_json::to_string(request).map_err(|e| DriverError::JsonSerialize {
            context: request.command().to_string(),
            source: e,
        })?;

        tracing::trace!(command = request.command(), "-> browser server");

        writeln!(self.stdin, "{}", json)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| {
                DriverError::SessionIo(format!("failed to write to browser server: {}", e))
            })?;

        self.read_response("browser server response")
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, DriverError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(DriverError::SessionProtocol {
                command: request.command().into(),
                error: response.error.unwrap_or_else(|| "unknown error".into()),
            });
        }
        Ok(response)
    }

    fn send_flag(
        &mut self,
        request: BrowserRequest,
        pick: fn(&BrowserResponse) -> Option<bool>,
    ) -> Result<bool, DriverError> {
        let response = self.send_ok(&request)?;
        Ok(pick(&response).unwrap_or(false))
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), DriverError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Best-effort quit; the process may already be gone
        let _ = self.send(&BrowserRequest::Quit);
        let _ = self.child.wait();
        Ok(())
    }
}

impl Driver for BrowserSession {
    fn click(&mut self, locator: &str) -> Result<bool, DriverError> {
        self.send_flag(
            BrowserRequest::Click {
                locator: locator.to_string(),
            },
            |r| r.done,
        )
    }

    fn type_text(&mut self, locator: &str, text: &str) -> Result<bool, DriverError> {
        self.send_flag(
            BrowserRequest::Type {
                locator: locator.to_string(),
                text: text.to_string(),
            },
            |r| r.done,
        )
    }

    fn get_text(&mut self, locator: &str) -> Result<String, DriverError> {
        let response = self.send_ok(&BrowserRequest::GetText {
            locator: locator.to_string(),
        })?;
        Ok(response.into_text())
    }

    fn is_visible(&mut self, locator: &str) -> Result<bool, DriverError> {
        self.send_flag(
            BrowserRequest::IsVisible {
                locator: locator.to_string(),
            },
            |r| r.visible,
        )
    }

    fn exists(&mut self, locator: &str) -> Result<bool, DriverError> {
        self.send_flag(
            BrowserRequest::Exists {
                locator: locator.to_string(),
            },
            |r| r.found,
        )
    }

    fn wait_for_element(&mut self, locator: &str) -> Result<bool, DriverError> {
        let timeout_ms = self.wait_timeout_ms;
        self.send_flag(
            BrowserRequest::WaitFor {
                locator: locator.to_string(),
                timeout_ms,
            },
            |r| r.found,
        )
    }
}

impl Navigator for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.send_ok(&BrowserRequest::Navigate {
            url: url.to_string(),
        })?;
        Ok(())
    }

    fn select_frame(&mut self, frame: Option<&str>) -> Result<(), DriverError> {
        self.send_ok(&BrowserRequest::SelectFrame {
            frame: frame.map(str::to_string),
        })?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}
