use std::env;

use dotenvy::dotenv;

/// Default endpoint of the local smartapp debugger.
pub const DEFAULT_ASSISTANT_URL: &str = "ws://127.0.0.1:9595";

/// Which host endpoint the app boots against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Local smartapp debugger; requires a developer token.
    Debugger,
    /// Production assistant runtime.
    Assistant,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: LaunchMode,
    pub assistant_url: String,
    /// Developer token, only meaningful in debugger mode.
    pub token: String,
    pub smartapp_name: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let mode = match env::var("ASSISTANT_ENV").as_deref() {
            Ok("development") => LaunchMode::Debugger,
            _ => LaunchMode::Assistant,
        };

        let token = match mode {
            LaunchMode::Debugger => {
                env::var("ASSISTANT_TOKEN").expect("ASSISTANT_TOKEN must be set in development")
            }
            LaunchMode::Assistant => String::new(),
        };

        let assistant_url =
            env::var("ASSISTANT_URL").unwrap_or_else(|_| DEFAULT_ASSISTANT_URL.to_string());

        let smartapp_name =
            env::var("SMARTAPP_NAME").unwrap_or_else(|_| "Trivia Quiz".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            mode,
            assistant_url,
            token,
            smartapp_name,
            rust_log,
        }
    }

    /// Phrase the debugger uses to launch the smartapp.
    pub fn init_phrase(&self) -> String {
        format!("Launch {}", self.smartapp_name)
    }
}
