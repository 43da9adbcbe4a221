//! # trivia-smartapp
//!
//! A trivia quiz embedded as a smart app in a voice-assistant host. The
//! app shows a random question, checks a typed or dictated answer against
//! the accepted answers, reveals the result with commentary, and moves on
//! to another random question.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trivia_smartapp::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), trivia_smartapp::AppError> {
//!     let store = trivia_smartapp::load_questions_from_json("questions.json")?;
//!     let config = Config::from_env();
//!     trivia_smartapp::run(store, config, None, false).await
//! }
//! ```

mod app;
pub mod assistant;
pub mod config;
pub mod data;
pub mod evaluator;
mod models;
pub mod session;
pub mod terminal;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

use assistant::{Outbound, OutboundSender, SharedApp};

pub use app::App;
pub use config::Config;
pub use data::{LoadError, OutOfRangeQuestionIndex, QuestionStore, load_questions_from_json};
pub use models::QuestionRecord;
pub use session::{Feedback, QuizSession, SubmitOutcome};

/// Top-level error for running the app.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Run the smartapp: connect the assistant transport (unless `offline`)
/// and drive the terminal UI until the user quits.
///
/// A failed or dropped host connection is logged and the app keeps
/// running on keyboard input alone.
pub async fn run(
    store: QuestionStore,
    config: Config,
    url_override: Option<String>,
    offline: bool,
) -> Result<(), AppError> {
    let app: SharedApp = Arc::new(Mutex::new(App::new(store)));
    let (tx, rx) = mpsc::unbounded_channel::<Outbound>();

    let transport_task = if offline {
        drop(rx);
        None
    } else {
        let url = url_override.unwrap_or_else(|| config.assistant_url.clone());
        let app = Arc::clone(&app);
        let outbox = tx.clone();
        Some(tokio::spawn(async move {
            if let Err(err) = assistant::run(config, url, app, outbox, rx).await {
                tracing::warn!(%err, "assistant transport unavailable, continuing offline");
            }
        }))
    };

    let result = run_tui(Arc::clone(&app), tx).await;

    if let Some(task) = transport_task {
        task.abort();
    }

    result
}

async fn run_tui(app: SharedApp, tx: OutboundSender) -> Result<(), AppError> {
    let mut terminal = terminal::init()?;

    loop {
        {
            let app = app.lock().await;
            if app.should_quit {
                break;
            }
            terminal.draw(|frame| ui::render(frame, &app))?;
        }

        // Poll with a timeout so host-driven state changes repaint promptly.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if handle_input(&app, &tx, key.code).await {
                    break;
                }
            }
        }
    }

    terminal::restore()?;
    Ok(())
}

/// Returns true if the app should exit.
async fn handle_input(app: &SharedApp, tx: &OutboundSender, key: KeyCode) -> bool {
    let mut app = app.lock().await;

    match key {
        KeyCode::Esc => {
            app.should_quit = true;
            return true;
        }
        KeyCode::Enter => {
            if app.session().has_answered() {
                app.next_question();
            } else {
                match app.submit_answer(None) {
                    Ok(Some(outcome)) => assistant::send_outcome(tx, &outcome),
                    Ok(None) => {}
                    Err(err) => tracing::error!(%err, "failed to evaluate answer"),
                }
            }
        }
        KeyCode::Tab => {
            app.next_question();
        }
        KeyCode::Char(c) => {
            app.input_push(c);
        }
        KeyCode::Backspace => {
            app.input_pop();
        }
        _ => {}
    }

    false
}
