use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trivia_smartapp::Config;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from
    #[arg(short, long, default_value = "questions.json")]
    questions: PathBuf,

    /// Override the assistant endpoint URL
    #[arg(long)]
    url: Option<String>,

    /// Run without connecting to an assistant host
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = Config::from_env();

    // The TUI owns stdout, so logs go to a file.
    let file_appender = tracing_appender::rolling::daily("logs", "smartapp.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.rust_log))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let store = match trivia_smartapp::load_questions_from_json(&args.questions) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Failed to load questions: {err}");
            process::exit(1);
        }
    };
    tracing::info!(count = store.len(), mode = ?config.mode, "starting trivia smartapp");

    if let Err(err) = trivia_smartapp::run(store, config, args.url, args.offline).await {
        eprintln!("Error running quiz: {err}");
        process::exit(1);
    }
}
