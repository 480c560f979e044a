use std::io::Write;

use anyhow::Result;
use colored::*;
use reqwest::Client;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use copilot_common::env_or;

mod api_client;
use api_client::ApiClient;

const DEFAULT_BASE_URL: &str = "http://localhost:5171";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let base_url = env_or("COPILOT_BASE_URL", DEFAULT_BASE_URL);
    let client = ApiClient::new(base_url.clone(), Client::new());

    let mut rl = DefaultEditor::new()?;
    println!("{}", format!("Copilot sandbox connected to {base_url}. Press Ctrl-C or Ctrl-D to quit.").green());

    loop {
        let readline = rl.readline("Question: ");
        match readline {
            Ok(line) => {
                if !line.trim().is_empty() {
                    rl.add_history_entry(line.as_str())?;
                }

                let mut stdout = std::io::stdout();
                let answered = client
                    .ask(&line, |fragment| {
                        write!(stdout, "{fragment}")?;
                        stdout.flush()?;
                        Ok(())
                    })
                    .await;
                println!();

                if let Err(err) = answered {
                    println!("{} {:#}", "Error:".red(), err);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Interrupted. Exiting.".red());
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Exiting.".red());
                break;
            }
            Err(err) => {
                println!("{} {:?}", "Error:".red(), err);
                break;
            }
        }
    }

    Ok(())
}
