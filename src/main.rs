//! Fourline - connect-four with server-synchronized multiplayer rooms.

#![warn(missing_docs)]

mod cli;
mod config;
mod db;
mod games;
mod room;
mod server;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::ServerConfig;
use db::MatchRepository;
use games::connect_four::{LocalMatch, MatchResult};
use room::{RoomService, RoomStore};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Http {
            port,
            host,
            config,
            db_path,
        } => run_http_server(config, host, port, db_path).await,
        Command::Local => run_local_match(),
    }
}

/// Run the HTTP room server.
async fn run_http_server(
    config_path: Option<std::path::PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<String>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = match config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_env_overrides();
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(db_path) = db_path {
        config = config.with_database_path(db_path);
    }

    info!(addr = %config.bind_addr(), "Starting fourline room server");

    let store = RoomStore::new();
    let service = match config.database_path() {
        Some(path) => {
            let history = MatchRepository::new(path.clone())?;
            history.migrate()?;
            RoomService::with_history(store, history)
        }
        None => RoomService::new(store),
    };

    let app = server::router(service);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Server ready at http://{}/", config.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}

/// Play a same-device match on stdin/stdout.
fn run_local_match() -> Result<()> {
    let mut game = LocalMatch::new();
    let stdin = std::io::stdin();

    println!("{}\n", game.grid().display());
    loop {
        let scores = game.scores();
        match game.result() {
            MatchResult::InProgress => {
                print!("{} to move, column 0-6 (q quits): ", game.current_player());
            }
            MatchResult::WonBy(winner) => {
                println!(
                    "{winner} wins! Score {} - {}",
                    scores.player_one_wins, scores.player_two_wins
                );
                print!("n for a new match, s resets scores, q quits: ");
            }
            MatchResult::Draw => {
                println!("Draw!");
                print!("n for a new match, s resets scores, q quits: ");
            }
        }
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            return Ok(());
        }
        match line.trim() {
            "q" => return Ok(()),
            "n" => {
                game.reset_match();
                println!("\n{}\n", game.grid().display());
            }
            "s" => game.reset_scores(),
            input => {
                let Ok(column) = input.parse::<usize>() else {
                    continue;
                };
                if column >= games::connect_four::COLS {
                    continue;
                }
                // Full columns and finished matches are silently ignored.
                if game.drop_disc(column).is_ok() {
                    println!("\n{}\n", game.grid().display());
                }
            }
        }
    }
}
