//! Re-encode a PGN file in the canonical study format.
//!
//! Reads one game from a file (or stdin with "-"), rebuilds it as a game
//! tree and prints the tree's own PGN rendering: normalized SAN and
//! comments, variations in writing order, and a [FEN] header only when the
//! game starts away from the standard position. Rejected input prints the
//! error notification as JSON on stderr.
//!
//! Usage: reformat-pgn [file|-] [--fen <start fen>]

use std::env;
use std::fs;
use std::io::Read;

use chess_study::pgn;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut file: Option<String> = None;
    let mut fen: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--fen" => {
                fen = args.get(i + 1).cloned();
                i += 2;
            }
            "--help" | "-h" => {
                eprintln!("Usage: {} [file|-] [--fen <start fen>]", args[0]);
                return Ok(());
            }
            other => {
                file = Some(other.to_string());
                i += 1;
            }
        }
    }

    let text = match file.as_deref() {
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => fs::read_to_string(path)?,
    };

    match pgn::decode(&text, fen.as_deref()) {
        Ok(tree) => {
            println!("{}", pgn::encode(&tree));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.notification())?);
            std::process::exit(1);
        }
    }
}
