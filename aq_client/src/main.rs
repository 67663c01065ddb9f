//! A terminal client for the AcademIQ learning platform.
//!
//! Restores the saved session, optionally logs in, and then reads
//! commands from standard input until `quit`.

use anyhow::{Context, Result};
use aq_client::{
    app::{App, Flow},
    commands::parse_command,
};
use academiq::ClientConfig;
use pico_args::Arguments;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

const HELP: &str = "\
Browse courses, videos and quizzes on an AcademIQ server

USAGE:
  aq_client [OPTIONS]

OPTIONS:
  --server URL          API base URL  [default: $ACADEMIQ_API_URL or http://localhost:5190/api]
  --email EMAIL         Log in with this email on start
  --password PASS       Password for --email
  --session-file PATH   Where the session is kept  [default: $ACADEMIQ_SESSION_FILE]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: Option<String>,
    email: Option<String>,
    password: Option<String>,
    session_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_target(false)
        .init();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs.opt_value_from_str("--server").ok().flatten(),
        email: pargs.opt_value_from_str("--email").ok().flatten(),
        password: pargs.opt_value_from_str("--password").ok().flatten(),
        session_file: pargs.opt_value_from_str("--session-file").ok().flatten(),
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let mut config = ClientConfig::from_env(args.server_url).context("Invalid configuration")?;
    if args.session_file.is_some() {
        config.session_file = args.session_file;
    }

    let mut app = App::new(&config)?;
    log::info!("Using API at {}", config.base_url);

    if let Some(email) = args.email {
        let password = match args.password {
            Some(p) => p,
            None => prompt("Password: ")?,
        };
        if let Err(e) = app.login(&email, &password).await {
            eprintln!("Login failed: {e}");
        }
    } else if let Some(user) = app.session().user() {
        println!("Welcome back, {}", user.full_name());
    }

    println!("Type 'help' for commands.");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match app.execute(command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => println!("Error: {e:#}"),
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
