use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{AlertSink, AppContext, Dispatcher, PageChange, UiEvent};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
    task::JoinHandle,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{parse_command, Command, HELP};
use config::{load_settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(about = "Terminal client for the activity sign-up service")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    message_hide_ms: Option<u64>,
}

/// Alerts interrupt the prompt output; the app has no modal surface beyond that.
struct TerminalAlerts;

impl AlertSink for TerminalAlerts {
    fn alert(&self, text: &str) {
        println!("! {text}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(ms) = args.message_hide_ms {
        settings.message_hide_delay = Duration::from_millis(ms);
    }
    info!(
        server_url = %settings.server_url,
        hide_delay = ?settings.message_hide_delay,
        "starting activity sign-up client"
    );

    let ctx = AppContext::connect(settings, Arc::new(TerminalAlerts))
        .context("failed to set up backend client")?;
    let dispatcher = Dispatcher::new(ctx.clone());
    let _redraw = spawn_redraw(ctx);

    println!("{HELP}");
    dispatcher.dispatch(UiEvent::PageLoaded);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => run_command(&dispatcher, command).await,
            Err(error) => println!("? {error:#}"),
        }
    }
    Ok(())
}

fn spawn_redraw(ctx: AppContext) -> JoinHandle<()> {
    let mut changes = ctx.subscribe_changes();
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(PageChange::FormRejected(error)) => println!("? {error}"),
                Ok(_) => print!("\n{}", ctx.snapshot().await),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "redraw: skipped page changes");
                    print!("\n{}", ctx.snapshot().await);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

async fn run_command(dispatcher: &Dispatcher, command: Command) {
    let ctx = dispatcher.context();
    match command {
        Command::List => print!("{}", ctx.snapshot().await),
        Command::Help => println!("{HELP}"),
        Command::Select(activity) => {
            if let Err(error) = ctx.page().lock().await.form.activity.select(&activity) {
                println!("? {error}");
            }
        }
        Command::Email(email) => ctx.page().lock().await.form.email = email,
        Command::Submit => {
            dispatcher.dispatch(UiEvent::SubmitSignup);
        }
        Command::Signup { activity, email } => {
            {
                let mut page = ctx.page().lock().await;
                if let Err(error) = page.form.activity.select(&activity) {
                    println!("? {error}");
                    return;
                }
                page.form.email = email;
            }
            dispatcher.dispatch(UiEvent::SubmitSignup);
        }
        Command::Remove(row) => {
            let key = ctx.snapshot().await.row_keys().get(row - 1).cloned();
            match key {
                Some(key) => {
                    dispatcher.dispatch(UiEvent::DeleteParticipant(key));
                }
                None => println!("? no participant row #{row}"),
            }
        }
        Command::Quit => {}
    }
}
