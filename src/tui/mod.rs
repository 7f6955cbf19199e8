pub mod action;
pub mod state;
pub mod view;

use crate::client::DuckClient;
use crate::config::Config;
use crate::orchestrator::{FetchOrchestrator, Lifecycle};

use action::{Action, AppEvent, KeyIntent, intent_for};
use state::AppState;
use view::draw;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::sync::Arc;
use std::{env, io, time::Duration};
use tokio::sync::mpsc;

pub async fn run() -> Result<()> {
    // --- 1. PREAMBLE & CONFIG ---
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Randuck - a random duck, in your terminal");
        println!("Usage: randuck-tui");
        println!();
        match Config::get_path_string() {
            Ok(path) => println!("Configuration File (optional): {}", path),
            Err(_) => println!("Configuration File (optional): config.toml in the standard config dir"),
        }
        println!();
        println!("Keys: g / Enter = get duck, d = dismiss error, q / Esc = quit");
        return Ok(());
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("randuck_panic.log")
        {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    let config = Config::load().unwrap_or_else(|e| {
        info!("Using default config ({})", e);
        Config::default()
    });
    let client = DuckClient::new(&config.api_url)
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("building client for {}", config.api_url))?;
    let orch = FetchOrchestrator::new(Arc::new(client));

    // --- 2. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 3. STATE INIT ---
    let mut app_state = AppState::new(config.show_errors);
    let mut lifecycle = Lifecycle::new();
    let (action_tx, mut action_rx) = mpsc::channel::<Action>(10);
    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(10);

    // --- 4. NETWORK TASK ---
    let visible = lifecycle.show();
    let screen = lifecycle.screen_scope();
    tokio::spawn(async move {
        let outcome = orch.initial(visible).await;
        let _ = event_tx.send(AppEvent::Initial(outcome)).await;

        while let Some(action) = action_rx.recv().await {
            match action {
                Action::Quit => break,
                Action::Refresh(ticket) => {
                    let outcome = orch.refresh(screen.clone()).await;
                    let _ = event_tx.send(AppEvent::Refreshed(ticket, outcome)).await;
                }
            }
        }
    });

    // --- 5. UI LOOP ---
    let result: Result<()> = async {
        loop {
            terminal.draw(|f| draw(f, &app_state))?;

            while let Ok(event) = event_rx.try_recv() {
                app_state.apply(event);
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()?
                    && key.kind == KeyEventKind::Press
                {
                    match intent_for(key.code) {
                        Some(KeyIntent::Quit) => {
                            let _ = action_tx.send(Action::Quit).await;
                            break;
                        }
                        Some(KeyIntent::GetDuck) => {
                            if let Some(ticket) = app_state.begin_refresh() {
                                let _ = action_tx.send(Action::Refresh(ticket)).await;
                            }
                        }
                        Some(KeyIntent::Dismiss) => app_state.screen.dismiss_error(),
                        None => {}
                    }
                }
            } else {
                app_state.tick();
            }
        }
        Ok(())
    }
    .await;

    // --- 6. TEARDOWN ---
    lifecycle.hide();
    lifecycle.destroy();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}
