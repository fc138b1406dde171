use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use updates_core::{update, Msg, PaginationState};
use updates_engine::EngineHandle;
use updates_logging::updates_info;

use super::effects::EffectRunner;
use super::render::{render_footer, render_rows};
use crate::config::AppConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    LoadMore,
    Reload,
    Quit,
}

pub fn run_app(config: &AppConfig) -> anyhow::Result<()> {
    let engine = EngineHandle::new(config.fetch_settings()).context("failed to start feed engine")?;
    let runner = EffectRunner::new(engine);
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_input_reader(cmd_tx);

    let mut out = io::stdout().lock();
    let mut shown_rows = 0;
    let mut state = dispatch(config.initial_state(), Msg::Initialize, &runner);

    loop {
        match cmd_rx.recv_timeout(POLL_INTERVAL) {
            Ok(Command::LoadMore) => state = dispatch(state, Msg::LoadMoreClicked, &runner),
            Ok(Command::Reload) => {
                state = dispatch(state, Msg::Initialize, &runner);
                shown_rows = 0;
                writeln!(out, "-- reloaded --")?;
            }
            Ok(Command::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                let _ = dispatch(state, Msg::Closed, &runner);
                updates_info!("Feed view closed");
                return Ok(());
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        for msg in runner.poll() {
            state = dispatch(state, msg, &runner);
        }

        if state.consume_dirty() {
            let view = state.view(Utc::now());
            for line in render_rows(&view.rows, shown_rows) {
                writeln!(out, "{line}")?;
            }
            shown_rows = view.rows.len();
            writeln!(out, "{}", render_footer(&view))?;
            out.flush()?;
        }
    }
}

fn dispatch(state: PaginationState, msg: Msg, runner: &EffectRunner) -> PaginationState {
    let (state, effects) = update(state, msg);
    runner.run(effects);
    state
}

/// Reads commands from stdin. End of input counts as quit.
fn spawn_input_reader(cmd_tx: mpsc::Sender<Command>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let Some(command) = parse_command(&line) else {
                continue;
            };
            if cmd_tx.send(command).is_err() || command == Command::Quit {
                return;
            }
        }
        let _ = cmd_tx.send(Command::Quit);
    });
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "m" | "more" => Some(Command::LoadMore),
        "r" | "reload" => Some(Command::Reload),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}
