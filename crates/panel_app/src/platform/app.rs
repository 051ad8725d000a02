use std::io::{self, BufRead};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use panel_client::ClientHandle;
use panel_core::{AppState, Msg};
use panel_logging::{panel_info, panel_warn};

use super::config::RunSettings;
use super::controller::Controller;
use super::effects::EffectRunner;
use super::ui::input::{parse_command, Command};

const CLIENT_WAIT: Duration = Duration::from_millis(50);

pub fn run_app(settings: RunSettings) -> Result<()> {
    panel_info!(
        "Starting panel against {} (poll every {:?}, {:?})",
        settings.client.base_url,
        settings.poll_interval,
        settings.poll_error_policy
    );

    let client = ClientHandle::new(&settings.client)
        .with_context(|| format!("failed to start client for {}", settings.client.base_url))?;
    let state = AppState::with_poll_settings(settings.poll_interval, settings.poll_error_policy);
    let mut controller = Controller::new(state, EffectRunner::new(client), io::stdout());

    let (input_tx, input_rx) = mpsc::channel::<Command>();
    thread::Builder::new()
        .name("panel-input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if let Some(command) = parse_command(&line) {
                    if input_tx.send(command).is_err() {
                        return;
                    }
                }
            }
            let _ = input_tx.send(Command::Quit);
        })
        .context("failed to spawn input thread")?;

    controller.write_help()?;
    controller.dispatch(Msg::Initialize)?;

    loop {
        controller.wait_for_client(CLIENT_WAIT)?;
        controller.pump_client()?;

        loop {
            let command = match input_rx.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            };
            match command {
                Command::Dispatch(msg) => controller.dispatch(msg)?,
                Command::Show => controller.show()?,
                Command::Help => controller.write_help()?,
                Command::Quit => {
                    panel_info!("Quit requested");
                    return Ok(());
                }
                Command::Unknown(line) => {
                    panel_warn!("Unknown command {:?}", line);
                    controller.write_line(&format!("Unknown command: {line} (type 'help')"))?;
                }
            }
        }
    }
}
