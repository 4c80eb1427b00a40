//! Gesture Particles headless runner
//!
//! Replays control input from stdin against a session and prints the final
//! render state as JSON.
//!
//! Usage: `gesture-particles [config.json] < input.jsonl`
//!
//! Each input line is one of:
//! - a control delta: `{"scaleDelta": 0.2}`
//! - a tool call: `{"name": "controlParticles", "args": {...}}`
//! - a raw server message: `{"toolCall": {"functionCalls": [...]}}`
//!
//! One 60 Hz frame is run after every line.

use gesture_particles::vision::ToolCall;
use gesture_particles::{ControlDelta, Session, SessionConfig};
use serde_json::Value;
use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

const FRAME_SECONDS: f32 = 1.0 / 60.0;

enum Input {
    Delta(ControlDelta),
    Call(ToolCall),
    Message(String),
}

fn classify(line: &str) -> Result<Input, serde_json::Error> {
    let value: Value = serde_json::from_str(line)?;
    if value.get("toolCall").is_some() {
        Ok(Input::Message(line.to_string()))
    } else if value.get("name").is_some() {
        Ok(Input::Call(serde_json::from_value(value)?))
    } else {
        Ok(Input::Delta(serde_json::from_value(value)?))
    }
}

fn load_config() -> SessionConfig {
    let Some(path) = env::args().nth(1).map(PathBuf::from) else {
        log::info!("no config file specified, using defaults");
        return SessionConfig::default();
    };

    match SessionConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("failed to load config from {:?}: {}", path, e);
            log::warn!("using default configuration");
            SessionConfig::default()
        }
    }
}

fn main() {
    env_logger::init();

    let mut session = match Session::new(load_config()) {
        Ok(session) => session,
        Err(e) => {
            log::error!("cannot start session: {}", e);
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    for (number, line) in stdin.lock().lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("failed to read input: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match classify(line) {
            Ok(Input::Delta(delta)) => {
                session.apply_delta(&delta);
            }
            Ok(Input::Call(call)) => {
                if session.handle_tool_call(&call).is_none() {
                    log::warn!("line {}: unknown tool {:?}", number + 1, call.name);
                }
            }
            Ok(Input::Message(text)) => {
                if let Err(e) = session.handle_server_message(&text) {
                    log::warn!("line {}: {}", number + 1, e);
                }
            }
            Err(e) => {
                log::warn!("line {}: skipping malformed input: {}", number + 1, e);
                continue;
            }
        }

        match session.on_frame(FRAME_SECONDS) {
            Ok(frame) => log::debug!(
                "line {}: {} ({} points) scale {:.2} color {}",
                number + 1,
                frame.state.active_shape,
                frame.field.len(),
                frame.update.current_scale,
                frame.state.color
            ),
            Err(e) => {
                log::error!("frame failed: {}", e);
                process::exit(1);
            }
        }
        log::trace!("status: {}", session.status());
    }

    log::info!(
        "ran {} frames over {:.2}s, {} deltas applied",
        session.frame_count(),
        session.elapsed(),
        session.deltas_applied()
    );

    match serde_json::to_string_pretty(&session.state()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("failed to serialize state: {}", e);
            process::exit(1);
        }
    }
}
