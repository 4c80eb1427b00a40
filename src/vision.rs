//! Boundary with the gesture-recognition service.
//!
//! The service watches webcam frames and answers with function calls to a
//! single tool, `controlParticles`, whose arguments are a [`ControlDelta`].
//! This module holds the pieces of that exchange that do not depend on a
//! particular network client:
//!
//! - the tool declaration and instructions sent when the session opens,
//! - decoding of server messages into tool calls and tool calls into deltas,
//! - the acknowledgement sent back for every handled call,
//! - the outgoing frame throttle,
//! - the status line shown after each action.
//!
//! The network session and frame capture live with the host.

use crate::error::PayloadError;
use crate::state::ControlDelta;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Name of the only tool the service may call.
pub const CONTROL_TOOL_NAME: &str = "controlParticles";

/// Instructions given to the service when the session opens.
pub const SYSTEM_INSTRUCTION: &str = "\
You control a 3D particle display from the user's hand gestures.
Watch the video stream continuously and call controlParticles whenever a gesture appears:
- hands moving apart: positive scaleDelta, e.g. 0.2
- hands moving together or pinching: negative scaleDelta, e.g. -0.2
- a waving hand: rotationDelta, e.g. 0.5
- hands forming a heart: detectedShape = \"HEART\"
- a thumbs up: detectedShape = \"GALAXY\"
React to motion immediately.";

/// Status shown when no recent action is being displayed.
pub const STATUS_IDLE: &str = "Watching...";

/// Function declaration for [`CONTROL_TOOL_NAME`], in the service's schema format.
pub fn tool_declaration() -> Value {
    json!({
        "name": CONTROL_TOOL_NAME,
        "parameters": {
            "type": "OBJECT",
            "description": "Update the 3D particle system based on user hand gestures.",
            "properties": {
                "scaleDelta": {
                    "type": "NUMBER",
                    "description": "Change in size. Positive (0.1 to 0.5) to expand when hands move apart, negative (-0.1 to -0.5) to shrink when hands close."
                },
                "rotationDelta": {
                    "type": "NUMBER",
                    "description": "Change in rotation speed. Positive (e.g. 0.5) while the user is waving."
                },
                "detectedShape": {
                    "type": "STRING",
                    "description": "Name of the shape the user mimics, e.g. \"HEART\"."
                }
            }
        }
    })
}

/// One function call from the service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// Acknowledgement for a handled tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub id: Option<String>,
    pub name: String,
    pub response: Value,
}

impl ToolResponse {
    fn updated(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            name: call.name.clone(),
            response: json!({ "result": "updated" }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerMessage {
    #[serde(default)]
    tool_call: Option<ToolCallBatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolCallBatch {
    #[serde(default)]
    function_calls: Vec<ToolCall>,
}

/// Extract the function calls from a raw server message.
///
/// Messages without a `toolCall` section (audio, turn markers, ...) yield
/// an empty list. Only text that is not a JSON object is an error.
pub fn parse_server_message(text: &str) -> Result<Vec<ToolCall>, PayloadError> {
    let message: ServerMessage = serde_json::from_str(text)?;
    Ok(message
        .tool_call
        .map(|batch| batch.function_calls)
        .unwrap_or_default())
}

/// Build a delta from tool-call arguments.
///
/// Fields with the wrong JSON type are treated as absent rather than
/// failing the whole call; the service's output is not trusted to be
/// well-formed.
pub fn decode_args(args: &Value) -> ControlDelta {
    let number = |key: &str| args.get(key).and_then(Value::as_f64).map(|v| v as f32);
    ControlDelta {
        scale_delta: number("scaleDelta"),
        rotation_delta: number("rotationDelta"),
        detected_shape: args
            .get("detectedShape")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Turn a tool call into a delta and its acknowledgement.
///
/// Calls to any other tool are ignored.
pub fn handle_tool_call(call: &ToolCall) -> Option<(ControlDelta, ToolResponse)> {
    if call.name != CONTROL_TOOL_NAME {
        log::debug!("ignoring call to unknown tool {:?}", call.name);
        return None;
    }
    Some((decode_args(&call.args), ToolResponse::updated(call)))
}

/// Human-readable summary of a delta, as shown in the status line.
pub fn describe(delta: &ControlDelta) -> String {
    let scale = delta
        .scale_delta
        .map(|d| format!("{:.1}", d))
        .unwrap_or_else(|| "0".to_string());
    let shape = delta
        .detected_shape
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("None");
    format!("AI Action: Scale {} | Shape: {}", scale, shape)
}

/// Limits outgoing webcam frames to a fixed rate.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: f32,
    last_sent: Option<f32>,
}

impl FrameThrottle {
    /// `frames_per_second` must be positive; the config validates it.
    pub fn new(frames_per_second: f32) -> Self {
        Self {
            interval: 1.0 / frames_per_second,
            last_sent: None,
        }
    }

    /// Seconds between two frames.
    #[inline]
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Whether a frame should be sent at time `now` (seconds). Records the
    /// send when it returns `true`.
    pub fn should_send(&mut self, now: f32) -> bool {
        match self.last_sent {
            Some(last) if now - last < self.interval => false,
            _ => {
                self.last_sent = Some(now);
                true
            }
        }
    }
}

/// Status text that shows the last action for a while, then reverts.
#[derive(Debug, Clone)]
pub struct StatusLine {
    hold: f32,
    message: Option<(String, f32)>,
}

impl StatusLine {
    pub fn new(hold_secs: f32) -> Self {
        Self {
            hold: hold_secs,
            message: None,
        }
    }

    /// Show the summary of `delta` starting at `now`.
    pub fn record(&mut self, delta: &ControlDelta, now: f32) {
        self.message = Some((describe(delta), now));
    }

    /// Text to display at time `now`.
    pub fn text(&self, now: f32) -> &str {
        match &self.message {
            Some((text, at)) if now - *at < self.hold => text.as_str(),
            _ => STATUS_IDLE,
        }
    }
}
