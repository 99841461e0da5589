//! In-memory transport and capture doubles for deterministic tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agentmux_proto::{CaptureSource, SessionTransport, TransportError};
use async_trait::async_trait;

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Literal { session: String, text: String },
    Key { session: String, key: String },
}

impl Sent {
    pub fn literal(session: &str, text: &str) -> Self {
        Sent::Literal {
            session: session.to_string(),
            text: text.to_string(),
        }
    }

    pub fn key(session: &str, key: &str) -> Self {
        Sent::Key {
            session: session.to_string(),
            key: key.to_string(),
        }
    }
}

fn scripted_failure(command: &str) -> TransportError {
    TransportError::NonZeroExit {
        command: command.to_string(),
        code: Some(1),
        stderr: "scripted failure".to_string(),
    }
}

/// Transport that records every call, optionally failing all of them.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose calls are recorded and then fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// All calls so far, in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, sent: Sent, command: &str) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(sent);
        if self.fail {
            Err(scripted_failure(command))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionTransport for RecordingTransport {
    async fn send_literal_keys(&self, session: &str, text: &str) -> Result<(), TransportError> {
        self.record(Sent::literal(session, text), "send-keys -l")
    }

    async fn send_key(&self, session: &str, key: &str) -> Result<(), TransportError> {
        self.record(Sent::key(session, key), "send-keys")
    }
}

/// Capture source that replays scripted frames.
///
/// A `None` frame fails the capture. Once the script runs out the last frame
/// repeats forever.
#[derive(Debug)]
pub struct ScriptedCapture {
    frames: Mutex<VecDeque<Option<String>>>,
    last: Mutex<Option<String>>,
    captures: Mutex<usize>,
}

impl ScriptedCapture {
    /// Frames that all capture successfully.
    pub fn new<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_frames(frames.into_iter().map(|f| Some(f.into())))
    }

    pub fn from_frames(frames: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            frames: Mutex::new(frames.into_iter().collect()),
            last: Mutex::new(Some(String::new())),
            captures: Mutex::new(0),
        }
    }

    /// Number of captures taken.
    pub fn capture_count(&self) -> usize {
        *self.captures.lock().unwrap()
    }
}

#[async_trait]
impl CaptureSource for ScriptedCapture {
    async fn capture_pane(
        &self,
        _session: &str,
        _max_lines: Option<usize>,
    ) -> Result<String, TransportError> {
        *self.captures.lock().unwrap() += 1;
        let mut last = self.last.lock().unwrap();
        if let Some(frame) = self.frames.lock().unwrap().pop_front() {
            *last = frame;
        }
        last.clone().ok_or_else(|| scripted_failure("capture-pane"))
    }
}

/// A pane whose agent reacts to Enter: it shows `before` until Enter has been
/// pressed and `renders_after_enter` further captures have been taken, then
/// shows `after`.
///
/// Implements both collaborator traits, so one instance can back a
/// dispatcher and a bootstrap call at the same time.
#[derive(Debug)]
pub struct SimulatedPane {
    before: String,
    after: String,
    renders_after_enter: usize,
    state: Mutex<PaneState>,
}

#[derive(Debug, Default)]
struct PaneState {
    enter_presses: usize,
    captures_since_enter: usize,
    sent: Vec<Sent>,
}

impl SimulatedPane {
    pub fn new(
        before: impl Into<String>,
        after: impl Into<String>,
        renders_after_enter: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            before: before.into(),
            after: after.into(),
            renders_after_enter,
            state: Mutex::new(PaneState::default()),
        })
    }

    /// A pane that never leaves `before`.
    pub fn stuck(before: impl Into<String>) -> Arc<Self> {
        Self::new(before, String::new(), usize::MAX)
    }

    pub fn enter_presses(&self) -> usize {
        self.state.lock().unwrap().enter_presses
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.state.lock().unwrap().sent.clone()
    }
}

#[async_trait]
impl SessionTransport for SimulatedPane {
    async fn send_literal_keys(&self, session: &str, text: &str) -> Result<(), TransportError> {
        self.state.lock().unwrap().sent.push(Sent::literal(session, text));
        Ok(())
    }

    async fn send_key(&self, session: &str, key: &str) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.sent.push(Sent::key(session, key));
        if key == "Enter" {
            state.enter_presses += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl CaptureSource for SimulatedPane {
    async fn capture_pane(
        &self,
        _session: &str,
        _max_lines: Option<usize>,
    ) -> Result<String, TransportError> {
        let mut state = self.state.lock().unwrap();
        if state.enter_presses == 0 {
            return Ok(self.before.clone());
        }
        if state.captures_since_enter < self.renders_after_enter {
            state.captures_since_enter += 1;
            return Ok(self.before.clone());
        }
        Ok(self.after.clone())
    }
}
