//! Tiebreak oracle contract
//!
//! When the graph cannot decide a match, the two display names go to an
//! external streaming text-completion service. This module defines what is
//! sent, how the streamed reply is decoded, and how the final text becomes
//! a verdict. The transport itself belongs to the host through
//! [`TiebreakOracle`].

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Separates the winner name from the reason in a completion
pub const VERDICT_SEPARATOR: char = '|';

/// Stream payload marking the end of a completion
pub const DONE_SENTINEL: &str = "[DONE]";

pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
Input: 'Object1 vs Object2'.
Output: 'Winner|Reason'.
Example: 'Rock vs Scissors' → 'Rock|Rock crushes scissors decisively.'
Rules:
- Keep responses brief, creative, and imaginative.
- Highlight unique strengths of the winner.
- Add humor or dramatic flair.";

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle transport failed: {0}")]
    Transport(String),

    #[error("oracle rejected the request: {0}")]
    Rejected(String),
}

/// Sampling settings sent with every tiebreak request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub system_prompt: String,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
            temperature: 0.6,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// A tiebreak question: which of two named objects wins
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TiebreakRequest {
    pub name_a: String,
    pub name_b: String,
    pub params: CompletionParams,
}

impl TiebreakRequest {
    pub fn new(name_a: impl Into<String>, name_b: impl Into<String>) -> Self {
        Self::with_params(name_a, name_b, CompletionParams::default())
    }

    pub fn with_params(
        name_a: impl Into<String>,
        name_b: impl Into<String>,
        params: CompletionParams,
    ) -> Self {
        Self { name_a: name_a.into(), name_b: name_b.into(), params }
    }

    /// The user message: `"<nameA> vs <nameB>"`
    pub fn prompt(&self) -> String {
        format!("{} vs {}", self.name_a, self.name_b)
    }

    /// Streaming chat-completion request body
    pub fn body(&self) -> serde_json::Value {
        json!({
            "messages": [
                { "content": self.params.system_prompt, "role": "system" },
                { "content": self.prompt(), "role": "user" },
            ],
            "model": self.params.model,
            "frequency_penalty": self.params.frequency_penalty,
            "max_tokens": self.params.max_tokens,
            "presence_penalty": self.params.presence_penalty,
            "response_format": { "type": "text" },
            "stream": true,
            "temperature": self.params.temperature,
        })
    }

    /// Headers the completion endpoint expects, authorization last
    pub fn headers(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("Accept", "text/event-stream".to_string()),
            ("Content-Type", "application/json".to_string()),
            ("Authorization", format!("Bearer {api_key}")),
        ]
    }
}

/// One decoded server-sent chunk of a streamed completion
#[derive(Clone, Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created: i64,
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Choice {
    pub delta: Delta,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: u32,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Text carried by the first choice, if any
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.delta.content.as_deref()
    }
}

/// Event delivered by an oracle transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleEvent {
    /// Payload of one `data:` line
    Data(String),
    /// Transport-level error; the stream may continue
    Error(String),
    /// Stream closed by the server
    Closed,
}

/// Host-provided transport to the completion service
///
/// Implementations own timeouts and cancellation. The returned iterator
/// should end with [`OracleEvent::Closed`]; ending without it is treated
/// as a close.
pub trait TiebreakOracle {
    type Events: Iterator<Item = OracleEvent>;

    fn open(&self, request: &TiebreakRequest) -> Result<Self::Events, OracleError>;
}

/// Accumulates a streamed completion
#[derive(Clone, Debug, Default)]
pub struct CompletionStream {
    text: String,
    closed: bool,
    skipped: usize,
}

impl CompletionStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport event; returns `false` once the stream is closed
    pub fn push(&mut self, event: OracleEvent) -> bool {
        if self.closed {
            return false;
        }
        match event {
            OracleEvent::Data(payload) => self.push_data(&payload),
            OracleEvent::Error(message) => {
                tracing::warn!(%message, "tiebreak stream error");
            }
            OracleEvent::Closed => self.closed = true,
        }
        !self.closed
    }

    /// Feed one raw server-sent-event line
    ///
    /// Only `data:` fields carry text; comments, other fields and blank
    /// separators are ignored.
    pub fn push_line(&mut self, line: &str) -> bool {
        if let Some(payload) = line.strip_prefix("data:") {
            return self.push(OracleEvent::Data(payload.trim_start().to_string()));
        }
        !self.closed
    }

    fn push_data(&mut self, payload: &str) {
        let payload = payload.trim();
        if payload.is_empty() || payload == DONE_SENTINEL {
            return;
        }
        match serde_json::from_str::<ChatCompletionChunk>(payload) {
            Ok(chunk) => {
                if let Some(content) = chunk.content() {
                    self.text.push_str(content);
                }
            }
            Err(e) => {
                self.skipped += 1;
                tracing::debug!(error = %e, "skipping undecodable completion chunk");
            }
        }
    }

    /// Drain an event source until it closes
    pub fn drain<I: IntoIterator<Item = OracleEvent>>(&mut self, events: I) {
        for event in events {
            if !self.push(event) {
                break;
            }
        }
        self.closed = true;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of chunks that could not be decoded
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Parse the accumulated text; only meaningful once closed
    pub fn verdict(&self, name_a: &str, name_b: &str) -> Option<TiebreakVerdict> {
        if !self.closed {
            return None;
        }
        parse_verdict(&self.text, name_a, name_b)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Which side the oracle picked
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TiebreakWinner {
    A,
    B,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiebreakVerdict {
    pub winner: TiebreakWinner,
    /// Free-text flavor shown alongside the result
    pub reason: String,
}

/// Parse a finished completion of the form `"<winnerName>|<reason>"`
///
/// Returns `None` (still tied) unless the text holds exactly one separator,
/// a non-empty reason, and a winner token equal to exactly one candidate
/// name. The winner token is compared byte for byte; only the reason is
/// trimmed.
pub fn parse_verdict(text: &str, name_a: &str, name_b: &str) -> Option<TiebreakVerdict> {
    let mut parts = text.split(VERDICT_SEPARATOR);
    let winner = parts.next()?;
    let reason = parts.next()?.trim();
    if parts.next().is_some() || winner.is_empty() || reason.is_empty() {
        return None;
    }

    let winner = match (winner == name_a, winner == name_b) {
        (true, false) => TiebreakWinner::A,
        (false, true) => TiebreakWinner::B,
        _ => return None,
    };
    Some(TiebreakVerdict { winner, reason: reason.to_string() })
}
