//! Streaming shape and execution mode of a step

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cardinality of a step's input and output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamingShape {
    /// One input, one output
    #[serde(alias = "one-to-one")]
    UnaryUnary,
    /// One input, a stream of outputs
    #[serde(alias = "one-to-many", alias = "expansion")]
    UnaryStream,
    /// A stream of inputs reduced to one output
    #[serde(alias = "many-to-one", alias = "reduction")]
    StreamUnary,
    /// A stream in, a stream out
    #[serde(alias = "many-to-many")]
    StreamStream,
}

impl StreamingShape {
    /// Build a shape from the streaming flags of each side
    pub fn from_flags(input_streaming: bool, output_streaming: bool) -> Self {
        match (input_streaming, output_streaming) {
            (false, false) => StreamingShape::UnaryUnary,
            (false, true) => StreamingShape::UnaryStream,
            (true, false) => StreamingShape::StreamUnary,
            (true, true) => StreamingShape::StreamStream,
        }
    }

    /// Whether the step consumes a stream
    pub fn input_streaming(self) -> bool {
        matches!(self, StreamingShape::StreamUnary | StreamingShape::StreamStream)
    }

    /// Whether the step produces a stream
    pub fn output_streaming(self) -> bool {
        matches!(self, StreamingShape::UnaryStream | StreamingShape::StreamStream)
    }
}

impl Default for StreamingShape {
    fn default() -> Self {
        StreamingShape::UnaryUnary
    }
}

impl fmt::Display for StreamingShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StreamingShape::UnaryUnary => "unary-unary",
            StreamingShape::UnaryStream => "unary-stream",
            StreamingShape::StreamUnary => "stream-unary",
            StreamingShape::StreamStream => "stream-stream",
        };
        f.write_str(s)
    }
}

/// How the generated adapter schedules the user's step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    Default,
    /// Run on a worker pool that tolerates blocking calls
    OffloadedBlocking,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Default
    }
}
