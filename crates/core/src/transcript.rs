//! Transcript types and the transcription collaborator boundary.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::Result;

/// One unit of speech-to-text output from the transcription collaborator.
///
/// Interim events (`is_final == false`) are display-only; only finalized
/// events are folded into the context buffer and considered for routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEvent {
    pub text: String,
    pub is_final: bool,
}

impl TranscriptEvent {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn finalized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Transcription collaborator boundary.
///
/// Implementations stream raw audio bytes out to an external speech-to-text
/// service and yield transcript events back. The session loop consumes the
/// receiver; dropping the audio sender ends the stream.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Start a transcription stream for one connection.
    ///
    /// Returns a sender for raw PCM audio chunks and a receiver of
    /// transcript events. A startup failure here is terminal for the
    /// connection that requested it.
    async fn start_stream(
        &self,
    ) -> Result<(mpsc::Sender<Vec<u8>>, mpsc::Receiver<TranscriptEvent>)>;

    /// Whether the collaborator is reachable and ready to accept streams.
    async fn is_ready(&self) -> bool;
}

/// Bounded FIFO of the most recent finalized segment texts.
///
/// Owned by exactly one session; agents that want "recent discussion"
/// rather than a single segment receive the joined contents.
#[derive(Debug, Clone)]
pub struct ContextBuffer {
    segments: VecDeque<String>,
    capacity: usize,
}

impl ContextBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            segments: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append a finalized segment, evicting the oldest entry when full.
    pub fn push(&mut self, text: impl Into<String>) {
        if self.segments.len() == self.capacity {
            self.segments.pop_front();
        }
        self.segments.push_back(text.into());
    }

    /// Join the buffered segments in arrival order.
    pub fn joined(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(segment);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Segments in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_bounded() {
        let mut buffer = ContextBuffer::new(3);
        for i in 0..10 {
            buffer.push(format!("segment {}", i));
            assert!(buffer.len() <= 3);
        }
        assert_eq!(buffer.len(), 3);

        // Always the most recent entries, in arrival order.
        let kept: Vec<&str> = buffer.iter().collect();
        assert_eq!(kept, vec!["segment 7", "segment 8", "segment 9"]);
    }

    #[test]
    fn test_buffer_len_tracks_min() {
        let mut buffer = ContextBuffer::new(5);
        buffer.push("a");
        buffer.push("b");
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_buffer_joined() {
        let mut buffer = ContextBuffer::new(4);
        buffer.push("we should cut the meeting");
        buffer.push("agreed, it runs too long");
        assert_eq!(
            buffer.joined(),
            "we should cut the meeting agreed, it runs too long"
        );
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut buffer = ContextBuffer::new(0);
        buffer.push("x");
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.capacity(), 1);
    }
}
