//! Transcription collaborator client.
//!
//! The speech-to-text pipeline is external: audio goes out to a sidecar
//! service over HTTP, transcript events come back. Audio is buffered into
//! fixed-size chunks before each request; the trailing partial chunk is
//! flushed when the stream ends.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc;

use insight_config::TranscriptionSettings;
use insight_core::{Error, Result, Transcriber, TranscriptEvent};

/// Response from the speech-to-text sidecar.
#[derive(Debug, Deserialize)]
struct SttResponse {
    #[serde(default)]
    text: String,
    #[serde(default = "default_true")]
    is_final: bool,
    #[serde(default)]
    error: Option<String>,
}

fn default_true() -> bool {
    true
}

/// HTTP client for the speech-to-text sidecar.
pub struct HttpTranscriber {
    settings: TranscriptionSettings,
    client: reqwest::Client,
}

impl HttpTranscriber {
    pub fn new(settings: TranscriptionSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| Error::Transcription(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { settings, client })
    }

    async fn transcribe_chunk(
        client: &reqwest::Client,
        url: &str,
        chunk: Vec<u8>,
    ) -> Result<Option<TranscriptEvent>> {
        let response = client
            .post(format!("{}/transcribe", url))
            .header("Content-Type", "audio/pcm")
            .body(chunk)
            .send()
            .await
            .map_err(|e| Error::Transcription(format!("STT request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Transcription(format!(
                "STT service returned {}",
                response.status()
            )));
        }

        let result: SttResponse = response
            .json()
            .await
            .map_err(|e| Error::Transcription(format!("Failed to parse STT response: {}", e)))?;

        if let Some(error) = &result.error {
            tracing::warn!(error = %error, "STT service reported an error");
        }

        if result.text.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(TranscriptEvent {
            text: result.text,
            is_final: result.is_final,
        }))
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn start_stream(
        &self,
    ) -> Result<(mpsc::Sender<Vec<u8>>, mpsc::Receiver<TranscriptEvent>)> {
        let (audio_tx, mut audio_rx) = mpsc::channel::<Vec<u8>>(100);
        let (event_tx, event_rx) = mpsc::channel::<TranscriptEvent>(100);

        let client = self.client.clone();
        let url = self.settings.url.clone();
        let chunk_bytes = self.settings.chunk_bytes.max(1);

        tokio::spawn(async move {
            let mut buffer: Vec<u8> = Vec::with_capacity(chunk_bytes * 2);

            while let Some(audio) = audio_rx.recv().await {
                buffer.extend_from_slice(&audio);

                while buffer.len() >= chunk_bytes {
                    let chunk: Vec<u8> = buffer.drain(..chunk_bytes).collect();
                    match Self::transcribe_chunk(&client, &url, chunk).await {
                        Ok(Some(event)) => {
                            if event_tx.send(event).await.is_err() {
                                // Consumer gone; stop streaming.
                                return;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "Transcription chunk failed");
                        }
                    }
                }
            }

            // Flush whatever remains when the audio stream closes.
            if !buffer.is_empty() {
                match Self::transcribe_chunk(&client, &url, buffer).await {
                    Ok(Some(event)) => {
                        let _ = event_tx.send(event).await;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Final transcription flush failed");
                    }
                }
            }

            tracing::debug!("Transcription stream ended");
        });

        Ok((audio_tx, event_rx))
    }

    async fn is_ready(&self) -> bool {
        self.client
            .get(format!("{}/health", self.settings.url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stt_response_defaults() {
        let response: SttResponse = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert!(response.is_final);
        assert!(response.error.is_none());

        let response: SttResponse =
            serde_json::from_str(r#"{"text": "hel", "is_final": false}"#).unwrap();
        assert!(!response.is_final);
    }

    #[test]
    fn test_transcriber_builds_from_defaults() {
        let transcriber = HttpTranscriber::new(TranscriptionSettings::default());
        assert!(transcriber.is_ok());
    }
}
