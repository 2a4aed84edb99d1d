//! Content-type dispatch: turns an asset's raw bytes into text content.

use tracing::{debug, info, trace};

use assetproc_core::defaults;
use assetproc_core::{AudioChunk, ContentKind, Error, MediaPipeline, Result};

/// Derive text content from raw file bytes.
///
/// Text and markdown are decoded as UTF-8. Audio and video are cut into
/// chunks of at most `max_chunk_bytes`, transcribed, and joined with a blank
/// line in chunk order.
pub async fn extract_content(
    media: &dyn MediaPipeline,
    kind: ContentKind,
    data: Vec<u8>,
    name_hint: &str,
    max_chunk_bytes: usize,
) -> Result<String> {
    match kind {
        ContentKind::Text | ContentKind::Markdown => {
            info!(file_name = name_hint, "Text file detected, reading content");
            Ok(String::from_utf8(data)?)
        }
        ContentKind::Audio => {
            info!(file_name = name_hint, "Processing audio file");
            let chunks = media
                .split_audio_file(&data, max_chunk_bytes, name_hint)
                .await?;
            transcribe(media, &chunks).await
        }
        ContentKind::Video => {
            info!(file_name = name_hint, "Processing video file");
            let chunks = media
                .extract_audio_and_split(&data, max_chunk_bytes, name_hint)
                .await?;
            transcribe(media, &chunks).await
        }
    }
}

async fn transcribe(media: &dyn MediaPipeline, chunks: &[AudioChunk]) -> Result<String> {
    debug!(chunk_count = chunks.len(), "Transcribing audio chunks");
    let transcripts = media.transcribe_chunks(chunks).await?;

    if transcripts.len() != chunks.len() {
        return Err(Error::Transcription(format!(
            "Expected {} transcripts, got {}",
            chunks.len(),
            transcripts.len()
        )));
    }

    for (i, text) in transcripts.iter().enumerate() {
        trace!(index = i, text = %text, "Chunk transcript");
    }
    Ok(transcripts.join(defaults::TRANSCRIPT_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Pipeline that splits input on `|` and transcribes chunks to fixed text.
    struct ScriptedPipeline {
        transcripts: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedPipeline {
        fn new(transcripts: &[&str]) -> Self {
            Self {
                transcripts: transcripts.iter().map(|s| s.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn split(&self, op: &str, data: &[u8], max: usize, hint: &str) -> Vec<AudioChunk> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:{}:{}", op, max, hint));
            data.split(|b| *b == b'|')
                .enumerate()
                .map(|(i, part)| {
                    AudioChunk::new(i, format!("{}-{}", hint, i), "audio/mpeg", part.to_vec())
                })
                .collect()
        }
    }

    #[async_trait]
    impl MediaPipeline for ScriptedPipeline {
        async fn split_audio_file(
            &self,
            data: &[u8],
            max_chunk_bytes: usize,
            name_hint: &str,
        ) -> Result<Vec<AudioChunk>> {
            Ok(self.split("split", data, max_chunk_bytes, name_hint))
        }

        async fn extract_audio_and_split(
            &self,
            data: &[u8],
            max_chunk_bytes: usize,
            name_hint: &str,
        ) -> Result<Vec<AudioChunk>> {
            Ok(self.split("extract", data, max_chunk_bytes, name_hint))
        }

        async fn transcribe_chunks(&self, chunks: &[AudioChunk]) -> Result<Vec<String>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("transcribe:{}", chunks.len()));
            Ok(self.transcripts.clone())
        }
    }

    #[tokio::test]
    async fn test_text_passthrough() {
        let media = ScriptedPipeline::new(&[]);
        let content = extract_content(&media, ContentKind::Text, b"hello".to_vec(), "a.txt", 10)
            .await
            .unwrap();
        assert_eq!(content, "hello");
        assert!(media.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_markdown_passthrough_keeps_unicode() {
        let media = ScriptedPipeline::new(&[]);
        let text = "# Título\n\n- café ☕";
        let content = extract_content(
            &media,
            ContentKind::Markdown,
            text.as_bytes().to_vec(),
            "notes.md",
            10,
        )
        .await
        .unwrap();
        assert_eq!(content, text);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decode_error() {
        let media = ScriptedPipeline::new(&[]);
        let err = extract_content(&media, ContentKind::Text, vec![0x68, 0xff, 0x69], "a.txt", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_audio_joins_transcripts_with_blank_line() {
        let media = ScriptedPipeline::new(&["a", "b", "c"]);
        let content = extract_content(&media, ContentKind::Audio, b"1|2|3".to_vec(), "talk.mp3", 99)
            .await
            .unwrap();
        assert_eq!(content, "a\n\nb\n\nc");
        assert_eq!(
            *media.calls.lock().unwrap(),
            vec!["split:99:talk.mp3", "transcribe:3"]
        );
    }

    #[tokio::test]
    async fn test_video_extracts_audio_first() {
        let media = ScriptedPipeline::new(&["one", "two"]);
        let content = extract_content(&media, ContentKind::Video, b"1|2".to_vec(), "clip.mp4", 7)
            .await
            .unwrap();
        assert_eq!(content, "one\n\ntwo");
        assert_eq!(
            *media.calls.lock().unwrap(),
            vec!["extract:7:clip.mp4", "transcribe:2"]
        );
    }

    #[tokio::test]
    async fn test_single_chunk_has_no_separator() {
        let media = ScriptedPipeline::new(&["only"]);
        let content = extract_content(&media, ContentKind::Audio, b"x".to_vec(), "a.mp3", 10)
            .await
            .unwrap();
        assert_eq!(content, "only");
    }

    #[tokio::test]
    async fn test_transcript_count_mismatch_fails() {
        let media = ScriptedPipeline::new(&["a", "b"]);
        let err = extract_content(&media, ContentKind::Audio, b"1|2|3".to_vec(), "talk.mp3", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transcription(ref m) if m.contains("Expected 3")));
    }
}
