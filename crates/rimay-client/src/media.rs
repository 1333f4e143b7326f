//! Speech, transcription and uploaded-audio endpoints.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use rimay_core::errors::ApiError;
use rimay_core::lang::Language;
use rimay_core::models::{SpeechAudio, Transcription, UploadRecord, UploadStats};

use crate::client::ApiClient;

#[derive(Serialize)]
struct SpeechBody<'a> {
    text: &'a str,
    lang: &'a str,
}

#[derive(Deserialize)]
struct UploadsEnvelope {
    #[serde(default)]
    uploads: Vec<UploadRecord>,
}

#[derive(Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    stats: UploadStats,
}

/// Language code sent to the speech endpoint. Regional Kichwa/Quechua
/// variants (`qu-EC`, ...) collapse to `qu`.
pub fn speech_lang(lang: &str) -> &str {
    if lang.starts_with("qu") {
        "qu"
    } else {
        lang
    }
}

impl ApiClient {
    /// `POST /text-to-speech`. Empty text yields no audio without a request.
    #[instrument(skip(self, text))]
    pub async fn text_to_speech(&self, text: &str, lang: &str) -> Result<SpeechAudio, ApiError> {
        if text.trim().is_empty() {
            return Ok(SpeechAudio::default());
        }
        let body = SpeechBody {
            text,
            lang: speech_lang(lang),
        };
        let req = self.post("/text-to-speech")?.json(&body);
        self.send_json(req).await
    }

    /// Fetch audio by URL; relative URLs resolve against the base URL.
    #[instrument(skip(self))]
    pub async fn download_audio(&self, url: &str) -> Result<Bytes, ApiError> {
        if url.trim().is_empty() {
            return Err(ApiError::InvalidRequest("audio URL is empty".into()));
        }
        let resp = self.send(self.get(url)?).await?;
        resp.bytes().await.map_err(|e| self.transport_error(e))
    }

    /// `POST /transcribe` with a recorded clip.
    #[instrument(skip(self, audio), fields(bytes = audio.len()))]
    pub async fn transcribe(&self, audio: Vec<u8>, lang: Language) -> Result<Transcription, ApiError> {
        self.upload_audio("/transcribe", "audio", "audio.webm", audio, lang)
            .await
    }

    /// `POST /speech-to-text` with an audio file.
    #[instrument(skip(self, audio), fields(bytes = audio.len()))]
    pub async fn speech_to_text(
        &self,
        file_name: &str,
        audio: Vec<u8>,
        lang: Language,
    ) -> Result<Transcription, ApiError> {
        self.upload_audio("/speech-to-text", "file", file_name, audio, lang)
            .await
    }

    async fn upload_audio(
        &self,
        path: &str,
        field: &'static str,
        file_name: &str,
        audio: Vec<u8>,
        lang: Language,
    ) -> Result<Transcription, ApiError> {
        if audio.is_empty() {
            return Err(ApiError::InvalidRequest("audio is empty".into()));
        }
        let form = Form::new()
            .part(field, Part::bytes(audio).file_name(file_name.to_string()))
            .text("lang", lang.code());
        let req = self.post(path)?.multipart(form);
        self.send_json(req).await
    }

    pub async fn uploads(&self) -> Result<Vec<UploadRecord>, ApiError> {
        let envelope: UploadsEnvelope = self.send_json(self.get("/api/uploads")?).await?;
        Ok(envelope.uploads)
    }

    /// Aggregate upload statistics, `None` when the backend reports failure.
    pub async fn stats(&self) -> Result<Option<UploadStats>, ApiError> {
        let envelope: StatsEnvelope = self.send_json(self.get("/api/stats")?).await?;
        Ok(envelope.success.then_some(envelope.stats))
    }

    /// `DELETE /api/upload/<filename>`. The name is sent as a single,
    /// percent-encoded path segment.
    #[instrument(skip(self))]
    pub async fn delete_upload(&self, filename: &str) -> Result<(), ApiError> {
        let filename = filename.trim();
        let invalid = || ApiError::InvalidRequest(format!("invalid upload file name {filename:?}"));
        if filename.is_empty() || filename == "." || filename == ".." || filename.contains(['/', '\\']) {
            return Err(invalid());
        }
        let mut url = self.endpoint("/api/upload")?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(filename);
        self.send(self.delete_url(url)).await?;
        info!(filename, "upload deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client_for;
    use wiremock::matchers::{body_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn speech_lang_collapses_kichwa_variants() {
        assert_eq!(speech_lang("qu"), "qu");
        assert_eq!(speech_lang("qu-EC"), "qu");
        assert_eq!(speech_lang("es"), "es");
        assert_eq!(speech_lang("es-EC"), "es-EC");
    }

    #[tokio::test]
    async fn text_to_speech_returns_audio_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/text-to-speech"))
            .and(body_json(serde_json::json!({"text": "alli puncha", "lang": "qu"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "audio_url": "/static/audio/abc.mp3", "used_lang": "es"
            })))
            .mount(&server)
            .await;

        let audio = client_for(&server)
            .text_to_speech("alli puncha", "qu-EC")
            .await
            .unwrap();
        assert!(audio.is_available());
        assert_eq!(audio.used_lang.as_deref(), Some("es"));
    }

    #[tokio::test]
    async fn text_to_speech_skips_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let audio = client_for(&server).text_to_speech("  ", "es").await.unwrap();
        assert!(!audio.is_available());
    }

    #[tokio::test]
    async fn download_audio_resolves_relative_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/static/audio/abc.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x49, 0x44, 0x33]))
            .mount(&server)
            .await;

        let bytes = client_for(&server)
            .download_audio("/static/audio/abc.mp3")
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), &[0x49, 0x44, 0x33]);
    }

    #[tokio::test]
    async fn speech_to_text_uploads_file_and_lang() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech-to-text"))
            .and(body_string_contains("name=\"file\"; filename=\"saludo.wav\""))
            .and(body_string_contains("name=\"lang\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "hola"})))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .speech_to_text("saludo.wav", b"RIFF....".to_vec(), Language::Es)
            .await
            .unwrap();
        assert_eq!(result.text, "hola");
    }

    #[tokio::test]
    async fn transcribe_failure_carries_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transcribe"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "Error en reconocimiento de voz"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .transcribe(vec![1, 2, 3], Language::Qu)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                body: "Error en reconocimiento de voz".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_audio_rejected() {
        let server = MockServer::start().await;
        let err = client_for(&server)
            .transcribe(Vec::new(), Language::Es)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn uploads_and_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/uploads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uploads": [{"filename": "a1.wav", "original_name": "saludo.wav",
                             "uploaded_at": "2024-05-01T10:00:00Z", "size": 2048, "text": "hola"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "stats": {"total_files": 1, "total_words": 12, "total_space": 2048}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let uploads = client.uploads().await.unwrap();
        assert_eq!(uploads[0].display_name(), "saludo.wav");
        let stats = client.stats().await.unwrap().unwrap();
        assert_eq!(stats.total_words, 12);
    }

    #[tokio::test]
    async fn unsuccessful_stats_are_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": false})))
            .mount(&server)
            .await;

        assert!(client_for(&server).stats().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_upload_sends_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/upload/a1.wav"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).delete_upload("a1.wav").await.unwrap();
    }

    #[tokio::test]
    async fn delete_upload_rejects_paths() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for name in ["../secret", "..", ".", "  ", "a\\b.wav"] {
            let err = client.delete_upload(name).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidRequest(_)), "{name:?}");
        }
    }

    #[tokio::test]
    async fn delete_upload_encodes_file_name() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/upload/voz%20%231%3F.wav"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).delete_upload("voz #1?.wav").await.unwrap();
    }
}
