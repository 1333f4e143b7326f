use serde::Deserialize;

use rimay_core::errors::ApiError;
use rimay_core::models::{Flashcard, QuizQuestion, StudyDirection};

use crate::client::ApiClient;

#[derive(Deserialize)]
struct FlashcardsEnvelope {
    #[serde(default)]
    flashcards: Vec<Flashcard>,
}

#[derive(Deserialize)]
struct QuizEnvelope {
    #[serde(default)]
    questions: Vec<QuizQuestion>,
}

impl ApiClient {
    /// Random study cards drawn from the dictionary.
    pub async fn flashcards(
        &self,
        dir: StudyDirection,
        limit: usize,
    ) -> Result<Vec<Flashcard>, ApiError> {
        let req = self
            .get("/api/study/flashcards")?
            .query(&[("dir", dir.as_str().to_string()), ("limit", limit.to_string())]);
        let envelope: FlashcardsEnvelope = self.send_json(req).await?;
        Ok(envelope.flashcards)
    }

    /// Multiple-choice questions; the backend enforces at least two options.
    pub async fn quiz(
        &self,
        dir: StudyDirection,
        limit: usize,
        options: usize,
    ) -> Result<Vec<QuizQuestion>, ApiError> {
        let req = self.get("/api/study/quiz")?.query(&[
            ("dir", dir.as_str().to_string()),
            ("limit", limit.to_string()),
            ("options", options.max(2).to_string()),
        ]);
        let envelope: QuizEnvelope = self.send_json(req).await?;
        Ok(envelope.questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client_for;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn flashcards_pass_direction_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/study/flashcards"))
            .and(query_param("dir", "qu2es"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "flashcards": [{"front": "inti", "back": "sol", "dir": "qu2es"}]
            })))
            .mount(&server)
            .await;

        let cards = client_for(&server)
            .flashcards(StudyDirection::QuToEs, 3)
            .await
            .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "inti");
        assert_eq!(cards[0].dir, StudyDirection::QuToEs);
    }

    #[tokio::test]
    async fn quiz_clamps_option_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/study/quiz"))
            .and(query_param("options", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "questions": [{
                    "prompt": "agua",
                    "options": ["yaku", "wasi"],
                    "answer": "yaku",
                    "dir": "es2qu"
                }]
            })))
            .mount(&server)
            .await;

        let questions = client_for(&server)
            .quiz(StudyDirection::EsToQu, 10, 1)
            .await
            .unwrap();
        assert_eq!(questions[0].answer, "yaku");
        assert!(questions[0].options.contains(&questions[0].answer));
    }

    #[tokio::test]
    async fn empty_dictionary_yields_no_cards() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/study/flashcards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"flashcards": []})))
            .mount(&server)
            .await;

        let cards = client_for(&server)
            .flashcards(StudyDirection::default(), 20)
            .await
            .unwrap();
        assert!(cards.is_empty());
    }
}
