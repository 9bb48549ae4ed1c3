use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use quiz_core::model::{AnswerRecord, QuizDetail, QuizResult};

use super::wire::{encode_user_answers, parse_quiz_detail, parse_quiz_result};
use super::{QuizDataProvider, QuizRequest};
use crate::error::ProviderError;

const DETAIL_PATH: &str = "quiz/get-quiz-with-details";
const SUBMIT_PATH: &str = "quiz/set-quiz-result";
const RESULT_PATH: &str = "quiz/get-quiz-result";
const HEADER_USER_UUID: &str = "user_uuid";
const HEADER_API_TOKEN: &str = "user_api_token";

/// Talks to the quiz HTTP API with form-encoded POSTs.
#[derive(Clone)]
pub struct HttpQuizProvider {
    client: Client,
    base_url: String,
}

impl HttpQuizProvider {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// # Errors
    ///
    /// Returns `ProviderError::Http` if the HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    async fn post_form(
        &self,
        path: &str,
        request: &QuizRequest,
        form: &[(&str, String)],
    ) -> Result<String, ProviderError> {
        let url = self.endpoint(path);
        log::debug!("POST {url} for quiz {}", request.quiz_id());

        let response = self
            .client
            .post(url)
            .header(HEADER_USER_UUID, request.user_uuid())
            .header(HEADER_API_TOKEN, request.api_token())
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl QuizDataProvider for HttpQuizProvider {
    async fn fetch_quiz(&self, request: &QuizRequest) -> Result<QuizDetail, ProviderError> {
        let form = [("quiz_id", request.quiz_id().to_string())];
        let body = self.post_form(DETAIL_PATH, request, &form).await?;
        let detail = parse_quiz_detail(request.quiz_id(), &body)?;
        log::info!(
            "fetched quiz {} with {} questions",
            detail.quiz_id,
            detail.questions.len()
        );
        Ok(detail)
    }

    async fn submit_result(
        &self,
        request: &QuizRequest,
        answers: &[AnswerRecord],
    ) -> Result<(), ProviderError> {
        let form = [
            ("quiz_id", request.quiz_id().to_string()),
            ("user_answers", encode_user_answers(answers)?),
        ];
        self.post_form(SUBMIT_PATH, request, &form).await?;
        Ok(())
    }

    async fn fetch_result(&self, request: &QuizRequest) -> Result<QuizResult, ProviderError> {
        let form = [("quiz_id", request.quiz_id().to_string())];
        let body = self.post_form(RESULT_PATH, request, &form).await?;
        parse_quiz_result(&body)
    }
}
