//! Question store.
//!
//! The backend serves questions under `/pregunta`; deployments with
//! case-sensitive routing expose `/Pregunta` instead, so every request
//! carries the capitalised path as a fallback.

use super::models::{NewQuestion, Question, QuestionId, QuizId};
use crate::{
    net::{
        client::ApiClient,
        errors::{ApiError, ApiResult},
        request::{ApiRequest, AuthMode},
    },
    resource::{ResourceCache, StoreStatus},
};

#[derive(Debug, Clone)]
pub struct QuestionStore {
    client: ApiClient,
    status: StoreStatus,
    questions: ResourceCache<Question>,
}

impl QuestionStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            questions: ResourceCache::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    /// Loaded questions, in quiz order
    pub fn questions(&self) -> &[Question] {
        self.questions.items()
    }

    pub async fn fetch_by_quiz(&mut self, quiz: QuizId) -> Vec<Question> {
        let request = ApiRequest::get(format!("/pregunta/quiz/{quiz}"))
            .alternate_path(format!("/Pregunta/quiz/{quiz}"));
        match self.status.read(self.client.json::<Vec<Question>>(request)).await {
            Some(questions) => {
                self.questions.replace_all(questions);
                self.sort();
                self.questions.items().to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Create a question after validating it locally
    ///
    /// # Errors
    ///
    /// * `ApiError::InvalidRequest` - Blank description, quiz ID or order not positive
    pub async fn create(&mut self, question: &NewQuestion) -> ApiResult<Question> {
        let client = &self.client;
        let created = self
            .status
            .mutate(async {
                let body = question
                    .validated()
                    .map_err(|reason| ApiError::InvalidRequest(reason.to_string()))?;
                let request = ApiRequest::post("/pregunta")
                    .json(&body)?
                    .timeout(client.bulk_timeout())
                    .auth(AuthMode::Optional)
                    .alternate_path("/Pregunta");
                client.json::<Question>(request).await
            })
            .await?;

        self.questions.upsert(created.clone());
        self.sort();
        Ok(created)
    }

    pub async fn update(&mut self, id: QuestionId, question: &NewQuestion) -> ApiResult<Question> {
        let request = ApiRequest::put(format!("/pregunta/{id}"))
            .json(question)?
            .auth(AuthMode::Optional)
            .alternate_path(format!("/Pregunta/{id}"));
        let updated: Question = self.status.mutate(self.client.json(request)).await?;

        self.questions.upsert(updated.clone());
        self.sort();
        Ok(updated)
    }

    pub async fn delete(&mut self, id: QuestionId) -> ApiResult<()> {
        let request = ApiRequest::delete(format!("/pregunta/{id}"))
            .auth(AuthMode::Optional)
            .alternate_path(format!("/Pregunta/{id}"));
        self.status.mutate(self.client.send(request)).await?;

        self.questions.remove(id);
        Ok(())
    }

    fn sort(&mut self) {
        self.questions.sort_by(|a, b| a.order.cmp(&b.order));
    }
}
