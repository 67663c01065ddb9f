//! Quiz store backed by `/Quiz`.

use super::models::{NewQuiz, Quiz, QuizId};
use crate::{
    auth::UserId,
    net::{
        client::ApiClient,
        errors::ApiResult,
        request::{ApiRequest, AuthMode},
    },
    resource::{ResourceCache, StoreStatus},
};

#[derive(Debug, Clone)]
pub struct QuizStore {
    client: ApiClient,
    status: StoreStatus,
    quizzes: ResourceCache<Quiz>,
}

impl QuizStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            quizzes: ResourceCache::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn quizzes(&self) -> &[Quiz] {
        self.quizzes.items()
    }

    pub async fn fetch_all(&mut self) -> Vec<Quiz> {
        self.load(ApiRequest::get("/Quiz")).await
    }

    pub async fn fetch_by_id(&mut self, id: QuizId) -> Option<Quiz> {
        let request = ApiRequest::get(format!("/Quiz/{id}"));
        self.status.read(self.client.json(request)).await
    }

    pub async fn fetch_by_owner(&mut self, owner: UserId) -> Vec<Quiz> {
        self.load(ApiRequest::get(format!("/Quiz/usuario/{owner}")))
            .await
    }

    /// Create a quiz; the owner defaults to the session user
    pub async fn create(&mut self, quiz: &NewQuiz) -> ApiResult<Quiz> {
        let body = NewQuiz {
            owner_id: quiz.owner_id.or_else(|| self.client.session().user_id()),
            ..quiz.clone()
        };
        let request = ApiRequest::post("/Quiz")
            .json(&body)?
            .auth(AuthMode::Optional);
        let created: Quiz = self.status.mutate(self.client.json(request)).await?;

        self.quizzes.upsert(created.clone());
        self.status.set_success("Quiz created");
        Ok(created)
    }

    /// Update a quiz, replacing the cached copy with the backend's answer
    pub async fn update(&mut self, id: QuizId, quiz: &NewQuiz) -> ApiResult<Quiz> {
        let request = ApiRequest::put(format!("/Quiz/{id}"))
            .json(quiz)?
            .auth(AuthMode::Optional);
        let updated: Quiz = self.status.mutate(self.client.json(request)).await?;

        self.quizzes.upsert(updated.clone());
        self.status.set_success("Quiz updated");
        Ok(updated)
    }

    pub async fn delete(&mut self, id: QuizId) -> ApiResult<()> {
        let request = ApiRequest::delete(format!("/Quiz/{id}")).auth(AuthMode::Optional);
        self.status.mutate(self.client.send(request)).await?;

        self.quizzes.remove(id);
        self.status.set_success("Quiz deleted");
        Ok(())
    }

    async fn load(&mut self, request: ApiRequest) -> Vec<Quiz> {
        match self.status.read(self.client.json::<Vec<Quiz>>(request)).await {
            Some(quizzes) => {
                self.quizzes.replace_all(quizzes.clone());
                quizzes
            }
            None => Vec::new(),
        }
    }
}
