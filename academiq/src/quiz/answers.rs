//! Answer store backed by `/respuesta`.

use super::models::{Answer, NewAnswer, Question, QuestionId};
use crate::{
    net::{
        client::ApiClient,
        errors::ApiResult,
        request::{ApiRequest, AuthMode},
    },
    resource::StoreStatus,
};
use futures_util::future::join_all;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct AnswerStore {
    client: ApiClient,
    status: StoreStatus,
    by_question: HashMap<QuestionId, Vec<Answer>>,
}

impl AnswerStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            by_question: HashMap::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    /// Loaded answers of `question`, in order
    pub fn answers(&self, question: QuestionId) -> &[Answer] {
        self.by_question
            .get(&question)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub async fn fetch_by_question(&mut self, question: QuestionId) -> Vec<Answer> {
        match self.status.read(load(&self.client, question)).await {
            Some(answers) => {
                self.by_question.insert(question, answers.clone());
                answers
            }
            None => Vec::new(),
        }
    }

    /// Load the answers of every question concurrently.
    ///
    /// A question whose answers fail to load maps to an empty list; the last
    /// failure becomes the error message.
    pub async fn fetch_for_quiz(&mut self, questions: &[Question]) -> HashMap<QuestionId, Vec<Answer>> {
        let _loading = self.status.begin();
        let client = &self.client;
        let results = join_all(
            questions
                .iter()
                .map(|q| async move { (q.id, load(client, q.id).await) }),
        )
        .await;

        let mut answers = HashMap::with_capacity(results.len());
        for (question, result) in results {
            let loaded = result.unwrap_or_else(|err| {
                self.status.record(&err);
                Vec::new()
            });
            answers.insert(question, loaded);
        }
        self.by_question.extend(answers.clone());
        answers
    }

    pub async fn create(&mut self, answer: &NewAnswer) -> ApiResult<Answer> {
        let request = ApiRequest::post("/respuesta")
            .json(answer)?
            .auth(AuthMode::Optional)
            .alternate_path("/Respuesta");
        let created: Answer = self.status.mutate(self.client.json(request)).await?;

        let list = self.by_question.entry(created.question_id).or_default();
        list.push(created.clone());
        list.sort_by_key(|a| a.order);
        Ok(created)
    }
}

async fn load(client: &ApiClient, question: QuestionId) -> ApiResult<Vec<Answer>> {
    let request = ApiRequest::get(format!("/respuesta/pregunta/{question}"))
        .alternate_path(format!("/Respuesta/pregunta/{question}"));
    let mut answers: Vec<Answer> = client.json(request).await?;
    answers.sort_by_key(|a| a.order);
    Ok(answers)
}
