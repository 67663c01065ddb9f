//! Saving quiz attempts to `/resultadoquiz`.

use super::models::QuizResult;
use crate::{
    net::{
        client::ApiClient,
        errors::ApiResult,
        request::{ApiRequest, AuthMode},
    },
    resource::StoreStatus,
};

#[derive(Debug, Clone)]
pub struct ResultStore {
    client: ApiClient,
    status: StoreStatus,
    current: Option<QuizResult>,
}

impl ResultStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            current: None,
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    /// Last result saved in this store
    pub fn current(&self) -> Option<&QuizResult> {
        self.current.as_ref()
    }

    pub async fn save(&mut self, result: &QuizResult) -> ApiResult<QuizResult> {
        let request = ApiRequest::post("/resultadoquiz")
            .json(result)?
            .auth(AuthMode::Optional)
            .alternate_path("/ResultadoQuiz");
        let saved: QuizResult = self.status.mutate(self.client.json(request)).await?;

        self.current = Some(saved.clone());
        Ok(saved)
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.status.clear();
    }
}
