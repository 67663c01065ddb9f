//! Subject store backed by `/Asignatura`.

use super::models::{CourseId, NewSubject, Subject, SubjectId};
use crate::{
    net::{
        client::ApiClient,
        errors::ApiResult,
        request::{ApiRequest, AuthMode},
    },
    resource::{ResourceCache, StoreStatus},
};

/// Subjects loaded from the backend
#[derive(Debug, Clone)]
pub struct SubjectStore {
    client: ApiClient,
    status: StoreStatus,
    subjects: ResourceCache<Subject>,
}

impl SubjectStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            subjects: ResourceCache::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn subjects(&self) -> &[Subject] {
        self.subjects.items()
    }

    pub async fn fetch_all(&mut self) -> Vec<Subject> {
        self.load(ApiRequest::get("/Asignatura")).await
    }

    pub async fn fetch_by_course(&mut self, course: CourseId) -> Vec<Subject> {
        self.load(ApiRequest::get(format!("/Asignatura/curso/{course}")))
            .await
    }

    pub async fn fetch_by_id(&mut self, id: SubjectId) -> Option<Subject> {
        let request = ApiRequest::get(format!("/Asignatura/{id}"));
        self.status.read(self.client.json(request)).await
    }

    pub async fn create(&mut self, subject: &NewSubject) -> ApiResult<Subject> {
        let request = ApiRequest::post("/Asignatura")
            .json(subject)?
            .auth(AuthMode::Required);
        let created: Subject = self.status.mutate(self.client.json(request)).await?;

        self.subjects.upsert(created.clone());
        self.status.set_success("Subject created");
        Ok(created)
    }

    pub async fn update(&mut self, subject: &Subject) -> ApiResult<()> {
        let request = ApiRequest::put(format!("/Asignatura/{}", subject.id))
            .json(subject)?
            .auth(AuthMode::Required);
        self.status.mutate(self.client.send(request)).await?;

        self.subjects.upsert(subject.clone());
        self.status.set_success("Subject updated");
        Ok(())
    }

    pub async fn delete(&mut self, id: SubjectId) -> ApiResult<()> {
        let request = ApiRequest::delete(format!("/Asignatura/{id}")).auth(AuthMode::Required);
        self.status.mutate(self.client.send(request)).await?;

        self.subjects.remove(id);
        self.status.set_success("Subject deleted");
        Ok(())
    }

    /// Loaded subjects whose name contains `query`, ignoring case
    pub fn filter(&self, query: &str) -> Vec<&Subject> {
        let query = query.trim().to_lowercase();
        self.subjects
            .iter()
            .filter(|s| query.is_empty() || s.name.to_lowercase().contains(&query))
            .collect()
    }

    async fn load(&mut self, request: ApiRequest) -> Vec<Subject> {
        match self.status.read(self.client.json::<Vec<Subject>>(request)).await {
            Some(subjects) => {
                self.subjects.replace_all(subjects.clone());
                subjects
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::Session, config::ClientConfig};

    #[test]
    fn test_filter_is_case_insensitive() {
        let client = ApiClient::new(&ClientConfig::development(), Session::in_memory()).unwrap();
        let mut store = SubjectStore::new(client);
        store.subjects.replace_all(vec![
            Subject {
                id: 1,
                name: "Linear Algebra".into(),
                description: None,
                course_id: 1,
            },
            Subject {
                id: 2,
                name: "Algorithms".into(),
                description: None,
                course_id: 1,
            },
        ]);

        let names: Vec<_> = store.filter("ALG").iter().map(|s| s.id).collect();
        assert_eq!(names, vec![1, 2]);
        assert_eq!(store.filter("linear").len(), 1);
        assert_eq!(store.filter("  ").len(), 2);
        assert!(store.filter("biology").is_empty());
    }
}
