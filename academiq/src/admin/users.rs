//! User administration backed by `/Usuario`.

use crate::{
    auth::{Registration, Role, User, UserId},
    net::{
        client::{ApiClient, decode},
        errors::ApiResult,
        request::{ApiRequest, AuthMode},
    },
    resource::{ResourceCache, StoreStatus},
};
use log::info;

#[derive(Debug, Clone)]
pub struct UserAdminStore {
    client: ApiClient,
    status: StoreStatus,
    users: ResourceCache<User>,
}

impl UserAdminStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            users: ResourceCache::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn users(&self) -> &[User] {
        self.users.items()
    }

    pub async fn fetch_all(&mut self) -> Vec<User> {
        let request = ApiRequest::get("/Usuario").auth(AuthMode::Optional);
        match self.status.read(self.client.json::<Vec<User>>(request)).await {
            Some(users) => {
                self.users.replace_all(users.clone());
                users
            }
            None => Vec::new(),
        }
    }

    pub async fn fetch_by_id(&mut self, id: UserId) -> Option<User> {
        let request = ApiRequest::get(format!("/Usuario/{id}")).auth(AuthMode::Optional);
        self.status.read(self.client.json(request)).await
    }

    pub async fn create(&mut self, user: &Registration) -> ApiResult<User> {
        let request = ApiRequest::post("/Usuario")
            .json(user)?
            .auth(AuthMode::Optional);
        let created: User = self.status.mutate(self.client.json(request)).await?;

        self.users.upsert(created.clone());
        self.status.set_success("User created");
        Ok(created)
    }

    /// Update a user.
    ///
    /// The backend may answer with an empty body, in which case the sent
    /// user is taken as the result. Updating the logged-in user also
    /// refreshes the session copy.
    pub async fn update(&mut self, user: &User) -> ApiResult<User> {
        let path = format!("/Usuario/{}", user.id);
        let request = ApiRequest::put(path.as_str())
            .json(user)?
            .auth(AuthMode::Optional);
        let client = &self.client;
        let updated = self
            .status
            .mutate(async {
                let body = client.execute(request).await?;
                if body.iter().all(u8::is_ascii_whitespace) {
                    Ok(user.clone())
                } else {
                    decode::<User>(&path, &body)
                }
            })
            .await?;

        let session = self.client.session();
        if session.user_id() == Some(updated.id) {
            session.update_user(updated.clone());
        }
        self.users.upsert(updated.clone());
        self.status.set_success("User updated");
        Ok(updated)
    }

    pub async fn delete(&mut self, id: UserId) -> ApiResult<()> {
        let request = ApiRequest::delete(format!("/Usuario/{id}")).auth(AuthMode::Optional);
        self.status.mutate(self.client.send(request)).await?;

        self.users.remove(id);
        self.status.set_success("User deleted");
        Ok(())
    }

    /// Grant the teacher role to `id`
    pub async fn accept_teacher(&mut self, id: UserId) -> ApiResult<()> {
        let request = ApiRequest::put(format!("/Usuario/{id}/aceptar-profesor"))
            .auth(AuthMode::Optional);
        self.status.mutate(self.client.send(request)).await?;

        info!("User {id} accepted as teacher");
        if let Some(user) = self.users.get(id) {
            let promoted = User {
                role: Role::Teacher,
                ..user.clone()
            };
            self.users.upsert(promoted);
        }
        self.status.set_success("User accepted as teacher");
        Ok(())
    }
}
