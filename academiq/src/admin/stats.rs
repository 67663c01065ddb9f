//! Per-user activity statistics.
//!
//! `/Estadisticas/usuario/{id}` answers with every counter at once. When it
//! is unavailable the counters are rebuilt from the user's courses, videos
//! and quizzes. A user whose counters cannot be obtained gets no statistics
//! at all rather than zeros.

use super::models::UserStats;
use crate::{
    auth::UserId,
    net::{client::ApiClient, errors::ApiResult, request::ApiRequest},
    resource::StoreStatus,
};
use futures_util::future::join_all;
use log::{debug, warn};
use std::collections::HashMap;

/// Users queried concurrently by [`StatsStore::fetch_many`]
pub const BATCH_SIZE: usize = 5;

#[derive(Debug, Clone)]
pub struct StatsStore {
    client: ApiClient,
    status: StoreStatus,
    stats: HashMap<UserId, UserStats>,
}

impl StatsStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            stats: HashMap::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    /// Cached statistics of `user`
    pub fn get(&self, user: UserId) -> Option<&UserStats> {
        self.stats.get(&user)
    }

    pub fn all(&self) -> Vec<&UserStats> {
        self.stats.values().collect()
    }

    pub fn clear_cache(&mut self) {
        self.stats.clear();
    }

    /// Statistics of one user
    ///
    /// # Returns
    ///
    /// * `Option<UserStats>` - `None` with the error message set when neither
    ///   the consolidated endpoint nor the per-resource counts answered
    pub async fn fetch(&mut self, user: UserId) -> Option<UserStats> {
        let stats = self.status.read(stats_for(&self.client, user)).await?;
        self.stats.insert(user, stats.clone());
        Some(stats)
    }

    /// Statistics of many users, [`BATCH_SIZE`] at a time.
    ///
    /// Users whose statistics fail are left out of the result.
    pub async fn fetch_many(&mut self, users: &[UserId]) -> HashMap<UserId, UserStats> {
        let _loading = self.status.begin();
        let mut found = HashMap::with_capacity(users.len());

        for batch in users.chunks(BATCH_SIZE) {
            let client = &self.client;
            let results = join_all(
                batch
                    .iter()
                    .map(|&user| async move { (user, stats_for(client, user).await) }),
            )
            .await;

            for (user, result) in results {
                match result {
                    Ok(stats) => {
                        found.insert(user, stats);
                    }
                    Err(err) => self.status.record(&err),
                }
            }
        }

        self.stats.extend(found.clone());
        found
    }
}

async fn stats_for(client: &ApiClient, user: UserId) -> ApiResult<UserStats> {
    let request = ApiRequest::get(format!("/Estadisticas/usuario/{user}"));
    match client.json::<UserStats>(request).await {
        Ok(stats) => Ok(UserStats {
            user_id: user,
            ..stats
        }),
        Err(err) => {
            debug!("Consolidated statistics for user {user} unavailable: {err}");
            count_resources(client, user).await
        }
    }
}

async fn count_resources(client: &ApiClient, user: UserId) -> ApiResult<UserStats> {
    let (courses, videos, quizzes) = tokio::try_join!(
        count(client, format!("/Curso/usuario/{user}")),
        count(client, format!("/Video/usuario/{user}")),
        count(client, format!("/Quiz/usuario/{user}")),
    )
    .inspect_err(|err| warn!("Statistics for user {user} failed: {err}"))?;

    Ok(UserStats {
        user_id: user,
        courses,
        videos,
        quizzes,
        last_activity: None,
    })
}

async fn count(client: &ApiClient, path: String) -> ApiResult<u64> {
    let items: Vec<serde_json::Value> = client.json(ApiRequest::get(path)).await?;
    Ok(items.len() as u64)
}
