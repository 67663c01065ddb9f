//! Video reports backed by `/ReporteVideo`.

use super::models::{Report, VideoId};
use crate::{
    auth::UserId,
    net::{
        client::ApiClient,
        errors::ApiResult,
        request::{ApiRequest, AuthMode},
    },
    resource::StoreStatus,
};
use log::warn;
use serde::Deserialize;

/// Message shown once a report has been accepted
pub const REPORT_SENT: &str = "Report sent. Thank you for helping us improve the platform.";

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    #[serde(default)]
    exists: bool,
}

/// Reports of inappropriate videos
#[derive(Debug, Clone)]
pub struct ReportStore {
    client: ApiClient,
    status: StoreStatus,
    reports: Vec<Report>,
}

impl ReportStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            reports: Vec::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Submit a report; sets the success message when accepted
    pub async fn create(&mut self, report: &Report) -> ApiResult<()> {
        let request = ApiRequest::post("/ReporteVideo")
            .json(report)?
            .auth(AuthMode::Optional);
        self.status.mutate(self.client.send(request)).await?;
        self.status.set_success(REPORT_SENT);
        Ok(())
    }

    /// Every report, for moderation
    pub async fn fetch_all(&mut self) -> Vec<Report> {
        self.load(ApiRequest::get("/ReporteVideo").auth(AuthMode::Optional))
            .await
    }

    pub async fn fetch_by_video(&mut self, video: VideoId) -> Vec<Report> {
        self.load(ApiRequest::get(format!("/ReporteVideo/video/{video}")))
            .await
    }

    /// Whether `user` already reported `video`; `false` on any failure
    pub async fn exists(&self, user: UserId, video: VideoId) -> bool {
        if user <= 0 || video <= 0 {
            return false;
        }
        let request = ApiRequest::get("/ReporteVideo/check")
            .query("idUsuario", user)
            .query("idVideo", video);
        match self.client.json::<ExistsResponse>(request).await {
            Ok(response) => response.exists,
            Err(err) => {
                warn!("Could not check report for video {video}: {err}");
                false
            }
        }
    }

    async fn load(&mut self, request: ApiRequest) -> Vec<Report> {
        match self.status.read(self.client.json::<Vec<Report>>(request)).await {
            Some(reports) => {
                self.reports = reports.clone();
                reports
            }
            None => Vec::new(),
        }
    }
}
