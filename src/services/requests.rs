//! Checkout request lifecycle service

use crate::{
    error::{AppError, AppResult},
    models::{
        request::{CheckoutRequest, CreateRequest, RequestDetails, ReturnReport},
        RequestStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_details(&self, id: i32) -> AppResult<RequestDetails> {
        self.repository.requests.get_details(id).await
    }

    pub async fn list(&self, status: Option<RequestStatus>) -> AppResult<Vec<CheckoutRequest>> {
        self.repository.requests.list(status).await
    }

    pub async fn list_for_user(&self, requester_id: i32) -> AppResult<Vec<CheckoutRequest>> {
        self.repository.requests.list_for_user(requester_id).await
    }

    /// File a new request
    pub async fn create(&self, requester_id: i32, data: &CreateRequest) -> AppResult<RequestDetails> {
        // Verify requester exists before touching the request tables
        self.repository.users.get_by_id(requester_id).await?;
        let details = self.repository.requests.create(requester_id, data).await?;
        tracing::info!(
            request_id = details.request.id,
            requester_id,
            lines = details.lines.len(),
            "checkout request filed"
        );
        Ok(details)
    }

    /// Approve a pending request; all lines are granted or none are
    pub async fn approve(&self, id: i32) -> AppResult<RequestDetails> {
        let details = self.repository.requests.approve(id).await?;
        tracing::info!(request_id = id, "checkout request approved");
        Ok(details)
    }

    pub async fn reject(&self, id: i32) -> AppResult<CheckoutRequest> {
        self.repository.requests.reject(id).await
    }

    pub async fn mark_checked_out(&self, id: i32) -> AppResult<CheckoutRequest> {
        self.repository.requests.mark_checked_out(id).await
    }

    /// Requester announces the gear is coming back
    pub async fn request_return(&self, id: i32, requester_id: i32) -> AppResult<CheckoutRequest> {
        let request = self.repository.requests.get_by_id(id).await?;
        if request.requester_id != requester_id {
            return Err(AppError::Authorization(
                "Only the requester can start a return".to_string(),
            ));
        }
        self.repository.requests.request_return(id).await
    }

    /// Steward confirms the gear is back; closes the request
    pub async fn confirm_return(&self, id: i32) -> AppResult<ReturnReport> {
        let report = self.repository.requests.confirm_return(id).await?;
        tracing::info!(
            request_id = id,
            over_returns = report.over_returns.len(),
            "return confirmed"
        );
        Ok(report)
    }
}
