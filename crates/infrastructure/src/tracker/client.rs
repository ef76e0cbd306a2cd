//! `TicketTrackerPort` over a REST issue tracker.
//!
//! HTTP status classification follows a 429/5xx-is-transient,
//! 4xx-is-terminal split for outbound retryable HTTP calls. Backoff itself
//! lives in `dnsbl-reconciler-application::use_cases::retry` — this adapter
//! only needs to classify each response into a `DomainError` variant that
//! the retry wrapper knows how to act on.

use async_trait::async_trait;
use dnsbl_reconciler_application::{NewIssue, TicketTrackerPort};
use dnsbl_reconciler_domain::{DomainError, IssueStatus, Ticket};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

pub struct RestTicketTrackerClient {
    http: Client,
    base_url: String,
    user: String,
    token: String,
    project: String,
    excluded_statuses: Vec<String>,
}

impl RestTicketTrackerClient {
    pub fn new(base_url: String, user: String, token: String, project: String, excluded_statuses: Vec<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client builds with static configuration");
        Self {
            http,
            base_url,
            user,
            token,
            project,
            excluded_statuses,
        }
    }

    fn classify_status(status: StatusCode, context: &str) -> DomainError {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            DomainError::TrackerAuth(format!("{context}: {status}"))
        } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            DomainError::TrackerTransient(format!("{context}: {status}"))
        } else {
            DomainError::TrackerRejected(format!("{context}: non-retryable response {status}"))
        }
    }
}

#[derive(Deserialize)]
struct SearchResponseBody {
    issues: Vec<IssueBody>,
}

#[derive(Deserialize)]
struct IssueBody {
    key: String,
    summary: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
impl TicketTrackerPort for RestTicketTrackerClient {
    async fn search_by_summary_substring(&self, substring: &str) -> Result<Vec<Ticket>, DomainError> {
        let response = self
            .http
            .get(format!("{}/issues/search", self.base_url))
            .basic_auth(&self.user, Some(&self.token))
            .query(&[
                ("project", self.project.as_str()),
                ("summary_contains", substring),
            ])
            .send()
            .await
            .map_err(|e| DomainError::TrackerTransient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::classify_status(response.status(), "search"));
        }

        let body: SearchResponseBody = response
            .json()
            .await
            .map_err(|e| DomainError::TrackerTransient(format!("malformed search response: {e}")))?;

        Ok(body
            .issues
            .into_iter()
            .filter(|issue| !IssueStatus { name: issue.status.clone() }.is_excluded(&self.excluded_statuses))
            .map(|issue| Ticket {
                key: issue.key,
                summary: issue.summary,
                status: IssueStatus { name: issue.status },
                created_at: issue.created_at,
            })
            .collect())
    }

    async fn create_issue(&self, issue: NewIssue) -> Result<Ticket, DomainError> {
        #[derive(serde::Serialize)]
        struct CreateIssueRequest<'a> {
            project: &'a str,
            issue_type: &'a str,
            summary: &'a str,
            description: &'a str,
            labels: &'a [String],
        }

        let response = self
            .http
            .post(format!("{}/issues", self.base_url))
            .basic_auth(&self.user, Some(&self.token))
            .json(&CreateIssueRequest {
                project: &self.project,
                issue_type: &issue.issue_type,
                summary: &issue.summary,
                description: &issue.description,
                labels: &issue.labels,
            })
            .send()
            .await
            .map_err(|e| DomainError::TrackerTransient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::classify_status(response.status(), "create_issue"));
        }

        let body: IssueBody = response
            .json()
            .await
            .map_err(|e| DomainError::TrackerTransient(format!("malformed create response: {e}")))?;

        Ok(Ticket {
            key: body.key,
            summary: body.summary,
            status: IssueStatus { name: body.status },
            created_at: body.created_at,
        })
    }

    async fn add_comment(&self, issue_key: &str, comment: &str) -> Result<(), DomainError> {
        #[derive(serde::Serialize)]
        struct AddCommentRequest<'a> {
            body: &'a str,
        }

        let response = self
            .http
            .post(format!("{}/issues/{}/comments", self.base_url, issue_key))
            .basic_auth(&self.user, Some(&self.token))
            .json(&AddCommentRequest { body: comment })
            .send()
            .await
            .map_err(|e| DomainError::TrackerTransient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::classify_status(response.status(), "add_comment"));
        }
        Ok(())
    }
}
