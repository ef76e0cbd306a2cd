use async_trait::async_trait;
use dnsbl_reconciler_domain::{DomainError, Ticket};

/// The fields needed to open a new issue: type, summary, description, and
/// optional labels. `project` is baked into the adapter at construction time
/// (configured once, not passed per call) since it never varies across calls.
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub issue_type: String,
    pub summary: String,
    pub description: String,
    pub labels: Vec<String>,
}

/// Issue-tracker contract: search-by-expression, create-issue, add-comment.
/// `project equals <configured>` and `status not in <configured>` are fixed
/// at adapter construction; only the summary-substring varies per call,
/// since that's the only axis the core ever needs to vary.
#[async_trait]
pub trait TicketTrackerPort: Send + Sync {
    /// Returns up to N most-recent matches for `project = configured AND
    /// status NOT IN configured-excluded AND summary CONTAINS substring`.
    async fn search_by_summary_substring(&self, substring: &str) -> Result<Vec<Ticket>, DomainError>;

    async fn create_issue(&self, issue: NewIssue) -> Result<Ticket, DomainError>;

    async fn add_comment(&self, issue_key: &str, comment: &str) -> Result<(), DomainError>;
}
