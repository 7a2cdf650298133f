//! Log-search service client.
//!
//! Defines the two-operation [`LogsClient`] contract the query runner
//! consumes (submit a query, poll its results) and the
//! [`CloudWatchLogsClient`] implementation backed by the AWS SDK.

use std::fmt;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs::types::QueryStatus as SdkQueryStatus;
use tracing::info;

use crate::config::InsightsConfig;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors that can occur while running a cold-start analysis.
#[derive(Debug, thiserror::Error)]
pub enum InsightsError {
    /// The query submission call failed. Never retried.
    #[error("failed to submit query over {log_group}: {reason}")]
    Submission { log_group: String, reason: String },

    /// The query job reached a non-success terminal state.
    #[error("query {query_id} ended in state {status}")]
    QueryFailed {
        query_id: String,
        status: QueryStatus,
    },

    /// The poll budget ran out while the job was still not complete.
    #[error("query {query_id} not complete after {attempts} polls (last status {last_status})")]
    QueryTimeout {
        query_id: String,
        attempts: u32,
        last_status: QueryStatus,
    },

    /// Malformed row data returned by the service.
    #[error("malformed result row: {0}")]
    Transform(String),

    /// The start time string matched no accepted format.
    #[error("invalid start time: {0:?}")]
    InvalidStartTime(String),

    /// An AWS SDK error outside of submission (stringified).
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Lifecycle states reported for an asynchronous log query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Scheduled,
    Running,
    Complete,
    Failed,
    Cancelled,
    Timeout,
    Unknown,
}

impl QueryStatus {
    /// Terminal states that can never progress to [`QueryStatus::Complete`].
    /// Polling past one of these retries a job that will not finish.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            QueryStatus::Failed | QueryStatus::Cancelled | QueryStatus::Timeout
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Scheduled => "Scheduled",
            QueryStatus::Running => "Running",
            QueryStatus::Complete => "Complete",
            QueryStatus::Failed => "Failed",
            QueryStatus::Cancelled => "Cancelled",
            QueryStatus::Timeout => "Timeout",
            QueryStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field/value pair of a result row, exactly as the service returns it.
/// Both halves are optional at the wire level; validation happens during
/// transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultField {
    pub field: Option<String>,
    pub value: Option<String>,
}

impl ResultField {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            value: Some(value.into()),
        }
    }
}

/// Snapshot of an in-flight query: current status plus whatever rows the
/// service has produced so far. Rows are only meaningful once the status
/// is [`QueryStatus::Complete`].
#[derive(Debug, Clone)]
pub struct PollOutput {
    pub status: QueryStatus,
    pub rows: Vec<Vec<ResultField>>,
}

// ---------------------------------------------------------------------------
// Client contract
// ---------------------------------------------------------------------------

/// The two operations consumed from the log-search service.
///
/// Injected into [`QueryRunner`](crate::runner::QueryRunner) so tests can
/// substitute a scripted implementation.
#[async_trait]
pub trait LogsClient: Send + Sync {
    /// Submit a query over `log_group` spanning `[start_time, end_time]`
    /// (epoch seconds), returning the job identifier.
    async fn start_query(
        &self,
        log_group: &str,
        start_time: i64,
        end_time: i64,
        query: &str,
    ) -> Result<String, InsightsError>;

    /// Fetch the current status and any result rows for a submitted query.
    async fn get_query_results(&self, query_id: &str) -> Result<PollOutput, InsightsError>;
}

#[async_trait]
impl<C: LogsClient + ?Sized> LogsClient for std::sync::Arc<C> {
    async fn start_query(
        &self,
        log_group: &str,
        start_time: i64,
        end_time: i64,
        query: &str,
    ) -> Result<String, InsightsError> {
        (**self)
            .start_query(log_group, start_time, end_time, query)
            .await
    }

    async fn get_query_results(&self, query_id: &str) -> Result<PollOutput, InsightsError> {
        (**self).get_query_results(query_id).await
    }
}

// ---------------------------------------------------------------------------
// AWS implementation
// ---------------------------------------------------------------------------

/// [`LogsClient`] backed by the AWS CloudWatch Logs SDK.
pub struct CloudWatchLogsClient {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchLogsClient {
    /// Create a client for the region in `config`, using the default AWS
    /// credential chain.
    pub async fn new(config: &InsightsConfig) -> Self {
        let region = aws_sdk_cloudwatchlogs::config::Region::new(config.region.clone());
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let client = aws_sdk_cloudwatchlogs::Client::new(&aws_cfg);

        info!(region = %config.region, "CloudWatchLogsClient initialised");

        Self { client }
    }
}

#[async_trait]
impl LogsClient for CloudWatchLogsClient {
    async fn start_query(
        &self,
        log_group: &str,
        start_time: i64,
        end_time: i64,
        query: &str,
    ) -> Result<String, InsightsError> {
        let resp = self
            .client
            .start_query()
            .log_group_names(log_group)
            .start_time(start_time)
            .end_time(end_time)
            .query_string(query)
            .send()
            .await
            .map_err(|e| InsightsError::Submission {
                log_group: log_group.to_string(),
                reason: e.to_string(),
            })?;

        resp.query_id()
            .map(|id| id.to_string())
            .ok_or_else(|| InsightsError::Submission {
                log_group: log_group.to_string(),
                reason: "no query id returned".to_string(),
            })
    }

    async fn get_query_results(&self, query_id: &str) -> Result<PollOutput, InsightsError> {
        let resp = self
            .client
            .get_query_results()
            .query_id(query_id)
            .send()
            .await
            .map_err(|e| InsightsError::AwsSdk(e.to_string()))?;

        let status = resp
            .status()
            .map(status_from_sdk)
            .unwrap_or(QueryStatus::Unknown);

        let rows = resp
            .results()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|f| ResultField {
                        field: f.field().map(str::to_string),
                        value: f.value().map(str::to_string),
                    })
                    .collect()
            })
            .collect();

        Ok(PollOutput { status, rows })
    }
}

fn status_from_sdk(status: &SdkQueryStatus) -> QueryStatus {
    match status {
        SdkQueryStatus::Scheduled => QueryStatus::Scheduled,
        SdkQueryStatus::Running => QueryStatus::Running,
        SdkQueryStatus::Complete => QueryStatus::Complete,
        SdkQueryStatus::Failed => QueryStatus::Failed,
        SdkQueryStatus::Cancelled => QueryStatus::Cancelled,
        SdkQueryStatus::Timeout => QueryStatus::Timeout,
        // "Unknown" is a real service value; future variants land here too.
        _ => QueryStatus::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Tests — status and error plumbing, no AWS calls
// ---------------------------------------------------------------------------
