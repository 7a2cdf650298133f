//! End-to-end orchestration of one cold-start analysis query.
//!
//! Submits the fixed query over the function's log group, polls the job
//! under a bounded fixed-delay policy, and reshapes the result rows into
//! [`AnalysisResult`] records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::{InsightsError, LogsClient, QueryStatus};
use crate::convert::rows_to_records;
use crate::query::{log_group_for, parse_start_time, COLD_START_QUERY};
use crate::result::AnalysisResult;
use crate::retry::{Attempt, RetryOutcome, RetryPolicy};

/// Input for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Start of the analysis window: RFC3339, `"YYYY-MM-DD HH:MM:SS"`,
    /// date-only, or epoch digits.
    pub start_time: String,
    /// Lambda function whose log group is queried.
    pub function_name: String,
}

/// Runs one analytic query end to end against an injected [`LogsClient`].
///
/// Invocations are independent: each owns its query id and poll loop, so
/// concurrent runs for different functions share no mutable state.
pub struct QueryRunner<C> {
    client: C,
    policy: RetryPolicy,
}

impl<C: LogsClient> QueryRunner<C> {
    /// Runner with the default polling policy (200 polls, 3 s apart).
    pub fn new(client: C) -> Self {
        Self {
            client,
            policy: RetryPolicy::default(),
        }
    }

    /// Runner with an explicit polling policy.
    pub fn with_policy(client: C, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Run one analysis. The window spans from the request's start time to
    /// the wall clock at the moment of the call.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResult, InsightsError> {
        let start = parse_start_time(&request.start_time)
            .ok_or_else(|| InsightsError::InvalidStartTime(request.start_time.clone()))?;
        self.run_window(start, Utc::now(), &request.function_name)
            .await
    }

    /// Run one analysis over an explicit `[start, end]` window.
    pub async fn run_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        function_name: &str,
    ) -> Result<AnalysisResult, InsightsError> {
        let log_group = log_group_for(function_name);
        info!(
            function = %function_name,
            log_group = %log_group,
            start = start.timestamp(),
            end = end.timestamp(),
            "starting cold-start query"
        );

        let query_id = self
            .client
            .start_query(
                &log_group,
                start.timestamp(),
                end.timestamp(),
                COLD_START_QUERY,
            )
            .await?;
        debug!(query_id = %query_id, "query submitted");

        let client = &self.client;
        let query_id_ref = query_id.as_str();
        let outcome = self
            .policy
            .run(move |attempt| async move {
                let poll = client.get_query_results(query_id_ref).await?;
                debug!(query_id = %query_id_ref, attempt, status = %poll.status, "polled query");
                match poll.status {
                    QueryStatus::Complete => Ok(Attempt::Ready(poll.rows)),
                    status if status.is_terminal_failure() => Err(InsightsError::QueryFailed {
                        query_id: query_id_ref.to_string(),
                        status,
                    }),
                    status => Ok(Attempt::Pending(status)),
                }
            })
            .await?;

        let rows = match outcome {
            RetryOutcome::Completed(rows) => rows,
            RetryOutcome::Exhausted { attempts, last } => {
                warn!(
                    query_id = %query_id,
                    attempts,
                    last_status = %last,
                    "query never completed"
                );
                return Err(InsightsError::QueryTimeout {
                    query_id,
                    attempts,
                    last_status: last,
                });
            }
        };

        let records = rows_to_records(&rows)?;
        info!(
            function = %function_name,
            rows = records.len(),
            "cold-start query complete"
        );

        Ok(AnalysisResult {
            function_name: function_name.to_string(),
            result: records,
        })
    }
}
