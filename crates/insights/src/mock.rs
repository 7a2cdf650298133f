//! Mock log-search clients for testing.
//!
//! [`MockLogsClient`] replays a scripted sequence of poll responses;
//! [`FailingLogsClient`] errors on every call.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{InsightsError, LogsClient, PollOutput, QueryStatus, ResultField};

/// Arguments captured from a `start_query` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCall {
    pub log_group: String,
    pub start_time: i64,
    pub end_time: i64,
    pub query: String,
}

/// A mock client that replays a scripted sequence of poll responses.
///
/// Each `get_query_results` call consumes the next scripted response; once
/// only one remains it is repeated forever, so a one-entry script models a
/// query stuck in that state.
pub struct MockLogsClient {
    query_id: String,
    polls: Mutex<VecDeque<PollOutput>>,
    start_calls: AtomicU32,
    poll_calls: AtomicU32,
    last_start: Mutex<Option<StartCall>>,
}

impl MockLogsClient {
    pub fn new(polls: Vec<PollOutput>) -> Self {
        Self {
            query_id: "mock-query-1".to_string(),
            polls: Mutex::new(polls.into()),
            start_calls: AtomicU32::new(0),
            poll_calls: AtomicU32::new(0),
            last_start: Mutex::new(None),
        }
    }

    /// A client whose first poll reports `Complete` with the given rows.
    pub fn completed(rows: Vec<Vec<ResultField>>) -> Self {
        Self::new(vec![PollOutput {
            status: QueryStatus::Complete,
            rows,
        }])
    }

    /// A client whose query never leaves the given state.
    pub fn stuck(status: QueryStatus) -> Self {
        Self::new(vec![PollOutput {
            status,
            rows: vec![],
        }])
    }

    pub fn start_calls(&self) -> u32 {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> u32 {
        self.poll_calls.load(Ordering::SeqCst)
    }

    /// The arguments of the most recent `start_query` call.
    pub fn last_start(&self) -> Option<StartCall> {
        self.last_start.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogsClient for MockLogsClient {
    async fn start_query(
        &self,
        log_group: &str,
        start_time: i64,
        end_time: i64,
        query: &str,
    ) -> Result<String, InsightsError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_start.lock().unwrap() = Some(StartCall {
            log_group: log_group.to_string(),
            start_time,
            end_time,
            query: query.to_string(),
        });
        Ok(self.query_id.clone())
    }

    async fn get_query_results(&self, _query_id: &str) -> Result<PollOutput, InsightsError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let mut polls = self.polls.lock().unwrap();
        match polls.len() {
            0 => Err(InsightsError::AwsSdk("mock script is empty".to_string())),
            1 => Ok(polls.front().unwrap().clone()),
            _ => Ok(polls.pop_front().unwrap()),
        }
    }
}

/// A client that fails every operation, for error-path tests.
pub struct FailingLogsClient;

#[async_trait]
impl LogsClient for FailingLogsClient {
    async fn start_query(
        &self,
        log_group: &str,
        _start_time: i64,
        _end_time: i64,
        _query: &str,
    ) -> Result<String, InsightsError> {
        Err(InsightsError::Submission {
            log_group: log_group.to_string(),
            reason: "mock submission failure".to_string(),
        })
    }

    async fn get_query_results(&self, _query_id: &str) -> Result<PollOutput, InsightsError> {
        Err(InsightsError::AwsSdk("mock poll failure".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_polls_advance_then_repeat() {
        let client = MockLogsClient::new(vec![
            PollOutput {
                status: QueryStatus::Running,
                rows: vec![],
            },
            PollOutput {
                status: QueryStatus::Complete,
                rows: vec![],
            },
        ]);

        let first = client.get_query_results("q").await.unwrap();
        assert_eq!(first.status, QueryStatus::Running);

        // Last entry repeats.
        for _ in 0..3 {
            let poll = client.get_query_results("q").await.unwrap();
            assert_eq!(poll.status, QueryStatus::Complete);
        }
        assert_eq!(client.poll_calls(), 4);
    }

    #[tokio::test]
    async fn records_start_arguments() {
        let client = MockLogsClient::stuck(QueryStatus::Running);
        let id = client
            .start_query("/aws/lambda/fn", 100, 200, "fields x")
            .await
            .unwrap();
        assert_eq!(id, "mock-query-1");
        assert_eq!(
            client.last_start(),
            Some(StartCall {
                log_group: "/aws/lambda/fn".into(),
                start_time: 100,
                end_time: 200,
                query: "fields x".into(),
            })
        );
        assert_eq!(client.start_calls(), 1);
    }

    #[tokio::test]
    async fn failing_client_fails_both_operations() {
        let client = FailingLogsClient;
        assert!(matches!(
            client.start_query("/aws/lambda/fn", 0, 1, "q").await,
            Err(InsightsError::Submission { .. })
        ));
        assert!(matches!(
            client.get_query_results("q").await,
            Err(InsightsError::AwsSdk(_))
        ));
    }
}
