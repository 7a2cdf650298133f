pub mod client;
pub mod config;
pub mod convert;
pub mod mock;
pub mod query;
pub mod result;
pub mod retry;
pub mod runner;

pub use client::{
    CloudWatchLogsClient, InsightsError, LogsClient, PollOutput, QueryStatus, ResultField,
};
pub use config::InsightsConfig;
pub use convert::rows_to_records;
pub use mock::{FailingLogsClient, MockLogsClient};
pub use query::{log_group_for, parse_start_time, COLD_START_QUERY};
pub use result::AnalysisResult;
pub use retry::{Attempt, RetryOutcome, RetryPolicy};
pub use runner::{AnalysisRequest, QueryRunner};
