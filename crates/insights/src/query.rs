//! The fixed cold-start query and its input parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Log group prefix the Lambda runtime writes function logs under.
const LOG_GROUP_PREFIX: &str = "/aws/lambda/";

/// Logs Insights query computing cold-start latency statistics grouped by
/// function name and allocated memory size.
///
/// Matches the REPORT lines the Lambda runtime emits for cold invocations
/// ("Init Duration"), parses the init duration in milliseconds and the
/// memory size in MB, and aggregates count/min/quartiles/median/p95/max/
/// stddev server-side. The text is compatibility-relevant: the backend
/// resolves field names like `coldStarts` and `fstQuartile` from it.
pub const COLD_START_QUERY: &str = r#"fields @memorySize / 1000000 as memorySize
  | filter @message like /(?i)(Init Duration)/
  | parse @message /^REPORT.*Init Duration: (?<initDuration>.*) ms.*/
  | parse @log /^.*\/aws\/lambda\/(?<functionName>.*)/
  | stats count() as coldStarts,
          min(initDuration) as min,
          percentile(initDuration, 25) as fstQuartile,
          median(initDuration) as median,
          percentile(initDuration, 75) as trdQuartile,
          percentile(initDuration, 95) as p95,
          max(initDuration) as max,
          stddev(initDuration) as stddev
    by functionName, memorySize"#;

/// Derive the log group name for a Lambda function.
pub fn log_group_for(function_name: &str) -> String {
    format!("{}{}", LOG_GROUP_PREFIX, function_name)
}

/// Parse a user-supplied start time.
///
/// Tries multiple formats in order:
/// 1. RFC3339: `"2025-06-14T10:30:00Z"`
/// 2. Space-separated: `"2025-06-14 10:30:00"` (UTC assumed)
/// 3. Just date: `"2025-06-14"` (midnight UTC)
/// 4. Epoch digits: `"1750000000"` is seconds; 13 or more digits are
///    treated as milliseconds
///
/// Returns `None` if all formats fail.
pub fn parse_start_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(ndt.and_utc());
    }

    if let Ok(nd) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(nd.and_hms_opt(0, 0, 0)?.and_utc());
    }

    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        let n: i64 = value.parse().ok()?;
        return if value.len() >= 13 {
            DateTime::from_timestamp_millis(n)
        } else {
            DateTime::from_timestamp(n, 0)
        };
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_group_derivation() {
        assert_eq!(log_group_for("my-fn"), "/aws/lambda/my-fn");
        assert_eq!(
            log_group_for("service-prod-handler"),
            "/aws/lambda/service-prod-handler"
        );
    }

    #[test]
    fn query_shape() {
        assert!(COLD_START_QUERY.starts_with("fields @memorySize"));
        assert!(COLD_START_QUERY.contains("Init Duration"));
        assert!(COLD_START_QUERY.contains("count() as coldStarts"));
        assert!(COLD_START_QUERY.contains("percentile(initDuration, 95) as p95"));
        assert!(COLD_START_QUERY.contains("stddev(initDuration) as stddev"));
        assert!(COLD_START_QUERY.ends_with("by functionName, memorySize"));
    }

    #[test]
    fn parse_rfc3339() {
        let dt = parse_start_time("2025-06-14T10:30:00Z").expect("parse");
        assert_eq!(dt.timestamp(), 1_749_897_000);
    }

    #[test]
    fn parse_space_separated() {
        let dt = parse_start_time("2025-06-14 10:30:00").expect("parse");
        assert_eq!(dt.timestamp(), 1_749_897_000);
    }

    #[test]
    fn parse_date_only_is_midnight_utc() {
        let dt = parse_start_time("2025-06-14").expect("parse");
        assert_eq!(dt.timestamp(), 1_749_859_200);
    }

    #[test]
    fn parse_epoch_seconds() {
        let dt = parse_start_time("1749897000").expect("parse");
        assert_eq!(dt.timestamp(), 1_749_897_000);
    }

    #[test]
    fn parse_epoch_millis() {
        let dt = parse_start_time("1749897000500").expect("parse");
        assert_eq!(dt.timestamp(), 1_749_897_000);
        assert_eq!(dt.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_start_time("not-a-date").is_none());
        assert!(parse_start_time("").is_none());
        assert!(parse_start_time("12 days ago").is_none());
    }
}
