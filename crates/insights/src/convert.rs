use coldwatch_core::{StatRecord, StatValue};

use crate::client::{InsightsError, ResultField};

/// Convert raw result rows into ordered field → value records.
///
/// Each row arrives as a sequence of field/value pairs; the field set is
/// whatever the query's `stats` clause produced, so no schema is assumed.
/// Field order is preserved and values are coerced via
/// [`StatValue::coerce`]. A pair with a missing or empty field name is
/// malformed and fails with [`InsightsError::Transform`]; a pair with a
/// missing value is skipped.
pub fn rows_to_records(rows: &[Vec<ResultField>]) -> Result<Vec<StatRecord>, InsightsError> {
    let mut records = Vec::with_capacity(rows.len());

    for (row_idx, row) in rows.iter().enumerate() {
        let mut record = StatRecord::new();
        for pair in row {
            let name = pair
                .field
                .as_deref()
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    InsightsError::Transform(format!("row {}: field with no name", row_idx))
                })?;

            let Some(raw) = pair.value.as_deref() else {
                continue;
            };

            record.insert(name.to_string(), StatValue::coerce(raw));
        }
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cold_start_row() -> Vec<ResultField> {
        vec![
            ResultField::new("functionName", "lambda-fn-A"),
            ResultField::new("memorySize", "128"),
            ResultField::new("coldStarts", "42"),
            ResultField::new("min", "101.2"),
            ResultField::new("fstQuartile", "110.0"),
            ResultField::new("median", "120.5"),
            ResultField::new("trdQuartile", "133.7"),
            ResultField::new("p95", "180.9"),
            ResultField::new("max", "240.1"),
            ResultField::new("stddev", "22.4"),
        ]
    }

    #[test]
    fn transforms_cold_start_row() {
        let records = rows_to_records(&[cold_start_row()]).expect("transform");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(
            record.get("functionName"),
            Some(&StatValue::Text("lambda-fn-A".into()))
        );
        assert_eq!(record.get("memorySize"), Some(&StatValue::Number(128.0)));
        assert_eq!(record.get("coldStarts"), Some(&StatValue::Number(42.0)));
        assert_eq!(record.get("median"), Some(&StatValue::Number(120.5)));
        assert_eq!(record.get("stddev"), Some(&StatValue::Number(22.4)));
    }

    #[test]
    fn preserves_field_order() {
        let records = rows_to_records(&[cold_start_row()]).expect("transform");
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "functionName",
                "memorySize",
                "coldStarts",
                "min",
                "fstQuartile",
                "median",
                "trdQuartile",
                "p95",
                "max",
                "stddev",
            ]
        );
    }

    #[test]
    fn nan_value_stays_text() {
        let rows = vec![vec![
            ResultField::new("functionName", "fn"),
            ResultField::new("stddev", "NaN"),
        ]];
        let records = rows_to_records(&rows).expect("transform");
        assert_eq!(
            records[0].get("stddev"),
            Some(&StatValue::Text("NaN".into()))
        );
    }

    #[test]
    fn missing_value_is_skipped() {
        let rows = vec![vec![
            ResultField::new("functionName", "fn"),
            ResultField {
                field: Some("stddev".into()),
                value: None,
            },
        ]];
        let records = rows_to_records(&rows).expect("transform");
        assert_eq!(records[0].len(), 1);
        assert!(!records[0].contains_key("stddev"));
    }

    #[test]
    fn missing_field_name_errors() {
        let rows = vec![vec![
            ResultField::new("functionName", "fn"),
            ResultField {
                field: None,
                value: Some("120.5".into()),
            },
        ]];
        let err = rows_to_records(&rows).unwrap_err();
        assert!(matches!(err, InsightsError::Transform(_)));
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn empty_field_name_errors() {
        let rows = vec![vec![ResultField::new("", "120.5")]];
        let err = rows_to_records(&rows).unwrap_err();
        assert!(matches!(err, InsightsError::Transform(_)));
    }

    #[test]
    fn empty_input_yields_no_records() {
        let records = rows_to_records(&[]).expect("transform");
        assert!(records.is_empty());
    }

    #[test]
    fn multiple_rows_keep_their_order() {
        let rows = vec![
            vec![
                ResultField::new("functionName", "fn"),
                ResultField::new("memorySize", "128"),
            ],
            vec![
                ResultField::new("functionName", "fn"),
                ResultField::new("memorySize", "512"),
            ],
        ];
        let records = rows_to_records(&rows).expect("transform");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("memorySize"), Some(&StatValue::Number(128.0)));
        assert_eq!(records[1].get("memorySize"), Some(&StatValue::Number(512.0)));
    }
}
