use std::fmt;

use serde::{Deserialize, Serialize};

use coldwatch_core::{StatRecord, StatValue};

/// Cold-start statistics for one function: one record per memory size the
/// function ran with inside the analysis window.
///
/// Serializes as `{ "functionName": ..., "result": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Function the analysis was run for.
    pub function_name: String,
    /// One record per (functionName, memorySize) group.
    pub result: Vec<StatRecord>,
}

impl AnalysisResult {
    /// Returns the number of records in the result.
    pub fn row_count(&self) -> usize {
        self.result.len()
    }

    /// Returns `true` if the analysis found no cold starts.
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// Retrieves the value of `field` in record `row`, if present.
    pub fn get_value(&self, row: usize, field: &str) -> Option<&StatValue> {
        self.result.get(row)?.get(field)
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.result.is_empty() {
            return write!(f, "no cold starts found for {}", self.function_name);
        }

        // Header comes from the first record; all records share the field
        // set produced by the stats clause.
        let headers: Vec<&String> = self.result[0].keys().collect();

        // Compute column widths (minimum = header length).
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        let cells: Vec<Vec<String>> = self
            .result
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| {
                        record
                            .get(*h)
                            .map(|v| v.to_string())
                            .unwrap_or_else(String::new)
                    })
                    .collect()
            })
            .collect();
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                if cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }

        // Header row.
        for (i, h) in headers.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{:<width$}", h, width = widths[i])?;
        }
        writeln!(f)?;

        // Separator.
        for (i, w) in widths.iter().enumerate() {
            if i > 0 {
                write!(f, "-+-")?;
            }
            write!(f, "{}", "-".repeat(*w))?;
        }
        writeln!(f)?;

        // Data rows.
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " | ")?;
                }
                write!(f, "{:<width$}", cell, width = widths[i])?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        write!(
            f,
            "{} | {} memory configuration(s)",
            self.function_name,
            self.result.len()
        )
    }
}
