// Per-query statistics merged across a window (e.g. SQL statements).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedQuery {
    pub query_text: String,
    pub total_micros: u64,
    pub execution_count: u64,
    pub total_rows: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySummary {
    pub query_type: String,
    pub query_text: String,
    pub total_micros: u64,
    pub execution_count: u64,
    pub total_rows: u64,
}
