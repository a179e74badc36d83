// Flat query table across all query types, heaviest first.

use std::collections::BTreeMap;

use crate::models::{MergedQuery, QuerySummary};

/// Sorted by total time descending; the sort is stable so ties keep input order.
pub fn flatten_queries(queries: &BTreeMap<String, Vec<MergedQuery>>) -> Vec<QuerySummary> {
    let mut out: Vec<QuerySummary> = queries
        .iter()
        .flat_map(|(query_type, merged)| {
            merged.iter().map(move |q| QuerySummary {
                query_type: query_type.clone(),
                query_text: q.query_text.clone(),
                total_micros: q.total_micros,
                execution_count: q.execution_count,
                total_rows: q.total_rows,
            })
        })
        .collect();
    out.sort_by(|a, b| b.total_micros.cmp(&a.total_micros));
    out
}
