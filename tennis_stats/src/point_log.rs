use std::collections::BTreeMap;

use serde_json::error::Category;
use tennis_schema::{Match, PointRecord};

use crate::StatsError;

/// Decodes every entry that parses and drops the rest.
pub fn decode_point_log(raw: &[String]) -> Vec<PointRecord> {
    raw.iter()
        .enumerate()
        .filter_map(|(i, entry)| match decode_entry(i, entry) {
            Ok(point) => Some(point),
            Err(e) => {
                tracing::warn!(point_index = i, error = %e, "skipping malformed point");
                None
            }
        })
        .collect()
}

/// Like [`decode_point_log`] but fails on the first bad entry.
pub fn try_decode_point_log(raw: &[String]) -> Result<Vec<PointRecord>, StatsError> {
    raw.iter()
        .enumerate()
        .map(|(i, entry)| decode_entry(i, entry))
        .collect()
}

pub fn decode_match_points(m: &Match) -> Vec<PointRecord> {
    if m.point_log.is_empty() {
        return Vec::new();
    }
    let points = decode_point_log(&m.point_log);
    if points.len() != m.point_log.len() {
        tracing::debug!(
            match_id = %m.id,
            kept = points.len(),
            dropped = m.point_log.len() - points.len(),
            "point log partially decoded"
        );
    }
    points
}

/// Strict decode of a match's log; errors carry the match id.
pub fn try_decode_match_points(m: &Match) -> Result<Vec<PointRecord>, StatsError> {
    try_decode_point_log(&m.point_log).map_err(|e| e.with_match_id(m.id.clone()))
}

/// Points keyed by set number, in log order within each set.
pub fn group_by_set(points: &[PointRecord]) -> BTreeMap<u32, Vec<PointRecord>> {
    let mut sets: BTreeMap<u32, Vec<PointRecord>> = BTreeMap::new();
    for point in points {
        sets.entry(point.set_number).or_default().push(point.clone());
    }
    sets
}

fn decode_entry(index: usize, entry: &str) -> Result<PointRecord, StatsError> {
    serde_json::from_str(entry).map_err(|e| {
        let code = match e.classify() {
            Category::Data => "E1002",
            Category::Io | Category::Syntax | Category::Eof => "E1001",
        };
        StatsError::new(code, format!("invalid point entry: {e}"))
            .with_point_index(index)
            .with_context(truncate(entry, 80))
    })
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
