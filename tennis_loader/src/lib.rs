use std::{fs, path::Path};

use anyhow::Context;
use serde_json::Value;
use tennis_schema::{Match, PointRecord};
use tennis_stats::{decode_point_log, StatsConfig};

pub fn load_matches_from_path(path: impl AsRef<Path>) -> anyhow::Result<Vec<Match>> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read matches: {}", path.display()))?;
    let matches: Vec<Match> = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse matches json: {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = matches.len(), "loaded matches");
    Ok(matches)
}

pub fn load_matches_from_str(json: &str) -> anyhow::Result<Vec<Match>> {
    let matches: Vec<Match> = serde_json::from_str(json).context("failed to parse matches json")?;
    Ok(matches)
}

/// Reads a point log. Entries may be point objects or JSON-encoded point
/// strings as stored on a match; unreadable entries are skipped.
pub fn load_points_from_path(path: impl AsRef<Path>) -> anyhow::Result<Vec<PointRecord>> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read points: {}", path.display()))?;
    load_points_from_str(&text).with_context(|| format!("failed to load points: {}", path.display()))
}

pub fn load_points_from_str(json: &str) -> anyhow::Result<Vec<PointRecord>> {
    let entries: Vec<Value> = serde_json::from_str(json).context("failed to parse points json")?;
    let raw: Vec<String> = entries
        .into_iter()
        .map(|entry| match entry {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect();
    Ok(decode_point_log(&raw))
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> anyhow::Result<StatsConfig> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = StatsConfig::from_json_str(&text)
        .with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tennis_schema::{PointOutcome, Side};

    #[test]
    fn points_accept_objects_and_encoded_strings() {
        let json = r#"[
            {"pointNumber":1,"setNumber":1,"gameNumber":1,"winner":"p1","server":"p1",
             "serveType":"first","pointOutcome":"ace"},
            "{\"pointNumber\":2,\"setNumber\":1,\"gameNumber\":1,\"winner\":\"p2\",\"server\":\"p1\",\"serveType\":\"second\",\"pointOutcome\":\"double_fault\"}",
            {"pointNumber":3},
            42
        ]"#;
        let points = load_points_from_str(json).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].point_outcome, PointOutcome::Ace);
        assert_eq!(points[1].winner, Side::P2);
    }

    #[test]
    fn points_must_be_an_array() {
        let err = load_points_from_str(r#"{"points":[]}"#).unwrap_err();
        assert_eq!(err.to_string(), "failed to parse points json");
    }

    #[test]
    fn matches_parse_with_dollar_id() {
        let json = r#"[{"$id":"m1","playerOneId":"a","playerTwoId":"b",
            "matchDate":"2024-05-01","status":"Completed","winnerId":"a"}]"#;
        let matches = load_matches_from_str(json).unwrap();
        assert_eq!(matches[0].id, "m1");
        assert!(matches[0].is_won_by("a"));
        assert!(matches[0].point_log.is_empty());
    }

    #[test]
    fn missing_files_name_the_path() {
        let err = load_matches_from_path("/nonexistent/matches.json").unwrap_err();
        assert!(err.to_string().contains("failed to read matches: /nonexistent/matches.json"));

        let err = load_config_from_path("/nonexistent/cfg.json").unwrap_err();
        assert!(err.to_string().starts_with("failed to read config"));
    }
}
