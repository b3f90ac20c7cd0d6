use std::collections::BTreeMap;

use tennis_schema::{DetailLevel, PointRecord};

use crate::{
    match_stats::{calculate_match_stats, MatchStats},
    momentum::RunTracker,
    point_log::group_by_set,
    StatsError,
};

pub fn calculate_match_stats_by_level(points: &[PointRecord], level: DetailLevel) -> MatchStats {
    match level {
        DetailLevel::PointsOnly => points_only_stats(points),
        DetailLevel::Simple => simple_stats(points),
        DetailLevel::Detailed => detailed_stats(points),
        DetailLevel::Custom => custom_stats(points),
    }
}

/// Resolves `level` by name; unrecognised names get the full aggregator.
pub fn calculate_match_stats_by_level_name(points: &[PointRecord], level: &str) -> MatchStats {
    match level.parse::<DetailLevel>() {
        Ok(level) => calculate_match_stats_by_level(points, level),
        Err(e) => {
            tracing::debug!(error = %e, "falling back to full match stats");
            calculate_match_stats(points)
        }
    }
}

/// Strict counterpart of the name fallback, for callers that want to reject
/// a typo instead of silently running the full aggregator.
pub fn parse_detail_level(name: &str) -> Result<DetailLevel, StatsError> {
    name.parse::<DetailLevel>()
        .map_err(|e| StatsError::new("E2001", e.to_string()).with_context(name))
}

/// Router output for each set in the log, keyed by set number.
pub fn calculate_set_stats(points: &[PointRecord], level: DetailLevel) -> BTreeMap<u32, MatchStats> {
    group_by_set(points)
        .into_iter()
        .map(|(set, set_points)| (set, calculate_match_stats_by_level(&set_points, level)))
        .collect()
}

/// Service/return split and break points only. Outcome, serve-in and
/// shot fields stay zero.
pub fn points_only_stats(points: &[PointRecord]) -> MatchStats {
    let mut stats = MatchStats::default();
    let mut runs = RunTracker::default();
    for point in points {
        stats.record_service(point);
        runs.push(point.winner);
    }
    stats.longest_point_run_by_player = runs.longest();
    stats.finalize();
    stats
}

/// Adds outcome attribution, aces, double faults and serve percentages.
pub fn simple_stats(points: &[PointRecord]) -> MatchStats {
    let mut stats = points_only_stats(points);
    for point in points {
        stats.record_outcome(point);
    }
    stats.finalize();
    stats
}

/// Adds shot-type and net-point breakdowns.
pub fn detailed_stats(points: &[PointRecord]) -> MatchStats {
    let mut stats = simple_stats(points);
    for point in points {
        stats.record_shot_type(point);
    }
    stats.finalize();
    stats
}

pub fn custom_stats(points: &[PointRecord]) -> MatchStats {
    detailed_stats(points)
}
