//! Per-point tennis statistics: single-match aggregation at several detail
//! levels, detailed breakdowns, cross-match rollups and cached dashboard stats.

mod aggregate;
mod cache;
mod config;
mod detailed;
mod error;
mod instant;
mod levels;
mod match_stats;
mod momentum;
mod point_log;
mod rates;

pub use aggregate::{
    aggregate_player_stats_across_matches, calculate_player_win_streak, AggregatedPlayerStats,
    WinStreak,
};
pub use cache::{InstantStatsCache, SharedInstantStatsCache};
pub use config::{CacheConfig, CacheKeyStrategy, StatsConfig};
pub use detailed::{
    calculate_detailed_match_stats, calculate_detailed_match_stats_with_window,
    infer_shot_direction, DetailedMatchStats, PressureBucket, PressurePointStats,
    ServeDirectionBucket, ServeDirectionStats, ShotDirectionBucket, ShotDirectionStats,
};
pub use error::{StatsError, StatsErrorKind};
pub use instant::{
    calculate_instant_stats, calculate_next_milestone,
    InstantStats, MilestoneKind, MonthComparison, MonthSummary, NextMilestone,
};
pub use levels::{
    calculate_match_stats_by_level, calculate_match_stats_by_level_name, calculate_set_stats,
    custom_stats, detailed_stats, parse_detail_level, points_only_stats, simple_stats,
};
pub use match_stats::{calculate_match_stats, BreakPointStats, MatchStats, PlayerView, ShotTypeStats};
pub use momentum::{calculate_momentum, MomentumSummary, PointRun, DEFAULT_MOMENTUM_WINDOW};
pub use point_log::{
    decode_match_points, decode_point_log, group_by_set, try_decode_match_points,
    try_decode_point_log,
};
pub use rates::{percentage, winner_to_error_ratio};

pub use tennis_schema::{DetailLevel, Match, PointRecord, Side};
