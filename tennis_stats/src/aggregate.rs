use serde::Serialize;
use tennis_schema::Match;

use crate::{
    match_stats::{calculate_match_stats, PlayerView},
    point_log::decode_match_points,
    rates::{percentage, winner_to_error_ratio},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinStreak {
    pub current: u32,
    pub max: u32,
}

/// One player's totals across a match history. Match counts cover completed
/// matches; point totals cover every match with a point log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPlayerStats {
    pub total_matches: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_with_point_data: u32,

    pub total_points_played: u32,
    pub total_points_won: u32,
    pub total_service_points_played: u32,
    pub total_service_points_won: u32,
    pub total_return_points_played: u32,
    pub total_return_points_won: u32,

    pub total_aces: u32,
    pub total_double_faults: u32,
    pub total_winners: u32,
    pub total_unforced_errors: u32,
    pub total_forced_errors: u32,

    pub total_first_serves_attempted: u32,
    pub total_first_serves_in: u32,
    pub total_first_serve_points_played: u32,
    pub total_first_serve_points_won: u32,
    pub total_second_serve_points_played: u32,
    pub total_second_serve_points_won: u32,

    pub total_break_points_faced: u32,
    pub total_break_points_saved: u32,
    pub total_break_points_won: u32,
    pub total_break_point_opportunities: u32,

    pub total_net_points_played: u32,
    pub total_net_points_won: u32,

    pub win_streak: u32,
    pub max_win_streak: u32,

    pub win_rate: u32,
    pub first_serve_percentage: u32,
    pub first_serve_points_won_percentage: u32,
    pub second_serve_points_won_percentage: u32,
    pub service_points_won_percentage: u32,
    pub return_points_pct: u32,
    pub break_point_conversion_rate: u32,
    pub break_point_save_rate: u32,
    pub net_points_won_percentage: u32,
    pub winner_to_error_ratio: f64,
}

impl AggregatedPlayerStats {
    fn fold(&mut self, view: PlayerView<'_>) {
        self.total_points_played += view.service_points_played() + view.receiving_points_played();
        self.total_points_won += view.points_won();
        self.total_service_points_played += view.service_points_played();
        self.total_service_points_won += view.service_points_won();
        self.total_return_points_played += view.receiving_points_played();
        self.total_return_points_won += view.receiving_points_won();

        self.total_aces += view.aces();
        self.total_double_faults += view.double_faults();
        self.total_winners += view.winners();
        self.total_unforced_errors += view.unforced_errors();
        self.total_forced_errors += view.forced_errors();

        self.total_first_serves_attempted += view.service_points_played();
        self.total_first_serves_in += view.first_serves_in();
        self.total_first_serve_points_played += view.first_serve_points_played();
        self.total_first_serve_points_won += view.first_serve_points_won();
        self.total_second_serve_points_played += view.second_serve_points_played();
        self.total_second_serve_points_won += view.second_serve_points_won();

        self.total_break_points_faced += view.break_points_faced();
        self.total_break_points_saved += view.break_points_saved();
        self.total_break_points_won += view.break_points_converted();
        self.total_break_point_opportunities += view.break_point_opportunities();

        self.total_net_points_played += view.net_points_played();
        self.total_net_points_won += view.net_points_won();
    }

    fn derive_rates(&mut self) {
        self.win_rate = percentage(self.matches_won, self.total_matches);
        self.first_serve_percentage =
            percentage(self.total_first_serves_in, self.total_first_serves_attempted);
        self.first_serve_points_won_percentage =
            percentage(self.total_first_serve_points_won, self.total_first_serve_points_played);
        self.second_serve_points_won_percentage =
            percentage(self.total_second_serve_points_won, self.total_second_serve_points_played);
        self.service_points_won_percentage =
            percentage(self.total_service_points_won, self.total_service_points_played);
        self.return_points_pct =
            percentage(self.total_return_points_won, self.total_return_points_played);
        self.break_point_conversion_rate =
            percentage(self.total_break_points_won, self.total_break_point_opportunities);
        self.break_point_save_rate =
            percentage(self.total_break_points_saved, self.total_break_points_faced);
        self.net_points_won_percentage =
            percentage(self.total_net_points_won, self.total_net_points_played);
        self.winner_to_error_ratio =
            winner_to_error_ratio(self.total_winners, self.total_unforced_errors);
    }
}

pub fn aggregate_player_stats_across_matches(matches: &[Match], player_id: &str) -> AggregatedPlayerStats {
    let mut agg = AggregatedPlayerStats::default();

    for m in matches {
        let Some(side) = m.side_of(player_id) else {
            tracing::debug!(match_id = %m.id, "player not in match, skipping");
            continue;
        };

        if m.is_completed() {
            agg.total_matches += 1;
            if m.is_won_by(player_id) {
                agg.matches_won += 1;
            } else {
                agg.matches_lost += 1;
            }
        }

        // Point totals count every logged match, finished or not.
        let points = decode_match_points(m);
        if points.is_empty() {
            continue;
        }
        agg.matches_with_point_data += 1;
        let stats = calculate_match_stats(&points);
        agg.fold(stats.player(side));
    }

    let streak = calculate_player_win_streak(matches, player_id);
    agg.win_streak = streak.current;
    agg.max_win_streak = streak.max;
    agg.derive_rates();
    agg
}

/// Current and longest run of completed wins, oldest match first.
pub fn calculate_player_win_streak(matches: &[Match], player_id: &str) -> WinStreak {
    let mut current = 0;
    let mut max = 0;
    for m in chronological(matches, player_id) {
        if m.is_completed() && m.is_won_by(player_id) {
            current += 1;
        } else {
            max = max.max(current);
            current = 0;
        }
    }
    // The trailing run is never followed by a reset.
    max = max.max(current);
    WinStreak { current, max }
}

/// The player's matches in ascending date order. Undated matches sort first,
/// ties keep input order.
pub(crate) fn chronological<'a>(matches: &'a [Match], player_id: &str) -> Vec<&'a Match> {
    let mut out: Vec<&Match> = matches
        .iter()
        .filter(|m| m.side_of(player_id).is_some())
        .collect();
    out.sort_by_key(|m| m.played_at());
    out
}
