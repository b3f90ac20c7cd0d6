use serde::Serialize;
use tennis_schema::{PointOutcome, PointRecord, ServeType, Side, ShotType};

use crate::{
    momentum::RunTracker,
    rates::{percentage, percentage_pair},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakPointStats {
    /// Break points against this player's serve.
    pub faced: [u32; 2],
    pub saved: [u32; 2],
    /// Return games won by this player.
    pub converted: [u32; 2],
    /// Break points this player had on the opponent's serve.
    pub opportunities: [u32; 2],
    pub conversion_rate: [u32; 2],
    pub save_rate: [u32; 2],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotTypeStats {
    pub forehand_winners: u32,
    pub forehand_errors: u32,
    pub backhand_winners: u32,
    pub backhand_errors: u32,
    pub volley_winners: u32,
    pub volley_errors: u32,
}

/// Per-player statistics for one point log. Index 0 is `p1`, index 1 is `p2`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub total_points: u32,
    pub total_points_won_by_player: [u32; 2],

    pub service_points_played_by_player: [u32; 2],
    pub service_points_won_by_player: [u32; 2],
    pub service_points_won_percentage_by_player: [u32; 2],
    pub receiving_points_played_by_player: [u32; 2],
    pub receiving_points_won_by_player: [u32; 2],
    pub receiving_points_won_percentage_by_player: [u32; 2],
    pub longest_point_run_by_player: [u32; 2],

    pub winners_by_player: [u32; 2],
    pub unforced_errors_by_player: [u32; 2],
    pub forced_errors_by_player: [u32; 2],
    pub aces_by_player: [u32; 2],
    pub double_faults_by_player: [u32; 2],

    pub first_serves_in_by_player: [u32; 2],
    pub first_serve_percentage_by_player: [u32; 2],
    pub second_serves_in_by_player: [u32; 2],
    pub second_serve_percentage_by_player: [u32; 2],
    pub first_serve_points_played_by_player: [u32; 2],
    pub first_serve_points_won_by_player: [u32; 2],
    pub second_serve_points_played_by_player: [u32; 2],
    pub second_serve_points_won_by_player: [u32; 2],

    pub break_points_by_player: BreakPointStats,

    pub shot_types_by_player: [ShotTypeStats; 2],
    pub net_points_played_by_player: [u32; 2],
    pub net_points_won_by_player: [u32; 2],
}

/// Full statistics for a point log, every field populated.
pub fn calculate_match_stats(points: &[PointRecord]) -> MatchStats {
    let mut stats = MatchStats::default();
    let mut runs = RunTracker::default();
    for point in points {
        stats.record_service(point);
        runs.push(point.winner);
        stats.record_outcome(point);
        stats.record_shot_type(point);
    }
    stats.longest_point_run_by_player = runs.longest();
    stats.finalize();
    stats
}

impl MatchStats {
    pub fn player(&self, side: Side) -> PlayerView<'_> {
        PlayerView { stats: self, side }
    }

    /// Totals, serve/return split and break points. Needs only winner, server
    /// and the situational flags.
    pub(crate) fn record_service(&mut self, point: &PointRecord) {
        let server = point.server.index();
        let receiver = point.receiver().index();
        let winner = point.winner.index();

        self.total_points += 1;
        self.total_points_won_by_player[winner] += 1;

        self.service_points_played_by_player[server] += 1;
        self.receiving_points_played_by_player[receiver] += 1;
        if point.server_won() {
            self.service_points_won_by_player[server] += 1;
        } else {
            self.receiving_points_won_by_player[receiver] += 1;
        }

        let bp = &mut self.break_points_by_player;
        if point.is_break_point {
            bp.faced[server] += 1;
            bp.opportunities[receiver] += 1;
            if point.server_won() {
                bp.saved[server] += 1;
            }
        }
        // A game can be broken on a point that was not itself logged as a
        // break point, so conversions are keyed on the game-winning flag.
        if point.is_game_winning && !point.server_won() {
            bp.converted[winner] += 1;
        }
    }

    /// How the point ended and which serve it was played on.
    pub(crate) fn record_outcome(&mut self, point: &PointRecord) {
        let server = point.server.index();
        let owner = point.shot_owner().index();

        match point.point_outcome {
            PointOutcome::Winner => self.winners_by_player[owner] += 1,
            PointOutcome::UnforcedError => self.unforced_errors_by_player[owner] += 1,
            PointOutcome::ForcedError => self.forced_errors_by_player[owner] += 1,
            PointOutcome::Ace => self.aces_by_player[server] += 1,
            PointOutcome::DoubleFault => self.double_faults_by_player[server] += 1,
        }

        if point.point_outcome == PointOutcome::DoubleFault {
            return;
        }
        let won = point.server_won() as u32;
        match point.serve_type {
            ServeType::First => {
                self.first_serves_in_by_player[server] += 1;
                self.first_serve_points_played_by_player[server] += 1;
                self.first_serve_points_won_by_player[server] += won;
            }
            ServeType::Second => {
                self.second_serves_in_by_player[server] += 1;
                self.second_serve_points_played_by_player[server] += 1;
                self.second_serve_points_won_by_player[server] += won;
            }
        }
    }

    /// Shot-type and net-play breakdown from `lastShotType`.
    pub(crate) fn record_shot_type(&mut self, point: &PointRecord) {
        let Some(shot) = point.last_shot_type else {
            return;
        };
        let owner = point.shot_owner();
        let idx = owner.index();

        if shot.is_net_shot() {
            self.net_points_played_by_player[idx] += 1;
            if point.winner == owner {
                self.net_points_won_by_player[idx] += 1;
            }
        }

        let outcome = point.point_outcome;
        let is_winner = outcome == PointOutcome::Winner;
        let is_error = outcome.is_error();
        let counts = &mut self.shot_types_by_player[idx];
        match shot {
            ShotType::Forehand => {
                counts.forehand_winners += is_winner as u32;
                counts.forehand_errors += is_error as u32;
            }
            ShotType::Backhand => {
                counts.backhand_winners += is_winner as u32;
                counts.backhand_errors += is_error as u32;
            }
            ShotType::Volley => {
                counts.volley_winners += is_winner as u32;
                counts.volley_errors += is_error as u32;
            }
            ShotType::Overhead | ShotType::DropShot | ShotType::Lob | ShotType::Serve => {}
        }
    }

    /// Recomputes every percentage from the raw counts.
    pub(crate) fn finalize(&mut self) {
        self.service_points_won_percentage_by_player = percentage_pair(
            self.service_points_won_by_player,
            self.service_points_played_by_player,
        );
        self.receiving_points_won_percentage_by_player = percentage_pair(
            self.receiving_points_won_by_player,
            self.receiving_points_played_by_player,
        );

        for i in 0..2 {
            let served = self.service_points_played_by_player[i];
            let first_in = self.first_serves_in_by_player[i];
            self.first_serve_percentage_by_player[i] = percentage(first_in, served);
            self.second_serve_percentage_by_player[i] =
                percentage(self.second_serves_in_by_player[i], served.saturating_sub(first_in));
        }

        let bp = &mut self.break_points_by_player;
        bp.conversion_rate = percentage_pair(bp.converted, bp.opportunities);
        bp.save_rate = percentage_pair(bp.saved, bp.faced);
    }
}

/// One player's slice of a [`MatchStats`].
#[derive(Debug, Clone, Copy)]
pub struct PlayerView<'a> {
    stats: &'a MatchStats,
    side: Side,
}

macro_rules! view_fields {
    ($($name:ident => $field:ident),* $(,)?) => {
        $(
            pub fn $name(&self) -> u32 {
                self.stats.$field[self.side.index()]
            }
        )*
    };
}

impl PlayerView<'_> {
    view_fields! {
        points_won => total_points_won_by_player,
        service_points_played => service_points_played_by_player,
        service_points_won => service_points_won_by_player,
        receiving_points_played => receiving_points_played_by_player,
        receiving_points_won => receiving_points_won_by_player,
        winners => winners_by_player,
        unforced_errors => unforced_errors_by_player,
        forced_errors => forced_errors_by_player,
        aces => aces_by_player,
        double_faults => double_faults_by_player,
        first_serves_in => first_serves_in_by_player,
        first_serve_points_played => first_serve_points_played_by_player,
        first_serve_points_won => first_serve_points_won_by_player,
        second_serve_points_played => second_serve_points_played_by_player,
        second_serve_points_won => second_serve_points_won_by_player,
        net_points_played => net_points_played_by_player,
        net_points_won => net_points_won_by_player,
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn break_points_faced(&self) -> u32 {
        self.stats.break_points_by_player.faced[self.side.index()]
    }

    pub fn break_points_saved(&self) -> u32 {
        self.stats.break_points_by_player.saved[self.side.index()]
    }

    pub fn break_points_converted(&self) -> u32 {
        self.stats.break_points_by_player.converted[self.side.index()]
    }

    pub fn break_point_opportunities(&self) -> u32 {
        self.stats.break_points_by_player.opportunities[self.side.index()]
    }
}
