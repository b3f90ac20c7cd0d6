use serde::Serialize;
use tennis_schema::{CourtPosition, PointOutcome, PointRecord, ServePlacement, ShotDirection, Side};

use crate::{
    match_stats::{calculate_match_stats, MatchStats},
    momentum::{calculate_momentum, MomentumSummary, DEFAULT_MOMENTUM_WINDOW},
    rates::percentage,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServeDirectionBucket {
    pub attempts: u32,
    /// Points won by the server.
    pub successful: u32,
    pub aces: u32,
    pub double_faults: u32,
    pub success_rate: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServeDirectionStats {
    pub wide: ServeDirectionBucket,
    pub body: ServeDirectionBucket,
    pub t: ServeDirectionBucket,
    pub total_attempts: u32,
    pub best_direction: Option<ServePlacement>,
    pub worst_direction: Option<ServePlacement>,
}

impl ServeDirectionStats {
    pub fn bucket(&self, placement: ServePlacement) -> &ServeDirectionBucket {
        match placement {
            ServePlacement::Wide => &self.wide,
            ServePlacement::Body => &self.body,
            ServePlacement::T => &self.t,
        }
    }

    fn bucket_mut(&mut self, placement: ServePlacement) -> &mut ServeDirectionBucket {
        match placement {
            ServePlacement::Wide => &mut self.wide,
            ServePlacement::Body => &mut self.body,
            ServePlacement::T => &mut self.t,
        }
    }

    fn record(&mut self, point: &PointRecord, placement: ServePlacement) {
        self.total_attempts += 1;
        let bucket = self.bucket_mut(placement);
        bucket.attempts += 1;
        bucket.successful += point.server_won() as u32;
        match point.point_outcome {
            PointOutcome::Ace => bucket.aces += 1,
            PointOutcome::DoubleFault => bucket.double_faults += 1,
            _ => {}
        }
    }

    fn finalize(&mut self) {
        const ORDER: [ServePlacement; 3] = [ServePlacement::Wide, ServePlacement::Body, ServePlacement::T];

        let mut best: Option<(ServePlacement, u32)> = None;
        let mut worst: Option<(ServePlacement, u32)> = None;
        for placement in ORDER {
            let bucket = self.bucket_mut(placement);
            bucket.success_rate = percentage(bucket.successful, bucket.attempts);
            if bucket.attempts == 0 {
                continue;
            }
            let rate = bucket.success_rate;
            if best.map_or(true, |(_, r)| rate > r) {
                best = Some((placement, rate));
            }
            if worst.map_or(true, |(_, r)| rate < r) {
                worst = Some((placement, rate));
            }
        }
        self.best_direction = best.map(|(p, _)| p);
        self.worst_direction = worst.map(|(p, _)| p);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotDirectionBucket {
    pub attempts: u32,
    pub winners: u32,
    pub errors: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotDirectionStats {
    pub cross_court: ShotDirectionBucket,
    pub down_the_line: ShotDirectionBucket,
    pub body: ShotDirectionBucket,
    pub long: ShotDirectionBucket,
    pub wide: ShotDirectionBucket,
    pub net: ShotDirectionBucket,
    pub total_shots: u32,
    /// Most attempted direction; ties go to the earlier bucket.
    pub preferred_direction: Option<ShotDirection>,
}

impl ShotDirectionStats {
    pub fn bucket(&self, direction: ShotDirection) -> &ShotDirectionBucket {
        match direction {
            ShotDirection::CrossCourt => &self.cross_court,
            ShotDirection::DownTheLine => &self.down_the_line,
            ShotDirection::Body => &self.body,
            ShotDirection::Long => &self.long,
            ShotDirection::Wide => &self.wide,
            ShotDirection::Net => &self.net,
        }
    }

    fn bucket_mut(&mut self, direction: ShotDirection) -> &mut ShotDirectionBucket {
        match direction {
            ShotDirection::CrossCourt => &mut self.cross_court,
            ShotDirection::DownTheLine => &mut self.down_the_line,
            ShotDirection::Body => &mut self.body,
            ShotDirection::Long => &mut self.long,
            ShotDirection::Wide => &mut self.wide,
            ShotDirection::Net => &mut self.net,
        }
    }

    fn record(&mut self, outcome: PointOutcome, direction: ShotDirection) {
        self.total_shots += 1;
        let bucket = self.bucket_mut(direction);
        bucket.attempts += 1;
        if outcome == PointOutcome::Winner {
            bucket.winners += 1;
        } else {
            bucket.errors += 1;
        }
    }

    fn finalize(&mut self) {
        let mut preferred: Option<(ShotDirection, u32)> = None;
        for direction in ShotDirection::ALL {
            let attempts = self.bucket(direction).attempts;
            if attempts > 0 && preferred.map_or(true, |(_, most)| attempts > most) {
                preferred = Some((direction, attempts));
            }
        }
        self.preferred_direction = preferred.map(|(d, _)| d);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PressureBucket {
    pub played: u32,
    pub won: u32,
    pub percentage: u32,
}

impl PressureBucket {
    fn record(&mut self, won: bool) {
        self.played += 1;
        self.won += won as u32;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PressurePointStats {
    pub break_points: PressureBucket,
    pub set_points: PressureBucket,
    pub match_points: PressureBucket,
}

impl PressurePointStats {
    fn finalize(&mut self) {
        for bucket in [&mut self.break_points, &mut self.set_points, &mut self.match_points] {
            bucket.percentage = percentage(bucket.won, bucket.played);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedMatchStats {
    #[serde(flatten)]
    pub base: MatchStats,
    pub serve_direction_by_player: [ServeDirectionStats; 2],
    pub shot_direction_by_player: [ShotDirectionStats; 2],
    pub pressure_points_by_player: [PressurePointStats; 2],
    pub momentum: MomentumSummary,
    /// `false` means the log carried no placement, direction or pressure
    /// data at all, not that every breakdown is genuinely zero.
    pub has_detailed_data: bool,
}

pub fn calculate_detailed_match_stats(points: &[PointRecord]) -> DetailedMatchStats {
    calculate_detailed_match_stats_with_window(points, DEFAULT_MOMENTUM_WINDOW)
}

pub fn calculate_detailed_match_stats_with_window(
    points: &[PointRecord],
    momentum_window: usize,
) -> DetailedMatchStats {
    let mut out = DetailedMatchStats {
        base: calculate_match_stats(points),
        momentum: calculate_momentum(points, momentum_window),
        ..Default::default()
    };

    for point in points {
        if let Some(placement) = point.serve_placement {
            out.serve_direction_by_player[point.server.index()].record(point, placement);
            out.has_detailed_data = true;
        }

        if point.point_outcome.is_rally_ending() {
            if let Some(direction) = infer_shot_direction(point) {
                out.shot_direction_by_player[point.shot_owner().index()]
                    .record(point.point_outcome, direction);
                out.has_detailed_data = true;
            }
        }

        if point.is_break_point || point.is_set_point || point.is_match_point {
            for side in Side::BOTH {
                let won = point.winner == side;
                let pressure = &mut out.pressure_points_by_player[side.index()];
                if point.is_break_point {
                    pressure.break_points.record(won);
                }
                if point.is_set_point {
                    pressure.set_points.record(won);
                }
                if point.is_match_point {
                    pressure.match_points.record(won);
                }
            }
            out.has_detailed_data = true;
        }
    }

    for stats in &mut out.serve_direction_by_player {
        stats.finalize();
    }
    for stats in &mut out.shot_direction_by_player {
        stats.finalize();
    }
    for stats in &mut out.pressure_points_by_player {
        stats.finalize();
    }
    out
}

/// Recorded direction, or a guess from court position: deuce side plays
/// cross-court, ad side down the line, anything else at the body.
pub fn infer_shot_direction(point: &PointRecord) -> Option<ShotDirection> {
    if let Some(direction) = point.shot_direction {
        return Some(direction);
    }
    point.court_position.map(|position| match position {
        CourtPosition::Deuce => ShotDirection::CrossCourt,
        CourtPosition::Ad => ShotDirection::DownTheLine,
        CourtPosition::Net | CourtPosition::Baseline => ShotDirection::Body,
    })
}
