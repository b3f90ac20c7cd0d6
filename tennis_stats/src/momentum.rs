use serde::Serialize;
use tennis_schema::{PointRecord, Side};

pub const DEFAULT_MOMENTUM_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRun {
    pub side: Side,
    pub length: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumSummary {
    pub window: usize,
    /// Per point: points won by p1 minus points won by p2 over the trailing window.
    pub series: Vec<i32>,
    pub longest_run_by_player: [u32; 2],
    pub current_run: Option<PointRun>,
    /// Times the series crossed from one player's favour to the other's.
    pub swings: u32,
}

pub fn calculate_momentum(points: &[PointRecord], window: usize) -> MomentumSummary {
    let window = window.max(1);
    let mut runs = RunTracker::default();
    let mut series = Vec::with_capacity(points.len());
    let mut sum = 0i32;
    let mut last_sign = 0i32;
    let mut swings = 0;

    for (i, point) in points.iter().enumerate() {
        runs.push(point.winner);

        sum += signed(point.winner);
        if i >= window {
            sum -= signed(points[i - window].winner);
        }
        series.push(sum);

        let sign = sum.signum();
        if sign != 0 {
            if last_sign != 0 && sign != last_sign {
                swings += 1;
            }
            last_sign = sign;
        }
    }

    MomentumSummary {
        window,
        series,
        longest_run_by_player: runs.longest(),
        current_run: runs.current(),
        swings,
    }
}

fn signed(winner: Side) -> i32 {
    match winner {
        Side::P1 => 1,
        Side::P2 => -1,
    }
}

/// Tracks runs of consecutive points won by the same side.
#[derive(Debug, Clone, Default)]
pub(crate) struct RunTracker {
    current: Option<(Side, u32)>,
    longest: [u32; 2],
}

impl RunTracker {
    pub(crate) fn push(&mut self, winner: Side) {
        let length = match self.current {
            Some((side, length)) if side == winner => length + 1,
            _ => 1,
        };
        self.current = Some((winner, length));
        let best = &mut self.longest[winner.index()];
        if length > *best {
            *best = length;
        }
    }

    pub(crate) fn longest(&self) -> [u32; 2] {
        self.longest
    }

    pub(crate) fn current(&self) -> Option<PointRun> {
        self.current.map(|(side, length)| PointRun { side, length })
    }
}
