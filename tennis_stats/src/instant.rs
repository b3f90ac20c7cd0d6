use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tennis_schema::Match;

use crate::{
    aggregate::{calculate_player_win_streak, chronological},
    rates::percentage,
};

const MATCH_MILESTONES: [u32; 7] = [5, 10, 25, 50, 100, 200, 500];
const WIN_RATE_MILESTONES: [u32; 5] = [50, 60, 70, 80, 90];
const STREAK_MILESTONES: [u32; 5] = [3, 5, 10, 15, 20];

const RECENT_FORM_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MilestoneKind {
    #[serde(rename = "matches")]
    Matches,
    #[serde(rename = "winrate")]
    WinRate,
    #[serde(rename = "streak")]
    Streak,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextMilestone {
    #[serde(rename = "type")]
    pub kind: MilestoneKind,
    pub target: u32,
    pub progress: u32,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub matches: u32,
    pub wins: u32,
    pub win_rate: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    pub matches_change: i32,
    pub win_rate_change: i32,
}

/// Cheap dashboard numbers for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantStats {
    pub win_rate: u32,
    pub total_matches: u32,
    pub matches_won: u32,
    pub current_streak: u32,
    pub longest_streak: u32,

    /// Win rate over the last five completed matches.
    pub recent_form: u32,
    /// `1` improving, `-1` declining, `0` flat.
    pub improvement: i8,
    pub next_milestone: NextMilestone,

    pub is_hot_streak: bool,
    pub is_on_fire: bool,
    pub needs_improvement: bool,

    pub this_month: MonthSummary,
    pub last_month_comparison: MonthComparison,
}

impl InstantStats {
    pub fn empty() -> Self {
        Self {
            win_rate: 0,
            total_matches: 0,
            matches_won: 0,
            current_streak: 0,
            longest_streak: 0,
            recent_form: 0,
            improvement: 0,
            next_milestone: NextMilestone {
                kind: MilestoneKind::Matches,
                target: 5,
                progress: 0,
                description: "Play your first match!".to_string(),
            },
            is_hot_streak: false,
            is_on_fire: false,
            needs_improvement: false,
            this_month: MonthSummary::default(),
            last_month_comparison: MonthComparison::default(),
        }
    }
}

/// `now` anchors the this-month/last-month windows.
pub fn calculate_instant_stats(
    matches: &[Match],
    player_id: Option<&str>,
    now: NaiveDateTime,
) -> InstantStats {
    let Some(player_id) = player_id else {
        return InstantStats::empty();
    };

    // Newest first.
    let mut completed = chronological(matches, player_id);
    completed.retain(|m| m.is_completed());
    completed.reverse();
    if completed.is_empty() {
        return InstantStats::empty();
    }

    let total_matches = completed.len() as u32;
    let matches_won = count_wins(&completed, player_id);
    let win_rate = percentage(matches_won, total_matches);

    let streak = calculate_player_win_streak(matches, player_id);

    let last5 = &completed[..completed.len().min(RECENT_FORM_WINDOW)];
    let last5_wins = count_wins(last5, player_id);
    let recent_form = percentage(last5_wins, last5.len() as u32);

    let last10 = &completed[..completed.len().min(2 * RECENT_FORM_WINDOW)];
    let (newer, older) = last10.split_at(last10.len().min(RECENT_FORM_WINDOW));
    let improvement = if older.is_empty() {
        0
    } else {
        let old_rate = count_wins(older, player_id) as f64 / older.len() as f64;
        let new_rate = count_wins(newer, player_id) as f64 / newer.len() as f64;
        if new_rate > old_rate + 0.1 {
            1
        } else if new_rate < old_rate - 0.1 {
            -1
        } else {
            0
        }
    };

    let (this_month_start, last_month_start) = month_starts(now.date());
    let this_month: Vec<&Match> = completed
        .iter()
        .copied()
        .filter(|m| played_between(m, this_month_start, None))
        .collect();
    let last_month: Vec<&Match> = completed
        .iter()
        .copied()
        .filter(|m| played_between(m, last_month_start, Some(this_month_start)))
        .collect();
    let this_month = summarize_month(&this_month, player_id);
    let last_month = summarize_month(&last_month, player_id);

    InstantStats {
        win_rate,
        total_matches,
        matches_won,
        current_streak: streak.current,
        longest_streak: streak.max,
        recent_form,
        improvement,
        next_milestone: calculate_next_milestone(total_matches, win_rate, streak.current),
        is_hot_streak: streak.current >= 3,
        is_on_fire: last5.len() >= 4 && last5_wins >= 4,
        needs_improvement: recent_form < 40 && total_matches >= 5,
        this_month,
        last_month_comparison: MonthComparison {
            matches_change: this_month.matches as i32 - last_month.matches as i32,
            win_rate_change: this_month.win_rate as i32 - last_month.win_rate as i32,
        },
    }
}

/// Match count goals first while under 50 matches, then win rate below 80%,
/// then streaks below 20, else the next multiple of 50 matches.
pub fn calculate_next_milestone(total_matches: u32, win_rate: u32, streak: u32) -> NextMilestone {
    let next_match = MATCH_MILESTONES.iter().copied().find(|&m| m > total_matches);
    let next_win_rate = WIN_RATE_MILESTONES.iter().copied().find(|&m| m > win_rate);
    let next_streak = STREAK_MILESTONES.iter().copied().find(|&m| m > streak);

    if let Some(target) = next_match.filter(|_| total_matches < 50) {
        return NextMilestone {
            kind: MilestoneKind::Matches,
            target,
            progress: percentage(total_matches, target),
            description: format!("{} matches to go", target - total_matches),
        };
    }

    if let Some(target) = next_win_rate.filter(|_| win_rate < 80) {
        return NextMilestone {
            kind: MilestoneKind::WinRate,
            target,
            progress: percentage(win_rate, target),
            description: format!("{}% improvement needed", target - win_rate),
        };
    }

    if let Some(target) = next_streak.filter(|_| streak < 20) {
        return NextMilestone {
            kind: MilestoneKind::Streak,
            target,
            progress: percentage(streak, target),
            description: format!("{} more wins for streak", target - streak),
        };
    }

    NextMilestone {
        kind: MilestoneKind::Matches,
        target: (total_matches / 50 + 1) * 50,
        progress: percentage(total_matches % 50, 50),
        description: "Keep playing!".to_string(),
    }
}

fn count_wins(matches: &[&Match], player_id: &str) -> u32 {
    matches.iter().filter(|m| m.is_won_by(player_id)).count() as u32
}

/// `until` is exclusive.
fn played_between(m: &Match, from: NaiveDate, until: Option<NaiveDate>) -> bool {
    m.played_at()
        .map(|at| at.date() >= from && until.map_or(true, |u| at.date() < u))
        .unwrap_or(false)
}

fn summarize_month(matches: &[&Match], player_id: &str) -> MonthSummary {
    let wins = count_wins(matches, player_id);
    MonthSummary {
        matches: matches.len() as u32,
        wins,
        win_rate: percentage(wins, matches.len() as u32),
    }
}

fn month_starts(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let this_month = today.with_day(1).unwrap_or(today);
    let last_month = this_month
        .checked_sub_months(Months::new(1))
        .unwrap_or(this_month);
    (this_month, last_month)
}
