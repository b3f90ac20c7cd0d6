use std::fmt::Write;

use tennis_stats::MatchStats;

const LABEL_WIDTH: usize = 22;

/// Two-column table, p1 left and p2 right.
pub fn render_summary(stats: &MatchStats) -> String {
    if stats.total_points == 0 {
        return "No points recorded.\n".to_string();
    }

    let bp = &stats.break_points_by_player;
    let rows: Vec<(&str, [String; 2])> = vec![
        ("Points won", counts(stats.total_points_won_by_player)),
        ("Aces", counts(stats.aces_by_player)),
        ("Double faults", counts(stats.double_faults_by_player)),
        ("1st serve in", pcts(stats.first_serve_percentage_by_player)),
        ("2nd serve in", pcts(stats.second_serve_percentage_by_player)),
        ("Service points won", pcts(stats.service_points_won_percentage_by_player)),
        ("Return points won", pcts(stats.receiving_points_won_percentage_by_player)),
        ("Winners", counts(stats.winners_by_player)),
        ("Unforced errors", counts(stats.unforced_errors_by_player)),
        ("Forced errors", counts(stats.forced_errors_by_player)),
        ("Break points won", ratios(bp.converted, bp.opportunities)),
        (
            "Net points won",
            ratios(stats.net_points_won_by_player, stats.net_points_played_by_player),
        ),
        ("Longest run", counts(stats.longest_point_run_by_player)),
    ];

    let mut out = String::new();
    let _ = writeln!(out, "Total points: {}", stats.total_points);
    let _ = writeln!(out, "{:<LABEL_WIDTH$} | {:>8} | {:>8}", "", "p1", "p2");
    let _ = writeln!(out, "{:-<LABEL_WIDTH$}-|-{:->8}-|-{:->8}", "", "", "");
    for (label, [p1, p2]) in rows {
        let _ = writeln!(out, "{label:<LABEL_WIDTH$} | {p1:>8} | {p2:>8}");
    }
    out
}

fn counts(values: [u32; 2]) -> [String; 2] {
    values.map(|v| v.to_string())
}

fn ratios(won: [u32; 2], played: [u32; 2]) -> [String; 2] {
    [0, 1].map(|i| format!("{}/{}", won[i], played[i]))
}

fn pcts(values: [u32; 2]) -> [String; 2] {
    values.map(|v| format!("{v}%"))
}
