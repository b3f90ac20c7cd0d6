use std::{
    env,
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

const POINTS: &str = r#"[
  {"pointNumber":1,"setNumber":1,"gameNumber":1,"winner":"p1","server":"p1","serveType":"first","pointOutcome":"ace","servePlacement":"T"},
  {"pointNumber":2,"setNumber":1,"gameNumber":1,"winner":"p2","server":"p1","serveType":"second","pointOutcome":"double_fault"},
  "{\"pointNumber\":3,\"setNumber\":2,\"gameNumber\":1,\"winner\":\"p1\",\"server\":\"p2\",\"serveType\":\"first\",\"pointOutcome\":\"winner\",\"lastShotType\":\"forehand\",\"isBreakPoint\":true,\"isGameWinning\":true}"
]"#;

const MATCHES: &str = r#"[
  {"$id":"m1","playerOneId":"me","playerTwoId":"opp","matchDate":"2024-05-01","status":"Completed","winnerId":"me"},
  {"$id":"m2","playerOneId":"opp","playerTwoId":"me","matchDate":"2024-05-08","status":"Completed","winnerId":"me"},
  {"$id":"m3","playerOneId":"me","playerTwoId":"opp","matchDate":"2024-05-15","status":"In Progress"}
]"#;

fn norm_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("tennis_stats_cli_{name}_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(dir: &Path, file: &str, contents: &str) -> String {
    let path = dir.join(file);
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

fn run(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_tennis_stats_cli");
    Command::new(exe)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn match_writes_stats_json() {
    let dir = scratch_dir("match_output");
    let input = write_file(&dir, "points.json", POINTS);
    let output_path = dir.join("stats.json");

    let out = run(&["match", &input, "-o", output_path.to_str().unwrap()]);
    assert!(out.status.success());

    let json = fs::read_to_string(&output_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["totalPoints"], 3);
    assert_eq!(v["acesByPlayer"], serde_json::json!([1, 0]));
    assert_eq!(v["doubleFaultsByPlayer"], serde_json::json!([1, 0]));
    assert_eq!(v["breakPointsByPlayer"]["converted"], serde_json::json!([1, 0]));
    assert_eq!(v["shotTypesByPlayer"][0]["forehandWinners"], 1);
}

#[test]
fn match_points_only_level_leaves_outcomes_empty() {
    let dir = scratch_dir("match_level");
    let input = write_file(&dir, "points.json", POINTS);

    let out = run(&["match", &input, "--level", "points"]);
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert_eq!(v["totalPointsWonByPlayer"], serde_json::json!([2, 1]));
    assert_eq!(v["acesByPlayer"], serde_json::json!([0, 0]));
}

#[test]
fn match_by_set_is_keyed_by_set_number() {
    let dir = scratch_dir("match_by_set");
    let input = write_file(&dir, "points.json", POINTS);

    let out = run(&["match", &input, "--by-set"]);
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert_eq!(v["1"]["totalPoints"], 2);
    assert_eq!(v["2"]["totalPoints"], 1);
}

#[test]
fn match_detailed_includes_breakdowns() {
    let dir = scratch_dir("match_detailed");
    let input = write_file(&dir, "points.json", POINTS);

    let out = run(&["match", &input, "--detailed"]);
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert_eq!(v["totalPoints"], 3);
    assert_eq!(v["hasDetailedData"], true);
    assert_eq!(v["serveDirectionByPlayer"][0]["t"]["aces"], 1);
    assert_eq!(v["momentum"]["window"], 5);
}

#[test]
fn unknown_level_is_e2001() {
    let dir = scratch_dir("bad_level");
    let input = write_file(&dir, "points.json", POINTS);

    let out = run(&["match", &input, "--level", "bogus"]);
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: invalid --level: bogus"));
    assert!(stderr.contains("Caused by:"));
    assert!(stderr.contains("E2001: unknown detail level: bogus"));
}

#[test]
fn missing_points_file_is_reported() {
    let missing = env::temp_dir().join(format!(
        "tennis_stats_cli_missing_points_{}.json",
        std::process::id()
    ));
    let _ = fs::remove_file(&missing);

    let out = run(&["match", missing.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to read points: "));
    assert!(stderr.contains("Caused by:"));
}

#[test]
fn invalid_config_is_e3001() {
    let dir = scratch_dir("bad_config");
    let input = write_file(&dir, "matches.json", MATCHES);
    let config = write_file(&dir, "config.json", r#"{"cache":{"ttlSecs":0}}"#);

    let out = run(&["instant", &input, "--player", "me", "--config", &config]);
    assert_eq!(out.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: invalid config: "));
    assert!(stderr.contains("E3001: cache.ttlSecs must be >= 1"));
}

#[test]
fn player_aggregates_completed_matches() {
    let dir = scratch_dir("player");
    let input = write_file(&dir, "matches.json", MATCHES);

    let out = run(&["player", &input, "--player", "me"]);
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert_eq!(v["totalMatches"], 2);
    assert_eq!(v["matchesWon"], 2);
    assert_eq!(v["winRate"], 100);
    assert_eq!(v["winStreak"], 0);
    assert_eq!(v["maxWinStreak"], 2);
}

#[test]
fn strict_player_rejects_malformed_point_log() {
    let dir = scratch_dir("player_strict");
    let matches = r#"[
  {"$id":"m1","playerOneId":"me","playerTwoId":"opp","matchDate":"2024-05-01","status":"Completed","winnerId":"me","pointLog":["not json"]}
]"#;
    let input = write_file(&dir, "matches.json", matches);

    let lenient = run(&["player", &input, "--player", "me"]);
    assert!(lenient.status.success());
    assert_eq!(stdout_json(&lenient)["matchesWithPointData"], 0);

    let out = run(&["player", &input, "--player", "me", "--strict"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: invalid point log"));
    assert!(stderr.contains("E1001: invalid point entry"));
}

#[test]
fn instant_reports_next_milestone() {
    let dir = scratch_dir("instant");
    let input = write_file(&dir, "matches.json", MATCHES);

    let out = run(&["instant", &input, "--player", "me"]);
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert_eq!(v["totalMatches"], 2);
    assert_eq!(v["nextMilestone"]["type"], "matches");
    assert_eq!(v["nextMilestone"]["target"], 5);
    assert_eq!(v["nextMilestone"]["description"], "3 matches to go");
}

#[test]
fn summary_prints_table() {
    let dir = scratch_dir("summary");
    let input = write_file(&dir, "points.json", POINTS);

    let out = run(&["summary", &input]);
    assert!(out.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.starts_with("Total points: 3\n"));
    assert!(stdout.contains("Break points won"));
}

#[test]
fn output_write_failure_is_reported() {
    let dir = scratch_dir("write_failure");
    let input = write_file(&dir, "points.json", POINTS);
    let missing_parent = dir.join(format!("missing_dir_{}", std::process::id()));
    let _ = fs::remove_dir_all(&missing_parent);
    let output_path = missing_parent.join("stats.json");

    let out = run(&["match", &input, "-o", output_path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to write:"));
    assert!(stderr.contains("stats.json"));
    assert!(stderr.contains("Caused by:"));
}

#[test]
fn help_lists_subcommands() {
    let out = run(&["--help"]);
    assert!(out.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    for sub in ["match", "player", "instant", "summary"] {
        assert!(stdout.contains(sub));
    }
}
