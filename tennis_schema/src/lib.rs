use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

/// One of the two sides of a singles match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "p1")]
    P1,
    #[serde(rename = "p2")]
    P2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];

    pub fn opponent(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    /// Position of this side in per-player `[_; 2]` arrays.
    pub fn index(self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::P1 => f.write_str("p1"),
            Side::P2 => f.write_str("p2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointOutcome {
    Winner,
    UnforcedError,
    ForcedError,
    Ace,
    DoubleFault,
}

impl PointOutcome {
    pub fn is_error(self) -> bool {
        matches!(self, PointOutcome::UnforcedError | PointOutcome::ForcedError)
    }

    /// Outcomes decided by a rally shot rather than by the serve alone.
    pub fn is_rally_ending(self) -> bool {
        matches!(
            self,
            PointOutcome::Winner | PointOutcome::UnforcedError | PointOutcome::ForcedError
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServeType {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Forehand,
    Backhand,
    Volley,
    Overhead,
    DropShot,
    Lob,
    Serve,
}

impl ShotType {
    pub fn is_net_shot(self) -> bool {
        matches!(self, ShotType::Volley | ShotType::Overhead)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtPosition {
    Deuce,
    Ad,
    Net,
    Baseline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServePlacement {
    Wide,
    Body,
    #[serde(rename = "t", alias = "T")]
    T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotDirection {
    #[serde(alias = "cross")]
    CrossCourt,
    #[serde(alias = "line")]
    DownTheLine,
    Body,
    Long,
    Wide,
    Net,
}

impl ShotDirection {
    pub const ALL: [ShotDirection; 6] = [
        ShotDirection::CrossCourt,
        ShotDirection::DownTheLine,
        ShotDirection::Body,
        ShotDirection::Long,
        ShotDirection::Wide,
        ShotDirection::Net,
    ];
}

/// Enrichment fields only feed the detailed breakdowns, so a value this
/// version does not recognise is read as absent instead of rejecting the point.
fn lenient_enrichment<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// A single recorded point. Immutable once logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    pub point_number: u32,
    pub set_number: u32,
    pub game_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_score: Option<String>,

    pub winner: Side,
    pub server: Side,

    pub serve_type: ServeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_outcome: Option<PointOutcome>,
    #[serde(
        default,
        deserialize_with = "lenient_enrichment",
        skip_serializing_if = "Option::is_none"
    )]
    pub serve_placement: Option<ServePlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_speed: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rally_length: Option<u32>,
    pub point_outcome: PointOutcome,
    #[serde(
        default,
        deserialize_with = "lenient_enrichment",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_shot_type: Option<ShotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_shot_player: Option<Side>,
    #[serde(
        default,
        deserialize_with = "lenient_enrichment",
        skip_serializing_if = "Option::is_none"
    )]
    pub shot_direction: Option<ShotDirection>,
    #[serde(
        default,
        deserialize_with = "lenient_enrichment",
        skip_serializing_if = "Option::is_none"
    )]
    pub court_position: Option<CourtPosition>,

    #[serde(default)]
    pub is_break_point: bool,
    #[serde(default)]
    pub is_set_point: bool,
    #[serde(default)]
    pub is_match_point: bool,
    #[serde(default)]
    pub is_game_winning: bool,
    #[serde(default)]
    pub is_set_winning: bool,
    #[serde(default)]
    pub is_match_winning: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PointRecord {
    /// Minimal point with every optional field empty and every flag cleared.
    pub fn new(
        point_number: u32,
        server: Side,
        winner: Side,
        serve_type: ServeType,
        point_outcome: PointOutcome,
    ) -> Self {
        Self {
            id: None,
            timestamp: None,
            point_number,
            set_number: 1,
            game_number: 1,
            game_score: None,
            winner,
            server,
            serve_type,
            serve_outcome: None,
            serve_placement: None,
            serve_speed: None,
            rally_length: None,
            point_outcome,
            last_shot_type: None,
            last_shot_player: None,
            shot_direction: None,
            court_position: None,
            is_break_point: false,
            is_set_point: false,
            is_match_point: false,
            is_game_winning: false,
            is_set_winning: false,
            is_match_winning: false,
            notes: None,
        }
    }

    pub fn receiver(&self) -> Side {
        self.server.opponent()
    }

    pub fn server_won(&self) -> bool {
        self.winner == self.server
    }

    /// Who hit the shot that decided the point.
    ///
    /// Recorded `lastShotPlayer` wins. Otherwise a winner belongs to the point
    /// winner and an error to the point loser. Aces and double faults are
    /// always the server's.
    pub fn shot_owner(&self) -> Side {
        match self.point_outcome {
            PointOutcome::Ace | PointOutcome::DoubleFault => self.server,
            PointOutcome::Winner => self.last_shot_player.unwrap_or(self.winner),
            PointOutcome::UnforcedError | PointOutcome::ForcedError => {
                self.last_shot_player.unwrap_or(self.winner.opponent())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    InProgress,
    Completed,
    Other(String),
}

impl From<String> for MatchStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "completed" => MatchStatus::Completed,
            "in progress" | "in_progress" | "inprogress" => MatchStatus::InProgress,
            _ => MatchStatus::Other(value),
        }
    }
}

impl From<MatchStatus> for String {
    fn from(value: MatchStatus) -> Self {
        match value {
            MatchStatus::InProgress => "In Progress".to_string(),
            MatchStatus::Completed => "Completed".to_string(),
            MatchStatus::Other(s) => s,
        }
    }
}

/// How much per-point detail was captured while logging a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DetailLevel {
    PointsOnly,
    Simple,
    /// Also accepted as `complex`.
    Detailed,
    Custom,
}

impl DetailLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DetailLevel::PointsOnly => "points",
            DetailLevel::Simple => "simple",
            DetailLevel::Detailed => "detailed",
            DetailLevel::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDetailLevel(pub String);

impl fmt::Display for UnknownDetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown detail level: {}", self.0)
    }
}

impl std::error::Error for UnknownDetailLevel {}

impl FromStr for DetailLevel {
    type Err = UnknownDetailLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "points" | "points-only" | "points_only" => Ok(DetailLevel::PointsOnly),
            "simple" => Ok(DetailLevel::Simple),
            "detailed" | "complex" => Ok(DetailLevel::Detailed),
            "custom" => Ok(DetailLevel::Custom),
            _ => Err(UnknownDetailLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for DetailLevel {
    type Error = UnknownDetailLevel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DetailLevel> for String {
    fn from(value: DetailLevel) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFormat {
    pub sets: u8,
    #[serde(default)]
    pub no_ad: bool,
    #[serde(default)]
    pub tiebreak: bool,
    #[serde(default)]
    pub final_set_tiebreak: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_set_tiebreak_at: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_sets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<DetailLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(rename = "$id")]
    pub id: String,
    pub player_one_id: String,
    pub player_two_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_three_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_four_id: Option<String>,
    pub match_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_format: Option<String>,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    /// One JSON-encoded [`PointRecord`] per entry.
    #[serde(default)]
    pub point_log: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Match {
    pub fn side_of(&self, player_id: &str) -> Option<Side> {
        if self.player_one_id == player_id {
            Some(Side::P1)
        } else if self.player_two_id == player_id {
            Some(Side::P2)
        } else {
            None
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn is_won_by(&self, player_id: &str) -> bool {
        self.winner_id.as_deref() == Some(player_id)
    }

    /// Parses `matchDate` as RFC 3339, a naive date-time, or a plain date.
    pub fn played_at(&self) -> Option<NaiveDateTime> {
        let raw = self.match_date.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    pub fn format(&self) -> Option<MatchFormat> {
        let raw = self.match_format.as_deref()?;
        serde_json::from_str(raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_record_uses_camel_case_and_snake_case_enums() {
        let mut point = PointRecord::new(3, Side::P1, Side::P2, ServeType::Second, PointOutcome::ForcedError);
        point.last_shot_type = Some(ShotType::DropShot);
        point.is_break_point = true;

        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["pointNumber"], 3);
        assert_eq!(json["server"], "p1");
        assert_eq!(json["winner"], "p2");
        assert_eq!(json["serveType"], "second");
        assert_eq!(json["pointOutcome"], "forced_error");
        assert_eq!(json["lastShotType"], "drop_shot");
        assert_eq!(json["isBreakPoint"], true);
        assert!(json.get("courtPosition").is_none());
    }

    #[test]
    fn point_record_flags_default_to_false() {
        let v = serde_json::json!({
            "pointNumber": 1,
            "setNumber": 1,
            "gameNumber": 1,
            "winner": "p1",
            "server": "p1",
            "serveType": "first",
            "pointOutcome": "ace",
            "servePlacement": "t"
        });

        let point: PointRecord = serde_json::from_value(v).unwrap();
        assert!(!point.is_break_point);
        assert!(!point.is_match_winning);
        assert_eq!(point.serve_placement, Some(ServePlacement::T));
    }

    #[test]
    fn every_logged_shot_direction_decodes() {
        for (raw, expected) in [
            ("cross", ShotDirection::CrossCourt),
            ("line", ShotDirection::DownTheLine),
            ("body", ShotDirection::Body),
            ("long", ShotDirection::Long),
            ("wide", ShotDirection::Wide),
            ("net", ShotDirection::Net),
        ] {
            let v = serde_json::json!({
                "pointNumber": 1, "setNumber": 1, "gameNumber": 1,
                "winner": "p1", "server": "p1", "serveType": "first",
                "pointOutcome": "winner", "shotDirection": raw
            });
            let point: PointRecord = serde_json::from_value(v).unwrap();
            assert_eq!(point.shot_direction, Some(expected));
        }
    }

    #[test]
    fn unrecognised_enrichment_values_read_as_absent() {
        let v = serde_json::json!({
            "pointNumber": 1, "setNumber": 1, "gameNumber": 1,
            "winner": "p2", "server": "p1", "serveType": "first",
            "pointOutcome": "forced_error",
            "shotDirection": "inside_out",
            "servePlacement": "jam",
            "courtPosition": "service_line",
            "lastShotType": "tweener"
        });
        let point: PointRecord = serde_json::from_value(v).unwrap();
        assert_eq!(point.winner, Side::P2);
        assert_eq!(point.shot_direction, None);
        assert_eq!(point.serve_placement, None);
        assert_eq!(point.court_position, None);
        assert_eq!(point.last_shot_type, None);

        let v = serde_json::json!({
            "pointNumber": 1, "setNumber": 1, "gameNumber": 1,
            "winner": "p2", "server": "p1", "serveType": "first",
            "pointOutcome": "forced_error", "shotDirection": null
        });
        let point: PointRecord = serde_json::from_value(v).unwrap();
        assert_eq!(point.shot_direction, None);
    }

    #[test]
    fn unknown_side_is_rejected() {
        let v = serde_json::json!({
            "pointNumber": 1,
            "setNumber": 1,
            "gameNumber": 1,
            "winner": "p1",
            "server": "p3",
            "serveType": "first",
            "pointOutcome": "ace"
        });
        assert!(serde_json::from_value::<PointRecord>(v).is_err());
    }

    #[test]
    fn shot_owner_follows_attribution_rules() {
        let mut p = PointRecord::new(1, Side::P1, Side::P1, ServeType::First, PointOutcome::UnforcedError);
        assert_eq!(p.shot_owner(), Side::P2);
        p.last_shot_player = Some(Side::P1);
        assert_eq!(p.shot_owner(), Side::P1);

        let mut df = PointRecord::new(2, Side::P1, Side::P2, ServeType::Second, PointOutcome::DoubleFault);
        df.last_shot_player = Some(Side::P2);
        assert_eq!(df.shot_owner(), Side::P1);
    }

    #[test]
    fn match_status_is_case_insensitive() {
        let s: MatchStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(s, MatchStatus::Completed);
        let s: MatchStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(s, MatchStatus::InProgress);
        let s: MatchStatus = serde_json::from_str("\"abandoned\"").unwrap();
        assert_eq!(s, MatchStatus::Other("abandoned".to_string()));
        assert_eq!(serde_json::to_string(&MatchStatus::Completed).unwrap(), "\"Completed\"");
    }

    #[test]
    fn detail_level_accepts_aliases() {
        assert_eq!("complex".parse::<DetailLevel>().unwrap(), DetailLevel::Detailed);
        assert_eq!("points-only".parse::<DetailLevel>().unwrap(), DetailLevel::PointsOnly);
        assert_eq!("points".parse::<DetailLevel>().unwrap(), DetailLevel::PointsOnly);
        assert!("verbose".parse::<DetailLevel>().is_err());
    }

    #[test]
    fn match_resolves_side_date_and_format() {
        let v = serde_json::json!({
            "$id": "m1",
            "playerOneId": "alice",
            "playerTwoId": "bob",
            "matchDate": "2024-05-01T10:30:00.000Z",
            "matchFormat": "{\"sets\":3,\"noAd\":false,\"tiebreak\":true,\"finalSetTiebreak\":true,\"detailLevel\":\"complex\"}",
            "status": "Completed",
            "winnerId": "bob"
        });

        let m: Match = serde_json::from_value(v).unwrap();
        assert_eq!(m.side_of("alice"), Some(Side::P1));
        assert_eq!(m.side_of("bob"), Some(Side::P2));
        assert_eq!(m.side_of("carol"), None);
        assert!(m.is_completed());
        assert!(m.is_won_by("bob"));
        assert!(m.point_log.is_empty());

        let played = m.played_at().unwrap();
        assert_eq!(played.date(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        let format = m.format().unwrap();
        assert_eq!(format.sets, 3);
        assert_eq!(format.detail_level, Some(DetailLevel::Detailed));
    }

    #[test]
    fn plain_date_parses_and_garbage_does_not() {
        let mut m = Match {
            id: "m".to_string(),
            player_one_id: "a".to_string(),
            player_two_id: "b".to_string(),
            player_three_id: None,
            player_four_id: None,
            match_date: "2023-12-31".to_string(),
            match_format: None,
            status: MatchStatus::InProgress,
            winner_id: None,
            score: None,
            point_log: vec![],
            user_id: None,
        };
        assert!(m.played_at().is_some());
        m.match_date = "last tuesday".to_string();
        assert!(m.played_at().is_none());
    }
}
