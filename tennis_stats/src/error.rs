use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsErrorKind {
    PointLog,
    DetailLevel,
    Config,
}

impl StatsErrorKind {
    pub(crate) fn from_code(code: &'static str) -> Self {
        match code {
            "E1001" | "E1002" => Self::PointLog,
            "E2001" => Self::DetailLevel,
            "E3001" => Self::Config,

            // Unknown codes are point-log problems; that is the only input we decode.
            _ => Self::PointLog,
        }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{code}: {message}")]
pub struct StatsError {
    pub code: &'static str,
    pub kind: StatsErrorKind,
    pub message: String,

    pub match_id: Option<String>,
    pub point_index: Option<usize>,
    pub context: Option<String>,
}

impl StatsError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: StatsErrorKind::from_code(code),
            message: message.into(),

            match_id: None,
            point_index: None,
            context: None,
        }
    }

    pub fn with_match_id(mut self, match_id: impl Into<String>) -> Self {
        self.match_id = Some(match_id.into());
        self
    }

    pub fn with_point_index(mut self, point_index: usize) -> Self {
        self.point_index = Some(point_index);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
