use thiserror::Error;

#[derive(Error, Debug)]
pub enum UmbraError {
    #[error("Unknown solar system body: {0}")]
    UnknownBody(String),

    #[error("No heliocentric series available for body: {0}")]
    UnsupportedBody(String),

    #[error("Invalid ΔT table: {0}")]
    InvalidDeltaTTable(String),

    #[error("Unable to parse ΔT table line {line}: {reason}")]
    DeltaTParse { line: usize, reason: String },

    #[error("Invalid eclipse parameter: {0}")]
    InvalidEclipseParameter(String),

    #[error("Invalid date: {0}")]
    InvalidDate(#[from] hifitime::HifitimeError),
}

impl PartialEq for UmbraError {
    fn eq(&self, other: &Self) -> bool {
        use UmbraError::*;
        match (self, other) {
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (UnsupportedBody(a), UnsupportedBody(b)) => a == b,
            (InvalidDeltaTTable(a), InvalidDeltaTTable(b)) => a == b,
            (
                DeltaTParse {
                    line: la,
                    reason: ra,
                },
                DeltaTParse {
                    line: lb,
                    reason: rb,
                },
            ) => la == lb && ra == rb,
            (InvalidEclipseParameter(a), InvalidEclipseParameter(b)) => a == b,

            // hifitime errors are compared by variant only
            (InvalidDate(_), InvalidDate(_)) => true,

            _ => false,
        }
    }
}
