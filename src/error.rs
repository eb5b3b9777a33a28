use thiserror::Error;

pub type AxisResult<T> = Result<T, AxisError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AxisError {
    #[error("degenerate scale range: begin={begin}, end={end}")]
    DegenerateRange { begin: f64, end: f64 },

    #[error("non-finite value produced while computing {stage}")]
    NonFiniteCandidate { stage: &'static str },

    #[error("invalid scale increment: {0}")]
    InvalidIncrement(f64),

    #[error("unknown axis option `{0}`")]
    UnknownOption(String),

    #[error("axis option `{name}` expects a {expected} value")]
    OptionType {
        name: String,
        expected: &'static str,
    },

    #[error("invalid axis configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
