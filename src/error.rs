use thiserror::Error;

/// Errors raised at the boundary of the regridding core.
///
/// These are precondition violations caught before any per-point work
/// begins. Out-of-domain query points are not errors; they produce NaN.
#[derive(Error, Debug)]
pub enum RegridError {
    #[error("shape mismatch for {context}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("grid too small along {axis}: need at least 2 points, found {len}")]
    GridTooSmall { axis: &'static str, len: usize },

    #[error("field not found: {0}")]
    UnknownField(String),

    #[error("no fields requested")]
    EmptyFieldList,

    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}
