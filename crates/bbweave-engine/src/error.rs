use thiserror::Error;

/// Errors surfaced by [`parse`](crate::parse).
///
/// Malformed markup never produces an error: unknown, unmatched and
/// disallowed tags degrade to plain content. The only condition reported to
/// the caller is input nested deeper than the configured limit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("tags nested deeper than {limit} levels")]
    TooDeeplyNested { limit: usize },
}
