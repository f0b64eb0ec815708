use thiserror::Error;

/// Misuse of the synthesis builders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("only a default-exported function declaration may be anonymous")]
    AnonymousFunction,
    #[error("the `default` modifier requires `export`")]
    DefaultWithoutExport,
    #[error("item is not a function declaration")]
    NotAFunction,
}
