//! Input resolution: turn raw CLI strings into a `State` and `KeywordSet`.

use tracing::debug;

use crate::domain::{KeywordSet, State, lookup_state};
use crate::error::AppError;

/// Validated inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub state: State,
    pub keywords: KeywordSet,
}

/// Resolve the state name and validate the keyword list.
pub fn resolve_input<S: AsRef<str>>(state: &str, keywords: &[S]) -> Result<ResolvedInput, AppError> {
    let resolved = lookup_state(state).ok_or_else(|| AppError::invalid_state(state.trim()))?;
    let keywords = KeywordSet::parse(keywords)?;
    debug!(state = resolved.name, abbr = resolved.abbr, keywords = ?keywords.as_slice(), "resolved input");
    Ok(ResolvedInput {
        state: resolved,
        keywords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_state_and_keywords() {
        let input = resolve_input("california", &["hiking", "bread"]).unwrap();
        assert_eq!(input.state.abbr, "CA");
        assert_eq!(input.state.locale(), "en-US-CA");
        assert_eq!(input.keywords.len(), 2);
    }

    #[test]
    fn unknown_state_is_invalid_state_error() {
        let err = resolve_input("Narnia", &["hiking"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().starts_with("Invalid state 'Narnia'"));
    }
}
