//! Custom ID encoding for pagination controls.
//!
//! Session state lives in the session task; a control only names its
//! session and the action it performs.

use super::session::NavAction;

const TOKEN_PREFIX: &str = "pg";

/// Parsed pagination control custom ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavToken {
    pub session_id: u64,
    pub action: NavAction,
}

/// Build the custom ID for one navigation control.
pub fn build_custom_id(session_id: u64, action: NavAction) -> String {
    format!("{TOKEN_PREFIX}:{session_id}:{}", action.as_str())
}

/// Whether a custom ID belongs to a pagination control at all.
pub fn is_pagination_custom_id(custom_id: &str) -> bool {
    custom_id
        .strip_prefix(TOKEN_PREFIX)
        .is_some_and(|rest| rest.starts_with(':'))
}

/// Parse a pagination control custom ID.
pub fn parse_custom_id(custom_id: &str) -> Option<NavToken> {
    let mut parts = custom_id.split(':');

    if parts.next()? != TOKEN_PREFIX {
        return None;
    }

    let session_id = parts.next()?.parse::<u64>().ok()?;
    let action = NavAction::parse(parts.next()?)?;

    if parts.next().is_some() {
        return None;
    }

    Some(NavToken { session_id, action })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_built_ids() {
        let raw = build_custom_id(812_345, NavAction::Toggle);
        assert_eq!(raw, "pg:812345:toggle");
        assert_eq!(
            parse_custom_id(&raw),
            Some(NavToken {
                session_id: 812_345,
                action: NavAction::Toggle
            })
        );
    }

    #[test]
    fn rejects_foreign_or_malformed_ids() {
        assert_eq!(parse_custom_id("pgm:1:next"), None);
        assert_eq!(parse_custom_id("pg:abc:next"), None);
        assert_eq!(parse_custom_id("pg:1:jump"), None);
        assert_eq!(parse_custom_id("pg:1:next:extra"), None);
        assert!(is_pagination_custom_id("pg:1:bogus"));
        assert!(!is_pagination_custom_id("pgm:1:next"));
    }
}
