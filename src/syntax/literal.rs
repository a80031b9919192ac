//! Literal data as produced by the structured-data front end.

use crate::runtime::error::{ErrorKind, FlexError};

/// Decoded literal tree. Object entries keep their source order.
pub type Literal = serde_json::Value;

/// Reserved key tagging an array literal: `{"@": [...]}`.
pub const ARRAY_TAG: &str = "@";

/// Reserved key tagging a dict literal: `{"!": {...}}`.
pub const DICT_TAG: &str = "!";

/// Decodes JSON text into a literal tree.
pub fn decode(source: &str) -> Result<Literal, FlexError> {
    serde_json::from_str(source).map_err(|err| {
        FlexError::new(ErrorKind::Decode, format!("Provide valid JSON! ({})", err))
    })
}

/// Renders a literal back to the compact text used in diagnostics.
pub fn render(literal: &Literal) -> String {
    match literal {
        Literal::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_keeps_object_entry_order() {
        let literal = decode(r#"{"!": {"z": 1, "a": 2, "m": 3}}"#).unwrap();
        let keys: Vec<&String> = literal[DICT_TAG].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn decode_reports_invalid_json() {
        let err = decode("[1, 2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.message().starts_with("Provide valid JSON!"));
    }

    #[test]
    fn render_leaves_tokens_bare() {
        assert_eq!(render(&Literal::String("$x".to_string())), "$x");
        assert_eq!(render(&serde_json::json!({"@": [1]})), r#"{"@":[1]}"#);
    }
}
