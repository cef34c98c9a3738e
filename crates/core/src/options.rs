//! Selected-options parsing.
//!
//! An option list enters the system from three places: submit payloads,
//! admin edit payloads, and restored backups. Only the first is guaranteed
//! to be a JSON array; the other two may carry a serialized list produced
//! by older exports (a JSON string, or a comma-separated string using
//! either the ASCII comma or the full-width CJK comma). This module
//! normalizes all of them to a plain `Vec<String>`.

use serde::Deserialize;

/// Separators accepted in legacy comma-separated option lists.
const SEPARATORS: [char; 2] = [',', '，'];

/// A selected-options value as it arrives from outside.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SelectedOptionsInput {
    /// A proper JSON array of option texts.
    List(Vec<String>),
    /// A string carrying a serialized list.
    Text(String),
}

impl SelectedOptionsInput {
    /// Normalize to a plain list of option texts.
    ///
    /// A string starting with `[` must parse as a JSON string array;
    /// any other string is split on commas. Errors carry a human-readable
    /// message suitable for a 400 response.
    pub fn parse(&self) -> Result<Vec<String>, String> {
        match self {
            SelectedOptionsInput::List(options) => Ok(options.clone()),
            SelectedOptionsInput::Text(raw) => parse_option_text(raw),
        }
    }
}

impl From<Vec<String>> for SelectedOptionsInput {
    fn from(options: Vec<String>) -> Self {
        SelectedOptionsInput::List(options)
    }
}

/// Parse a serialized option list.
pub fn parse_option_text(raw: &str) -> Result<Vec<String>, String> {
    if raw.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<String>>(raw)
            .map_err(|e| format!("Malformed option list: {e}"))
    } else {
        Ok(split_option_list(raw))
    }
}

/// Split a legacy comma-separated option list, trimming entries and
/// dropping empties.
pub fn split_option_list(raw: &str) -> Vec<String> {
    raw.split(SEPARATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- split_option_list ---------------------------------------------------

    #[test]
    fn splits_on_ascii_comma() {
        assert_eq!(split_option_list("Red,Blue"), vec!["Red", "Blue"]);
    }

    #[test]
    fn splits_on_fullwidth_comma() {
        assert_eq!(split_option_list("红，蓝"), vec!["红", "蓝"]);
    }

    #[test]
    fn trims_and_drops_empty_entries() {
        assert_eq!(split_option_list(" Red , ,Blue, "), vec!["Red", "Blue"]);
    }

    #[test]
    fn single_value_without_separator() {
        assert_eq!(split_option_list("Green"), vec!["Green"]);
    }

    // -- parse_option_text ---------------------------------------------------

    #[test]
    fn json_array_string_parsed() {
        assert_eq!(
            parse_option_text(r#"["Red","Blue"]"#).unwrap(),
            vec!["Red", "Blue"]
        );
    }

    #[test]
    fn malformed_json_array_rejected() {
        let err = parse_option_text(r#"["Red","#).unwrap_err();
        assert!(err.contains("Malformed option list"));
    }

    #[test]
    fn json_array_of_non_strings_rejected() {
        assert!(parse_option_text("[1,2,3]").is_err());
    }

    #[test]
    fn plain_string_falls_back_to_comma_split() {
        assert_eq!(parse_option_text("Red, Blue").unwrap(), vec!["Red", "Blue"]);
    }

    // -- SelectedOptionsInput ------------------------------------------------

    #[test]
    fn untagged_list_form_deserializes() {
        let input: SelectedOptionsInput =
            serde_json::from_str(r#"["Red","Blue"]"#).unwrap();
        assert_eq!(input.parse().unwrap(), vec!["Red", "Blue"]);
    }

    #[test]
    fn untagged_text_form_deserializes() {
        let input: SelectedOptionsInput = serde_json::from_str(r#""Red,Blue""#).unwrap();
        assert_eq!(input.parse().unwrap(), vec!["Red", "Blue"]);
    }

    #[test]
    fn text_form_carrying_json_deserializes() {
        let input: SelectedOptionsInput =
            serde_json::from_str(r#""[\"Red\",\"Blue\"]""#).unwrap();
        assert_eq!(input.parse().unwrap(), vec!["Red", "Blue"]);
    }
}
