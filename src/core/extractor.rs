//! Decipher-logic extraction from player script text
//!
//! Player scripts are minified and re-versioned constantly, so the extractor
//! recognizes a small set of structural shapes instead of parsing JS. It
//! fails closed: text that matches no known shape is reported, not guessed at.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SiftError;

/// Extracted decipher logic for one player script version.
///
/// `transform_table_body` maps short method names to one of three primitive
/// behaviors (splice off a prefix, swap with index `n % len`, reverse).
/// Extraction captures structure only; running the operations against a real
/// signature is left to a downstream evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecipherProgram {
    /// Ordered calls the decipher routine applies to the split signature,
    /// kept as source text
    pub operation_sequence: String,
    /// Identifier the transform table is defined under
    pub transform_table_name: String,
    /// Verbatim source of the `var <name> = {...};` table declaration
    pub transform_table_body: String,
}

/// One recognized decipher-function layout.
///
/// Strategies run in order and the first match wins, so supporting a new
/// player layout means appending a strategy, not rewriting existing ones.
#[derive(Debug, Clone, Copy)]
struct PatternStrategy {
    name: &'static str,
    pattern: &'static str,
    body_group: usize,
}

const STRATEGIES: &[PatternStrategy] = &[
    // X.sig||X.sig=function(a){a=a.split("");...;return a.join("")}
    PatternStrategy {
        name: "sig-guard",
        pattern: r#"(?s)([a-zA-Z0-9_$]+)\.sig\|\|([a-zA-Z0-9_$]+)\.sig\s*=\s*function\s*\(\s*a\s*\)\s*\{\s*a\s*=\s*a\.split\(""\)\s*;(.*?)return\s+a\.join\(""\)\s*\}"#,
        body_group: 3,
    },
    // var N=function(a){a=a.split("");...;return a.join("")}
    PatternStrategy {
        name: "var-assigned",
        pattern: r#"(?s)(?:var|let|const)\s+([a-zA-Z0-9_$]+)\s*=\s*function\s*\(\s*a\s*\)\s*\{\s*a\s*=\s*a\.split\(""\)\s*;(.*?)return\s+a\.join\(""\)\s*\}"#,
        body_group: 2,
    },
];

/// Extract the decipher operation sequence and its transform table from
/// player script text.
///
/// Pure and deterministic: the same text always yields the same result.
/// `PatternNotFound` and `TableNotFound` recur for a given script version
/// until the strategy list is updated, so they signal maintenance, not a
/// condition worth retrying.
pub fn extract(script: &str) -> Result<DecipherProgram, SiftError> {
    let operation_sequence = locate_operation_sequence(script)?;
    let transform_table_name = locate_table_reference(&operation_sequence)?;
    let transform_table_body = locate_table_definition(script, &transform_table_name)?;

    debug!(
        "Extracted decipher program: table `{}`, {} operation bytes",
        transform_table_name,
        operation_sequence.len()
    );

    Ok(DecipherProgram {
        operation_sequence,
        transform_table_name,
        transform_table_body,
    })
}

/// Try each layout strategy in order; capture the decipher body verbatim
fn locate_operation_sequence(script: &str) -> Result<String, SiftError> {
    for strategy in STRATEGIES {
        let re = Regex::new(strategy.pattern)?;
        if let Some(captures) = re.captures(script) {
            if let Some(body) = captures.get(strategy.body_group) {
                debug!("Decipher layout matched: {}", strategy.name);
                return Ok(body.as_str().trim().to_string());
            }
        }
        debug!("Decipher layout did not match: {}", strategy.name);
    }

    Err(SiftError::PatternNotFound(
        "no known decipher function layout matched the player script".to_string(),
    ))
}

/// Find the first `<NAME>.<method>(a, <n>)` call in the decipher body.
///
/// A body with no such call references no transform table, which makes the
/// whole match malformed.
fn locate_table_reference(body: &str) -> Result<String, SiftError> {
    let re = Regex::new(r"([a-zA-Z0-9_$]+)\.[a-zA-Z0-9_$]+\(a,\s*\d+\)")?;
    match re.captures(body).and_then(|captures| captures.get(1)) {
        Some(name) => {
            let name = name.as_str().to_string();
            debug!("Decipher body references transform table `{}`", name);
            Ok(name)
        }
        None => Err(SiftError::PatternNotFound(
            "decipher body references no transform table".to_string(),
        )),
    }
}

/// Find the verbatim `var <name> = {...};` declaration for the table.
///
/// The identifier is matched literally, marker characters like `$` included.
fn locate_table_definition(script: &str, name: &str) -> Result<String, SiftError> {
    let pattern = format!(r#"(?s)var\s+{}\s*=\s*\{{.*?\}}\s*;"#, regex::escape(name));
    let re = Regex::new(&pattern)?;
    match re.find(script) {
        Some(found) => Ok(found.as_str().to_string()),
        None => Err(SiftError::TableNotFound(format!(
            "no `var {} = {{...}};` declaration in the player script",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER_SCRIPT: &str = r#"var v="player_2025";var Nv={kT:function(a){a.reverse()},q2:function(a,b){a.splice(0,b)},wB:function(a,b){var c=a[0];a[0]=a[b%a.length];a[b%a.length]=c}};Mta.sig||Mta.sig=function(a){a=a.split("");Nv.wB(a,1);Nv.q2(a,3);Nv.kT(a,69);return a.join("")};g.h=function(a){return Mta.sig(a)};"#;

    #[test]
    fn test_extract_well_formed_script() {
        let program = extract(PLAYER_SCRIPT).unwrap();
        assert_eq!(
            program.operation_sequence,
            "Nv.wB(a,1);Nv.q2(a,3);Nv.kT(a,69);"
        );
        assert_eq!(program.transform_table_name, "Nv");
        assert!(program.transform_table_body.starts_with("var Nv={"));
        assert!(program.transform_table_body.ends_with("};"));
    }

    #[test]
    fn test_table_name_appears_verbatim_in_body() {
        let program = extract(PLAYER_SCRIPT).unwrap();
        assert!(program
            .transform_table_body
            .contains(&program.transform_table_name));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let first = extract(PLAYER_SCRIPT).unwrap();
        let second = extract(PLAYER_SCRIPT).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_garbage_text_is_pattern_not_found() {
        let err = extract("not javascript at all").unwrap_err();
        assert!(matches!(err, SiftError::PatternNotFound(_)));
    }

    #[test]
    fn test_incomplete_function_is_pattern_not_found() {
        // Guard shape present but no split/join sentinel around a body
        let script = r#"zz.sig||zz.sig=function(a){return a}"#;
        let err = extract(script).unwrap_err();
        assert!(matches!(err, SiftError::PatternNotFound(_)));
    }

    #[test]
    fn test_body_without_table_call_is_pattern_not_found() {
        let script =
            r#"zz.sig||zz.sig=function(a){a=a.split("");a.reverse();return a.join("")};"#;
        let err = extract(script).unwrap_err();
        assert!(matches!(err, SiftError::PatternNotFound(_)));
    }

    #[test]
    fn test_missing_table_is_table_not_found() {
        let script =
            r#"zz.sig||zz.sig=function(a){a=a.split("");Qx.aa(a,1);return a.join("")};"#;
        let err = extract(script).unwrap_err();
        assert!(matches!(err, SiftError::TableNotFound(_)));
    }

    #[test]
    fn test_wrong_table_name_is_table_not_found() {
        // A table exists, but not under the identifier the body calls
        let script = r#"var Other={aa:function(a,b){a.splice(0,b)}};zz.sig||zz.sig=function(a){a=a.split("");Qx.aa(a,1);return a.join("")};"#;
        let err = extract(script).unwrap_err();
        assert!(matches!(err, SiftError::TableNotFound(_)));
    }

    #[test]
    fn test_var_assigned_layout() {
        let script = r#"var Yx=function(a){a=a.split("");Ab.cd(a,2);return a.join("")};var Ab={cd:function(a,b){a.splice(0,b)}};"#;
        let program = extract(script).unwrap();
        assert_eq!(program.operation_sequence, "Ab.cd(a,2);");
        assert_eq!(program.transform_table_name, "Ab");
        assert!(program.transform_table_body.starts_with("var Ab={"));
    }

    #[test]
    fn test_guard_layout_wins_over_var_assigned() {
        // Both layouts present: strategy order decides, not text order
        let script = r#"var A1={rv:function(a){a.reverse()}};var dec=function(a){a=a.split("");A1.rv(a,0);return a.join("")};var B2={sw:function(a,b){var c=a[0];a[0]=a[b%a.length];a[b%a.length]=c}};xx.sig||xx.sig=function(a){a=a.split("");B2.sw(a,4);return a.join("")};"#;
        let program = extract(script).unwrap();
        assert_eq!(program.transform_table_name, "B2");
        assert_eq!(program.operation_sequence, "B2.sw(a,4);");
    }

    #[test]
    fn test_dollar_sign_table_identifier() {
        let script = r#"ab.sig||ab.sig=function(a){a=a.split("");$z.q(a,5);return a.join("")};var $z={q:function(a,b){a.splice(0,b)}};"#;
        let program = extract(script).unwrap();
        assert_eq!(program.transform_table_name, "$z");
        assert!(program.transform_table_body.starts_with("var $z={"));
    }

    #[test]
    fn test_multiline_table_and_body() {
        let script = "var Nv={kT:function(a){a.reverse()},\nq2:function(a,b){a.splice(0,b)}};\nMta.sig||Mta.sig=function(a){a=a.split(\"\");Nv.q2(a,3);\nNv.kT(a,0);return a.join(\"\")};";
        let program = extract(script).unwrap();
        assert_eq!(program.transform_table_name, "Nv");
        assert!(program.transform_table_body.contains("q2:function"));
        assert!(program.operation_sequence.contains("Nv.kT(a,0);"));
    }

    #[test]
    fn test_program_serializes_camel_case() {
        let program = extract(PLAYER_SCRIPT).unwrap();
        let json = serde_json::to_value(&program).unwrap();
        assert!(json.get("operationSequence").is_some());
        assert!(json.get("transformTableName").is_some());
        assert!(json.get("transformTableBody").is_some());
    }
}
