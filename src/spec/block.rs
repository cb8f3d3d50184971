//! Fenced block extraction and strict TOML parsing.

use thiserror::Error;
use toml::Value;

use super::config::{TaskSpecification, SUPPORTED_SCHEMA};

/// Info string of the fenced configuration block.
pub const FENCE_INFO: &str = "skew";

/// Paths excluded from drift consideration even when not configured.
const ALWAYS_IGNORE: [&str; 2] = [".skew/**", ".git/**"];

/// Error raised when a present drift block cannot be parsed.
#[derive(Debug, Error)]
pub enum SpecParseError {
    /// The block body is not valid TOML.
    #[error("drift block is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// The required `schema` key is absent.
    #[error("missing required key `schema`")]
    MissingSchema,
    /// The `schema` key holds a non-integer value.
    #[error("`schema` must be an integer")]
    SchemaNotInteger,
    /// The `schema` key names a version this build does not understand.
    #[error("unsupported `schema` version {0} (expected {SUPPORTED_SCHEMA})")]
    UnsupportedSchema(i64),
    /// The required `spec` key is absent.
    #[error("missing required key `spec`")]
    MissingSpecList,
    /// The `spec` key is not a list of strings.
    #[error("`spec` must be a list of strings")]
    SpecNotStrings,
    /// The policy flag is present but not a boolean.
    #[error("`require_spec_update_when_code_changes` must be a boolean")]
    RequireFlagNotBool,
    /// The `ignore` key is present but not a list of strings.
    #[error("`ignore` must be a list of strings")]
    IgnoreNotStrings,
}

/// Extracts the body of the first fenced ```skew block in a task
/// description. Returns `None` when no complete block is present.
#[must_use]
pub fn extract_block(description: &str) -> Option<String> {
    let open = format!("```{FENCE_INFO}");
    let mut body: Option<Vec<&str>> = None;
    for line in description.lines() {
        match &mut body {
            None => {
                if line.trim() == open {
                    body = Some(Vec::new());
                }
            }
            Some(lines) => {
                if line.trim() == "```" {
                    return Some(lines.join("\n").trim().to_string());
                }
                lines.push(line);
            }
        }
    }
    None
}

/// Parses a block body into a [`TaskSpecification`].
///
/// Known keys are validated exhaustively; unknown keys are ignored for
/// forward compatibility. The policy flag defaults to `false` when absent.
///
/// # Errors
///
/// Returns a [`SpecParseError`] when the body is not a TOML table, the
/// `schema` key is missing or not the supported version, `spec` is missing
/// or not a list of strings, or an optional key has the wrong type.
pub fn parse_spec_block(body: &str) -> Result<TaskSpecification, SpecParseError> {
    let table: toml::Table = body.parse()?;

    match table.get("schema") {
        None => return Err(SpecParseError::MissingSchema),
        Some(Value::Integer(version)) => {
            if *version != i64::from(SUPPORTED_SCHEMA) {
                return Err(SpecParseError::UnsupportedSchema(*version));
            }
        }
        Some(_) => return Err(SpecParseError::SchemaNotInteger),
    }

    let spec_globs = match table.get("spec") {
        None => return Err(SpecParseError::MissingSpecList),
        Some(value) => string_list(value).ok_or(SpecParseError::SpecNotStrings)?,
    };

    let require_spec_update_when_code_changes =
        match table.get("require_spec_update_when_code_changes") {
            None => false,
            Some(Value::Boolean(flag)) => *flag,
            Some(_) => return Err(SpecParseError::RequireFlagNotBool),
        };

    let mut ignore_globs = match table.get("ignore") {
        None => Vec::new(),
        Some(value) => string_list(value).ok_or(SpecParseError::IgnoreNotStrings)?,
    };
    ignore_globs.extend(ALWAYS_IGNORE.iter().map(ToString::to_string));

    Ok(TaskSpecification {
        schema: SUPPORTED_SCHEMA,
        spec_globs,
        require_spec_update_when_code_changes,
        ignore_globs,
    })
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let Value::Array(items) = value else {
        return None;
    };
    items.iter().map(|item| item.as_str().map(ToString::to_string)).collect()
}
