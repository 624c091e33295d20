//! Settings-file parsing.
//!
//! The settings file is UTF-8 text with one `KEY=VALUE` pair per line.
//! Blank lines and lines starting with `#` are comment-only; a value may
//! carry a trailing `# comment`. Lines without an `=` are skipped silently;
//! parsing is best-effort per line.
//!
//! When a parsed key is also present in the process environment, the
//! external value is recorded alongside the file value. The parser never
//! substitutes one for the other; precedence is a caller decision.

use std::io;
use std::path::Path;

use tracing::trace;

/// One physical line of a settings file.
///
/// Exists only during configuration derivation; the rest of the system does
/// not retain it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFileLine {
    /// The raw line text, verbatim.
    pub line: String,

    /// The parsed key, when the line holds a `KEY=VALUE` pair.
    pub key: Option<String>,

    /// The parsed value with any trailing comment stripped.
    pub value: String,

    /// The process-environment value for the same key, when present.
    pub external_value: Option<String>,

    /// The trailing inline comment, when present.
    pub comment: Option<String>,
}

impl EnvFileLine {
    /// Whether this line's key starts with the given settings prefix.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.key.as_deref().is_some_and(|key| key.starts_with(prefix))
    }
}

/// Parse the settings file at `path`.
pub fn parse_env_file(path: &Path) -> io::Result<Vec<EnvFileLine>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_env_lines(&text))
}

/// Parse settings-file text into per-line records.
pub fn parse_env_lines(text: &str) -> Vec<EnvFileLine> {
    text.lines().map(parse_line).collect()
}

fn parse_line(raw: &str) -> EnvFileLine {
    let mut line = EnvFileLine {
        line: raw.to_string(),
        ..EnvFileLine::default()
    };

    if raw.trim().is_empty() || raw.starts_with('#') {
        return line;
    }

    let Some((key_part, value_part)) = raw.split_once('=') else {
        trace!(line = raw, "skipping settings line without '='");
        return line;
    };

    let key = key_part.trim().to_string();
    match value_part.split_once('#') {
        Some((value, comment)) => {
            line.value = value.trim().to_string();
            line.comment = Some(comment.trim().to_string());
        }
        None => line.value = value_part.trim().to_string(),
    }
    line.external_value = std::env::var(&key).ok();
    line.key = Some(key);
    line
}

/// The settings-key prefix for a plugin name: `UPPER_SNAKE(name)_`.
pub fn env_variable_prefix(name: &str) -> String {
    let variable = env_variable(name);
    if variable.is_empty() {
        variable
    } else {
        format!("{variable}_")
    }
}

/// A plugin name as a settings key component: trimmed, uppercased, spaces
/// replaced with underscores.
pub fn env_variable(name: &str) -> String {
    name.trim().to_uppercase().replace(' ', "_")
}

/// Map a `snake_case` settings suffix to `CamelCase`.
pub fn snake_to_camel(key: &str) -> String {
    key.to_lowercase()
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
