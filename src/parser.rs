//! Parser for dialogue script files.
//!
//! The top-level entry points are [`parse_str`] and [`parse_file`].
//!
//! | Line | Entry |
//! |------|-------|
//! | `say "text"` | [`Entry::Text`] |
//! | `wait 500ms` / `wait 1.5s` | [`Entry::Pause`] |
//! | `# comment` | ignored |
//!
//! Effects are closures and can only be added from code.

use crate::script::{Entry, Script};
use anyhow::{Context as _, Result, anyhow};
use std::path::Path;
use std::time::Duration;

/// Parse a script from a string slice.
///
/// Lines that are empty or start with `#` are ignored. Inline comments (` # …`)
/// are stripped while preserving `#` characters inside quoted strings.
///
/// # Errors
///
/// Returns an error naming the line if it has an unknown keyword, a malformed
/// duration, or an unclosed quoted string.
///
/// # Example
///
/// ```
/// use dialogue::parse_str;
///
/// let script = parse_str("say \"Hello.\"\nwait 500ms\nsay \"/alert hi\"\n").unwrap();
/// assert_eq!(script.len(), 3);
/// ```
pub fn parse_str(content: &str) -> Result<Script> {
    let mut script = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = strip_inline_comment(line);
        let entry = parse_line(line)
            .with_context(|| format!("Failed to parse line {}: {}", line_num + 1, line))?;
        script.push(entry);
    }
    Ok(script)
}

/// Parse a script from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or if the script is malformed.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Script> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script file: {}", path.display()))?;
    parse_str(&content)
}

type ParseFn = fn(&str) -> Result<Entry>;

static REGISTRY: &[(&str, ParseFn)] = &[("say", parse_say), ("wait", parse_wait)];

fn parse_say(args: &str) -> Result<Entry> {
    Ok(Entry::Text(parse_quoted_string(args)?))
}

fn parse_wait(args: &str) -> Result<Entry> {
    Ok(Entry::Pause(parse_duration(args)?))
}

/// Dispatch a single non-empty, non-comment line on its keyword.
fn parse_line(line: &str) -> Result<Entry> {
    let (keyword, args) = line.split_once(' ').unwrap_or((line, ""));
    REGISTRY
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|(_, parse)| parse(args))
        .unwrap_or_else(|| Err(anyhow!("Unknown keyword: {}", keyword)))
}

/// Strip inline comments from a line, preserving `#` inside quoted strings.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return line[..i].trim(),
            _ => {}
        }
    }
    line
}

/// Parse a duration string: `1s`, `500ms`, `1.5s`.
pub(crate) fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if let Some(ms_str) = s.strip_suffix("ms") {
        let ms: u64 = ms_str
            .trim()
            .parse()
            .context("Invalid milliseconds value")?;
        Ok(Duration::from_millis(ms))
    } else if let Some(s_str) = s.strip_suffix('s') {
        let secs: f64 = s_str.trim().parse().context("Invalid seconds value")?;
        Duration::try_from_secs_f64(secs).context("Seconds value out of range")
    } else {
        Err(anyhow!("Duration must end with 's' or 'ms', got: {}", s))
    }
}

/// Parse a double-quoted string, processing `\n`, `\t`, `\"` and `\\`.
pub(crate) fn parse_quoted_string(s: &str) -> Result<String> {
    let s = s.trim();
    let inner = s
        .strip_prefix('"')
        .ok_or_else(|| anyhow!("Expected string to start with '\"'"))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => return Err(anyhow!("Dangling escape at end of string")),
            },
            '"' => {
                let rest = chars.as_str().trim();
                if !rest.is_empty() {
                    return Err(anyhow!("Unexpected text after closing quote: {}", rest));
                }
                return Ok(out);
            }
            _ => out.push(ch),
        }
    }
    Err(anyhow!("Expected string to end with '\"'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(
            parse_duration("1.5s").unwrap(),
            Duration::from_secs_f64(1.5)
        );
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("5minutes").is_err());
    }

    #[test]
    fn test_parse_quoted_string() {
        assert_eq!(parse_quoted_string("\"hello\"").unwrap(), "hello");
        assert_eq!(
            parse_quoted_string("\"hello\\nworld\"").unwrap(),
            "hello\nworld"
        );
        assert_eq!(
            parse_quoted_string(r#""she said \"hi\"""#).unwrap(),
            r#"she said "hi""#
        );
        assert_eq!(parse_quoted_string(r#""a\\nb""#).unwrap(), "a\\nb");
    }

    #[test]
    fn test_parse_quoted_string_errors() {
        assert!(parse_quoted_string("hello").is_err());
        assert!(parse_quoted_string("\"unclosed").is_err());
        assert!(parse_quoted_string("\"a\" trailing").is_err());
    }

    #[test]
    fn test_parse_str() {
        let script = parse_str("say \"Hi\"\nwait 500ms\nsay \"Bye\"\n").unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script[0].as_text(), Some("Hi"));
        assert!(matches!(script[1], Entry::Pause(d) if d == Duration::from_millis(500)));
        assert_eq!(script[2].as_text(), Some("Bye"));
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let script = parse_str("# intro\n\nsay \"a\" # first\n\n# end\n").unwrap();
        assert_eq!(script.len(), 1);
        assert_eq!(script[0].as_text(), Some("a"));
    }

    #[test]
    fn test_hash_inside_quotes() {
        assert_eq!(
            strip_inline_comment("say \"#hashtag\" # comment"),
            "say \"#hashtag\""
        );
        let script = parse_str("say \"issue #4\"").unwrap();
        assert_eq!(script[0].as_text(), Some("issue #4"));
    }

    #[test]
    fn test_unknown_keyword() {
        let err = format!("{:#}", parse_str("say \"ok\"\nshout \"no\"").unwrap_err());
        assert!(err.contains("line 2"), "got: {err}");
        assert!(err.contains("Unknown keyword"), "got: {err}");
    }

    #[test]
    fn test_command_lines_are_text() {
        let script = parse_str("say \"/alert careful\"").unwrap();
        assert_eq!(script[0].as_text(), Some("/alert careful"));
    }
}
