//! User intent as commands, parsed from single text lines.
//!
//! Grammar (one command per line; `#` followed by whitespace starts a
//! comment, ids may be written as `3` or `#3`):
//!
//! ```text
//! select <id>
//! children <id> <count>
//! value <id> <number>
//! show
//! metrics
//! ```

use std::str::FromStr;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Select(NodeId),
    SetChildCount { id: NodeId, count: i64 },
    SetValue { id: NodeId, value: f64 },
    Show,
    Metrics,
}

impl Command {
    /// Parses one line. Blank lines and comments yield `None`.
    pub fn parse(line: &str) -> ApplicationResult<Option<Command>> {
        let content = strip_comment(line).trim();
        if content.is_empty() {
            return Ok(None);
        }
        Self::parse_words(content)
            .map(Some)
            .map_err(|source| ApplicationError::Command {
                line: content.to_string(),
                source,
            })
    }

    fn parse_words(content: &str) -> Result<Command, DomainError> {
        let words: Vec<&str> = content.split_whitespace().collect();
        match words.as_slice() {
            ["select", id] => Ok(Command::Select(parse_id(id)?)),
            ["children", id, count] => Ok(Command::SetChildCount {
                id: parse_id(id)?,
                count: parse_number(count, "child count")?,
            }),
            ["value", id, value] => {
                let value: f64 = parse_number(value, "value")?;
                if !value.is_finite() {
                    return Err(DomainError::InvalidArgument(format!(
                        "value must be a finite number, got '{value}'"
                    )));
                }
                Ok(Command::SetValue {
                    id: parse_id(id)?,
                    value,
                })
            }
            ["show"] => Ok(Command::Show),
            ["metrics"] => Ok(Command::Metrics),
            [verb, ..] => Err(DomainError::InvalidArgument(format!(
                "unknown command or wrong arity: '{verb}'"
            ))),
            [] => Err(DomainError::InvalidArgument("empty command".to_string())),
        }
    }
}

fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, _) in line.match_indices('#') {
        if bytes.get(i + 1).map_or(true, |b| b.is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

fn parse_id(raw: &str) -> Result<NodeId, DomainError> {
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    parse_number::<u32>(raw, "node id").map(NodeId)
}

fn parse_number<T: FromStr>(raw: &str, what: &str) -> Result<T, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::InvalidArgument(format!("{what} must be numeric, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("select 3", Command::Select(NodeId(3)))]
    #[case("select #3", Command::Select(NodeId(3)))]
    #[case("children 2 4", Command::SetChildCount { id: NodeId(2), count: 4 })]
    #[case("children 2 -1", Command::SetChildCount { id: NodeId(2), count: -1 })]
    #[case("  value 5 7.25  # comment", Command::SetValue { id: NodeId(5), value: 7.25 })]
    #[case("show", Command::Show)]
    #[case("metrics", Command::Metrics)]
    fn given_valid_line_when_parsing_then_returns_command(
        #[case] line: &str,
        #[case] expected: Command,
    ) {
        assert_eq!(Command::parse(line).unwrap(), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("# just a comment")]
    fn given_blank_or_comment_when_parsing_then_none(#[case] line: &str) {
        assert_eq!(Command::parse(line).unwrap(), None);
    }

    #[rstest]
    #[case("value 5 abc")]
    #[case("value 5 NaN")]
    #[case("select x")]
    #[case("children 2")]
    #[case("children 2 1.5")]
    #[case("grow 2 3")]
    fn given_malformed_line_when_parsing_then_invalid_argument(#[case] line: &str) {
        let err = Command::parse(line).unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::InvalidArgument(_))));
    }
}
