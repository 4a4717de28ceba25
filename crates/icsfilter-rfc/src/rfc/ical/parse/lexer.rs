//! Content line reader for iCalendar (RFC 5545 §3.1).
//!
//! Splits one unfolded line into property name, parameters and raw value.
//! The reader is lenient: it only needs enough structure to find names,
//! `TZID`/`VALUE` parameters and values, never to validate a line.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{ContentLine, Parameter};

/// Characters that end an unquoted parameter value.
const PARAM_VALUE_DELIMITERS: [u8; 4] = [b'"', b';', b':', b','];

/// Parses a single content line.
///
/// Format: `name *(";" param ["=" value *("," value)]) ":" value`
///
/// The name is the longest run of `[A-Za-z0-9-]` at the start of the line.
/// A missing `:` leaves the value empty.
///
/// ## Errors
/// Returns [`ParseErrorKind::MissingPropertyName`] when the line does not
/// start with a name character (blank lines, fold placeholders) and
/// [`ParseErrorKind::UnclosedQuote`] for an unterminated quoted parameter.
pub fn parse_content_line(line: &str) -> ParseResult<ContentLine> {
    let bytes = line.as_bytes();
    let name_end = scan_name(bytes, 0);

    if name_end == 0 {
        return Err(ParseError::new(ParseErrorKind::MissingPropertyName, 1));
    }

    let name = &line[..name_end];

    let mut pos = name_end;
    let mut params = Vec::new();
    while bytes.get(pos) == Some(&b';') {
        let param_start = pos + 1;
        let param_end = scan_name(bytes, param_start);
        if param_end == param_start {
            break;
        }
        let param_name = &line[param_start..param_end];
        pos = param_end;

        let mut value = String::new();
        if bytes.get(pos) == Some(&b'=') {
            pos += 1;
            loop {
                pos = parse_param_value(line, pos, &mut value)?;
                if bytes.get(pos) == Some(&b',') {
                    value.push(',');
                    pos += 1;
                } else {
                    break;
                }
            }
        }

        params.push(Parameter::new(param_name, value));
    }

    let raw_value = line[pos..]
        .find(':')
        .map(|colon| line[pos + colon + 1..].to_string())
        .unwrap_or_default();

    Ok(ContentLine::with_params(name, params, raw_value))
}

/// Reads a property from a working line, logging anything unusual.
///
/// Returns `None` for lines without a property name, which includes the
/// single-space placeholders left behind by unfolding.
#[must_use]
pub fn read_property(line: &str, line_index: usize) -> Option<ContentLine> {
    match parse_content_line(line) {
        Ok(cl) => {
            if cl.raw_value.is_empty() {
                tracing::warn!(line = line_index, content = %line, "No property value found");
            }
            Some(cl)
        }
        Err(e) if e.kind == ParseErrorKind::MissingPropertyName => {
            if line.len() > 1 {
                tracing::debug!(line = line_index, content = %line, "No property name found");
            }
            None
        }
        Err(e) => {
            tracing::warn!(error = %e.at_line(line_index), content = %line, "Unreadable content line");
            None
        }
    }
}

/// Returns the end of the `[A-Za-z0-9-]` run starting at `start`.
fn scan_name(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'-') {
        end += 1;
    }
    end
}

/// Parses one (possibly quoted) parameter value starting at `start`,
/// appends it to `out`, and returns the position just after it.
fn parse_param_value(line: &str, start: usize, out: &mut String) -> ParseResult<usize> {
    let bytes = line.as_bytes();

    if bytes.get(start) == Some(&b'"') {
        let body = start + 1;
        let close = line[body..].find('"').ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnclosedQuote, start + 1)
                .with_context(line[start..].to_string())
        })?;
        out.push_str(&line[body..body + close]);
        return Ok(body + close + 1);
    }

    let mut end = start;
    while end < bytes.len() && !PARAM_VALUE_DELIMITERS.contains(&bytes[end]) {
        end += 1;
    }
    out.push_str(&line[start..end]);
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_line() {
        let result = parse_content_line("SUMMARY:Team Meeting").unwrap();
        assert_eq!(result.name, "SUMMARY");
        assert!(result.params.is_empty());
        assert_eq!(result.raw_value, "Team Meeting");
    }

    #[test]
    fn parse_lowercase_name_is_normalized() {
        let result = parse_content_line("class:Jalkapallo-ottelu").unwrap();
        assert_eq!(result.name, "CLASS");
        assert_eq!(result.raw_value, "Jalkapallo-ottelu");
    }

    #[test]
    fn parse_line_with_params() {
        let result = parse_content_line("DTSTART;TZID=Europe/Helsinki:20240615T190000").unwrap();
        assert_eq!(result.name, "DTSTART");
        assert_eq!(result.params.len(), 1);
        assert_eq!(result.params[0].name, "TZID");
        assert_eq!(result.params[0].value, "Europe/Helsinki");
        assert_eq!(result.raw_value, "20240615T190000");
    }

    #[test]
    fn parse_line_with_quoted_param() {
        let result = parse_content_line("ATTENDEE;CN=\"Doe, Jane\":mailto:jane@example.com").unwrap();
        assert_eq!(result.params[0].value, "Doe, Jane");
        assert_eq!(result.raw_value, "mailto:jane@example.com");
    }

    #[test]
    fn parse_line_with_multiple_param_values() {
        let result =
            parse_content_line("ATTENDEE;ROLE=REQ-PARTICIPANT,OPT-PARTICIPANT:mailto:t@example.com")
                .unwrap();
        assert_eq!(result.params[0].value, "REQ-PARTICIPANT,OPT-PARTICIPANT");
    }

    #[test]
    fn parse_line_with_several_params() {
        let result =
            parse_content_line("DTSTART;VALUE=DATE-TIME;TZID=\"America/New_York\":20240615T090000")
                .unwrap();
        assert_eq!(result.params.len(), 2);
        assert_eq!(result.get_param_value("value"), Some("DATE-TIME"));
        assert_eq!(result.tzid(), Some("America/New_York"));
    }

    #[test]
    fn parse_value_keeps_later_colons() {
        let result = parse_content_line("URL:https://example.com:8443/cal").unwrap();
        assert_eq!(result.raw_value, "https://example.com:8443/cal");
    }

    #[test]
    fn parse_line_missing_colon_has_empty_value() {
        let result = parse_content_line("INVALID").unwrap();
        assert_eq!(result.name, "INVALID");
        assert!(result.raw_value.is_empty());
    }

    #[test]
    fn parse_placeholder_has_no_name() {
        let err = parse_content_line(" ").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingPropertyName);
        assert!(read_property(" ", 4).is_none());
        assert!(read_property("", 4).is_none());
    }

    #[test]
    fn parse_line_unclosed_quote() {
        let err = parse_content_line("ATTENDEE;CN=\"Unclosed:mailto:t@example.com").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedQuote);
        assert!(read_property("ATTENDEE;CN=\"Unclosed:mailto:t@example.com", 0).is_none());
    }

    #[test]
    fn parse_param_without_value() {
        let result = parse_content_line("X-FLAG;EXPERIMENTAL:yes").unwrap();
        assert_eq!(result.params[0].name, "EXPERIMENTAL");
        assert!(result.params[0].value.is_empty());
        assert_eq!(result.raw_value, "yes");
    }
}
