// logmonitor - core/parser.rs
//
// Decoder for the Common Log Format used by Apache's httpd. One line reads:
//
//   172.17.0.1 - frank [09/Feb/2020:16:27:00 +0000] "GET / HTTP/1.1" 200 612
//
// in order: host, RFC931 identity (unused, always `-`), authenticated user,
// bracketed local timestamp, quoted request (method, route, version), status
// code, content size. Servers may append further fields (referer, user agent);
// anything beyond the canonical ten is accepted and ignored.
//
// Core layer: pure string work, no I/O.

use crate::core::model::{HttpRequest, LogRecord};
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// chrono format of the bracketed CLF timestamp: `09/Feb/2020:16:27:00 +0000`.
const CLF_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Number of canonical fields once the line is split on single spaces.
const CLF_FIELD_COUNT: usize = 10;

/// Highest status code the CLF grammar allows (three decimal digits).
const MAX_STATUS_CODE: u16 = 999;

// =============================================================================
// Errors
// =============================================================================

/// A rejected log line. Borrows the offending line: parse errors are counted
/// and dropped by the reader worker, never stored or sent across threads.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError<'a> {
    /// The input line is empty.
    EmptyLine,

    /// The bracketed timestamp could not be parsed.
    MalformedTime { line: &'a str },

    /// The status code or content size could not be parsed.
    MalformedHttp { line: &'a str },

    /// Any other structural mismatch (too few fields, broken quoting).
    Malformed { line: &'a str },
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLine => write!(f, "empty log line"),
            Self::MalformedTime { line } => write!(f, "malformed timestamp in '{line}'"),
            Self::MalformedHttp { line } => write!(f, "malformed code or size in '{line}'"),
            Self::Malformed { line } => write!(f, "malformed log line '{line}'"),
        }
    }
}

impl std::error::Error for ParseError<'_> {}

// =============================================================================
// Parsing
// =============================================================================

/// Parse one CLF line into a `LogRecord`.
///
/// Fields beyond the canonical ten are tolerated and ignored. The RFC931
/// identity field is discarded; an auth user of `-` normalises to the empty
/// string; a size of `-` parses as 0.
pub fn parse(line: &str) -> Result<LogRecord, ParseError<'_>> {
    if line.is_empty() {
        return Err(ParseError::EmptyLine);
    }

    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() < CLF_FIELD_COUNT {
        return Err(ParseError::Malformed { line });
    }

    let local_time = parse_local_time(fields[3], fields[4]).ok_or(ParseError::MalformedTime { line })?;
    let request = parse_http(&fields[5..CLF_FIELD_COUNT], line)?;

    Ok(LogRecord {
        host: fields[0].to_string(),
        auth_user: parse_auth_user(fields[2]),
        local_time,
        request,
    })
}

fn parse_auth_user(field: &str) -> String {
    if field == "-" {
        String::new()
    } else {
        field.to_string()
    }
}

/// Parse the two bracketed timestamp fields: `[09/Feb/2020:16:27:00` `+0000]`.
fn parse_local_time(date: &str, zone: &str) -> Option<DateTime<FixedOffset>> {
    let date = date.strip_prefix('[')?;
    let zone = zone.strip_suffix(']')?;
    DateTime::parse_from_str(&format!("{date} {zone}"), CLF_TIME_FORMAT).ok()
}

/// Parse the five request fields: `"GET` `/route` `HTTP/1.1"` `200` `612`.
fn parse_http<'a>(fields: &[&str], line: &'a str) -> Result<HttpRequest, ParseError<'a>> {
    let code: u16 = fields[3]
        .parse()
        .ok()
        .filter(|c| *c <= MAX_STATUS_CODE)
        .ok_or(ParseError::MalformedHttp { line })?;

    let size: u64 = if fields[4] == "-" {
        0
    } else {
        fields[4].parse().map_err(|_| ParseError::MalformedHttp { line })?
    };

    Ok(HttpRequest {
        method: fields[0].trim_matches('"').to_string(),
        route: fields[1].to_string(),
        version: fields[2].trim_matches('"').to_string(),
        code,
        size,
    })
}

// =============================================================================
// Formatting
// =============================================================================

impl LogRecord {
    /// Render the canonical ten-field CLF line for this record.
    ///
    /// The inverse of [`parse`] up to normalisation: the identity field is
    /// always written as `-`, and an empty auth user becomes `-`.
    pub fn format(&self) -> String {
        let auth = if self.auth_user.is_empty() {
            "-"
        } else {
            &self.auth_user
        };
        format!(
            "{} - {} [{}] \"{} {} {}\" {} {}",
            self.host,
            auth,
            self.local_time.format(CLF_TIME_FORMAT),
            self.request.method,
            self.request.route,
            self.request.version,
            self.request.code,
            self.request.size,
        )
    }
}

// =============================================================================
// Unit tests
// =============================================================================
