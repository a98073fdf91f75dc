//! A line within a fragment (BED) file.
//!
//! Fragment files use the BED convention of 0-based, half-open coordinates
//! in the first three tab-delimited fields. Any further fields are ignored.
//! BED coordinates are interbase coordinates, so each record maps directly
//! onto a positive-strand [`Interval`].

use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::interbase::Coordinate;
use omics::coordinate::interval;
use omics::coordinate::interval::interbase::Interval;
use omics::coordinate::position::Number;
use omics::coordinate::Strand;

/// The delimiter for a record line.
pub const DELIMITER: char = '\t';

/// The minimum number of fields in a record line.
pub const MIN_RECORD_FIELDS: usize = 3;

/// The prefixes of lines that carry no record.
const COMMENT_PREFIXES: &[&str] = &["#", "track", "browser"];

/// An error associated with parsing a record line.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the line.
    IncorrectNumberOfFields(usize),

    /// The contig field was empty.
    EmptyContig,

    /// An invalid start position.
    InvalidStart(ParseIntError),

    /// An invalid end position.
    InvalidEnd(ParseIntError),

    /// The end position was not greater than the start position.
    EmptyRecord(Number, Number),

    /// The record could not be made into an interval.
    InvalidInterval(interval::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in record: expected at least {} fields, found {} \
                 fields",
                MIN_RECORD_FIELDS, fields
            ),
            ParseError::EmptyContig => write!(f, "the contig cannot be empty"),
            ParseError::InvalidStart(err) => write!(f, "invalid start: {}", err),
            ParseError::InvalidEnd(err) => write!(f, "invalid end: {}", err),
            ParseError::EmptyRecord(start, end) => write!(
                f,
                "the end position ({}) must be greater than the start position ({})",
                end, start
            ),
            ParseError::InvalidInterval(err) => write!(f, "invalid interval: {}", err),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Line`].
#[derive(Debug)]
pub enum Error {
    /// A record line could not be parsed.
    InvalidRecord(ParseError, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidRecord(err, line) => {
                write!(f, "invalid record: {}\n\nline: {}", err, line)
            }
        }
    }
}

impl std::error::Error for Error {}

/// A line within a fragment file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Line {
    /// An empty line.
    Empty,
    /// A comment, track, or browser line.
    Comment(String),
    /// A fragment record.
    Record(Interval),
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Empty => write!(f, ""),
            Line::Comment(comment) => write!(f, "{}", comment),
            Line::Record(interval) => write!(
                f,
                "{}{DELIMITER}{}{DELIMITER}{}",
                interval.contig().as_str(),
                interval.start().position().get(),
                interval.end().position().get()
            ),
        }
    }
}

impl FromStr for Line {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            Ok(Self::Empty)
        } else if COMMENT_PREFIXES.iter().any(|prefix| s.starts_with(prefix)) {
            Ok(Self::Comment(s.into()))
        } else {
            parse_record(s)
                .map(Line::Record)
                .map_err(|e| Error::InvalidRecord(e, s.into()))
        }
    }
}

/// Parses the interval from a BED record.
fn parse_record(s: &str) -> Result<Interval, ParseError> {
    let parts = s.split(DELIMITER).collect::<Vec<_>>();
    if parts.len() < MIN_RECORD_FIELDS {
        return Err(ParseError::IncorrectNumberOfFields(parts.len()));
    }

    let contig = parts[0].trim();
    if contig.is_empty() {
        return Err(ParseError::EmptyContig);
    }

    let start = parts[1]
        .trim()
        .parse::<Number>()
        .map_err(ParseError::InvalidStart)?;
    let end = parts[2]
        .trim()
        .parse::<Number>()
        .map_err(ParseError::InvalidEnd)?;

    if end <= start {
        return Err(ParseError::EmptyRecord(start, end));
    }

    let start = Coordinate::new(contig, Strand::Positive, start);
    let end = Coordinate::new(contig, Strand::Positive, end);

    Interval::try_new(start, end).map_err(ParseError::InvalidInterval)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    pub fn test_valid_record_line() -> Result<(), Box<dyn std::error::Error>> {
        let line = "chr1\t99\t199\tHindIII_1\t0\t+".parse::<Line>()?;
        assert_eq!(line, Line::Record("chr1:+:99-199".parse::<Interval>()?));
        assert_eq!(line.to_string(), "chr1\t99\t199");
        Ok(())
    }

    #[test]
    pub fn test_empty_and_comment_lines() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("".parse::<Line>()?, Line::Empty);
        assert!(matches!("# fragments".parse::<Line>()?, Line::Comment(_)));
        assert!(matches!(
            "track name=fragments".parse::<Line>()?,
            Line::Comment(_)
        ));
        assert!(matches!("browser hide all".parse::<Line>()?, Line::Comment(_)));
        Ok(())
    }

    #[test]
    pub fn test_invalid_record_lines() {
        let err = "chr1\t99".parse::<Line>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid record: invalid number of fields in record: expected at least 3 fields, \
             found 2 fields\n\nline: chr1\t99"
        );

        let err = "chr1\t199\t99".parse::<Line>().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRecord(ParseError::EmptyRecord(199, 99), ref line) if line == "chr1\t199\t99"
        ));

        let err = "chr1\tten\t99".parse::<Line>().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRecord(ParseError::InvalidStart(_), _)
        ));

        let err = "\t0\t99".parse::<Line>().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRecord(ParseError::EmptyContig, _)
        ));
    }
}
