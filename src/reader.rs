//! A fragment file reader.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::{self};
use std::iter;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::core::fragment;
use crate::core::fragment::Set;
use crate::line;
use crate::Line;

/// The new line character.
const NEW_LINE: char = '\n';

/// The carriage return character.
const CARRIAGE_RETURN: char = '\r';

/// The extension for gzipped fragment files.
const GZIP_EXTENSION: &str = "gz";

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A line error along with the 1-based line number.
    Line(usize, line::Error),

    /// The records did not form a valid fragment set.
    Set(fragment::set::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Line(line_no, err) => write!(f, "line error at line {line_no}: {err}"),
            Error::Set(err) => write!(f, "fragment set error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A fragment file reader.
#[derive(Clone, Debug)]
pub struct Reader<T>(T)
where
    T: BufRead;

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a fragment file reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"chr1\t99\t199\nchr1\t299\t599\n";
    /// let reader = fragcount::Reader::new(&data[..]);
    /// ```
    pub fn new(inner: T) -> Self {
        Self::from(inner)
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.0
    }

    /// Gets a mutable reference to the inner reader.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.0
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Reads a raw, textual line from the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    ///
    /// let data = b"chr1\t99\t199\r\nchr1\t299\t599";
    /// let mut reader = fragcount::Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 13);
    /// assert_eq!(buffer, "chr1\t99\t199");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 12);
    /// assert_eq!(buffer, "chr1\t299\t599");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 0);
    ///
    /// # Ok::<(), io::Error>(())
    /// ```
    pub fn read_line_raw(&mut self, buffer: &mut String) -> io::Result<usize> {
        read_line(self.inner_mut(), buffer)
    }

    /// Attempts to read a [`Line`] from the underlying reader.
    ///
    /// The line number reported in any error is always `0`, as a single line
    /// read does not track its position within the file. Use
    /// [`Reader::fragments()`] for positional errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::Line;
    ///
    /// let data = b"# restriction fragments\nchr1\t99\t199\n";
    /// let mut reader = fragcount::Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    /// assert!(matches!(reader.read_line(&mut buffer)?, Some(Line::Comment(_))));
    /// assert!(matches!(reader.read_line(&mut buffer)?, Some(Line::Record(_))));
    /// assert!(matches!(reader.read_line(&mut buffer)?, None));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_line(&mut self, buffer: &mut String) -> Result<Option<Line>, Error> {
        let read = self.read_line_raw(buffer).map_err(Error::Io)?;

        match read {
            0 => Ok(None),
            _ => {
                let line = buffer.parse::<Line>().map_err(|e| Error::Line(0, e))?;
                Ok(Some(line))
            }
        }
    }

    /// Returns an iterator over the `Line`s in the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"chr1\t99\t199\n\nchr1\t299\t599\n";
    /// let mut reader = fragcount::Reader::new(&data[..]);
    ///
    /// let lines = reader.lines().collect::<Vec<_>>();
    /// assert_eq!(lines.len(), 3);
    /// ```
    pub fn lines(&mut self) -> impl Iterator<Item = io::Result<Line>> + '_ {
        let mut buffer = String::new();

        iter::from_fn(move || {
            buffer.clear();

            match self.read_line_raw(&mut buffer) {
                Ok(0) => None,
                Ok(_) => Some(
                    buffer
                        .parse()
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
                ),
                Err(e) => Some(Err(e)),
            }
        })
    }

    /// Reads every record in the underlying reader into a fragment [`Set`].
    ///
    /// Fragments are assigned identifiers in the order that their records
    /// appear. Empty and comment lines are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"track name=fragments\nchr1\t99\t199\nchr1\t299\t599\n";
    /// let mut reader = fragcount::Reader::new(&data[..]);
    ///
    /// let fragments = reader.fragments()?;
    /// assert_eq!(fragments.len(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn fragments(&mut self) -> Result<Set, Error> {
        let mut buffer = String::new();
        let mut intervals = Vec::new();
        let mut line_no = 0;

        while self.read_line_raw(&mut buffer).map_err(Error::Io)? > 0 {
            line_no += 1;

            match buffer.parse::<Line>() {
                Ok(Line::Record(interval)) => intervals.push(interval),
                Ok(Line::Empty) | Ok(Line::Comment(_)) => {}
                Err(err) => return Err(Error::Line(line_no, err)),
            }
        }

        Set::try_from_intervals(intervals).map_err(Error::Set)
    }
}

impl<T> From<T> for Reader<T>
where
    T: BufRead,
{
    fn from(inner: T) -> Self {
        Self(inner)
    }
}

/// Opens a fragment file, decompressing it if the path ends in `.gz`.
pub fn open<P>(src: P) -> io::Result<Reader<Box<dyn BufRead>>>
where
    P: AsRef<Path>,
{
    let src = src.as_ref();
    let file = File::open(src)?;

    let inner: Box<dyn BufRead> = match src.extension().and_then(|ext| ext.to_str()) {
        Some(GZIP_EXTENSION) => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    };

    Ok(Reader::new(inner))
}

/// Reads a line from a buffered reader, stripping a trailing `\n` or `\r\n`.
fn read_line<T>(reader: &mut T, buffer: &mut String) -> io::Result<usize>
where
    T: BufRead,
{
    buffer.clear();

    match reader.read_line(buffer) {
        Ok(0) => Ok(0),
        Ok(n) => {
            if buffer.ends_with(NEW_LINE) {
                buffer.pop();

                if buffer.ends_with(CARRIAGE_RETURN) {
                    buffer.pop();
                }
            }

            Ok(n)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write as _;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempdir::TempDir;

    use super::*;
    use crate::core::fragment::Id;

    #[test]
    fn test_read_line() {
        let data = b"hello\r\nworld!";
        let mut cursor = io::Cursor::new(data);

        let mut buffer = String::new();
        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, "hello");
        assert_eq!(len, 7);

        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, "world!");
        assert_eq!(len, 6);
    }

    #[test]
    fn test_fragments_are_one_based() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"chr1\t99\t199\tfrag1\nchr2\t0\t10\tfrag2\n";
        let set = Reader::new(&data[..]).fragments()?;

        let first = set.get(Id::from_index(0)).unwrap();
        assert_eq!(
            (first.contig().as_str(), first.start(), first.end()),
            ("chr1", 100, 199)
        );

        let second = set.get(Id::from_index(1)).unwrap();
        assert_eq!(
            (second.contig().as_str(), second.start(), second.end()),
            ("chr2", 1, 10)
        );

        Ok(())
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let data = b"# header\nchr1\t99\t199\nchr1\t599\t299\n";
        let err = Reader::new(&data[..]).fragments().unwrap_err();
        assert!(matches!(err, Error::Line(3, _)));

        let data = b"# only a comment\n";
        let err = Reader::new(&data[..]).fragments().unwrap_err();
        assert!(matches!(err, Error::Set(fragment::set::Error::Empty)));
    }

    #[test]
    fn test_open_plain_and_gzipped() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("fragcount")?;
        let data = b"chr1\t99\t199\nchr1\t299\t599\n";

        let plain = dir.path().join("fragments.bed");
        fs::write(&plain, data)?;
        assert_eq!(open(&plain)?.fragments()?.len(), 2);

        let gzipped = dir.path().join("fragments.bed.gz");
        let mut encoder = GzEncoder::new(fs::File::create(&gzipped)?, Compression::default());
        encoder.write_all(data)?;
        encoder.finish()?;
        assert_eq!(open(&gzipped)?.fragments()?.len(), 2);

        assert!(open(dir.path().join("missing.bed")).is_err());

        Ok(())
    }
}
