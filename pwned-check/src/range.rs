//! Parsing of range responses.
//!
//! The service answers a prefix query with one `SUFFIX:FREQUENCY` record per line,
//! terminated by `\n` or `\r\n`. Parsing is strict: the first line that does not
//! have that shape stops the parse, and the records read before it are kept so the
//! caller can still act on them.

use compact_str::CompactString;
use serde::Serialize;

use crate::digest::PrefixKey;
use crate::error::{Error, Result};
use crate::source::RangeResponse;

/// One candidate returned for a prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SuffixRecord {
    /// Remaining digest characters after the prefix, as sent by the service.
    pub suffix: CompactString,
    /// Number of times the full hash was seen in breaches.
    pub frequency: u64,
}

/// Longest line accepted, terminator included. A full-width record is at most
/// 39 suffix characters, a colon, 20 frequency digits and `\r`.
pub const MAX_LINE_LEN: usize = 64;

/// Parses a single line (without its terminator) into a record.
pub fn parse_record(line: &[u8]) -> std::result::Result<SuffixRecord, &'static str> {
    let line = std::str::from_utf8(line).map_err(|_| "line is not valid UTF-8")?;
    let (suffix, frequency) = line.split_once(':').ok_or("expected SUFFIX:FREQUENCY")?;

    if frequency.contains(':') {
        return Err("too many fields");
    }
    if suffix.is_empty() {
        return Err("empty suffix");
    }
    // u64::from_str accepts a leading '+', the wire format does not.
    if frequency.is_empty() || !frequency.bytes().all(|c| c.is_ascii_digit()) {
        return Err("frequency is not an unsigned integer");
    }
    let frequency = frequency.parse::<u64>().map_err(|_| "frequency out of range")?;

    Ok(SuffixRecord { suffix: CompactString::from(suffix), frequency })
}

/// Incremental parser fed with body chunks as they arrive.
///
/// Lines split across chunk boundaries are buffered until their terminator shows
/// up (or until [`RangeParser::finish`] for an unterminated last line).
#[derive(Debug)]
pub struct RangeParser {
    prefix: PrefixKey,
    pending: Vec<u8>,
    line: usize,
    records: Vec<SuffixRecord>,
}

impl RangeParser {
    pub fn new(prefix: PrefixKey) -> Self {
        // Busy prefixes currently return a little under 2000 records.
        Self { prefix, pending: Vec::new(), line: 0, records: Vec::with_capacity(2048) }
    }

    /// Parses every complete line in `chunk`.
    ///
    /// On error the parser must not be fed again. Records parsed before the bad
    /// line remain available through [`RangeParser::into_response`].
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(pos);
            if self.pending.is_empty() {
                self.parse_line(head)?;
            } else {
                self.check_pending(head.len())?;
                self.pending.extend_from_slice(head);
                let line = std::mem::take(&mut self.pending);
                let parsed = self.parse_line(&line);
                self.pending = line;
                self.pending.clear();
                parsed?;
            }
            rest = &tail[1..];
        }
        self.check_pending(rest.len())?;
        self.pending.extend_from_slice(rest);
        Ok(())
    }

    /// Parses any trailing unterminated line and returns everything read.
    pub fn finish(mut self) -> RangeResponse {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            if let Err(e) = self.parse_line(&line) {
                return self.into_response(Some(e));
            }
        }
        self.into_response(None)
    }

    /// Records parsed so far, paired with the error that ended the stream, if any.
    pub fn into_response(self, error: Option<Error>) -> RangeResponse {
        RangeResponse { records: self.records, error }
    }

    /// Bounds the buffered partial line so a stream without terminators cannot
    /// grow it indefinitely.
    fn check_pending(&self, extra: usize) -> Result<()> {
        if self.pending.len() + extra > MAX_LINE_LEN {
            return Err(self.malformed(self.line + 1, "line too long"));
        }
        Ok(())
    }

    fn parse_line(&mut self, raw: &[u8]) -> Result<()> {
        self.line += 1;
        if raw.len() > MAX_LINE_LEN {
            return Err(self.malformed(self.line, "line too long"));
        }
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.is_empty() {
            return Ok(());
        }

        let record = parse_record(raw).map_err(|reason| self.malformed(self.line, reason))?;
        self.records.push(record);
        Ok(())
    }

    fn malformed(&self, line: usize, reason: &'static str) -> Error {
        Error::MalformedResponse { prefix: self.prefix.to_string(), line, reason }
    }
}

/// Parses a fully buffered response body.
pub fn parse_range_body(prefix: &PrefixKey, body: &[u8]) -> RangeResponse {
    let mut parser = RangeParser::new(prefix.clone());
    match parser.feed(body) {
        Ok(()) => parser.finish(),
        Err(e) => parser.into_response(Some(e)),
    }
}
