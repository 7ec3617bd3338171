use crate::types::RawSample;
use glam::Vec3;
use std::collections::VecDeque;
use thiserror::Error;

/// Field separator in a recording line.
const SEPARATOR: char = ',';
/// Lines starting with this are ignored.
const COMMENT: char = '#';

#[derive(Debug, Error, PartialEq)]
pub enum RecordingError {
    #[error("Expected 4 or 5 fields (timestamp_ns,x,y,z[,w]), found {0}")]
    FieldCount(usize),
    #[error("Invalid number in field {index}: {value:?}")]
    InvalidNumber { index: usize, value: String },
    #[error("Recording line is not valid UTF-8")]
    NotUtf8,
}

/// Streaming parser for recorded rotation-vector captures.
///
/// Each line is `timestamp_ns,x,y,z` with an optional trailing scalar `w`.
/// Feed raw bytes via `push_data`, then drain parsed samples via `next_sample`.
pub struct RecordingParser {
    buffer: VecDeque<u8>,
}

impl RecordingParser {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(4096),
        }
    }

    /// Append received bytes to the internal buffer.
    pub fn push_data(&mut self, data: &[u8]) {
        self.buffer.extend(data);
    }

    /// Try to extract the next complete sample from the buffer.
    /// Returns `None` if no complete line is available yet.
    pub fn next_sample(&mut self) -> Option<Result<RawSample, RecordingError>> {
        loop {
            let line = {
                let buf = self.buffer.make_contiguous();
                let end = buf.iter().position(|&b| b == b'\n')?;
                buf[..end].to_vec()
            };
            self.buffer.drain(..=line.len());

            let Ok(text) = std::str::from_utf8(&line) else {
                return Some(Err(RecordingError::NotUtf8));
            };
            let text = text.trim();
            if text.is_empty() || text.starts_with(COMMENT) {
                continue;
            }
            return Some(parse_line(text));
        }
    }

    /// Parse whatever remains in the buffer as a final, unterminated line.
    pub fn finish(&mut self) -> Option<Result<RawSample, RecordingError>> {
        if !self.buffer.is_empty() {
            self.buffer.push_back(b'\n');
        }
        self.next_sample()
    }
}

impl Default for RecordingParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one non-empty, non-comment line into a sample.
fn parse_line(line: &str) -> Result<RawSample, RecordingError> {
    let fields: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();
    if !(4..=5).contains(&fields.len()) {
        return Err(RecordingError::FieldCount(fields.len()));
    }

    let timestamp_ns = fields[0]
        .parse::<u64>()
        .map_err(|_| invalid(0, fields[0]))?;
    let component = |index: usize| -> Result<f32, RecordingError> {
        fields[index]
            .parse::<f32>()
            .map_err(|_| invalid(index, fields[index]))
    };

    let sample = RawSample::new(
        Vec3::new(component(1)?, component(2)?, component(3)?),
        timestamp_ns,
    );
    match fields.len() {
        5 => Ok(sample.with_scalar(component(4)?)),
        _ => Ok(sample),
    }
}

fn invalid(index: usize, value: &str) -> RecordingError {
    RecordingError::InvalidNumber {
        index,
        value: value.to_string(),
    }
}
