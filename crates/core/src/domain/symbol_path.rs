// Symbol Path Domain Model
//
// Ordered segment list backing the symbol path environment variable.
// The server marker is always the first segment and is never removed;
// every other segment is a distinct filesystem path in insertion order.

use std::fmt;

use super::error::{DomainError, Result};

/// Delimiter between segments in the serialized variable value
pub const SEGMENT_DELIMITER: char = ';';

/// Ordered, duplicate-free segment list with a fixed first segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPath {
    segments: Vec<String>,
}

impl SymbolPath {
    /// Create a path holding only the server marker
    pub fn seed(server_marker: impl Into<String>) -> Self {
        Self {
            segments: vec![server_marker.into()],
        }
    }

    /// Parse a raw variable value, taking existing segments verbatim.
    ///
    /// Empty segments (doubled or trailing delimiters) are dropped and
    /// duplicates keep their first occurrence, so the invariants hold
    /// even for externally written content. The server marker is
    /// prepended when the raw value does not already start with it.
    pub fn parse(server_marker: &str, raw: &str) -> Self {
        let mut segments: Vec<String> = Vec::new();
        for segment in raw.split(SEGMENT_DELIMITER) {
            if segment.is_empty() {
                continue;
            }
            if !segments.iter().any(|existing| existing == segment) {
                segments.push(segment.to_string());
            }
        }

        match segments.iter().position(|s| s == server_marker) {
            Some(0) => {}
            Some(index) => {
                // Marker present but displaced by an external writer
                let marker = segments.remove(index);
                segments.insert(0, marker);
            }
            None => segments.insert(0, server_marker.to_string()),
        }

        Self { segments }
    }

    pub fn server_marker(&self) -> &str {
        &self.segments[0]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn contains(&self, segment: &str) -> bool {
        self.segments.iter().any(|s| s == segment)
    }

    /// Append a segment, preserving distinctness; already-present
    /// segments are a no-op.
    pub fn append(&mut self, segment: &str) -> Result<()> {
        if segment.is_empty() {
            return Err(DomainError::EmptySegment);
        }
        if segment.contains(SEGMENT_DELIMITER) {
            return Err(DomainError::DelimiterInSegment(segment.to_string()));
        }
        if !self.contains(segment) {
            self.segments.push(segment.to_string());
        }
        Ok(())
    }

    /// Remove a segment by exact match. The server marker is never
    /// removed; an absent segment is a no-op, not an error.
    pub fn remove(&mut self, segment: &str) {
        if segment == self.server_marker() {
            return;
        }
        self.segments.retain(|s| s != segment);
    }
}

impl fmt::Display for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, "{SEGMENT_DELIMITER}")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}
