use std::fmt;

/// One segment of a compiled path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The property name, without surrounding whitespace.
    pub name: String,
    /// Raw text of the path from this segment to the end, trimmed. Maps are
    /// checked for this whole text as a key before the segment is resolved
    /// on its own.
    pub rest: String,
}

impl Segment {
    /// Is this the last segment of the path?
    pub fn is_last(&self) -> bool {
        self.name == self.rest
    }
}

/// A parsed property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPath {
    pub source: String,
    pub segments: Vec<Segment>,
}

impl CompiledPath {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }

    /// All segments but the last, and the last one.
    pub fn split_last(&self) -> Option<(&Segment, &[Segment])> {
        self.segments.split_last()
    }
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join("."))
    }
}
