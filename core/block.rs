use std::fmt;

/// Marker that opens every file block's header line. The separator below
/// must never start with this marker, so a downstream parser can split a
/// document on header lines alone.
pub const BLOCK_HEADER_MARKER: &str = "### FILE: ";
pub const BLOCK_SEPARATOR: &str = "### ---";

const BLOCK_TRAILER: &[u8] = b"\n\n### ---\n\n";

/// A file that existed at scan time, with its content carried as raw
/// bytes. Content is never re-encoded or normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    /// Project-root-relative path, as shown in the header line.
    pub path: String,
    pub content: Vec<u8>,
}

impl fmt::Display for FileBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.path, self.content.len())
    }
}

/// Render one self-delimited block: header line, verbatim content bytes,
/// blank line, separator line, blank line.
pub fn format_block(block: &FileBlock) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        BLOCK_HEADER_MARKER.len() + block.path.len() + block.content.len() + BLOCK_TRAILER.len() + 1,
    );
    out.extend_from_slice(BLOCK_HEADER_MARKER.as_bytes());
    out.extend_from_slice(block.path.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(&block.content);
    out.extend_from_slice(BLOCK_TRAILER);
    out
}

/// Split a produced document back into its ordered (path, content) pairs.
/// Inverse of [`format_block`]: bytes before the first header line (the
/// preamble and structure sections) are ignored, and content comes back
/// byte-for-byte as it was on disk.
pub fn split_blocks(document: &[u8]) -> Vec<(String, Vec<u8>)> {
    let marker = BLOCK_HEADER_MARKER.as_bytes();
    let mut starts = Vec::new();
    let mut from = 0;
    while let Some(pos) = find(document, marker, from) {
        if pos == 0 || document[pos - 1] == b'\n' {
            starts.push(pos);
        }
        from = pos + marker.len();
    }

    let mut blocks = Vec::new();
    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(document.len());
        let segment = &document[start + marker.len()..end];
        let Some(newline) = segment.iter().position(|&b| b == b'\n') else {
            continue;
        };
        let path = String::from_utf8_lossy(&segment[..newline]).into_owned();
        let body = &segment[newline + 1..];
        let content = match body.len().checked_sub(BLOCK_TRAILER.len()) {
            Some(cut) if &body[cut..] == BLOCK_TRAILER => &body[..cut],
            _ => body,
        };
        blocks.push((path, content.to_vec()));
    }
    blocks
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
