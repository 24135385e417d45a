//! Marker block handling for the shell startup file.
//!
//! A block starts at any line containing [`BLOCK_MARKER`] and runs through the
//! first later line that is exactly [`BLOCK_CLOSING`]. A block with no closing
//! line extends to the end of the file.
//!
//! Startup files are user content in no particular encoding, so everything
//! here works on bytes.

use memchr::memmem;

use crate::layout::InstallLayout;

pub const BLOCK_MARKER: &str = "# >>> jumpmark initialize >>>";
pub const BLOCK_CLOSING: &str = "# <<< jumpmark initialize <<<";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ScanState {
    Outside,
    InsideBlock,
}

impl ScanState {
    fn next(self, line: &[u8]) -> Self {
        match self {
            Self::Outside if memmem::find(line, BLOCK_MARKER.as_bytes()).is_some() => {
                Self::InsideBlock
            }
            Self::InsideBlock if line == BLOCK_CLOSING.as_bytes() => Self::Outside,
            state => state,
        }
    }
}

/// Sourcing snippet for `layout`, without a trailing newline.
pub fn render_snippet(layout: &InstallLayout) -> String {
    let script = layout.script_path_for_shell();
    format!(
        "{BLOCK_MARKER}\nif [ -f \"{script}\" ]; then\n    . \"{script}\"\nfi\n{BLOCK_CLOSING}"
    )
}

/// Escapes the characters that keep their meaning inside double quotes.
pub(crate) fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '$' | '`' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn contains_marker(content: &[u8]) -> bool {
    memmem::find(content, BLOCK_MARKER.as_bytes()).is_some()
}

/// Drops every marker block, copying all other lines byte-for-byte.
pub fn strip_marked_blocks(content: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(content.len());
    let mut state = ScanState::Outside;
    for raw_line in content.split_inclusive(|b| *b == b'\n') {
        let line = raw_line.strip_suffix(b"\n").unwrap_or(raw_line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let before = state;
        state = state.next(line);
        // Boundary lines flip the state in either direction and are dropped
        // along with everything between them.
        if before == ScanState::Outside && state == ScanState::Outside {
            output.extend_from_slice(raw_line);
        }
    }
    output
}

/// Appends a blank line, the snippet and a final newline.
pub fn append_snippet(content: &[u8], snippet: &str) -> Vec<u8> {
    let mut output = Vec::with_capacity(content.len() + snippet.len() + 3);
    output.extend_from_slice(content);
    if !output.is_empty() && !output.ends_with(b"\n") {
        output.push(b'\n');
    }
    output.push(b'\n');
    output.extend_from_slice(snippet.as_bytes());
    output.push(b'\n');
    output
}

/// Removes existing blocks and appends `snippet` in their place at the end of
/// the file. Blank lines left dangling at the end by the removal are dropped so
/// that repeated updates produce identical content.
pub fn replace_marked_block(content: &[u8], snippet: &str) -> Vec<u8> {
    let stripped = strip_marked_blocks(content);
    append_snippet(trim_trailing_blank_lines(&stripped), snippet)
}

fn trim_trailing_blank_lines(content: &[u8]) -> &[u8] {
    let mut end = content.len();
    loop {
        let head = &content[..end];
        let without_newline = match head.strip_suffix(b"\n") {
            Some(rest) => rest.strip_suffix(b"\r").unwrap_or(rest),
            None => return head,
        };
        if without_newline.is_empty() || without_newline.ends_with(b"\n") {
            end = without_newline.len();
            continue;
        }
        return head;
    }
}
