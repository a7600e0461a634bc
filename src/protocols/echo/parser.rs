//! Line framing for the echo protocol.

/// Line delimiter.
pub const NEWLINE: u8 = b'\n';

/// Find the first complete line in the buffer.
///
/// Returns the line length including the trailing `\n`, or `None` if no
/// delimiter has been buffered yet.
pub fn find_line(input: &[u8]) -> Option<usize> {
    input.iter().position(|&b| b == NEWLINE).map(|pos| pos + 1)
}
