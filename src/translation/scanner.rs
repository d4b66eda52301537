/// Lexical context of the byte currently being scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

/// Read an unsigned decimal run starting at `start`; returns the end index and the digits.
pub(super) fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let end = bytes[start.min(bytes.len())..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |offset| start + offset);
    if end == start {
        return None;
    }
    std::str::from_utf8(&bytes[start..end])
        .ok()
        .map(|digits| (end, digits))
}

pub(super) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// `%s` as a standalone format placeholder (not the prefix of `%something`).
pub(super) fn is_format_placeholder(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'%')
        && bytes.get(idx + 1) == Some(&b's')
        && !bytes.get(idx + 2).copied().is_some_and(is_ident_byte)
}
