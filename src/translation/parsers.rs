pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx..].starts_with(b"--")
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx..].starts_with(b"/*")
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes[idx..].starts_with(b"*/")
}

/// Recognize a Postgres dollar-quote opener (`$$` or `$tag$`) at `start`.
/// Returns the tag and the index of the closing `$` of the opener.
pub(super) fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let rest = &bytes[start + 1..];
    let len = rest.iter().position(|b| *b == b'$')?;
    let tag = &rest[..len];
    // `$1` is a placeholder, not a tag.
    if tag.first().is_some_and(u8::is_ascii_digit)
        || !tag.iter().all(|b| super::scanner::is_ident_byte(*b))
    {
        return None;
    }
    let tag = String::from_utf8(tag.to_vec()).ok()?;
    Some((tag, start + 1 + len))
}

/// Whether the `$` at `idx` closes a dollar-quoted block opened with `tag`.
pub(super) fn closes_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let body = &bytes[idx + 1..];
    body.starts_with(tag.as_bytes()) && body.get(tag.len()) == Some(&b'$')
}
