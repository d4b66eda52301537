//! Placeholder rewriting between SQL dialects.
//!
//! Parameterized statements may be written with format-style `%s`
//! placeholders, Postgres `$N`, or `SQLite` `?N`. Before binding, the text is
//! rewritten to the dialect of the session it runs on. Quoted strings,
//! quoted identifiers, comments, and dollar-quoted blocks are left alone.

use std::borrow::Cow;

mod parsers;
mod scanner;

use parsers::{
    closes_tag, is_block_comment_end, is_block_comment_start, is_line_comment_start,
    try_start_dollar_quote,
};
use scanner::{State, is_format_placeholder, scan_digits};

use crate::types::DatabaseType;

/// Target placeholder style for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Postgres-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?1`.
    Sqlite,
}

impl PlaceholderStyle {
    fn sigil(self) -> char {
        match self {
            PlaceholderStyle::Postgres => '$',
            PlaceholderStyle::Sqlite => '?',
        }
    }
}

impl From<DatabaseType> for PlaceholderStyle {
    fn from(db_type: DatabaseType) -> Self {
        match db_type {
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => PlaceholderStyle::Postgres,
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => PlaceholderStyle::Sqlite,
        }
    }
}

/// Rewrite placeholders in `sql` to the `target` style.
///
/// `%s` placeholders are numbered left to right starting at 1. A bare `?` is
/// numbered the same way when targeting Postgres. Returns a borrowed `Cow`
/// when nothing had to change.
///
/// ```rust
/// use school_db::translation::{PlaceholderStyle, translate_placeholders};
///
/// let sql = "INSERT INTO client VALUES (%s, %s)";
/// assert_eq!(
///     translate_placeholders(sql, PlaceholderStyle::Postgres),
///     "INSERT INTO client VALUES ($1, $2)"
/// );
/// ```
#[must_use]
pub fn translate_placeholders(sql: &str, target: PlaceholderStyle) -> Cow<'_, str> {
    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut state = State::Normal;
    let mut sequence = 0usize;
    // Start of the not-yet-copied slice of `sql`.
    let mut copied_to = 0usize;
    let mut idx = 0usize;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => {
                let mut replacement: Option<(usize, String)> = None;
                match b {
                    b'\'' => state = State::SingleQuoted,
                    b'"' => state = State::DoubleQuoted,
                    _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                    _ if is_block_comment_start(bytes, idx) => {
                        state = State::BlockComment(1);
                        idx += 1;
                    }
                    b'%' if is_format_placeholder(bytes, idx) => {
                        sequence += 1;
                        replacement = Some((idx + 2, format!("{}{sequence}", target.sigil())));
                    }
                    b'$' => {
                        if let Some((tag, close)) = try_start_dollar_quote(bytes, idx) {
                            state = State::DollarQuoted(tag);
                            idx = close;
                        } else if target == PlaceholderStyle::Sqlite {
                            if let Some((end, digits)) = scan_digits(bytes, idx + 1) {
                                replacement = Some((end, format!("?{digits}")));
                            }
                        }
                    }
                    b'?' if target == PlaceholderStyle::Postgres => {
                        match scan_digits(bytes, idx + 1) {
                            Some((end, digits)) => {
                                replacement = Some((end, format!("${digits}")));
                            }
                            None => {
                                sequence += 1;
                                replacement = Some((idx + 1, format!("${sequence}")));
                            }
                        }
                    }
                    _ => {}
                }

                if let Some((end, text)) = replacement {
                    let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
                    buf.push_str(&sql[copied_to..idx]);
                    buf.push_str(&text);
                    copied_to = end;
                    idx = end;
                    continue;
                }
            }
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && closes_tag(bytes, idx, tag) {
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }
        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied_to..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}

/// Translate only when `enabled`; otherwise hand back the original text.
#[must_use]
pub fn translate_if(sql: &str, target: PlaceholderStyle, enabled: bool) -> Cow<'_, str> {
    if enabled {
        translate_placeholders(sql, target)
    } else {
        Cow::Borrowed(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_style_numbers_left_to_right() {
        let sql = "INSERT INTO teacher (teacher_id, first_name) VALUES (%s, %s)";
        assert_eq!(
            translate_placeholders(sql, PlaceholderStyle::Postgres),
            "INSERT INTO teacher (teacher_id, first_name) VALUES ($1, $2)"
        );
        assert_eq!(
            translate_placeholders(sql, PlaceholderStyle::Sqlite),
            "INSERT INTO teacher (teacher_id, first_name) VALUES (?1, ?2)"
        );
    }

    #[test]
    fn translates_between_numbered_styles() {
        let sql = "select * from client where client_id = ?1 and industry = ?2";
        assert_eq!(
            translate_placeholders(sql, PlaceholderStyle::Postgres),
            "select * from client where client_id = $1 and industry = $2"
        );

        let sql = "update client set address = $2 where client_id = $1";
        assert_eq!(
            translate_placeholders(sql, PlaceholderStyle::Sqlite),
            "update client set address = ?2 where client_id = ?1"
        );
    }

    #[test]
    fn bare_question_marks_become_numbered_for_postgres() {
        let sql = "delete from course where course_id = ? or course_id = ?";
        assert_eq!(
            translate_placeholders(sql, PlaceholderStyle::Postgres),
            "delete from course where course_id = $1 or course_id = $2"
        );
        assert!(matches!(
            translate_placeholders(sql, PlaceholderStyle::Sqlite),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn skips_literals_and_comments() {
        let sql = "select '%s', \"?1\", $1 -- $2\n/* %s /* ?3 */ */ from t where a LIKE 'x%'";
        assert_eq!(
            translate_placeholders(sql, PlaceholderStyle::Sqlite),
            "select '%s', \"?1\", ?1 -- $2\n/* %s /* ?3 */ */ from t where a LIKE 'x%'"
        );
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "$body$ select $1 from t $body$ where a = $1";
        assert_eq!(
            translate_placeholders(sql, PlaceholderStyle::Sqlite),
            "$body$ select $1 from t $body$ where a = ?1"
        );
    }

    #[test]
    fn escaped_quotes_stay_inside_literal() {
        let sql = "select 'it''s %s' , %s";
        assert_eq!(
            translate_placeholders(sql, PlaceholderStyle::Postgres),
            "select 'it''s %s' , $1"
        );
    }

    #[test]
    fn percent_words_are_not_placeholders() {
        let sql = "select 10 %size from t";
        assert!(matches!(
            translate_placeholders(sql, PlaceholderStyle::Postgres),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn disabled_translation_borrows() {
        let sql = "select * from t where a = %s";
        let res = translate_if(sql, PlaceholderStyle::Postgres, false);
        assert!(matches!(res, Cow::Borrowed(_)));
        assert_eq!(res, sql);
    }
}
