//! 括号规则：追加 `::type` 或输出 ON CONFLICT 索引元素之前，按文本形状决定是否加括号。

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

fn need_brackets() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[^a-z0-9$._']").expect("valid need-brackets regex"))
}

fn func_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^[a-z0-9_.]+\([^()]*\)$").expect("valid func-call regex"))
}

fn single_quoted() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^'[^']*'$").expect("valid quoted regex"))
}

/// `text` 以 `open` 开头，且与之配对的 `close` 正好是最后一个字符。
/// 单引号字符串里的括号不计入。
fn encloses(text: &str, open: char, close: char) -> bool {
    if !text.starts_with(open) || !text.ends_with(close) {
        return false;
    }
    let mut depth = 0usize;
    let mut quoted = false;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            _ if quoted => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth = match depth.checked_sub(1) {
                    Some(d) => d,
                    None => return false,
                };
                if depth == 0 {
                    return i + c.len_utf8() == text.len();
                }
            }
            _ => {}
        }
    }
    false
}

fn is_array_literal(text: &str) -> bool {
    text.strip_prefix("ARRAY")
        .is_some_and(|rest| encloses(rest, '[', ']'))
}

fn named_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"%\(p[0-9]+\)s").expect("valid placeholder regex"))
}

/// 命名占位符 `%(pN)s` 在形状判断里等同于 `$N`。
fn shape(text: &str) -> Cow<'_, str> {
    named_placeholder().replace_all(text, "$$0")
}

pub(crate) fn wrap(text: &str) -> String {
    format!("({text})")
}

/// 整段文本是否是同一对括号包住的一个整体：`(a + b) - (c + d)` 不算。
pub(crate) fn is_parenthesized(text: &str) -> bool {
    encloses(text, '(', ')')
}

/// 作为 cast / 下标的主体时是否需要加括号。
pub(crate) fn needs_wrapping(text: &str) -> bool {
    let shape = shape(text);
    need_brackets().is_match(&shape)
        && !is_parenthesized(&shape)
        && !func_call().is_match(&shape)
        && !single_quoted().is_match(&shape)
        && !is_array_literal(&shape)
}

/// `value::to`；`force` 时整体再包一层括号。
pub(crate) fn cast(value: String, to: &str, force: bool) -> String {
    let value = if needs_wrapping(&value) {
        wrap(&value)
    } else {
        value
    };
    let casted = format!("{value}::{to}");
    if force { wrap(&casted) } else { casted }
}

/// ON CONFLICT 索引元素：非平凡表达式需要外层括号。
pub(crate) fn index_element(value: String) -> String {
    let shape = shape(&value);
    if need_brackets().is_match(&shape)
        && !is_parenthesized(&shape)
        && !func_call().is_match(&shape)
    {
        wrap(&value)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::{cast, index_element, is_parenthesized, needs_wrapping};
    use pretty_assertions::assert_eq;

    #[test]
    fn cast_keeps_simple_and_shaped_text() {
        assert_eq!(cast("t.col".into(), "int", false), "t.col::int");
        assert_eq!(cast("$1".into(), "int[]", false), "$1::int[]");
        assert_eq!(cast("%(p1)s".into(), "str", false), "%(p1)s::str");
        assert_eq!(cast("COUNT($1)".into(), "int", false), "COUNT($1)::int");
        assert_eq!(cast("COUNT(%(p2)s)".into(), "int", false), "COUNT(%(p2)s)::int");
        assert_eq!(cast("'2022-11-05'".into(), "date", false), "'2022-11-05'::date");
        assert_eq!(cast("ARRAY[1, 2]".into(), "int[]", false), "ARRAY[1, 2]::int[]");
        assert_eq!(cast("(a + b)".into(), "int", false), "(a + b)::int");
    }

    #[test]
    fn cast_wraps_complex_text() {
        assert_eq!(cast("a + b".into(), "int", false), "(a + b)::int");
        assert_eq!(cast("-2".into(), "int", false), "(-2)::int");
        assert_eq!(
            cast("COUNT(t.id) OVER ()".into(), "int", false),
            "(COUNT(t.id) OVER ())::int"
        );
        assert_eq!(cast("t.col".into(), "int", true), "(t.col::int)");
        assert_eq!(
            cast("(t.a + t.b) - (t.c + t.d)".into(), "int", false),
            "((t.a + t.b) - (t.c + t.d))::int"
        );
        assert_eq!(
            cast("ARRAY[1] || ARRAY[2]".into(), "int[]", false),
            "(ARRAY[1] || ARRAY[2])::int[]"
        );
    }

    #[test]
    fn index_element_rule() {
        assert_eq!(index_element("col1".into()), "col1");
        assert_eq!(index_element("LOWER(col1)".into()), "LOWER(col1)");
        assert_eq!(index_element("(col1::int)".into()), "(col1::int)");
        assert_eq!(index_element("col1 + col2".into()), "(col1 + col2)");
        assert_eq!(index_element("(a) + (b)".into()), "((a) + (b))");
    }

    #[test]
    fn shape_helpers() {
        assert!(!is_parenthesized("(a) AND (b)"));
        assert!(!is_parenthesized("a AND (b)"));
        assert!(is_parenthesized("((a) AND (b))"));
        assert!(is_parenthesized("(a = ')(')"));
        assert!(!is_parenthesized("(a = '(') OR (b)"));
        assert!(needs_wrapping("t.col[$1]"));
        assert!(!needs_wrapping("t.col"));
    }
}
