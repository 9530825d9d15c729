use regex::{Regex, RegexBuilder};

/// 通配符
pub const WILDCARD: char = '*';

/// "不匹配任何内容" 的哨兵字符串，忽略模式的默认值
pub const MATCH_NONE_SENTINEL: &str = "!";

/// 编译后的模式形态
#[derive(Debug, Clone)]
pub enum PatternShape {
    /// 空模式或仅包含空白，匹配一切
    MatchAll,
    /// 哨兵 `!`，不匹配任何内容
    MatchNone,
    /// 不含通配符，忽略大小写的完全相等
    Exact(String),
    /// 以 `*` 结尾，保存去掉通配符后的前缀
    PrefixAnchored(String),
    /// 以 `*` 开头，保存去掉通配符后的后缀
    SuffixAnchored(String),
    /// 多个或位于中间的 `*`；编译失败时为 `None`，视为不匹配
    RegexFallback(Option<Regex>),
}

/// 通配符模式
///
/// `*` 表示任意长度（可为空）的字符序列，其余字符按字面匹配，比较时忽略大小写。
/// 大小写折叠使用 Unicode 小写规则，与运行环境的区域设置无关。
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    shape: PatternShape,
}

impl WildcardPattern {
    /// 编译通配符字符串
    pub fn compile(pattern: &str) -> Self {
        let shape = if pattern.trim().is_empty() {
            PatternShape::MatchAll
        } else if pattern == MATCH_NONE_SENTINEL {
            PatternShape::MatchNone
        } else {
            match pattern.matches(WILDCARD).count() {
                0 => PatternShape::Exact(fold_case(pattern)),
                1 if pattern.starts_with(WILDCARD) => {
                    PatternShape::SuffixAnchored(fold_case(&pattern[WILDCARD.len_utf8()..]))
                }
                1 if pattern.ends_with(WILDCARD) => PatternShape::PrefixAnchored(fold_case(
                    &pattern[..pattern.len() - WILDCARD.len_utf8()],
                )),
                _ => PatternShape::RegexFallback(build_regex(pattern)),
            }
        };

        Self {
            source: pattern.to_string(),
            shape,
        }
    }

    /// 匹配一切的模式
    pub fn match_all() -> Self {
        Self::compile("")
    }

    /// 不匹配任何内容的模式
    pub fn match_none() -> Self {
        Self::compile(MATCH_NONE_SENTINEL)
    }

    /// 原始模式字符串
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn shape(&self) -> &PatternShape {
        &self.shape
    }

    /// 判断文件名或目录名是否匹配
    pub fn is_match(&self, subject: &str) -> bool {
        match &self.shape {
            PatternShape::MatchAll => true,
            PatternShape::MatchNone => false,
            PatternShape::Exact(expected) => fold_case(subject) == *expected,
            PatternShape::PrefixAnchored(prefix) => fold_case(subject).starts_with(prefix.as_str()),
            PatternShape::SuffixAnchored(suffix) => fold_case(subject).ends_with(suffix.as_str()),
            PatternShape::RegexFallback(Some(regex)) => regex.is_match(subject),
            PatternShape::RegexFallback(None) => false,
        }
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for WildcardPattern {}

/// 一次性编译并匹配
pub fn matches(subject: &str, pattern: &str) -> bool {
    WildcardPattern::compile(pattern).is_match(subject)
}

fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// 逐字符转义，仅将 `*` 替换为 `.*`，并锚定整个字符串
fn build_regex(pattern: &str) -> Option<Regex> {
    let mut expr = String::with_capacity(pattern.len() * 2 + 2);
    expr.push('^');
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        if c == WILDCARD {
            expr.push_str(".*");
        } else {
            expr.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }
    expr.push('$');

    RegexBuilder::new(&expr)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_pattern_matches_everything() {
        for subject in ["", "a.png", "README", "目录"] {
            assert!(matches(subject, ""));
            assert!(matches(subject, "   "));
            assert!(matches(subject, "\t"));
        }
    }

    #[test]
    fn test_sentinel_matches_nothing() {
        for subject in ["", "!", "a.png", "anything"] {
            assert!(!matches(subject, "!"));
        }
        // 只有恰好等于 "!" 才是哨兵
        assert!(matches("!!", "!!"));
        assert!(matches("a!", "*!"));
    }

    #[test]
    fn test_exact_is_case_insensitive_equality() {
        assert!(matches("Report.TXT", "report.txt"));
        assert!(!matches("report.txt.bak", "report.txt"));
        assert!(!matches("report", "report.txt"));
    }

    #[test]
    fn test_suffix_anchored() {
        assert!(matches("photo.PNG", "*.png"));
        assert!(matches(".png", "*.png"));
        assert!(!matches("photo.png.bak", "*.png"));
        assert!(matches("b_TO_DELETE", "*to_delete"));
        // 单独的 "*" 匹配一切
        assert!(matches("", "*"));
        assert!(matches("x", "*"));
    }

    #[test]
    fn test_prefix_anchored() {
        assert!(matches("Backup-2024.zip", "backup*"));
        assert!(matches("backup", "backup*"));
        assert!(!matches("old-backup", "backup*"));
    }

    #[test]
    fn test_interior_wildcard_uses_regex() {
        let pattern = WildcardPattern::compile("img*.png");
        assert!(matches!(pattern.shape(), PatternShape::RegexFallback(Some(_))));
        assert!(pattern.is_match("IMG_001.PNG"));
        assert!(pattern.is_match("img.png"));
        assert!(!pattern.is_match("x-img.png"));
        assert!(!pattern.is_match("img.png.old"));
    }

    #[test]
    fn test_multiple_wildcards() {
        assert!(matches("a-keep-b.png", "*keep*"));
        assert!(matches("keep", "*keep*"));
        assert!(!matches("kep", "*keep*"));
        assert!(matches("x.tar.gz", "*.tar.*"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("a+b(1).txt", "a+b(1)*.txt"));
        assert!(!matches("aab1.txt", "a+b(1)*.txt"));
        assert!(matches("file[1].log", "file[1]*"));
        assert!(matches("x.y", "x.y"));
        assert!(!matches("xzy", "x.y"));
        assert!(matches("a.b.c", "a.*.c"));
        assert!(!matches("aXbXc", "a.*.c"));
        assert!(matches("C:\\dir\\x", "*\\*x"));
    }

    #[test]
    fn test_shapes() {
        assert!(matches!(WildcardPattern::compile("").shape(), PatternShape::MatchAll));
        assert!(matches!(WildcardPattern::compile("!").shape(), PatternShape::MatchNone));
        assert!(matches!(WildcardPattern::compile("a.txt").shape(), PatternShape::Exact(_)));
        assert!(matches!(WildcardPattern::compile("a*").shape(), PatternShape::PrefixAnchored(_)));
        assert!(matches!(WildcardPattern::compile("*a").shape(), PatternShape::SuffixAnchored(_)));
        assert!(matches!(
            WildcardPattern::compile("**").shape(),
            PatternShape::RegexFallback(Some(_))
        ));
        assert_eq!(WildcardPattern::match_none().as_str(), "!");
    }
}
