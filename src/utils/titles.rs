//! 章节标题规范化
//!
//! 最终装配按规范结构文件重排章节时，标题两侧可能带有不同的编号前缀
//! （"1."、"一、"、"（一）"等）与markdown标记，匹配前先做归一化。

use regex::Regex;
use std::sync::LazyLock;

static ENUM_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:第?[一二三四五六七八九十百]+[、．.]?|（[一二三四五六七八九十]+）|\(?\d+\)?[、．.]?)\s*")
        .unwrap()
});

/// 去除标题前导的markdown标记与枚举编号，返回可比对的核心标题
pub fn normalize_title(raw: &str) -> String {
    let mut title = raw.trim().trim_start_matches('#').trim();
    if let Some(matched) = ENUM_PREFIX.find(title) {
        title = title[matched.end()..].trim();
    }
    title.to_string()
}

/// 两个标题在归一化后是否指同一章节
pub fn titles_match(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_title(a), normalize_title(b));
    !a.is_empty() && a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_chinese_enumeration() {
        assert_eq!(normalize_title("一、项目概述"), "项目概述");
        assert_eq!(normalize_title("二、综合绩效评价结论"), "综合绩效评价结论");
        assert_eq!(normalize_title("（三）主要成效"), "主要成效");
    }

    #[test]
    fn test_strip_arabic_enumeration() {
        assert_eq!(normalize_title("1. 项目概述"), "项目概述");
        assert_eq!(normalize_title("2、改进建议"), "改进建议");
        assert_eq!(normalize_title("(3) 问题分析"), "问题分析");
    }

    #[test]
    fn test_strip_markdown_heading() {
        assert_eq!(normalize_title("### 一、项目概述"), "项目概述");
        assert_eq!(normalize_title("## 改进建议"), "改进建议");
    }

    #[test]
    fn test_plain_title_unchanged() {
        assert_eq!(normalize_title("项目概述"), "项目概述");
    }

    #[test]
    fn test_titles_match() {
        assert!(titles_match("一、项目概述", "### 1. 项目概述"));
        assert!(!titles_match("项目概述", "改进建议"));
        assert!(!titles_match("", ""));
    }
}
