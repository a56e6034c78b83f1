//! LLM文本回复的尽力而为JSON提取
//!
//! 回退顺序固定：直接解析 → ```json 代码块 → 任意代码块 → 首个配对的
//! JSON数组 → 首个配对的JSON对象 → 放弃返回None。结构设计与证据收集
//! 两处统一使用本工具，不再各自维护兜底逻辑。

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap());
static FENCED_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\s*(.*?)\s*```").unwrap());

/// 从LLM回复中提取JSON值
pub fn extract_json(response: &str) -> Option<Value> {
    // 预处理：去除BOM，将成对中文引号替换为英文引号
    let text = response
        .replace('\u{FEFF}', "")
        .replace('“', "\"")
        .replace('”', "\"");

    if let Ok(value) = serde_json::from_str::<Value>(&text) {
        return Some(value);
    }

    // 代码块：优先json标记，其次任意代码块
    for pattern in [&*FENCED_JSON, &*FENCED_ANY] {
        if let Some(captures) = pattern.captures(&text) {
            let candidate = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                return Some(value);
            }
            // 代码块内仍带包裹文本时，继续在块内做配对提取
            if let Some(value) = extract_balanced(candidate, '[', ']')
                .or_else(|| extract_balanced(candidate, '{', '}'))
            {
                return Some(value);
            }
        }
    }

    extract_balanced(&text, '[', ']').or_else(|| extract_balanced(&text, '{', '}'))
}

/// 从LLM回复中提取JSON对象（顶层必须为object）
pub fn extract_json_object(response: &str) -> Option<serde_json::Map<String, Value>> {
    match extract_json(response) {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// 括号配对提取：找到首个open字符，向后扫描到配对闭合处尝试解析
fn extract_balanced(text: &str, open: char, close: char) -> Option<Value> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + close.len_utf8();
                    return serde_json::from_str::<Value>(&text[start..end]).ok();
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_parse() {
        let value = extract_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_fenced_json_block() {
        let response = "好的，以下是结果：\n```json\n{\"title\": \"报告\"}\n```\n希望有帮助。";
        let value = extract_json(response).unwrap();
        assert_eq!(value["title"], "报告");
    }

    #[test]
    fn test_plain_fenced_block() {
        let response = "```\n[1, 2, 3]\n```";
        let value = extract_json(response).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_brace_matching_with_surrounding_text() {
        let response = "分析如下 {\"ok\": true, \"nested\": {\"x\": [1]}} 以上。";
        let value = extract_json(response).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["nested"]["x"][0], 1);
    }

    #[test]
    fn test_array_preferred_over_object() {
        let response = "[{\"id\": 0}] 与 {\"id\": 1}";
        let value = extract_json(response).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_fullwidth_quotes_normalized() {
        let response = "{“项目情况”: “测试项目”}";
        let value = extract_json(response).unwrap();
        assert_eq!(value["项目情况"], "测试项目");
    }

    #[test]
    fn test_brace_inside_string_ignored() {
        let response = r#"{"text": "包含}括号", "n": 2}"#;
        let value = extract_json(response).unwrap();
        assert_eq!(value["n"], 2);
    }

    #[test]
    fn test_unparseable_returns_none() {
        assert!(extract_json("完全不是JSON的文本").is_none());
        assert!(extract_json("").is_none());
    }

    #[test]
    fn test_object_helper_rejects_array() {
        assert!(extract_json_object("[1,2]").is_none());
        assert!(extract_json_object("{\"k\": \"v\"}").is_some());
    }
}
