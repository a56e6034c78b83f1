//! 研究简报 - 上游调研环节产出的六字段结构化事实摘要

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::utils::json_extract::extract_json;

/// 来源标记模式："来源:标签" 或 "来源：标签"，标签止于分隔符
static SOURCE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"来源[:：]\s*([^\s,，;；。]+)").unwrap());

/// 研究简报
///
/// 字段集固定；解析失败降级为空简报，写作阶段凭现有证据继续。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResearchBrief {
    #[serde(rename = "项目情况", default)]
    pub project_situation: String,
    #[serde(rename = "资金情况", default)]
    pub funding_situation: String,
    #[serde(rename = "重要事件", default)]
    pub key_events: String,
    #[serde(rename = "政策引用", default)]
    pub policy_references: String,
    #[serde(rename = "推荐方法", default)]
    pub recommended_methods: String,
    #[serde(rename = "可借鉴网络案例", default)]
    pub referenceable_cases: String,
}

impl ResearchBrief {
    /// 从简报文档文本宽松解析
    ///
    /// 文档可能是裸JSON，也可能是带围栏或夹杂说明文字的LLM输出；
    /// 任何一步失败都返回空简报而不是错误。
    pub fn parse(text: &str) -> Self {
        extract_json(text)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    /// 简报是否不含任何事实内容
    pub fn is_empty(&self) -> bool {
        self.named_fields()
            .iter()
            .all(|(_, value)| value.trim().is_empty())
    }

    /// 整理事实依据文本：非空字段按【字段名】分块罗列，空字段省略
    pub fn factual_basis_text(&self) -> String {
        let blocks: Vec<String> = self
            .named_fields()
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, value)| format!("【{}】\n{}", name, value.trim()))
            .collect();
        blocks.join("\n\n")
    }

    /// 从"可借鉴网络案例"字段提取来源标签，保持出现顺序并去重
    pub fn source_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        for capture in SOURCE_MARKER.captures_iter(&self.referenceable_cases) {
            if let Some(label) = capture.get(1) {
                let label = label.as_str().to_string();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    fn named_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("项目情况", self.project_situation.as_str()),
            ("资金情况", self.funding_situation.as_str()),
            ("重要事件", self.key_events.as_str()),
            ("政策引用", self.policy_references.as_str()),
            ("推荐方法", self.recommended_methods.as_str()),
            ("可借鉴网络案例", self.referenceable_cases.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_json() {
        let brief = ResearchBrief::parse(
            r#"{"项目情况":"测试项目","资金情况":"预算500万","重要事件":"","政策引用":"","推荐方法":"","可借鉴网络案例":""}"#,
        );
        assert_eq!(brief.project_situation, "测试项目");
        assert_eq!(brief.funding_situation, "预算500万");
    }

    #[test]
    fn test_parse_fenced_json_with_noise() {
        let text = "以下是研究简报：\n```json\n{\"项目情况\":\"农村饮水工程\",\"可借鉴网络案例\":\"来源:A\"}\n```\n以上。";
        let brief = ResearchBrief::parse(text);
        assert_eq!(brief.project_situation, "农村饮水工程");
    }

    #[test]
    fn test_parse_garbage_degrades_to_empty() {
        let brief = ResearchBrief::parse("这里没有任何JSON内容");
        assert!(brief.is_empty());
    }

    #[test]
    fn test_factual_basis_omits_empty_fields() {
        let brief = ResearchBrief {
            project_situation: "测试项目".to_string(),
            ..Default::default()
        };
        let text = brief.factual_basis_text();
        assert!(text.contains("【项目情况】"));
        assert!(text.contains("测试项目"));
        assert!(!text.contains("【资金情况】"));
        assert!(!text.contains("【重要事件】"));
    }

    #[test]
    fn test_source_labels_ordered_and_deduped() {
        let brief = ResearchBrief {
            referenceable_cases: "来源:A；来源：B，来源:A".to_string(),
            ..Default::default()
        };
        assert_eq!(brief.source_labels(), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_source_labels_empty_field() {
        assert!(ResearchBrief::default().source_labels().is_empty());
    }
}
