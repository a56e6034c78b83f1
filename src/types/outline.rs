use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 报告章节 - 归属于其所在的报告大纲
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Section {
    /// 章节标题
    pub title: String,
    /// 指导本章节写作的核心要点与检索要求
    pub writing_guidance: String,
    /// 本章节关联的指标ID列表
    #[serde(default)]
    pub associated_metric_ids: Vec<String>,
}

impl Section {
    pub fn new(title: impl Into<String>, writing_guidance: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            writing_guidance: writing_guidance.into(),
            associated_metric_ids: Vec::new(),
        }
    }
}

/// 报告大纲 - 结构设计阶段的产物
///
/// 定稿后视为不可变：重新设计产生新的大纲，而不是修补旧的。
/// 章节顺序有业务含义，贯穿任务规划与最终装配，不允许重排。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportOutline {
    /// 报告主标题
    pub title: String,
    /// 章节列表，顺序即最终报告顺序
    pub sections: Vec<Section>,
}

impl ReportOutline {
    /// 大纲内容的规范化JSON表示，用于幂等性哈希比对
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
