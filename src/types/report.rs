use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单个任务的证据材料 - 每次任务调用时临时组装，不跨任务复用
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceBundle {
    /// 研究简报整理出的事实依据文本
    pub research_brief_text: String,
    /// 命中的网络案例摘录，顺序即扫描命中顺序
    pub case_snippets: Vec<String>,
    /// 指标分析摘要（指标表缺失时为None）
    pub metric_summary: Option<String>,
}

impl EvidenceBundle {
    /// 是否不含任何可用证据
    pub fn is_degraded(&self) -> bool {
        self.research_brief_text.is_empty()
            && self.case_snippets.is_empty()
            && self.metric_summary.is_none()
    }
}

/// 生成的章节内容 - 写作阶段的产物，创建后不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSection {
    pub task_id: usize,
    /// 章节正文（markdown）
    pub content: String,
}

/// 装配完成的最终报告 - 终端产物，落盘一次，不做原地覆盖
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledReport {
    pub title: String,
    pub body: String,
    pub generated_at: DateTime<Utc>,
}
