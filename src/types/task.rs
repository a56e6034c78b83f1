use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::outline::Section;

/// 写作任务 - 与大纲章节一一对应
///
/// task_id 按章节枚举顺序从0开始分配，是下游写作与装配的权威排序依据，
/// 任何阶段都不得按内容重新排序。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WritingTask {
    pub task_id: usize,
    /// 章节标题
    pub section_title: String,
    /// 写作指令，来自章节的写作指导
    pub instruction: String,
    /// 关联的指标ID
    #[serde(default)]
    pub associated_metric_ids: Vec<String>,
}

impl WritingTask {
    /// 由章节派生任务，task_id 取章节在大纲中的位置
    pub fn from_section(task_id: usize, section: &Section) -> Self {
        Self {
            task_id,
            section_title: section.title.clone(),
            instruction: section.writing_guidance.clone(),
            associated_metric_ids: section.associated_metric_ids.clone(),
        }
    }
}

/// 任务计划 - 任务规划阶段的产物
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TaskPlan {
    pub tasks: Vec<WritingTask>,
}

impl TaskPlan {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
