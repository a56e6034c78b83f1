//! 任务规划阶段 - 把报告大纲展开为有序的写作任务列表

use crate::error::PipelineError;
use crate::types::{ReportOutline, TaskPlan, WritingTask};

/// 任务规划器
///
/// 一章一任务，task_id按章节枚举位置分配；该顺序是下游写作与装配的
/// 权威排序，规划之后任何环节都不得按内容重排。无副作用，无I/O。
#[derive(Default)]
pub struct TaskPlanner;

impl TaskPlanner {
    pub fn plan(&self, outline: &ReportOutline) -> Result<TaskPlan, PipelineError> {
        if outline.title.trim().is_empty() {
            return Err(PipelineError::validation("outline.title", "不能为空"));
        }
        if outline.sections.is_empty() {
            return Err(PipelineError::validation("outline.sections", "章节列表为空"));
        }

        let tasks = outline
            .sections
            .iter()
            .enumerate()
            .map(|(task_id, section)| WritingTask::from_section(task_id, section))
            .collect();

        Ok(TaskPlan { tasks })
    }
}
