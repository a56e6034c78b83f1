use thiserror::Error;

/// 流水线错误分类
///
/// 证据收集层的I/O错误不在此列：按约定一律降级为"证据缺失"继续执行，
/// 只有会破坏产物正确性的条件才作为错误向上传播。
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 必需输入缺失或不合法，所在阶段中止，不写出部分产物
    #[error("输入校验失败: 字段 `{field}` {reason}")]
    Validation { field: String, reason: String },

    /// 章节生成调用失败，由协调器按严格策略决定替换占位或中止
    #[error("章节生成失败: `{section}`: {source}")]
    Generation {
        section: String,
        #[source]
        source: anyhow::Error,
    },

    /// 章节数量与任务计划不一致 - 永远致命，不允许静默截断或补齐
    #[error("装配数量不一致: 任务计划声明 {expected} 个章节，实际收到 {actual} 个")]
    AssemblyMismatch { expected: usize, actual: usize },
}

impl PipelineError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
