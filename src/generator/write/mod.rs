//! 章节写作阶段 - 单任务单次生成调用

use std::sync::Arc;

use crate::error::PipelineError;
use crate::generator::context::GeneratorContext;
use crate::generator::evidence::EvidenceAssembler;
use crate::llm::TextGenerator;
use crate::types::{GeneratedSection, WritingTask};

pub mod prompts;

use prompts::{WRITER_BASE_SYSTEM, section_writing_prompt};

/// 章节写作器
///
/// 每个任务收集一次证据、构建一个提示词、发起一次生成调用；
/// 本层不做重试也不做占位替换，失败作为显式错误传播，由协调器
/// 按策略决定替换占位章节还是中止运行。
pub struct SectionWriter {
    evidence_assembler: EvidenceAssembler,
    generator: Arc<dyn TextGenerator>,
}

impl SectionWriter {
    pub fn new(context: &GeneratorContext) -> Self {
        Self::with_generator(context, Arc::new(context.llm_client.clone()))
    }

    /// 注入替代的文本生成协作方
    pub fn with_generator(context: &GeneratorContext, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            evidence_assembler: EvidenceAssembler::new(context.config.clone()),
            generator,
        }
    }

    /// 执行一个写作任务
    pub async fn write(
        &self,
        context: &GeneratorContext,
        task: &WritingTask,
    ) -> Result<GeneratedSection, PipelineError> {
        let evidence = self.evidence_assembler.assemble(task);

        let user_prompt = section_writing_prompt(
            &task.section_title,
            &task.instruction,
            &evidence.research_brief_text,
            &evidence.case_snippets,
            evidence.metric_summary.as_deref(),
            &task.associated_metric_ids,
        );

        let system_prompt = format!(
            "{}\n\n## 项目信息\n{}",
            WRITER_BASE_SYSTEM,
            context.config.project_info_text()
        );

        println!("📝 正在写作章节 [{}] {}...", task.task_id, task.section_title);

        let content = self
            .generator
            .generate(&system_prompt, &user_prompt)
            .await
            .map_err(|source| PipelineError::Generation {
                section: task.section_title.clone(),
                source,
            })?;

        println!(
            "✅ 章节 [{}] {} 写作完成 ({} 字符)",
            task.task_id,
            task.section_title,
            content.chars().count()
        );

        Ok(GeneratedSection {
            task_id: task.task_id,
            content,
        })
    }

    /// 生成失败时的占位章节，宽松策略下由协调器采用
    pub fn placeholder_section(task: &WritingTask, reason: &str) -> GeneratedSection {
        GeneratedSection {
            task_id: task.task_id,
            content: format!(
                "## {}\n\n（本章节生成失败，待人工补写。原因：{}）",
                task.section_title, reason
            ),
        }
    }
}
