//! 报告装配阶段 - 按权威顺序拼接章节并落盘最终报告

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::PipelineError;
use crate::types::{AssembledReport, GeneratedSection, TaskPlan};
use crate::utils::titles::titles_match;

/// 报告装配器
pub struct ReportAssembler {
    config: Config,
}

impl ReportAssembler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 装配最终报告
    ///
    /// 章节数必须与任务数严格一致，缺章宁可报错也不装配残卷。
    /// 排序以task_id为权威；存在规范结构文件时按其标题顺序重排，
    /// 匹配不上的章节保持生成顺序缀在已匹配章节之后。
    pub fn assemble(
        &self,
        title: &str,
        plan: &TaskPlan,
        mut sections: Vec<GeneratedSection>,
    ) -> Result<AssembledReport, PipelineError> {
        if sections.len() != plan.len() {
            return Err(PipelineError::AssemblyMismatch {
                expected: plan.len(),
                actual: sections.len(),
            });
        }

        sections.sort_by_key(|section| section.task_id);

        if let Some(canonical_titles) = self.read_structure_titles() {
            sections = Self::reorder_by_canonical(sections, plan, &canonical_titles);
        }

        let body = sections
            .iter()
            .map(|section| section.content.trim())
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(AssembledReport {
            title: title.to_string(),
            body,
            generated_at: Utc::now(),
        })
    }

    /// 持久化为带时间戳的新文件，历史报告绝不原地覆盖
    pub fn persist(&self, report: &AssembledReport) -> Result<PathBuf> {
        let docs_dir = self.config.docs_dir();
        fs::create_dir_all(&docs_dir)
            .context(format!("Failed to create docs dir: {:?}", docs_dir))?;

        let stamp = report.generated_at.format("%Y%m%d%H%M%S");
        let mut path = docs_dir.join(format!("final_report_{}.md", stamp));
        let mut suffix = 0usize;
        while path.exists() {
            suffix += 1;
            path = docs_dir.join(format!("final_report_{}_{}.md", stamp, suffix));
        }

        let document = format!("# {}\n\n{}\n", report.title, report.body);
        fs::write(&path, document)
            .context(format!("Failed to write final report: {:?}", path))?;

        println!("💾 最终报告已保存: {}", path.display());
        Ok(path)
    }

    /// 读取规范结构文件中的章节标题序列（三级标题行）
    fn read_structure_titles(&self) -> Option<Vec<String>> {
        let text = fs::read_to_string(self.config.report_structure_path()).ok()?;
        let titles = parse_structure_titles(&text);
        if titles.is_empty() { None } else { Some(titles) }
    }

    /// 按规范标题顺序重排：先放匹配章节，未匹配的按原序垫后
    fn reorder_by_canonical(
        sections: Vec<GeneratedSection>,
        plan: &TaskPlan,
        canonical_titles: &[String],
    ) -> Vec<GeneratedSection> {
        let title_of = |section: &GeneratedSection| -> String {
            plan.tasks
                .iter()
                .find(|task| task.task_id == section.task_id)
                .map(|task| task.section_title.clone())
                .unwrap_or_default()
        };

        let mut remaining: Vec<GeneratedSection> = sections;
        let mut ordered = Vec::with_capacity(remaining.len());

        for canonical in canonical_titles {
            if let Some(position) = remaining
                .iter()
                .position(|section| titles_match(&title_of(section), canonical))
            {
                ordered.push(remaining.remove(position));
            }
        }
        ordered.extend(remaining);
        ordered
    }
}

/// 从报告结构文档提取章节标题（"### "开头的行，按出现顺序）
pub fn parse_structure_titles(text: &str) -> Vec<String> {
    parse_structure_sections(text)
        .into_iter()
        .map(|(title, _)| title)
        .collect()
}

/// 将报告结构文档解析为(章节标题, 指导文本)序列
///
/// "### "行开启一个章节，其后到下一个"### "行之间的内容是该章节的
/// 写作指导；首个章节之前的导言行忽略。指导内的四级及以下标题不会
/// 被误认为章节边界。
pub fn parse_structure_sections(text: &str) -> Vec<(String, String)> {
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    for line in text.lines() {
        if let Some(title) = line.strip_prefix("### ") {
            let title = title.trim();
            if !title.is_empty() {
                sections.push((title.to_string(), Vec::new()));
                continue;
            }
        }
        if let Some((_, guidance)) = sections.last_mut() {
            guidance.push(line);
        }
    }

    sections
        .into_iter()
        .map(|(title, lines)| (title, lines.join("\n").trim().to_string()))
        .collect()
}
