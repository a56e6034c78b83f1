//! 结构设计阶段 - 由项目信息（及可选增强素材）产出报告大纲

use anyhow::Result;
use std::collections::HashMap;

use crate::generator::context::GeneratorContext;
use crate::types::{ReportOutline, Section};

pub mod sections;

use sections::{CANONICAL_SECTIONS, CanonicalSection, GENERIC_GUIDANCE, find_by_title};

/// 增强素材载荷：证据类目 → 素材片段列表
pub type EnrichmentPayload = HashMap<String, Vec<String>>;

/// 结构设计声明的增强类目及对应检索查询，供检索协作方使用
pub fn enrichment_queries(project_name: &str) -> Vec<(String, String)> {
    let mut queries: Vec<(String, String)> = Vec::new();
    for section in CANONICAL_SECTIONS.iter() {
        for category in section.enrichment_categories {
            if !queries.iter().any(|(existing, _)| existing == category) {
                queries.push((
                    category.to_string(),
                    format!("{} {}", project_name, category),
                ));
            }
        }
    }
    queries
}

const DESIGNER_SYSTEM_PROMPT: &str = r#"你是绩效评价报告的结构设计专家。你的任务是在给定的章节骨架基础上，
细化每个章节的写作指导，使其更贴合当前项目的特点。

约束：
1. 不得增删章节，不得改变章节顺序与标题
2. 写作指导必须保留原有的检索要求条目，只做补充和细化
3. 缺失信息标注"信息待补充"，不得臆造事实"#;

/// 结构设计器
#[derive(Default)]
pub struct StructureDesigner;

impl StructureDesigner {
    /// 模板拼装模式：按规范章节目录逐章拼接写作指导，不调用LLM
    ///
    /// 增强素材缺失是常态而不是错误：缺失的类目降级为占位文本，
    /// 任何情况下都产出完整的五章大纲。
    pub fn design(
        &self,
        project_name: &str,
        enrichment: Option<&EnrichmentPayload>,
    ) -> ReportOutline {
        let sections = CANONICAL_SECTIONS
            .iter()
            .map(|template| Section {
                title: template.title.to_string(),
                writing_guidance: Self::splice_guidance(template, enrichment),
                associated_metric_ids: Vec::new(),
            })
            .collect();

        ReportOutline {
            title: format!("{}绩效评价报告", project_name),
            sections,
        }
    }

    /// LLM细化模式：让模型在模板大纲基础上细化写作指导
    ///
    /// 提取失败或结果不满足结构约束时回退到模板拼装结果。
    pub async fn design_with_llm(
        &self,
        context: &GeneratorContext,
        enrichment: Option<&EnrichmentPayload>,
    ) -> Result<ReportOutline> {
        let template_outline = self.design(&context.config.get_project_name(), enrichment);

        let user_prompt = format!(
            "## 项目信息\n{}\n\n## 章节骨架（JSON）\n{}\n\n请在不改变章节数量、顺序与标题的前提下，细化每章的writing_guidance。",
            context.config.project_info_text(),
            template_outline.canonical_json(),
        );

        match context
            .llm_client
            .extract::<ReportOutline>(DESIGNER_SYSTEM_PROMPT, &user_prompt)
            .await
        {
            Ok(mut refined) if Self::structure_preserved(&template_outline, &refined) => {
                for section in &mut refined.sections {
                    section.writing_guidance = Self::normalize_guidance(&section.writing_guidance);
                }
                println!("✅ 结构设计完成（LLM细化）: {}", refined.title);
                Ok(refined)
            }
            Ok(_) => {
                eprintln!("⚠️ LLM细化结果不满足结构约束，回退到模板大纲");
                Ok(template_outline)
            }
            Err(e) => {
                eprintln!("⚠️ LLM细化失败，回退到模板大纲: {}", e);
                Ok(template_outline)
            }
        }
    }

    /// 按结构文件解析出的(标题, 指导)序列重建大纲
    ///
    /// 结构文件已经落盘时它就是大纲的权威来源：文件携带的指导原样保留，
    /// 文件未附指导的章节按规范目录兜底，查不到规范配置的标题退回
    /// 通用指导块。
    pub fn outline_from_structure(
        &self,
        report_title: &str,
        parsed: &[(String, String)],
    ) -> ReportOutline {
        let sections = parsed
            .iter()
            .map(|(title, guidance)| {
                let writing_guidance = if guidance.trim().is_empty() {
                    match find_by_title(title) {
                        Some(template) => Self::splice_guidance(template, None),
                        None => GENERIC_GUIDANCE.to_string(),
                    }
                } else {
                    guidance.trim().to_string()
                };
                Section {
                    title: title.clone(),
                    writing_guidance,
                    associated_metric_ids: Vec::new(),
                }
            })
            .collect();

        ReportOutline {
            title: report_title.to_string(),
            sections,
        }
    }

    /// 细化结果必须保持章节数量与标题不变
    fn structure_preserved(template: &ReportOutline, refined: &ReportOutline) -> bool {
        template.sections.len() == refined.sections.len()
            && template
                .sections
                .iter()
                .zip(refined.sections.iter())
                .all(|(a, b)| a.title == b.title)
    }

    /// 拼接单章写作指导：基础指令 + 按标题查表的检索要求块 + 素材占位
    ///
    /// 指导内部的小节一律使用四级及以下标题，三级标题保留给结构文件的
    /// 章节标题行，确保指导文本可以原样写入结构文件并完整读回。
    fn splice_guidance(
        template: &CanonicalSection,
        enrichment: Option<&EnrichmentPayload>,
    ) -> String {
        // 标题查不到关键词集时使用通用指导块
        let guidance = find_by_title(template.title)
            .map(|section| section.guidance)
            .unwrap_or(GENERIC_GUIDANCE);

        let mut spliced = format!(
            "{}\n\n#### 📋 具体写作指导与检索要求：\n{}\n",
            template.base_prompt, guidance
        );

        if !template.enrichment_categories.is_empty() {
            spliced.push_str("\n#### 📎 参考素材：\n");
            for category in template.enrichment_categories {
                let block = enrichment
                    .and_then(|payload| payload.get(*category))
                    .filter(|snippets| !snippets.is_empty())
                    .map(|snippets| snippets.join("\n"))
                    .unwrap_or_else(|| "（信息待补充）".to_string());
                spliced.push_str(&format!("##### {}\n{}\n", category, block));
            }
        }

        spliced.trim_end().to_string()
    }

    /// 指导文本中的三级标题行会与结构文件的章节标题行冲突，统一降级；
    /// 首尾空白一并去除，保证落盘再读回后哈希不变
    fn normalize_guidance(text: &str) -> String {
        text.lines()
            .map(|line| {
                if line.starts_with("### ") {
                    format!("#{}", line)
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}
