//! 章节写作提示词模板

/// 写作系统提示词
pub const WRITER_BASE_SYSTEM: &str = r#"你是资深的绩效评价报告撰写专家，擅长撰写财政支出项目绩效评价报告。

写作总则：
1. 只输出本章节的正文内容（markdown），不要输出报告标题或其他章节
2. 每个论点都要有事实依据支撑，优先引用给定的证据材料
3. 涉及数据时引用证据中的具体数字，严禁臆造数据
4. 证据缺失处明确标注"信息待补充"，不得编造
5. 语言正式、客观，符合政府绩效评价报告的文体规范"#;

/// 单章写作提示词模板
///
/// 固定分节：标题、写作指导、事实依据、关联指标、质量要求。
/// 证据为空的分节保留占位文本，让模型显式知道信息缺失。
pub fn section_writing_prompt(
    section_title: &str,
    instruction: &str,
    research_brief_text: &str,
    case_snippets: &[String],
    metric_summary: Option<&str>,
    associated_metric_ids: &[String],
) -> String {
    let brief_block = if research_brief_text.is_empty() {
        "（暂无研究简报内容）"
    } else {
        research_brief_text
    };

    let cases_block = if case_snippets.is_empty() {
        "（暂无可借鉴案例摘录）".to_string()
    } else {
        case_snippets.join("\n\n")
    };

    let metric_block = metric_summary.unwrap_or("（暂无指标分析表）");

    let metric_ids_line = if associated_metric_ids.is_empty() {
        "（无）".to_string()
    } else {
        associated_metric_ids.join("、")
    };

    format!(
        r#"## 章节标题
{section_title}

## 写作要求与指导
{instruction}

## 相关事实依据
### 研究简报
{brief_block}

### 案例摘录
{cases_block}

### 指标分析表
{metric_block}

## 关联的绩效指标
{metric_ids_line}

## 写作标准与质量要求
1. 正文以章节标题开头（markdown二级标题格式：`## {section_title}`）
2. 结构清晰，分条或分段论述，必要处使用markdown表格
3. 结论与数据对应，引用指标表时保留分值与得分率
4. 篇幅与章节定位相称，不注水、不空泛"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_all_fixed_sections() {
        let prompt = section_writing_prompt(
            "一、项目概述",
            "围绕背景与资金撰写",
            "【项目情况】\n测试项目",
            &["【来源:A | pool.md】\n案例内容".to_string()],
            Some("| 指标 | 得分 |"),
            &["A1".to_string()],
        );

        assert!(prompt.contains("## 章节标题"));
        assert!(prompt.contains("一、项目概述"));
        assert!(prompt.contains("## 写作要求与指导"));
        assert!(prompt.contains("围绕背景与资金撰写"));
        assert!(prompt.contains("## 相关事实依据"));
        assert!(prompt.contains("测试项目"));
        assert!(prompt.contains("案例内容"));
        assert!(prompt.contains("## 关联的绩效指标"));
        assert!(prompt.contains("A1"));
        assert!(prompt.contains("## 写作标准与质量要求"));
    }

    #[test]
    fn test_empty_evidence_rendered_as_placeholders() {
        let prompt = section_writing_prompt("五、改进建议", "提出建议", "", &[], None, &[]);
        assert!(prompt.contains("（暂无研究简报内容）"));
        assert!(prompt.contains("（暂无可借鉴案例摘录）"));
        assert!(prompt.contains("（暂无指标分析表）"));
        assert!(prompt.contains("（无）"));
    }
}
