//! 规范章节目录 - 绩效评价报告的标准五章骨架
//!
//! 目录是版本化的固定清单，结构设计阶段据此产出大纲；写作指导的
//! 检索要求块按标题关键词查表获得，而不是对内容做关键词搜索。

/// 规范章节模板
pub struct CanonicalSection {
    pub key: &'static str,
    /// 章节标题（含编号，最终报告按此顺序）
    pub title: &'static str,
    /// 章节写作的基础指令
    pub base_prompt: &'static str,
    /// 标题匹配关键词集，命中任一即认定为本章节
    pub title_keywords: &'static [&'static str],
    /// 具体写作指导与检索要求
    pub guidance: &'static str,
    /// 需要增强素材的证据类目
    pub enrichment_categories: &'static [&'static str],
}

/// 默认五章结构
pub const CANONICAL_SECTIONS: [CanonicalSection; 5] = [
    CanonicalSection {
        key: "overview",
        title: "一、项目概述",
        base_prompt: "请围绕项目背景、资金与预算、实施情况、组织管理、绩效目标（表格展示）进行撰写。",
        title_keywords: &["项目概述", "概述"],
        guidance: "1) 项目立项背景及目的：政策依据/立项依据/目标设定\n\
                   2) 资金投入和使用情况：预算总额、来源、分配、执行进度\n\
                   3) 项目组织管理：机构、职责分工、流程制度\n\
                   4) 绩效目标：绩效目标表、指标设定、预期成果（表格展示）",
        enrichment_categories: &["项目背景", "资金情况"],
    },
    CanonicalSection {
        key: "conclusion",
        title: "二、综合绩效评价结论",
        base_prompt: "必须依据指标分析表的评分结果，汇总总分与各维度分值与得分率，并引用关键评价意见要点。",
        title_keywords: &["综合绩效评价结论", "评价结论", "绩效结论"],
        guidance: "- 汇总：各维度（决策/过程/产出/效益）得分与得分率\n\
                   - 依据：引用指标表关键评价意见要点\n\
                   - 输出：一级指标得分表（分值、得分、得分率）",
        enrichment_categories: &["评价结论"],
    },
    CanonicalSection {
        key: "achievements",
        title: "三、主要成效及经验",
        base_prompt: "结合数据和事实，总结成效，提炼可借鉴做法。",
        title_keywords: &["主要成效及经验", "成效", "经验"],
        guidance: "- 具体成效数据：量化成果、受益人群、对比数据\n\
                   - 成功经验总结：创新做法、管理经验、技术亮点",
        enrichment_categories: &["成效数据"],
    },
    CanonicalSection {
        key: "problems",
        title: "四、存在的问题和原因分析",
        base_prompt: "针对扣分项逐条分析原因、依据与影响范围。",
        title_keywords: &["存在的问题和原因分析", "问题", "原因分析"],
        guidance: "- 问题识别：调研发现/数据反映/反馈意见\n\
                   - 原因分析：政策执行/管理制度/技术条件/外部环境\n\
                   - 对接指标：结合扣分项的原因、依据、影响范围",
        enrichment_categories: &["问题线索"],
    },
    CanonicalSection {
        key: "suggestions",
        title: "五、改进建议",
        base_prompt: "针对问题提出具体可操作建议，标注责任与预期效果。",
        title_keywords: &["改进建议", "建议"],
        guidance: "- 针对性建议：责任主体/时间安排/预期效果\n\
                   - 可操作性验证：类似项目最佳实践/政策可行性",
        enrichment_categories: &["最佳实践"],
    },
];

/// 标题无法匹配任何关键词集时使用的通用指导块
pub const GENERIC_GUIDANCE: &str = "- 围绕章节标题组织内容，依据研究简报与案例素材展开\n\
                                    - 论点需有具体数据或事实支撑，缺失信息标注\"信息待补充\"";

/// 按标题关键词查找规范章节配置
pub fn find_by_title(title: &str) -> Option<&'static CanonicalSection> {
    CANONICAL_SECTIONS
        .iter()
        .find(|section| section.title_keywords.iter().any(|kw| title.contains(kw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_five_sections() {
        assert_eq!(CANONICAL_SECTIONS.len(), 5);
        let keys: Vec<&str> = CANONICAL_SECTIONS.iter().map(|s| s.key).collect();
        assert_eq!(
            keys,
            vec!["overview", "conclusion", "achievements", "problems", "suggestions"]
        );
    }

    #[test]
    fn test_find_by_title_keyword_lookup() {
        assert_eq!(find_by_title("一、项目概述").unwrap().key, "overview");
        assert_eq!(find_by_title("综合绩效评价结论").unwrap().key, "conclusion");
        assert_eq!(find_by_title("五、改进建议").unwrap().key, "suggestions");
    }

    #[test]
    fn test_find_by_title_unknown_returns_none() {
        assert!(find_by_title("附录：参考文献").is_none());
    }
}
