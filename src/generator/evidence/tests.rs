#[cfg(test)]
mod tests {
    use std::fs;
    use tempfile::TempDir;

    use crate::config::Config;
    use crate::generator::evidence::EvidenceAssembler;
    use crate::types::{Section, WritingTask};

    fn workspace() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::create_dir_all(dir.path().join("resources/cases")).unwrap();

        let config = Config {
            workspace_path: dir.path().to_path_buf(),
            internal_path: dir.path().join(".autowriter"),
            ..Default::default()
        };
        (dir, config)
    }

    fn sample_task() -> WritingTask {
        WritingTask::from_section(0, &Section::new("一、项目概述", "写作要点"))
    }

    #[test]
    fn test_missing_brief_degrades_to_empty_bundle() {
        let (_dir, config) = workspace();
        let bundle = EvidenceAssembler::new(config).assemble(&sample_task());

        assert!(bundle.research_brief_text.is_empty());
        assert!(bundle.case_snippets.is_empty());
        assert!(bundle.metric_summary.is_none());
        assert!(bundle.is_degraded());
    }

    #[test]
    fn test_brief_fields_rendered_and_empty_fields_omitted() {
        let (dir, config) = workspace();
        fs::write(
            dir.path().join("docs/research_brief.md"),
            r#"{"项目情况":"测试项目","资金情况":"","重要事件":"","政策引用":"","推荐方法":"","可借鉴网络案例":""}"#,
        )
        .unwrap();

        let bundle = EvidenceAssembler::new(config).assemble(&sample_task());
        assert!(bundle.research_brief_text.contains("【项目情况】"));
        assert!(bundle.research_brief_text.contains("测试项目"));
        assert!(!bundle.research_brief_text.contains("【资金情况】"));
    }

    #[test]
    fn test_cited_source_selects_matching_block_only() {
        let (dir, config) = workspace();
        fs::write(
            dir.path().join("docs/research_brief.md"),
            r#"{"项目情况":"测试","可借鉴网络案例":"来源:A"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("resources/cases/pool.md"),
            "## 来源:A\nA案例内容\n\n## 来源:B\nB案例内容\n",
        )
        .unwrap();

        let bundle = EvidenceAssembler::new(config).assemble(&sample_task());
        assert_eq!(bundle.case_snippets.len(), 1);
        assert!(bundle.case_snippets[0].contains("A案例内容"));
        assert!(!bundle.case_snippets[0].contains("B案例内容"));
    }

    #[test]
    fn test_metric_table_attached_when_present() {
        let (dir, config) = workspace();
        fs::write(
            dir.path().join("docs/metric_analysis_table.md"),
            "| 指标 | 分值 | 得分 |\n| 决策 | 20 | 18 |\n",
        )
        .unwrap();

        let bundle = EvidenceAssembler::new(config).assemble(&sample_task());
        assert!(bundle.metric_summary.unwrap().contains("决策"));
    }

    #[test]
    fn test_each_call_rereads_brief() {
        let (dir, config) = workspace();
        let assembler = EvidenceAssembler::new(config);
        let task = sample_task();

        let first = assembler.assemble(&task);
        assert!(first.research_brief_text.is_empty());

        fs::write(
            dir.path().join("docs/research_brief.md"),
            r#"{"项目情况":"后补的简报"}"#,
        )
        .unwrap();
        let second = assembler.assemble(&task);
        assert!(second.research_brief_text.contains("后补的简报"));
    }
}
