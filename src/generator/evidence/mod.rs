//! 证据收集阶段 - 为单个写作任务组装事实材料
//!
//! 不做任何实时检索：全部证据来自两类既有产物（研究简报与案例摘录池），
//! 外加可选的指标分析表摘要。任何子来源的I/O失败都降级为空，
//! 整体契约是"尽力而为的证据，绝不硬失败"。

use std::fs;

use crate::config::Config;
use crate::types::{EvidenceBundle, WritingTask};

pub mod brief;
pub mod cases;

use brief::ResearchBrief;
use cases::collect_case_snippets;

/// 证据收集器
pub struct EvidenceAssembler {
    config: Config,
}

impl EvidenceAssembler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 为一个任务组装证据包
    ///
    /// 每次调用独立重读简报文件，不跨任务缓存；证据包是临时对象，
    /// 用完即弃。
    pub fn assemble(&self, task: &WritingTask) -> EvidenceBundle {
        let brief = self.read_brief();
        let case_snippets =
            collect_case_snippets(&self.config.cases_dir(), &brief.source_labels());

        let bundle = EvidenceBundle {
            research_brief_text: brief.factual_basis_text(),
            case_snippets,
            metric_summary: self.read_metric_summary(),
        };

        if bundle.is_degraded() && self.config.verbose {
            eprintln!(
                "⚠️ 任务 {} ({}) 未收集到任何证据，将仅凭写作指导生成",
                task.task_id, task.section_title
            );
        }

        bundle
    }

    /// 读取并宽松解析研究简报，文件缺失或不可读降级为空简报
    fn read_brief(&self) -> ResearchBrief {
        match fs::read_to_string(self.config.research_brief_path()) {
            Ok(text) => ResearchBrief::parse(&text),
            Err(_) => ResearchBrief::default(),
        }
    }

    /// 指标分析表内容作为摘要附带，缺失时为None
    fn read_metric_summary(&self) -> Option<String> {
        fs::read_to_string(self.config.metric_table_path())
            .ok()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

// Include tests
#[cfg(test)]
mod tests;
