//! 流水线协调 - 串起设计、规划、写作、装配四个阶段
//!
//! 阶段顺序调用，数据单向流动：大纲 → 任务 → (证据+提示词) → 章节 →
//! 报告。没有隐式的订阅或消息总线，协调器就是唯一的时序权威。

use anyhow::{Context, Result, anyhow};
use futures::stream::{self, StreamExt};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::PipelineError;
use crate::generator::context::GeneratorContext;
use crate::generator::design::{StructureDesigner, enrichment_queries};
use crate::generator::outlet::{ReportAssembler, parse_structure_sections};
use crate::generator::plan::TaskPlanner;
use crate::generator::write::SectionWriter;
use crate::llm::TextGenerator;
use crate::memory::{MemoryScope, ScopedKeys};
use crate::retrieval::{NoopRetriever, Retriever, collect_enrichment};
use crate::types::{GeneratedSection, ReportOutline, TaskPlan};

/// 流水线阶段
///
/// Idle → Designing → Planning → Writing(N) → Assembling → Done；
/// 任一阶段的不可恢复失败进入Error终态。阶段不自动重试，重试的
/// 粒度是整次运行，由外部调用方决定。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunStage {
    Idle,
    Designing,
    Planning,
    /// 携带本次运行的任务总数
    Writing(usize),
    Assembling,
    Done,
    Error,
}

/// 一次运行的结局
#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    /// 正常完成，携带最终报告落盘路径
    Completed { report_path: PathBuf },
    /// 大纲未变化且已有历史报告，本次为无操作
    Skipped,
}

/// 运行元数据，结束时写入记忆供调用方查询
#[derive(Debug, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: String,
    pub outcome: String,
    pub task_count: usize,
    pub timing_report: String,
}

/// 阶段计时
pub struct TimingScope {
    start_time: std::time::Instant,
    phase_start_times: HashMap<String, std::time::Instant>,
    phase_durations: HashMap<String, Duration>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: HashMap::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), std::time::Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        if let Some(start_time) = self.phase_start_times.remove(phase_name) {
            let duration = start_time.elapsed();
            self.phase_durations
                .insert(phase_name.to_string(), duration);
            Some(duration)
        } else {
            None
        }
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for phase in TimingKeys::get_all_phase_keys() {
                if let Some(duration) = self.phase_durations.get(phase) {
                    report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
                }
            }
        }

        report
    }
}

/// 阶段计时键
pub struct TimingKeys;

impl TimingKeys {
    pub const DESIGN: &'static str = "design";
    pub const PLAN: &'static str = "plan";
    pub const WRITE: &'static str = "write";
    pub const ASSEMBLE: &'static str = "assemble";

    pub fn get_all_phase_keys() -> Vec<&'static str> {
        vec![Self::DESIGN, Self::PLAN, Self::WRITE, Self::ASSEMBLE]
    }
}

/// 流水线协调器
pub struct PipelineCoordinator {
    context: GeneratorContext,
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn TextGenerator>,
    stage: RunStage,
}

impl PipelineCoordinator {
    pub fn new(context: GeneratorContext) -> Self {
        let generator: Arc<dyn TextGenerator> = Arc::new(context.llm_client.clone());
        Self::with_collaborators(context, Arc::new(NoopRetriever), generator)
    }

    /// 接入检索与文本生成协作方的构造入口
    pub fn with_collaborators(
        context: GeneratorContext,
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            context,
            retriever,
            generator,
            stage: RunStage::Idle,
        }
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    /// 读取本次运行的元数据，运行结束后可用
    pub async fn run_meta(&self) -> Option<RunMeta> {
        self.context
            .get_from_memory(MemoryScope::RUN, ScopedKeys::RUN_META)
            .await
    }

    /// 执行一次完整运行
    pub async fn run(&mut self) -> Result<RunOutcome> {
        match self.run_inner().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.stage = RunStage::Error;
                Err(e)
            }
        }
    }

    async fn run_inner(&mut self) -> Result<RunOutcome> {
        let mut timing = TimingScope::new();
        println!("🚀 开始生成绩效评价报告 (run {})", self.context.run_id);

        // 阶段一：结构设计（结构文件已落盘时直接复用）
        self.stage = RunStage::Designing;
        timing.start_phase(TimingKeys::DESIGN);
        let outline = self.obtain_outline().await?;
        self.context
            .store_to_memory(MemoryScope::DESIGN, ScopedKeys::OUTLINE, &outline)
            .await?;
        timing.end_phase(TimingKeys::DESIGN);

        // 幂等检查：大纲未变且已有历史报告则整次跳过
        let outline_hash = hash_outline(&outline);
        if !self.context.config.force_regenerate && self.is_unchanged(&outline_hash) {
            println!("✅ 大纲未变化且已有生成的报告，跳过本次运行");
            self.finish_meta(&mut timing, "skipped", 0).await?;
            self.stage = RunStage::Done;
            return Ok(RunOutcome::Skipped);
        }

        // 确认模型连接后才进入会消耗生成调用的阶段；
        // 幂等跳过的运行不触碰模型服务
        self.generator.check_connection().await?;

        // 阶段二：任务规划
        self.stage = RunStage::Planning;
        timing.start_phase(TimingKeys::PLAN);
        let plan = TaskPlanner.plan(&outline)?;
        println!("📋 任务规划完成: {} 个写作任务", plan.len());
        self.context
            .store_to_memory(MemoryScope::PLAN, ScopedKeys::TASK_PLAN, &plan)
            .await?;
        timing.end_phase(TimingKeys::PLAN);

        // 阶段三：章节写作
        self.stage = RunStage::Writing(plan.len());
        timing.start_phase(TimingKeys::WRITE);
        let sections = self.write_sections(&plan).await?;
        self.context
            .store_to_memory(MemoryScope::WRITE, ScopedKeys::SECTIONS, &sections)
            .await?;
        timing.end_phase(TimingKeys::WRITE);

        if self.context.should_stop() {
            return Err(anyhow!("运行被外部停止信号中断"));
        }

        // 阶段四：装配落盘
        self.stage = RunStage::Assembling;
        timing.start_phase(TimingKeys::ASSEMBLE);
        let assembler = ReportAssembler::new(self.context.config.clone());
        let report = assembler.assemble(&outline.title, &plan, sections)?;
        let report_path = assembler.persist(&report)?;
        self.context
            .store_to_memory(MemoryScope::ASSEMBLE, ScopedKeys::REPORT, &report)
            .await?;
        timing.end_phase(TimingKeys::ASSEMBLE);

        self.record_outline_hash(&outline_hash)?;
        self.finish_meta(&mut timing, "completed", plan.len()).await?;
        self.stage = RunStage::Done;

        if self.context.config.verbose {
            println!("\n{}", timing.generate_timing_report());
        }
        println!("🎉 报告生成完成: {}", report_path.display());

        Ok(RunOutcome::Completed { report_path })
    }

    /// 取得大纲：优先读取已落盘的结构文件，否则设计新大纲并落盘结构
    async fn obtain_outline(&self) -> Result<ReportOutline> {
        let config = &self.context.config;

        if let Some(outline) = self.load_outline_from_structure()? {
            println!("📄 复用已有报告结构: {}", config.report_structure_path().display());
            return Ok(outline);
        }

        // 增强素材：检索失败或无结果都降级为空载荷，设计阶段以占位文本兜底
        let queries = enrichment_queries(&config.get_project_name());
        let enrichment = collect_enrichment(self.retriever.as_ref(), &queries, 3).await;
        let enrichment = if enrichment.is_empty() {
            None
        } else {
            Some(&enrichment)
        };

        let designer = StructureDesigner;
        let outline = if config.llm_refine_outline {
            designer.design_with_llm(&self.context, enrichment).await?
        } else {
            designer.design(&config.get_project_name(), enrichment)
        };
        println!("✅ 结构设计完成: {} ({} 章)", outline.title, outline.sections.len());

        self.persist_structure(&outline)?;
        Ok(outline)
    }

    /// 从结构文件重建大纲，文件缺失时返回None
    ///
    /// 章节标题行下方的内容原样作为该章的写作指导；文件未附指导的
    /// 章节由规范目录兜底。
    fn load_outline_from_structure(&self) -> Result<Option<ReportOutline>> {
        let path = self.context.config.report_structure_path();
        let Ok(text) = fs::read_to_string(&path) else {
            return Ok(None);
        };

        let parsed = parse_structure_sections(&text);
        if parsed.is_empty() {
            return Err(PipelineError::validation(
                "report_structure",
                "结构文件存在但未解析出任何章节标题".to_string(),
            )
            .into());
        }

        let report_title = text
            .lines()
            .find_map(|line| line.strip_prefix("# "))
            .map(|title| title.trim().to_string())
            .unwrap_or_else(|| {
                format!("{}绩效评价报告", self.context.config.get_project_name())
            });

        Ok(Some(
            StructureDesigner.outline_from_structure(&report_title, &parsed),
        ))
    }

    /// 将大纲落盘为结构文件，作为后续运行的大纲权威来源
    ///
    /// 标题与写作指导一并写入，保证读回的大纲与落盘的大纲等价，
    /// 幂等哈希因此可复现。
    fn persist_structure(&self, outline: &ReportOutline) -> Result<()> {
        let path = self.context.config.report_structure_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create docs dir: {:?}", parent))?;
        }

        let mut document = format!("# {}\n\n", outline.title);
        for section in &outline.sections {
            document.push_str(&format!(
                "### {}\n{}\n\n",
                section.title, section.writing_guidance
            ));
        }
        fs::write(&path, document)
            .context(format!("Failed to write report structure: {:?}", path))?;
        println!("💾 报告结构已保存: {}", path.display());
        Ok(())
    }

    /// 并行写作全部章节，并行度受配置限制，结果按task_id排序返回
    async fn write_sections(&self, plan: &TaskPlan) -> Result<Vec<GeneratedSection>> {
        let writer = Arc::new(SectionWriter::with_generator(
            &self.context,
            Arc::clone(&self.generator),
        ));
        let max_parallels = self.context.config.llm.max_parallels.max(1);
        let strict = self.context.config.strict_generation;

        let results: Vec<_> = stream::iter(plan.tasks.clone())
            .map(|task| {
                let context = self.context.clone();
                let writer = Arc::clone(&writer);
                async move {
                    if context.should_stop() {
                        return (
                            task.clone(),
                            Err(PipelineError::Generation {
                                section: task.section_title.clone(),
                                source: anyhow!("收到停止信号，任务未启动"),
                            }),
                        );
                    }
                    let result = writer.write(&context, &task).await;
                    (task, result)
                }
            })
            .buffer_unordered(max_parallels)
            .collect()
            .await;

        let mut sections = Vec::with_capacity(results.len());
        for (task, result) in results {
            match result {
                Ok(section) => sections.push(section),
                Err(e) if strict => return Err(e.into()),
                Err(e) => {
                    eprintln!("⚠️ 章节 [{}] 生成失败，以占位章节替换: {}", task.task_id, e);
                    sections.push(SectionWriter::placeholder_section(&task, &e.to_string()));
                }
            }
        }
        sections.sort_by_key(|section| section.task_id);
        Ok(sections)
    }

    /// 大纲哈希与上次成功运行一致，且存在历史报告
    fn is_unchanged(&self, outline_hash: &str) -> bool {
        let stored = fs::read_to_string(self.context.config.outline_hash_path())
            .map(|text| text.trim().to_string())
            .unwrap_or_default();
        stored == outline_hash && self.has_existing_report()
    }

    fn has_existing_report(&self) -> bool {
        fs::read_dir(self.context.config.docs_dir())
            .map(|entries| {
                entries.filter_map(|entry| entry.ok()).any(|entry| {
                    entry
                        .file_name()
                        .to_string_lossy()
                        .starts_with("final_report_")
                })
            })
            .unwrap_or(false)
    }

    /// 成功运行后记录大纲哈希，作为下次幂等判据
    fn record_outline_hash(&self, outline_hash: &str) -> Result<()> {
        let path = self.context.config.outline_hash_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create internal dir: {:?}", parent))?;
        }
        fs::write(&path, outline_hash)
            .context(format!("Failed to write outline hash: {:?}", path))?;
        Ok(())
    }

    async fn finish_meta(
        &self,
        timing: &mut TimingScope,
        outcome: &str,
        task_count: usize,
    ) -> Result<()> {
        let meta = RunMeta {
            run_id: self.context.run_id.to_string(),
            outcome: outcome.to_string(),
            task_count,
            timing_report: timing.generate_timing_report(),
        };
        self.context
            .store_to_memory(MemoryScope::RUN, ScopedKeys::RUN_META, &meta)
            .await
    }
}

/// 大纲内容哈希，幂等判据
pub fn hash_outline(outline: &ReportOutline) -> String {
    let mut hasher = Md5::new();
    hasher.update(outline.canonical_json().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// 启动报告生成工作流
pub async fn launch(config: &Config) -> Result<RunOutcome> {
    let context = GeneratorContext::new(config.clone())?;
    let mut coordinator = PipelineCoordinator::new(context);
    coordinator.run().await
}
