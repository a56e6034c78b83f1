use crate::config::{Config, LLMProvider};
use clap::Parser;
use std::path::PathBuf;

/// AutoWriter-RS - 由Rust与AI驱动的绩效评价报告生成引擎
#[derive(Parser, Debug)]
#[command(name = "autowriter")]
#[command(
    about = "AI-based report generation engine. It turns a research brief and cached case materials into a structured performance-evaluation report through a multi-stage writing pipeline."
)]
#[command(version)]
pub struct Args {
    /// 项目工作区路径（包含docs与resources）
    #[arg(short, long, default_value = "./workspace/project01")]
    pub workspace_path: PathBuf,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 项目名称
    #[arg(short, long)]
    pub name: Option<String>,

    /// 项目类型
    #[arg(long)]
    pub project_type: Option<String>,

    /// 项目描述
    #[arg(long)]
    pub project_description: Option<String>,

    /// 章节生成失败时中止整次运行（默认替换为占位章节继续）
    #[arg(long)]
    pub strict_generation: bool,

    /// 结构设计阶段调用LLM细化写作指导
    #[arg(long)]
    pub llm_refine_outline: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 高能效模型，优先用于常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，用于复杂推理任务以及efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 章节写作最大并行度
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// LLM Provider (openai, moonshot, deepseek, mistral, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// 强制重新生成（忽略大纲哈希幂等检查）
    #[arg(long)]
    pub force_regenerate: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path).unwrap_or_else(|_| {
                panic!("⚠️ 警告: 无法读取配置文件 {:?}", config_path)
            })
        } else {
            // 如果没有显式指定配置文件，尝试从工作区的默认位置加载
            let default_config_path = self.workspace_path.join("autowriter.toml");
            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|_| {
                    panic!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}",
                        default_config_path
                    )
                })
            } else {
                Config::default()
            }
        };

        // 覆盖配置文件中的设置
        config.workspace_path = self.workspace_path.clone();
        config.internal_path = self.workspace_path.join(".autowriter");

        if let Some(name) = self.name {
            config.project_name = Some(name);
        }
        if let Some(project_type) = self.project_type {
            config.project_type = Some(project_type);
        }
        if let Some(project_description) = self.project_description {
            config.project_description = Some(project_description);
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        } else if config.llm.model_powerful.is_empty() {
            config.llm.model_powerful = config.llm.model_efficient.to_string();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.llm.max_parallels = max_parallels;
        }

        // 其他配置
        if self.strict_generation {
            config.strict_generation = true;
        }
        if self.llm_refine_outline {
            config.llm_refine_outline = true;
        }
        config.force_regenerate = self.force_regenerate;
        config.verbose = self.verbose;

        config
    }
}

// Include tests
#[cfg(test)]
mod tests;
