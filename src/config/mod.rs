use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// 项目名称（用于报告标题）
    pub project_name: Option<String>,

    /// 项目类型
    pub project_type: Option<String>,

    /// 项目描述
    pub project_description: Option<String>,

    /// 项目工作区路径（docs与resources的父目录）
    pub workspace_path: PathBuf,

    /// 内部工作目录路径 (.autowriter)
    pub internal_path: PathBuf,

    /// 章节生成失败时是否中止整次运行
    /// false（默认）：以占位章节替换后继续装配；true：传播错误中止
    pub strict_generation: bool,

    /// 结构设计是否调用LLM细化写作指导（失败时回退到模板拼装）
    pub llm_refine_outline: bool,

    /// 强制重新生成（忽略大纲哈希幂等检查）
    pub force_regenerate: bool,

    /// 是否启用详细日志
    pub verbose: bool,

    /// LLM模型配置
    pub llm: LLMConfig,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，优先用于常规推理任务
    pub model_efficient: String,

    /// 高质量模型，用于复杂推理任务，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 章节写作的最大并行度
    pub max_parallels: usize,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::OpenAI,
            api_key: std::env::var("LLM_API_KEY").unwrap_or_default(),
            api_base_url: std::env::var("LLM_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model_efficient: "gpt-4o-mini".to_string(),
            model_powerful: "gpt-4o".to_string(),
            max_tokens: 16384,
            temperature: 0.3,
            retry_attempts: 3,
            retry_delay_ms: 1000,
            max_parallels: 2,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let workspace_path = PathBuf::from("./workspace/project01");
        Self {
            project_name: None,
            project_type: None,
            project_description: None,
            internal_path: workspace_path.join(".autowriter"),
            workspace_path,
            strict_generation: false,
            llm_refine_outline: false,
            force_regenerate: false,
            verbose: false,
            llm: LLMConfig::default(),
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 获取项目名称，未配置时从工作区目录名推断
    pub fn get_project_name(&self) -> String {
        if let Some(ref name) = self.project_name
            && !name.trim().is_empty()
        {
            return name.clone();
        }

        self.workspace_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 项目元信息文本，注入到写作的系统上下文中
    pub fn project_info_text(&self) -> String {
        let mut lines = vec![format!("项目名称: {}", self.get_project_name())];
        if let Some(ref project_type) = self.project_type {
            lines.push(format!("项目类型: {}", project_type));
        }
        if let Some(ref description) = self.project_description {
            lines.push(format!("项目描述: {}", description));
        }
        lines.join("\n")
    }

    /// 文档目录（研究简报、报告结构、最终报告所在）
    pub fn docs_dir(&self) -> PathBuf {
        self.workspace_path.join("docs")
    }

    /// 网络案例摘录池目录
    pub fn cases_dir(&self) -> PathBuf {
        self.workspace_path.join("resources").join("cases")
    }

    /// 研究简报文件路径
    pub fn research_brief_path(&self) -> PathBuf {
        self.docs_dir().join("research_brief.md")
    }

    /// 报告结构文件路径
    pub fn report_structure_path(&self) -> PathBuf {
        self.docs_dir().join("report_structure.md")
    }

    /// 指标分析表文件路径
    pub fn metric_table_path(&self) -> PathBuf {
        self.docs_dir().join("metric_analysis_table.md")
    }

    /// 大纲哈希文件路径（幂等性判据）
    pub fn outline_hash_path(&self) -> PathBuf {
        self.internal_path.join("outline.hash")
    }
}
