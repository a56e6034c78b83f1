use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{config::Config, llm::LLMClient, memory::Memory};

/// 流水线运行上下文
///
/// 一次运行一个实例，按引用贯穿各阶段；记忆与停止信号都挂在这里，
/// 不依赖任何进程级全局状态。
#[derive(Clone)]
pub struct GeneratorContext {
    /// LLM调用器，用于与AI通信。
    pub llm_client: LLMClient,
    /// 配置
    pub config: Config,
    /// 运行期记忆
    pub memory: Arc<RwLock<Memory>>,
    /// 本次运行的标识
    pub run_id: Uuid,
    /// 外部停止信号，在任务迭代间检查
    stop_flag: Arc<AtomicBool>,
}

impl GeneratorContext {
    /// 创建新的运行上下文
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.clone())?;
        let memory = Arc::new(RwLock::new(Memory::new()));

        Ok(Self {
            llm_client,
            config,
            memory,
            run_id: Uuid::new_v4(),
            stop_flag: Arc::new(AtomicBool::new(false)),
        })
    }

    /// 存储数据到 Memory
    pub async fn store_to_memory<T>(&self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize + Send + Sync,
    {
        let mut memory = self.memory.write().await;
        memory.store(scope, key, data)
    }

    /// 从 Memory 获取数据
    pub async fn get_from_memory<T>(&self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a> + Send + Sync,
    {
        let memory = self.memory.read().await;
        memory.get(scope, key)
    }

    /// 请求停止：已在途的生成调用不中断，下一个任务不再启动
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// 是否收到停止信号
    pub fn should_stop(&self) -> bool {
        self.stop_flag.load(Ordering::SeqCst)
    }
}
