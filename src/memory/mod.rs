//! 运行期记忆 - 单次流水线运行内各阶段共享的显式上下文存储
//!
//! 取代进程级单例：每次运行持有独立实例，由运行上下文按引用传递，
//! 阶段产物以 scope:key 方式存取。

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 阶段作用域常量
pub struct MemoryScope;

impl MemoryScope {
    pub const DESIGN: &'static str = "design";
    pub const PLAN: &'static str = "plan";
    pub const WRITE: &'static str = "write";
    pub const ASSEMBLE: &'static str = "assemble";
    pub const RUN: &'static str = "run";
}

/// 作用域内的约定键
pub struct ScopedKeys;

impl ScopedKeys {
    pub const OUTLINE: &'static str = "report_outline";
    pub const TASK_PLAN: &'static str = "task_plan";
    pub const SECTIONS: &'static str = "generated_sections";
    pub const REPORT: &'static str = "assembled_report";
    pub const RUN_META: &'static str = "run_meta";
}

/// 记忆元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub data_sizes: HashMap<String, usize>,
    pub total_size: usize,
}

impl Default for MemoryMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMetadata {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            last_updated: Utc::now(),
            data_sizes: HashMap::new(),
            total_size: 0,
        }
    }
}

/// 运行期记忆存储
#[derive(Debug)]
pub struct Memory {
    data: HashMap<String, Value>,
    metadata: MemoryMetadata,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            metadata: MemoryMetadata::new(),
        }
    }

    /// 存储数据到指定作用域和键
    pub fn store<T>(&mut self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize,
    {
        let full_key = format!("{}:{}", scope, key);
        let serialized = serde_json::to_value(data)?;

        let data_size = serialized.to_string().len();
        if let Some(old_size) = self.metadata.data_sizes.get(&full_key) {
            self.metadata.total_size -= old_size;
        }
        self.metadata.data_sizes.insert(full_key.clone(), data_size);
        self.metadata.total_size += data_size;
        self.metadata.last_updated = Utc::now();

        self.data.insert(full_key, serialized);
        Ok(())
    }

    /// 从指定作用域和键获取数据
    pub fn get<T>(&self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a>,
    {
        let full_key = format!("{}:{}", scope, key);
        self.data
            .get(&full_key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// 检查是否存在指定数据
    pub fn has_data(&self, scope: &str, key: &str) -> bool {
        let full_key = format!("{}:{}", scope, key);
        self.data.contains_key(&full_key)
    }

    /// 列出指定作用域的所有键
    pub fn list_keys(&self, scope: &str) -> Vec<String> {
        let prefix = format!("{}:", scope);
        self.data
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .map(|key| key[prefix.len()..].to_string())
            .collect()
    }

    /// 按作用域统计记忆占用
    pub fn get_usage_stats(&self) -> HashMap<String, usize> {
        let mut stats = HashMap::new();
        for (key, size) in &self.metadata.data_sizes {
            let scope = key.split(':').next().unwrap_or("unknown").to_string();
            *stats.entry(scope).or_insert(0) += size;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ReportOutline, Section};

    #[test]
    fn test_store_and_get_typed() {
        let mut memory = Memory::new();
        let outline = ReportOutline {
            title: "测试项目绩效评价报告".to_string(),
            sections: vec![Section::new("一、项目概述", "概述写作要点")],
        };
        memory
            .store(MemoryScope::DESIGN, ScopedKeys::OUTLINE, &outline)
            .unwrap();

        let loaded: ReportOutline = memory.get(MemoryScope::DESIGN, ScopedKeys::OUTLINE).unwrap();
        assert_eq!(loaded, outline);
        assert!(memory.has_data(MemoryScope::DESIGN, ScopedKeys::OUTLINE));
        assert!(!memory.has_data(MemoryScope::WRITE, ScopedKeys::SECTIONS));
    }

    #[test]
    fn test_scopes_are_isolated() {
        let mut memory = Memory::new();
        memory.store(MemoryScope::DESIGN, "k", 1u32).unwrap();
        memory.store(MemoryScope::PLAN, "k", 2u32).unwrap();

        assert_eq!(memory.get::<u32>(MemoryScope::DESIGN, "k"), Some(1));
        assert_eq!(memory.get::<u32>(MemoryScope::PLAN, "k"), Some(2));
        assert_eq!(memory.list_keys(MemoryScope::DESIGN), vec!["k".to_string()]);
    }

    #[test]
    fn test_usage_stats_tracks_overwrite() {
        let mut memory = Memory::new();
        memory.store(MemoryScope::RUN, "meta", "short").unwrap();
        let first = memory.get_usage_stats()[MemoryScope::RUN];
        memory
            .store(MemoryScope::RUN, "meta", "a much longer value")
            .unwrap();
        let second = memory.get_usage_stats()[MemoryScope::RUN];
        assert!(second > first);
    }
}
