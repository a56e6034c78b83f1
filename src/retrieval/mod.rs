//! 相似度检索协作方接口
//!
//! 检索后端（向量库、知识图谱等）是可替换的外部协作方，核心流水线只
//! 依赖这里的trait。约定：检索失败一律降级为空结果，不向上抛错。

use async_trait::async_trait;
use std::collections::HashMap;

/// 相似度检索能力
#[async_trait]
pub trait Retriever: Send + Sync {
    /// 按相关性排序返回文本片段；任何后端失败都返回空列表
    async fn search(&self, query: &str, max_results: usize) -> Vec<String>;
}

/// 空检索器 - 未接入检索后端时的默认实现
#[derive(Default)]
pub struct NoopRetriever;

#[async_trait]
impl Retriever for NoopRetriever {
    async fn search(&self, _query: &str, _max_results: usize) -> Vec<String> {
        Vec::new()
    }
}

/// 为结构设计收集增强素材：按类目逐个检索，无结果的类目不进入载荷
pub async fn collect_enrichment(
    retriever: &dyn Retriever,
    categories: &[(String, String)],
    max_per_category: usize,
) -> HashMap<String, Vec<String>> {
    let mut enrichment = HashMap::new();
    for (category, query) in categories {
        let snippets = retriever.search(query, max_per_category).await;
        if !snippets.is_empty() {
            enrichment.insert(category.clone(), snippets);
        }
    }
    enrichment
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubRetriever;

    #[async_trait]
    impl Retriever for StubRetriever {
        async fn search(&self, query: &str, max_results: usize) -> Vec<String> {
            if query.contains("资金") {
                vec!["预算总额500万元".to_string(); max_results.min(2)]
            } else {
                Vec::new()
            }
        }
    }

    #[tokio::test]
    async fn test_noop_retriever_returns_empty() {
        let retriever = NoopRetriever;
        assert!(retriever.search("任何查询", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_collect_enrichment_drops_empty_categories() {
        let categories = vec![
            ("资金情况".to_string(), "项目资金投入".to_string()),
            ("组织管理".to_string(), "项目组织管理".to_string()),
        ];
        let enrichment = collect_enrichment(&StubRetriever, &categories, 3).await;

        assert!(enrichment.contains_key("资金情况"));
        assert!(!enrichment.contains_key("组织管理"));
        assert_eq!(enrichment["资金情况"].len(), 2);
    }
}
