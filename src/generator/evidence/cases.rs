//! 网络案例摘录池 - 预抓取的案例文档目录扫描与来源块提取
//!
//! 池内文档以2~4级markdown标题分块，标题中带"来源:<标签>"标记。
//! 匹配是标签对标题文本的朴素子串匹配，同一标签以首个命中为准；
//! 这是沿袭既有内容约定的行为，不做模糊改进。

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

/// 单任务最多携带的案例摘录数
pub const MAX_CASE_SNIPPETS: usize = 5;

static BLOCK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{2,4})\s+(.+?)\s*$").unwrap());

/// 按来源标签在案例池中提取摘录块
///
/// 逐标签扫描，命中即止；总数不超过`MAX_CASE_SNIPPETS`。目录缺失、
/// 文件不可读都降级为跳过，绝不向上抛错。
pub fn collect_case_snippets(cases_dir: &Path, source_labels: &[String]) -> Vec<String> {
    if source_labels.is_empty() {
        return Vec::new();
    }

    let documents = load_documents(cases_dir);
    let mut snippets = Vec::new();

    for label in source_labels {
        if snippets.len() >= MAX_CASE_SNIPPETS {
            break;
        }
        if let Some((file_name, block)) = find_block(&documents, label) {
            snippets.push(format!("【来源:{} | {}】\n{}", label, file_name, block));
        }
    }

    snippets
}

/// 读入池内全部markdown文档，文件名排序保证扫描顺序稳定
fn load_documents(cases_dir: &Path) -> Vec<(String, String)> {
    let mut documents: Vec<(String, String)> = WalkDir::new(cases_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        })
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            std::fs::read_to_string(entry.path())
                .ok()
                .map(|content| (name, content))
        })
        .collect();
    documents.sort_by(|a, b| a.0.cmp(&b.0));
    documents
}

/// 在文档集中查找首个标题含指定标签的块
///
/// 块范围：命中标题的下一行起，到下一个等级相同或更高的标题为止。
fn find_block(documents: &[(String, String)], label: &str) -> Option<(String, String)> {
    for (file_name, content) in documents {
        let lines: Vec<&str> = content.lines().collect();
        for (index, line) in lines.iter().enumerate() {
            let Some(captures) = BLOCK_HEADER.captures(line) else {
                continue;
            };
            let level = captures.get(1).map(|m| m.as_str().len()).unwrap_or(0);
            let heading = captures.get(2).map(|m| m.as_str()).unwrap_or("");
            if !heading.contains(label) {
                continue;
            }

            let mut block_lines = Vec::new();
            for next in &lines[index + 1..] {
                if let Some(next_captures) = BLOCK_HEADER.captures(next) {
                    let next_level =
                        next_captures.get(1).map(|m| m.as_str().len()).unwrap_or(0);
                    if next_level <= level {
                        break;
                    }
                }
                block_lines.push(*next);
            }

            let block = block_lines.join("\n").trim().to_string();
            return Some((file_name.clone(), block));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pool_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_matching_block_extracted_with_prefix() {
        let dir = pool_with(&[(
            "cases.md",
            "## 来源:A\nA案例正文第一行\nA案例正文第二行\n\n## 来源:B\nB案例正文\n",
        )]);
        let snippets =
            collect_case_snippets(dir.path(), &["A".to_string()]);

        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].starts_with("【来源:A | cases.md】"));
        assert!(snippets[0].contains("A案例正文第一行"));
        assert!(!snippets[0].contains("B案例正文"));
    }

    #[test]
    fn test_block_stops_at_equal_or_higher_header() {
        let dir = pool_with(&[(
            "cases.md",
            "## 来源:A\n正文\n### 子标题\n子块内容\n## 来源:B\n其他\n",
        )]);
        let snippets = collect_case_snippets(dir.path(), &["A".to_string()]);

        // 低级别子标题属于本块，同级标题终止本块
        assert!(snippets[0].contains("子块内容"));
        assert!(!snippets[0].contains("其他"));
    }

    #[test]
    fn test_first_found_wins_across_files() {
        let dir = pool_with(&[
            ("a_first.md", "## 来源:A\n首个命中\n"),
            ("b_second.md", "## 来源:A\n后续命中\n"),
        ]);
        let snippets = collect_case_snippets(dir.path(), &["A".to_string()]);

        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].contains("首个命中"));
    }

    #[test]
    fn test_snippet_cap_enforced() {
        let content: String = (0..20)
            .map(|i| format!("## 来源:S{}\n第{}块\n", i, i))
            .collect();
        let dir = pool_with(&[("many.md", content.as_str())]);
        let labels: Vec<String> = (0..20).map(|i| format!("S{}", i)).collect();

        let snippets = collect_case_snippets(dir.path(), &labels);
        assert_eq!(snippets.len(), MAX_CASE_SNIPPETS);
    }

    #[test]
    fn test_missing_dir_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no_such_pool");
        let snippets = collect_case_snippets(&missing, &["A".to_string()]);
        assert!(snippets.is_empty());
    }

    #[test]
    fn test_unmatched_label_skipped() {
        let dir = pool_with(&[("cases.md", "## 来源:A\n正文\n")]);
        let snippets =
            collect_case_snippets(dir.path(), &["Z".to_string(), "A".to_string()]);
        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].contains("来源:A"));
    }
}
