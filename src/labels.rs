use std::path::Path;

use crate::utils::error::BreedError;
use crate::Result;

/// 内置犬种标签表（行号即类别索引，与训练产物绑定）
const EMBEDDED_LABELS: &str = include_str!("../assets/dog_breed_labels.txt");

/// 有序犬种标签表
#[derive(Debug, Clone)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    /// 从模型目录加载标签文件；文件不存在时回退到内置标签表
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let table = Self::parse(&content)?;
            tracing::info!(
                "Loaded {} breed labels from {}",
                table.len(),
                path.display()
            );
            Ok(table)
        } else {
            let table = Self::embedded()?;
            tracing::info!(
                "Labels file {} not found, using embedded table with {} breeds",
                path.display(),
                table.len()
            );
            Ok(table)
        }
    }

    /// 内置标签表
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_LABELS)
    }

    /// 从调用方提供的名称列表构建（依赖注入用）
    pub fn from_names(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(BreedError::ModelLoad(
                "Label table must not be empty".to_string(),
            ));
        }
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(BreedError::ModelLoad(
                "Label table contains blank entries".to_string(),
            ));
        }
        Ok(Self { names })
    }

    fn parse(content: &str) -> Result<Self> {
        let names: Vec<String> = content
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        if names.is_empty() {
            return Err(BreedError::ModelLoad(
                "Label table is empty".to_string(),
            ));
        }

        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_matches_training_order() {
        let table = LabelTable::embedded().unwrap();
        assert_eq!(table.len(), 120);
        assert_eq!(table.names()[0], "Chihuahua");
        assert_eq!(table.names()[56], "Golden Retriever");
        assert_eq!(table.names()[119], "African Hunting Dog");
    }

    #[test]
    fn parse_trims_whitespace_and_skips_blank_lines() {
        let table = LabelTable::parse("  Beagle  \n\n Pug \n\t\n").unwrap();
        assert_eq!(table.names(), &["Beagle".to_string(), "Pug".to_string()]);
    }

    #[test]
    fn parse_rejects_empty_content() {
        let err = LabelTable::parse("\n  \n").unwrap_err();
        assert!(matches!(err, BreedError::ModelLoad(_)));
    }

    #[test]
    fn load_falls_back_to_embedded_when_file_missing() {
        let table = LabelTable::load(Path::new("/nonexistent/dog_breed_labels.txt")).unwrap();
        assert_eq!(table.len(), 120);
    }

    #[test]
    fn load_prefers_file_next_to_model() {
        let path = std::env::temp_dir().join(format!("breed_labels_{}.txt", std::process::id()));
        std::fs::write(&path, "Beagle\nPug\nBorzoi\n").unwrap();
        let table = LabelTable::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(table.len(), 3);
        assert_eq!(table.names()[2], "Borzoi");
    }

    #[test]
    fn from_names_rejects_blank_entries() {
        let err = LabelTable::from_names(vec!["Beagle".to_string(), "  ".to_string()]).unwrap_err();
        assert!(matches!(err, BreedError::ModelLoad(_)));
    }
}
