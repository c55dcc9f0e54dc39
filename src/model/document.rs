//! NexusDocument：持有已解析的 NeXus Structure，并向外借出 Navigator

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::model::navigator::{NavError, Navigator};
use crate::utils::fs::read_json_file;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("导航错误: {0}")]
    Nav(#[from] NavError),
}

#[derive(Debug)]
pub struct NexusDocument {
    source_path: Option<PathBuf>,
    dom: Value,
}

impl NexusDocument {
    /// 从文件加载 NeXus Structure JSON；根节点必须是 Group
    pub fn load_file(p: &Path) -> Result<Self, AppError> {
        let dom = read_json_file(p)?;
        let mut doc = Self::from_value(dom)?;
        doc.source_path = Some(p.to_path_buf());
        tracing::info!(
            "已加载 {}（顶层子节点 {} 个）",
            p.display(),
            crate::model::node::children_of(&doc.dom).len()
        );
        Ok(doc)
    }

    /// 包装上游已构建好的 JSON 值
    pub fn from_value(dom: Value) -> Result<Self, AppError> {
        Navigator::new(&dom)?;
        Ok(Self {
            source_path: None,
            dom,
        })
    }

    pub fn navigator(&self) -> Result<Navigator<'_>, NavError> {
        Navigator::new(&self.dom)
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn dom(&self) -> &Value {
        &self.dom
    }

    pub fn into_value(self) -> Value {
        self.dom
    }
}

impl FromStr for NexusDocument {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(content.as_bytes()).expect("写入临时文件失败");
        file
    }

    const SIMPLE: &str = r#"{"children": [{"name": "entry", "type": "group", "children": [],
        "attributes": [{"name": "NX_class", "dtype": "string", "values": "NXentry"}]}]}"#;

    #[test]
    fn test_load_file() {
        let temp_file = create_test_json_file(SIMPLE);
        let doc = NexusDocument::load_file(temp_file.path()).expect("加载文件失败");

        assert_eq!(doc.source_path(), Some(temp_file.path()));
        let nav = doc.navigator().unwrap();
        assert_eq!(nav["/entry/@NX_class"]["values"], "NXentry");
    }

    #[test]
    fn test_load_missing_file() {
        let result = NexusDocument::load_file(Path::new("/nonexistent/nexus_structure.json"));
        assert!(matches!(result, Err(AppError::Io(_))), "不存在的文件应返回IO错误");
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_file = create_test_json_file(r#"{"children": [ invalid"#);
        let result = NexusDocument::load_file(temp_file.path());
        assert!(matches!(result, Err(AppError::Parse(_))), "无效JSON应返回解析错误");
    }

    #[test]
    fn test_load_non_group_root() {
        let temp_file = create_test_json_file(r#"{"module": "dataset", "config": {"name": "x"}}"#);
        let result = NexusDocument::load_file(temp_file.path());
        assert!(matches!(result, Err(AppError::Nav(NavError::InvalidRootKind))));
    }

    #[test]
    fn test_from_str_and_into_value() {
        let doc: NexusDocument = SIMPLE.parse().unwrap();
        assert!(doc.source_path().is_none());
        assert!(doc.navigator().unwrap().exists("entry").unwrap());

        let value = doc.into_value();
        assert_eq!(value["children"][0]["name"], "entry");
    }

    #[test]
    fn test_navigator_borrows_document() {
        let doc: NexusDocument = SIMPLE.parse().unwrap();
        let nav = doc.navigator().unwrap();
        let entry = nav.group("entry").unwrap();
        assert!(std::ptr::eq(entry.dict(), &doc.dom()["children"][0]));
    }
}
