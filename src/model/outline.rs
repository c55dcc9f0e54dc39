//! 大纲（Outline）：把子树拍平为按先序排列的行，只存路径与轻量预览，不复制大值

use serde::Serialize;
use serde_json::Value;

use crate::model::navigator::Navigator;
use crate::model::node::{attribute_name, attributes_of, children_of, kind_of, name_of, NodeKind};
use crate::model::path;

const PREVIEW_CHARS: usize = 32;

#[derive(Debug, Clone, Serialize)]
pub struct OutlineRow {
    /// 节点的有效名称（根节点无名称时为 `root`）
    pub name: String,
    /// 相对于 Navigator 根的规范化路径，可直接交给 `resolve`
    pub path: String,
    pub kind: NodeKind,
    /// 子节点数量
    pub children: u32,
    /// 属性数量
    pub attributes: u32,
    /// 轻量预览：Group 显示 NX_class，数据集显示值，链接显示目标
    pub preview: String,
    pub depth: u32,
}

fn preview_value(v: &Value) -> String {
    match v {
        Value::String(s) => {
            let s = s.trim();
            if s.chars().count() > PREVIEW_CHARS {
                let truncated: String = s.chars().take(PREVIEW_CHARS).collect();
                format!("\"{}...\"", truncated)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(m) => format!("{{..}} ({} keys)", m.len()),
        Value::Array(a) => format!("[..] ({} items)", a.len()),
    }
}

fn preview_of(node: &Value, kind: NodeKind) -> String {
    if kind == NodeKind::Group {
        let nx_class = attributes_of(node)
            .iter()
            .find(|attr| attribute_name(attr) == Some("NX_class"))
            .and_then(|attr| attr.get("values"))
            .and_then(Value::as_str);
        return match nx_class {
            Some(class) => class.to_string(),
            None => format!("({} children)", children_of(node).len()),
        };
    }

    let config = node.get("config");
    if node.get("module").and_then(Value::as_str) == Some("link") {
        if let Some(source) = config.and_then(|c| c.get("source")).and_then(Value::as_str) {
            return format!("-> {}", source);
        }
    }
    let values = node
        .get("values")
        .or_else(|| config.and_then(|c| c.get("values")));
    match (values, node.get("module").and_then(Value::as_str)) {
        (Some(v), _) => preview_value(v),
        (None, Some(module)) => format!("<{}>", module),
        (None, None) => String::new(),
    }
}

/// 从 Navigator 根开始构建先序大纲；`max_depth` 为 `Some(0)` 时只含根
pub fn build_outline(nav: Navigator<'_>, max_depth: Option<u32>) -> Vec<OutlineRow> {
    fn push_row(out: &mut Vec<OutlineRow>, name: &str, trail: &[&str], node: &Value, kind: NodeKind, depth: u32) {
        out.push(OutlineRow {
            name: name.to_string(),
            path: path::join(trail),
            kind,
            children: u32::try_from(children_of(node).len()).unwrap_or(u32::MAX),
            attributes: u32::try_from(attributes_of(node).len()).unwrap_or(u32::MAX),
            preview: preview_of(node, kind),
            depth,
        });
    }
    fn walk<'a>(
        out: &mut Vec<OutlineRow>,
        node: &'a Value,
        trail: &mut Vec<&'a str>,
        depth: u32,
        max_depth: Option<u32>,
    ) {
        if max_depth.is_some_and(|max| depth >= max) {
            return;
        }
        for child in children_of(node) {
            let (Some(name), Some(kind)) = (name_of(child), kind_of(child)) else {
                tracing::debug!("跳过无名或非对象子节点（父路径 {}）", path::join(trail.as_slice()));
                continue;
            };
            trail.push(name);
            push_row(out, name, trail, child, kind, depth + 1);
            walk(out, child, trail, depth + 1, max_depth);
            trail.pop();
        }
    }

    let mut out = Vec::with_capacity(64);
    let root = nav.dict();
    push_row(&mut out, nav.name().unwrap_or("root"), &[], root, NodeKind::Group, 0);
    let mut trail = Vec::new();
    walk(&mut out, root, &mut trail, 0, max_depth);
    out
}
