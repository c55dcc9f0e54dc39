//! 节点适配层：按键的存在与否对 NeXus Structure 节点做结构化分类，不引入额外标签字段

use serde::Serialize;
use serde_json::Value;

const CHILDREN_KEY: &str = "children";
const ATTRIBUTES_KEY: &str = "attributes";
const NAME_KEY: &str = "name";

/// 节点类型（由结构推导，与线上格式解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// 含有 `children` 键（即使为空）
    Group,
    /// 数据集 / 字段 / 链接
    Leaf,
}

/// 对节点分类；非对象值既不是 Group 也不是 Leaf
pub fn kind_of(node: &Value) -> Option<NodeKind> {
    match node {
        Value::Object(map) if map.contains_key(CHILDREN_KEY) => Some(NodeKind::Group),
        Value::Object(_) => Some(NodeKind::Leaf),
        _ => None,
    }
}

pub fn is_group(node: &Value) -> bool {
    kind_of(node) == Some(NodeKind::Group)
}

/// 子节点序列；非 Group 返回空切片
pub fn children_of(node: &Value) -> &[Value] {
    match node.get(CHILDREN_KEY) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

/// 属性记录序列；缺失时返回空切片
pub fn attributes_of(node: &Value) -> &[Value] {
    match node.get(ATTRIBUTES_KEY) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

/// 节点的有效名称
///
/// 优先取 `name` 键；file-writer 模块形式的数据集与链接把名称放在
/// `config.name` 中（`{"module": "dataset", "config": {"name": ...}}`）。
pub fn name_of(node: &Value) -> Option<&str> {
    if let Some(name) = node.get(NAME_KEY).and_then(Value::as_str) {
        return Some(name);
    }
    match node.get("module").and_then(Value::as_str) {
        Some("dataset") | Some("link") => node
            .get("config")
            .and_then(|config| config.get(NAME_KEY))
            .and_then(Value::as_str),
        _ => None,
    }
}

/// 属性记录的名称
pub fn attribute_name(attr: &Value) -> Option<&str> {
    attr.get(NAME_KEY).and_then(Value::as_str)
}

/// 按名称线性查找子节点，重名时返回文档顺序中的第一个
pub fn find_child_by_name<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    children_of(node)
        .iter()
        .find(|child| name_of(child) == Some(name))
}

/// 只在 Group 命名空间内查找子节点
pub fn find_group_child_by_name<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    children_of(node)
        .iter()
        .find(|child| is_group(child) && name_of(child) == Some(name))
}

/// 按名称线性查找属性记录，同样取第一个匹配
pub fn find_attribute_by_name<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    attributes_of(node)
        .iter()
        .find(|attr| attribute_name(attr) == Some(name))
}
