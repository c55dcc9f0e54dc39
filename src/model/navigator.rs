//! Navigator：对 NeXus Structure JSON 的只读路径导航
//!
//! NeXus Structure 以层层嵌套的 `children` 数组描述组、数据集与链接，
//! 手工索引（`doc["children"][0]["children"][2]`）既冗长又脆弱。
//! Navigator 包装一个 Group 节点，允许按 `/entry/instrument/mon0` 访问，
//! 以 `@` 前缀访问属性（`/entry/@NX_class`），并支持链式导航、
//! 存在性检查、带默认值的查询、按名称搜索与反向路径查找。
//!
//! Navigator 只持有对树的共享借用，本身是 `Copy` 的值类型；
//! 每次下钻到子 Group 都返回一个新的 Navigator，不缓存、不修改任何状态。

use std::fmt;
use std::ops::Index;
use std::ptr;

use serde_json::Value;
use thiserror::Error;

use crate::model::node::{
    attribute_name, attributes_of, children_of, find_attribute_by_name, find_child_by_name,
    find_group_child_by_name, is_group, name_of,
};
use crate::model::path::{self, NodePath};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("路径格式错误 '{path}': {reason}")]
    MalformedPath { path: String, reason: String },
    #[error("Navigator 只能包装 Group 节点（需要 children 键）")]
    InvalidRootKind,
    #[error("无法穿过非 Group 节点 {at} 继续查找 '{segment}'")]
    PathThroughNonGroup { segment: String, at: String },
    #[error("路径段 '{segment}' 在 {at} 下不存在")]
    PathNotFound { segment: String, at: String },
    #[error("属性 '@{name}' 在 {at} 上不存在")]
    AttributeNotFound { name: String, at: String },
    #[error("目标节点不在当前子树中")]
    TargetNotFound,
    #[error("路径 {path} 指向的不是 Group")]
    NotAGroup { path: String },
}

impl NavError {
    /// 是否属于“未找到”一类；`exists`/`get` 会把这类错误降级为 false / 默认值
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NavError::PathNotFound { .. }
                | NavError::AttributeNotFound { .. }
                | NavError::PathThroughNonGroup { .. }
                | NavError::TargetNotFound
        )
    }
}

/// 路径解析结果
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// 子 Group，已包装为新的 Navigator 以便继续链式导航
    Group(Navigator<'a>),
    /// 数据集或链接的原始节点
    Leaf(&'a Value),
    /// 属性记录 `{name, values, dtype}`
    Attribute(&'a Value),
}

impl<'a> Resolved<'a> {
    /// 底层原始 JSON 的引用（保持同一性，可直接交给 `get_path`）
    pub fn as_value(&self) -> &'a Value {
        match self {
            Resolved::Group(nav) => nav.dict(),
            Resolved::Leaf(v) | Resolved::Attribute(v) => v,
        }
    }

    pub fn into_navigator(self) -> Option<Navigator<'a>> {
        match self {
            Resolved::Group(nav) => Some(nav),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Resolved::Group(_))
    }
}

/// 包装一个 Group 节点的只读导航器
#[derive(Clone, Copy)]
pub struct Navigator<'a> {
    node: &'a Value,
}

impl<'a> Navigator<'a> {
    /// 包装 Group 节点；非 Group 返回 `InvalidRootKind`
    pub fn new(node: &'a Value) -> Result<Self, NavError> {
        if !is_group(node) {
            return Err(NavError::InvalidRootKind);
        }
        Ok(Self { node })
    }

    /// 按路径解析节点或属性
    ///
    /// 需要继续下钻的段必须落在 Group 上，并优先在 Group 命名空间中查找；
    /// 最后一个节点段（其后可跟 `@属性`）按文档顺序取第一个同名子节点。
    pub fn resolve(&self, raw_path: &str) -> Result<Resolved<'a>, NavError> {
        let parsed = NodePath::parse(raw_path)?;
        let mut current = self.node;
        let mut walked: Vec<&str> = Vec::with_capacity(parsed.segments.len());
        let last = parsed.segments.len();

        for (idx, segment) in parsed.segments.iter().enumerate() {
            if !is_group(current) {
                tracing::debug!("路径 {} 在 {} 处遇到非 Group 节点", raw_path, path::join(&walked));
                return Err(NavError::PathThroughNonGroup {
                    segment: segment.to_string(),
                    at: path::join(&walked),
                });
            }
            let child = if idx + 1 == last {
                find_child_by_name(current, segment)
            } else {
                find_group_child_by_name(current, segment)
                    .or_else(|| find_child_by_name(current, segment))
            };
            let Some(child) = child else {
                tracing::debug!("路径 {} 未找到段 '{}'", raw_path, segment);
                return Err(NavError::PathNotFound {
                    segment: segment.to_string(),
                    at: path::join(&walked),
                });
            };
            current = child;
            walked.push(*segment);
        }

        if let Some(attr) = parsed.attribute {
            return find_attribute_by_name(current, attr)
                .map(Resolved::Attribute)
                .ok_or_else(|| {
                    tracing::debug!("路径 {} 未找到属性 '@{}'", raw_path, attr);
                    NavError::AttributeNotFound {
                        name: attr.to_string(),
                        at: path::join(&walked),
                    }
                });
        }

        if is_group(current) {
            Ok(Resolved::Group(Navigator { node: current }))
        } else {
            Ok(Resolved::Leaf(current))
        }
    }

    /// 链式导航：路径必须指向 Group
    pub fn group(&self, raw_path: &str) -> Result<Navigator<'a>, NavError> {
        self.resolve(raw_path)?
            .into_navigator()
            .ok_or_else(|| NavError::NotAGroup {
                path: path::normalize(raw_path).unwrap_or_else(|_| raw_path.to_string()),
            })
    }

    /// 路径是否存在；格式错误仍然返回 Err
    pub fn exists(&self, raw_path: &str) -> Result<bool, NavError> {
        match self.resolve(raw_path) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// 与 `resolve` 相同，但“未找到”返回 `Ok(None)`
    pub fn get(&self, raw_path: &str) -> Result<Option<Resolved<'a>>, NavError> {
        match self.resolve(raw_path) {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// 取原始 JSON，未找到时返回 `default`
    pub fn get_or<'d>(&self, raw_path: &str, default: &'d Value) -> Result<&'d Value, NavError>
    where
        'a: 'd,
    {
        Ok(self
            .get(raw_path)?
            .map(|found| -> &'d Value { found.as_value() })
            .unwrap_or(default))
    }

    /// 在整个子树（含当前节点）中按名称深度优先先序搜索
    ///
    /// 匹配的 Group 以原始 JSON 返回而非 Navigator。`include_attributes` 为真时，
    /// 每个被访问节点上同名的属性记录紧跟在该节点之后、其子节点之前。
    pub fn find_all(&self, name: &str, include_attributes: bool) -> Vec<&'a Value> {
        fn walk<'a>(node: &'a Value, name: &str, include_attributes: bool, out: &mut Vec<&'a Value>) {
            if name_of(node) == Some(name) {
                out.push(node);
            }
            if include_attributes {
                out.extend(
                    attributes_of(node)
                        .iter()
                        .filter(|attr| attribute_name(attr) == Some(name)),
                );
            }
            for child in children_of(node) {
                walk(child, name, include_attributes, out);
            }
        }

        let mut out = Vec::new();
        walk(self.node, name, include_attributes, &mut out);
        out
    }

    /// 反向查找：按指针同一性定位节点或属性记录，返回从当前根出发的规范化路径
    ///
    /// 当前根本身返回 `"/"`。内容相同但不是同一实例的 JSON 不会被匹配。
    pub fn get_path(&self, target: &Value) -> Result<String, NavError> {
        fn search(node: &Value, target: &Value, trail: &mut Vec<String>) -> bool {
            if ptr::eq(node, target) {
                return true;
            }
            for attr in attributes_of(node) {
                if !ptr::eq(attr, target) {
                    continue;
                }
                if let Some(attr_name) = attribute_name(attr) {
                    trail.push(format!("@{}", attr_name));
                    return true;
                }
            }
            for child in children_of(node) {
                // 无名子节点无法用路径寻址
                let Some(child_name) = name_of(child) else {
                    continue;
                };
                trail.push(child_name.to_string());
                if search(child, target, trail) {
                    return true;
                }
                trail.pop();
            }
            false
        }

        let mut trail = Vec::new();
        if search(self.node, target, &mut trail) {
            Ok(path::join(&trail))
        } else {
            Err(NavError::TargetNotFound)
        }
    }

    /// 底层 Group 节点的原始 JSON
    pub fn dict(&self) -> &'a Value {
        self.node
    }

    pub fn structure(&self) -> &'a Value {
        self.node
    }

    /// Group 的有效名称；根节点通常没有名称
    pub fn name(&self) -> Option<&'a str> {
        name_of(self.node)
    }

    /// `type` 字段（通常为 `"group"`）
    pub fn node_type(&self) -> Option<&'a str> {
        self.node.get("type").and_then(Value::as_str)
    }
}

/// `nav["/entry/@NX_class"]` 返回原始 JSON；解析失败时 panic
///
/// 返回值是 `serde_json::Value`，再接一次 `[]` 走的是 `Value` 的索引，
/// 缺失时静默得到 `Null`。链式访问请用 `group()` 或 `resolve()`。
impl<'a> Index<&str> for Navigator<'a> {
    type Output = Value;

    fn index(&self, raw_path: &str) -> &Value {
        match self.resolve(raw_path) {
            Ok(found) => found.as_value(),
            Err(e) => panic!("{}", e),
        }
    }
}

impl fmt::Display for Navigator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Navigator(name='{}', type='{}')",
            self.name().unwrap_or("root"),
            self.node_type().unwrap_or("structure")
        )
    }
}

impl fmt::Debug for Navigator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
