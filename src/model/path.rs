//! 路径语法：`/entry/instrument/mon0/@NX_class`
//!
//! 段之间以 `/` 分隔，前导、末尾以及连续的 `/` 产生的空段会被丢弃；
//! 绝对路径与相对路径等价，都从当前 Navigator 的根开始解析。
//! 只有最后一段可以以 `@` 开头，表示属性引用。

use std::fmt;

use crate::model::navigator::NavError;

const SEPARATOR: char = '/';
const ATTRIBUTE_PREFIX: char = '@';

/// 解析后的路径：若干子节点段 + 可选的末尾属性名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath<'p> {
    pub segments: Vec<&'p str>,
    pub attribute: Option<&'p str>,
}

impl<'p> NodePath<'p> {
    pub fn parse(raw: &'p str) -> Result<Self, NavError> {
        let parts: Vec<&str> = raw.split(SEPARATOR).filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(parts.len());
        let mut attribute = None;

        for (idx, part) in parts.iter().enumerate() {
            let Some(attr_name) = part.strip_prefix(ATTRIBUTE_PREFIX) else {
                segments.push(*part);
                continue;
            };
            if idx + 1 != parts.len() {
                return Err(NavError::MalformedPath {
                    path: raw.to_string(),
                    reason: format!("属性段 '{}' 只能位于路径末尾", part),
                });
            }
            if attr_name.is_empty() {
                return Err(NavError::MalformedPath {
                    path: raw.to_string(),
                    reason: "属性名为空".into(),
                });
            }
            attribute = Some(attr_name);
        }

        Ok(Self { segments, attribute })
    }

    /// 空路径指向当前根
    pub fn is_root(&self) -> bool {
        self.segments.is_empty() && self.attribute.is_none()
    }
}

impl fmt::Display for NodePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for seg in &self.segments {
            write!(f, "/{}", seg)?;
        }
        if let Some(attr) = self.attribute {
            write!(f, "/@{}", attr)?;
        }
        Ok(())
    }
}

/// 规范化路径字符串：单个前导 `/`，无末尾与重复 `/`
pub fn normalize(raw: &str) -> Result<String, NavError> {
    Ok(NodePath::parse(raw)?.to_string())
}

/// 由段序列拼接出规范化路径
pub(crate) fn join<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        return SEPARATOR.to_string();
    }
    segments.iter().fold(String::new(), |mut out, seg| {
        out.push(SEPARATOR);
        out.push_str(seg.as_ref());
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let p = NodePath::parse("/entry/instrument/mon0").unwrap();
        assert_eq!(p.segments, vec!["entry", "instrument", "mon0"]);
        assert_eq!(p.attribute, None);

        let p = NodePath::parse("entry//instrument/").unwrap();
        assert_eq!(p.segments, vec!["entry", "instrument"], "空段应被丢弃");
    }

    #[test]
    fn test_parse_root() {
        assert!(NodePath::parse("").unwrap().is_root());
        assert!(NodePath::parse("/").unwrap().is_root());
        assert!(NodePath::parse("///").unwrap().is_root());
    }

    #[test]
    fn test_parse_attribute() {
        let p = NodePath::parse("/entry/@NX_class").unwrap();
        assert_eq!(p.segments, vec!["entry"]);
        assert_eq!(p.attribute, Some("NX_class"));

        let p = NodePath::parse("@NX_class").unwrap();
        assert!(p.segments.is_empty());
        assert_eq!(p.attribute, Some("NX_class"));
        assert!(!p.is_root());
    }

    #[test]
    fn test_attribute_must_be_last() {
        let err = NodePath::parse("/entry/@attr/more").unwrap_err();
        assert!(matches!(err, NavError::MalformedPath { .. }));
        assert!(err.to_string().contains("只能位于路径末尾"));
    }

    #[test]
    fn test_empty_attribute_name() {
        let err = NodePath::parse("/entry/@").unwrap_err();
        assert!(matches!(err, NavError::MalformedPath { .. }));
    }

    #[test]
    fn test_at_sign_inside_segment_is_a_name() {
        let p = NodePath::parse("/a@b").unwrap();
        assert_eq!(p.segments, vec!["a@b"]);
        assert_eq!(p.attribute, None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("entry/instrument/").unwrap(), "/entry/instrument");
        assert_eq!(normalize("//entry//@NX_class").unwrap(), "/entry/@NX_class");
        assert_eq!(normalize("").unwrap(), "/");
        assert!(normalize("/@a/b").is_err());
    }

    #[test]
    fn test_join() {
        assert_eq!(join::<&str>(&[]), "/");
        assert_eq!(join(&["entry", "@NX_class"]), "/entry/@NX_class");
    }
}
