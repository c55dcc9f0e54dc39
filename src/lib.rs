//! NeXus Structure 路径导航库
//!
//! 提供 NeXus Structure JSON 的加载、按 `/entry/instrument/mon0/@NX_class`
//! 形式的只读路径导航、按名称搜索、反向路径查找与大纲浏览

pub mod model;
pub mod utils;

// 重新导出主要类型
pub use model::document::{AppError, NexusDocument};
pub use model::navigator::{NavError, Navigator, Resolved};
pub use model::node::NodeKind;
pub use model::outline::{build_outline, OutlineRow};
pub use model::path::normalize;
