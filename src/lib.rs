//! JSON查看器库
//!
//! 提供JSON文本解析、影子树构建与树视图展开状态管理
//! 遵循MVVM架构模式，UI层通过VM桥接层访问数据
//! 查看是只读的：展开/折叠与截断只改显示，从不修改解析出的文档

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::data_core::{AppError, AppState};
pub use model::shadow_tree::{build_shadow_tree, JsonTreeNode, NodeKind};
