//! AppState：解析输入文本，持有 DOM 与树视图的展开状态

use jsonpath_rust::JsonPath;
use serde_json::Value;
use thiserror::Error;

use crate::model::shadow_tree::{build_shadow_tree, JsonTreeNode, NodeKind, MAX_STRING_PREVIEW};

#[derive(Debug, Default)]
pub struct AppState {
    /// 最近一次成功解析的文档；解析失败时为 None
    pub dom: Option<Value>,
    pub tree_flat: Vec<JsonTreeNode>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("JSONPath错误: {0}")]
    JsonPath(String),
    #[error("剪贴板错误: {0}")]
    Clipboard(String),
    #[error("状态错误: {0}")]
    State(String),
}

impl AppState {
    /// 解析输入文本并重建影子树。成功时整棵树回到初始展开状态（仅根展开）；
    /// 失败时清空上一次的解析结果，由调用方展示统一的错误指示
    pub fn parse_text(&mut self, text: &str) -> Result<(), AppError> {
        match serde_json::from_str::<Value>(text) {
            Ok(dom) => {
                self.tree_flat = build_shadow_tree(&dom);
                if let Some(root) = self.tree_flat.first_mut() {
                    root.expanded = true;
                }
                self.dom = Some(dom);
                self.update_visibility_by_expansion();
                Ok(())
            }
            Err(e) => {
                self.dom = None;
                self.tree_flat.clear();
                Err(AppError::Parse(e))
            }
        }
    }

    /// 切换节点的展开状态。非空容器切换子节点可见性；
    /// 超长字符串叶子切换截断显示；空容器与其余标量不可切换
    pub fn toggle_node(&mut self, path: &str) {
        if let Some(node) = self.tree_flat.iter_mut().find(|n| n.path == path) {
            match node.kind {
                NodeKind::Object | NodeKind::Array => {
                    if node.children > 0 {
                        node.expanded = !node.expanded;
                    }
                }
                NodeKind::String => {
                    if node.value_text.chars().count() > MAX_STRING_PREVIEW {
                        node.expanded = !node.expanded;
                    }
                }
                _ => {}
            }
        }
        self.update_visibility_by_expansion();
    }

    /// 根据展开状态推导整棵树的可见性：根节点总是可见，
    /// 其余节点仅当所有祖先都展开时可见。折叠只隐藏后代，不清除其展开标记
    pub fn update_visibility_by_expansion(&mut self) {
        // 每层记录该层祖先是否既可见又展开，按先序一次扫描即可
        let mut open: Vec<bool> = Vec::new();
        for node in &mut self.tree_flat {
            let depth = node.depth as usize;
            open.truncate(depth);
            node.visible = depth == 0 || open.last().copied().unwrap_or(false);
            open.push(node.visible && node.expanded);
        }
    }

    /// 整个文档的 pretty 字符串（复制时未选中节点的回退）
    pub fn pretty_document(&self) -> Result<String, AppError> {
        let dom = self
            .dom
            .as_ref()
            .ok_or_else(|| AppError::State("尚无解析结果".into()))?;
        Ok(serde_json::to_string_pretty(dom)?)
    }

    /// 按 JSONPath 提取第一个匹配节点的 pretty 字符串
    pub fn extract_subtree_pretty(&self, json_path: &str) -> Result<String, AppError> {
        let dom = self
            .dom
            .as_ref()
            .ok_or_else(|| AppError::State("尚无解析结果".into()))?;
        let hits: Vec<&Value> = dom
            .query(json_path)
            .map_err(|e| AppError::JsonPath(e.to_string()))?;
        let first = hits
            .into_iter()
            .next()
            .ok_or_else(|| AppError::JsonPath("未匹配到任何节点".into()))?;
        Ok(serde_json::to_string_pretty(first)?)
    }
}
