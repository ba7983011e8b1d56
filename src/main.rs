//! 程序入口：初始化日志、加载 Slint UI，并绑定 VM 回调

use std::{cell::RefCell, rc::Rc};
use std::time::Instant;

use slint::{ComponentHandle, ModelRc, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

slint::include_modules!();

mod model;
mod utils;
mod vm;

use model::data_core::AppState;
use model::shadow_tree::{display_of, JsonTreeNode, NodeKind, MAX_STRING_PREVIEW};
use vm::bridge::*;

// TreeNodeData转换实现
impl From<&JsonTreeNode> for TreeNodeData {
    /// 将Rust JsonTreeNode转换为Slint可用的行数据；显示文本在此即时计算，
    /// 截断与容器摘要随展开状态变化
    fn from(node: &JsonTreeNode) -> Self {
        Self {
            name: node.name.clone().into(),
            path: node.path.clone().into(),
            kind: format!("{:?}", node.kind).into(), // Object/Array/String等
            children: node.children as i32,
            preview: display_of(node).into(),
            depth: node.depth as i32,
            expanded: node.expanded,
            visible: true, // 在Rust端已过滤，这里总是true
        }
    }
}

/// VM桥接器：管理UI与数据层的交互
struct ViewModelBridge {
    app_state: Rc<RefCell<AppState>>,
}

impl ViewModelBridge {
    /// 创建新的VM桥接器并绑定所有回调
    fn new(app_window: &AppWindow, app_state: Rc<RefCell<AppState>>) -> Self {
        let bridge = Self { app_state };
        bridge.setup_callbacks(app_window);
        bridge
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        let app_state = self.app_state.clone();

        // === 解析回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_parse_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_parse_pressed(&app_window, &app_state);
                }
            });
        }

        // === 节点点击回调（选中 + 切换展开） ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_node_clicked(move |node_path| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_node_clicked(&app_window, &app_state, &node_path.to_string());
                }
            });
        }

        // === 复制按钮回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_copy_pressed(&app_window, &app_state);
                }
            });
        }
    }

    /// 初始化UI状态
    fn initialize_ui(&self, app_window: &AppWindow) {
        app_window.set_status_message(STATUS_READY.into());
        app_window.set_error_text("".into());
        app_window.set_selected_path("".into());

        // 设置空的树模型
        let empty_model = ModelRc::new(VecModel::<TreeNodeData>::default());
        app_window.set_tree_model(empty_model);
    }

    /// 处理解析操作：成功则重建树视图，失败则清空并显示统一错误指示
    fn handle_parse_pressed(app_window: &AppWindow, app_state: &Rc<RefCell<AppState>>) {
        let input = app_window.get_json_input().to_string();

        // 开始性能监控
        let start_time = Instant::now();

        let parse_result = app_state.borrow_mut().parse_text(&input);
        match parse_result {
            Ok(()) => {
                let parse_duration = start_time.elapsed();
                app_window.set_error_text("".into());
                app_window.set_selected_path("".into());
                Self::rebuild_tree_model(app_window, app_state);

                let node_count = app_state.borrow().tree_flat.len();
                app_window.set_status_message(
                    format!(
                        "{}: {} 个节点，耗时 {:.1}ms",
                        STATUS_PARSED,
                        node_count,
                        parse_duration.as_secs_f64() * 1000.0
                    )
                    .into(),
                );
                tracing::info!(
                    "解析成功: {} 个节点，耗时: {:.1}ms",
                    node_count,
                    parse_duration.as_secs_f64() * 1000.0
                );
            }
            Err(e) => {
                // 错误指示不携带具体原因，详细信息只进日志
                app_window.set_error_text(ERROR_INVALID_JSON.into());
                app_window.set_selected_path("".into());
                app_window.set_tree_model(ModelRc::new(VecModel::<TreeNodeData>::default()));
                app_window
                    .set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, ERROR_INVALID_JSON).into());
                tracing::error!("解析失败: {}", e);
            }
        }
    }

    /// 处理节点点击：选中该节点并切换其展开状态
    fn handle_node_clicked(
        app_window: &AppWindow,
        app_state: &Rc<RefCell<AppState>>,
        node_path: &str,
    ) {
        app_window.set_selected_path(node_path.into());

        app_state.borrow_mut().toggle_node(node_path);
        Self::rebuild_tree_model(app_window, app_state);

        // 更新状态消息
        let (node_name, toggleable, expanded) = {
            let state = app_state.borrow();
            match state.tree_flat.iter().find(|n| n.path == node_path) {
                Some(n) => {
                    let toggleable = (n.kind.is_container() && n.children > 0)
                        || (n.kind == NodeKind::String
                            && n.value_text.chars().count() > MAX_STRING_PREVIEW);
                    (n.name.clone(), toggleable, n.expanded)
                }
                None => (String::new(), false, false),
            }
        };

        if toggleable {
            let action = if expanded { "展开" } else { "折叠" };
            app_window.set_status_message(format!("{}: {}", action, node_name).into());
        } else {
            app_window.set_status_message(format!("已选中: {}", node_name).into());
        }
    }

    /// 处理复制按钮操作（优先复制选中节点的完整 JSON；未选中时复制整个文档）
    fn handle_copy_pressed(app_window: &AppWindow, app_state: &Rc<RefCell<AppState>>) {
        let selected_path = app_window.get_selected_path().to_string();

        let content = {
            let state = app_state.borrow();
            if selected_path.is_empty() {
                state.pretty_document()
            } else {
                state.extract_subtree_pretty(&selected_path)
            }
        };

        match content.and_then(|text| utils::clipboard::copy_text(&text).map(|_| text)) {
            Ok(text) => {
                app_window.set_status_message(STATUS_COPIED.into());
                tracing::info!("内容已复制到剪贴板，长度: {} 字符", text.len());
            }
            Err(e) => {
                let error_msg = format!("{}{}", STATUS_ERROR_PREFIX, e);
                app_window.set_status_message(error_msg.into());
                tracing::error!("复制失败: {}", e);
            }
        }
    }

    /// 重新构建树模型 - 只包含可见的节点
    fn rebuild_tree_model(app_window: &AppWindow, app_state: &Rc<RefCell<AppState>>) {
        let tree_data: Vec<TreeNodeData> = {
            let state = app_state.borrow();
            state
                .tree_flat
                .iter()
                .filter(|node| node.visible)
                .map(TreeNodeData::from)
                .collect()
        };

        let model = ModelRc::new(VecModel::from(tree_data));
        app_window.set_tree_model(model);
    }
}

fn main() -> anyhow::Result<()> {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let app = AppWindow::new().map_err(|e| anyhow::anyhow!("UI 初始化失败: {}", e))?;
    let state = Rc::new(RefCell::new(AppState::default()));

    // 创建VM桥接器并绑定UI回调
    let bridge = ViewModelBridge::new(&app, state);
    bridge.initialize_ui(&app);

    tracing::info!("应用启动成功，UI已初始化");
    app.run().map_err(|e| anyhow::anyhow!("UI 事件循环异常退出: {}", e))?;
    Ok(())
}
