//! 影子树（Shadow Tree）：把解析后的 JSON 展平成带展开状态的节点列表，供树视图渲染

use serde_json::Value;

/// 字符串叶子在未展开时的最大显示字符数，超出部分以省略号代替
pub const MAX_STRING_PREVIEW: usize = 100;

/// JSON 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl NodeKind {
    /// 容器指非 null 的复合类型；其余（含 null）一律按标量叶子渲染
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::Array)
    }
}

#[derive(Debug, Clone)]
pub struct JsonTreeNode {
    /// 节点在父级中的键名或索引的字符串形式，根节点为 "root"
    pub name: String,
    /// RFC 9535 JSONPath（节点的结构化身份，也用于复制时寻址）
    pub path: String,
    /// 节点类型
    pub kind: NodeKind,
    /// 子元素数量（对象字段数 / 数组长度）
    pub children: u32,
    /// 标量的原始文本：字符串不带引号，数字/布尔取规范形式，null 为 "null"；容器为空串
    pub value_text: String,
    /// 节点深度（用于UI缩进显示）
    pub depth: u32,
    /// 是否展开：容器控制子节点可见性，字符串叶子控制截断显示
    pub expanded: bool,
    /// 是否可见（由祖先的展开状态推导）
    pub visible: bool,
}

/// 从根 Value 构建全树影子索引，所有节点默认折叠
pub fn build_shadow_tree(root: &Value) -> Vec<JsonTreeNode> {
    let mut out = Vec::with_capacity(1024);
    fn kind_of(v: &Value) -> NodeKind {
        match v {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            Value::String(_) => NodeKind::String,
            Value::Number(_) => NodeKind::Number,
            Value::Bool(_) => NodeKind::Bool,
            Value::Null => NodeKind::Null,
        }
    }
    fn value_text_of(v: &Value) -> String {
        match v {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Object(_) | Value::Array(_) => String::new(),
        }
    }
    fn push_node(out: &mut Vec<JsonTreeNode>, name: String, path: String, v: &Value, depth: u32) {
        let children = match v {
            Value::Object(m) => m.len() as u32,
            Value::Array(a) => a.len() as u32,
            _ => 0,
        };
        out.push(JsonTreeNode {
            name,
            path,
            kind: kind_of(v),
            children,
            value_text: value_text_of(v),
            depth,
            expanded: false,
            visible: true,
        });
    }
    fn walk(out: &mut Vec<JsonTreeNode>, v: &Value, path: &str, name: &str, depth: u32) {
        push_node(out, name.to_string(), path.to_string(), v, depth);
        match v {
            Value::Object(map) => {
                for (k, child) in map {
                    // JSONPath 字段含特殊字符时使用 bracket-notation
                    let field_path = if k.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        format!("{}.{}", path, k)
                    } else {
                        format!("{}['{}']", path, k.replace('\'', "\\'"))
                    };
                    walk(out, child, &field_path, k, depth + 1);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, idx);
                    walk(out, child, &item_path, &format!("[{}]", idx), depth + 1);
                }
            }
            _ => {}
        }
    }

    walk(&mut out, root, "$", "root", 0);
    out
}

/// 标量叶子的显示文本：字符串带引号，未展开且超长时截断为前 100 个字符加省略号。
/// 截断只作用于显示，底层值不变。
pub fn leaf_display(node: &JsonTreeNode) -> String {
    match node.kind {
        NodeKind::String => {
            if !node.expanded && node.value_text.chars().count() > MAX_STRING_PREVIEW {
                let head: String = node.value_text.chars().take(MAX_STRING_PREVIEW).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", node.value_text)
            }
        }
        _ => node.value_text.clone(),
    }
}

/// 容器的头部文本：类型标签加摘要。空容器固定 "(empty)"，
/// 展开时不带摘要，折叠时显示条目数
pub fn container_display(node: &JsonTreeNode) -> String {
    let label = if node.kind == NodeKind::Array { "Array" } else { "Object" };
    if node.children == 0 {
        format!("{} (empty)", label)
    } else if node.expanded {
        label.to_string()
    } else if node.kind == NodeKind::Array {
        format!("{} ({} items)", label, node.children)
    } else {
        format!("{} ({} properties)", label, node.children)
    }
}

/// 节点的单行显示文本（不含键名前缀）
pub fn display_of(node: &JsonTreeNode) -> String {
    if node.kind.is_container() {
        container_display(node)
    } else {
        leaf_display(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_object_shadow_tree() {
        let json = json!({
            "name": "测试",
            "age": 30
        });

        let tree = build_shadow_tree(&json);

        // 应该有3个节点：根、name、age
        assert_eq!(tree.len(), 3);

        // 检查根节点
        assert_eq!(tree[0].name, "root");
        assert_eq!(tree[0].path, "$");
        assert_eq!(tree[0].kind, NodeKind::Object);
        assert_eq!(tree[0].children, 2);

        // 检查字段节点
        let names: Vec<&str> = tree.iter().skip(1).map(|n| n.name.as_str()).collect();
        assert!(names.contains(&"name"));
        assert!(names.contains(&"age"));

        let paths: Vec<&str> = tree.iter().skip(1).map(|n| n.path.as_str()).collect();
        assert!(paths.contains(&"$.name"));
        assert!(paths.contains(&"$.age"));
    }

    #[test]
    fn test_nested_object_paths() {
        let json = json!({
            "user": {
                "profile": {
                    "name": "张三"
                }
            }
        });

        let tree = build_shadow_tree(&json);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree[0].path, "$");
        assert_eq!(tree[1].path, "$.user");
        assert_eq!(tree[2].path, "$.user.profile");
        assert_eq!(tree[3].path, "$.user.profile.name");

        // 深度随嵌套递增
        assert_eq!(tree[0].depth, 0);
        assert_eq!(tree[1].depth, 1);
        assert_eq!(tree[2].depth, 2);
        assert_eq!(tree[3].depth, 3);
    }

    #[test]
    fn test_array_paths_and_names() {
        let json = json!({
            "items": [
                "第一项",
                {"id": 1},
                [1, 2, 3]
            ]
        });

        let tree = build_shadow_tree(&json);

        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert!(paths.contains(&"$.items"));
        assert!(paths.contains(&"$.items[0]"));
        assert!(paths.contains(&"$.items[1].id"));
        assert!(paths.contains(&"$.items[2][2]"));

        // 数组元素的显示名是带方括号的索引
        let item0 = tree.iter().find(|n| n.path == "$.items[0]").unwrap();
        assert_eq!(item0.name, "[0]");
        let nested = tree.iter().find(|n| n.path == "$.items[2][1]").unwrap();
        assert_eq!(nested.name, "[1]");
    }

    #[test]
    fn test_special_characters_in_keys() {
        let json = json!({
            "normal_key": "value1",
            "key with spaces": "value2",
            "key-with-dashes": "value3",
            "key.with.dots": "value4",
            "key'with'quotes": "value5"
        });

        let tree = build_shadow_tree(&json);

        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert!(paths.contains(&"$.normal_key"));
        assert!(paths.contains(&"$['key with spaces']"));
        assert!(paths.contains(&"$['key-with-dashes']"));
        assert!(paths.contains(&"$['key.with.dots']"));
        assert!(paths.contains(&"$['key\\'with\\'quotes']"));
    }

    #[test]
    fn test_leaf_and_container_counts() {
        // 3 个容器（根对象、数组、内层对象），5 个标量叶子
        let json = json!({
            "a": 1,
            "b": [true, null, {"c": "x"}],
            "d": "y"
        });

        let tree = build_shadow_tree(&json);
        let containers = tree.iter().filter(|n| n.kind.is_container()).count();
        let leaves = tree.iter().filter(|n| !n.kind.is_container()).count();

        assert_eq!(containers, 3, "容器数量应等于对象与数组的总数");
        assert_eq!(leaves, 5, "叶子数量应等于标量（含null）的总数");
        assert_eq!(tree.len(), containers + leaves);
    }

    #[test]
    fn test_scalar_display_roundtrip() {
        let json = json!({
            "s": "短文本",
            "i": 42,
            "f": 3.25,
            "neg": -7,
            "t": true,
            "n": null
        });

        let tree = build_shadow_tree(&json);
        for node in tree.iter().skip(1) {
            let shown = leaf_display(node);
            match node.name.as_str() {
                // 字符串去掉引号后应与原值完全一致
                "s" => assert_eq!(shown, "\"短文本\""),
                "i" => assert_eq!(shown, "42"),
                "f" => assert_eq!(shown, "3.25"),
                "neg" => assert_eq!(shown, "-7"),
                "t" => assert_eq!(shown, "true"),
                "n" => assert_eq!(shown, "null"),
                other => panic!("未预期的节点: {}", other),
            }
        }
    }

    #[test]
    fn test_truncation_boundary() {
        let exactly_100: String = "a".repeat(100);
        let over_100: String = "b".repeat(101);
        let json = json!({ "short": exactly_100, "long": over_100 });

        let tree = build_shadow_tree(&json);
        let short = tree.iter().find(|n| n.name == "short").unwrap();
        let long = tree.iter().find(|n| n.name == "long").unwrap();

        // 恰好 100 个字符不截断
        assert_eq!(leaf_display(short), format!("\"{}\"", "a".repeat(100)));
        // 101 个字符截断为前 100 个字符加省略号
        assert_eq!(leaf_display(long), format!("\"{}...\"", "b".repeat(100)));
        // 截断不改变底层值
        assert_eq!(long.value_text.chars().count(), 101);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        // 多字节字符按字符数而非字节数截断
        let text: String = "汉".repeat(101);
        let json = json!({ "cjk": text });

        let tree = build_shadow_tree(&json);
        let node = tree.iter().find(|n| n.name == "cjk").unwrap();
        assert_eq!(leaf_display(node), format!("\"{}...\"", "汉".repeat(100)));
    }

    #[test]
    fn test_expanded_string_leaf_not_truncated() {
        let long_text: String = "x".repeat(150);
        let json = json!({ "long": long_text });
        let mut tree = build_shadow_tree(&json);

        let node = tree.iter_mut().find(|n| n.name == "long").unwrap();
        assert!(leaf_display(node).ends_with("...\""));
        node.expanded = true;
        assert_eq!(leaf_display(node), format!("\"{}\"", "x".repeat(150)));
    }

    #[test]
    fn test_container_display_summaries() {
        let json = json!({
            "arr": [1, 2],
            "obj": {"k": 1},
            "empty_arr": [],
            "empty_obj": {}
        });

        let mut tree = build_shadow_tree(&json);

        let arr = tree.iter().find(|n| n.name == "arr").unwrap();
        assert_eq!(container_display(arr), "Array (2 items)");
        let obj = tree.iter().find(|n| n.name == "obj").unwrap();
        assert_eq!(container_display(obj), "Object (1 properties)");
        let empty_arr = tree.iter().find(|n| n.name == "empty_arr").unwrap();
        assert_eq!(container_display(empty_arr), "Array (empty)");
        let empty_obj = tree.iter().find(|n| n.name == "empty_obj").unwrap();
        assert_eq!(container_display(empty_obj), "Object (empty)");

        // 展开后不再显示条目数摘要
        let arr = tree.iter_mut().find(|n| n.name == "arr").unwrap();
        arr.expanded = true;
        assert_eq!(container_display(arr), "Array");
        // 空容器即使标记为展开也仍显示 "(empty)"
        let empty_obj = tree.iter_mut().find(|n| n.name == "empty_obj").unwrap();
        empty_obj.expanded = true;
        assert_eq!(container_display(empty_obj), "Object (empty)");
    }

    #[test]
    fn test_all_nodes_default_collapsed() {
        let json = json!({ "a": { "b": [1, 2] } });
        let tree = build_shadow_tree(&json);
        assert!(tree.iter().all(|n| !n.expanded), "构建后所有节点默认折叠");
    }
}
