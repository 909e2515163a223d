//! Tree rendering utilities for bone hierarchies

use console::Style;
use skelmix_pose::Hierarchy;

/// Represents a node in a tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub children: Vec<TreeNode>,
    pub metadata: Vec<(String, String)>,
}

/// Types of nodes in the tree
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    Root,
    Bone,
    Leaf,
}

/// Options for tree rendering
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(name: String, node_type: NodeType) -> Self {
        Self {
            name,
            node_type,
            children: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }
}

impl NodeType {
    /// Get emoji icon for node type
    pub fn icon(&self) -> &'static str {
        match self {
            NodeType::Root => "🦴",
            NodeType::Bone => "●",
            NodeType::Leaf => "○",
        }
    }

    /// Get color style for node type
    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                NodeType::Root => Style::new().bold().cyan(),
                NodeType::Bone => Style::new().green(),
                NodeType::Leaf => Style::new().dim(),
            }
        }
    }
}

/// Build a tree of every bone under a synthetic skeleton node
pub fn bone_tree(hierarchy: &Hierarchy, title: &str, show_indices: bool) -> TreeNode {
    fn build(hierarchy: &Hierarchy, index: usize, show_indices: bool) -> TreeNode {
        let children: Vec<usize> = hierarchy.children(index).collect();
        let node_type = if children.is_empty() {
            NodeType::Leaf
        } else {
            NodeType::Bone
        };
        let name = hierarchy
            .bone(index)
            .map_or_else(|| format!("bone {index}"), |b| b.name.clone());

        let mut node = TreeNode::new(name, node_type);
        if show_indices {
            node = node.with_metadata("index", &index.to_string());
        }
        for child in children {
            node = node.add_child(build(hierarchy, child, show_indices));
        }
        node
    }

    let mut root = TreeNode::new(title.to_string(), NodeType::Root)
        .with_metadata("bones", &hierarchy.len().to_string());
    for index in hierarchy.roots() {
        root = root.add_child(build(hierarchy, index, show_indices));
    }
    root
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

/// Render a single node and its children
///
/// Metadata is printed inline after the name as `[key:value, ...]`.
fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if options.max_depth.is_some_and(|max| depth > max) {
        return;
    }

    let connector = match (depth, is_last) {
        (0, _) => "",
        (_, true) => "└── ",
        (_, false) => "├── ",
    };
    let style = node.node_type.style(options.no_color);
    output.push_str(&format!(
        "{prefix}{connector}{} {}",
        node.node_type.icon(),
        style.apply_to(&node.name)
    ));

    if !node.metadata.is_empty() {
        let parts: Vec<String> = node
            .metadata
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect();
        output.push_str(&format!(" [{}]", parts.join(", ")));
    }
    output.push('\n');

    let child_prefix = match (depth, is_last) {
        (0, _) => String::new(),
        (_, true) => format!("{prefix}    "),
        (_, false) => format!("{prefix}│   "),
    };
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        render_node(child, output, &child_prefix, i == last, depth + 1, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skelmix_pose::BoneInfo;

    fn hierarchy() -> Hierarchy {
        Hierarchy::new(vec![
            BoneInfo::new("Hips", -1),
            BoneInfo::new("Spine", 0),
            BoneInfo::new("Head", 1),
            BoneInfo::new("Leg", 0),
        ])
        .unwrap()
    }

    #[test]
    fn test_bone_tree_structure() {
        let tree = bone_tree(&hierarchy(), "rig", false);
        assert_eq!(tree.children.len(), 1);
        let hips = &tree.children[0];
        assert_eq!(hips.name, "Hips");
        assert_eq!(hips.node_type, NodeType::Bone);
        assert_eq!(hips.children.len(), 2);
        assert_eq!(hips.children[1].node_type, NodeType::Leaf);
    }

    #[test]
    fn test_render_plain() {
        let options = TreeOptions {
            no_color: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&bone_tree(&hierarchy(), "rig", true), &options);
        assert!(output.contains("└── ● Hips [index:0]"));
        assert!(output.contains("    ├── ● Spine [index:1]"));
        assert!(output.contains("    │   └── ○ Head [index:2]"));
    }

    #[test]
    fn test_render_max_depth() {
        let options = TreeOptions {
            no_color: true,
            max_depth: Some(1),
            ..TreeOptions::default()
        };
        let output = render_tree(&bone_tree(&hierarchy(), "rig", false), &options);
        assert!(output.contains("Hips"));
        assert!(!output.contains("Spine"));
    }

    #[test]
    fn test_render_root_metadata_inline() {
        let options = TreeOptions {
            no_color: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&bone_tree(&hierarchy(), "rig", false), &options);
        assert!(output.starts_with("🦴 rig [bones:4]\n"));
        assert!(output.ends_with("    └── ○ Leg\n"));
    }
}
