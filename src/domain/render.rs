//! Diagnostic views of the tree structure.
//!
//! Neither view is used for persistence; they exist to show shape and heights.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::domain::tree::{AvlTree, Node};

/// How `render` lays out the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Rotated 90°: right subtree on top, depth shown as indentation.
    #[default]
    Sideways,
    /// Box-drawing outline via termtree, left child listed first.
    Ascii,
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStyle::Sideways => write!(f, "sideways"),
            RenderStyle::Ascii => write!(f, "ascii"),
        }
    }
}

impl FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sideways" => Ok(RenderStyle::Sideways),
            "ascii" => Ok(RenderStyle::Ascii),
            other => Err(format!("unknown render style '{other}'")),
        }
    }
}

fn label(node: &Node) -> String {
    format!("{} (h={})", node.contact().id, node.height())
}

/// Conversion into a termtree outline.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn outline(node: &Node, prefix: &str) -> Tree<String> {
    let leaves = [(node.left(), "L "), (node.right(), "R ")]
        .into_iter()
        .filter_map(|(child, side)| child.map(|c| outline(c, side)));
    Tree::new(format!("{prefix}{}", label(node))).with_leaves(leaves)
}

impl TreeNodeConvert for Node {
    fn to_tree_string(&self) -> Tree<String> {
        outline(self, "")
    }
}

impl TreeNodeConvert for AvlTree {
    fn to_tree_string(&self) -> Tree<String> {
        match self.root() {
            Some(root) => root.to_tree_string(),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

fn sideways(node: Option<&Node>, depth: usize, indent: usize, lines: &mut Vec<String>) {
    if let Some(n) = node {
        sideways(n.right(), depth + 1, indent, lines);
        lines.push(format!("{}{}", " ".repeat(depth * indent), label(n)));
        sideways(n.left(), depth + 1, indent, lines);
    }
}

/// Renders `tree` in the given style. `indent` is the column width per level
/// of the sideways view and is ignored by the ascii view.
pub fn render(tree: &AvlTree, style: RenderStyle, indent: usize) -> String {
    match style {
        RenderStyle::Ascii => tree.to_tree_string().to_string(),
        RenderStyle::Sideways => {
            if tree.is_empty() {
                return "Empty tree\n".to_string();
            }
            let mut lines = Vec::with_capacity(tree.len());
            sideways(tree.root(), 0, indent, &mut lines);
            let mut out = lines.join("\n");
            out.push('\n');
            out
        }
    }
}
