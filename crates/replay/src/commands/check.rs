//! Validate a rotation (and optionally a runtime config) without running it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use behavior_tree::Node;
use runtime::{RotationSpec, TickContext, load_config};

/// Validate a rotation file and print its compiled tree
#[derive(Parser)]
pub struct Check {
    /// Rotation file (RON)
    #[arg(value_name = "ROTATION")]
    rotation: PathBuf,

    /// Runtime config file to validate alongside
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only validate; do not print the tree
    #[arg(short, long)]
    quiet: bool,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let spec = RotationSpec::load(&self.rotation)
            .with_context(|| format!("Failed to load rotation: {}", self.rotation.display()))?;
        if let Some(path) = &self.config {
            load_config(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            println!("{} {}", style("Config OK:").bold().green(), path.display());
        }

        let tree = spec.build();
        println!(
            "{} {} ({} entries, {} nodes, depth {})",
            style("Rotation OK:").bold().green(),
            spec.name,
            spec.len(),
            tree.node_count(),
            tree.depth()
        );

        if !self.quiet {
            println!();
            let mut lines = Vec::new();
            outline(&tree, 0, &mut lines);
            for line in lines {
                println!("{line}");
            }
        }
        Ok(())
    }
}

fn outline(node: &Node<TickContext>, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let kind = format!("{:?}", node.kind());
    lines.push(format!("{indent}{} {}", style(kind).dim(), node.label()));

    match node {
        Node::Action { .. } => {}
        Node::Selector { children, .. } | Node::Sequence { children, .. } => {
            for child in children {
                outline(child, depth + 1, lines);
            }
        }
        Node::Decorator {
            child, else_branch, ..
        } => {
            outline(child, depth + 1, lines);
            if let Some(otherwise) = else_branch {
                lines.push(format!("{indent}  {}", style("else").dim()));
                outline(otherwise, depth + 1, lines);
            }
        }
    }
}
