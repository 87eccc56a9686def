//! Demo content loaded at startup unless `seed = off`.

use rand::seq::SliceRandom;

use crate::kanban::{Card, Column, ColumnId};
use crate::node::TreeNode;

pub const PALETTE: [&str; 5] = ["#f39c12", "#e74c3c", "#2ecc71", "#3498db", "#9b59b6"];

pub fn random_color() -> String {
    PALETTE
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(PALETTE[0])
        .to_string()
}

pub fn initial_forest() -> Vec<TreeNode> {
    vec![
        TreeNode::branch(
            "Level A",
            vec![
                TreeNode::branch(
                    "Level A",
                    vec![TreeNode::branch("Level A", vec![TreeNode::lazy("Level A")])],
                ),
                TreeNode::lazy("Level A"),
                TreeNode::leaf("Level A"),
            ],
        ),
        TreeNode::lazy("Level A"),
    ]
}

pub fn initial_columns() -> Vec<Column> {
    let column = |id: &str, title: &str, color: &str, cards: &[(&str, &str)]| Column {
        id: ColumnId::new(id),
        title: title.to_string(),
        color: color.to_string(),
        cards: cards
            .iter()
            .map(|(title, color)| Card::new(*title, *color))
            .collect(),
    };

    vec![
        column(
            "todo",
            "Todo",
            "#3498db",
            &[
                ("Create initial project plan", "#f39c12"),
                ("Design landing page", "#e74c3c"),
                ("Review codebase structure", "#2ecc71"),
            ],
        ),
        column(
            "in-progress",
            "In Progress",
            "#f39c12",
            &[
                ("Implement authentication", "#e74c3c"),
                ("Set up database schema", "#f39c12"),
                ("Fix navbar bugs", "#2ecc71"),
            ],
        ),
        column(
            "done",
            "Done",
            "#2ecc71",
            &[
                ("Organize project repository", "#3498db"),
                ("Write API documentation", "#2ecc71"),
            ],
        ),
    ]
}
