use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::{MutableGraph, NodeKind};
use crate::fragment::FragmentManager;

use super::projection::visible_rows;

/// Plain-text rendering of the decorated graph, one line per visible row.
pub struct GraphRenderer {
    message_width: usize,
}

impl GraphRenderer {
    pub fn new(message_width: usize) -> Self {
        Self { message_width }
    }

    pub fn render(&self, graph: &MutableGraph, manager: &FragmentManager) -> String {
        let mut out = String::new();
        for row in visible_rows(graph, manager.decorator()) {
            let node = graph.node(row.node);
            match (&node.kind, &node.commit) {
                (NodeKind::Commit, Some(info)) => {
                    out.push_str(&format!(
                        "* {:.7} {}\n",
                        info.id,
                        self.truncate(&info.message)
                    ));
                }
                _ => out.push_str("~ (history not loaded)\n"),
            }
            if let Some(edge) = row.collapse_below {
                let folded = manager
                    .collapsed_fragment(edge)
                    .map(|fragment| fragment.len())
                    .unwrap_or(0);
                out.push_str(&format!("⊕ {folded} commits folded\n"));
            }
        }
        out
    }

    /// Fit `text` into the configured column, ellipsizing on overflow.
    fn truncate(&self, text: &str) -> String {
        if UnicodeWidthStr::width(text) <= self.message_width {
            return text.to_string();
        }
        let mut out = String::new();
        let mut width = 0;
        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if width + w > self.message_width.saturating_sub(1) {
                break;
            }
            out.push(ch);
            width += w;
        }
        out.push('…');
        out
    }
}
