//! Role-scoped extraction from web chat HTML exports.
//!
//! Messages in these exports are wrapped in elements carrying
//! `data-message-author-role="<role>"`. Markers can nest (a message wrapper
//! contains an inner element with the same marker), so matching is tracked
//! with an explicit frame stack: a frame is active when its element carries
//! the wanted role or when any enclosing frame is already active. A block is
//! finished when the outermost active frame closes.
//!
//! Matching runs on the tree html5ever builds, so text that HTML5 tree
//! construction moves out of a role element (a `<div>` inside a `<p>`, for
//! example) is not collected.

use scraper::{Html, Node};
use tracing::trace;

use crate::text::normalize_newlines;

/// Attribute carrying the message author in web chat exports.
pub const ROLE_ATTRIBUTE: &str = "data-message-author-role";

/// Parser-independent role tracking state.
///
/// Feed it element open/close events and character data in document order.
#[derive(Debug, Default)]
pub struct RoleScope {
    frames: Vec<bool>,
    active: usize,
    current: Vec<String>,
    blocks: Vec<String>,
}

impl RoleScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// An element opened; `marked` is whether it carries the wanted role.
    pub fn open(&mut self, marked: bool) {
        let in_role = marked || self.active > 0;
        if in_role {
            self.active += 1;
        }
        self.frames.push(in_role);
    }

    /// An element closed. A close with no open frame is ignored.
    pub fn close(&mut self) {
        let Some(in_role) = self.frames.pop() else {
            return;
        };
        if !in_role {
            return;
        }
        self.active -= 1;
        if self.active == 0 {
            self.flush();
        }
    }

    /// Character data (entities already resolved).
    pub fn text(&mut self, data: &str) {
        if self.active > 0 {
            self.current.push(data.to_owned());
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn in_role(&self) -> bool {
        self.active > 0
    }

    /// Finished blocks in document order.
    pub fn finish(self) -> Vec<String> {
        self.blocks
    }

    fn flush(&mut self) {
        let joined = self.current.concat();
        self.current.clear();
        let text = normalize_newlines(&joined);
        let text = text.trim();
        if !text.is_empty() {
            trace!(chars = text.len(), "role block finished");
            self.blocks.push(text.to_owned());
        }
    }
}

enum Step<N> {
    Enter(N),
    Leave,
}

/// Extract the text of every top-level element whose role attribute equals
/// `role`, in document order.
pub fn extract_role_blocks(html: &str, role: &str) -> Vec<String> {
    extract_role_blocks_with(html, ROLE_ATTRIBUTE, role)
}

/// Same as [`extract_role_blocks`] with a custom marker attribute.
pub fn extract_role_blocks_with(html: &str, attribute: &str, role: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut scope = RoleScope::new();

    let mut pending = vec![Step::Enter(document.tree.root())];
    while let Some(step) = pending.pop() {
        let node = match step {
            Step::Leave => {
                scope.close();
                continue;
            }
            Step::Enter(node) => node,
        };

        match node.value() {
            Node::Element(element) => {
                scope.open(element.attr(attribute) == Some(role));
                pending.push(Step::Leave);
            }
            Node::Text(text) => {
                scope.text(text);
                continue;
            }
            _ => {}
        }

        for child in node.children().rev() {
            pending.push(Step::Enter(child));
        }
    }

    scope.finish()
}

/// Flatten markup to its character data in document order. Tags, attributes
/// and comments are dropped; entity references arrive resolved.
pub fn plain_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();
    for node in document.tree.root().descendants() {
        if let Node::Text(text) = node.value() {
            out.push_str(text);
        }
    }
    out
}
