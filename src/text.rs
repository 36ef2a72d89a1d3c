//! Draft text extraction from a surface element.

use crate::page::NodeRef;

/// Read the current draft text of a surface.
///
/// Policy, in priority order: an element that declares itself editable
/// yields its rendered inner text; otherwise a form field yields its value;
/// otherwise the plain text content. An absent element yields the empty
/// string. Never fails; downstream treats the empty string as "nothing to
/// analyze".
pub fn read_text(surface: Option<&NodeRef>) -> String {
    let Some(node) = surface else {
        return String::new();
    };
    if node.attr("contenteditable").as_deref() == Some("true") {
        return node.inner_text();
    }
    if let Some(value) = node.value() {
        return value;
    }
    node.text_content()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageTree;

    #[test]
    fn editable_region_yields_inner_text() {
        let (tree, _rx) = PageTree::new();
        let node = tree.create_element("div");
        node.set_attr("contenteditable", "true");
        node.set_text("draft ");
        let child = tree.create_element("span");
        child.set_text("text");
        tree.append_child(&node, &child);
        // A stale value must not shadow the rendered text
        node.set_value("ignored");

        assert_eq!(read_text(Some(&node)), "draft text");
    }

    #[test]
    fn form_field_yields_value() {
        let (tree, _rx) = PageTree::new();
        let node = tree.create_element("textarea");
        node.set_value("typed value");
        node.set_text("placeholder");

        assert_eq!(read_text(Some(&node)), "typed value");
    }

    #[test]
    fn plain_node_yields_text_content() {
        let (tree, _rx) = PageTree::new();
        let node = tree.create_element("div");
        node.set_text("plain");

        assert_eq!(read_text(Some(&node)), "plain");
    }

    #[test]
    fn absent_surface_yields_empty() {
        assert_eq!(read_text(None), "");
    }
}
