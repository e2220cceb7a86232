/// A node of the rendered document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub classes: Vec<String>,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
    /// Interactive-only content (buttons, badges) left out of print and PDF output.
    pub print_excluded: bool,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
            print_excluded: false,
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn no_print(mut self) -> Self {
        self.print_excluded = true;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    fn without_excluded(&self) -> Element {
        Element {
            tag: self.tag,
            classes: self.classes.clone(),
            attrs: self.attrs.clone(),
            print_excluded: false,
            children: self
                .children
                .iter()
                .filter_map(|child| match child {
                    Node::Element(element) if element.print_excluded => None,
                    Node::Element(element) => Some(Node::Element(element.without_excluded())),
                    Node::Text(text) => Some(Node::Text(text.clone())),
                })
                .collect(),
        }
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(element, out),
        }
    }
}

fn walk<'a>(element: &'a Element, visit: &mut dyn FnMut(&'a Element)) {
    visit(element);
    for child in &element.children {
        if let Node::Element(child) = child {
            walk(child, visit);
        }
    }
}

/// Output of the renderer; input to print and PDF export.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualTree {
    pub root: Element,
}

impl VisualTree {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Copy with every print-excluded subtree removed.
    pub fn printable(&self) -> VisualTree {
        VisualTree {
            root: self.root.without_excluded(),
        }
    }

    /// Elements carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        walk(&self.root, &mut |element| {
            if element.has_class(class) {
                found.push(element);
            }
        });
        found
    }

    pub fn count_print_excluded(&self) -> usize {
        let mut count = 0;
        walk(&self.root, &mut |element| {
            if element.print_excluded {
                count += 1;
            }
        });
        count
    }

    pub fn text_content(&self) -> String {
        self.root.text_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VisualTree {
        VisualTree::new(
            Element::new("div")
                .class("page")
                .child(Element::new("h1").text("Title"))
                .child(Element::new("button").class("reset").text("Back").no_print())
                .child(
                    Element::new("p")
                        .text("Body ")
                        .child(Element::new("span").class("badge").text("new").no_print()),
                ),
        )
    }

    #[test]
    fn test_printable_drops_excluded_subtrees() {
        let tree = sample();
        assert_eq!(tree.count_print_excluded(), 2);

        let printable = tree.printable();
        assert_eq!(printable.count_print_excluded(), 0);
        assert!(printable.find_by_class("reset").is_empty());
        assert!(printable.find_by_class("badge").is_empty());
        assert_eq!(printable.text_content(), "TitleBody ");
    }

    #[test]
    fn test_printable_leaves_original_untouched() {
        let tree = sample();
        let _ = tree.printable();
        assert_eq!(tree.text_content(), "TitleBackBody new");
    }
}
