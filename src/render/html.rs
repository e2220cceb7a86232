use crate::render::tree::{Element, Node, VisualTree};

const VOID_ELEMENTS: &[&str] = &["img", "br", "hr", "meta", "link", "input"];

/// Class attached to print-excluded elements; hidden by the print stylesheet.
pub const NO_PRINT_CLASS: &str = "no-print";

pub const STYLESHEET: &str = r#"
*{box-sizing:border-box}
body{margin:0;font-family:"PingFang SC","Microsoft YaHei","Noto Sans CJK SC",sans-serif;color:#0f172a;background:#f8fafc}
.hero{position:relative;height:400px;background:#0f172a;overflow:hidden}
.hero-image{width:100%;height:100%;object-fit:cover;opacity:.8}
.hero-placeholder{width:100%;height:100%;display:flex;align-items:center;justify-content:center;color:rgba(255,255,255,.2);background:linear-gradient(135deg,#0c4a6e,#1e293b)}
.hero-caption{position:absolute;left:0;right:0;bottom:0;padding:2rem 3rem;color:#fff}
.reset-button{position:absolute;top:1.5rem;left:1.5rem;padding:.5rem 1rem;border:0;border-radius:999px;background:rgba(255,255,255,.15);color:#fff}
.badge{display:inline-block;padding:.25rem .75rem;border-radius:999px;background:#0ea5e9;font-size:.75rem;font-weight:700}
.content{max-width:64rem;margin:2rem auto;padding:0 1rem}
.overview{display:grid;grid-template-columns:1fr 2fr;gap:1.5rem;margin-bottom:2.5rem}
.card{background:#fff;border-radius:.75rem;padding:1.5rem;box-shadow:0 4px 12px rgba(15,23,42,.08)}
.budget-total{font-size:1.875rem;font-weight:700}
.budget-chart{width:6rem;height:6rem}
.budget-legend,.packing-list,.timeline{list-style:none;padding:0;margin:0}
.swatch{display:inline-block;width:.75rem;height:.75rem;border-radius:2px;margin-right:.5rem}
.packing-item{display:inline-block;margin:.25rem;padding:.25rem .75rem;border:1px solid #e2e8f0;border-radius:999px}
.day{margin-bottom:3rem;page-break-inside:avoid}
.day-marker{display:flex;align-items:center;gap:1rem;margin-bottom:1.5rem}
.day-badge{width:3rem;height:3rem;border-radius:.75rem;background:#0ea5e9;color:#fff;font-weight:700;display:flex;align-items:center;justify-content:center}
.activity{display:flex;margin:0 0 2rem 1.5rem;background:#fff;border-radius:1rem;overflow:hidden;box-shadow:0 2px 8px rgba(15,23,42,.08)}
.activity-image{width:12rem;flex-shrink:0;background:#e2e8f0}
.activity-image img{width:100%;height:100%;object-fit:cover}
.img-fallback{visibility:hidden}
.activity-body{padding:1.5rem;flex:1}
.activity-meta{display:flex;justify-content:space-between;color:#0284c7;font-weight:700}
.activity-location{color:#64748b;font-weight:400}
.actions{text-align:center;margin:4rem 0 5rem}
.actions button{margin:0 .5rem;padding:1rem 2rem;border:0;border-radius:999px;background:#1e293b;color:#fff;font-weight:700}
@media print{.no-print{display:none !important}body{background:#fff}.hero{height:280px}}
"#;

/// Serialize `tree` as a standalone HTML document.
pub fn to_html_document(tree: &VisualTree, title: &str, head_extra: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str("<title>");
    out.push_str(&escape_text(title));
    out.push_str("</title>\n<style>");
    out.push_str(STYLESHEET);
    out.push_str("</style>\n");
    out.push_str(head_extra);
    out.push_str("</head>\n<body>\n");
    write_element(&tree.root, &mut out);
    out.push_str("\n</body>\n</html>\n");
    out
}

pub fn to_html_fragment(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(element.tag);

    let mut classes: Vec<&str> = element.classes.iter().map(String::as_str).collect();
    if element.print_excluded {
        classes.push(NO_PRINT_CLASS);
    }
    if !classes.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&escape_attr(&classes.join(" ")));
        out.push('"');
    }

    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag) {
        return;
    }

    for child in &element.children {
        match child {
            Node::Element(child) => write_element(child, out),
            Node::Text(text) => out.push_str(&escape_text(text)),
        }
    }

    out.push_str("</");
    out.push_str(element.tag);
    out.push('>');
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
