//! ProseMirror to Markdown rendering
//!
//! Notes are stored as ProseMirror JSON documents. This renders the node
//! types the editor produces; unknown nodes contribute their children.

use crate::types::JsonValue;

/// Render a ProseMirror document as Markdown
pub fn prosemirror_to_markdown(doc: &JsonValue) -> String {
    render(doc, 0, None).trim().to_string()
}

fn render(node: &JsonValue, depth: usize, order: Option<usize>) -> String {
    let node_type = str_field(node, "type");
    let text = str_field(node, "text");

    if node_type == "text" || !text.is_empty() {
        return apply_marks(text, node.get("marks"));
    }

    match node_type {
        "paragraph" => {
            let content = render_children(node, depth);
            if content.is_empty() {
                content
            } else {
                content + "\n"
            }
        }
        "heading" => {
            let level = attr(node, "level")
                .and_then(JsonValue::as_u64)
                .unwrap_or(1)
                .clamp(1, 6) as usize;
            format!("{} {}\n", "#".repeat(level), render_children(node, depth))
        }
        "bulletList" => children(node)
            .iter()
            .map(|item| render(item, depth, None))
            .collect(),
        "orderedList" => children(node)
            .iter()
            .enumerate()
            .map(|(i, item)| render(item, depth, Some(i + 1)))
            .collect(),
        "listItem" => {
            let prefix = match order {
                Some(n) => format!("{n}. "),
                None => "- ".to_string(),
            };
            let content = render_children(node, depth + 1);
            format!("{}{}{}\n", "  ".repeat(depth), prefix, content.trim())
        }
        "codeBlock" => {
            let language = attr(node, "language")
                .and_then(JsonValue::as_str)
                .unwrap_or_default();
            format!("```{language}\n{}\n```\n", render_children(node, depth))
        }
        "blockquote" => {
            let content = render_children(node, depth);
            let quoted: Vec<String> = content
                .trim()
                .split('\n')
                .map(|line| format!("> {line}"))
                .collect();
            quoted.join("\n") + "\n"
        }
        "horizontalRule" => "---\n".to_string(),
        "hardBreak" => "  \n".to_string(),
        // doc and anything unrecognised
        _ => render_children(node, depth),
    }
}

fn apply_marks(text: &str, marks: Option<&JsonValue>) -> String {
    let Some(marks) = marks.and_then(JsonValue::as_array) else {
        return text.to_string();
    };

    marks.iter().fold(text.to_string(), |acc, mark| {
        match str_field(mark, "type") {
            "bold" => format!("**{acc}**"),
            "italic" => format!("*{acc}*"),
            "code" => format!("`{acc}`"),
            "strike" => format!("~~{acc}~~"),
            "link" => {
                let href = attr(mark, "href")
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default();
                format!("[{acc}]({href})")
            }
            _ => acc,
        }
    })
}

fn render_children(node: &JsonValue, depth: usize) -> String {
    children(node)
        .iter()
        .map(|child| render(child, depth, None))
        .collect()
}

fn children(node: &JsonValue) -> &[JsonValue] {
    node.get("content")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn attr<'a>(node: &'a JsonValue, name: &str) -> Option<&'a JsonValue> {
    node.get("attrs")?.get(name)
}

fn str_field<'a>(node: &'a JsonValue, name: &str) -> &'a str {
    node.get(name).and_then(JsonValue::as_str).unwrap_or_default()
}
