//! Lenient markup fragment parser.
//!
//! Parses the pre-rendered markup produced by the template compiler into a
//! small tree. Like a browser it never fails: stray end tags are dropped,
//! unclosed elements are closed at the end of input, and anything that does
//! not look like a tag is text.
//!
//! Elements inside `<svg>` land in the SVG namespace (and keep their tag and
//! attribute case); `<foreignObject>` switches its content back to HTML.

use super::document::Namespace;
use crate::shared::is_void_tag;

/// One parsed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element {
        tag: String,
        namespace: Namespace,
        attributes: Vec<(String, String)>,
        children: Vec<MarkupNode>,
    },
    Text(String),
    Comment(String),
}

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_TAGS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Parses `markup` in an HTML context.
#[must_use]
pub fn parse(markup: &str) -> Vec<MarkupNode> {
    Parser {
        src: markup,
        pos: 0,
        stack: Vec::new(),
        roots: Vec::new(),
    }
    .run()
}

struct OpenElement {
    tag: String,
    namespace: Namespace,
    attributes: Vec<(String, String)>,
    children: Vec<MarkupNode>,
}

impl OpenElement {
    fn close(self) -> MarkupNode {
        MarkupNode::Element {
            tag: self.tag,
            namespace: self.namespace,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    stack: Vec<OpenElement>,
    roots: Vec<MarkupNode>,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | ':' | '_' | '.')
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn run(mut self) -> Vec<MarkupNode> {
        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.comment();
            } else if rest.starts_with("</") {
                self.end_tag();
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past('>');
            } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                self.start_tag();
            } else {
                self.text();
            }
        }
        while let Some(open) = self.stack.pop() {
            self.push(open.close());
        }
        self.roots
    }

    fn push(&mut self, node: MarkupNode) {
        let siblings = match self.stack.last_mut() {
            Some(open) => &mut open.children,
            None => &mut self.roots,
        };
        if let (MarkupNode::Text(text), Some(MarkupNode::Text(previous))) = (&node, siblings.last_mut()) {
            previous.push_str(text);
            return;
        }
        siblings.push(node);
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn skip_past(&mut self, terminator: char) {
        self.pos = self
            .rest()
            .find(terminator)
            .map_or(self.src.len(), |i| self.pos + i + terminator.len_utf8());
    }

    fn read_name(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn text(&mut self) {
        let rest = self.rest();
        // A lone `<` that starts nothing is text too.
        let skip = usize::from(rest.starts_with('<'));
        let end = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
        self.pos += end;
        self.push(MarkupNode::Text(decode_entities(&rest[..end])));
    }

    fn comment(&mut self) {
        let body = &self.rest()[4..];
        match body.find("-->") {
            Some(end) => {
                self.pos += 4 + end + 3;
                self.push(MarkupNode::Comment(body[..end].to_string()));
            }
            None => {
                self.pos = self.src.len();
                self.push(MarkupNode::Comment(body.to_string()));
            }
        }
    }

    fn current_namespace(&self) -> Namespace {
        match self.stack.last() {
            Some(open) if open.namespace == Namespace::Svg && open.tag == "foreignObject" => {
                Namespace::Html
            }
            Some(open) => open.namespace,
            None => Namespace::Html,
        }
    }

    fn end_tag(&mut self) {
        self.pos += 2;
        let name = self.read_name().to_string();
        self.skip_past('>');
        if name.is_empty() {
            return;
        }
        let Some(depth) = self
            .stack
            .iter()
            .rposition(|open| open.tag.eq_ignore_ascii_case(&name))
        else {
            return;
        };
        while self.stack.len() > depth {
            if let Some(open) = self.stack.pop() {
                self.push(open.close());
            }
        }
    }

    fn start_tag(&mut self) {
        self.pos += 1;
        let raw_name = self.read_name();
        let namespace = if raw_name.eq_ignore_ascii_case("svg") {
            Namespace::Svg
        } else {
            self.current_namespace()
        };
        let tag = match namespace {
            Namespace::Html => raw_name.to_ascii_lowercase(),
            Namespace::Svg => raw_name.to_string(),
        };

        let mut attributes: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            let Some((name, value)) = self.attribute() else {
                continue;
            };
            let name = match namespace {
                Namespace::Html => name.to_ascii_lowercase(),
                Namespace::Svg => name,
            };
            if !attributes.iter().any(|(existing, _)| *existing == name) {
                attributes.push((name, value));
            }
        }

        let open = OpenElement {
            tag,
            namespace,
            attributes,
            children: Vec::new(),
        };

        if namespace == Namespace::Html && RAW_TEXT_TAGS.contains(&open.tag.as_str()) && !self_closing {
            self.raw_text(open);
        } else if self_closing || (namespace == Namespace::Html && is_void_tag(&open.tag)) {
            self.push(open.close());
        } else {
            self.stack.push(open);
        }
    }

    fn attribute(&mut self) -> Option<(String, String)> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
            .unwrap_or(rest.len());
        if end == 0 {
            // Unparsable character: drop it and keep going.
            let skip = rest.chars().next().map_or(1, char::len_utf8);
            self.pos += skip;
            return None;
        }
        let name = rest[..end].to_string();
        self.pos += end;

        self.skip_whitespace();
        if !self.rest().starts_with('=') {
            return Some((name, String::new()));
        }
        self.pos += 1;
        self.skip_whitespace();

        let rest = self.rest();
        let value = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                let end = body.find(quote).unwrap_or(body.len());
                self.pos += 1 + end + usize::from(end < body.len());
                &body[..end]
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                &rest[..end]
            }
        };
        Some((name, decode_entities(value)))
    }

    fn raw_text(&mut self, mut open: OpenElement) {
        let rest = self.rest();
        let closing = format!("</{}", open.tag);
        let end = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());
        let body = &rest[..end];
        if !body.is_empty() {
            let text = if matches!(open.tag.as_str(), "script" | "style") {
                body.to_string()
            } else {
                decode_entities(body)
            };
            open.children.push(MarkupNode::Text(text));
        }
        self.pos += end;
        if self.pos < self.src.len() {
            self.skip_past('>');
        }
        self.push(open.close());
    }
}

/// Decodes the character references the compiler emits.
///
/// Unknown references are kept verbatim.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(node: &MarkupNode) -> (&str, Namespace, &[(String, String)], &[MarkupNode]) {
        match node {
            MarkupNode::Element {
                tag,
                namespace,
                attributes,
                children,
            } => (tag, *namespace, attributes, children),
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn parses_nested_elements_and_text() {
        let nodes = parse(r#"<div class="a" id=main><span>hi</span> there</div><p>x"#);
        assert_eq!(nodes.len(), 2);

        let (tag, ns, attrs, children) = element(&nodes[0]);
        assert_eq!(tag, "div");
        assert_eq!(ns, Namespace::Html);
        assert_eq!(
            attrs,
            &[
                ("class".to_string(), "a".to_string()),
                ("id".to_string(), "main".to_string())
            ]
        );
        assert_eq!(children.len(), 2);
        assert_eq!(children[1], MarkupNode::Text(" there".to_string()));

        let (tag, _, _, children) = element(&nodes[1]);
        assert_eq!(tag, "p");
        assert_eq!(children, &[MarkupNode::Text("x".to_string())]);
    }

    #[test]
    fn void_and_self_closing_elements_have_no_children() {
        let nodes = parse("<br><input disabled/><b>x</b>");
        assert_eq!(nodes.len(), 3);
        let (_, _, attrs, children) = element(&nodes[1]);
        assert!(children.is_empty());
        assert_eq!(attrs, &[("disabled".to_string(), String::new())]);
    }

    #[test]
    fn svg_subtree_keeps_case_and_namespace() {
        let nodes = parse(r#"<svg viewBox="0 0 1 1"><clipPath/><foreignObject><div></div></foreignObject></svg>"#);
        let (_, ns, attrs, children) = element(&nodes[0]);
        assert_eq!(ns, Namespace::Svg);
        assert_eq!(attrs[0].0, "viewBox");
        let (tag, ns, _, _) = element(&children[0]);
        assert_eq!((tag, ns), ("clipPath", Namespace::Svg));
        let (_, _, _, inner) = element(&children[1]);
        let (tag, ns, _, _) = element(&inner[0]);
        assert_eq!((tag, ns), ("div", Namespace::Html));
    }

    #[test]
    fn comments_stray_end_tags_and_lone_brackets() {
        let nodes = parse("a < b</i><!-- note -->");
        assert_eq!(
            nodes,
            vec![
                MarkupNode::Text("a < b".to_string()),
                MarkupNode::Comment(" note ".to_string()),
            ]
        );
    }

    #[test]
    fn raw_text_elements_are_not_parsed() {
        let nodes = parse("<script>if (a < b) { x() }</script>");
        let (_, _, _, children) = element(&nodes[0]);
        assert_eq!(children, &[MarkupNode::Text("if (a < b) { x() }".to_string())]);
    }

    #[test]
    fn entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt; &#65;&#x42;"), "a & b <c> AB");
        assert_eq!(decode_entities("fish & chips &bogus;"), "fish & chips &bogus;");
    }
}
