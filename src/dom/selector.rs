//! Minimal CSS selector matching for mount-target lookup.
//!
//! Supports compound selectors built from `*`, a tag name, `#id`, `.class`,
//! `[attr]` and `[attr=value]`, joined by descendant combinators
//! (whitespace). Anything else fails to parse.

use super::document::DocumentData;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeTest {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeTest>,
}

/// A parsed selector: compounds from outermost to innermost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn take_ident(input: &str) -> (&str, &str) {
    let end = input.find(|c: char| !is_ident_char(c)).unwrap_or(input.len());
    input.split_at(end)
}

/// Splits on whitespace outside of `[...]`.
fn split_compounds(input: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut quote: Option<char> = None;
    let mut start: Option<usize> = None;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if depth > 0 => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.checked_sub(1)?,
            (None, c) if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    parts.push(&input[s..i]);
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if depth != 0 || quote.is_some() {
        return None;
    }
    if let Some(s) = start {
        parts.push(&input[s..]);
    }
    Some(parts)
}

fn parse_compound(mut input: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    if let Some(rest) = input.strip_prefix('*') {
        input = rest;
    } else {
        let (tag, rest) = take_ident(input);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_string());
            input = rest;
        }
    }
    while let Some(c) = input.chars().next() {
        match c {
            '#' | '.' => {
                let (name, rest) = take_ident(&input[1..]);
                if name.is_empty() {
                    return None;
                }
                if c == '#' {
                    compound.id = Some(name.to_string());
                } else {
                    compound.classes.push(name.to_string());
                }
                input = rest;
            }
            '[' => {
                let end = input.find(']')?;
                compound.attributes.push(parse_attribute(&input[1..end])?);
                input = &input[end + 1..];
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn parse_attribute(body: &str) -> Option<AttributeTest> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };
    if name.is_empty() || !name.chars().all(|c| is_ident_char(c) || c == ':') {
        return None;
    }
    Some(AttributeTest {
        name: name.to_string(),
        value,
    })
}

impl Selector {
    /// Parses `input`, returning `None` for empty or unsupported selectors.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let compounds = split_compounds(input.trim())?
            .into_iter()
            .map(parse_compound)
            .collect::<Option<Vec<_>>>()?;
        if compounds.is_empty() {
            return None;
        }
        Some(Self { compounds })
    }

    /// Returns `true` if the element at `index` matches.
    pub(super) fn matches(&self, data: &DocumentData, index: usize) -> bool {
        let Some((innermost, outer)) = self.compounds.split_last() else {
            return false;
        };
        if !compound_matches(innermost, data, index) {
            return false;
        }
        // Descendant-only chains: matching each compound against the
        // nearest qualifying ancestor is sufficient.
        let mut current = data.nodes[index].parent;
        for compound in outer.iter().rev() {
            loop {
                let Some(ancestor) = current else {
                    return false;
                };
                current = data.nodes[ancestor].parent;
                if compound_matches(compound, data, ancestor) {
                    break;
                }
            }
        }
        true
    }
}

fn compound_matches(compound: &Compound, data: &DocumentData, index: usize) -> bool {
    let Some(element) = data.nodes[index].element() else {
        return false;
    };
    if let Some(tag) = &compound.tag {
        if !element.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if element.attributes.get("id") != Some(id) {
            return false;
        }
    }
    if !compound.classes.is_empty() {
        let classes: Vec<&str> = element
            .attributes
            .get("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default();
        if !compound.classes.iter().all(|c| classes.contains(&c.as_str())) {
            return false;
        }
    }
    compound.attributes.iter().all(|test| {
        match (element.attributes.get(&test.name), &test.value) {
            (Some(actual), Some(expected)) => actual == expected,
            (Some(_), None) => true,
            (None, _) => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_forms() {
        assert!(Selector::parse("#app").is_some());
        assert!(Selector::parse("div.card.wide").is_some());
        assert!(Selector::parse("main [data-root='yes'] span").is_some());
        assert!(Selector::parse("*").is_some());
    }

    #[test]
    fn rejects_unsupported_or_malformed() {
        assert!(Selector::parse("").is_none());
        assert!(Selector::parse("div > p").is_none());
        assert!(Selector::parse("a, b").is_none());
        assert!(Selector::parse("[unterminated").is_none());
        assert!(Selector::parse("#").is_none());
    }
}
