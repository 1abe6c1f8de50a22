use hostkit::dom::{Document, DomOps, Namespace, NodeId, NodeType};
use hostkit::domain::Data;
use hostkit::{HostOps, HostkitError};
use serde_json::json;

fn setup() -> (Document, DomOps) {
    let doc = Document::new();
    let ops = DomOps::new(doc.clone());
    (doc, ops)
}

fn tags(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| doc.tag_name(*n).unwrap_or_else(|| doc.text_content(*n)))
        .collect()
}

#[test]
fn insert_and_remove() {
    let (doc, ops) = setup();
    let parent = ops.create_element("ul", false, None, None);
    let a = ops.create_element("li", false, None, None);
    let b = ops.create_element("li", false, None, None);
    let c = ops.create_text("tail");

    ops.insert(&a, &parent, None);
    ops.insert(&c, &parent, None);
    ops.insert(&b, &parent, Some(&c));
    assert_eq!(doc.children(parent), vec![a, b, c]);
    assert_eq!(ops.parent_node(&b), Some(parent));
    assert_eq!(ops.next_sibling(&a), Some(b));
    assert_eq!(ops.next_sibling(&c), None);

    ops.remove(&b);
    assert_eq!(doc.children(parent), vec![a, c]);
    assert_eq!(ops.parent_node(&b), None);

    // Removing a detached node is a no-op.
    ops.remove(&b);
    assert_eq!(doc.children(parent), vec![a, c]);
}

#[test]
fn elements_land_in_requested_namespace() {
    let (doc, ops) = setup();
    let circle = ops.create_element("circle", true, None, None);
    let button = ops.create_element("button", false, Some("fancy-button"), None);

    assert_eq!(doc.namespace(circle), Some(Namespace::Svg));
    assert_eq!(doc.namespace(button), Some(Namespace::Html));
    assert_eq!(doc.is_token(button).as_deref(), Some("fancy-button"));
    assert_eq!(doc.outer_html(button), r#"<button is="fancy-button"></button>"#);
}

#[test]
fn select_multiple_hint_applies_at_creation() {
    let (doc, ops) = setup();
    let mut props = Data::new();
    props.insert("multiple".into(), json!(true));

    let multi = ops.create_element("select", false, None, Some(&props));
    let single = ops.create_element("select", false, None, None);
    let div = ops.create_element("div", false, None, Some(&props));

    assert!(doc.attribute(multi, "multiple").is_some());
    assert!(doc.attribute(single, "multiple").is_none());
    assert!(doc.attribute(div, "multiple").is_none());
}

#[test]
fn text_operations() {
    let (doc, ops) = setup();
    let text = ops.create_text("a");
    let comment = ops.create_comment("c");
    let el = ops.create_element("p", false, None, None);
    ops.insert(&text, &el, None);

    ops.set_text(&text, "b");
    ops.set_text(&comment, "d");
    assert_eq!(doc.node_value(text).as_deref(), Some("b"));
    assert_eq!(doc.node_value(comment).as_deref(), Some("d"));
    assert_eq!(doc.node_type(comment), Some(NodeType::Comment));

    ops.set_element_text(&el, "<b>plain</b>");
    assert_eq!(doc.children(el).len(), 1);
    assert_eq!(doc.inner_html(el), "&lt;b&gt;plain&lt;/b&gt;");
}

#[test]
fn query_and_scope_id() {
    let (doc, ops) = setup();
    let host = ops.create_element("section", false, None, None);
    doc.set_attribute(host, "class", "panel main");
    ops.insert(&host, &doc.body(), None);
    let inner = ops.create_element("span", false, None, None);
    doc.set_attribute(inner, "data-role", "title");
    ops.insert(&inner, &host, None);

    assert_eq!(ops.query_selector("section.panel"), Some(host));
    assert_eq!(ops.query_selector(".main [data-role=title]"), Some(inner));
    assert_eq!(ops.query_selector("#nowhere"), None);

    ops.set_scope_id(&inner, "data-v-7ba5bd90");
    assert_eq!(doc.attribute(inner, "data-v-7ba5bd90").as_deref(), Some(""));
}

#[test]
fn clone_node_keeps_value_property() {
    let (doc, ops) = setup();
    let input = ops.create_element("input", false, None, None);
    doc.set_attribute(input, "type", "checkbox");
    doc.set_property(input, "_value", json!({ "id": 7 }));

    let copy = ops.clone_node(&input);
    assert_ne!(copy, input);
    assert_eq!(doc.property(copy, "_value"), Some(json!({ "id": 7 })));
    assert_eq!(doc.attribute(copy, "type").as_deref(), Some("checkbox"));
    assert_eq!(ops.parent_node(&copy), None);
}

#[test]
fn static_content_parses_and_reports_bounds() {
    let (doc, ops) = setup();
    let parent = doc.body();
    let anchor = ops.create_comment("anchor");
    ops.insert(&anchor, &parent, None);

    let (first, last) = ops
        .insert_static_content("<p>one</p><p>two</p>", &parent, Some(&anchor), false, None)
        .expect("inserted block");
    assert_eq!(doc.markup_parses(), 1);
    assert_eq!(doc.inner_html(parent), "<p>one</p><p>two</p><!--anchor-->");
    assert_eq!(doc.text_content(first), "one");
    assert_eq!(doc.text_content(last), "two");
    assert_eq!(ops.next_sibling(&last), Some(anchor));
}

#[test]
fn static_content_cached_block_is_cloned_without_parsing() {
    let (doc, ops) = setup();
    let source = ops.create_element("div", false, None, None);
    let target = ops.create_element("div", false, None, None);
    let markup = r#"<h1 class="t">Title</h1><p>Body <em>text</em></p>"#;

    let (first, last) = ops
        .insert_static_content(markup, &source, None, false, None)
        .expect("first insertion");
    assert_eq!(doc.markup_parses(), 1);

    let (copy_first, copy_last) = ops
        .insert_static_content(markup, &target, None, false, Some((&first, &last)))
        .expect("cached insertion");

    assert_eq!(doc.markup_parses(), 1);
    assert_eq!(doc.inner_html(target), doc.inner_html(source));
    assert_ne!(copy_first, first);
    assert_ne!(copy_last, last);
    assert_eq!(tags(&doc, &doc.children(target)), vec!["h1", "p"]);
    // The source block is untouched.
    assert_eq!(doc.children(source), vec![first, last]);
}

#[test]
fn static_content_single_node_cache() {
    let (doc, ops) = setup();
    let parent = ops.create_element("div", false, None, None);
    let (first, last) = ops
        .insert_static_content("<hr>", &parent, None, false, None)
        .expect("inserted");
    assert_eq!(first, last);

    let again = ops.insert_static_content("<hr>", &parent, None, false, Some((&first, &last)));
    assert_eq!(doc.markup_parses(), 1);
    assert_eq!(doc.inner_html(parent), "<hr><hr>");
    assert!(again.is_some_and(|(f, l)| f == l && f != first));
}

#[test]
fn static_content_stale_cache_reparses() {
    let (doc, ops) = setup();
    let markup = "<p>a</p><p>b</p><p>c</p>";
    let source = ops.create_element("div", false, None, None);
    let (first, last) = ops
        .insert_static_content(markup, &source, None, false, None)
        .expect("first insertion");
    ops.remove(&last);

    let section = ops.create_element("section", false, None, None);
    let (copy_first, copy_last) = ops
        .insert_static_content(markup, &section, None, false, Some((&first, &last)))
        .expect("reparsed insertion");
    assert_eq!(doc.markup_parses(), 2);
    assert_eq!(doc.children(section).len(), 3);
    assert_eq!(doc.text_content(copy_first), "a");
    assert_eq!(doc.text_content(copy_last), "c");
}

#[test]
fn static_content_cache_in_same_parent_terminates() {
    let (doc, ops) = setup();
    let markup = "<p>a</p><p>b</p><p>c</p>";
    let parent = ops.create_element("div", false, None, None);
    let (first, last) = ops
        .insert_static_content(markup, &parent, None, false, None)
        .expect("first insertion");
    ops.remove(&last);

    let (new_first, new_last) = ops
        .insert_static_content(markup, &parent, None, false, Some((&first, &last)))
        .expect("second insertion");
    assert_eq!(doc.inner_html(parent), "<p>a</p><p>b</p><p>a</p><p>b</p><p>c</p>");
    assert_eq!(doc.text_content(new_first), "a");
    assert_eq!(doc.text_content(new_last), "c");

    // A block still linked in the target parent is copied once.
    let (again_first, again_last) = ops
        .insert_static_content(markup, &parent, None, false, Some((&new_first, &new_last)))
        .expect("cached insertion");
    assert_eq!(doc.markup_parses(), 2);
    assert_eq!(doc.children(parent).len(), 8);
    assert_eq!(doc.text_content(again_first), "a");
    assert_eq!(doc.text_content(again_last), "c");
}

#[test]
fn node_count_stays_bounded_across_remove_cycles() {
    let (doc, ops) = setup();
    let body = doc.body();
    let baseline = doc.node_count();
    for i in 0..100 {
        let row = ops.create_element("div", false, None, None);
        let label = ops.create_text(&i.to_string());
        ops.insert(&label, &row, None);
        ops.insert(&row, &body, None);
        ops.insert_static_content("<b>x</b><i>y</i>", &row, None, false, None);
        ops.set_element_text(&row, "done");
        ops.remove(&row);
    }
    assert_eq!(doc.node_count(), baseline);
    assert!(doc.slot_count() < baseline + 10);
}

#[test]
fn static_content_in_svg_context() {
    let (doc, ops) = setup();
    let svg = ops.create_element("svg", true, None, None);
    let (first, last) = ops
        .insert_static_content(r#"<circle r="4"/><path d="M0"/>"#, &svg, None, true, None)
        .expect("inserted");

    assert_eq!(doc.tag_name(first).as_deref(), Some("circle"));
    assert_eq!(doc.tag_name(last).as_deref(), Some("path"));
    assert_eq!(doc.namespace(first), Some(Namespace::Svg));
    // The temporary wrapper does not survive.
    assert_eq!(doc.children(svg), vec![first, last]);
}

#[test]
fn static_content_empty_markup_inserts_nothing() {
    let (doc, ops) = setup();
    let parent = ops.create_element("div", false, None, None);
    let anchor = ops.create_text("x");
    ops.insert(&anchor, &parent, None);

    assert_eq!(
        ops.insert_static_content("", &parent, Some(&anchor), false, None),
        None
    );
    assert_eq!(doc.children(parent), vec![anchor]);
}

#[test]
fn container_marker_round_trip() {
    let (_doc, ops) = setup();
    let container = ops.create_element("div", false, None, None);
    assert!(ops.container_app(&container).is_none());

    let owner: std::rc::Rc<dyn std::any::Any> = std::rc::Rc::new(());
    let marker = hostkit::host::AppMarker::new(9, std::rc::Rc::downgrade(&owner));
    ops.set_container_app(&container, Some(marker));
    assert_eq!(ops.container_app(&container).map(|m| m.uid()), Some(9));

    ops.set_container_app(&container, None);
    assert!(ops.container_app(&container).is_none());
}

#[test]
fn detect_requires_a_current_document() {
    std::thread::spawn(|| {
        assert!(matches!(
            DomOps::detect(),
            Err(HostkitError::HostUnavailable(_))
        ));

        let doc = Document::new();
        doc.make_current();
        let ops = DomOps::detect().expect("document installed");
        assert!(ops.document().ptr_eq(&doc));
        Document::clear_current();
    })
    .join()
    .unwrap();
}
