//! Integration tests for the HTML parser.

use lark_dom::{DomTree, Namespace, NodeId, NodeType, QuirksMode};
use lark_html::{
    FragmentContext, HTMLParser, ParseError, ParseErrorCode, ParserOptions, parse_document,
    parse_fragment,
};

/// Helper to parse a document and dump it in html5lib format
fn dump(html: &str) -> String {
    let tree = parse_document(html);
    tree.to_test_format(tree.root())
}

/// Helper to parse a fragment and dump the fragment's children
fn dump_fragment(html: &str, context: &FragmentContext) -> String {
    let parsed = parse_fragment(html, context).expect("valid context");
    parsed.tree.to_test_format(parsed.fragment)
}

/// Helper to wrap body lines in the implied document skeleton
fn in_body(lines: &str) -> String {
    format!("| <html>\n|   <head>\n|   <body>\n{lines}")
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Helper to parse and return the parse error codes
fn error_codes(html: &str) -> Vec<ParseErrorCode> {
    let (_, issues) = HTMLParser::new(html).run_with_issues();
    issues.into_iter().map(|issue| issue.code).collect()
}

#[test]
fn test_document_structure() {
    let tree = parse_document("<!DOCTYPE html><html><head></head><body></body></html>");

    let root = tree.get(NodeId::ROOT).expect("document node");
    assert!(matches!(root.node_type, NodeType::Document));

    let html = tree.document_element().expect("html element");
    assert_eq!(tree.head().and_then(|id| tree.parent(id)), Some(html));
    assert_eq!(tree.body().and_then(|id| tree.parent(id)), Some(html));
    assert!(tree.doctype().is_some());
}

#[test]
fn test_implied_head_and_body() {
    let html = "<!DOCTYPE html><html><body>text";
    let tree = parse_document(html);
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
    assert_eq!(
        tree.to_test_format(tree.root()),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     \"text\"\n"
    );
}

#[test]
fn test_empty_input_builds_skeleton() {
    assert_eq!(dump(""), in_body(""));
}

#[test]
fn test_misnested_formatting_is_adopted() {
    assert_eq!(
        dump("<b>1<p>2</b>3</p>"),
        in_body(
            "|     <b>\n\
             |       \"1\"\n\
             |     <p>\n\
             |       <b>\n\
             |         \"2\"\n\
             |       \"3\"\n"
        )
    );
}

#[test]
fn test_adoption_with_nested_formatting() {
    assert_eq!(
        dump("<a><b>x</a>y"),
        in_body(
            "|     <a>\n\
             |       <b>\n\
             |         \"x\"\n\
             |     <b>\n\
             |       \"y\"\n"
        )
    );
}

#[test]
fn test_noahs_ark_keeps_three_copies() {
    assert_eq!(
        dump("<!DOCTYPE html><p><b><b><b><b><p>x"),
        "| <!DOCTYPE html>\n\
         | <html>\n\
         |   <head>\n\
         |   <body>\n\
         |     <p>\n\
         |       <b>\n\
         |         <b>\n\
         |           <b>\n\
         |             <b>\n\
         |     <p>\n\
         |       <b>\n\
         |         <b>\n\
         |           <b>\n\
         |             \"x\"\n"
    );
}

#[test]
fn test_noahs_ark_compares_attributes() {
    // Different attributes make different entries, so nothing is dropped.
    let out = dump("<p><b class=a><b class=b><b class=c><b class=d><p>x");
    let second_p = out.rfind("<p>").expect("second paragraph");
    assert_eq!(out[second_p..].matches("<b>").count(), 4);
}

#[test]
fn test_self_closing_br_is_a_plain_br() {
    assert_eq!(dump("<p>a<br/>b"), dump("<p>a<br>b"));
}

#[test]
fn test_end_br_inserts_element() {
    assert_eq!(dump("<p></br>"), in_body("|     <p>\n|       <br>\n"));
}

#[test]
fn test_stray_end_p_inserts_empty_paragraph() {
    assert_eq!(dump("</p>"), in_body("|     <p>\n"));
}

#[test]
fn test_block_closes_open_paragraph() {
    assert_eq!(
        dump("<p>a<div>b</div>"),
        in_body("|     <p>\n|       \"a\"\n|     <div>\n|       \"b\"\n")
    );
}

#[test]
fn test_heading_closes_heading() {
    assert_eq!(
        dump("<h1>a<h2>b"),
        in_body("|     <h1>\n|       \"a\"\n|     <h2>\n|       \"b\"\n")
    );
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        dump("<ul><li>a<li>b</ul>"),
        in_body(
            "|     <ul>\n\
             |       <li>\n\
             |         \"a\"\n\
             |       <li>\n\
             |         \"b\"\n"
        )
    );
}

#[test]
fn test_leading_newline_in_pre_is_dropped() {
    assert_eq!(dump("<pre>\nx</pre>"), in_body("|     <pre>\n|       \"x\"\n"));
}

#[test]
fn test_image_becomes_img() {
    assert_eq!(dump("<image src=a>"), in_body("|     <img>\n|       src=\"a\"\n"));
}

#[test]
fn test_table_fills_in_sections() {
    assert_eq!(
        dump("<table><td>x"),
        in_body(
            "|     <table>\n\
             |       <tbody>\n\
             |         <tr>\n\
             |           <td>\n\
             |             \"x\"\n"
        )
    );
}

#[test]
fn test_table_whitespace_stays_in_table() {
    assert_eq!(
        dump("<table> <tr>"),
        in_body(
            "|     <table>\n\
             |       \" \"\n\
             |       <tbody>\n\
             |         <tr>\n"
        )
    );
}

#[test]
fn test_table_text_is_foster_parented() {
    assert_eq!(
        dump("<table>x<tr><td>y</table>"),
        in_body(
            "|     \"x\"\n\
             |     <table>\n\
             |       <tbody>\n\
             |         <tr>\n\
             |           <td>\n\
             |             \"y\"\n"
        )
    );
    assert!(error_codes("<table>x</table>").contains(&ParseErrorCode::FosterParentedCharacter));
}

#[test]
fn test_table_elements_are_foster_parented() {
    assert_eq!(
        dump("<table><div>a</div></table>"),
        in_body("|     <div>\n|       \"a\"\n|     <table>\n")
    );
}

#[test]
fn test_select_options() {
    assert_eq!(
        dump("<select><option>a<option>b</select>"),
        in_body(
            "|     <select>\n\
             |       <option>\n\
             |         \"a\"\n\
             |       <option>\n\
             |         \"b\"\n"
        )
    );
}

#[test]
fn test_template_contents() {
    assert_eq!(
        dump("<template><p>x</p></template>"),
        "| <html>\n\
         |   <head>\n\
         |     <template>\n\
         |       content\n\
         |         <p>\n\
         |           \"x\"\n\
         |   <body>\n"
    );
}

#[test]
fn test_template_row_without_table() {
    assert_eq!(
        dump("<template><tr><td>x</td></tr></template>"),
        "| <html>\n\
         |   <head>\n\
         |     <template>\n\
         |       content\n\
         |         <tr>\n\
         |           <td>\n\
         |             \"x\"\n\
         |   <body>\n"
    );
}

#[test]
fn test_frameset_document() {
    assert_eq!(
        dump("<frameset><frame></frameset>"),
        "| <html>\n|   <head>\n|   <frameset>\n|     <frame>\n"
    );
}

#[test]
fn test_frameset_replaces_implied_body() {
    let tree = parse_document("<div><frameset><frame>");
    assert_eq!(
        tree.to_test_format(tree.root()),
        "| <html>\n|   <head>\n|   <frameset>\n|     <frame>\n"
    );
    let frameset = tree.body().expect("frameset");
    assert!(tree.as_element(frameset).is_some_and(|e| e.tag_name == "frameset"));
}

#[test]
fn test_comment_after_html_goes_to_document() {
    assert_eq!(
        dump("<html></html><!--x-->"),
        "| <html>\n|   <head>\n|   <body>\n| <!-- x -->\n"
    );
}

#[test]
fn test_svg_names_are_adjusted() {
    assert_eq!(
        dump("<svg viewbox=\"0 0 1 1\"><foreignobject><p>a"),
        in_body(
            "|     <svg svg>\n\
             |       viewBox=\"0 0 1 1\"\n\
             |       <svg foreignObject>\n\
             |         <p>\n\
             |           \"a\"\n"
        )
    );
}

#[test]
fn test_xlink_attribute_namespace() {
    assert_eq!(
        dump("<svg xlink:href=\"#a\"></svg>"),
        in_body("|     <svg svg>\n|       xlink href=\"#a\"\n")
    );
}

#[test]
fn test_mathml_elements() {
    assert_eq!(
        dump("<math><mi>x</mi></math>"),
        in_body("|     <math math>\n|       <math mi>\n|         \"x\"\n")
    );
}

#[test]
fn test_html_start_tag_breaks_out_of_svg() {
    assert_eq!(dump("<svg><div>"), in_body("|     <svg svg>\n|     <div>\n"));
}

#[test]
fn test_font_with_color_breaks_out_of_svg() {
    assert_eq!(
        dump("<svg><font color=red>x"),
        in_body(
            "|     <svg svg>\n\
             |     <font>\n\
             |       color=\"red\"\n\
             |       \"x\"\n"
        )
    );
}

#[test]
fn test_plain_font_stays_in_svg() {
    assert_eq!(
        dump("<svg><font>x"),
        in_body("|     <svg svg>\n|       <svg font>\n|         \"x\"\n")
    );
}

#[test]
fn test_cdata_in_svg_is_text() {
    assert_eq!(
        dump("<svg><![CDATA[a<b]]></svg>"),
        in_body("|     <svg svg>\n|       \"a<b\"\n")
    );
}

#[test]
fn test_noscript_follows_scripting_flag() {
    assert_eq!(
        dump("<body><noscript><p>x</p></noscript>"),
        in_body("|     <noscript>\n|       \"<p>x</p>\"\n")
    );

    let options = ParserOptions {
        scripting_enabled: false,
        ..ParserOptions::default()
    };
    let tree = HTMLParser::new("<body><noscript><p>x</p></noscript>")
        .with_options(options)
        .run();
    assert_eq!(
        tree.to_test_format(tree.root()),
        in_body("|     <noscript>\n|       <p>\n|         \"x\"\n")
    );
}

#[test]
fn test_doctype_with_identifiers_is_dumped() {
    let tree = parse_document(r#"<!DOCTYPE html PUBLIC "a" "b"><p>"#);
    assert!(
        tree.to_test_format(tree.root())
            .starts_with("| <!DOCTYPE html \"a\" \"b\">\n")
    );
}

#[test]
fn test_document_modes() {
    let mode = |html: &str| parse_document(html).quirks_mode();

    assert_eq!(mode("<!DOCTYPE html>"), QuirksMode::NoQuirks);
    assert_eq!(mode("<p>no doctype"), QuirksMode::Quirks);
    assert_eq!(
        mode(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#),
        QuirksMode::Quirks
    );
    assert_eq!(
        mode(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#
        ),
        QuirksMode::LimitedQuirks
    );
    assert_eq!(
        mode(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#
        ),
        QuirksMode::LimitedQuirks
    );
    assert_eq!(
        mode(r#"<!DOCTYPE html SYSTEM "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd">"#),
        QuirksMode::Quirks
    );
}

#[test]
fn test_missing_doctype_is_reported() {
    let codes = error_codes("<p>x");
    assert_eq!(codes.first(), Some(&ParseErrorCode::MissingDoctype));
    assert!(error_codes("<!DOCTYPE html><p>x").is_empty());
}

#[test]
fn test_issues_are_sorted_by_position() {
    let (_, issues) = HTMLParser::new("<!DOCTYPE html></b><a x x>").run_with_issues();
    assert!(issues.len() >= 2);
    assert!(issues.windows(2).all(|pair| pair[0].position <= pair[1].position));
}

#[test]
fn test_fragment_in_tbody_context() {
    assert_eq!(
        dump_fragment("<tr><td>x</td></tr>", &FragmentContext::html("tbody")),
        "| <tr>\n|   <td>\n|     \"x\"\n"
    );
}

#[test]
fn test_fragment_in_div_context() {
    assert_eq!(
        dump_fragment("a<b>c</b>", &FragmentContext::html("div")),
        "| \"a\"\n| <b>\n|   \"c\"\n"
    );
}

#[test]
fn test_fragment_in_textarea_context_is_text() {
    assert_eq!(
        dump_fragment("<b>&amp;</b>", &FragmentContext::html("textarea")),
        "| \"<b>&</b>\"\n"
    );
}

#[test]
fn test_fragment_in_svg_context() {
    assert_eq!(
        dump_fragment("<circle/>", &FragmentContext::new("svg", Namespace::Svg)),
        "| <svg circle>\n"
    );
}

#[test]
fn test_fragment_root_is_not_returned() {
    let parsed = parse_fragment("<p>x", &FragmentContext::html("body")).expect("valid context");
    assert!(find_element(&parsed.tree, parsed.fragment, "html").is_none());
    assert!(find_element(&parsed.tree, parsed.fragment, "p").is_some());
    assert!(matches!(
        parsed.tree.get(parsed.fragment).map(|node| &node.node_type),
        Some(NodeType::DocumentFragment)
    ));
}

#[test]
fn test_invalid_fragment_context() {
    assert_eq!(
        parse_fragment("x", &FragmentContext::html("")).err(),
        Some(ParseError::InvalidContext(String::new()))
    );
    assert!(matches!(
        parse_fragment("x", &FragmentContext::html("bad name")),
        Err(ParseError::InvalidContext(_))
    ));
}

#[test]
fn test_custom_sink_entry_point() {
    let tree = HTMLParser::with_sink("<p>x", DomTree::new()).run();
    let p = find_element(&tree, tree.root(), "p").expect("p element");
    assert_eq!(tree.text_content(p), "x");
}

#[test]
fn test_deeply_nested_input() {
    let depth = 5_000;
    let html = format!("{}x", "<div>".repeat(depth));
    let tree = parse_document(&html);

    let dump = tree.to_test_format(tree.root());
    assert_eq!(dump.lines().count(), 3 + depth + 1);
    assert!(dump.ends_with(&format!("| {}\"x\"\n", "  ".repeat(depth + 2))));
    let body = tree.body().expect("body");
    assert_eq!(tree.text_content(body), "x");
}

#[test]
fn test_many_misnested_formatting_elements() {
    let html = format!("{}y</b>z", "<b><i>".repeat(2_000));
    let tree = parse_document(&html);
    let body = tree.body().expect("body");
    assert_eq!(tree.text_content(body), "yz");
}
