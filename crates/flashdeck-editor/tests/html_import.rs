//! HTML import of stored and pasted card content.

use flashdeck_editor::chunk;
use flashdeck_editor::html::{from_html, insert_html, parse_html, render_html, to_html};
use flashdeck_editor::{ChunkKind, Document, HtmlError, MarkFlags, Marks, NodeSpec, Selection};
use pretty_assertions::assert_eq;

#[test]
fn stored_card_with_chunks_loads() {
    let html = concat!(
        "<h1>Plants</h1>",
        "<p>Leaves do <span data-w-e-type=\"ai-chunk-resolved\" data-chunk-id=\"chunk_17\">",
        "<strong>light-driven sugar synthesis</strong></span> every day.</p>",
    );
    let doc = from_html(html).expect("parse");
    assert_eq!(
        doc.to_specs(),
        vec![
            NodeSpec::heading(1, vec![NodeSpec::text("Plants")]),
            NodeSpec::paragraph(vec![
                NodeSpec::text("Leaves do "),
                NodeSpec::chunk(
                    ChunkKind::Resolved,
                    "chunk_17",
                    vec![NodeSpec::styled(
                        "light-driven sugar synthesis",
                        Marks::new().with(MarkFlags::BOLD),
                    )],
                ),
                NodeSpec::text(" every day."),
            ]),
        ]
    );
    assert_eq!(to_html(&doc), html);
}

#[test]
fn pending_chunk_renders_with_pulse_class() {
    let mut doc = from_html("<p>the Krebs cycle</p>").expect("parse");
    let pending = chunk::convert(&mut doc, &Selection::in_text(vec![0, 0], 4, 15)).expect("convert");
    let rendered = render_html(&doc);
    assert_eq!(
        rendered,
        format!(
            "<p>the <span class=\"ai-chunk ai-chunk--pending\" data-chunk-id=\"{}\">Krebs cycle</span></p>",
            pending.chunk_id
        )
    );
}

#[test]
fn unknown_markup_keeps_its_text() {
    let specs = parse_html("<div><table><tr><td>cell</td></tr></table></div><ul><li>one</li><li>two</li></ul>")
        .expect("parse");
    let doc = Document::from_blocks(specs).expect("valid");
    assert_eq!(doc.plain_text(), "cell\none\ntwo");
}

#[test]
fn entities_and_cjk_text() {
    let doc = from_html("<p>光合作用 &amp; 呼吸作用 &lt;3&#x21;</p>").expect("parse");
    assert_eq!(doc.plain_text(), "光合作用 & 呼吸作用 <3!");
    assert_eq!(to_html(&doc), "<p>光合作用 &amp; 呼吸作用 &lt;3!</p>");
}

#[test]
fn paste_between_blocks() {
    let mut doc = from_html("<p>top</p><p>bottom</p>").expect("parse");
    insert_html(&mut doc, 1, "pasted <em>words</em>").expect("insert");
    assert_eq!(doc.plain_text(), "top\npasted words\nbottom");
    assert!(matches!(insert_html(&mut doc, 0, "<p>broken</b"), Err(HtmlError::Xml(_))));
}
