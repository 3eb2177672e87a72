use crate::{render, render_with_options, RenderOptions, EMPTY_DOCUMENT_MARKUP};

fn document(children: &str) -> String {
    format!(r#"{{"root":{{"children":[{}]}}}}"#, children)
}

fn text(content: &str, format: u32) -> String {
    format!(
        r#"{{"type":"text","version":1,"text":"{}","format":{}}}"#,
        content, format
    )
}

fn paragraph(children: &str) -> String {
    format!(r#"{{"type":"paragraph","version":1,"children":[{}]}}"#, children)
}

#[test]
fn test_render_minimum_document() {
    let html = render(r#"{"root":{"children":[{"type":"paragraph","version":1,"children":[]}]}}"#);
    assert_eq!(html, EMPTY_DOCUMENT_MARKUP);
}

#[test]
fn test_render_malformed_input() {
    for input in ["", "not json", "[]", r#"{"root":{"children":7}}"#, "null"] {
        assert_eq!(render(input), EMPTY_DOCUMENT_MARKUP, "input: {input:?}");
    }
    assert_eq!(render(r#"{"root":{"children":[]}}"#), EMPTY_DOCUMENT_MARKUP);
}

#[test]
fn test_render_format_order() {
    let html = render(&document(&paragraph(&text("x", 1 | 2))));
    assert_eq!(html, "<p><em><strong>x</strong></em></p>");

    let html = render(&document(&paragraph(&text("y", 1 | 2 | 4 | 8 | 16))));
    assert_eq!(
        html,
        "<p><code><s><u><em><strong>y</strong></em></u></s></code></p>"
    );
}

#[test]
fn test_render_headings_clamp() {
    let html = render(&document(
        r#"{"type":"heading","version":1,"tag":"h2","children":[]},
           {"type":"heading","version":1,"tag":"h6","children":[]},
           {"type":"heading","version":1,"children":[]}"#,
    ));
    assert_eq!(html, "<h2></h2><h3></h3><h1></h1>");
}

#[test]
fn test_render_lists() {
    let item = format!(
        r#"{{"type":"listitem","version":1,"children":[{}]}}"#,
        text("a", 0)
    );
    let html = render(&document(&format!(
        r#"{{"type":"list","version":1,"listType":"ordered","start":3,"children":[{item}]}},
           {{"type":"list","version":1,"listType":"bullet","start":1,"children":[{item}]}}"#
    )));

    println!("Generated HTML:\n{}", html);

    assert_eq!(html, r#"<ol start="3"><li>a</li></ol><ul><li>a</li></ul>"#);
}

#[test]
fn test_render_image_with_caption() {
    let html = render(&document(
        r#"{"type":"image","version":1,"src":"/cat.png","altText":"A \"cat\"","width":300,"height":"auto","showCaption":true,"caption":"Mine"}"#,
    ));
    assert_eq!(
        html,
        r#"<figure><img src="/cat.png" alt="A &quot;cat&quot;" width="300" /><figcaption>Mine</figcaption></figure>"#
    );
}

#[test]
fn test_render_caption_inside_paragraph_stays_inline() {
    let image = r#"{"type":"image","version":1,"src":"/a.png","altText":"","showCaption":true,"caption":"Cap"}"#;
    let html = render(&document(&paragraph(&format!(
        "{},{},{}",
        text("hello", 0),
        image,
        text(" world", 0)
    ))));

    println!("Generated HTML:\n{}", html);

    assert_eq!(
        html,
        r#"<p>hello<span><img src="/a.png" alt="" /><small>Cap</small></span> world</p>"#
    );
    assert!(!html.contains("<figure>"));
}

#[test]
fn test_render_caption_hidden_or_empty() {
    let html = render(&document(
        r#"{"type":"image","version":1,"src":"a.png","altText":"","showCaption":false,"caption":"Hidden"},
           {"type":"image","version":1,"src":"b.png","altText":"","showCaption":true,"caption":"  "}"#,
    ));
    assert_eq!(html, r#"<img src="a.png" alt="" /><img src="b.png" alt="" />"#);
}

#[test]
fn test_render_video() {
    let html = render(&document(
        r#"{"type":"video","version":1,"src":"https://cdn.example.com/v.mp4","width":640,"height":360}"#,
    ));
    assert_eq!(
        html,
        r#"<video controls width="640" height="360"><source src="https://cdn.example.com/v.mp4" /></video>"#
    );
}

#[test]
fn test_render_link_and_linebreak() {
    let html = render(&document(&paragraph(&format!(
        r#"{{"type":"link","version":1,"url":"https://example.com?a=1&b=2","children":[{}]}},{{"type":"linebreak","version":1}}"#,
        text("go", 0)
    ))));
    assert_eq!(
        html,
        r#"<p><a href="https://example.com?a=1&amp;b=2" target="_blank" rel="noopener noreferrer">go</a><br /></p>"#
    );
}

#[test]
fn test_render_escapes_text() {
    let html = render(&document(&paragraph(&text("<script>alert('x')</script> & co", 0))));
    assert_eq!(
        html,
        "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co</p>"
    );
}

#[test]
fn test_render_drops_unsafe_urls() {
    let html = render(&document(&paragraph(&format!(
        r#"{{"type":"link","version":1,"url":"javascript:alert(1)","children":[{}]}}"#,
        text("click", 0)
    ))));
    assert!(html.contains(r#"href="""#));
    assert!(!html.contains("javascript"));

    let html = render(&document(
        r#"{"type":"image","version":1,"src":"data:image/svg+xml,<svg onload=alert(1)>","altText":""}"#,
    ));
    assert_eq!(html, r#"<img src="" alt="" />"#);
}

#[test]
fn test_render_unknown_type_passes_children_through() {
    let html = render(&document(&format!(
        r#"{{"type":"futureWidget","version":9,"children":[{}]}},{{"type":"sparkle","version":1}}"#,
        paragraph(&text("x", 0))
    )));
    assert_eq!(html, "<p>x</p>");

    let html = render(&document(&paragraph(&format!(
        r#"{{"type":"futureWidget","version":1,"children":[{}]}}"#,
        text("x", 0)
    ))));
    assert_eq!(html, "<p>x</p>");
}

#[test]
fn test_render_bare_node() {
    assert_eq!(render(&paragraph(&text("solo", 0))), "<p>solo</p>");
}

#[test]
fn test_render_pretty() {
    let item = format!(
        r#"{{"type":"listitem","version":1,"children":[{}]}}"#,
        text("a", 0)
    );
    let source = document(&format!(
        r#"{},{{"type":"list","version":1,"listType":"unordered","children":[{item},{item}]}}"#,
        paragraph(&text("intro", 0))
    ));
    let options = RenderOptions {
        pretty: true,
        ..Default::default()
    };
    let html = render_with_options(&source, &options);

    println!("Generated HTML:\n{}", html);

    assert_eq!(html, "<p>intro</p>\n<ul>\n  <li>a</li>\n  <li>a</li>\n</ul>\n");
}
