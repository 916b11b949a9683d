use crate::parsers::Parser;

#[test]
fn test_sources_in_document_order() {
    let page = r#"
        <html>
          <head><title>  Gallery
            of things </title></head>
          <body>
            <img src="/a.png">
            <div><p><img alt="nested" src="https://cdn.example.com/b.jpg"></p></div>
            <img src="c.gif" />
          </body>
        </html>"#;

    let result = Parser::parse(page);
    assert_eq!(result.title.as_deref(), Some("Gallery of things"));
    assert_eq!(
        result.sources,
        vec!["/a.png", "https://cdn.example.com/b.jpg", "c.gif"]
    );
}

#[test]
fn test_duplicates_are_kept_by_parser() {
    // De-duplication happens after resolution, not here
    let page = r#"<img src="/a.png"><img src="/a.png">"#;
    assert_eq!(Parser::parse(page).sources, vec!["/a.png", "/a.png"]);
}

#[test]
fn test_images_without_src_are_skipped() {
    let page = r#"<img alt="lazy" data-src="/lazy.png"><img src=""><picture><source srcset="/x.webp"></picture>"#;

    // An empty src is still reported; resolution drops it
    assert_eq!(Parser::parse(page).sources, vec![""]);
}

#[test]
fn test_no_images_no_title() {
    let result = Parser::parse("<html><body><p>Hello, world!</p></body></html>");
    assert!(result.sources.is_empty());
    assert!(result.title.is_none());
}

#[test]
fn test_malformed_markup() {
    let page = r#"<body><img src="/one.png"<p><img src='/two.png'></div></span>"#;
    let sources = Parser::parse(page).sources;
    assert!(sources.contains(&"/two.png".to_string()));
}
