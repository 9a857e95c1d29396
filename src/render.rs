use std::fmt::Write;

use crate::data_models::SearchResultItem;

pub const NO_RESULTS_MESSAGE: &str = "No results found. Try a different search term.";

/// Text cards for terminal output, one block per result.
pub fn render_text(items: &[SearchResultItem]) -> String {
    if items.is_empty() {
        return format!("{NO_RESULTS_MESSAGE}\n");
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{}. {}", item.index + 1, item.title);
        if !item.description.is_empty() {
            let _ = writeln!(out, "   {}", item.description);
        }
        let _ = writeln!(out, "   {}", item.link);
        if item.has_thumbnail() {
            let _ = writeln!(out, "   image: {}", item.thumbnail_url);
        } else {
            let _ = writeln!(out, "   (no image)");
        }
        out.push('\n');
    }
    out
}

#[test]
fn test_render_text_empty() {
    assert_eq!(render_text(&[]), format!("{NO_RESULTS_MESSAGE}\n"));
}

#[test]
fn test_render_text_cards() {
    let items = vec![
        SearchResultItem::new(
            0,
            "Cat".into(),
            "A domestic animal".into(),
            "https://en.wikipedia.org/wiki/Cat".into(),
            Some("https://upload.wikimedia.org/cat.jpg".into()),
        ),
        SearchResultItem::new(
            1,
            "Caterpillar".into(),
            "".into(),
            "https://en.wikipedia.org/wiki/Caterpillar".into(),
            None,
        ),
    ];

    let text = render_text(&items);
    let expected = "\
1. Cat
   A domestic animal
   https://en.wikipedia.org/wiki/Cat
   image: https://upload.wikimedia.org/cat.jpg

2. Caterpillar
   https://en.wikipedia.org/wiki/Caterpillar
   (no image)

";
    assert_eq!(text, expected);
}
