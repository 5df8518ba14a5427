//! HTML views for the site.
//!
//! Every page is assembled from the string templates below: a base layout
//! with embedded CSS and document metadata, the article listing with its card
//! grid, the article detail page, and the not-found / error pages.
//!
//! All interpolated text is HTML-escaped with one exception: the article
//! `body` is a rich-editor HTML fragment owned by the trusted content source
//! and is emitted as-is.

use chrono::{DateTime, Utc};
use masthead_core::{Article, Tag};
use tracing::error;

use crate::template::{render, TemplateContext};

/// Site name used in titles and chrome.
pub const SITE_NAME: &str = "Masthead Lab";

/// Fixed title for the not-found page; metadata degrades to this rather than
/// failing when an article cannot be resolved.
pub const NOT_FOUND_TITLE: &str = "Article not found";

/// Emitted if a template ever fails to render. Keeps a broken view from
/// becoming an unhandled failure.
const FALLBACK_HTML: &str = "<!DOCTYPE html>\n<html lang=\"en\"><head><title>Masthead Lab</title></head>\
<body><p>Something went wrong rendering this page.</p></body></html>\n";

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{{ title }}</title>
{{ meta? }}<style>
:root {
    --bg: #f8fafc;
    --surface: #ffffff;
    --text: #0f172a;
    --muted: #64748b;
    --accent: #2563eb;
    --border: #e2e8f0;
}
* { box-sizing: border-box; margin: 0; }
body {
    font-family: system-ui, -apple-system, sans-serif;
    line-height: 1.7;
    color: var(--text);
    background: var(--bg);
}
header {
    position: sticky;
    top: 0;
    background: rgba(255, 255, 255, 0.9);
    border-bottom: 1px solid var(--border);
    backdrop-filter: blur(8px);
}
header nav {
    max-width: 72rem;
    margin: 0 auto;
    padding: 1rem 2rem;
    display: flex;
    align-items: center;
    justify-content: space-between;
}
.site-title { font-size: 1.25rem; font-weight: 700; color: var(--accent); text-decoration: none; }
.site-title span { font-size: 0.875rem; font-weight: 400; color: var(--muted); }
.nav-links a { font-size: 0.875rem; color: var(--text); text-decoration: none; }
.nav-links a:hover { color: var(--accent); }
main { max-width: 72rem; margin: 0 auto; padding: 2rem; }
.hero { text-align: center; padding: 4rem 0 3rem; }
.hero h1 { font-size: 2.5rem; letter-spacing: -0.025em; }
.hero p { color: var(--muted); margin-top: 1rem; }
.articles h2 { margin: 2rem 0 1.5rem; }
.article-grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr));
    gap: 2rem;
}
.card {
    display: block;
    background: var(--surface);
    border: 1px solid var(--border);
    border-radius: 1rem;
    overflow: hidden;
    color: inherit;
    text-decoration: none;
    transition: transform 0.2s ease, box-shadow 0.2s ease;
}
.card:hover { transform: translateY(-2px); box-shadow: 0 8px 24px rgb(15 23 42 / 0.08); }
.card-media { aspect-ratio: 16 / 9; width: 100%; object-fit: cover; display: block; }
.card-media.placeholder { background: linear-gradient(135deg, #e2e8f0, #cbd5e1); }
.card-body { padding: 1.25rem; }
.card-body h3 { font-size: 1.05rem; line-height: 1.4; }
.card-meta, .article-meta { color: var(--muted); font-size: 0.875rem; margin-top: 0.75rem; }
.article { max-width: 48rem; margin: 0 auto; padding: 2rem 0; }
.article h1 { font-size: 2.25rem; line-height: 1.25; margin-bottom: 0.75rem; }
.article .cover { width: 100%; aspect-ratio: 16 / 9; object-fit: cover; border-radius: 1rem; margin-bottom: 2rem; }
.prose { margin-top: 2rem; }
.prose img { max-width: 100%; }
.back-link { margin-top: 3rem; }
.back-link a { color: var(--accent); text-decoration: none; }
.notice { text-align: center; padding: 6rem 0; }
.notice p { color: var(--muted); margin-top: 0.75rem; }
footer { border-top: 1px solid var(--border); color: var(--muted); font-size: 0.875rem; }
footer p { max-width: 72rem; margin: 0 auto; padding: 1.5rem 2rem; }
</style>
</head>
<body>
<header>
<nav>
<a class="site-title" href="/">Masthead <span>Lab</span></a>
<div class="nav-links"><a href="/#articles">Articles</a></div>
</nav>
</header>
<main>
{{ content }}
</main>
<footer><p>&copy; Masthead Lab</p></footer>
</body>
</html>
"#;

const HOME_TEMPLATE: &str = r#"<section class="hero">
<h1>Field notes from the Masthead team</h1>
<p>Product updates and practical notes, published through our content pipeline.</p>
</section>
<section id="articles" class="articles">
<h2>Latest Articles</h2>
<div class="article-grid">
{{ cards }}</div>
</section>
"#;

const CARD_TEMPLATE: &str = r#"<a class="card" href="/articles/{{ id }}">
{{ media }}
<div class="card-body">
<h3>{{ title }}</h3>
<p class="card-meta">{{ date }}{{ tags? }}</p>
</div>
</a>
"#;

const ARTICLE_TEMPLATE: &str = r#"<article class="article">
{{ cover? }}<h1>{{ title }}</h1>
<p class="article-meta">{{ date }}{{ tags? }}</p>
<div class="prose">{{ body }}</div>
<p class="back-link"><a href="/">&larr; Back to all articles</a></p>
</article>
"#;

const NOTICE_TEMPLATE: &str = r#"<section class="notice">
<h1>{{ heading }}</h1>
<p>{{ detail }}</p>
<p><a href="/">&larr; Back to all articles</a></p>
</section>
"#;

/// Escape text for interpolation into HTML content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
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

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y.%m.%d").to_string()
}

/// ` | #tag-one #tag-two` suffix, or `None` when the article has no tags.
fn tag_suffix(tags: &[Tag]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    let badges: Vec<String> = tags
        .iter()
        .map(|tag| format!("#{}", escape_html(&tag.name)))
        .collect();
    Some(format!(" | {}", badges.join(" ")))
}

/// Document metadata lines for the `<head>`: description plus OpenGraph
/// title/description/image, all escaped. Absent fields are simply omitted.
fn head_meta(title: &str, description: Option<&str>, image_url: Option<&str>) -> String {
    let mut meta = String::new();
    if let Some(description) = description {
        let escaped = escape_html(description);
        meta.push_str(&format!("<meta name=\"description\" content=\"{escaped}\">\n"));
        meta.push_str(&format!(
            "<meta property=\"og:description\" content=\"{escaped}\">\n"
        ));
    }
    meta.push_str(&format!(
        "<meta property=\"og:title\" content=\"{}\">\n",
        escape_html(title)
    ));
    if let Some(url) = image_url {
        meta.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\">\n",
            escape_html(url)
        ));
    }
    meta
}

fn render_or_fallback(name: &str, template: &str, context: &TemplateContext) -> String {
    match render(template, context) {
        Ok(html) => html,
        Err(err) => {
            error!(template = name, %err, "template render failed");
            FALLBACK_HTML.to_string()
        }
    }
}

fn page(title: &str, meta: String, content: String) -> String {
    let ctx = TemplateContext::new()
        .with_var("title", escape_html(title))
        .with_var("meta", meta)
        .with_var("content", content);
    render_or_fallback("base", BASE_TEMPLATE, &ctx)
}

fn article_card(article: &Article) -> String {
    let media = match &article.cover_image {
        Some(image) => format!(
            "<img class=\"card-media\" src=\"{}\" alt=\"{}\">",
            escape_html(&image.url),
            escape_html(&article.title)
        ),
        None => "<div class=\"card-media placeholder\"></div>".to_string(),
    };

    let mut ctx = TemplateContext::new()
        .with_var("id", escape_html(&article.id))
        .with_var("media", media)
        .with_var("title", escape_html(&article.title))
        .with_var("date", format_date(article.display_date()));
    if let Some(tags) = tag_suffix(article.display_tags()) {
        ctx.insert("tags", tags);
    }
    render_or_fallback("card", CARD_TEMPLATE, &ctx)
}

/// The article listing page.
pub fn home_page(articles: &[Article]) -> String {
    let cards: String = articles.iter().map(article_card).collect();
    let ctx = TemplateContext::new().with_var("cards", cards);
    let content = render_or_fallback("home", HOME_TEMPLATE, &ctx);

    let meta = head_meta(
        SITE_NAME,
        Some("Product updates and practical notes from the Masthead team."),
        None,
    );
    page(SITE_NAME, meta, content)
}

/// One article detail page. `body` is emitted unescaped (trusted fragment).
pub fn article_page(article: &Article) -> String {
    let mut ctx = TemplateContext::new()
        .with_var("title", escape_html(&article.title))
        .with_var("date", format_date(article.display_date()))
        .with_var("body", article.body.clone());
    if let Some(image) = &article.cover_image {
        ctx.insert(
            "cover",
            format!(
                "<img class=\"cover\" src=\"{}\" alt=\"{}\">\n",
                escape_html(&image.url),
                escape_html(&article.title)
            ),
        );
    }
    if let Some(tags) = tag_suffix(article.display_tags()) {
        ctx.insert("tags", tags);
    }
    let content = render_or_fallback("article", ARTICLE_TEMPLATE, &ctx);

    let title = format!("{} | {SITE_NAME}", article.title);
    let meta = head_meta(
        &title,
        article.description.as_deref(),
        article.cover_image.as_ref().map(|i| i.url.as_str()),
    );
    page(&title, meta, content)
}

/// Not-found page with its fixed title.
pub fn not_found_page() -> String {
    let ctx = TemplateContext::new()
        .with_var("heading", NOT_FOUND_TITLE)
        .with_var("detail", "The article you are looking for does not exist or has been removed.");
    let content = render_or_fallback("notice", NOTICE_TEMPLATE, &ctx);
    page(
        &format!("{NOT_FOUND_TITLE} | {SITE_NAME}"),
        head_meta(NOT_FOUND_TITLE, None, None),
        content,
    )
}

/// Generic failure page, shown only when the source is down and no cached
/// render exists for the route.
pub fn error_page() -> String {
    let ctx = TemplateContext::new()
        .with_var("heading", "Something went wrong")
        .with_var("detail", "We could not load this page right now. Please try again shortly.");
    let content = render_or_fallback("notice", NOTICE_TEMPLATE, &ctx);
    page(
        &format!("Something went wrong | {SITE_NAME}"),
        String::new(),
        content,
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use masthead_core::CoverImage;

    use super::*;

    fn article(id: &str) -> Article {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        Article {
            id: id.to_string(),
            title: format!("Title of {id}"),
            body: "<p>Hello <strong>world</strong></p>".to_string(),
            description: None,
            cover_image: None,
            tags: None,
            created_at: date,
            updated_at: date,
            published_at: Some(date),
            revised_at: None,
        }
    }

    #[test]
    fn test_card_without_cover_renders_placeholder() {
        let html = home_page(&[article("a")]);
        assert!(html.contains("card-media placeholder"));
        assert!(!html.contains("<img class=\"card-media\""));
    }

    #[test]
    fn test_card_with_cover_renders_image() {
        let mut a = article("a");
        a.cover_image = Some(CoverImage {
            url: "https://img.example/a.png".to_string(),
            width: Some(600),
            height: Some(338),
        });
        let html = home_page(&[a]);
        assert!(html.contains("src=\"https://img.example/a.png\""));
        assert!(!html.contains("card-media placeholder"));
    }

    #[test]
    fn test_missing_tags_render_zero_badges() {
        let html = home_page(&[article("a")]);
        assert!(!html.contains(" | #"));
    }

    #[test]
    fn test_tags_render_as_badges_in_order() {
        let mut a = article("a");
        a.tags = Some(vec![
            Tag {
                id: "t1".to_string(),
                name: "first".to_string(),
            },
            Tag {
                id: "t2".to_string(),
                name: "second".to_string(),
            },
        ]);
        let html = home_page(&[a]);
        assert!(html.contains(" | #first #second"));
    }

    #[test]
    fn test_date_uses_dotted_format_and_display_date() {
        let html = home_page(&[article("a")]);
        assert!(html.contains("2024.01.05"));

        let mut draft = article("b");
        draft.published_at = None;
        draft.created_at = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        let html = home_page(&[draft]);
        assert!(html.contains("2023.12.31"));
    }

    #[test]
    fn test_text_fields_are_escaped() {
        let mut a = article("a");
        a.title = "Tips & <tricks>".to_string();
        let html = article_page(&a);
        assert!(html.contains("Tips &amp; &lt;tricks&gt;"));
        assert!(!html.contains("<tricks>"));
    }

    #[test]
    fn test_article_body_is_emitted_unescaped() {
        let html = article_page(&article("a"));
        assert!(html.contains("<p>Hello <strong>world</strong></p>"));
    }

    #[test]
    fn test_article_metadata_from_fields() {
        let mut a = article("a");
        a.description = Some("A \"quoted\" summary".to_string());
        a.cover_image = Some(CoverImage {
            url: "https://img.example/a.png".to_string(),
            width: None,
            height: None,
        });
        let html = article_page(&a);
        assert!(html.contains("<title>Title of a | Masthead Lab</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"A &quot;quoted&quot; summary\">"));
        assert!(html.contains("<meta property=\"og:image\" content=\"https://img.example/a.png\">"));
    }

    #[test]
    fn test_home_metadata_has_no_image() {
        let html = home_page(&[]);
        assert!(html.contains("<title>Masthead Lab</title>"));
        assert!(!html.contains("og:image"));
    }

    #[test]
    fn test_not_found_page_has_fixed_title() {
        let html = not_found_page();
        assert!(html.contains("<title>Article not found | Masthead Lab</title>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }
}
