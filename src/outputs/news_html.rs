//! HTML pages of the news site.

use crate::config::NewsConfig;
use crate::models::Article;
use crate::outputs::{page_slice, render_pagination};
use crate::utils::{escape_attr, escape_html};
use chrono::{DateTime, FixedOffset, Utc};

fn render_item(article: &Article) -> String {
    let mut meta = format!(
        r#"<span class="news-site site-{}">{}</span>"#,
        escape_attr(&article.site_key),
        escape_html(&article.site)
    );
    if !article.time_text.is_empty() {
        meta.push_str(&format!("<span>{}</span>", escape_html(&article.time_text)));
    }
    format!(
        r#"
      <li class="news-item">
        <a href="{url}" target="_blank" rel="noopener">{title}</a>
        <div class="news-meta">{meta}</div>
      </li>"#,
        url = escape_attr(&article.url),
        title = escape_html(&article.title),
    )
}

/// News page `page` of `total_pages`; `articles` is the whole cache, newest first.
pub fn render_news_page(
    config: &NewsConfig,
    articles: &[Article],
    page: usize,
    total_pages: usize,
    now: DateTime<Utc>,
) -> String {
    let items = page_slice(articles, page, config.page_size);

    let body = if items.is_empty() {
        r#"<div class="empty-state"><p>ニュースはまだありません。</p></div>"#.to_string()
    } else {
        let list: String = items.iter().map(render_item).collect();
        format!(r#"<ul class="news-list">{list}
    </ul>"#)
    };

    let updated = FixedOffset::east_opt(9 * 3600)
        .map(|tz| now.with_timezone(&tz).format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_default();
    let name = escape_html(&config.site_name);
    let canonical = if page <= 1 {
        config.site_url.clone()
    } else {
        format!("{}/page{}.html", config.site_url, page)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{name}</title>
  <meta name="description" content="{name} - 最新のVTuberニュースを一覧で">
  <link rel="canonical" href="{canonical}">
  <link rel="stylesheet" href="style.css">
</head>
<body>
  <header class="header"><h1>{name}</h1></header>
  <main class="container">
    {body}
    {pagination}
  </main>
  <footer class="footer">最終更新: {updated} JST</footer>
</body>
</html>"#,
        canonical = escape_attr(&canonical),
        pagination = render_pagination(page, total_pages),
    )
}
