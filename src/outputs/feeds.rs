//! RSS feed, sitemap and robots file.

use crate::config::SiteConfig;
use crate::models::Channel;
use crate::utils::{format_rfc822, format_subscriber_count, parse_timestamp, take_chars};
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use super::html::channel_page_url;

/// RSS 2.0 feed of the newest approved channels.
///
/// # Arguments
///
/// * `channels` - Approved channels in any order. They are sorted here by
///   approval time (discovery time when absent), newest first, and cut to
///   `site.feed_size` items.
/// * `site` - Site name, URL and feed size.
/// * `now` - Used for `lastBuildDate` and for items without a usable date.
///
/// # Returns
///
/// The feed document as XML text.
pub fn render_rss(channels: &[Channel], site: &SiteConfig, now: DateTime<Utc>) -> String {
    let mut newest: Vec<&Channel> = channels.iter().collect();
    newest.sort_by(|a, b| b.sort_key().cmp(a.sort_key()));
    newest.truncate(site.feed_size);

    let mut items = String::new();
    for channel in newest {
        let link = channel_page_url(site, channel);
        let title = format!("【新人VTuber】{}さんがデビュー！", channel.title);
        let description = format!(
            "{} チャンネル登録者: {} #新人VTuber",
            take_chars(channel.introduction.as_deref().unwrap_or(""), 200),
            format_subscriber_count(channel.subscriber_count),
        );
        let pub_date = parse_timestamp(channel.sort_key())
            .map(|t| format_rfc822(t.with_timezone(&Utc)))
            .unwrap_or_else(|| format_rfc822(now));

        items.push_str(&format!(
            r#"
    <item>
      <title>{title}</title>
      <link>{link}</link>
      <guid isPermaLink="true">{link}</guid>
      <description>{description}</description>
      <pubDate>{pub_date}</pubDate>
    </item>"#,
            title = escape(title.as_str()),
            link = escape(link.as_str()),
            description = escape(description.as_str()),
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>{name}</title>
    <link>{url}</link>
    <description>{description}</description>
    <language>ja</language>
    <lastBuildDate>{build}</lastBuildDate>
    <atom:link href="{url}/feed.xml" rel="self" type="application/rss+xml"/>{items}
  </channel>
</rss>
"#,
        name = escape(site.name.as_str()),
        url = escape(site.url.as_str()),
        description = escape(site.description.as_str()),
        build = format_rfc822(now),
    )
}

/// One `<url>` of a sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub changefreq: &'static str,
    pub priority: f32,
}

impl SitemapEntry {
    pub fn new(loc: impl Into<String>, changefreq: &'static str, priority: f32) -> Self {
        Self {
            loc: loc.into(),
            changefreq,
            priority,
        }
    }
}

/// Sitemap listing `entries` in the given order, all modified `now`.
pub fn render_sitemap(entries: &[SitemapEntry], now: DateTime<Utc>) -> String {
    let lastmod = now.format("%Y-%m-%d");
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for entry in entries {
        out.push_str(&format!(
            "\n  <url>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>",
            escape(entry.loc.as_str()),
            entry.changefreq,
            entry.priority,
        ));
    }
    out.push_str("\n</urlset>\n");
    out
}

pub fn render_robots(site_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {site_url}/sitemap.xml\n")
}
