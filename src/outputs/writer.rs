//! Writes rendered sites to disk.
//!
//! Every file goes through [`write_atomic`], so a reader (or a web server
//! serving the tree) never sees a half-written page.

use crate::config::{Config, NewsConfig};
use crate::models::{Article, Channel};
use crate::outputs::feeds::SitemapEntry;
use crate::outputs::{feeds, html, news_html, page_count, page_file_name, style};
use crate::utils::{channel_slug, ensure_writable_dir, write_atomic};
use chrono::{DateTime, Utc};
use std::error::Error;
use tracing::{info, instrument};

/// What a site write produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteSummary {
    pub index_pages: usize,
    pub detail_pages: usize,
}

/// Regenerate the discovery site from the approved channels.
///
/// # Arguments
///
/// * `approved` - Approved channels in any order; pages list them newest first.
/// * `config` - Site metadata and the output directory.
/// * `now` - Build time shown in footers, the feed and the sitemap.
///
/// # Returns
///
/// How many index and detail pages were written.
#[instrument(level = "info", skip_all, fields(output_dir = %config.paths.output_dir.display(), approved = approved.len()))]
pub async fn write_discovery_site(
    approved: &[Channel],
    config: &Config,
    now: DateTime<Utc>,
) -> Result<SiteSummary, Box<dyn Error>> {
    let site = &config.site;
    let out = &config.paths.output_dir;
    ensure_writable_dir(out).await?;

    let mut sorted: Vec<Channel> = approved.to_vec();
    sorted.sort_by(|a, b| b.sort_key().cmp(a.sort_key()));

    let total_pages = page_count(sorted.len(), site.page_size);
    let mut sitemap = Vec::with_capacity(total_pages + sorted.len());
    for page in 1..=total_pages {
        let page_html = html::render_index_page(site, &sorted, page, total_pages, now);
        write_atomic(&out.join(page_file_name(page)), page_html).await?;
        sitemap.push(if page == 1 {
            SitemapEntry::new(format!("{}/", site.url), "daily", 1.0)
        } else {
            SitemapEntry::new(format!("{}/{}", site.url, page_file_name(page)), "daily", 0.9)
        });
    }

    let detail_dir = out.join("vtuber");
    for channel in &sorted {
        let page_html = html::render_channel_page(site, channel, now);
        let file = detail_dir.join(format!("{}.html", channel_slug(&channel.channel_id)));
        write_atomic(&file, page_html).await?;
        sitemap.push(SitemapEntry::new(html::channel_page_url(site, channel), "weekly", 0.8));
    }

    write_atomic(&out.join("style.css"), style::DISCOVERY_CSS).await?;
    write_atomic(&out.join("feed.xml"), feeds::render_rss(&sorted, site, now)).await?;
    write_atomic(
        &out.join("sitemap.xml"),
        feeds::render_sitemap(&sitemap, now),
    )
    .await?;
    write_atomic(&out.join("robots.txt"), feeds::render_robots(&site.url)).await?;
    write_atomic(&out.join("CNAME"), format!("{}\n", site.domain)).await?;

    let summary = SiteSummary {
        index_pages: total_pages,
        detail_pages: sorted.len(),
    };
    info!(
        index_pages = summary.index_pages,
        detail_pages = summary.detail_pages,
        "Discovery site generated"
    );
    Ok(summary)
}

/// Regenerate the news site from the article cache, newest first.
///
/// # Arguments
///
/// * `articles` - The article cache in display order.
/// * `config` - Page size, output directory and news site metadata.
/// * `now` - Build time shown in footers and the sitemap.
///
/// # Returns
///
/// How many index pages were written; the news site has no detail pages.
#[instrument(level = "info", skip_all, fields(output_dir = %config.output_dir.display(), articles = articles.len()))]
pub async fn write_news_site(
    articles: &[Article],
    config: &NewsConfig,
    now: DateTime<Utc>,
) -> Result<SiteSummary, Box<dyn Error>> {
    let out = &config.output_dir;
    ensure_writable_dir(out).await?;

    let total_pages = page_count(articles.len(), config.page_size);
    let mut sitemap = Vec::with_capacity(total_pages);
    for page in 1..=total_pages {
        let page_html = news_html::render_news_page(config, articles, page, total_pages, now);
        write_atomic(&out.join(page_file_name(page)), page_html).await?;
        sitemap.push(if page == 1 {
            SitemapEntry::new(format!("{}/", config.site_url), "hourly", 1.0)
        } else {
            SitemapEntry::new(format!("{}/{}", config.site_url, page_file_name(page)), "hourly", 0.9)
        });
    }

    write_atomic(&out.join("style.css"), style::NEWS_CSS).await?;
    write_atomic(
        &out.join("sitemap.xml"),
        feeds::render_sitemap(&sitemap, now),
    )
    .await?;
    write_atomic(&out.join("robots.txt"), feeds::render_robots(&config.site_url)).await?;

    info!(pages = total_pages, "News site generated");
    Ok(SiteSummary {
        index_pages: total_pages,
        detail_pages: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChannelStatus;
    use chrono::TimeZone;
    use std::fs;
    use std::path::PathBuf;

    fn tmp_dir(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("vtuber_scout_writer_{}", name));
        let _ = fs::remove_dir_all(&p);
        fs::create_dir_all(&p).unwrap();
        p
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap()
    }

    fn approved(i: usize) -> Channel {
        Channel {
            channel_id: format!("UC{i}"),
            title: format!("チャンネル{i}"),
            status: ChannelStatus::Approved,
            introduction: Some("紹介文".to_string()),
            approved_at: Some(format!("2026-10-{:02}T00:00:00Z", i + 1)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_writes_full_discovery_tree() {
        let dir = tmp_dir("discovery");
        let mut config = Config::default();
        config.paths.output_dir = dir.clone();
        config.site.page_size = 2;

        let channels: Vec<Channel> = (0..3).map(approved).collect();
        let summary = write_discovery_site(&channels, &config, now()).await.unwrap();
        assert_eq!(
            summary,
            SiteSummary {
                index_pages: 2,
                detail_pages: 3
            }
        );

        for name in ["index.html", "page2.html", "style.css", "feed.xml", "sitemap.xml", "robots.txt", "CNAME"] {
            assert!(dir.join(name).exists(), "{name} missing");
        }
        assert!(!dir.join("page3.html").exists());
        for channel in &channels {
            let file = dir.join("vtuber").join(format!("{}.html", channel_slug(&channel.channel_id)));
            assert!(file.exists());
        }

        // Newest approval leads page 1.
        let index = fs::read_to_string(dir.join("index.html")).unwrap();
        assert!(index.contains("チャンネル2"));
        assert!(index.contains("チャンネル1"));
        assert!(!index.contains("チャンネル0"));

        let cname = fs::read_to_string(dir.join("CNAME")).unwrap();
        assert_eq!(cname.trim(), "vtuber-matome.net");
        let sitemap = fs::read_to_string(dir.join("sitemap.xml")).unwrap();
        assert_eq!(sitemap.matches("<url>").count(), 5);
        assert!(sitemap.contains(
            "<loc>https://vtuber-matome.net/</loc>\n    <lastmod>2026-10-18</lastmod>\n    <changefreq>daily</changefreq>\n    <priority>1.0</priority>"
        ));
        assert_eq!(sitemap.matches("<changefreq>weekly</changefreq>").count(), 3);
        assert_eq!(sitemap.matches("<priority>0.8</priority>").count(), 3);
        assert!(!dir.join("index.html.tmp").exists());
    }

    #[tokio::test]
    async fn test_empty_discovery_site_has_one_page() {
        let dir = tmp_dir("empty");
        let mut config = Config::default();
        config.paths.output_dir = dir.clone();

        let summary = write_discovery_site(&[], &config, now()).await.unwrap();
        assert_eq!(summary.index_pages, 1);
        let index = fs::read_to_string(dir.join("index.html")).unwrap();
        assert!(index.contains("empty-state"));
    }

    #[tokio::test]
    async fn test_news_site_is_two_pages_at_cap() {
        let dir = tmp_dir("news");
        let config = NewsConfig {
            output_dir: dir.clone(),
            ..NewsConfig::default()
        };
        let articles: Vec<Article> = (0..config.max_items)
            .map(|i| Article {
                id: format!("{i}"),
                title: format!("記事{i}"),
                url: format!("https://example.com/{i}"),
                site: "PANORA".to_string(),
                site_key: "panora".to_string(),
                time_text: String::new(),
                fetched_at: String::new(),
            })
            .collect();

        let summary = write_news_site(&articles, &config, now()).await.unwrap();
        assert_eq!(summary.index_pages, 2);
        assert!(dir.join("index.html").exists());
        assert!(dir.join("page2.html").exists());
        assert!(!dir.join("page3.html").exists());
        assert!(dir.join("style.css").exists());
    }
}
