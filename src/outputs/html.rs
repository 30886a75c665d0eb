//! HTML pages of the discovery site.
//!
//! Every user-supplied field goes through [`escape_html`] (body text) or
//! [`escape_attr`] (attribute values) before it is embedded.

use crate::config::SiteConfig;
use crate::models::Channel;
use crate::outputs::{page_slice, render_pagination};
use crate::utils::{
    channel_slug, escape_attr, escape_html, format_date_jp, format_subscriber_count, take_chars,
};
use chrono::{DateTime, FixedOffset, Utc};

const PLACEHOLDER_AVATAR: &str = "data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 width=%2264%22 height=%2264%22><rect fill=%22%236C5CE7%22 width=%2264%22 height=%2264%22 rx=%2232%22/><text x=%2232%22 y=%2240%22 fill=%22white%22 text-anchor=%22middle%22 font-size=%2224%22>?</text></svg>";

/// Videos listed on a card or embedded on a detail page.
const VIDEOS_SHOWN: usize = 3;

/// Where the page sits relative to the site root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Root,
    Channel,
}

impl Depth {
    fn prefix(self) -> &'static str {
        match self {
            Self::Root => "",
            Self::Channel => "../",
        }
    }
}

/// Public URL of a channel's detail page.
pub fn channel_page_url(site: &SiteConfig, channel: &Channel) -> String {
    format!("{}/vtuber/{}.html", site.url, channel_slug(&channel.channel_id))
}

fn display_name(channel: &Channel) -> &str {
    if channel.title.is_empty() {
        "名前不明"
    } else {
        &channel.title
    }
}

pub fn render_head(
    site: &SiteConfig,
    title: &str,
    description: &str,
    url: &str,
    og_image: &str,
    depth: Depth,
) -> String {
    let title = escape_attr(title);
    let description = escape_attr(description);
    let url = escape_attr(url);

    let mut head = format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <meta name="description" content="{description}">
  <meta property="og:title" content="{title}">
  <meta property="og:description" content="{description}">
  <meta property="og:type" content="website">
  <meta property="og:url" content="{url}">
"#
    );
    if !og_image.is_empty() {
        head.push_str(&format!(
            "  <meta property=\"og:image\" content=\"{}\">\n",
            escape_attr(og_image)
        ));
    }
    head.push_str(&format!(
        r#"  <meta name="twitter:card" content="summary_large_image">
  <meta name="twitter:title" content="{title}">
  <meta name="twitter:description" content="{description}">
  <link rel="canonical" href="{url}">
  <link rel="alternate" type="application/rss+xml" title="{name}" href="{site_url}/feed.xml">
  <link rel="stylesheet" href="{prefix}style.css">
"#,
        name = escape_attr(&site.name),
        site_url = escape_attr(&site.url),
        prefix = depth.prefix(),
    ));
    if let Some(id) = site.analytics_id.as_deref().filter(|id| !id.is_empty()) {
        let id = escape_attr(id);
        head.push_str(&format!(
            r#"  <script async src="https://www.googletagmanager.com/gtag/js?id={id}"></script>
  <script>
    window.dataLayer = window.dataLayer || [];
    function gtag(){{dataLayer.push(arguments);}}
    gtag('js', new Date());
    gtag('config', '{id}');
  </script>
"#
        ));
    }
    head.push_str("</head>");
    head
}

pub fn render_header(site: &SiteConfig) -> String {
    format!(
        r#"<header class="header">
  <h1>{}</h1>
  <p>{}</p>
</header>"#,
        escape_html(&site.name),
        escape_html(&site.tagline)
    )
}

pub fn render_footer(site: &SiteConfig, now: DateTime<Utc>) -> String {
    let jst = FixedOffset::east_opt(9 * 3600).map(|tz| now.with_timezone(&tz));
    let updated = jst
        .map(|t| t.format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        r#"<footer class="footer">
  <p>{name} | 最終更新: {updated} JST</p>
  <p>お問い合わせ・掲載削除依頼は<a href="mailto:{email}">こちら</a></p>
  <p class="notice">当サイトはYouTubeの公開データをもとに新人VTuberを紹介しています。</p>
</footer>"#,
        name = escape_html(&site.name),
        email = escape_attr(&site.contact_email),
    )
}

pub fn render_ad_space() -> String {
    r#"<div class="ad-space">📢 広告スペース</div>"#.to_string()
}

fn render_meta(channel: &Channel) -> String {
    let mut parts = Vec::new();
    if channel.subscribers_hidden() {
        parts.push("<span>📊 非公開</span>".to_string());
    } else if channel.subscriber_count > 0 {
        parts.push(format!(
            "<span>📊 {}</span>",
            format_subscriber_count(channel.subscriber_count)
        ));
    }
    let created = format_date_jp(&channel.published_at);
    if !created.is_empty() {
        parts.push(format!("<span>📅 {created}\u{00A0}開設</span>"));
    }
    parts.join("\n          ")
}

/// One channel card on an index page. `index` staggers the entry animation.
pub fn render_card(channel: &Channel, index: usize) -> String {
    let name = display_name(channel);
    let channel_url = escape_attr(&channel.channel_url());
    let detail_href = format!("vtuber/{}.html", channel_slug(&channel.channel_id));

    let intro_html = channel
        .introduction
        .as_deref()
        .filter(|i| !i.is_empty())
        .map(|i| format!(r#"<div class="card-intro">{}</div>"#, escape_html(i)))
        .unwrap_or_default();

    let videos_html = if channel.latest_videos.is_empty() {
        String::new()
    } else {
        let links: String = channel
            .latest_videos
            .iter()
            .take(VIDEOS_SHOWN)
            .map(|v| {
                format!(
                    "        <a href=\"{}\" target=\"_blank\" rel=\"noopener\" class=\"video-link\">▶ {}</a>\n",
                    escape_attr(&v.watch_url()),
                    escape_html(&v.title)
                )
            })
            .collect();
        format!(
            r#"
      <div class="card-videos">
        <div class="card-videos-title">最近の動画</div>
{links}      </div>"#
        )
    };

    format!(
        r#"
    <article class="vtuber-card" style="animation-delay: {delay:.2}s">
      <div class="card-header">
        <img src="{thumbnail}" alt="{alt}" class="card-thumbnail" loading="lazy"
             onerror="this.src='{PLACEHOLDER_AVATAR}'">
        <div class="card-info">
          <div class="card-name">
            <a href="{detail_href}">{name}</a>
          </div>
          <div class="card-meta">
            {meta}
          </div>
        </div>
      </div>
      {intro_html}{videos_html}
      <a href="{channel_url}" target="_blank" rel="noopener" class="card-cta">チャンネルを見る →</a>
    </article>"#,
        delay = index as f64 * 0.05,
        thumbnail = escape_attr(&channel.thumbnail),
        alt = escape_attr(name),
        name = escape_html(name),
        meta = render_meta(channel),
    )
}

/// Index page `page` of `total_pages`; `channels` is the full, sorted list.
pub fn render_index_page(
    site: &SiteConfig,
    channels: &[Channel],
    page: usize,
    total_pages: usize,
    now: DateTime<Utc>,
) -> String {
    let page_items = page_slice(channels, page, site.page_size);

    let mut cards = String::new();
    for (i, channel) in page_items.iter().enumerate() {
        cards.push_str(&render_card(channel, i));
        let is_last = i + 1 == page_items.len();
        if site.ad_interval > 0 && (i + 1) % site.ad_interval == 0 && !is_last {
            cards.push_str("\n    ");
            cards.push_str(&render_ad_space());
        }
    }
    if page_items.is_empty() {
        cards = r#"
    <div class="empty-state">
      <div class="emoji">🔍</div>
      <p>まだ紹介済みのVTuberがいません。</p>
      <p>まもなく新人VTuberの紹介が始まります！</p>
    </div>"#
            .to_string();
    }

    let title = format!("{} - {}", site.name, site.tagline);
    let page_url = if page <= 1 {
        site.url.clone()
    } else {
        format!("{}/page{}.html", site.url, page)
    };

    format!(
        r#"{head}
<body>
  {header}
  <main class="container">
    <div class="section-title">✨ 新人VTuber紹介（{count}人）</div>
    {cards}
    {pagination}
  </main>
  {footer}
</body>
</html>"#,
        head = render_head(site, &title, &site.description, &page_url, "", Depth::Root),
        header = render_header(site),
        count = channels.len(),
        pagination = render_pagination(page, total_pages),
        footer = render_footer(site, now),
    )
}

/// Detail page of one approved channel.
pub fn render_channel_page(site: &SiteConfig, channel: &Channel, now: DateTime<Utc>) -> String {
    let name = display_name(channel);
    let intro = channel.introduction.as_deref().unwrap_or("");
    let title = format!("【新人VTuber】{}さんがデビュー！ | {}", name, site.name);
    let description = if intro.is_empty() {
        format!("{name}さんの紹介ページ")
    } else {
        take_chars(intro, 120)
    };
    let page_url = channel_page_url(site, channel);

    let videos_html = if channel.latest_videos.is_empty() {
        String::new()
    } else {
        let embeds: String = channel
            .latest_videos
            .iter()
            .take(VIDEOS_SHOWN)
            .map(|v| {
                format!(
                    r#"
    <div class="video-embed">
      <iframe src="{}" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen loading="lazy"></iframe>
    </div>
    <p class="video-caption">{}</p>"#,
                    escape_attr(&v.embed_url()),
                    escape_html(&v.title)
                )
            })
            .collect();
        format!(
            r#"
    <div class="section-title">🎬 最近の動画</div>{embeds}"#
        )
    };

    format!(
        r#"{head}
<body>
  {header}
  <main class="container">
    <a href="../index.html" class="back-link">← トップに戻る</a>

    <article class="vtuber-card" style="animation-delay:0s">
      <div class="card-header">
        <img src="{thumbnail}" alt="{alt}" class="card-thumbnail" loading="lazy">
        <div class="card-info">
          <div class="card-name" style="font-size:1.3rem;">{name_html}</div>
          <div class="card-meta">
            {meta}
          </div>
        </div>
      </div>
      <div class="card-intro" style="font-size:1rem;">{intro_html}</div>
      <a href="{channel_url}" target="_blank" rel="noopener" class="card-cta">チャンネルを見る →</a>
    </article>
{videos_html}
    {ad}
  </main>
  {footer}
</body>
</html>"#,
        head = render_head(
            site,
            &title,
            &description,
            &page_url,
            &channel.thumbnail,
            Depth::Channel
        ),
        header = render_header(site),
        thumbnail = escape_attr(&channel.thumbnail),
        alt = escape_attr(name),
        name_html = escape_html(name),
        meta = render_meta(channel),
        intro_html = escape_html(intro),
        channel_url = escape_attr(&channel.channel_url()),
        ad = render_ad_space(),
        footer = render_footer(site, now),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelStatus, RecentVideo};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 15, 30, 0).unwrap()
    }

    fn approved(id: &str, intro: &str) -> Channel {
        Channel {
            channel_id: id.to_string(),
            title: format!("{id}ちゃん"),
            thumbnail: "https://yt3.example/t.jpg".to_string(),
            published_at: "2026-09-01T00:00:00Z".to_string(),
            subscriber_count: 1500,
            status: ChannelStatus::Approved,
            introduction: Some(intro.to_string()),
            approved_at: Some("2026-10-10T00:00:00Z".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_card_escapes_user_text() {
        let mut channel = approved("UC1", "a < b & c > d\n次の行");
        channel.title = "<b>bold</b>".to_string();
        channel.latest_videos = vec![RecentVideo {
            video_id: "v1".to_string(),
            title: "<script>x</script>".to_string(),
            ..Default::default()
        }];

        let html = render_card(&channel, 0);
        assert!(html.contains("a &lt; b &amp; c &gt; d<br>次の行"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("▶ &lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>bold"));
    }

    #[test]
    fn test_card_meta() {
        let html = render_card(&approved("UC1", ""), 2);
        assert!(html.contains("📊 1.5千人"));
        assert!(html.contains("2026年09月01日"));
        assert!(html.contains("animation-delay: 0.10s"));
        assert!(!html.contains("card-intro"));

        let mut hidden = approved("UC2", "");
        hidden.subscriber_count = -1;
        assert!(render_card(&hidden, 0).contains("📊 非公開"));
    }

    #[test]
    fn test_index_page_empty_state() {
        let site = SiteConfig::default();
        let html = render_index_page(&site, &[], 1, 1, now());
        assert!(html.contains("まだ紹介済みのVTuberがいません。"));
        assert!(html.contains("新人VTuber紹介（0人）"));
        assert!(!html.contains("class=\"pagination\""));
    }

    #[test]
    fn test_index_page_slices_and_inserts_ads() {
        let site = SiteConfig {
            page_size: 6,
            ad_interval: 5,
            ..SiteConfig::default()
        };
        let channels: Vec<Channel> = (0..8).map(|i| approved(&format!("UC{i}"), "")).collect();

        let first = render_index_page(&site, &channels, 1, 2, now());
        assert_eq!(first.matches("class=\"vtuber-card\"").count(), 6);
        assert_eq!(first.matches("class=\"ad-space\"").count(), 1);
        assert!(first.contains(r#"<link rel="canonical" href="https://vtuber-matome.net">"#));

        let second = render_index_page(&site, &channels, 2, 2, now());
        assert_eq!(second.matches("class=\"vtuber-card\"").count(), 2);
        assert!(second.contains("https://vtuber-matome.net/page2.html"));
        assert!(second.contains("UC7ちゃん"));
    }

    #[test]
    fn test_footer_uses_jst() {
        let footer = render_footer(&SiteConfig::default(), now());
        assert!(footer.contains("最終更新: 2026/10/19 00:30 JST"));
    }

    #[test]
    fn test_channel_page() {
        let mut channel = approved("UC9", "はじめまして！\n歌が得意です");
        channel.latest_videos = vec![RecentVideo {
            video_id: "abc".to_string(),
            title: "初配信".to_string(),
            ..Default::default()
        }];
        let site = SiteConfig::default();

        let html = render_channel_page(&site, &channel, now());
        assert!(html.contains("【新人VTuber】UC9ちゃんさんがデビュー！"));
        assert!(html.contains("はじめまして！<br>歌が得意です"));
        assert!(html.contains("https://www.youtube.com/embed/abc"));
        assert!(html.contains(r#"href="../style.css""#));
        assert!(html.contains(&channel_page_url(&site, &channel)));
        assert!(html.contains(r#"<meta property="og:image" content="https://yt3.example/t.jpg">"#));
    }

    #[test]
    fn test_head_without_analytics() {
        let site = SiteConfig {
            analytics_id: None,
            ..SiteConfig::default()
        };
        let head = render_head(&site, "t \"q\"", "d", "https://x", "", Depth::Root);
        assert!(!head.contains("googletagmanager"));
        assert!(head.contains("<title>t &quot;q&quot;</title>"));
        assert!(!head.contains("og:image"));
    }
}
