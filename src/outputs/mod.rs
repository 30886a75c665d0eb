//! Rendering of the static sites.
//!
//! Everything under this module is a pure function from records to text,
//! except [`writer`], which places the rendered documents on disk.
//!
//! # Submodules
//!
//! - [`html`]: discovery site pages (index pages and one page per channel)
//! - [`news_html`]: news site pages
//! - [`feeds`]: RSS feed, sitemap and robots file
//! - [`style`]: stylesheets
//! - [`writer`]: writes a whole site tree
//!
//! # Output Structure
//!
//! ```text
//! docs/
//! ├── index.html        # page 1
//! ├── page2.html        # page 2, 3, ...
//! ├── vtuber/
//! │   └── 1a2b3c4d.html # one per approved channel
//! ├── style.css
//! ├── feed.xml
//! ├── sitemap.xml
//! ├── robots.txt
//! └── CNAME
//! ```

pub mod feeds;
pub mod html;
pub mod news_html;
pub mod style;
pub mod writer;

/// Number of index pages for `total` records; never less than one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// File name of 1-based page `page`.
pub fn page_file_name(page: usize) -> String {
    if page <= 1 {
        "index.html".to_string()
    } else {
        format!("page{page}.html")
    }
}

/// Records shown on 1-based page `page`.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Page navigation; empty when there is a single page.
pub fn render_pagination(current_page: usize, total_pages: usize) -> String {
    if total_pages <= 1 {
        return String::new();
    }

    let mut parts = vec![r#"<div class="pagination">"#.to_string()];
    for page in 1..=total_pages {
        if page == current_page {
            parts.push(format!(r#"  <span class="current">{page}</span>"#));
        } else {
            parts.push(format!(r#"  <a href="{}">{page}</a>"#, page_file_name(page)));
        }
    }
    parts.push("</div>".to_string());
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 20), 1);
        assert_eq!(page_count(1, 20), 1);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(21, 20), 2);
        assert_eq!(page_count(100, 50), 2);
    }

    #[test]
    fn test_page_file_names() {
        assert_eq!(page_file_name(1), "index.html");
        assert_eq!(page_file_name(2), "page2.html");
        assert_eq!(page_file_name(10), "page10.html");
    }

    #[test]
    fn test_pages_concatenate_to_full_list() {
        for total in [0usize, 1, 19, 20, 21, 45, 60] {
            let items: Vec<usize> = (0..total).collect();
            let pages = page_count(total, 20);
            assert_eq!(pages, std::cmp::max(1, total.div_ceil(20)));

            let joined: Vec<usize> = (1..=pages)
                .flat_map(|p| page_slice(&items, p, 20).iter().copied())
                .collect();
            assert_eq!(joined, items, "total {total}");
        }
    }

    #[test]
    fn test_page_slice_out_of_range_is_empty() {
        let items = [1, 2, 3];
        assert!(page_slice(&items, 5, 2).is_empty());
    }

    #[test]
    fn test_render_pagination() {
        assert_eq!(render_pagination(1, 1), "");
        let nav = render_pagination(2, 3);
        assert!(nav.contains(r#"<a href="index.html">1</a>"#));
        assert!(nav.contains(r#"<span class="current">2</span>"#));
        assert!(nav.contains(r#"<a href="page3.html">3</a>"#));
    }
}
