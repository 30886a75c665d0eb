//! Stylesheets for the generated sites.

/// `style.css` of the discovery site.
pub const DISCOVERY_CSS: &str = r#":root {
  --primary: #6C5CE7;
  --primary-light: #A29BFE;
  --accent: #FD79A8;
  --accent-light: #FDCB6E;
  --bg: #F8F9FA;
  --card-bg: #FFFFFF;
  --text: #2D3436;
  --text-light: #636E72;
  --border: #E9ECEF;
  --shadow: 0 2px 12px rgba(0,0,0,0.08);
  --shadow-hover: 0 8px 25px rgba(108,92,231,0.15);
  --radius: 12px;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
  font-family: "Hiragino Kaku Gothic ProN", "Noto Sans JP", "Segoe UI", sans-serif;
  background: var(--bg);
  color: var(--text);
  line-height: 1.7;
  min-height: 100vh;
}

.header {
  background: linear-gradient(135deg, var(--primary), #4834D4);
  color: white;
  padding: 2rem 1rem;
  text-align: center;
  position: relative;
  overflow: hidden;
}
.header::before {
  content: '';
  position: absolute;
  top: -50%;
  left: -50%;
  width: 200%;
  height: 200%;
  background: radial-gradient(circle, rgba(255,255,255,0.1) 0%, transparent 70%);
  animation: pulse 4s ease-in-out infinite;
}
@keyframes pulse {
  0%, 100% { transform: scale(1); opacity: 0.5; }
  50% { transform: scale(1.1); opacity: 1; }
}
.header h1 {
  font-size: 1.8rem;
  position: relative;
  z-index: 1;
  text-shadow: 0 2px 4px rgba(0,0,0,0.2);
}
.header p {
  font-size: 0.95rem;
  opacity: 0.9;
  margin-top: 0.5rem;
  position: relative;
  z-index: 1;
}

.container {
  max-width: 800px;
  margin: 0 auto;
  padding: 1.5rem 1rem;
}

.section-title {
  font-size: 1.2rem;
  color: var(--primary);
  margin: 2rem 0 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 2px solid var(--primary-light);
  display: flex;
  align-items: center;
  gap: 0.5rem;
}

.vtuber-card {
  background: var(--card-bg);
  border-radius: var(--radius);
  box-shadow: var(--shadow);
  padding: 1.2rem;
  margin-bottom: 1rem;
  transition: all 0.3s ease;
  border: 1px solid var(--border);
  animation: fadeInUp 0.5s ease both;
}
.vtuber-card:hover {
  box-shadow: var(--shadow-hover);
  transform: translateY(-2px);
  border-color: var(--primary-light);
}
@keyframes fadeInUp {
  from { opacity: 0; transform: translateY(20px); }
  to { opacity: 1; transform: translateY(0); }
}

.card-header { display: flex; gap: 1rem; align-items: flex-start; }
.card-thumbnail {
  width: 64px;
  height: 64px;
  border-radius: 50%;
  object-fit: cover;
  border: 3px solid var(--primary-light);
  flex-shrink: 0;
}
.card-info { flex: 1; min-width: 0; }
.card-name {
  font-size: 1.1rem;
  font-weight: bold;
  color: var(--text);
  margin-bottom: 0.25rem;
}
.card-name a { color: inherit; text-decoration: none; }
.card-name a:hover { color: var(--primary); }
.card-meta {
  display: flex;
  flex-wrap: wrap;
  gap: 0.5rem;
  font-size: 0.8rem;
  color: var(--text-light);
  margin-bottom: 0.5rem;
}
.card-meta span { display: inline-flex; align-items: center; gap: 0.2rem; }
.card-intro {
  font-size: 0.9rem;
  color: var(--text);
  line-height: 1.8;
  margin-top: 0.75rem;
  padding-top: 0.75rem;
  border-top: 1px solid var(--border);
}

.card-videos {
  margin-top: 0.75rem;
  padding-top: 0.75rem;
  border-top: 1px solid var(--border);
}
.card-videos-title { font-size: 0.8rem; color: var(--text-light); margin-bottom: 0.5rem; }
.video-link {
  display: block;
  font-size: 0.85rem;
  color: var(--primary);
  text-decoration: none;
  padding: 0.3rem 0;
  white-space: nowrap;
  overflow: hidden;
  text-overflow: ellipsis;
}
.video-link:hover { text-decoration: underline; }
.video-embed {
  position: relative;
  padding-bottom: 56.25%;
  height: 0;
  overflow: hidden;
  border-radius: 8px;
}
.video-embed iframe { position: absolute; top: 0; left: 0; width: 100%; height: 100%; border: 0; }
.video-caption { font-size: 0.85rem; color: var(--text-light); margin: 0.5rem 0 1rem; }

.card-cta {
  display: inline-block;
  margin-top: 0.75rem;
  padding: 0.5rem 1.2rem;
  background: linear-gradient(135deg, var(--accent), #E84393);
  color: white;
  border-radius: 2rem;
  text-decoration: none;
  font-size: 0.85rem;
  font-weight: bold;
  transition: all 0.3s ease;
}
.card-cta:hover {
  transform: translateY(-1px);
  box-shadow: 0 4px 12px rgba(253,121,168,0.4);
}
.back-link { display: inline-block; margin-bottom: 1rem; color: var(--primary); text-decoration: none; }

.ad-space {
  background: linear-gradient(135deg, #FFF3E0, #FFE0B2);
  border: 1px dashed #FFB74D;
  border-radius: var(--radius);
  padding: 1.5rem;
  margin: 1.5rem 0;
  text-align: center;
  color: #F57C00;
  font-size: 0.8rem;
}

.pagination { display: flex; justify-content: center; gap: 0.5rem; margin: 2rem 0; }
.pagination a, .pagination span {
  display: inline-block;
  padding: 0.5rem 1rem;
  border-radius: var(--radius);
  text-decoration: none;
  font-size: 0.9rem;
  border: 1px solid var(--border);
}
.pagination a { color: var(--primary); background: white; }
.pagination a:hover { background: var(--primary); color: white; }
.pagination .current { background: var(--primary); color: white; border-color: var(--primary); }

.footer {
  background: linear-gradient(135deg, #2D3436, #636E72);
  color: white;
  text-align: center;
  padding: 1.5rem 1rem;
  margin-top: 3rem;
  font-size: 0.8rem;
}
.footer a { color: var(--primary-light); text-decoration: none; }
.footer a:hover { text-decoration: underline; }
.footer .notice { margin-top: 0.5rem; font-size: 0.7rem; opacity: 0.7; }

.empty-state { text-align: center; padding: 3rem 1rem; color: var(--text-light); }
.empty-state .emoji { font-size: 3rem; margin-bottom: 1rem; }

@media (max-width: 600px) {
  .header h1 { font-size: 1.4rem; }
  .card-thumbnail { width: 48px; height: 48px; }
  .card-meta { font-size: 0.75rem; }
}
"#;

/// `style.css` of the news site.
pub const NEWS_CSS: &str = r#":root {
  --primary: #0984E3;
  --bg: #F5F6FA;
  --text: #2D3436;
  --text-light: #636E72;
  --border: #DFE6E9;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
  font-family: "Hiragino Kaku Gothic ProN", "Noto Sans JP", "Segoe UI", sans-serif;
  background: var(--bg);
  color: var(--text);
  line-height: 1.6;
}

.header { background: var(--primary); color: white; padding: 1.5rem 1rem; text-align: center; }
.header h1 { font-size: 1.5rem; }
.container { max-width: 760px; margin: 0 auto; padding: 1rem; }

.news-list { list-style: none; }
.news-item {
  background: white;
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 0.75rem 1rem;
  margin-bottom: 0.5rem;
}
.news-item a { color: var(--text); text-decoration: none; font-weight: bold; }
.news-item a:hover { color: var(--primary); }
.news-meta { font-size: 0.75rem; color: var(--text-light); margin-top: 0.25rem; display: flex; gap: 0.75rem; }
.news-site { color: var(--primary); }

.pagination { display: flex; justify-content: center; gap: 0.5rem; margin: 1.5rem 0; }
.pagination a, .pagination span {
  padding: 0.4rem 0.9rem;
  border: 1px solid var(--border);
  border-radius: 6px;
  text-decoration: none;
}
.pagination a { color: var(--primary); background: white; }
.pagination .current { background: var(--primary); color: white; }

.empty-state { text-align: center; padding: 3rem 1rem; color: var(--text-light); }
.footer { text-align: center; font-size: 0.75rem; color: var(--text-light); padding: 2rem 1rem; }
"#;
