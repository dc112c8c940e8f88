//! Server-side page rendering.
//!
//! Articles are markdown objects in the content store. A page is the article
//! converted to HTML, wrapped in the site layout: sidebar navigation built
//! from the manifest, the search widget, and asset links carrying a version
//! stamp so browsers refetch them after every deploy.

use chrono::Utc;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::content::manifest::ArticleRef;
use crate::content::{ContentStore, Manifest, validate_key};
use crate::error::RenderError;

pub mod markdown;

pub use markdown::{escape_html, markdown_to_html};

/// Server start time, used as the default asset version.
static START_STAMP: Lazy<String> = Lazy::new(|| Utc::now().format("%Y%m%d%H%M%S").to_string());

pub fn default_asset_version() -> String {
    START_STAMP.clone()
}

/// A rendered HTML document.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub html: String,
}

pub struct Site {
    store: Arc<dyn ContentStore>,
    title: String,
    asset_version: String,
}

impl Site {
    pub fn new(store: Arc<dyn ContentStore>, title: impl Into<String>, asset_version: Option<String>) -> Self {
        Self {
            store,
            title: title.into(),
            asset_version: asset_version.unwrap_or_else(default_asset_version),
        }
    }

    pub fn asset_version(&self) -> &str {
        &self.asset_version
    }

    /// `/assets/<name>?v=<version>`
    pub fn asset_url(&self, name: &str) -> String {
        format!("/assets/{}?v={}", name, self.asset_version)
    }

    async fn manifest(&self) -> Result<Manifest, RenderError> {
        Ok(Manifest::load(self.store.as_ref()).await?)
    }

    fn site_title<'a>(&'a self, manifest: &'a Manifest) -> &'a str {
        manifest.title.as_deref().unwrap_or(&self.title)
    }

    pub async fn render_article(&self, slug: &str) -> Result<Page, RenderError> {
        let slug = slug.trim_matches('/');
        validate_key(slug)?;

        let manifest = self.manifest().await?;
        // search hits link by object key, which differs from the slug when an article sets `path`
        let key_guess = format!("{slug}.md");
        let article = manifest
            .find(slug)
            .or_else(|| manifest.find_by_key(&key_guess))
            .ok_or_else(|| RenderError::NotFound(slug.to_string()))?;

        let key = article.key();
        let bytes = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| RenderError::NotFound(key.clone()))?;
        let body = markdown_to_html(&String::from_utf8_lossy(&bytes));

        let title = format!("{} | {}", article.article.title, self.site_title(&manifest));
        let html = self.layout(&manifest, &title, Some(&article.slug()), &body);
        Ok(Page { title, html })
    }

    pub async fn render_index(&self) -> Result<Page, RenderError> {
        let manifest = self.manifest().await?;
        let site_title = self.site_title(&manifest).to_string();

        let mut body = format!("<h1>{}</h1>\n", escape_html(&site_title));
        for folder in &manifest.folders {
            if !folder.name.is_empty() {
                body.push_str(&format!("<h2>{}</h2>\n", escape_html(&folder.name)));
            }
            body.push_str("<ul class=\"article-list\">\n");
            for article in &folder.articles {
                let slug = ArticleRef { folder, article }.slug();
                body.push_str(&format!(
                    "<li><a href=\"/docs/{}\">{}</a></li>\n",
                    escape_html(&slug),
                    escape_html(&article.title)
                ));
            }
            body.push_str("</ul>\n");
        }

        let html = self.layout(&manifest, &site_title, None, &body);
        Ok(Page {
            title: site_title,
            html,
        })
    }

    /// The 404 page. Falls back to a bare layout when the manifest cannot be read.
    pub async fn render_not_found(&self) -> Page {
        let manifest = self.manifest().await.unwrap_or_default();
        let title = format!("Not found | {}", self.site_title(&manifest));
        let body = "<h1>Page not found</h1>\n<p>The page you requested does not exist. \
                    Try the search box or the navigation.</p>\n";
        let html = self.layout(&manifest, &title, None, body);
        Page { title, html }
    }

    fn layout(&self, manifest: &Manifest, title: &str, current: Option<&str>, body: &str) -> String {
        let mut nav = String::new();
        for folder in &manifest.folders {
            nav.push_str("<section class=\"nav-folder\">\n");
            if !folder.name.is_empty() {
                nav.push_str(&format!("<h3>{}</h3>\n", escape_html(&folder.name)));
            }
            nav.push_str("<ul>\n");
            for article in &folder.articles {
                let slug = ArticleRef { folder, article }.slug();
                let class = if current == Some(slug.as_str()) {
                    " class=\"current\" aria-current=\"page\""
                } else {
                    ""
                };
                nav.push_str(&format!(
                    "<li><a href=\"/docs/{}\"{}>{}</a></li>\n",
                    escape_html(&slug),
                    class,
                    escape_html(&article.title)
                ));
            }
            nav.push_str("</ul>\n</section>\n");
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{css}">
</head>
<body>
<header class="site-header">
<a class="site-title" href="/">{site_title}</a>
<div id="search" class="search">
<input id="search-input" type="search" placeholder="Search documentation" autocomplete="off" aria-label="Search documentation">
<ul id="search-results" class="search-results" hidden></ul>
</div>
</header>
<div class="site-body">
<nav class="sidebar">
{nav}</nav>
<main class="content">
{body}</main>
</div>
<script src="{js}" defer></script>
</body>
</html>
"#,
            title = escape_html(title),
            css = escape_html(&self.asset_url("site.css")),
            js = escape_html(&self.asset_url("search.js")),
            site_title = escape_html(self.site_title(manifest)),
            nav = nav,
            body = body,
        )
    }
}
