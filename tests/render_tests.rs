use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use docsite::content::{ContentStore, FsContentStore, Manifest};
use docsite::error::RenderError;
use docsite::render::{Site, default_asset_version};

mod test_helpers {
    use super::*;

    pub fn write(root: &Path, key: &str, contents: &str) {
        let path = root.join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn content_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "manifest.json",
            r#"{
                "title": "Acme <Docs>",
                "folders": [
                    {"name": "Guides", "slug": "guides", "articles": [
                        {"title": "Deploy", "slug": "deploy"},
                        {"title": "Ghost", "slug": "ghost"}
                    ]},
                    {"name": "Reference", "slug": "reference", "articles": [
                        {"title": "Search API", "slug": "search", "path": "api/search.md"}
                    ]}
                ]
            }"#,
        );
        write(dir.path(), "guides/deploy.md", "# Deploy\n\n- [x] build\n- [ ] ship\n");
        write(dir.path(), "api/search.md", "POST `/api/search`\n");
        dir
    }

    pub fn site(dir: &TempDir, version: Option<&str>) -> Site {
        Site::new(
            Arc::new(FsContentStore::new(dir.path())),
            "Fallback Title",
            version.map(str::to_string),
        )
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_article_uses_manifest_titles_and_marks_current() -> Result<()> {
    let dir = content_dir();
    let site = site(&dir, Some("7"));

    let page = site.render_article("guides/deploy").await?;

    assert_eq!(page.title, "Deploy | Acme <Docs>");
    assert!(page.html.contains("<title>Deploy | Acme &lt;Docs&gt;</title>"));
    assert!(page.html.contains("<h1>Deploy</h1>"));
    assert!(page.html.contains("type=\"checkbox\""));
    assert!(
        page.html
            .contains("<a href=\"/docs/guides/deploy\" class=\"current\" aria-current=\"page\">Deploy</a>")
    );
    assert!(page.html.contains("<a href=\"/docs/reference/search\">Search API</a>"));
    assert!(page.html.contains("href=\"/assets/site.css?v=7\""));
    assert!(page.html.contains("src=\"/assets/search.js?v=7\""));
    Ok(())
}

#[tokio::test]
async fn test_explicit_article_path() -> Result<()> {
    let dir = content_dir();
    let page = site(&dir, None).render_article("/reference/search/").await?;
    assert!(page.html.contains("<code>/api/search</code>"));
    Ok(())
}

#[tokio::test]
async fn test_article_reachable_by_object_key() -> Result<()> {
    let dir = content_dir();
    let site = site(&dir, None);

    // the widget links hits as /docs/<filename without .md>
    let page = site.render_article("api/search").await?;
    assert_eq!(page.title, "Search API | Acme <Docs>");
    assert!(page.html.contains("<code>/api/search</code>"));
    assert!(page.html.contains(
        "<a href=\"/docs/reference/search\" class=\"current\" aria-current=\"page\">Search API</a>"
    ));
    Ok(())
}

#[tokio::test]
async fn test_missing_articles_are_not_found() -> Result<()> {
    let dir = content_dir();
    let site = site(&dir, None);

    for slug in ["guides/ghost", "guides/nope", "", "../secrets"] {
        let err = site.render_article(slug).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND, "{slug}");
    }
    assert!(matches!(
        site.render_article("guides/ghost").await,
        Err(RenderError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_index_lists_every_article() -> Result<()> {
    let dir = content_dir();
    let page = site(&dir, None).render_index().await?;

    assert_eq!(page.title, "Acme <Docs>");
    assert!(page.html.contains("<h2>Guides</h2>"));
    assert!(page.html.contains("<h2>Reference</h2>"));
    assert!(page.html.contains("<li><a href=\"/docs/guides/ghost\">Ghost</a></li>"));
    Ok(())
}

#[tokio::test]
async fn test_malformed_manifest_is_a_server_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "manifest.json", "{ not json");
    let site = site(&dir, None);

    let err = site.render_index().await.unwrap_err();
    assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

    // the 404 page still renders
    let page = site.render_not_found().await;
    assert!(page.html.contains("Page not found"));
    assert_eq!(page.title, "Not found | Fallback Title");
    Ok(())
}

#[tokio::test]
async fn test_manifest_derived_without_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "welcome.md", "# Welcome");
    write(dir.path(), "how-to/cache-busting.md", "Assets carry `?v=`.");

    let store = FsContentStore::new(dir.path());
    let manifest = Manifest::load(&store).await?;
    assert_eq!(manifest.folders.len(), 2);
    assert_eq!(manifest.folders[0].articles[0].title, "Welcome");
    assert_eq!(manifest.folders[1].name, "How To");

    let site = site(&dir, None);
    let page = site.render_article("how-to/cache-busting").await?;
    assert_eq!(page.title, "Cache Busting | Fallback Title");
    assert!(store.list("how-to/").await?.len() == 1);
    Ok(())
}

#[test]
fn test_default_asset_version_is_stable_timestamp() {
    let v = default_asset_version();
    assert_eq!(v.len(), 14);
    assert!(v.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(v, default_asset_version());
}
