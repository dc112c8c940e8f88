use serde::{Deserialize, Serialize};

use crate::error::ContentError;

use super::{ContentStore, MANIFEST_KEY};

/// Folder/article structure of the site, stored as `manifest.json` in the content bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Folder {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub title: String,
    pub slug: String,
    /// Object key of the markdown source. Defaults to `<folder>/<slug>.md`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// An article together with the folder it sits in.
#[derive(Debug, Clone, Copy)]
pub struct ArticleRef<'a> {
    pub folder: &'a Folder,
    pub article: &'a Article,
}

impl ArticleRef<'_> {
    /// Public slug, `<folder>/<article>` or just `<article>` for root-level articles.
    pub fn slug(&self) -> String {
        if self.folder.slug.is_empty() {
            self.article.slug.clone()
        } else {
            format!("{}/{}", self.folder.slug, self.article.slug)
        }
    }

    pub fn key(&self) -> String {
        match &self.article.path {
            Some(path) => path.clone(),
            None => format!("{}.md", self.slug()),
        }
    }
}

impl Manifest {
    /// Read `manifest.json`, or derive a manifest from the markdown keys when it is absent.
    pub async fn load(store: &dyn ContentStore) -> Result<Manifest, ContentError> {
        match store.get(MANIFEST_KEY).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                log::info!("no {MANIFEST_KEY} in content store, deriving from keys");
                let keys = store.list("").await?;
                Ok(Manifest::from_keys(&keys))
            }
        }
    }

    /// Group `.md` keys by top-level directory. Root-level files land in a folder with an empty slug.
    pub fn from_keys(keys: &[String]) -> Manifest {
        let mut folders: Vec<Folder> = Vec::new();

        for key in keys {
            let Some(stem_path) = key.strip_suffix(".md") else {
                continue;
            };
            let (folder_slug, article_slug) = match stem_path.split_once('/') {
                Some((folder, rest)) => (folder, rest),
                None => ("", stem_path),
            };

            let article = Article {
                title: title_from_slug(article_slug.rsplit('/').next().unwrap_or(article_slug)),
                slug: article_slug.to_string(),
                path: None,
            };

            match folders.iter_mut().find(|f| f.slug == folder_slug) {
                Some(folder) => folder.articles.push(article),
                None => folders.push(Folder {
                    name: title_from_slug(folder_slug),
                    slug: folder_slug.to_string(),
                    articles: vec![article],
                }),
            }
        }

        // root-level articles first, then folders alphabetically
        folders.sort_by(|a, b| (!a.slug.is_empty(), &a.slug).cmp(&(!b.slug.is_empty(), &b.slug)));
        Manifest {
            title: None,
            folders,
        }
    }

    pub fn articles(&self) -> impl Iterator<Item = ArticleRef<'_>> {
        self.folders.iter().flat_map(|folder| {
            folder
                .articles
                .iter()
                .map(move |article| ArticleRef { folder, article })
        })
    }

    pub fn find(&self, slug: &str) -> Option<ArticleRef<'_>> {
        let slug = slug.trim_matches('/');
        self.articles().find(|a| a.slug() == slug)
    }

    /// Reverse lookup from an object key, e.g. a search hit's `filename`.
    pub fn find_by_key(&self, key: &str) -> Option<ArticleRef<'_>> {
        self.articles().find(|a| a.key() == key)
    }
}

/// `getting-started_guide` -> `Getting Started Guide`
pub fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_folders_from_keys() {
        let keys: Vec<String> = [
            "guides/deploy-app.md",
            "guides/setup.md",
            "index.md",
            "manifest.json",
            "reference/api/search.md",
            "assets/logo.png",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let manifest = Manifest::from_keys(&keys);
        let slugs: Vec<&str> = manifest.folders.iter().map(|f| f.slug.as_str()).collect();
        assert_eq!(slugs, vec!["", "guides", "reference"]);

        let deploy = manifest.find("guides/deploy-app").unwrap();
        assert_eq!(deploy.article.title, "Deploy App");
        assert_eq!(deploy.key(), "guides/deploy-app.md");

        let nested = manifest.find("reference/api/search").unwrap();
        assert_eq!(nested.article.title, "Search");
        assert_eq!(nested.key(), "reference/api/search.md");

        assert_eq!(manifest.find("/index/").unwrap().key(), "index.md");
        assert!(manifest.find("assets/logo").is_none());
    }

    #[test]
    fn explicit_path_wins() {
        let manifest: Manifest = serde_json::from_str(
            r#"{"title":"Docs","folders":[{"name":"Guides","slug":"guides","articles":[
                {"title":"Deploy","slug":"deploy","path":"src/deploy.md"}]}]}"#,
        )
        .unwrap();
        assert_eq!(manifest.find("guides/deploy").unwrap().key(), "src/deploy.md");
        assert_eq!(
            manifest.find_by_key("src/deploy.md").unwrap().slug(),
            "guides/deploy"
        );
        assert!(manifest.find("src/deploy").is_none());
        assert_eq!(manifest.title.as_deref(), Some("Docs"));
    }

    #[test]
    fn titles() {
        assert_eq!(title_from_slug("getting-started_guide"), "Getting Started Guide");
        assert_eq!(title_from_slug(""), "");
    }
}
