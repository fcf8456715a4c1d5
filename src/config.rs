//! Site configuration. A project may carry an optional `seihon.yaml`
//! manifest at its root overriding the defaults; every manifest field has a
//! default, so a partial (or absent) manifest is valid. Paths are resolved
//! against the project root once, at load time, and the resulting
//! [`SiteConfig`] is immutable for the rest of the build.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

const MANIFEST_FILE_NAME: &str = "seihon.yaml";

/// The shared page template, in Go template syntax. Chapter pages and the
/// README-based index both render through this; the index passes an empty
/// `nav`.
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{{.title}} | {{.site_title}}</title>
  <link rel="stylesheet" href="assets/style.css" />
</head>
<body>
<header class="site-header">
  <h1><a href="index.html">{{.site_title}}</a></h1>
  <p class="tagline">{{.tagline}}</p>
</header>
<main class="container">
  {{.nav}}
  <article class="content">
  {{.content}}
  </article>
</main>
<footer class="site-footer">
  <p>&copy; {{.year}} {{.copyright}}</p>
</footer>
</body>
</html>
"#;

/// The fallback index template listing every chapter, used when the project
/// has no root README.
const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{{.site_title}} | 章一覧</title>
  <link rel="stylesheet" href="assets/style.css" />
</head>
<body>
<header class="site-header">
  <h1>{{.site_title}}</h1>
  <p class="tagline">{{.tagline}}</p>
</header>
<main class="container">
  <section>
    <h2>章一覧</h2>
    <ul class="chapter-list">
      {{range .chapters}}<li><a href="{{.output_name}}">{{.title}}</a></li>
      {{end}}</ul>
  </section>
</main>
<footer class="site-footer">
  <p>&copy; {{.year}} {{.copyright}}</p>
</footer>
</body>
</html>
"#;

/// The breadcrumb shown at the top of every chapter page.
const NAVIGATION_LINK: &str =
    r#"<nav class="breadcrumbs"><a href="index.html">ホームに戻る</a></nav>"#;

mod defaults {
    use std::path::PathBuf;

    pub fn title() -> String {
        "貨幣論教科書".to_owned()
    }

    pub fn tagline() -> String {
        "古典から現代までの貨幣論を学ぶ".to_owned()
    }

    pub fn copyright() -> String {
        "貨幣論プロジェクト".to_owned()
    }

    pub fn chapters_directory() -> PathBuf {
        PathBuf::from("chapters")
    }

    pub fn auxiliary_directories() -> Vec<PathBuf> {
        vec![PathBuf::from("glossary"), PathBuf::from("references")]
    }

    pub fn assets_directory() -> PathBuf {
        PathBuf::from("assets")
    }

    pub fn figures_directory() -> PathBuf {
        PathBuf::from("figures")
    }

    pub fn readme() -> PathBuf {
        PathBuf::from("README.md")
    }

    pub fn output_directory() -> PathBuf {
        PathBuf::from("site")
    }
}

#[derive(Deserialize)]
struct Manifest {
    #[serde(default = "defaults::title")]
    title: String,

    #[serde(default = "defaults::tagline")]
    tagline: String,

    #[serde(default = "defaults::copyright")]
    copyright: String,

    #[serde(default = "defaults::chapters_directory")]
    chapters_directory: PathBuf,

    #[serde(default = "defaults::auxiliary_directories")]
    auxiliary_directories: Vec<PathBuf>,

    #[serde(default = "defaults::assets_directory")]
    assets_directory: PathBuf,

    #[serde(default = "defaults::figures_directory")]
    figures_directory: PathBuf,

    #[serde(default = "defaults::readme")]
    readme: PathBuf,

    #[serde(default = "defaults::output_directory")]
    output_directory: PathBuf,
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest {
            title: defaults::title(),
            tagline: defaults::tagline(),
            copyright: defaults::copyright(),
            chapters_directory: defaults::chapters_directory(),
            auxiliary_directories: defaults::auxiliary_directories(),
            assets_directory: defaults::assets_directory(),
            figures_directory: defaults::figures_directory(),
            readme: defaults::readme(),
            output_directory: defaults::output_directory(),
        }
    }
}

/// The resolved configuration a build runs against. Rendering functions
/// receive the template strings and site text from here rather than reading
/// module-level constants, so tests can substitute their own.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub chapters_directory: PathBuf,
    pub auxiliary_directories: Vec<PathBuf>,
    pub assets_directory: PathBuf,
    pub figures_directory: PathBuf,
    pub readme: PathBuf,
    pub output_directory: PathBuf,

    pub site_title: String,
    pub tagline: String,
    pub copyright: String,
    pub page_template: String,
    pub index_template: String,
    pub navigation: String,
}

impl SiteConfig {
    /// Loads the configuration for the project rooted at `root`, reading
    /// `<root>/seihon.yaml` when it exists and falling back to the defaults
    /// otherwise.
    pub fn load(root: &Path) -> Result<SiteConfig> {
        let path = root.join(MANIFEST_FILE_NAME);
        let manifest = match path.exists() {
            false => Manifest::default(),
            true => match serde_yaml::from_reader(open(&path, "manifest")?) {
                Ok(manifest) => manifest,
                Err(e) => {
                    return Err(anyhow!(
                        "Loading manifest `{}`: {}",
                        path.display(),
                        e
                    ))
                }
            },
        };
        Ok(SiteConfig::resolve(root, manifest))
    }

    fn resolve(root: &Path, manifest: Manifest) -> SiteConfig {
        SiteConfig {
            chapters_directory: root.join(manifest.chapters_directory),
            auxiliary_directories: manifest
                .auxiliary_directories
                .iter()
                .map(|directory| root.join(directory))
                .collect(),
            assets_directory: root.join(manifest.assets_directory),
            figures_directory: root.join(manifest.figures_directory),
            readme: root.join(manifest.readme),
            output_directory: root.join(manifest.output_directory),
            site_title: manifest.title,
            tagline: manifest.tagline,
            copyright: manifest.copyright,
            page_template: PAGE_TEMPLATE.to_owned(),
            index_template: INDEX_TEMPLATE.to_owned(),
            navigation: NAVIGATION_LINK.to_owned(),
        }
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!(
            "Opening {} file `{}`: {}",
            kind,
            path.display(),
            e
        )),
        Ok(file) => Ok(file),
    }
}
