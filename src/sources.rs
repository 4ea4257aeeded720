//! The fixed list of news sites and how to read each one.
//!
//! Every site is described by a [`SourceRule`]: which page to load, which
//! XPath locator selects its headline elements, where the headline text lives
//! on those elements, and optionally which attribute holds the article link.
//!
//! Locators are tied to each site's current markup and break whenever a site
//! redesigns. The builtin registry can therefore be replaced at runtime with a
//! YAML file:
//!
//! ```yaml
//! sources:
//!   - name: Clarin
//!     url: https://www.clarin.com/deportes
//!     locator: "//ul/li/article/div/a"
//!     headline_attr: aria-label
//!     link_attr: href
//!     base_url: https://www.clarin.com
//!   - name: Infobae
//!     url: https://www.infobae.com/deportes/
//!     locator: "//h2"
//! ```

use crate::error::AppError;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument};
use url::Url;

/// Where the headline string of a matched element comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlineMode {
    /// The element's rendered text.
    ReadText,
    /// The value of the named attribute.
    ReadAttribute(String),
}

/// Extraction rule for a single site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRule {
    pub name: String,
    pub page_url: String,
    /// XPath expression selecting headline elements.
    pub locator: String,
    pub headline_mode: HeadlineMode,
    /// Attribute holding the article link, if the site exposes one.
    pub link_attr: Option<String>,
    /// Prefix for root-relative links.
    pub base_url: Option<String>,
}

impl SourceRule {
    fn text(name: &str, page_url: &str, locator: &str) -> Self {
        Self {
            name: name.to_string(),
            page_url: page_url.to_string(),
            locator: locator.to_string(),
            headline_mode: HeadlineMode::ReadText,
            link_attr: None,
            base_url: None,
        }
    }
}

static BUILTIN_SOURCES: Lazy<Vec<SourceRule>> = Lazy::new(|| {
    vec![
        SourceRule {
            name: "Clarin".to_string(),
            page_url: "https://www.clarin.com/deportes".to_string(),
            locator: "//ul/li/article/div/a".to_string(),
            headline_mode: HeadlineMode::ReadAttribute("aria-label".to_string()),
            link_attr: Some("href".to_string()),
            base_url: Some("https://www.clarin.com".to_string()),
        },
        SourceRule::text(
            "La Nacion",
            "https://www.lanacion.com.ar/deportes/",
            "//h2[contains(@class, 'com-title')]",
        ),
        SourceRule::text("Infobae", "https://www.infobae.com/deportes/", "//h2"),
        SourceRule::text("ESPN", "https://www.espn.com.ar/", "//h1 | //h2"),
        SourceRule::text(
            "Ole",
            "https://www.ole.com.ar/",
            "//h2[contains(@class, 'sc-fa18824-3')]",
        ),
    ]
});

/// Ordered, immutable collection of site rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    rules: Vec<SourceRule>,
}

impl SourceRegistry {
    /// The five Argentine sports sections scraped by default.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_SOURCES.clone())
    }

    pub fn new(rules: Vec<SourceRule>) -> Self {
        Self { rules }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Read and validate a registry file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AppError::RegistryIo {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_yaml_str(&raw)?;
        info!(sources = registry.len(), "Loaded source registry");
        Ok(registry)
    }

    /// Parse a registry from YAML text.
    pub fn from_yaml_str(raw: &str) -> Result<Self, AppError> {
        let file: RegistryFile = serde_yaml::from_str(raw)?;
        if file.sources.is_empty() {
            return Err(AppError::EmptyRegistry);
        }
        let rules = file
            .sources
            .into_iter()
            .map(SourceRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(names = ?rules.iter().map(|r| &r.name).collect::<Vec<_>>(), "Parsed source rules");
        Ok(Self::new(rules))
    }
}

impl<'a> IntoIterator for &'a SourceRegistry {
    type Item = &'a SourceRule;
    type IntoIter = std::slice::Iter<'a, SourceRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    sources: Vec<RawSourceRule>,
}

#[derive(Debug, Deserialize)]
struct RawSourceRule {
    name: String,
    url: String,
    locator: String,
    #[serde(default)]
    headline_attr: Option<String>,
    #[serde(default)]
    link_attr: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<RawSourceRule> for SourceRule {
    type Error = AppError;

    fn try_from(raw: RawSourceRule) -> Result<Self, Self::Error> {
        let name = raw.name.trim().to_string();
        let invalid = |reason: String| AppError::InvalidSource {
            name: name.clone(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("name is empty".to_string()));
        }
        if raw.locator.trim().is_empty() {
            return Err(invalid("locator is empty".to_string()));
        }
        Url::parse(&raw.url).map_err(|e| invalid(format!("url `{}`: {e}", raw.url)))?;

        let base_url = non_blank(raw.base_url);
        if let Some(base) = &base_url {
            Url::parse(base).map_err(|e| invalid(format!("base_url `{base}`: {e}")))?;
        }

        // "text" is accepted as an explicit spelling of the default.
        let headline_mode = match non_blank(raw.headline_attr) {
            None => HeadlineMode::ReadText,
            Some(attr) if attr.eq_ignore_ascii_case("text") => HeadlineMode::ReadText,
            Some(attr) => HeadlineMode::ReadAttribute(attr),
        };

        Ok(SourceRule {
            name: name.clone(),
            page_url: raw.url,
            locator: raw.locator.trim().to_string(),
            headline_mode,
            link_attr: non_blank(raw.link_attr),
            base_url,
        })
    }
}
