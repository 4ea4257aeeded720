//! Markdown listing of headlines.
//!
//! ```text
//! # Titulares Deportivos de Argentina
//!
//! _Actualizado: 2026-10-18 12:30:00_
//!
//! ## Clarin
//!
//! **Fuente:** Clarin
//!
//! **Titular:** Boca le ganó a River
//!
//! [Leer más...](https://www.clarin.com/deportes/nota.html)
//!
//! ---
//! ```
//!
//! An empty result renders a distinct "nothing found" notice instead of an
//! empty list.

use crate::cache::CachedHeadlines;
use itertools::Itertools;
use std::fmt::Write;

pub const TITLE: &str = "Titulares Deportivos de Argentina";
pub const NOTHING_FOUND: &str =
    "No se pudieron obtener los titulares. Revisa el log para más detalles.";

pub fn render(cached: &CachedHeadlines) -> String {
    let result = &cached.result;
    let mut md = String::new();

    let _ = writeln!(md, "# {TITLE}\n");
    let _ = writeln!(
        md,
        "_Actualizado: {}_\n",
        cached.fetched_at.format("%Y-%m-%d %H:%M:%S")
    );

    if result.is_empty() {
        let _ = writeln!(md, "> {NOTHING_FOUND}\n");
    } else {
        let _ = writeln!(md, "¡{} titulares obtenidos!\n", result.len());
        // Records are already contiguous per source.
        for (source, records) in &result.records.iter().chunk_by(|r| r.source.clone()) {
            let _ = writeln!(md, "## {source}\n");
            for record in records {
                let _ = writeln!(md, "**Fuente:** {}\n", record.source);
                let _ = writeln!(md, "**Titular:** {}\n", record.headline);
                if record.has_link() {
                    let _ = writeln!(md, "[Leer más...]({})\n", record.url);
                }
                let _ = writeln!(md, "---\n");
            }
        }
    }

    if !result.failures.is_empty() {
        let _ = writeln!(md, "### Fuentes sin resultados\n");
        for failure in &result.failures {
            let _ = writeln!(md, "- **{}**: {}", failure.source, failure.reason);
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractionResult, HeadlineRecord, SiteFailure};

    fn record(source: &str, headline: &str, url: &str) -> HeadlineRecord {
        HeadlineRecord {
            source: source.to_string(),
            headline: headline.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_empty_result_shows_notice() {
        let md = render(&CachedHeadlines::new(ExtractionResult::default()));
        assert!(md.starts_with(&format!("# {TITLE}")));
        assert!(md.contains(NOTHING_FOUND));
        assert!(!md.contains("**Titular:**"));
    }

    #[test]
    fn test_groups_by_source_and_links_only_when_present() {
        let cached = CachedHeadlines::new(ExtractionResult {
            records: vec![
                record("Clarin", "Boca ganó", "https://www.clarin.com/nota"),
                record("Clarin", "River empató", ""),
                record("ESPN", "Messi", ""),
            ],
            failures: vec![],
        });
        let md = render(&cached);

        assert_eq!(md.matches("## Clarin").count(), 1);
        assert_eq!(md.matches("## ESPN").count(), 1);
        assert_eq!(md.matches("[Leer más...]").count(), 1);
        assert_eq!(md.matches("**Fuente:** Clarin").count(), 2);
        assert_eq!(md.matches("**Fuente:** ESPN").count(), 1);
        assert!(md.contains("**Fuente:** ESPN\n\n**Titular:** Messi"));
        assert!(md.contains("[Leer más...](https://www.clarin.com/nota)"));
        assert!(md.contains("¡3 titulares obtenidos!"));
        assert!(!md.contains(NOTHING_FOUND));
        assert!(!md.contains("Fuentes sin resultados"));

        let clarin = md.find("## Clarin").unwrap();
        let espn = md.find("## ESPN").unwrap();
        assert!(clarin < espn);
    }

    #[test]
    fn test_lists_failed_sources() {
        let cached = CachedHeadlines::new(ExtractionResult {
            records: vec![],
            failures: vec![SiteFailure {
                source: "Ole".to_string(),
                reason: "no element matched `//h2` within 10s".to_string(),
            }],
        });
        let md = render(&cached);
        assert!(md.contains(NOTHING_FOUND));
        assert!(md.contains("- **Ole**: no element matched"));
    }
}
