//! Markdown rendering for tool output.
//!
//! Each function turns one upstream response into the text document a tool
//! returns. Rendering is pure; all fetching happens in `tools`.

use serde_json::Value;

use pubdev_core::utils::{percent, strip_html, truncate_chars};
use pubdev_registry::{PackageResponse, ScoreResponse, SearchHit, SearchResponse};

const NO_DESCRIPTION: &str = "No description provided";

/// Text shown when the package page could not be fetched
pub const README_NOT_FOUND: &str = "README not found";

/// `get_package_info`
pub fn package_info(package: &PackageResponse, site: &str) -> String {
    let name = &package.name;
    let latest = &package.latest;
    let pubspec = &latest.pubspec;
    let version = &latest.version;

    let published = latest
        .published
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let mut details = vec![
        format!("- **Latest Version:** {}", version),
        format!("- **Published:** {}", published),
        format!(
            "- **Flutter Support:** {}",
            if pubspec.supports_flutter() { "Yes" } else { "No" }
        ),
    ];
    for (label, value) in [
        ("Homepage", &pubspec.homepage),
        ("Repository", &pubspec.repository),
        ("Documentation", &pubspec.documentation),
    ] {
        if let Some(value) = value {
            details.push(format!("- **{}:** {}", label, value));
        }
    }
    details.push(format!("- **Pub.dev:** {}", package_url(site, name)));

    format!(
        "# {name} v{version}

## Description
{description}

## Package Details
{details}

## Dependencies
{dependencies}

## Dev Dependencies
{dev_dependencies}

## Installation
```yaml
dependencies:
  {name}: ^{version}
```

## Import
```dart
import 'package:{name}/{name}.dart';
```
",
        description = pubspec.description.as_deref().unwrap_or(NO_DESCRIPTION),
        details = details.join("\n"),
        dependencies = dependency_list(pubspec.dependencies.as_ref(), "No dependencies"),
        dev_dependencies =
            dependency_list(pubspec.dev_dependencies.as_ref(), "No dev dependencies"),
    )
}

/// `search_packages`
pub fn search_results(query: &str, page: u32, results: &SearchResponse, site: &str) -> String {
    let mut out = format!("# Flutter Package Search Results: \"{}\"\n\n", query);

    match results.count {
        Some(count) => out.push_str(&format!("**{} results found (page {})**\n", count, page)),
        None => {
            let shown = results.packages.len();
            let noun = if shown == 1 { "package" } else { "packages" };
            out.push_str(&format!("**{} {} on page {}**\n", shown, noun, page));
        },
    }

    if results.packages.is_empty() {
        out.push_str("\nNo packages found\n");
        return out;
    }

    for (index, hit) in results.packages.iter().enumerate() {
        out.push('\n');
        out.push_str(&hit_section(index + 1, hit, "Pub.dev", site));
    }

    if let (Some(_), Some(next_page)) = (&results.next, page.checked_add(1)) {
        out.push_str(&format!("\n*Use page {} for more results*\n", next_page));
    }

    out
}

/// `get_package_versions`
pub fn version_history(package: &PackageResponse) -> String {
    let latest = &package.latest.version;

    let lines: Vec<String> = package
        .versions
        .iter()
        .rev()
        .enumerate()
        .map(|(index, entry)| {
            let marker = if entry.version() == latest { " **(latest)**" } else { "" };
            format!("{}. v{}{}", index + 1, entry.version(), marker)
        })
        .collect();

    format!(
        "# {name} - All Versions

**Latest Version:** {latest}

## Version History
{history}

**{count} versions available**
",
        name = package.name,
        history = lines.join("\n"),
        count = lines.len(),
    )
}

/// `get_package_documentation`
///
/// `page_html` is the package page body, or `None` when it could not be fetched.
pub fn documentation(
    package: &PackageResponse,
    requested_version: Option<&str>,
    page_html: Option<&str>,
    readme_char_limit: usize,
    site: &str,
) -> String {
    let name = &package.name;
    let pubspec = &package.latest.pubspec;
    let api_docs = format!("{}/documentation/{}/latest/", site, name);

    let readme = match page_html {
        Some(html) => {
            let text = strip_html(html);
            match truncate_chars(&text, readme_char_limit) {
                (head, true) => format!("{}\n\n...(visit the pub.dev page for the rest)", head),
                (whole, false) => whole.to_string(),
            }
        },
        None => README_NOT_FOUND.to_string(),
    };

    let mut links = vec![
        format!("- [Pub.dev Page]({})", package_url(site, name)),
        format!("- [API Documentation]({})", api_docs),
        format!("- [Example]({}/example)", package_url(site, name)),
    ];
    if let Some(repository) = &pubspec.repository {
        links.push(format!("- [Source Code]({})", repository));
    }

    format!(
        "# {name} Documentation

## Package Details
- **Version:** {version}
- **Description:** {description}
- **Pub.dev:** {page}
- **Documentation:** {docs}

## README
{readme}

## Useful Links
{links}
",
        version = requested_version.unwrap_or(&package.latest.version),
        description = pubspec.description.as_deref().unwrap_or(NO_DESCRIPTION),
        page = package_url(site, name),
        docs = pubspec.documentation.as_deref().unwrap_or(&api_docs),
        links = links.join("\n"),
    )
}

/// `get_package_score`
pub fn score(name: &str, score: &ScoreResponse, site: &str) -> String {
    let granted = score.granted_points.unwrap_or(0);
    let max = score.max_points.unwrap_or(0);
    let points_pct = if max == 0 {
        0
    } else {
        percent(f64::from(granted) / f64::from(max))
    };

    let mut details = vec![format!("- **Likes:** {}", score.like_count.unwrap_or(0))];
    if let Some(popularity) = score.popularity_score {
        details.push(format!("- **Popularity:** {}%", percent(popularity)));
    }
    if let Some(downloads) = score.download_count_30_days {
        details.push(format!("- **Downloads (30 days):** {}", downloads));
    }

    let tags = if score.tags.is_empty() {
        "No tags".to_string()
    } else {
        score
            .tags
            .iter()
            .map(|tag| format!("- {}", tag))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "# {name} - Package Scores

## Overall Score
**{granted}/{max} points** ({points_pct}%)

## Details
{details}

## Tags
{tags}

## Pub.dev Page
{page}
",
        details = details.join("\n"),
        page = package_url(site, name),
    )
}

/// `get_trending_packages`
pub fn trending(page: u32, results: &SearchResponse, page_size: usize, site: &str) -> String {
    let mut out = format!("# Trending Flutter Packages (Page {})\n", page);

    if results.packages.is_empty() {
        out.push_str("\nNo packages found on this page\n");
        return out;
    }

    let offset = (page.max(1) as usize - 1).saturating_mul(page_size);
    for (index, hit) in results.packages.iter().take(page_size).enumerate() {
        out.push('\n');
        out.push_str(&hit_section(offset.saturating_add(index + 1), hit, "Link", site));
    }

    // u32::MAX is the last addressable page
    if let Some(next_page) = page.checked_add(1) {
        out.push_str(&format!("\n*Use page {} for more*\n", next_page));
    }
    out
}

/// One numbered search/trending entry
fn hit_section(rank: usize, hit: &SearchHit, link_label: &str, site: &str) -> String {
    let mut section = format!("## {}. {}", rank, hit.package);
    if let Some(version) = hit.version() {
        section.push_str(&format!(" v{}", version));
    }
    section.push('\n');
    section.push_str(hit.description().unwrap_or(NO_DESCRIPTION));
    section.push('\n');
    if let Some(score) = hit.score {
        section.push_str(&format!("**Score:** {}%\n", percent(score)));
    }
    section.push_str(&format!(
        "**{}:** {}\n",
        link_label,
        package_url(site, &hit.package)
    ));
    section
}

fn dependency_list<'a, I>(dependencies: Option<I>, empty: &str) -> String
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let lines: Vec<String> = dependencies
        .into_iter()
        .flatten()
        .map(|(name, constraint)| format!("- {}: {}", name, render_constraint(constraint)))
        .collect();

    if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    }
}

/// Constraint strings verbatim; sdk/git/path maps as compact JSON
fn render_constraint(value: &Value) -> String {
    match value {
        Value::String(constraint) => constraint.clone(),
        Value::Null => "any".to_string(),
        other => other.to_string(),
    }
}

fn package_url(site: &str, name: &str) -> String {
    format!("{}/packages/{}", site, name)
}
