//! Slugs, watch paths and image URLs.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::tmdb::{MediaType, Show};

/// Image CDN used when none is configured.
pub const DEFAULT_IMAGE_DOMAIN: &str = "image.tmdb.org";

/// Runs of characters that are not lowercase ASCII letters or digits.
#[allow(clippy::expect_used)]
static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("failed to compile slug regex"));

/// Converts a display name to kebab case.
///
/// Accents are folded to their base letters, everything else outside
/// `[a-z0-9]` collapses to single hyphens, and edge hyphens are trimmed.
#[must_use]
pub fn kebab_case(name: &str) -> String {
    let folded: String = name
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    NON_SLUG_RE
        .replace_all(&folded, "-")
        .trim_matches('-')
        .to_owned()
}

/// Builds the URL slug for a title: `{id}-{kebab-name}`.
///
/// ```
/// assert_eq!(flixdeck_api::catalog::slug(603, "The Matrix"), "603-the-matrix");
/// ```
#[must_use]
pub fn slug(id: u64, name: &str) -> String {
    let kebab = kebab_case(name);
    if kebab.is_empty() {
        id.to_string()
    } else {
        format!("{id}-{kebab}")
    }
}

/// Display name of a show: title, name, original title, then original name.
#[must_use]
pub fn name_from_show(show: &Show) -> &str {
    show.title
        .as_deref()
        .or(show.name.as_deref())
        .or(show.original_title.as_deref())
        .or(show.original_name.as_deref())
        .unwrap_or_default()
}

/// Slug of a show from its id and display name.
#[must_use]
pub fn show_slug(show: &Show) -> String {
    slug(show.id, name_from_show(show))
}

/// Reads the numeric id at the start of a slug.
#[must_use]
pub fn id_from_slug(slug: &str) -> Option<u64> {
    let digits = slug.split(|c: char| !c.is_ascii_digit()).next()?;
    digits.parse().ok()
}

/// Watch page path: `/watch/{movie|tv|anime}/{slug}`.
///
/// Returns `None` when the show carries no media type.
#[must_use]
pub fn watch_path(show: &Show) -> Option<String> {
    show.media_type.map(|media_type| watch_path_for(show, media_type))
}

/// Watch page path under an explicit media type, ignoring the show's own.
#[must_use]
pub fn watch_path_for(show: &Show, media_type: MediaType) -> String {
    format!("/watch/{media_type}/{}", show_slug(show))
}

/// Image URL on the CDN for a poster or backdrop path.
#[must_use]
pub fn image_url(domain: &str, size: &str, path: &str) -> String {
    format!("https://{domain}/t/p/{size}/{}", path.trim_start_matches('/'))
}
