//! Catalog layer built on the TMDB client.
//!
//! A [`CatalogSession`] scopes memoized lookups to one logical request,
//! aggregates listing sections, searches titles and resolves watch pages.

mod aggregate;
mod links;
mod memo;
mod session;

pub use aggregate::{CategorizedShows, ShowRequest, categorize};
pub use links::{
    DEFAULT_IMAGE_DOMAIN, id_from_slug, image_url, kebab_case, name_from_show, show_slug, slug,
    watch_path, watch_path_for,
};
pub use memo::Memo;
#[allow(clippy::module_name_repetitions)]
pub use session::CatalogSession;
