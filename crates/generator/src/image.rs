//! Placeholder product images.
//!
//! An [`ImageSpec`] describes a flat two-color image with a caption. Stores
//! decide what to do with it: the memory store just records it, remote stores
//! turn it into a placeholder-service URL the storefront can sideload.

use rand::Rng;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::random;

/// Smallest generated side, in pixels.
const MIN_SIDE: u32 = 200;
/// Largest generated side, in pixels.
const MAX_SIDE: u32 = 1200;

/// Description of a generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    pub width: u32,
    pub height: u32,
    /// Background color as `rrggbb`.
    pub background: String,
    /// Text color as `rrggbb`.
    pub foreground: String,
    /// Caption and attachment title.
    pub title: String,
}

impl ImageSpec {
    /// Random size (multiples of ten between 200 and 1200 px), colors and
    /// caption.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let width = rng.random_range(MIN_SIDE / 10..=MAX_SIDE / 10) * 10;
        let height = rng.random_range(MIN_SIDE / 10..=MAX_SIDE / 10) * 10;
        let background = random::hex_color(rng);
        let foreground = random::hex_color(rng);
        let title = random::ucfirst(&random::words(rng, 1, 3).join(" "));

        Self {
            width,
            height,
            background,
            foreground,
            title,
        }
    }

    /// URL of this image on a placehold.co-style service:
    /// `{base}/{w}x{h}/{bg}/{fg}.png?text={title}`.
    ///
    /// The base path and query are kept; a fragment is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` cannot carry a path (e.g. `mailto:`).
    pub fn placeholder_url(&self, base: &Url) -> Result<Url, url::ParseError> {
        let mut url = base.clone();
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(&format!("{}x{}", self.width, self.height))
            .push(&self.background)
            .push(&format!("{}.png", self.foreground));
        url.query_pairs_mut().append_pair("text", &self.title);
        Ok(url)
    }
}
