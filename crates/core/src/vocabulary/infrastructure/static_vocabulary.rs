use std::sync::Arc;

use crate::vocabulary::domain::listing::Listing;
use crate::vocabulary::domain::vocabulary::{ListingKind, Vocabulary, VocabularyError};

/// Vocabulary backed by listings captured ahead of time.
#[derive(Clone, Debug)]
pub struct StaticVocabulary {
    codecs: Arc<Listing>,
    pixel_formats: Arc<Listing>,
}

impl StaticVocabulary {
    pub fn new(codecs: Listing, pixel_formats: Listing) -> Self {
        Self {
            codecs: Arc::new(codecs),
            pixel_formats: Arc::new(pixel_formats),
        }
    }

    /// Parses saved `-codecs` and `-pix_fmts` output.
    pub fn from_text(codecs: &str, pixel_formats: &str) -> Result<Self, VocabularyError> {
        Ok(Self::new(Listing::parse(codecs)?, Listing::parse(pixel_formats)?))
    }
}

impl Vocabulary for StaticVocabulary {
    fn listing(&self, kind: ListingKind) -> Result<Arc<Listing>, VocabularyError> {
        Ok(match kind {
            ListingKind::Codecs => Arc::clone(&self.codecs),
            ListingKind::PixelFormats => Arc::clone(&self.pixel_formats),
        })
    }
}
