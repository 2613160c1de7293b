use std::io;
use std::sync::Arc;

use thiserror::Error;

use super::listing::Listing;
use super::pixel_format::PixelFormatDescriptor;
use crate::shared::constants::{CODECS_FLAG, PIX_FMTS_FLAG};

/// Capability listings the tool can print.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListingKind {
    PixelFormats,
    Codecs,
}

impl ListingKind {
    pub fn flag(self) -> &'static str {
        match self {
            Self::PixelFormats => PIX_FMTS_FLAG,
            Self::Codecs => CODECS_FLAG,
        }
    }
}

/// The listing could not be obtained or does not follow the listing
/// header grammar. Parsing cannot proceed without it.
#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("failed to run {binary} {flag}: {source}")]
    Spawn {
        binary: String,
        flag: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("listing has no flag legend")]
    NoLegend,

    #[error("malformed listing header line: {line:?}")]
    MalformedHeader { line: String },

    #[error("listing legend flags {found:?} do not line up with {expected:?}")]
    MismatchedFlags { expected: String, found: String },

    #[error("listing header is not terminated by a separator rule")]
    MissingSeparator,

    #[error("listing has no entries")]
    NoRows,
}

/// Source of the codec and pixel-format names the stream parser needs.
///
/// Implementations fetch each listing at most once and hand out the
/// same shared listing afterwards.
pub trait Vocabulary: Send + Sync {
    fn listing(&self, kind: ListingKind) -> Result<Arc<Listing>, VocabularyError>;

    fn codecs(&self) -> Result<Arc<Listing>, VocabularyError> {
        self.listing(ListingKind::Codecs)
    }

    fn pixel_formats(&self) -> Result<Arc<Listing>, VocabularyError> {
        self.listing(ListingKind::PixelFormats)
    }

    /// `Ok(None)` when the name is not a known pixel format or its
    /// listing row carries no component counts.
    fn pixel_format(&self, name: &str) -> Result<Option<PixelFormatDescriptor>, VocabularyError> {
        let listing = self.pixel_formats()?;
        Ok(listing.get(name).and_then(PixelFormatDescriptor::from_entry))
    }
}
