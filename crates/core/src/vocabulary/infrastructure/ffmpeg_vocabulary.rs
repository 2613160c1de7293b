use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex, PoisonError};

use crate::shared::tool_config::ToolConfig;
use crate::vocabulary::domain::listing::Listing;
use crate::vocabulary::domain::vocabulary::{ListingKind, Vocabulary, VocabularyError};

type Slot = Mutex<Option<Arc<Listing>>>;

/// Vocabulary read from the installed tool's `-codecs` / `-pix_fmts`.
///
/// Each listing is fetched on first use and kept for the lifetime of the
/// value. A failed fetch is not remembered, so a later call tries again.
pub struct FfmpegVocabulary {
    binary: PathBuf,
    codecs: Slot,
    pixel_formats: Slot,
}

impl FfmpegVocabulary {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            binary: config.binary().to_path_buf(),
            codecs: Mutex::new(None),
            pixel_formats: Mutex::new(None),
        }
    }

    fn slot(&self, kind: ListingKind) -> &Slot {
        match kind {
            ListingKind::Codecs => &self.codecs,
            ListingKind::PixelFormats => &self.pixel_formats,
        }
    }

    fn fetch(&self, kind: ListingKind) -> Result<Listing, VocabularyError> {
        let flag = kind.flag();
        log::info!("Querying {} {flag}", self.binary.display());
        let output = Command::new(&self.binary)
            .args(["-hide_banner", flag])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| VocabularyError::Spawn {
                binary: self.binary.display().to_string(),
                flag,
                source,
            })?;
        if !output.status.success() {
            log::warn!(
                "{} {flag} exited with {}, parsing what it printed",
                self.binary.display(),
                output.status
            );
        }
        Listing::parse(&String::from_utf8_lossy(&output.stdout))
    }
}

impl Vocabulary for FfmpegVocabulary {
    fn listing(&self, kind: ListingKind) -> Result<Arc<Listing>, VocabularyError> {
        // Held across the fetch: concurrent first callers share one run.
        let mut slot = self.slot(kind).lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(listing) = slot.as_ref() {
            return Ok(Arc::clone(listing));
        }
        let listing = Arc::new(self.fetch(kind)?);
        log::debug!("{} lists {} entries", kind.flag(), listing.len());
        *slot = Some(Arc::clone(&listing));
        Ok(listing)
    }
}
