#![forbid(unsafe_code)]

//! DexLora site public facade.
//!
//! Re-exports the types most embedders need and offers a prelude. The site
//! itself lives in `dexlora-site`; effects, the contact path and the
//! visibility primitives live in their own crates.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use dexlora_core::event::{InputEvent, ListenerKind, ListenerKinds, PointerButton, PointerEvent};
pub use dexlora_core::geometry::Rect;
pub use dexlora_core::visibility::{
    ElementId, IntersectionEntry, IntersectionSource, ObservationId, SoftwareViewport, Threshold,
    VisibilityGate,
};

// --- Effect re-exports -----------------------------------------------------

pub use dexlora_fx::{
    EffectConfig, EffectEnvironment, EffectHost, EffectInstance, EffectKind, FrameRequestId,
    HeadlessEnvironment, InstanceSettings, ListenerId, SurfaceId,
};
pub use dexlora_render::{PackedRgba, PixelSurface};

// --- Contact re-exports ----------------------------------------------------

#[cfg(feature = "http")]
pub use dexlora_contact::HttpTransport;
pub use dexlora_contact::{
    ContactDraft, ContactError, ContactForm, Field, Notice, NoticeKind, RelayConfig,
    RelayStrategy, RelayTransport, SubmitOutcome,
};

// --- Site re-exports -------------------------------------------------------

pub use dexlora_site::{HtmlRenderer, Page, Route, Site, SiteData};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for embedders.
#[derive(Debug)]
pub enum Error {
    /// Contact submission failed.
    Contact(ContactError),
    /// Site data could not be serialized.
    Export(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contact(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "site export failed: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Contact(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<ContactError> for Error {
    fn from(err: ContactError) -> Self {
        Self::Contact(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Export(err)
    }
}

/// Standard result type for DexLora APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Collect the site's navigation and content as pretty-printed JSON.
pub fn export_site_json() -> Result<String> {
    Ok(SiteData::collect().to_json_pretty()?)
}

/// `?`-friendly view of a [`SubmitOutcome`].
pub trait SubmitOutcomeExt {
    /// `Ok(true)` when sent, `Ok(false)` when rejected as busy.
    fn into_result(self) -> Result<bool>;
}

impl SubmitOutcomeExt for SubmitOutcome {
    fn into_result(self) -> Result<bool> {
        match self {
            SubmitOutcome::Sent => Ok(true),
            SubmitOutcome::Busy => Ok(false),
            SubmitOutcome::Failed(err) => Err(Error::Contact(err)),
        }
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ContactForm, EffectConfig, EffectEnvironment, EffectHost, EffectKind, Error, Field,
        HeadlessEnvironment, IntersectionSource, RelayConfig, Result, Route, Site,
        SoftwareViewport, SubmitOutcome, SubmitOutcomeExt,
    };

    pub use crate::{contact, core, fx, render, site};
}

pub use dexlora_contact as contact;
pub use dexlora_core as core;
pub use dexlora_fx as fx;
pub use dexlora_render as render;
pub use dexlora_site as site;
