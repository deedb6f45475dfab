//! Incremental machine translation for Android string resources and Fastlane metadata.
//!
//! Only what is missing in a target locale is sent to a [`TranslationProvider`]; values
//! that already exist are never overwritten, so repeated runs are cheap and idempotent.
//! The [`Orchestrator`] wires everything together for one run.

pub mod cancel;
pub mod config;
pub mod error;
pub mod formats;
pub mod locale;
pub mod metadata;
pub mod orchestrator;
pub mod placeholder;
pub mod provider;
pub mod report;
pub mod strings_xml;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    cancel::CancelToken,
    config::{ProviderConfig, TranslationConfig},
    error::{Error, ProviderError},
    locale::Locale,
    orchestrator::{Orchestrator, plan},
    provider::{TextFormat, TranslationProvider},
    report::{LocaleOutcome, RunReport, Summary},
    types::{Quantity, ResourceKey, ResourceTable},
};
