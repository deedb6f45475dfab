//! Resource file formats. Each format implements [`crate::traits::Parser`] for the
//! type it decodes into.

pub mod android_strings;
