//! Locale identifiers and the mapping between them and resource directory qualifiers.
//!
//! Android resource directories carry a locale qualifier such as `values-de` or
//! `values-zh-rCN`, where the lowercase `r` marks the region subtag. Fastlane metadata
//! directories use plain codes like `en-US`. [`decode`] accepts both, [`encode`]
//! produces the Android form.
//!
//! Decoding only succeeds for locales listed in the embedded catalog, so the result
//! does not depend on whichever locale database the host happens to ship.

use std::{collections::HashSet, fmt::Display};

use lazy_static::lazy_static;
use unic_langid::LanguageIdentifier;

/// Marker Android puts in front of the region subtag of a directory qualifier.
pub const REGION_MARKER: char = 'r';

/// Languages of the catalog with the regions each one is known in.
static LANGUAGE_REGIONS: &[(&str, &[&str])] = &[
    ("af", &["NA", "ZA"]),
    ("am", &["ET"]),
    ("ar", &[
        "AE", "BH", "DZ", "EG", "IQ", "JO", "KW", "LB", "LY", "MA", "OM", "QA", "SA", "SD", "SY",
        "TN", "YE",
    ]),
    ("az", &["AZ"]),
    ("be", &["BY"]),
    ("bg", &["BG"]),
    ("bn", &["BD", "IN"]),
    ("bs", &["BA"]),
    ("ca", &["AD", "ES"]),
    ("cs", &["CZ"]),
    ("cy", &["GB"]),
    ("da", &["DK"]),
    ("de", &["AT", "BE", "CH", "DE", "LI", "LU"]),
    ("el", &["CY", "GR"]),
    ("en", &[
        "AU", "CA", "GB", "IE", "IN", "MT", "NZ", "PH", "SG", "US", "ZA",
    ]),
    ("es", &[
        "419", "AR", "BO", "CL", "CO", "CR", "DO", "EC", "ES", "GT", "HN", "MX", "NI", "PA", "PE",
        "PR", "PY", "SV", "US", "UY", "VE",
    ]),
    ("et", &["EE"]),
    ("eu", &["ES"]),
    ("fa", &["AF", "IR"]),
    ("fi", &["FI"]),
    ("fil", &["PH"]),
    ("fr", &["BE", "CA", "CH", "FR", "LU", "MC"]),
    ("ga", &["IE"]),
    ("gl", &["ES"]),
    ("gu", &["IN"]),
    ("he", &["IL"]),
    ("hi", &["IN"]),
    ("hr", &["HR"]),
    ("hu", &["HU"]),
    ("hy", &["AM"]),
    ("id", &["ID"]),
    ("in", &["ID"]),
    ("is", &["IS"]),
    ("it", &["CH", "IT"]),
    ("iw", &["IL"]),
    ("ja", &["JP"]),
    ("ka", &["GE"]),
    ("kk", &["KZ"]),
    ("km", &["KH"]),
    ("kn", &["IN"]),
    ("ko", &["KR"]),
    ("ky", &["KG"]),
    ("lo", &["LA"]),
    ("lt", &["LT"]),
    ("lv", &["LV"]),
    ("mk", &["MK"]),
    ("ml", &["IN"]),
    ("mn", &["MN"]),
    ("mr", &["IN"]),
    ("ms", &["MY", "SG"]),
    ("my", &["MM"]),
    ("nb", &["NO"]),
    ("ne", &["NP"]),
    ("nl", &["BE", "NL"]),
    ("nn", &["NO"]),
    ("no", &["NO"]),
    ("pa", &["IN"]),
    ("pl", &["PL"]),
    ("pt", &["AO", "BR", "MZ", "PT"]),
    ("ro", &["MD", "RO"]),
    ("ru", &["BY", "KZ", "RU", "UA"]),
    ("si", &["LK"]),
    ("sk", &["SK"]),
    ("sl", &["SI"]),
    ("sq", &["AL"]),
    ("sr", &["BA", "ME", "RS"]),
    ("sv", &["FI", "SE"]),
    ("sw", &["KE", "TZ"]),
    ("ta", &["IN", "LK"]),
    ("te", &["IN"]),
    ("th", &["TH"]),
    ("tl", &["PH"]),
    ("tr", &["CY", "TR"]),
    ("uk", &["UA"]),
    ("ur", &["IN", "PK"]),
    ("uz", &["UZ"]),
    ("vi", &["VN"]),
    ("zh", &["CN", "HK", "MO", "SG", "TW"]),
    ("zu", &["ZA"]),
];

/// Catalog entries that carry a variant.
static VARIANT_LOCALES: &[(&str, &str, &str)] = &[
    ("ja", "JP", "JP"),
    ("th", "TH", "TH"),
    ("no", "NO", "NY"),
];

lazy_static! {
    static ref CATALOG: HashSet<(&'static str, &'static str, &'static str)> = {
        let mut set = HashSet::new();
        for (language, regions) in LANGUAGE_REGIONS {
            set.insert((*language, "", ""));
            for region in regions.iter() {
                set.insert((*language, *region, ""));
            }
        }
        for entry in VARIANT_LOCALES {
            set.insert(*entry);
        }
        set
    };
}

/// A canonical locale: language, optional region and optional variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Locale {
    /// Lowercase language subtag, e.g. `de`.
    pub language: String,

    /// Uppercase region subtag (`CN`) or UN M.49 code (`419`).
    pub region: Option<String>,

    /// Variant, kept as written.
    pub variant: Option<String>,
}

impl Locale {
    /// Builds a locale without checking it against the catalog.
    pub fn new(language: &str, region: Option<&str>, variant: Option<&str>) -> Self {
        Locale {
            language: language.to_ascii_lowercase(),
            region: region
                .filter(|r| !r.is_empty())
                .map(str::to_ascii_uppercase),
            variant: variant.filter(|v| !v.is_empty()).map(str::to_string),
        }
    }

    /// Whether this locale is listed in the embedded catalog.
    pub fn is_known(&self) -> bool {
        CATALOG.contains(&(
            self.language.as_str(),
            self.region.as_deref().unwrap_or(""),
            self.variant.as_deref().unwrap_or(""),
        ))
    }

    /// BCP 47 style code, e.g. `en-US`.
    ///
    /// Subtags that are not valid BCP 47 (such as the `NY` variant) are dropped.
    pub fn iso_code(&self) -> String {
        let mut parts = vec![self.language.as_str()];
        if let Some(region) = &self.region {
            parts.push(region);
        }
        if let Some(variant) = &self.variant {
            parts.push(variant);
            if let Ok(id) = parts.join("-").parse::<LanguageIdentifier>() {
                return id.to_string();
            }
            parts.pop();
        }
        match parts.join("-").parse::<LanguageIdentifier>() {
            Ok(id) => id.to_string(),
            Err(_) => parts.join("-"),
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iso_code())
    }
}

/// Decodes a directory qualifier or locale code such as `de`, `zh-rCN`, `en_US` or
/// `ja-JP-JP` into a catalog locale.
///
/// Returns `None` when the code has more than three segments or does not match a
/// catalog entry exactly.
pub fn decode(qualifier: &str) -> Option<Locale> {
    let qualifier = qualifier.trim();
    if qualifier.is_empty() {
        return None;
    }

    let parts: Vec<&str> = qualifier.split(['-', '_']).collect();
    if parts.len() > 3 {
        return None;
    }

    let language = parts[0];
    let region = parts.get(1).map(|r| strip_region_marker(r));
    let variant = parts.get(2).copied();

    let locale = Locale::new(language, region, variant);
    locale.is_known().then_some(locale)
}

/// Encodes a locale as an Android resource qualifier: `de`, `zh-rCN`.
///
/// The variant is not part of the output, so `decode(encode(l))` can differ from `l`.
pub fn encode(locale: &Locale) -> String {
    match &locale.region {
        Some(region) => format!("{}-{}{}", locale.language, REGION_MARKER, region),
        None => locale.language.clone(),
    }
}

fn strip_region_marker(segment: &str) -> &str {
    match segment.strip_prefix(REGION_MARKER) {
        Some(rest) if is_region_subtag(rest) => rest,
        _ => segment,
    }
}

fn is_region_subtag(s: &str) -> bool {
    (s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()))
        || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()))
}
