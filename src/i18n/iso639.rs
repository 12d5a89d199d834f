// SPDX-License-Identifier: PMPL-1.0-or-later

//! ISO 639-1 language codes and locale tag parsing.
//!
//! Reference: <https://www.loc.gov/standards/iso639-2/php/code_list.php>

/// Validates whether a string is a known ISO 639-1 two-letter language code.
///
/// Codes must be lowercase, as they appear in catalog file names.
///
/// # Examples
/// ```
/// assert!(locale_audit::i18n::is_valid_iso639_1("pl"));
/// assert!(locale_audit::i18n::is_valid_iso639_1("en"));
/// assert!(!locale_audit::i18n::is_valid_iso639_1("xx"));
/// ```
pub fn is_valid_iso639_1(code: &str) -> bool {
    matches!(
        code,
        "aa" | "ab" | "af" | "ak" | "am" | "an" | "ar" | "as" | "av" | "ay" | "az"
            | "ba" | "be" | "bg" | "bh" | "bi" | "bm" | "bn" | "bo" | "br" | "bs"
            | "ca" | "ce" | "ch" | "co" | "cr" | "cs" | "cu" | "cv" | "cy"
            | "da" | "de" | "dv" | "dz"
            | "ee" | "el" | "en" | "eo" | "es" | "et" | "eu"
            | "fa" | "ff" | "fi" | "fj" | "fo" | "fr" | "fy"
            | "ga" | "gd" | "gl" | "gn" | "gu" | "gv"
            | "ha" | "he" | "hi" | "ho" | "hr" | "ht" | "hu" | "hy" | "hz"
            | "ia" | "id" | "ie" | "ig" | "ii" | "ik" | "io" | "is" | "it" | "iu"
            | "ja" | "jv"
            | "ka" | "kg" | "ki" | "kj" | "kk" | "kl" | "km" | "kn" | "ko" | "kr" | "ks" | "ku" | "kv" | "kw" | "ky"
            | "la" | "lb" | "lg" | "li" | "ln" | "lo" | "lt" | "lu" | "lv"
            | "mg" | "mh" | "mi" | "mk" | "ml" | "mn" | "mr" | "ms" | "mt" | "my"
            | "na" | "nb" | "nd" | "ne" | "ng" | "nl" | "nn" | "no" | "nr" | "nv" | "ny"
            | "oc" | "oj" | "om" | "or" | "os"
            | "pa" | "pi" | "pl" | "ps" | "pt"
            | "qu"
            | "rm" | "rn" | "ro" | "ru" | "rw"
            | "sa" | "sc" | "sd" | "se" | "sg" | "si" | "sk" | "sl" | "sm" | "sn" | "so" | "sq" | "sr" | "ss" | "st" | "su" | "sv" | "sw"
            | "ta" | "te" | "tg" | "th" | "ti" | "tk" | "tl" | "tn" | "to" | "tr" | "ts" | "tt" | "tw" | "ty"
            | "ug" | "uk" | "ur" | "uz"
            | "ve" | "vi" | "vo"
            | "wa" | "wo"
            | "xh"
            | "yi" | "yo"
            | "za" | "zh" | "zu"
    )
}

/// Splits a locale code into subtags on `-` or `_`.
fn subtags(code: &str) -> impl Iterator<Item = &str> {
    code.split(|c| c == '-' || c == '_')
}

/// The primary language subtag of a locale code (`pt-BR` -> `pt`).
pub fn primary_language(code: &str) -> &str {
    subtags(code).next().unwrap_or(code)
}

/// Validates a full locale code: an ISO 639-1 language optionally followed
/// by a script and/or region subtag.
///
/// # Examples
/// ```
/// use locale_audit::i18n::is_valid_locale_code;
/// assert!(is_valid_locale_code("pl"));
/// assert!(is_valid_locale_code("pt-BR"));
/// assert!(is_valid_locale_code("zh_Hant_TW"));
/// assert!(!is_valid_locale_code("english"));
/// ```
pub fn is_valid_locale_code(code: &str) -> bool {
    let mut parts = subtags(code);
    let Some(language) = parts.next() else {
        return false;
    };
    if !is_valid_iso639_1(language) {
        return false;
    }

    let mut seen_script = false;
    let mut seen_region = false;
    for part in parts {
        if !seen_script && !seen_region && is_script(part) {
            seen_script = true;
        } else if !seen_region && is_region(part) {
            seen_region = true;
        } else {
            return false;
        }
    }
    true
}

fn is_script(part: &str) -> bool {
    let mut chars = part.chars();
    part.len() == 4
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_lowercase())
}

fn is_region(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_uppercase()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

/// Returns the English name of a locale's language.
///
/// Accepts full locale codes; only the primary subtag is considered.
/// Returns `None` for unrecognised codes.
pub fn language_name(code: &str) -> Option<&'static str> {
    match primary_language(code) {
        "en" => Some("English"),
        "pl" => Some("Polish"),
        "de" => Some("German"),
        "fr" => Some("French"),
        "es" => Some("Spanish"),
        "it" => Some("Italian"),
        "pt" => Some("Portuguese"),
        "nl" => Some("Dutch"),
        "cs" => Some("Czech"),
        "sk" => Some("Slovak"),
        "uk" => Some("Ukrainian"),
        "ru" => Some("Russian"),
        "lt" => Some("Lithuanian"),
        "lv" => Some("Latvian"),
        "et" => Some("Estonian"),
        "hu" => Some("Hungarian"),
        "ro" => Some("Romanian"),
        "bg" => Some("Bulgarian"),
        "hr" => Some("Croatian"),
        "sl" => Some("Slovenian"),
        "sv" => Some("Swedish"),
        "da" => Some("Danish"),
        "fi" => Some("Finnish"),
        "no" | "nb" => Some("Norwegian"),
        "el" => Some("Greek"),
        "tr" => Some("Turkish"),
        "ar" => Some("Arabic"),
        "he" => Some("Hebrew"),
        "zh" => Some("Chinese"),
        "ja" => Some("Japanese"),
        "ko" => Some("Korean"),
        "hi" => Some("Hindi"),
        "vi" => Some("Vietnamese"),
        "th" => Some("Thai"),
        "id" => Some("Indonesian"),
        _ => None,
    }
}

/// Returns the language name written in its own script.
pub fn native_name(code: &str) -> Option<&'static str> {
    match primary_language(code) {
        "en" => Some("English"),
        "pl" => Some("Polski"),
        "de" => Some("Deutsch"),
        "fr" => Some("Français"),
        "es" => Some("Español"),
        "it" => Some("Italiano"),
        "pt" => Some("Português"),
        "nl" => Some("Nederlands"),
        "cs" => Some("Čeština"),
        "sk" => Some("Slovenčina"),
        "uk" => Some("Українська"),
        "ru" => Some("Русский"),
        "lt" => Some("Lietuvių"),
        "hu" => Some("Magyar"),
        "ro" => Some("Română"),
        "zh" => Some("中文"),
        "ja" => Some("日本語"),
        _ => None,
    }
}
