//! Utility functions for label escaping in Newick strings.
//!
//! Labels are written verbatim unless they contain a byte the parser would
//! treat specially, in which case they are wrapped in single quotes with any
//! internal single quote doubled. [unescape_label] is the exact inverse, so
//! `unescape_label(&escape_label(l)) == l` for every label `l`.

/// Bytes that force a label to be quoted when written.
const SPECIAL_CHARS: &[char] = &[
    ' ', ',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\'',
];

/// Checks if a label needs quoting to survive a Newick round trip.
///
/// # Examples
/// ```
/// # use phylograph::parser::utils::needs_quoting;
/// assert!(!needs_quoting("Pukeko"));
/// assert!(!needs_quoting("Australasian_Swamphen"));
/// assert!(needs_quoting("Australasian Swamphen"));
/// assert!(needs_quoting("Pu[ke]ko"));
/// assert!(needs_quoting("Baillon's"));
/// ```
pub fn needs_quoting(label: &str) -> bool {
    label.contains(SPECIAL_CHARS)
}

/// Checks if a label is enclosed in single quotes.
///
/// # Examples
/// ```
/// # use phylograph::parser::utils::is_single_quoted;
/// assert_eq!(is_single_quoted("Pukeko"), false);
/// assert_eq!(is_single_quoted("'Swamp hen'"), true);
/// assert_eq!(is_single_quoted("'"), false);
/// ```
pub fn is_single_quoted(label: &str) -> bool {
    label.len() >= 2 && label.starts_with('\'') && label.ends_with('\'')
}

/// Escapes a label for safe use in a Newick string.
///
/// # Examples
/// ```
/// # use phylograph::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Australasian_Swamphen"), "Australasian_Swamphen");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if !needs_quoting(label) {
        return label.to_string();
    }

    let mut escaped = String::with_capacity(label.len() + 4);
    escaped.push('\'');
    escaped.push_str(&label.replace('\'', "''"));
    escaped.push('\'');
    escaped
}

/// Unescapes a label written by [escape_label].
///
/// # Examples
/// ```
/// # use phylograph::parser::utils::unescape_label;
/// assert_eq!(unescape_label("Pukeko"), "Pukeko");
/// assert_eq!(unescape_label("'Australasian Swamphen'"), "Australasian Swamphen");
/// assert_eq!(unescape_label("'Baillon''s_Crake'"), "Baillon's_Crake");
/// ```
pub fn unescape_label(label: &str) -> String {
    if is_single_quoted(label) {
        label[1..label.len() - 1].replace("''", "'")
    } else {
        label.to_string()
    }
}
