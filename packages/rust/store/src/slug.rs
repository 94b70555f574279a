use std::sync::LazyLock;

use regex::Regex;

/// Turn a category name into a lowercase, dash-separated URL token.
///
/// `"men's clothing"` becomes `"men-s-clothing"`. Characters outside
/// `[a-z0-9]` collapse into a single dash; leading and trailing dashes are
/// dropped.
pub fn slugify(name: &str) -> String {
    static NON_ALNUM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

    let lowered = name.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
