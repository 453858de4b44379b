//! Conversions between the two spellings of a component identifier.

use std::sync::LazyLock;

use regex::Regex;

/// `UiButton` → `ui-button`.
///
/// A hyphen goes in at every lowercase→uppercase boundary, then the whole
/// string is lowercased. Runs of capitals are not split (`URLInput` → `urlinput`).
pub fn to_kebab_case(name: &str) -> String {
    static BOUNDARY_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));

    BOUNDARY_RE.replace_all(name, "$1-$2").to_lowercase()
}

/// `ui-button` → `UiButton`.
///
/// Upper-cases the first character and every word character following a
/// hyphen, dropping that hyphen.
pub fn to_pascal_case(name: &str) -> String {
    static WORD_START_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\w|-\w").expect("valid regex"));

    WORD_START_RE
        .replace_all(name, |caps: &regex::Captures| {
            caps[0].trim_start_matches('-').to_uppercase()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case_conversions() {
        assert_eq!(to_kebab_case("camelCase"), "camel-case");
        assert_eq!(to_kebab_case("PascalCase"), "pascal-case");
        assert_eq!(to_kebab_case("UiButton"), "ui-button");
        assert_eq!(to_kebab_case("BaseHeaderMenu"), "base-header-menu");
        assert_eq!(to_kebab_case("Btn"), "btn");
        assert_eq!(to_kebab_case("URLInput"), "urlinput");
        assert_eq!(to_kebab_case(""), "");
    }

    #[test]
    fn pascal_case_conversions() {
        assert_eq!(to_pascal_case("ui-button"), "UiButton");
        assert_eq!(to_pascal_case("UiButton"), "UiButton");
        assert_eq!(to_pascal_case("modal"), "Modal");
        assert_eq!(to_pascal_case("base-header-menu"), "BaseHeaderMenu");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn kebab_then_pascal_restores_simple_names() {
        for name in ["UiButton", "Btn", "BaseHeader", "UiTextarea"] {
            assert_eq!(to_pascal_case(&to_kebab_case(name)), name);
        }
    }
}
