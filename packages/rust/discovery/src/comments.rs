//! Comment extraction for hidden-reference filtering.

use std::sync::LazyLock;

use regex::Regex;

/// Markup (`<!-- -->`), block (`/* */`) and line (`//`) comments.
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s:<!--.*?-->)|(?s:/\*.*?\*/)|//.*").expect("valid regex")
});

/// Every comment region in `content`, in source order, delimiters included.
///
/// Purely lexical: a `//` inside a string literal or URL counts as a line
/// comment too.
pub fn extract_comments(content: &str) -> Vec<&str> {
    COMMENT_RE.find_iter(content).map(|m| m.as_str()).collect()
}

/// All comment regions joined with newlines.
pub(crate) fn combined_comments(content: &str) -> String {
    extract_comments(content).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_comment_kinds() {
        let src = "<template>\n  <!-- <Btn/> -->\n  <Card/>\n</template>\n\
                   <script>\n/* multi\n line */\nconst a = 1 // trailing\n</script>";
        let comments = extract_comments(src);
        assert_eq!(
            comments,
            vec!["<!-- <Btn/> -->", "/* multi\n line */", "// trailing"]
        );
    }

    #[test]
    fn line_comment_stops_at_newline() {
        let comments = extract_comments("// one\ncode\n// two");
        assert_eq!(comments, vec!["// one", "// two"]);
    }

    #[test]
    fn no_comments() {
        assert!(extract_comments("<template><Btn/></template>").is_empty());
        assert_eq!(combined_comments(""), "");
    }

    #[test]
    fn combined_joins_with_newlines() {
        assert_eq!(combined_comments("/*a*/ x //b"), "/*a*/\n//b");
    }
}
