//! Permissive tag-name comparison
//!
//! One shared pure function used by the raw-text path resolver, the tree
//! extractor, and the unique-key collector. All three must agree on what
//! "the same tag" means, so this is the only place the rule lives.

/// Local part of a tag name: everything after the first colon
pub fn local_name(tag: &str) -> &str {
    match tag.find(':') {
        Some(pos) => &tag[pos + 1..],
        None => tag,
    }
}

/// Check whether two tag names match permissively: exact, else
/// case-insensitive, else by local name with the namespace prefix stripped
pub fn tags_match(a: &str, b: &str) -> bool {
    if a == b || a.eq_ignore_ascii_case(b) {
        return true;
    }
    let a_local = local_name(a);
    let b_local = local_name(b);
    a_local == b_local || a_local.eq_ignore_ascii_case(b_local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_case_insensitive() {
        assert!(tags_match("Foo", "Foo"));
        assert!(tags_match("Foo", "foo"));
        assert!(!tags_match("Foo", "Bar"));
    }

    #[test]
    fn test_namespace_local_match() {
        assert!(tags_match("ns:Foo", "foo"));
        assert!(tags_match("Foo", "ns:foo"));
        assert!(!tags_match("ns:Foo", "ns:Bar"));
    }

    #[test]
    fn test_symmetry() {
        for (a, b) in [("ns:Foo", "foo"), ("A", "a"), ("x:y", "z:y")] {
            assert_eq!(tags_match(a, b), tags_match(b, a));
        }
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("svg:rect"), "rect");
        assert_eq!(local_name("plain"), "plain");
        assert_eq!(local_name("a:b:c"), "b:c");
    }
}
