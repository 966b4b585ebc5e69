use super::*;

fn acme_widget() -> Option<RepoRef> {
    Some(RepoRef::new("acme", "widget"))
}

#[test]
fn test_parse_https_with_git_suffix() {
    assert_eq!(parse_reference("https://github.com/acme/widget.git"), acme_widget());
}

#[test]
fn test_parse_https_without_suffix() {
    assert_eq!(parse_reference("https://github.com/acme/widget"), acme_widget());
}

#[test]
fn test_parse_https_with_path_suffix() {
    assert_eq!(
        parse_reference("https://github.com/acme/widget/tree/main/src/lib.rs"),
        acme_widget()
    );
    assert_eq!(
        parse_reference("https://github.com/acme/widget/pull/12"),
        acme_widget()
    );
}

#[test]
fn test_parse_with_query_and_fragment() {
    assert_eq!(parse_reference("https://github.com/acme/widget?tab=readme"), acme_widget());
    assert_eq!(parse_reference("https://github.com/acme/widget#usage"), acme_widget());
}

#[test]
fn test_parse_trailing_slash() {
    assert_eq!(parse_reference("https://github.com/acme/widget/"), acme_widget());
}

#[test]
fn test_parse_ssh() {
    assert_eq!(parse_reference("git@github.com:acme/widget.git"), acme_widget());
    assert_eq!(parse_reference("git@github.com:acme/widget"), acme_widget());
}

#[test]
fn test_parse_host_without_dot() {
    assert_eq!(parse_reference("https://example-host/acme/widget"), acme_widget());
}

#[test]
fn test_parse_scheme_less() {
    assert_eq!(parse_reference("github.com/acme/widget"), acme_widget());
}

#[test]
fn test_parse_url_embedded_in_text() {
    assert_eq!(
        parse_reference("check out https://github.com/acme/widget, it's neat"),
        acme_widget()
    );
    assert_eq!(parse_reference("  https://github.com/acme/widget.  "), acme_widget());
}

#[test]
fn test_parse_first_url_wins() {
    assert_eq!(
        parse_reference("https://github.com/acme/widget and https://github.com/other/thing"),
        acme_widget()
    );
}

#[test]
fn test_parse_dotted_repo_name() {
    assert_eq!(
        parse_reference("https://github.com/acme/widget.rs"),
        Some(RepoRef::new("acme", "widget.rs"))
    );
}

#[test]
fn test_parse_missing_repo_segment() {
    assert_eq!(parse_reference("https://github.com/acme"), None);
    assert_eq!(parse_reference("https://github.com/"), None);
    assert_eq!(parse_reference("git@github.com:acme"), None);
}

#[test]
fn test_parse_not_a_url() {
    assert_eq!(parse_reference(""), None);
    assert_eq!(parse_reference("not-a-url"), None);
    assert_eq!(parse_reference("acme/widget"), None);
    assert_eq!(parse_reference("my thoughts about widgets"), None);
}

#[test]
fn test_parse_rejects_dot_segments() {
    assert_eq!(parse_reference("https://github.com/../widget"), None);
}

#[test]
fn test_canonical_url_round_trip() {
    for (owner, name) in [("acme", "widget"), ("rust-lang", "rust"), ("a_b", "c.d")] {
        let reference = RepoRef::new(owner, name);
        assert_eq!(parse_reference(&reference.canonical_url()), Some(reference));
    }
}

#[test]
fn test_url_on_custom_host_round_trip() {
    let reference = RepoRef::new("acme", "widget");
    let url = reference.url_on("example-host");
    assert_eq!(url, "https://example-host/acme/widget");
    assert_eq!(parse_reference(&url), Some(reference));
}

#[test]
fn test_full_name_and_display() {
    let reference = RepoRef::new("acme", "widget");
    assert_eq!(reference.full_name(), "acme/widget");
    assert_eq!(reference.to_string(), "acme/widget");
}
