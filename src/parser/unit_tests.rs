use super::api::{parse_path, PathParser, Rule};
use super::util::{split_head, to_accessor_name, validate_path};
use crate::ds::error::PropertyError;

use pest::consumes_to;
use pest::parses_to;
use pest::Parser;

#[test]
fn test_single_segment() {
    parses_to! {
        parser: PathParser,
        input: "name",
        rule: Rule::path,
        tokens: [
            path(0, 4, [
                segment(0, 4),
                EOI(4, 4)
            ])
        ]
    };
}

#[test]
fn test_dotted_segments() {
    parses_to! {
        parser: PathParser,
        input: "child.name",
        rule: Rule::path,
        tokens: [
            path(0, 10, [
                segment(0, 5),
                segment(6, 10),
                EOI(10, 10)
            ])
        ]
    };
}

#[test]
fn test_empty_segments_do_not_parse() {
    for input in &["", ".", "a..b", ".a", "a.", "a. .b"] {
        assert!(
            PathParser::parse(Rule::path, input).is_err(),
            "'{}' should not parse",
            input
        );
    }
}

#[test]
fn test_parse_path_trims_segments() {
    let path = parse_path(" long \t.patH.rec.rmap. \t and.again ").unwrap();
    assert_eq!(path.names(), vec!["long", "patH", "rec", "rmap", "and", "again"]);
    assert_eq!(path.source, "long \t.patH.rec.rmap. \t and.again");
    assert_eq!(path.to_string(), "long.patH.rec.rmap.and.again");
}

#[test]
fn test_parse_path_keeps_remaining_text() {
    let path = parse_path("map.aa.bbb").unwrap();
    let rests: Vec<&str> = path.segments.iter().map(|s| s.rest.as_str()).collect();
    assert_eq!(rests, vec!["map.aa.bbb", "aa.bbb", "bbb"]);
}

#[test]
fn test_parse_path_allows_odd_characters() {
    let path = parse_path("rmap.LA$T.longValue").unwrap();
    assert_eq!(path.names(), vec!["rmap", "LA$T", "longValue"]);
}

#[test]
fn test_parse_path_error_is_invalid_path() {
    match parse_path("a..b") {
        Err(PropertyError::InvalidPath { path, .. }) => assert_eq!(path, "a..b"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_split_head() {
    assert_eq!(split_head("child.name").unwrap(), ("child", Some("name")));
    assert_eq!(split_head(" name ").unwrap(), ("name", None));
    assert_eq!(
        split_head("long \t.patH. \t and.again").unwrap(),
        ("long", Some("patH. \t and.again"))
    );
    assert!(split_head("").is_err());
    assert!(split_head(".a").is_err());
    assert!(split_head("a.").is_err());
}

#[test]
fn test_validate_path() {
    assert!(validate_path("child.name").is_ok());
    assert!(validate_path(" long \t.patH. \t and.again ").is_ok());
    assert!(validate_path("first name.x").is_ok());
    for path in &["", " ", ".", "a..b", ".a", "a.", "a. .b"] {
        assert!(validate_path(path).is_err(), "'{}' should be invalid", path);
    }
}

#[test]
fn test_to_accessor_name() {
    assert_eq!(to_accessor_name("get", "name"), "getName");
    assert_eq!(to_accessor_name("is", "valid"), "isValid");
    assert_eq!(to_accessor_name("set", "x"), "setX");
    assert_eq!(to_accessor_name("get", "URL"), "getURL");
}
