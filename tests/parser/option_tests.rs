//! Option grammar and arity tests.

use branchline_parser::{CommandLineParser, OptionValue, ParseError, ValueSource};

use crate::common::build;

fn tree() -> CommandLineParser<()> {
    build()
}

#[test]
fn long_and_short_forms() {
    let line = tree().parse("build --target x86 -r").unwrap();
    assert_eq!(line.value("target"), Some("x86"));
    assert!(line.flag("release"));
    assert!(!line.flag("verbose"));
}

#[test]
fn inline_values() {
    let tree = tree();
    assert_eq!(tree.parse("build --target=arm").unwrap().value("target"), Some("arm"));
    assert_eq!(tree.parse("build -tarm").unwrap().value("target"), Some("arm"));
    assert_eq!(tree.parse("build -t=arm").unwrap().value("target"), Some("arm"));
    assert_eq!(tree.parse("build --target=").unwrap().value("target"), Some(""));
}

#[test]
fn flag_cluster_sets_every_flag() {
    let line = tree().parse("build -rv").unwrap();
    assert!(line.flag("release"));
    assert!(line.flag("verbose"));
}

#[test]
fn cluster_with_valued_option_is_malformed() {
    let err = tree().parse("build -rt").unwrap_err();
    assert!(matches!(err, ParseError::MalformedOption { token, .. } if token == "-rt"));
}

#[test]
fn flag_with_value_is_malformed() {
    assert!(matches!(
        tree().parse("build --release=yes"),
        Err(ParseError::MalformedOption { .. })
    ));
}

#[test]
fn malformed_dashes() {
    let tree = tree();
    for bad in ["---x", "--=x", "-=x"] {
        assert!(
            matches!(
                tree.parse(&format!("build {bad}")),
                Err(ParseError::MalformedOption { ref token, .. }) if token == bad
            ),
            "{bad} should be malformed"
        );
    }
}

#[test]
fn unknown_option_lists_valid_options() {
    let err = tree().parse("build --fast").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown option '--fast' for 'build'; valid options: --release, --verbose, \
         --target, --features, --packages, --define, --jobs"
    );
    assert!(matches!(
        tree().parse("build -x"),
        Err(ParseError::UnknownOption { option, .. }) if option == "-x"
    ));
}

#[test]
fn missing_value_at_end_or_before_option() {
    let tree = tree();
    let expected = ParseError::MissingValue {
        command: "build".into(),
        option: "--target".into(),
    };
    assert_eq!(tree.parse("build --target").unwrap_err(), expected);
    assert_eq!(tree.parse("build --target -r").unwrap_err(), expected);
}

#[test]
fn repeated_single_option_is_duplicate() {
    assert_eq!(
        tree().parse("build -t a -t b").unwrap_err(),
        ParseError::DuplicateOption {
            command: "build".into(),
            option: "--target".into(),
        }
    );
}

#[test]
fn list_option_splits_and_accumulates() {
    let line = tree()
        .parse("build --features a,b -F c --packages x:y")
        .unwrap();
    assert_eq!(line.values("features"), ["a", "b", "c"]);
    assert_eq!(line.values("packages"), ["x", "y"]);
}

#[test]
fn list_option_consumes_until_next_option() {
    let line = tree().parse("build --features a b -r src").unwrap();
    assert_eq!(line.values("features"), ["a", "b"]);
    assert!(line.flag("release"));
    assert_eq!(line.arguments(), ["src"]);
}

#[test]
fn empty_list_is_missing_value() {
    assert!(matches!(
        tree().parse("build --features -r"),
        Err(ParseError::MissingValue { .. })
    ));
}

#[test]
fn properties_merge() {
    let line = tree()
        .parse("build -Dmode=fast --define level=3 -D mode=slow")
        .unwrap();
    assert_eq!(line.property("define", "mode"), Some("slow"));
    assert_eq!(line.property("define", "level"), Some("3"));
    assert_eq!(line.property("define", "missing"), None);
}

#[test]
fn property_without_equals_is_malformed() {
    let err = tree().parse("build -Dfast").unwrap_err();
    assert_eq!(
        err,
        ParseError::MalformedOption {
            token: "fast".into(),
            reason: "expected key=value",
        }
    );
}

#[test]
fn default_value_applies_when_absent() {
    let tree = tree();
    let line = tree.parse("build").unwrap();
    assert_eq!(line.value("jobs"), Some("4"));
    assert_eq!(line.option("jobs").map(|o| o.source()), Some(ValueSource::Default));
    assert!(!line.has_option("jobs"));

    let line = tree.parse("build -j 8").unwrap();
    assert_eq!(line.parse_value::<u32>("jobs").unwrap(), Some(8));
    assert!(line.has_option("jobs"));
}

#[test]
fn parse_value_reports_conversion_failure() {
    let line = tree().parse("build -j many").unwrap();
    let err = line.parse_value::<u32>("jobs").unwrap_err();
    assert!(err.message.starts_with("cannot convert 'many' for '--jobs'"));
}

#[test]
fn end_of_options_makes_rest_positional() {
    let line = tree().parse("build -r -- -v --target").unwrap();
    assert!(line.flag("release"));
    assert!(!line.flag("verbose"));
    assert_eq!(line.arguments(), ["-v", "--target"]);
}

#[test]
fn dash_and_negative_numbers_are_words() {
    let line = tree().parse("build - -5 -0.5 -.25").unwrap();
    assert_eq!(line.arguments(), ["-", "-5", "-0.5", "-.25"]);

    let line = tree().parse("build -t -1").unwrap();
    assert_eq!(line.value("target"), Some("-1"));
}

#[test]
fn quoted_option_shapes_are_words() {
    let line = tree().parse(r#"build "--release" '-v'"#).unwrap();
    assert!(!line.flag("release"));
    assert_eq!(line.arguments(), ["--release", "-v"]);
}

#[test]
fn quoted_inline_values_keep_option_shape() {
    let line = tree()
        .parse(r#"build --target="x86 64" -Dmode="very fast" -F"a b,c""#)
        .unwrap();
    assert_eq!(line.value("target"), Some("x86 64"));
    assert_eq!(line.property("define", "mode"), Some("very fast"));
    assert_eq!(line.values("features"), ["a b", "c"]);
    assert!(line.arguments().is_empty());
}

#[test]
fn quoted_option_name_is_a_word() {
    let line = tree().parse(r#"build "--target"=x --"jobs""#).unwrap();
    assert_eq!(line.value("target"), None);
    assert_eq!(line.arguments(), ["--target=x", "--jobs"]);
}

#[test]
fn unterminated_quote_is_an_error() {
    assert_eq!(
        tree().parse(r#"build "src"#).unwrap_err(),
        ParseError::UnterminatedQuote { position: 6 }
    );
}

#[test]
fn option_values_in_declaration_order() {
    let line = tree().parse("build -j 2 -v -t arm").unwrap();
    let names: Vec<&str> = line.options().iter().map(|o| o.name()).collect();
    assert_eq!(names, ["release", "verbose", "target", "jobs"]);
    assert_eq!(
        line.option("verbose").map(|o| o.value().clone()),
        Some(OptionValue::Flag(true))
    );
}
