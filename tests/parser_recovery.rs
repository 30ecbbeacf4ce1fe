use serde_json::{json, Value};
use studyguide_core::parser::{balanced_blocks, parse, parse_with, repair, strip_fence, Unparseable};

#[test]
fn parses_clean_json() {
    assert_eq!(parse(r#"{"a": 1}"#), Ok(json!({"a": 1})));
}

#[test]
fn never_fails_hard_on_junk() {
    let inputs = [
        "",
        "   \n\t ",
        "This is not JSON at all.",
        "```",
        "```json",
        "{",
        "}}}]]]",
        r#"{"unterminated": "string"#,
        "``` ```json ``` {[}]",
        "\u{1F600} {\u{1F600}: ]",
    ];
    for input in inputs {
        assert_eq!(parse(input), Err(Unparseable), "input {input:?}");
    }
}

#[test]
fn strips_json_tagged_fence() {
    assert_eq!(parse("```json\n{\"a\": 1}\n```"), Ok(json!({"a": 1})));
}

#[test]
fn strips_fence_surrounded_by_prose() {
    let text = "Here is the result:\n```json\n{\"a\": 1}\n```\nDone.";
    assert_eq!(parse(text), Ok(json!({"a": 1})));
}

#[test]
fn strips_untagged_fence() {
    let text = "Result:\n```\n{\"a\": 1}\n```";
    assert_eq!(parse(text), Ok(json!({"a": 1})));
}

#[test]
fn strip_fence_leaves_unfenced_text_alone() {
    assert_eq!(strip_fence("{\"a\": 1}"), "{\"a\": 1}");
    assert_eq!(strip_fence("```JSON\n[1]\n```"), "[1]");
}

#[test]
fn recovers_from_trailing_comma() {
    assert_eq!(parse(r#"{"a": 1, "b": 2,}"#), Ok(json!({"a": 1, "b": 2})));
}

#[test]
fn recovers_trailing_comma_inside_fence() {
    let text = "```json\n{\"a\": 1, \"b\": 2,}\n```";
    assert_eq!(parse(text), Ok(json!({"a": 1, "b": 2})));
}

#[test]
fn recovers_literal_newline_inside_string() {
    let text = "{\"text\": \"line one\nline two\"}";
    let value = parse(text).unwrap();
    assert_eq!(value["text"], Value::String("line one\nline two".into()));
}

#[test]
fn extracts_object_embedded_in_prose() {
    let text = r#"The answer is {"key": "value"} as shown above."#;
    assert_eq!(parse(text), Ok(json!({"key": "value"})));
}

#[test]
fn skips_unparseable_bracket_before_real_object() {
    let text = r#"See [figure 2] for details: {"selected": [{"slide": 1, "index": 0}]}"#;
    assert_eq!(
        parse(text),
        Ok(json!({"selected": [{"slide": 1, "index": 0}]}))
    );
}

#[test]
fn repairs_embedded_object_with_defects() {
    let text = "Sure!\n{\"questions\": [\n  {\"type\": \"true_false\", \"statement\": \"Cells\ndivide\", \"answer\": true},\n]}\nHope that helps.";
    let value = parse(text).unwrap();
    assert_eq!(value["questions"][0]["statement"], "Cells\ndivide");
}

#[test]
fn braces_inside_strings_do_not_unbalance() {
    let text = r#"note: {"pattern": "a } b { c", "n": [1, 2]} end"#;
    let blocks: Vec<&str> = balanced_blocks(text).collect();
    assert_eq!(blocks[0], r#"{"pattern": "a } b { c", "n": [1, 2]}"#);
    assert_eq!(parse(text), Ok(json!({"pattern": "a } b { c", "n": [1, 2]})));
}

#[test]
fn escaped_quotes_inside_strings_are_respected() {
    let text = r#"x {"q": "say \"hi\" {"} y"#;
    assert_eq!(parse(text), Ok(json!({"q": "say \"hi\" {"})));
}

#[test]
fn repair_escapes_newline_only_inside_strings() {
    let raw = "{\"text\": \"line one\nline two\"}";
    let repaired = repair(raw);
    assert_eq!(repaired, "{\"text\": \"line one\\nline two\"}");
    assert_eq!(
        serde_json::from_str::<Value>(&repaired).unwrap(),
        json!({"text": "line one\nline two"})
    );

    let pretty = "{\n  \"a\": 1\n}";
    assert_eq!(repair(pretty), pretty);
}

#[test]
fn repair_drops_trailing_commas() {
    assert_eq!(
        serde_json::from_str::<Value>(&repair(r#"["a", "b",]"#)).unwrap(),
        json!(["a", "b"])
    );
    assert_eq!(
        serde_json::from_str::<Value>(&repair("{\"a\": [1, 2 ,\n],\n}")).unwrap(),
        json!({"a": [1, 2]})
    );
}

#[test]
fn repair_keeps_commas_inside_strings() {
    let raw = r#"{"a": "x,}"}"#;
    assert_eq!(repair(raw), raw);
}

#[test]
fn valid_json_passes_through_repair() {
    let valid = r#"{"key": "value", "num": 42}"#;
    assert_eq!(repair(valid), valid);
}

#[test]
fn parse_is_stable_across_calls() {
    let text = "```json\n{\"a\": [1, 2,],}\n```";
    assert_eq!(parse(text), parse(text));
    assert_eq!(parse(text), Ok(json!({"a": [1, 2]})));
}

#[test]
fn plain_parse_takes_the_first_block_that_parses() {
    let text = "Slide [2]: {\"a\": 1}";
    assert_eq!(parse(text), Ok(json!([2])));
}

#[test]
fn parse_with_moves_past_values_of_the_wrong_shape() {
    let text = "Slide [2]: {\"a\": 1}";
    let object = parse_with(text, |value| value.is_object().then_some(value));
    assert_eq!(object, Ok(json!({"a": 1})));

    let never = parse_with(text, |_| None::<Value>);
    assert_eq!(never, Err(Unparseable));
}
