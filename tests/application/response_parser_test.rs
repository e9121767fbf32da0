use bill_extractor::application::services::{ParseError, parse_model_json, strip_code_fences};

#[test]
fn given_fenced_json_when_stripping_then_markers_are_removed() {
    let text = "```json\n{\"total_item_count\": 0}\n```";

    assert_eq!(strip_code_fences(text), "{\"total_item_count\": 0}");
}

#[test]
fn given_uppercase_fence_when_stripping_then_markers_are_removed() {
    let text = "```JSON\n{}\n```\n";

    assert_eq!(strip_code_fences(text), "{}");
}

#[test]
fn given_plain_json_when_parsing_then_returns_object() {
    let value = parse_model_json(r#"{"total_item_count": 3}"#).unwrap();

    assert_eq!(value["total_item_count"], 3);
}

#[test]
fn given_json_surrounded_by_prose_when_parsing_then_extracts_object() {
    let text = "Here is the data you asked for:\n{\"total_item_count\": 1}\nLet me know!";

    let value = parse_model_json(text).unwrap();

    assert_eq!(value["total_item_count"], 1);
}

#[test]
fn given_prose_only_when_parsing_then_returns_not_json() {
    let result = parse_model_json("The image is too blurry to read.");

    assert!(matches!(result, Err(ParseError::NotJson(_))));
}

#[test]
fn given_json_array_when_parsing_then_returns_not_an_object() {
    let result = parse_model_json("[1, 2, 3]");

    assert!(matches!(result, Err(ParseError::NotAnObject)));
}

#[test]
fn given_only_fences_when_parsing_then_returns_empty() {
    let result = parse_model_json("```json\n```");

    assert!(matches!(result, Err(ParseError::Empty)));
}
