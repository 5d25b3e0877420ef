use super::*;

#[test]
fn format_time_ago_renders_zero_as_dash() {
    assert_eq!(format_time_ago(0), "-");
}

#[test]
fn format_elapsed_buckets_by_unit() {
    assert_eq!(format_elapsed(5), "5s");
    assert_eq!(format_elapsed(90), "1m");
    assert_eq!(format_elapsed(7_200), "2h");
    assert_eq!(format_elapsed(172_800), "2d");
}

#[test]
fn handle_list_prints_empty_message_for_text_format() {
    let items: Vec<u32> = Vec::new();
    handle_list(OutputFormat::Text, &items, "nothing here", |_, _| {}).unwrap();
}

#[test]
fn format_or_json_invokes_text_fn_for_text_format() {
    let mut called = false;
    format_or_json(OutputFormat::Text, &42, || called = true).unwrap();
    assert!(called);
}
