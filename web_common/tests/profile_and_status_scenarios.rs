use web_common::*;

#[test]
fn test_added_profile_appears_in_next_listing() {
    let before: ProfileList = serde_json::from_str(
        r#"{"profiles": [{"name": "CPU", "args": "-i {input} -f mpegts pipe:1"},
                         {"name": "CUDA", "args_str": "-hwaccel cuda -i {input} -f mpegts pipe:1"}],
            "selected": "CPU"}"#,
    )
    .unwrap();

    let (name, args) =
        validate_new_profile("Fast", "-i {input} -c copy -f mpegts pipe:1", &before.profiles).unwrap();
    let body = serde_json::to_value(NewProfileRequest { name, args }).unwrap();
    assert_eq!(body["name"], "Fast");
    assert_eq!(body["args"], "-i {input} -c copy -f mpegts pipe:1");

    let after: ProfileList = serde_json::from_str(
        r#"{"profiles": [{"name": "CPU", "args": "-i {input} -f mpegts pipe:1"},
                         {"name": "CUDA", "args": "-hwaccel cuda -i {input} -f mpegts pipe:1"},
                         {"name": "Fast", "args": "-i {input} -c copy -f mpegts pipe:1"}],
            "selected": "CPU"}"#,
    )
    .unwrap();
    let fast = after.profiles.iter().find(|p| p.name == "Fast").unwrap();
    assert_eq!(fast.args, "-i {input} -c copy -f mpegts pipe:1");
    assert!(!is_protected_profile(&fast.name));

    let select = serde_json::to_value(SelectProfileRequest { name: fast.name.clone() }).unwrap();
    assert_eq!(select, serde_json::json!({"name": "Fast"}));
}

#[test]
fn test_error_bodies_normalize_across_shapes() {
    for (body, expected) in [
        (r#"{"detail": "Channel not found"}"#, "Channel not found"),
        (r#"{"error": "Invalid file type"}"#, "Invalid file type"),
        (r#"{"message": "Nothing to do"}"#, "Nothing to do"),
        (r#"{"msg": "Bad input"}"#, "Bad input"),
        (r#"{"detail": [{"msg": "a"}, {"msg": "b"}]}"#, "a\nb"),
        (r#"{"errors": ["ignored"], "detail": ["x", "y"]}"#, "x\ny"),
    ] {
        let err = ApiError::from_http(400, body);
        assert_eq!(err.message(), expected, "body: {}", body);
    }
}

#[test]
fn test_stream_status_empty_and_populated() {
    let empty: StreamStatusMap = serde_json::from_str("{}").unwrap();
    assert!(summarize_streams(&empty).is_empty());

    let map: StreamStatusMap = serde_json::from_str(
        r#"{"2": {"subscriber_count": 4, "stream_url": "http://up/2", "channel_name": "Two",
                  "current_program": {"title": "Quiz"},
                  "probe_info": {"streams": [{"codec_type": "video", "codec_name": "hevc",
                                              "width": 1280, "height": 720}]}}}"#,
    )
    .unwrap();
    let rows = summarize_streams(&map);
    assert_eq!(rows[0].subscribers, 4);
    assert_eq!(rows[0].resolution, "1280x720");
    assert_eq!(rows[0].audio, "N/A");
}
