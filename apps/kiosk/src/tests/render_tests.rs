use super::*;

use navigation::CarProfile;

fn snapshot(state: NavigationState) -> NavigationSnapshot {
    NavigationSnapshot {
        state,
        car_index: 1,
        car_name: Some("Jeep Wrangler".into()),
        option_index: 0,
        option_label: "360 View",
        frame_index: None,
        frame_count: 0,
        playback_active: false,
        notice: None,
    }
}

fn text_renderer() -> TextRenderer<Vec<u8>> {
    let catalog = Catalog::new(vec![
        CarProfile::new("Ford F-150"),
        CarProfile::new("Jeep Wrangler"),
    ]);
    TextRenderer::new(&catalog, Arc::new(FrameLibrary::default()), Vec::new())
}

#[test]
fn car_menu_marks_selected_car() {
    let lines = text_renderer().compose(&snapshot(NavigationState::CarMenu));
    assert_eq!(lines[0], "Car Selection Menu");
    assert_eq!(lines[1], "   Ford F-150");
    assert_eq!(lines[2], ">> Jeep Wrangler");
}

#[test]
fn options_menu_lists_both_options_and_notice() {
    let mut snap = snapshot(NavigationState::OptionsMenu);
    snap.option_index = 1;
    snap.notice = Some("Video not available for Jeep Wrangler.".into());
    let lines = text_renderer().compose(&snap);
    assert!(lines.contains(&"   360 View".to_string()));
    assert!(lines.contains(&">> Show Video".to_string()));
    assert_eq!(
        lines.last().map(String::as_str),
        Some("! Video not available for Jeep Wrangler.")
    );
}

#[test]
fn carousel_shows_one_based_frame_counter() {
    let mut snap = snapshot(NavigationState::Carousel);
    snap.frame_index = Some(4);
    snap.frame_count = 36;
    let lines = text_renderer().compose(&snap);
    assert_eq!(lines[0], "360 View: Frame 5/36");
}

#[test]
fn text_renderer_writes_a_blank_separated_screen() {
    let mut renderer = text_renderer();
    renderer
        .render(&snapshot(NavigationState::Idle))
        .expect("render");
    let written = String::from_utf8(renderer.out.clone()).expect("utf8");
    assert_eq!(written, "\nWaiting for TUIO marker...\n");
}

#[test]
fn json_renderer_writes_one_line_per_snapshot() {
    let mut renderer = JsonRenderer::new(Vec::new());
    renderer
        .render(&snapshot(NavigationState::VideoPlayback))
        .expect("render");
    renderer
        .render(&snapshot(NavigationState::Idle))
        .expect("render");

    let written = String::from_utf8(renderer.out).expect("utf8");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).expect("json");
    assert_eq!(first["state"], "video_playback");
}
