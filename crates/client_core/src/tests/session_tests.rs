use super::*;

fn files(names: &[&str]) -> Vec<SelectedImage> {
    SelectedImage::from_paths(names.iter().map(|name| format!("/frames/{name}")))
}

fn urls(values: &[&str]) -> Vec<ImageUrl> {
    values.iter().map(|value| ImageUrl::from(*value)).collect()
}

fn animation(url: &str) -> AnimationResult {
    AnimationResult {
        animation_url: url.into(),
        download_path: None,
    }
}

#[test]
fn new_session_has_nothing_enabled() {
    let session = AnimatorSession::new();
    assert_eq!(session.phase(), SessionPhase::Unselected);
    assert!(!session.can_upload());
    assert!(!session.can_animate());
}

#[test]
fn selecting_zero_files_keeps_upload_disabled() {
    let mut session = AnimatorSession::new();
    session.select_files(files(&["a.png"]));
    assert!(session.can_upload());

    session.select_files(Vec::new());
    assert!(!session.can_upload());
    assert_eq!(session.phase(), SessionPhase::Unselected);
    assert_eq!(session.begin_upload(), Err(SessionError::NoFilesSelected));
}

#[test]
fn upload_then_animate_walks_every_phase() {
    let mut session = AnimatorSession::new();
    session.select_files(files(&["a.png", "b.png"]));
    assert_eq!(session.phase(), SessionPhase::Selected);

    let sending = session.begin_upload().expect("upload starts");
    assert_eq!(sending.len(), 2);
    assert!(session.complete_upload(urls(&["a", "b"])));
    assert_eq!(session.phase(), SessionPhase::Uploaded);
    assert!(session.can_animate());

    let to_animate = session.begin_animate().expect("animate starts");
    assert_eq!(to_animate.urls(), urls(&["a", "b"]).as_slice());
    session.complete_animate(animation("https://cdn.example/out.gif"));
    assert_eq!(session.phase(), SessionPhase::Animated);
}

#[test]
fn animate_requires_a_prior_successful_upload() {
    let mut session = AnimatorSession::new();
    session.select_files(files(&["a.png"]));
    assert_eq!(session.begin_animate(), Err(SessionError::NothingUploaded));
    assert!(!session.animate_in_flight());

    session.begin_upload().expect("upload starts");
    session.fail_upload();
    assert!(!session.can_animate());
    assert_eq!(session.begin_animate(), Err(SessionError::NothingUploaded));
}

#[test]
fn in_flight_requests_reject_double_submission() {
    let mut session = AnimatorSession::new();
    session.select_files(files(&["a.png"]));
    session.begin_upload().expect("first upload");
    assert!(!session.can_upload());
    assert_eq!(session.begin_upload(), Err(SessionError::UploadInFlight));

    session.complete_upload(urls(&["a"]));
    session.begin_animate().expect("first animate");
    assert!(!session.can_animate());
    assert_eq!(session.begin_animate(), Err(SessionError::AnimateInFlight));

    session.fail_animate();
    assert!(session.can_animate());
}

#[test]
fn new_selection_keeps_previous_upload_and_new_upload_replaces_it() {
    let mut session = AnimatorSession::new();
    session.select_files(files(&["a.png"]));
    session.begin_upload().expect("upload");
    session.complete_upload(urls(&["first"]));
    session.begin_animate().expect("animate");
    session.complete_animate(animation("https://cdn.example/1.gif"));

    session.select_files(files(&["b.png", "c.png"]));
    assert_eq!(
        session.uploaded().map(|u| u.urls().to_vec()),
        Some(urls(&["first"]))
    );

    session.begin_upload().expect("second upload");
    session.complete_upload(urls(&["second", "third"]));
    assert!(session.animation().is_none());
    assert_eq!(
        session.uploaded().map(|u| u.urls().to_vec()),
        Some(urls(&["second", "third"]))
    );
}

#[test]
fn empty_upload_response_leaves_nothing_to_animate() {
    let mut session = AnimatorSession::new();
    session.select_files(files(&["a.png"]));
    session.begin_upload().expect("upload");
    assert!(!session.complete_upload(Vec::new()));
    assert!(!session.can_animate());
    assert!(session.can_upload());
}

#[test]
fn empty_upload_response_keeps_earlier_upload_and_animation() {
    let mut session = AnimatorSession::new();
    session.select_files(files(&["a.png"]));
    session.begin_upload().expect("first upload");
    assert!(session.complete_upload(urls(&["first"])));
    session.begin_animate().expect("animate");
    session.complete_animate(animation("https://cdn.example/1.gif"));

    session.select_files(files(&["b.png"]));
    session.begin_upload().expect("second upload");
    assert!(!session.complete_upload(Vec::new()));

    assert_eq!(
        session.uploaded().map(|u| u.urls().to_vec()),
        Some(urls(&["first"]))
    );
    assert!(session.can_animate());
    assert_eq!(session.phase(), SessionPhase::Animated);
    assert!(session.animation().is_some());
}
