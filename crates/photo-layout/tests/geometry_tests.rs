use photo_layout::*;

fn image() -> Size<OriginalSpace> {
    Size::new(1000.0, 800.0)
}

fn boxed_photo() -> Photo {
    let mut photo = Photo::new("photos/dog.jpg", "dog.jpg");
    photo.annotations.push(Annotation {
        id: AnnotationId::from("box"),
        rect: Rect::new(100.0, 100.0, 50.0, 50.0),
        color: "#0000ff".to_string(),
        rotation: 0.0,
        kind: AnnotationKind::Shape {
            shape: ShapeKind::Rectangle,
            width_value: 4.0,
            fill: TRANSPARENT.to_string(),
        },
    });
    photo
}

#[test]
fn test_display_roundtrip_is_exact() {
    let scales = [
        Scale::new(0.5, 0.5),
        Scale::new(0.25, 0.8),
        Scale::new(1.7, 1.3),
        Scale::new(1.0 / 3.0, 1.0 / 3.0),
    ];
    let rects = [
        Rect::new(0.0, 0.0, 1000.0, 800.0),
        Rect::new(100.0, 100.0, 50.0, 50.0),
        Rect::new(999.0, 799.0, 1.0, 1.0),
        Rect::new(333.0, 17.0, 421.0, 600.0),
    ];

    for scale in scales {
        for rect in rects {
            let back = to_original(&to_display(&rect, scale), scale, image());
            assert_eq!(back, rect, "scale {:?}", scale);
        }
    }
}

#[test]
fn test_back_projection_clamps() {
    let scale = Scale::new(0.5, 0.5);
    let outside = Rect::<DisplaySpace>::new(480.0, -20.0, 100.0, 30.0);

    let rect = to_original(&outside, scale, image());

    assert_eq!(rect, Rect::new(960.0, 0.0, 40.0, 60.0));
    assert!(image().bounds().contains_rect(&rect));
}

#[test]
fn test_normalized_roundtrip() {
    let rect = Rect::<OriginalSpace>::new(250.0, 200.0, 500.0, 400.0);
    let normalized = to_normalized(&rect, image());
    assert_eq!(normalized, Rect::new(0.25, 0.25, 0.5, 0.5));

    let display = from_normalized(&normalized, Size::<DisplaySpace>::new(400.0, 300.0));
    assert_eq!(display, Rect::new(100.0, 75.0, 200.0, 150.0));
}

#[test]
fn test_drag_back_projects_at_inverse_scale() {
    let mut session =
        EditSession::open_with_size(boxed_photo(), image(), Size::new(500.0, 400.0));
    let id = AnnotationId::from("box");
    assert_eq!(session.annotations()[0].rect, Rect::new(50.0, 50.0, 25.0, 25.0));

    let moved = session.drag(&id, Point::new(60.0, 60.0), (0.0, 0.0)).unwrap();
    assert_eq!(moved, Rect::new(60.0, 60.0, 25.0, 25.0));

    let committed = session.commit();
    assert_eq!(committed[0].rect, Rect::new(120.0, 120.0, 50.0, 50.0));
    match &committed[0].kind {
        AnnotationKind::Shape { width_value, .. } => assert_eq!(*width_value, 4.0),
        _ => panic!("Expected a shape annotation"),
    }
}

#[test]
fn test_drag_stays_inside_image() {
    let mut session =
        EditSession::open_with_size(boxed_photo(), image(), Size::new(500.0, 400.0));
    let id = AnnotationId::from("box");

    let moved = session.drag(&id, Point::new(900.0, -50.0), (0.0, 0.0)).unwrap();

    assert_eq!(moved, Rect::new(470.0, 5.0, 25.0, 25.0));
}

#[test]
fn test_resize_keeps_opposite_edge() {
    let mut session =
        EditSession::open_with_size(boxed_photo(), image(), Size::new(500.0, 400.0));
    let id = AnnotationId::from("box");
    let start = session.annotations()[0].rect;

    let rect = session
        .resize(&id, ResizeHandle::SouthEast, &start, (30.0, 10.0))
        .unwrap();
    assert_eq!(rect, Rect::new(50.0, 50.0, 55.0, 35.0));

    let rect = session
        .resize(&id, ResizeHandle::NorthWest, &rect, (100.0, 100.0))
        .unwrap();
    assert_eq!(rect.right(), 105.0);
    assert_eq!(rect.bottom(), 85.0);
    assert_eq!((rect.width, rect.height), (20.0, 20.0));
}

#[test]
fn test_viewport_resize_keeps_original_geometry() {
    let mut session =
        EditSession::open_with_size(boxed_photo(), image(), Size::new(500.0, 400.0));

    session.resize_viewport(Size::new(250.0, 200.0));

    assert_eq!(session.scale(), Scale::new(0.25, 0.25));
    assert_eq!(session.annotations()[0].rect, Rect::new(25.0, 25.0, 12.5, 12.5));
    assert_eq!(session.commit()[0].rect, Rect::new(100.0, 100.0, 50.0, 50.0));
}

#[test]
fn test_session_edits_and_saves() {
    let photo = boxed_photo();
    let photo_id = photo.id.clone();
    let mut project = Project::new();
    project.add_photos(vec![photo.clone()]);

    let mut session = EditSession::open_with_size(photo, image(), Size::new(500.0, 400.0));
    let text = session.add_text(
        Point::new(100.0, 100.0),
        "",
        20.0,
        "Arial",
        "#000000",
        Direction::Ltr,
        &CharWidthMeasure::helvetica(20.0),
    );
    assert_eq!(session.active(), Some(&text));

    session
        .update(&text, AnnotationPatch::text("Good boy"))
        .unwrap();
    assert!(session.remove(&AnnotationId::from("box")).is_some());
    assert!(session.remove(&AnnotationId::from("box")).is_none());
    assert!(session.select(Some(&AnnotationId::from("box"))).is_err());

    session.save_into(&mut project).unwrap();

    let saved = project.photo(&photo_id).unwrap();
    assert_eq!(saved.annotations.len(), 1);
    assert_eq!(saved.annotations[0].text(), Some("Good boy"));
    match &saved.annotations[0].kind {
        AnnotationKind::Text { size, .. } => assert_eq!(*size, 40.0),
        _ => panic!("Expected a text annotation"),
    }
    assert!(image().bounds().contains_rect(&saved.annotations[0].rect));
}

#[test]
fn test_new_text_starts_on_the_image() {
    let display = Size::<DisplaySpace>::new(500.0, 400.0);
    let mut session = EditSession::open_with_size(boxed_photo(), image(), display);
    let measure = CharWidthMeasure::helvetica(20.0);

    // Right-to-left text grows leftwards from the anchor
    let id = session.add_text(
        Point::new(10.0, 5.0),
        "A caption that is wide",
        20.0,
        "Arial",
        "#000000",
        Direction::Rtl,
        &measure,
    );
    let rect = session.annotations().iter().find(|a| a.id == id).unwrap().rect;
    assert_eq!(rect.x, 0.0);
    assert_eq!(rect.y, 0.0);
    assert!(rect.width > 10.0);
    assert!(display.bounds().contains_rect(&rect));

    let long = "x".repeat(200);
    let id = session.add_text(
        Point::new(490.0, 395.0),
        long,
        20.0,
        "Arial",
        "#000000",
        Direction::Ltr,
        &measure,
    );
    let rect = session.annotations().iter().find(|a| a.id == id).unwrap().rect;
    assert_eq!(rect.width, 500.0);
    assert!(display.bounds().contains_rect(&rect));
}

#[test]
fn test_wrap_respects_width() {
    let per_char = |text: &str| text.chars().count() as f64;
    let text = "a bb ccc dddd eeeee ffffff ggggggg hhhhhhhhhhhh i";

    for max_width in [1.0, 4.0, 7.0, 12.0, 30.0] {
        for line in wrap_text(text, max_width, &per_char) {
            let single_word = !line.contains(' ');
            assert!(
                per_char(&line) <= max_width || single_word,
                "line {:?} exceeds {}",
                line,
                max_width
            );
        }
    }
}
