use photo_layout::*;
use std::io::Write;
use tempfile::NamedTempFile;

const SAVED_PROJECT: &str = r##"{
  "version": "1.1.0",
  "photos": [
    {
      "id": "p1",
      "src": "photos/a.jpg",
      "name": "a.jpg",
      "fileName": "a.jpg",
      "isEmpty": false,
      "annotations": [
        {
          "id": "t1",
          "x": 10, "y": 20, "width": 100, "height": 30,
          "color": "#000000",
          "type": "text",
          "text": "Hello",
          "size": "24",
          "font": "Arial"
        },
        {
          "id": "s1",
          "x": 0, "y": 0, "width": 50, "height": 50,
          "color": "red",
          "rotation": 15,
          "type": "shape",
          "shape": "arrow",
          "widthValue": "3",
          "fill": "transparent"
        }
      ],
      "originalWidth": 800,
      "originalHeight": 600
    },
    {
      "id": "p2",
      "src": "",
      "name": "Empty Slot 2",
      "fileName": "Empty Slot 2",
      "isEmpty": true,
      "annotations": []
    }
  ],
  "photoTexts": { "p1": "caption" },
  "savedTitles": { "0": "First page" },
  "rotations": { "p1": 90 },
  "pageLayouts": { "0": "1text", "3": "9" },
  "layout": "2",
  "globalTitle": "Album",
  "customStartPageNumber": 3
}"##;

fn sample_project() -> Project {
    let mut project = Project::new();
    let mut photo = Photo::new("photos/a.jpg", "a.jpg").with_size(Size::new(800.0, 600.0));
    photo.annotations.push(Annotation {
        id: AnnotationId::from("circle"),
        rect: Rect::new(40.0, 50.0, 120.0, 80.0),
        color: "#00ff00".to_string(),
        rotation: 0.0,
        kind: AnnotationKind::Shape {
            shape: ShapeKind::Circle,
            width_value: 3.0,
            fill: "rgba(0,255,0,0.2)".to_string(),
        },
    });
    let id = photo.id.clone();
    project.add_photos(vec![photo, Photo::new("photos/b.jpg", "b.jpg")]);
    project.set_photo_text(&id, "Lake");
    project.rotate_photo(&id, 270).unwrap();
    project.set_title(0, "Trip");
    project.set_page_layout(0, Some(Layout::OneText));
    project.set_global_title("Holidays");
    project.set_start_page_number(5);
    project
}

#[tokio::test]
async fn test_save_and_load_roundtrip() {
    let project = sample_project();
    let file = NamedTempFile::new().unwrap();

    project.save(file.path()).await.unwrap();
    let loaded = Project::load(file.path()).await.unwrap();

    assert_eq!(loaded.to_document(), project.to_document());
    assert_eq!(loaded.total_pages(), 2);
    assert_eq!(loaded.start_page_number(), 5);
}

#[test]
fn test_document_field_names() {
    let json = sample_project().to_json().unwrap();

    for key in [
        "\"version\": \"1.1.0\"",
        "\"photoTexts\"",
        "\"savedTitles\"",
        "\"pageLayouts\"",
        "\"customStartPageNumber\": 5",
        "\"originalWidth\": 800.0",
        "\"isEmpty\": false",
        "\"type\": \"shape\"",
        "\"widthValue\": 3.0",
        "\"0\": \"1text\"",
    ] {
        assert!(json.contains(key), "missing {} in {}", key, json);
    }
    assert!(!json.contains("displaySize"));
}

#[test]
fn test_file_info_persists() {
    let mut project = Project::new();
    project.add_photos(vec![
        Photo::new("photos/a.jpg", "a.jpg").with_file_info(Some(1_700_000_000_000), Some(52_400)),
    ]);

    let json = project.to_json().unwrap();
    assert!(json.contains("\"lastModified\": 1700000000000"));
    assert!(json.contains("\"fileSize\": 52400"));

    let loaded = Project::from_json(&json).unwrap();
    assert_eq!(loaded.photos()[0].last_modified, Some(1_700_000_000_000));
    assert_eq!(loaded.photos()[0].file_size, Some(52_400));
}

#[test]
fn test_loaded_rotations_are_normalized() {
    let json = SAVED_PROJECT.replace(
        r#""rotations": { "p1": 90 }"#,
        r#""rotations": { "p1": -90, "p2": 720 }"#,
    );
    let project = Project::from_json(&json).unwrap();

    assert_eq!(project.rotation(&PhotoId::from("p1")), 270);
    assert_eq!(project.rotations().len(), 1);
}

#[test]
fn test_load_saved_document() {
    let project = Project::from_json(SAVED_PROJECT).unwrap();

    assert_eq!(project.photos().len(), 2);
    assert_eq!(project.layout(), Layout::Two);
    assert_eq!(project.start_page_number(), 3);
    assert_eq!(project.global_title(), "Album");
    assert_eq!(project.title(0), Some("First page"));

    // Unknown page layouts are dropped in favour of the global layout
    assert_eq!(project.page_layouts().len(), 1);
    assert_eq!(project.page_layouts().get(&0), Some(&Layout::OneText));

    let id = PhotoId::from("p1");
    assert_eq!(project.photo_text(&id), "caption");
    assert_eq!(project.rotation(&id), 90);

    let photo = project.photo(&id).unwrap();
    assert_eq!(photo.original_size(), Some(Size::new(800.0, 600.0)));

    let text = &photo.annotations[0];
    assert_eq!(text.rect, Rect::new(10.0, 20.0, 100.0, 30.0));
    match &text.kind {
        AnnotationKind::Text { text, size, font } => {
            assert_eq!(text, "Hello");
            assert_eq!(*size, 24.0);
            assert_eq!(font, "Arial");
        }
        _ => panic!("Expected a text annotation"),
    }

    let arrow = &photo.annotations[1];
    assert_eq!(arrow.rotation, 15.0);
    assert_eq!(arrow.shape(), Some(ShapeKind::Arrow));
    match &arrow.kind {
        AnnotationKind::Shape { width_value, .. } => assert_eq!(*width_value, 3.0),
        _ => panic!("Expected a shape annotation"),
    }

    assert!(project.photos()[1].is_empty);
}

#[test]
fn test_rejects_incomplete_documents() {
    match Project::from_json(r#"{"photos": []}"#) {
        Err(LayoutError::InvalidProject(msg)) => assert!(msg.contains("version")),
        _ => panic!("Expected InvalidProject"),
    }

    match Project::from_json(r#"{"version": "1.1.0"}"#) {
        Err(LayoutError::InvalidProject(msg)) => assert!(msg.contains("photos")),
        _ => panic!("Expected InvalidProject"),
    }

    let err = Project::from_json("not json").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialization);
}

#[test]
fn test_replace_is_all_or_nothing() {
    let mut project = Project::with_sections(Sections::new(1));
    project.add_photos(vec![Photo::new("x.jpg", "x.jpg")]);
    project.add_photos(vec![Photo::new("y.jpg", "y.jpg")]);
    project.set_global_layout(Layout::One);
    let total = project.total_pages();
    assert!(project.sections_mut().next(total));
    let before = project.clone();

    let broken = SAVED_PROJECT.replace("\"version\": \"1.1.0\",", "");
    assert!(project.replace_from_json(&broken).is_err());
    assert_eq!(project, before);

    project.replace_from_json(SAVED_PROJECT).unwrap();
    assert_eq!(project.photos().len(), 2);
    assert_eq!(project.sections().current(), 1);
    assert_eq!(project.sections().pages_per_section(), 1);
}

#[tokio::test]
async fn test_reload_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAVED_PROJECT.as_bytes()).unwrap();

    let mut project = sample_project();
    project.reload(file.path()).await.unwrap();

    assert_eq!(project.global_title(), "Album");
    assert_eq!(project.photos()[0].id, PhotoId::from("p1"));
}

#[tokio::test]
async fn test_export_options_file() {
    let options = ExportOptions {
        paper_size: PaperSize::Letter,
        orientation: Orientation::Landscape,
        jpeg_quality: 70,
        page_numbers: false,
        ..Default::default()
    };
    let file = NamedTempFile::new().unwrap();

    options.save(file.path()).await.unwrap();
    let loaded = ExportOptions::load(file.path()).await.unwrap();
    assert_eq!(loaded, options);

    let mut bad = NamedTempFile::new().unwrap();
    bad.write_all(b"{ paper_size: ").unwrap();
    match ExportOptions::load(bad.path()).await {
        Err(LayoutError::Config(msg)) => assert!(msg.contains("Failed to parse config")),
        _ => panic!("Expected Config error"),
    }
}
