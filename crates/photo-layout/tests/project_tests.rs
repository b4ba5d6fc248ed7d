use photo_layout::*;
use std::collections::BTreeSet;

fn photos(count: usize) -> Vec<Photo> {
    (1..=count)
        .map(|i| Photo::new(format!("img/{:02}.jpg", i), format!("{:02}.jpg", i)))
        .collect()
}

fn project_with(count: usize) -> Project {
    let mut project = Project::new();
    project.add_photos(photos(count));
    project
}

fn page_lengths(project: &Project) -> Vec<usize> {
    project.distribution().iter().map(|p| p.len).collect()
}

#[test]
fn test_five_photos_fill_two_pages() {
    let project = project_with(5);

    assert_eq!(project.total_pages(), 2);
    assert_eq!(page_lengths(&project), vec![4, 1]);

    let pages = project.pages();
    assert_eq!(pages[1].photos[0].name, "05.jpg");
    assert_eq!(pages[1].empty_slots(), 3);
}

#[test]
fn test_page_override_changes_partition() {
    let mut project = project_with(8);
    project.set_page_layout(1, Some(Layout::TwoText));

    assert_eq!(page_lengths(&project), vec![4, 2, 2]);
    let page = project.page(1).unwrap();
    assert_eq!(page.layout(), Layout::TwoText);
    assert_eq!(page.texts.len(), 2);

    project.set_page_layout(1, None);
    assert_eq!(page_lengths(&project), vec![4, 4]);
}

#[test]
fn test_partition_covers_every_photo_once() {
    let mut project = project_with(23);
    project.set_page_layout(0, Some(Layout::One));
    project.set_page_layout(2, Some(Layout::TwoText));
    project.set_page_layout(3, Some(Layout::OneText));
    project.set_global_layout(Layout::Two);

    let mut next = 0;
    for slice in project.distribution() {
        assert_eq!(slice.start_index, next);
        assert!(slice.len >= 1 && slice.len <= slice.layout.photo_count());
        next += slice.len;
    }
    assert_eq!(next, 23);
}

#[test]
fn test_insert_page_shifts_overrides() {
    let mut project = project_with(8);
    project.set_page_layout(1, Some(Layout::TwoText));
    project.set_title(1, "Beach");
    let moved = project.photos()[4].id.clone();

    let index = project.insert_page(InsertPosition::At(2)).unwrap();

    assert_eq!(index, 1);
    assert_eq!(project.total_pages(), 4);
    assert_eq!(project.page_layouts().get(&2), Some(&Layout::TwoText));
    assert!(!project.page_layouts().contains_key(&1));
    assert_eq!(project.title(2), Some("Beach"));
    assert_eq!(project.title(1), None);

    let inserted = project.page(1).unwrap();
    assert_eq!(inserted.photos.len(), 4);
    assert!(inserted.photos.iter().all(|p| p.is_empty));

    let shifted = project.page(2).unwrap();
    assert_eq!(shifted.layout(), Layout::TwoText);
    assert_eq!(shifted.photos[0].id, moved);
}

#[test]
fn test_insert_page_at_end_pads_last_page() {
    let mut project = project_with(5);

    let index = project.insert_page(InsertPosition::End).unwrap();

    assert_eq!(index, 2);
    assert_eq!(project.photos().len(), 12);
    assert_eq!(page_lengths(&project), vec![4, 4, 4]);

    let padded = project.page(1).unwrap();
    assert_eq!(padded.photos[0].name, "05.jpg");
    assert_eq!(padded.photos[1].name, "Empty Slot 2");
    assert_eq!(padded.photos[3].name, "Empty Slot 4");
    assert!(project.page(2).unwrap().photos.iter().all(|p| p.is_empty));
}

#[test]
fn test_insert_page_into_empty_project() {
    let mut project = Project::new();
    project.set_global_layout(Layout::Two);

    let index = project.insert_page(InsertPosition::At(1)).unwrap();

    assert_eq!(index, 0);
    assert_eq!(project.total_pages(), 1);
    let names: Vec<_> = project.photos().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Empty Slot 1", "Empty Slot 2"]);
}

#[test]
fn test_insert_page_rejects_out_of_range() {
    let mut project = project_with(5);

    let result = project.insert_page(InsertPosition::At(4));
    match result {
        Err(LayoutError::InvalidPageNumber(n)) => assert_eq!(n, "4"),
        _ => panic!("Expected InvalidPageNumber"),
    }
    assert_eq!(project.photos().len(), 5);

    let err = InsertPosition::parse("zero").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_insert_page_focuses_section() {
    let mut project = Project::with_sections(Sections::new(2));
    project.add_photos(photos(20));
    assert_eq!(project.total_sections(), 3);

    project.insert_page(InsertPosition::End).unwrap();

    assert_eq!(project.total_pages(), 6);
    assert_eq!(project.sections().current(), 3);
    let visible: Vec<_> = project.visible_pages().iter().map(|p| p.page_index()).collect();
    assert_eq!(visible, vec![4, 5]);
}

#[test]
fn test_duplicate_page_copies_side_tables() {
    let mut project = project_with(8);
    let source = project.photos()[1].id.clone();
    project.set_photo_text(&source, "Grandma's garden");
    project.rotate_photo(&source, 90).unwrap();
    project.set_title(0, "Summer");
    project.set_title(1, "Autumn");

    project.duplicate_page(0).unwrap();

    assert_eq!(project.photos().len(), 12);
    let copy = &project.photos()[5];
    assert_ne!(copy.id, source);
    assert_eq!(copy.name, "02.jpg");
    assert_eq!(project.photo_text(&copy.id), "Grandma's garden");
    assert_eq!(project.rotation(&copy.id), 90);

    assert_eq!(project.page_layouts().get(&1), Some(&Layout::Four));
    assert_eq!(project.title(1), Some("Summer"));
    assert_eq!(project.title(2), Some("Autumn"));
}

#[test]
fn test_duplicate_partial_last_page() {
    let mut project = project_with(5);
    project.set_title(1, "Last");

    project.duplicate_page(1).unwrap();

    assert_eq!(project.total_pages(), 3);
    assert_eq!(page_lengths(&project), vec![4, 4, 4]);
    assert_eq!(project.title(1), Some("Last"));
    assert_eq!(project.title(2), Some("Last"));
    assert_eq!(project.page_layouts().get(&2), Some(&Layout::Four));

    let names: Vec<_> = project.photos()[4..].iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "05.jpg",
            "Empty Slot 2",
            "Empty Slot 3",
            "Empty Slot 4",
            "05.jpg",
            "Empty Slot 2",
            "Empty Slot 3",
            "Empty Slot 4",
        ]
    );
    assert_ne!(project.photos()[4].id, project.photos()[8].id);
}

#[test]
fn test_duplicate_page_without_photos_is_noop() {
    let mut project = Project::new();
    project.duplicate_page(0).unwrap();
    assert!(project.photos().is_empty());

    let mut project = project_with(3);
    match project.duplicate_page(5) {
        Err(e) => assert_eq!(e.kind(), ErrorKind::NotFound),
        Ok(_) => panic!("Expected NotFound"),
    }
}

#[test]
fn test_clear_page_keeps_ids() {
    let mut project = project_with(12);
    let ids: Vec<_> = project.photos()[4..8].iter().map(|p| p.id.clone()).collect();
    project.set_photo_text(&ids[1], "caption");
    project.rotate_photo(&ids[2], 180).unwrap();
    project.set_title(1, "Middle");
    project.set_page_layout(1, Some(Layout::Four));

    project.clear_page(1).unwrap();

    assert_eq!(project.total_pages(), 3);
    let page = project.page(1).unwrap();
    for (slot, photo) in page.photos.iter().enumerate() {
        assert_eq!(photo.id, ids[slot]);
        assert!(photo.is_empty);
        assert!(photo.src.is_empty());
        assert_eq!(photo.name, format!("Empty Slot {}", slot + 1));
    }
    assert_eq!(project.photo_text(&ids[1]), "");
    assert_eq!(project.rotation(&ids[2]), 0);
    assert_eq!(project.title(1), None);
    assert!(project.page_layouts().is_empty());

    // Neighbouring pages are untouched
    assert_eq!(project.photos()[3].name, "04.jpg");
    assert_eq!(project.photos()[8].name, "09.jpg");
}

#[test]
fn test_delete_photo_drops_side_tables() {
    let mut project = project_with(5);
    let id = project.photos()[4].id.clone();
    project.set_photo_text(&id, "last");
    project.rotate_photo(&id, 270).unwrap();

    let removed = project.delete_photo(&id).unwrap();

    assert_eq!(removed.name, "05.jpg");
    assert_eq!(project.total_pages(), 1);
    assert!(project.photo_texts().is_empty());
    assert!(project.rotations().is_empty());
    assert!(project.delete_photo(&id).is_err());
}

#[test]
fn test_rotation_accumulates() {
    let mut project = project_with(1);
    let id = project.photos()[0].id.clone();

    assert_eq!(project.rotate_photo(&id, 90).unwrap(), 90);
    assert_eq!(project.rotate_photo(&id, 90).unwrap(), 180);
    assert_eq!(project.rotate_photo(&id, -180).unwrap(), 0);
    assert!(project.rotations().is_empty());

    let missing = PhotoId::from("missing");
    assert!(project.rotate_photo(&missing, 90).is_err());
}

#[test]
fn test_rotation_stays_in_one_turn() {
    let mut project = project_with(1);
    let id = project.photos()[0].id.clone();

    assert_eq!(project.rotate_photo(&id, 270).unwrap(), 270);
    assert_eq!(project.rotate_photo(&id, 180).unwrap(), 90);
    assert_eq!(project.rotate_photo(&id, -180).unwrap(), 270);
    assert_eq!(project.rotate_photo(&id, 90).unwrap(), 0);
    assert!(project.rotations().is_empty());

    // 2147483647 = 5965232 * 360 + 127
    assert_eq!(project.rotate_photo(&id, i32::MAX).unwrap(), 127);
    assert_eq!(project.rotate_photo(&id, i32::MAX).unwrap(), 254);
    assert_eq!(project.rotate_photo(&id, i32::MIN).unwrap(), 126);
}

#[test]
fn test_titles() {
    let mut project = project_with(9);

    project.set_title(0, "  Holiday  ");
    assert_eq!(project.title(0), Some("Holiday"));
    project.set_title(0, "   ");
    assert_eq!(project.title(0), None);

    project.set_global_title("Family album");
    project.apply_global_title();
    assert_eq!(project.saved_titles().len(), 3);
    assert!(project.saved_titles().values().all(|t| t == "Family album"));

    project.set_global_title("");
    project.apply_global_title();
    assert!(project.saved_titles().is_empty());
}

#[test]
fn test_insert_photos_sorted_by_name() {
    let mut project = project_with(2);
    let batch = vec![
        Photo::new("b.jpg", "b.jpg"),
        Photo::new("A.jpg", "A.jpg"),
        Photo::new("c.jpg", "c.jpg"),
    ];

    project.insert_photos_at(1, batch);

    let names: Vec<_> = project.photos().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["01.jpg", "A.jpg", "b.jpg", "c.jpg", "02.jpg"]);
}

#[test]
fn test_clear_all_keeps_settings() {
    let mut project = project_with(6);
    project.set_global_layout(Layout::OneText);
    project.set_global_title("Album");
    project.set_title(2, "Third");

    project.clear_all();

    assert!(project.photos().is_empty());
    assert!(project.saved_titles().is_empty());
    assert_eq!(project.layout(), Layout::OneText);
    assert_eq!(project.global_title(), "Album");
    assert_eq!(project.total_pages(), 1);
}

#[test]
fn test_parse_page_number() {
    assert_eq!(parse_page_number("2", 3).unwrap(), 1);
    assert!(parse_page_number("0", 3).is_err());
    assert!(parse_page_number("4", 3).is_err());
    assert!(parse_page_number("two", 3).is_err());
}

#[test]
fn test_arabic_page_numbers() {
    let mut project = project_with(8);

    assert_eq!(parse_page_number("٢", project.total_pages()).unwrap(), 1);
    assert_eq!(parse_page_number("۲", project.total_pages()).unwrap(), 1);
    assert_eq!(parse_number("١٠").unwrap(), 10);
    match parse_page_number("٣", project.total_pages()) {
        Err(LayoutError::InvalidPageNumber(input)) => assert_eq!(input, "٣"),
        _ => panic!("Expected InvalidPageNumber"),
    }

    let position = InsertPosition::parse("٢").unwrap();
    assert_eq!(position, InsertPosition::At(2));
    assert_eq!(project.insert_page(position).unwrap(), 1);
    assert_eq!(page_lengths(&project), vec![4, 4, 4]);
    assert!(project.photos()[4].is_empty);
}

#[test]
fn test_find_and_replace_text() {
    let mut project = project_with(8);
    project.set_global_layout(Layout::TwoText);
    let ids: Vec<_> = project.photos().iter().map(|p| p.id.clone()).collect();
    project.set_title(0, "Beach day");
    project.set_photo_text(&ids[1], "BEACH at dawn, beach at dusk");
    project.set_title(2, "Mountains");

    let found = project.find_text("beach");
    assert_eq!(found.len(), 3);
    assert_eq!(found[0].field, TextField::PageTitle(0));
    assert_eq!(
        found[1],
        TextMatch {
            field: TextField::PhotoText(ids[1].clone()),
            start: 0,
            end: 5,
        }
    );
    assert_eq!((found[2].start, found[2].end), (15, 20));
    assert!(project.find_text("  ").is_empty());

    project.replace_match(&found[1], "Sea").unwrap();
    assert_eq!(project.photo_text(&ids[1]), "Sea at dawn, beach at dusk");

    let gone = TextMatch {
        field: TextField::PageTitle(3),
        start: 0,
        end: 1,
    };
    match project.replace_match(&gone, "x") {
        Err(e) => assert_eq!(e.kind(), ErrorKind::NotFound),
        Ok(_) => panic!("Expected NotFound"),
    }

    assert_eq!(project.replace_all("BEACH", "Coast"), 2);
    assert_eq!(project.title(0), Some("Coast day"));
    assert_eq!(project.photo_text(&ids[1]), "Sea at dawn, Coast at dusk");
    assert_eq!(project.title(2), Some("Mountains"));
    assert_eq!(project.replace_all("beach", "x"), 0);
}

#[test]
fn test_text_search_cursor() {
    let mut project = project_with(8);
    project.set_title(0, "cat");
    project.set_title(1, "Cat and cat");

    let mut search = TextSearch::new(&project, "cat");
    assert_eq!(search.matches().len(), 3);
    assert_eq!(search.current().unwrap().field, TextField::PageTitle(0));

    // Wraps in both directions
    assert_eq!(search.find_previous().unwrap().start, 8);
    assert_eq!(search.find_next().unwrap().field, TextField::PageTitle(0));
    assert_eq!(search.find_next().unwrap().start, 0);

    search.replace_current(&mut project, "dog").unwrap();
    assert_eq!(project.title(1), Some("dog and cat"));
    assert_eq!(search.matches().len(), 2);
    assert_eq!(search.current().unwrap().start, 8);

    search.replace_current(&mut project, "dog").unwrap();
    assert_eq!(project.title(1), Some("dog and dog"));
    assert_eq!(search.current().unwrap().field, TextField::PageTitle(0));

    let mut empty = TextSearch::new(&project, "bird");
    assert!(empty.find_next().is_none());
    empty.replace_current(&mut project, "x").unwrap();
}

#[test]
fn test_batch_operations() {
    let mut project = project_with(6);
    let ids: Vec<_> = project.photos().iter().map(|p| p.id.clone()).collect();
    project.set_photo_text(&ids[1], "keep me");
    let selected: BTreeSet<PhotoId> = [ids[1].clone(), ids[3].clone()].into_iter().collect();

    assert_eq!(project.rotate_photos(&selected, 90), 2);
    assert_eq!(project.rotation(&ids[1]), 90);
    assert_eq!(project.rotation(&ids[0]), 0);

    let copies = project.duplicate_photos(&selected);
    assert_eq!(copies.len(), 2);
    let names: Vec<_> = project.photos().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["01.jpg", "02.jpg", "02.jpg", "03.jpg", "04.jpg", "04.jpg", "05.jpg", "06.jpg"]
    );
    assert_eq!(project.photos()[2].id, copies[0]);
    assert_eq!(project.photo_text(&copies[0]), "keep me");
    assert_eq!(project.rotation(&copies[1]), 90);

    assert_eq!(project.delete_photos(&selected), 2);
    assert_eq!(project.photos().len(), 6);
    assert_eq!(project.photo_text(&ids[1]), "");
    assert_eq!(project.rotations().len(), 2);

    let unknown: BTreeSet<PhotoId> = [PhotoId::from("missing")].into_iter().collect();
    assert_eq!(project.delete_photos(&unknown), 0);
}

fn names(project: &Project) -> Vec<&str> {
    project.photos().iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn test_sort_by_date_and_size() {
    let mut project = Project::new();
    project.add_photos(vec![
        Photo::new("c.jpg", "c.jpg").with_file_info(Some(300), Some(10)),
        Photo::new("a.jpg", "a.jpg").with_file_info(None, Some(30)),
        Photo::new("b.jpg", "b.jpg").with_file_info(Some(100), None),
    ]);

    project.sort_photos(SortKey::Date);
    assert_eq!(names(&project), vec!["b.jpg", "c.jpg", "a.jpg"]);

    project.sort_photos(SortKey::Size);
    assert_eq!(names(&project), vec!["c.jpg", "a.jpg", "b.jpg"]);

    project.sort_photos(SortKey::Name);
    assert_eq!(names(&project), vec!["a.jpg", "b.jpg", "c.jpg"]);
}
