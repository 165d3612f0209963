//! Header and footer titles, views and heights.

mod common;

use braid::prelude::*;
use common::*;

fn banner_text(view: &(dyn HeaderFooterView + 'static)) -> String {
    view_cast::<BannerView>(view)
        .map(|banner| banner.text.clone())
        .unwrap_or_default()
}

#[test]
fn test_titles_are_loaded_and_updated_with_a_section_reload() {
    let mut setup = BinderSetup::<Shelf>::declared();
    setup
        .on_section(Shelf::Fiction)
        .header_title("Novels")
        .footer_title("2 books");
    let mut binder = setup.finish(RecordingTable::new());
    binder.host_mut().clear_ops();

    assert_eq!(binder.header_title(0), Some("Novels"));
    assert_eq!(binder.footer_title(0), Some("2 books"));
    assert_eq!(binder.header_title(1), None);

    binder.update_header_title(Shelf::Fiction, "Stories");

    assert_eq!(binder.header_title(0), Some("Stories"));
    assert_eq!(
        binder.host().ops(),
        &[
            TableOp::BeginUpdates,
            TableOp::ReloadSections(vec![0], RowAnimation::Automatic),
            TableOp::EndUpdates,
        ]
    );
}

#[test]
fn test_unchanged_title_sends_nothing() {
    let mut setup = BinderSetup::<Shelf>::declared();
    setup.on_section(Shelf::Poetry).header_title("Verse");
    let mut binder = setup.finish(RecordingTable::new());
    binder.host_mut().clear_ops();

    binder.update_header_titles([(Shelf::Poetry, "Verse".to_owned())]);
    assert!(binder.host().ops().is_empty());
}

#[test]
fn test_title_change_and_row_insert_use_two_batches() {
    let mut setup = BinderSetup::<Shelf>::declared();
    setup
        .on_section(Shelf::Fiction)
        .bind_cell::<BookCell>()
        .models(books(&["a"]))
        .footer_title("1 book");
    let mut binder = setup.finish(RecordingTable::new());
    binder.host_mut().clear_ops();

    binder.batch(|binder| {
        binder.update_cell_models(Shelf::Fiction, books(&["a", "b"]));
        binder.update_footer_title(Shelf::Fiction, "2 books");
    });

    assert_eq!(
        binder.host().ops(),
        &[
            TableOp::BeginUpdates,
            TableOp::InsertRows(vec![ip(0, 1)], RowAnimation::Automatic),
            TableOp::EndUpdates,
            TableOp::BeginUpdates,
            TableOp::ReloadSections(vec![0], RowAnimation::Automatic),
            TableOp::EndUpdates,
        ]
    );
}

#[test]
fn test_header_view_model_configures_the_view() {
    let mut setup = BinderSetup::<Shelf>::declared();
    setup
        .on_section(Shelf::Poetry)
        .bind_header_view_model::<BannerView>("Verse");
    let mut binder = setup.finish(RecordingTable::new());
    binder.host_mut().clear_ops();

    let view = binder.header_view(1).unwrap();
    assert_eq!(banner_text(view.as_ref()), "Verse");
    assert!(binder.header_view(0).is_none());

    binder.update_header_view_model(Shelf::Poetry, "Odes".to_owned());
    assert_eq!(
        binder.host().ops(),
        &[
            TableOp::BeginUpdates,
            TableOp::ReloadSections(vec![1], RowAnimation::Automatic),
            TableOp::EndUpdates,
        ]
    );
    let view = binder.header_view(1).unwrap();
    assert_eq!(banner_text(view.as_ref()), "Odes");
}

#[test]
fn test_footer_views_are_recycled() {
    let mut setup = BinderSetup::<Shelf>::declared();
    setup
        .on_all_other_sections()
        .bind_footer_view_model::<BannerView>(ContentSource::sectioned_provider(|| {
            Shelf::declared_sections()
                .into_iter()
                .map(|shelf| (shelf, format!("{shelf:?}")))
                .collect()
        }));
    let mut binder = setup.finish(RecordingTable::new());

    let view = binder.footer_view(2).unwrap();
    assert_eq!(banner_text(view.as_ref()), "Archive");
    binder
        .host_mut()
        .enqueue_header_footer(BannerView::reuse_identifier(), view);

    let view = binder.footer_view(0).unwrap();
    assert_eq!(banner_text(view.as_ref()), "Fiction");
    assert_eq!(binder.host().reused_count(), 1);
}

#[test]
fn test_plain_header_view_without_view_model() {
    let mut setup = BinderSetup::<Shelf>::declared();
    setup.on_any_section().bind_header::<PlainHeader>();
    let mut binder = setup.finish(RecordingTable::new());

    let view = binder.header_view(2).unwrap();
    assert!(view_cast::<PlainHeader>(view.as_ref()).is_some());
    assert!(binder.footer_view(2).is_none());
}

#[test]
#[should_panic(expected = "header view is already bound for section Fiction")]
fn test_second_header_view_for_a_section_is_fatal() {
    let mut setup = BinderSetup::<Shelf>::declared();
    setup.on_section(Shelf::Fiction).bind_header::<PlainHeader>();
    setup
        .on_sections([Shelf::Poetry, Shelf::Fiction])
        .bind_header::<BannerView>();
}

#[test]
#[should_panic(expected = "header view model")]
fn test_header_view_model_of_wrong_type_is_fatal() {
    let mut setup = BinderSetup::<Shelf>::declared();
    setup
        .on_section(Shelf::Poetry)
        .bind_header_view_model::<BannerView>("Verse");
    let mut binder = setup.finish(RecordingTable::new());
    binder.update_header_view_model(Shelf::Poetry, 7_u32);
}

#[test]
#[should_panic(expected = "section Fiction has no header view model")]
fn test_header_view_without_content_is_fatal() {
    let mut setup = BinderSetup::<Shelf>::declared();
    setup
        .on_section(Shelf::Fiction)
        .bind_header_view_model::<BannerView>(ContentSource::External);
    let mut binder = setup.finish(RecordingTable::new());
    let _ = binder.header_view(0);
}

#[test]
fn test_titled_section_is_not_covered_by_all_other_sections() {
    let mut setup = BinderSetup::<Shelf>::declared();
    setup.on_section(Shelf::Fiction).header_title("Novels");
    setup.on_all_other_sections().header_height(|_| 30.0);
    setup
        .on_any_section()
        .header_height(|_| 5.0)
        .estimated_footer_height(|_| 8.0);
    let binder = setup.finish(RecordingTable::new());

    assert_eq!(binder.height_for_header(0), Some(5.0));
    assert_eq!(binder.height_for_header(1), Some(30.0));
    assert_eq!(binder.height_for_header(2), Some(30.0));
    assert_eq!(binder.estimated_height_for_footer(0), Some(8.0));
    assert_eq!(binder.height_for_footer(0), None);
    assert_eq!(binder.estimated_height_for_header(0), None);
}

#[test]
fn test_sections_with_only_titles_are_shown_when_hiding_empty_ones() {
    let mut setup = BinderSetup::<Shelf>::declared().with_config(
        BinderConfig::new()
            .with_section_display_behavior(SectionDisplayBehavior::HidesSectionsWithNoData),
    );
    setup.on_section(Shelf::Archive).footer_title("Nothing archived");
    setup
        .on_section(Shelf::Fiction)
        .bind_cell::<BookCell>()
        .models::<Book>(ContentSource::External);
    let mut binder = setup.finish(RecordingTable::new());
    assert_eq!(binder.displayed_sections(), &[Shelf::Archive]);
    binder.host_mut().clear_ops();

    binder.update_cell_models(Shelf::Fiction, books(&["a"]));

    assert_eq!(binder.displayed_sections(), &[Shelf::Fiction, Shelf::Archive]);
    assert_eq!(
        binder.host().ops(),
        &[
            TableOp::BeginUpdates,
            TableOp::InsertSections(vec![0], RowAnimation::Automatic),
            TableOp::EndUpdates,
        ]
    );
}
