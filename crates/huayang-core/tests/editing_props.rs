//! Properties of the editing pipeline.

use huayang_core::{
    seed_volumes, AdminDashboard, ReaderContent, ReaderOutcome, ReaderView, Rendition, RichEditor,
    SyncOutcome, VolumeId,
};
use proptest::prelude::*;

fn rendition() -> impl Strategy<Value = Rendition> {
    prop_oneof![
        Just(Rendition::Original),
        Just(Rendition::Annotation),
        Just(Rendition::Translation),
    ]
}

proptest! {
    #[test]
    fn prop_saved_buffer_is_what_the_reader_shows(
        position in 1..=44usize,
        tab in rendition(),
        html in "<p>[^<>]{1,40}</p>",
    ) {
        let mut volumes = seed_volumes();
        let id = VolumeId::seed(position);

        let mut dashboard = AdminDashboard::new(&volumes).unwrap();
        dashboard.select_volume(&volumes, &id).unwrap();
        dashboard.select_tab(&volumes, tab).unwrap();
        dashboard.edit(html.clone());
        let saved = dashboard.save(&volumes).unwrap();

        let slot = volumes.iter_mut().find(|v| v.id == id).unwrap();
        *slot = saved;

        let ReaderOutcome::Show(view) = ReaderView::open(&volumes, &id) else {
            panic!("volume must exist");
        };
        let view = view.with_tab(tab);
        prop_assert_eq!(view.content(), ReaderContent::Html(&html));
    }

    #[test]
    fn prop_focused_editor_never_loses_typing(
        typed in "[a-z]{1,12}",
        external in proptest::collection::vec("[a-z]{1,12}", 1..5),
    ) {
        let mut editor = RichEditor::new("", "");
        editor.input(typed.clone());

        for value in &external {
            prop_assert_eq!(editor.sync_external(value), SyncOutcome::Deferred);
            prop_assert_eq!(editor.html(), typed.as_str());
        }

        // Only the latest external value is applied on blur
        let last = external.last().unwrap();
        editor.blur();
        prop_assert_eq!(editor.html(), last.as_str());
    }

    #[test]
    fn prop_switching_rebinds_to_stored_field(
        position in 1..=44usize,
        tab in rendition(),
        scratch in "[^<>]{0,20}",
    ) {
        let volumes = seed_volumes();
        let id = VolumeId::seed(position);
        let mut dashboard = AdminDashboard::new(&volumes).unwrap();
        dashboard.edit(scratch);

        dashboard.select_volume(&volumes, &id).unwrap();
        dashboard.select_tab(&volumes, tab).unwrap();

        let stored = volumes.iter().find(|v| v.id == id).unwrap().field(tab);
        prop_assert_eq!(dashboard.buffer(), stored);
    }
}
