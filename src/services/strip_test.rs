use super::*;
use crate::state::test_helpers;

fn content(scene: &str) -> PanelContent {
    PanelContent {
        image_url: format!("data:image/jpeg;base64,{scene}"),
        panel_text: format!("\"{scene}!\""),
        scene_description: scene.to_string(),
    }
}

async fn rev_of(state: &AppState, strip_id: Uuid) -> u64 {
    state.strips.read().await.get(&strip_id).unwrap().rev
}

// =========================================================================
// append
// =========================================================================

#[tokio::test]
async fn append_grows_by_one_and_keeps_prior_panels() {
    let state = test_helpers::test_app_state();
    let strip_id = test_helpers::seed_strip(&state).await;

    let first = append(&state, strip_id, content("um")).await.unwrap();
    let second = append(&state, strip_id, content("dois")).await.unwrap();
    assert_ne!(first.id, second.id);

    let (panels, _) = snapshot(&state, strip_id).await.unwrap();
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0], first);
    assert_eq!(panels[1], second);
}

#[tokio::test]
async fn append_unknown_strip_errors() {
    let state = test_helpers::test_app_state();
    let result = append(&state, Uuid::new_v4(), content("x")).await;
    assert!(matches!(result.unwrap_err(), StripError::NotFound(_)));
}

// =========================================================================
// replace_at
// =========================================================================

#[tokio::test]
async fn replace_preserves_id_position_and_neighbors() {
    let state = test_helpers::test_app_state();
    let panels = vec![
        test_helpers::dummy_panel("um"),
        test_helpers::dummy_panel("dois"),
        test_helpers::dummy_panel("três"),
    ];
    let target = panels[1].clone();
    let strip_id = test_helpers::seed_strip_with_panels(&state, panels.clone()).await;

    let replaced = replace_at(&state, strip_id, target.id, content("nova cena"))
        .await
        .unwrap();
    assert_eq!(replaced.id, target.id);
    assert_eq!(replaced.scene_description, "nova cena");

    let (after, _) = snapshot(&state, strip_id).await.unwrap();
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], panels[0]);
    assert_eq!(after[1].id, target.id);
    assert_eq!(after[1].scene_description, "nova cena");
    assert_eq!(after[2], panels[2]);
}

#[tokio::test]
async fn replace_unknown_panel_errors() {
    let state = test_helpers::test_app_state();
    let strip_id = test_helpers::seed_strip(&state).await;
    let result = replace_at(&state, strip_id, Uuid::new_v4(), content("x")).await;
    assert!(matches!(result.unwrap_err(), StripError::PanelNotFound(_)));
}

// =========================================================================
// edit_text
// =========================================================================

#[tokio::test]
async fn edit_text_changes_only_the_caption() {
    let state = test_helpers::test_app_state();
    let panel = test_helpers::dummy_panel("cena");
    let strip_id = test_helpers::seed_strip_with_panels(&state, vec![panel.clone()]).await;

    let edit = edit_text(&state, strip_id, panel.id, "Novo texto")
        .await
        .unwrap();
    let Edit::Changed(updated) = edit else {
        panic!("expected Changed");
    };
    assert_eq!(updated.panel_text, "Novo texto");
    assert_eq!(updated.scene_description, panel.scene_description);
    assert_eq!(updated.image_url, panel.image_url);
    assert_eq!(rev_of(&state, strip_id).await, 1);
}

#[tokio::test]
async fn edit_text_to_same_value_is_a_no_op() {
    let state = test_helpers::test_app_state();
    let panel = test_helpers::dummy_panel("cena");
    let current = panel.panel_text.clone();
    let strip_id = test_helpers::seed_strip_with_panels(&state, vec![panel.clone()]).await;

    let edit = edit_text(&state, strip_id, panel.id, &current).await.unwrap();
    assert_eq!(edit, Edit::Unchanged);
    assert_eq!(rev_of(&state, strip_id).await, 0);

    let (panels, _) = snapshot(&state, strip_id).await.unwrap();
    assert_eq!(panels[0], panel);
}

// =========================================================================
// clear / epoch
// =========================================================================

#[tokio::test]
async fn clear_empties_panels_and_bumps_epoch() {
    let state = test_helpers::test_app_state();
    let strip_id = test_helpers::seed_strip_with_panels(
        &state,
        vec![test_helpers::dummy_panel("um"), test_helpers::dummy_panel("dois")],
    )
    .await;

    let (_, epoch_before) = snapshot(&state, strip_id).await.unwrap();
    clear(&state, strip_id).await.unwrap();

    let (panels, epoch_after) = snapshot(&state, strip_id).await.unwrap();
    assert!(panels.is_empty());
    assert_eq!(epoch_after, epoch_before + 1);
}

// =========================================================================
// apply
// =========================================================================

#[tokio::test]
async fn apply_append_with_current_epoch() {
    let state = test_helpers::test_app_state();
    let strip_id = test_helpers::seed_strip(&state).await;
    let (_, epoch) = snapshot(&state, strip_id).await.unwrap();

    let applied = apply(&state, strip_id, epoch, Merge::Append, content("cena"))
        .await
        .unwrap();
    assert!(matches!(applied, Applied::Panel(ref p) if p.scene_description == "cena"));

    let (panels, _) = snapshot(&state, strip_id).await.unwrap();
    assert_eq!(panels.len(), 1);
}

#[tokio::test]
async fn apply_replace_with_current_epoch() {
    let state = test_helpers::test_app_state();
    let panel = test_helpers::dummy_panel("antiga");
    let strip_id = test_helpers::seed_strip_with_panels(&state, vec![panel.clone()]).await;
    let (_, epoch) = snapshot(&state, strip_id).await.unwrap();

    let applied = apply(&state, strip_id, epoch, Merge::Replace(panel.id), content("refeita"))
        .await
        .unwrap();
    assert!(matches!(applied, Applied::Panel(ref p) if p.id == panel.id && p.scene_description == "refeita"));
}

#[tokio::test]
async fn apply_with_stale_epoch_discards_without_mutating() {
    let state = test_helpers::test_app_state();
    let strip_id = test_helpers::seed_strip_with_panels(&state, vec![test_helpers::dummy_panel("um")]).await;

    // Generation starts, then the user restarts before it resolves.
    let (_, epoch) = snapshot(&state, strip_id).await.unwrap();
    clear(&state, strip_id).await.unwrap();

    let applied = apply(&state, strip_id, epoch, Merge::Append, content("tarde demais"))
        .await
        .unwrap();
    assert_eq!(applied, Applied::Discarded);

    let (panels, _) = snapshot(&state, strip_id).await.unwrap();
    assert!(panels.is_empty());
}
