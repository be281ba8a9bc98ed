use daylog_core::{move_item, project};

const ROW: f32 = 64.0;

#[test]
fn downward_drag_shifts_intermediate_rows_up() {
    let projection = project(1, ROW * 2.2, ROW, 5);

    assert_eq!(projection.target, 3);
    assert_eq!(
        projection.displacements(),
        vec![0.0, ROW * 2.2, -ROW, -ROW, 0.0]
    );
}

#[test]
fn upward_drag_shifts_intermediate_rows_down() {
    let projection = project(3, -ROW * 2.0, ROW, 5);

    assert_eq!(projection.target, 1);
    assert_eq!(
        projection.displacements(),
        vec![0.0, ROW, ROW, -ROW * 2.0, 0.0]
    );
}

#[test]
fn target_is_clamped_to_list_bounds() {
    assert_eq!(project(1, ROW * 40.0, ROW, 4).target, 3);
    assert_eq!(project(2, -ROW * 40.0, ROW, 4).target, 0);
}

#[test]
fn small_drag_keeps_target_and_displaces_nothing_else() {
    let projection = project(2, ROW * 0.4, ROW, 4);

    assert!(!projection.moves());
    for row in [0, 1, 3] {
        assert_eq!(projection.displacement(row), 0.0);
    }
}

#[test]
fn other_rows_only_move_by_one_slot() {
    let len = 6;
    for dragged in 0..len {
        for step in -8..=8 {
            let projection = project(dragged, step as f32 * ROW * 0.75, ROW, len);
            for row in (0..len).filter(|row| *row != dragged) {
                let value = projection.displacement(row);
                assert!(
                    value == 0.0 || value == ROW || value == -ROW,
                    "row {row} displaced by {value} (dragged {dragged}, step {step})"
                );
            }
        }
    }
}

#[test]
fn committed_move_matches_remove_then_insert() {
    let original: Vec<usize> = (0..5).collect();
    for from in 0..5 {
        for to in 0..5 {
            let mut moved = original.clone();
            assert!(move_item(&mut moved, from, to));

            let mut expected = original.clone();
            let item = expected.remove(from);
            expected.insert(to, item);
            assert_eq!(moved, expected, "from {from} to {to}");
        }
    }
}
