use hexscape::{
    Error,
    layout::{COLUMN_SPACING, LayoutPoint, MAX_POINTS, ROW_SPACING, generate_layout},
};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn two_by_one_shifts_only_the_even_row() {
    let points = generate_layout(2, 1, 0.0, 0.0).unwrap();
    assert_eq!(points, vec![LayoutPoint::new(0.0, 0.5), LayoutPoint::new(0.75, 0.0)]);
}

#[test]
fn produces_rows_times_columns_points_in_row_major_order() {
    let points = generate_layout(4, 3, 0.0, 0.0).unwrap();
    assert_eq!(points.len(), 12);

    for (i, row) in points.chunks(3).enumerate() {
        for point in row {
            assert!(approx(point.x, i as f32 * ROW_SPACING));
        }
        for pair in row.windows(2) {
            assert!(approx(pair[1].z - pair[0].z, COLUMN_SPACING));
        }
    }
}

#[test]
fn origin_translates_every_point() {
    let at_zero = generate_layout(3, 3, 0.0, 0.0).unwrap();
    let moved = generate_layout(3, 3, -5.0, 2.0).unwrap();
    for (a, b) in at_zero.iter().zip(&moved) {
        assert!(approx(b.x - a.x, -5.0));
        assert!(approx(b.z - a.z, 2.0));
    }
}

#[test]
fn zero_counts_give_an_empty_layout() {
    assert!(generate_layout(0, 10, 0.0, 0.0).unwrap().is_empty());
    assert!(generate_layout(10, 0, 0.0, 0.0).unwrap().is_empty());
}

#[test]
fn negative_counts_are_rejected() {
    assert!(matches!(
        generate_layout(-1, 3, 0.0, 0.0),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        generate_layout(3, -2, 0.0, 0.0),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn oversized_fields_are_rejected_before_allocating() {
    assert!(matches!(
        generate_layout(i32::MAX, i32::MAX, 0.0, 0.0),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        generate_layout(MAX_POINTS as i32 + 1, 1, 0.0, 0.0),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(generate_layout(1, 1, 0.0, 0.0).unwrap().len(), 1);
}
