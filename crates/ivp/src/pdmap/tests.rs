use super::*;

fn domain2(nx: u32, ny: u32) -> Arc<Domain> {
    let d = Domain::new()
        .with_var("x", 0.0, f64::from(nx - 1), nx)
        .and_then(|d| d.with_var("y", 0.0, f64::from(ny - 1), ny))
        .unwrap();
    Arc::new(d)
}

fn piece(x: (u32, u32), y: (u32, u32), intercept: f64) -> IvpBox {
    let mut b = IvpBox::new(vec![Extent::new(0, x.0, x.1), Extent::new(1, y.0, y.1)]).unwrap();
    b.intercept = intercept;
    b
}

/// Four quadrants of a 6x6 domain with constant values 1..=4.
fn quadrants() -> PdMap {
    PdMap::with_boxes(
        domain2(6, 6),
        Degree::Linear,
        vec![
            piece((0, 2), (0, 2), 1.0),
            piece((3, 5), (0, 2), 2.0),
            piece((0, 2), (3, 5), 3.0),
            piece((3, 5), (3, 5), 4.0),
        ],
    )
}

#[test]
fn append_keeps_indices_and_drops_grid() {
    let mut m = PdMap::new(domain2(4, 4), Degree::Constant);
    assert!(m.is_empty());
    assert_eq!(m.append(piece((0, 1), (0, 3), 0.0)), 0);
    m.update_grid();
    assert!(m.grid().is_some());
    assert_eq!(m.append(piece((2, 3), (0, 3), 0.0)), 1);
    assert!(m.grid().is_none());
    assert_eq!(m.size(), 2);
    assert!(m.is_partition());
}

#[test]
fn overlap_query_grid_matches_linear_scan() {
    let mut m = quadrants();
    let q = piece((2, 3), (1, 1), 0.0);
    let scan: Vec<usize> = m.boxes_overlapping(&q).collect();
    assert_eq!(scan, vec![0, 1]);
    for cell in [vec![1, 1], vec![2, 3], vec![6, 6], vec![0, 0]] {
        m.set_grid_cell(cell);
        m.update_grid();
        let hits: Vec<usize> = m.boxes_overlapping(&q).collect();
        assert_eq!(hits, scan);
    }
    let all = piece((0, 5), (0, 5), 0.0);
    assert_eq!(m.boxes_overlapping(&all).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
}

#[test]
fn cheap_bound_covers_every_overlapping_box() {
    let mut m = quadrants();
    let q = piece((0, 2), (2, 4), 0.0);
    assert_eq!(m.cheap_bound(&q), 3.0);
    m.set_grid_cell(vec![3, 3]);
    m.update_grid();
    // Cells align with the quadrants, so the bound is tight.
    assert_eq!(m.cheap_bound(&q), 3.0);
    m.set_grid_cell(vec![6, 6]);
    m.update_grid();
    assert_eq!(m.grid().map(Grid::cell_count), Some(1));
    // One cell holds everything: still an upper bound.
    assert_eq!(m.cheap_bound(&q), 4.0);
}

#[test]
fn eval_point_and_extremes() {
    let mut m = quadrants();
    m.box_at_mut(3).unwrap().set_fit(&[1.0, 0.0], 4.0);
    m.update_grid();
    assert_eq!(m.eval_point(&[0, 0]), Some(1.0));
    assert_eq!(m.eval_point(&[5, 4]), Some(9.0));
    assert_eq!(m.eval_point(&[6, 0]), None);
    assert_eq!(m.max_wt(), Some(9.0));
    assert_eq!(m.min_wt(), Some(1.0));
    assert_eq!(m.max_point(), Some(vec![5, 3]));

    let flat = PdMap::with_boxes(m.domain().clone(), Degree::Constant, m.boxes().to_vec());
    // Slopes are ignored: box 3 is now worth 4 everywhere.
    assert_eq!(flat.max_point(), Some(vec![3, 3]));
    assert_eq!(PdMap::new(domain2(2, 2), Degree::Linear).max_point(), None);
}

#[test]
fn weight_and_normalize_rescale_values() {
    let mut m = quadrants();
    m.apply_weight(2.0);
    assert_eq!(m.max_wt(), Some(8.0));
    m.normalize(0.0, 100.0);
    assert_eq!(m.min_wt(), Some(0.0));
    assert!((m.max_wt().unwrap() - 100.0).abs() < 1e-9);
    assert!((m.eval_point(&[3, 0]).unwrap() - 100.0 / 3.0).abs() < 1e-9);

    let mut flat = PdMap::with_boxes(domain2(2, 2), Degree::Linear, vec![piece((0, 1), (0, 1), 5.0)]);
    flat.normalize(0.0, 100.0);
    assert_eq!(flat.eval_point(&[1, 1]), Some(100.0));
}

#[test]
fn partition_check_detects_gaps_and_overlaps() {
    let m = quadrants();
    assert!(m.is_partition());
    let full = quadrants();
    let gap = PdMap::with_boxes(full.domain().clone(), Degree::Linear, full.boxes()[1..].to_vec());
    assert!(!gap.is_partition());
    let mut overlap = quadrants();
    overlap.append(piece((2, 3), (2, 3), 0.0));
    assert!(!overlap.is_partition());
}

#[test]
fn grid_coarsens_to_stay_bounded() {
    let d = Arc::new(
        Domain::new()
            .with_var("a", 0.0, 4095.0, 4096)
            .and_then(|d| d.with_var("b", 0.0, 4095.0, 4096))
            .unwrap(),
    );
    let universe = IvpBox::universe(&d).unwrap();
    let mut m = PdMap::with_boxes(d, Degree::Constant, vec![universe.clone()]);
    m.set_grid_cell(vec![1, 1]);
    m.update_grid();
    let g = m.grid().unwrap();
    assert!(g.cell_count() <= 1 << 20);
    assert!(g.cell_extents().iter().all(|&c| c >= 2));
    assert_eq!(m.boxes_overlapping(&universe).collect::<Vec<_>>(), vec![0]);
}
