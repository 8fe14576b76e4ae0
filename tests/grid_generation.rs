use std::collections::HashSet;

use parkgrid::{
    config::BoundingBox,
    generate_grid,
    water::{BoundaryPolicy, WaterFeature, WaterMask},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn yellowstone_bbox() -> BoundingBox {
    BoundingBox::new(-111.1, 44.1, -109.8, 45.1)
}

#[test]
fn yellowstone_scale_grid_has_unique_ids() {
    let outcome = generate_grid(&yellowstone_bbox(), 1.0, "YS", &WaterMask::empty())
        .expect("generation succeeds");

    assert!(
        outcome.raw_count > 10_000 && outcome.raw_count < 13_000,
        "unexpected raw cell count {}",
        outcome.raw_count
    );
    assert_eq!(outcome.excluded_count, 0);

    let ids: HashSet<&str> = outcome.cells.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(
        ids.len(),
        outcome.cells.len(),
        "duplicate ids in generated grid"
    );
    assert_eq!(outcome.collision_count, 0, "lattice math produced collisions");
}

#[test]
fn two_runs_produce_identical_assignments() {
    let a = generate_grid(&yellowstone_bbox(), 1.0, "YS", &WaterMask::empty()).unwrap();
    let b = generate_grid(&yellowstone_bbox(), 1.0, "YS", &WaterMask::empty()).unwrap();

    let ids_a: Vec<&str> = a.cells.iter().map(|c| c.id.as_str()).collect();
    let ids_b: Vec<&str> = b.cells.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids_a, ids_b);
    assert_eq!(a.raw_count, b.raw_count);
}

#[test]
fn sampled_points_fall_in_exactly_one_cell() {
    // ~10 km x 10 km box, no water
    let bbox = BoundingBox::new(-110.60, 44.55, -110.473, 44.64);
    let outcome = generate_grid(&bbox, 1.0, "YS", &WaterMask::empty()).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(13);
    for _ in 0..500 {
        let lng = rng.gen_range(bbox.min_lng..bbox.max_lng);
        let lat = rng.gen_range(bbox.min_lat..bbox.max_lat);

        // Half-open membership against each cell's ring bounds: the
        // southwest corner is ring[0], the northeast corner is ring[2].
        let containing = outcome
            .cells
            .iter()
            .filter(|cell| {
                lng >= cell.ring[0][0]
                    && lng < cell.ring[2][0]
                    && lat >= cell.ring[0][1]
                    && lat < cell.ring[2][1]
            })
            .count();
        assert_eq!(
            containing, 1,
            "point ({lng}, {lat}) is covered by {containing} cells"
        );
    }
}

#[test]
fn lake_covering_two_percent_removes_comparable_share() {
    // ~15 km x 15 km lake, about 2% of the Yellowstone box area
    let lake = WaterFeature::Lake {
        name: "Synthetic Lake".to_string(),
        ring: vec![
            [-110.50, 44.500],
            [-110.31, 44.500],
            [-110.31, 44.635],
            [-110.50, 44.635],
            [-110.50, 44.500],
        ],
    };
    let (mask, warnings) = WaterMask::compile(vec![lake], BoundaryPolicy::Exclude);
    assert!(warnings.is_empty());

    let dry = generate_grid(&yellowstone_bbox(), 1.0, "YS", &mask).unwrap();
    let full = generate_grid(&yellowstone_bbox(), 1.0, "YS", &WaterMask::empty()).unwrap();

    assert_eq!(dry.raw_count, full.raw_count);
    assert_eq!(dry.cells.len() + dry.excluded_count, full.cells.len());

    // One centroid per square kilometer of lake, give or take edges.
    assert!(
        dry.excluded_count > 150 && dry.excluded_count < 320,
        "excluded {} cells for a ~225 km^2 lake",
        dry.excluded_count
    );

    let ids: HashSet<&str> = dry.cells.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), dry.cells.len());

    for cell in &dry.cells {
        let inside = cell.center.lng > -110.50
            && cell.center.lng < -110.31
            && cell.center.lat > 44.500
            && cell.center.lat < 44.635;
        assert!(!inside, "cell {} survived inside the lake", cell.id);
    }
}

#[test]
fn river_buffer_clears_a_corridor() {
    let river = WaterFeature::River {
        name: "Synthetic River".to_string(),
        line: vec![[-110.45, 44.1], [-110.45, 45.1]],
        buffer_km: 1.0,
    };
    let (mask, _) = WaterMask::compile(vec![river], BoundaryPolicy::Exclude);
    let outcome = generate_grid(&yellowstone_bbox(), 1.0, "YS", &mask).unwrap();

    // A 2 km wide corridor through a ~111 km tall box should drop
    // roughly one to three cells per row.
    assert!(
        outcome.excluded_count > 100 && outcome.excluded_count < 400,
        "excluded {} cells for a 1 km river buffer",
        outcome.excluded_count
    );
    for cell in &outcome.cells {
        let east_km = (cell.center.lng - (-110.45)).abs()
            * parkgrid::geometry::km_per_degree_lng(cell.center.lat);
        assert!(
            east_km > 0.99,
            "cell {} centroid is {east_km:.3} km from the river axis",
            cell.id
        );
    }
}
