//! Grid generation benchmark
//!
//! Run with: cargo bench

use std::hint::black_box;
use std::time::Instant;

// Criterion would give proper statistics; a single timed pass through the
// full-size grid is enough to catch gross regressions in the lattice loop.

#[cfg(test)]
mod benches {
    use super::*;
    use parkgrid::{config::BoundingBox, generate_grid, water::WaterMask};

    #[test]
    fn benchmark_yellowstone_generation() {
        let bbox = BoundingBox::new(-111.1, 44.1, -109.8, 45.1);
        let start = Instant::now();
        let outcome = generate_grid(&bbox, 1.0, "YS", &WaterMask::empty()).unwrap();
        let elapsed = start.elapsed();
        println!(
            "generated {} cells in {elapsed:?}",
            black_box(outcome.cells.len())
        );
    }
}
