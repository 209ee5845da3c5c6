//! Region expansion and lookups for worley_cells

use std::time::Instant;

use worley_cells::*;

fn main() -> Result<()> {
    println!("=== worley_cells Region Demo ===\n");

    let config = WorleyConfigBuilder::new()
        .seed(625141570)
        .jitter(0.3)?
        .uniform_frequency(0.075)?
        .build()?;

    // Step 1: Grow a region around the origin
    println!("Step 1: Generating region...");
    let start = Instant::now();
    let region = CellRegion::generate(config, IVec2::ZERO, 4);
    println!("  {} cells in {:?}", region.cell_count(), start.elapsed());
    if !region.skipped_cells().is_empty() {
        println!("  Skipped: {:?}", region.skipped_cells());
    }

    // Step 2: Corner count distribution
    println!("\nStep 2: Corner counts:");
    let mut counts = std::collections::BTreeMap::new();
    for profile in region.profiles() {
        *counts.entry(profile.vertex_count()).or_insert(0usize) += 1;
    }
    for (corners, count) in counts {
        println!("  {} corners: {}", corners, count);
    }

    // Step 3: Hop rings
    println!("\nStep 3: Hop rings around the root:");
    for hops in 0..=3 {
        let cells = region.find_cells_within_radius(region.root(), hops);
        println!("  within {} hops: {} cells", hops, cells.len());
    }

    // Step 4: Position lookups
    #[cfg(feature = "spatial-index")]
    {
        println!("\nStep 4: Position lookups:");
        for position in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(25.0, 0.0, -10.0),
            Vec3::new(-40.0, 0.0, 33.0),
        ] {
            match region.find_cell_at(position) {
                Some(index) => println!("  {} -> cell {}", position, index),
                None => println!("  {} -> outside region", position),
            }
        }
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
