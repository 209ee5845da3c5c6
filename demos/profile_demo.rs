//! Single cell profile walkthrough for worley_cells

use worley_cells::*;

fn main() -> Result<()> {
    println!("=== worley_cells Profile Demo ===\n");

    // Step 1: Configure the point field
    println!("Step 1: Configuring point field...");
    let config = WorleyConfigBuilder::new()
        .seed(1234)
        .jitter(0.4)?
        .uniform_frequency(0.1)?
        .build()?;

    println!("  Seed: {}", config.seed);
    println!("  Jitter: {}", config.jitter);
    println!("  Cell size: {}", config.cell_size());

    // Step 2: Profile one cell
    let index = IVec2::new(3, -7);
    println!("\nStep 2: Profiling cell {}...", index);
    let profile = compute_cell_profile(index, &config);
    println!("  Site: {}", profile.cell.position);
    println!("  Value: {:.3}", profile.cell.value);
    println!("  Corners: {}", profile.vertex_count());
    println!("  Area: {:.2}", profile.area());

    profile.validate()?;

    // Step 3: Walk the polygon clockwise
    println!("\nStep 3: Corners (clockwise from up):");
    for (i, (corner, pair)) in profile.vertices.iter().zip(&profile.adjacent_cells).enumerate() {
        let rotation = geometry::rotation_from_up(*corner, Vec3::ZERO);
        println!(
            "  {:>2}: {:>7.2}°  local {}  between {} and {}",
            i, rotation, corner, pair.c0.index, pair.c1.index
        );
    }

    println!("\nEdges:");
    for i in 0..profile.vertex_count() {
        if let Some(neighbor) = profile.edge_neighbor(i) {
            println!("  edge {} borders cell {}", i, neighbor.index);
        }
    }

    // Step 4: Nearest-cell queries agree with the profile
    println!("\nStep 4: Nearest-cell queries:");
    let noise = config.noise();
    let world = profile.cell.position + profile.mean_point * 0.5;
    let found = noise.nearest_cells(world);
    println!("  {} -> cell {} (runner-up {})", world, found.nearest.index, found.second_nearest.index);

    println!("\n=== Demo Complete ===");
    Ok(())
}
