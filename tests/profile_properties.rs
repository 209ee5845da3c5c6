//! Geometric correctness tests for worley_cells profiles.
//!
//! These tests verify invariants that should hold for the Voronoi polygon of
//! any cell in a jittered Worley point field.

use std::collections::HashSet;

use approx::assert_relative_eq;
use glam::{IVec2, Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use worley_cells::geometry::rotation_from_up;
use worley_cells::noise::{point_at, sample_nine};
use worley_cells::*;

fn config(seed: i32, jitter: f32, frequency: f32) -> WorleyConfig {
    WorleyConfigBuilder::new()
        .seed(seed)
        .jitter(jitter)
        .unwrap()
        .uniform_frequency(frequency)
        .unwrap()
        .build()
        .unwrap()
}

fn random_indices(seed: u64, count: usize) -> Vec<IVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| IVec2::new(rng.gen_range(-5000..5000), rng.gen_range(-5000..5000)))
        .collect()
}

/// Clockwise polygons turn right at every corner
fn assert_convex(profile: &CellProfile) {
    let n = profile.vertex_count();
    for i in 0..n {
        let a = profile.vertices[i];
        let b = profile.vertices[(i + 1) % n];
        let c = profile.vertices[(i + 2) % n];
        let (ab, bc) = (b - a, c - b);
        let turn = ab.x * bc.z - ab.z * bc.x;
        assert!(
            turn <= 1e-3 * ab.length().max(1.0) * bc.length().max(1.0),
            "cell {}: corner {} turns the wrong way ({})",
            profile.cell.index,
            (i + 1) % n,
            turn
        );
    }
}

#[test]
fn test_seed_1234_origin_profile() {
    let config = config(1234, 0.4, 0.1);
    let profile = compute_cell_profile(IVec2::ZERO, &config);

    assert!(profile.vertex_count() >= 3);
    assert_eq!(profile.vertices.len(), profile.adjacent_cells.len());
    assert!(profile.validate().is_ok());
    assert!(profile.contains_local(profile.mean_point));
}

#[test]
fn test_regular_grid_cells_are_squares() {
    let config = config(31337, 0.0, 0.1);
    let half = 0.5 / config.frequency.x;

    for index in [IVec2::ZERO, IVec2::new(-12, 40), IVec2::new(999, -3)] {
        let profile = compute_cell_profile(index, &config);
        assert_eq!(profile.vertex_count(), 4, "cell {}", index);
        assert_eq!(profile.adjacent_cells.len(), 4);

        for vertex in &profile.vertices {
            assert_relative_eq!(vertex.x.abs(), half, epsilon = 1e-2);
            assert_relative_eq!(vertex.z.abs(), half, epsilon = 1e-2);
        }

        let orthogonal: HashSet<IVec2> = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y]
            .into_iter()
            .map(|offset| index + offset)
            .collect();
        for pair in &profile.adjacent_cells {
            assert!(orthogonal.contains(&pair.c0.index));
            assert!(orthogonal.contains(&pair.c1.index));
        }
        assert_eq!(profile.neighbor_indices().len(), 4);
    }
}

#[test]
fn test_regression_seed_yields_valid_polygons() {
    // This seed used to produce a malformed cell mesh around the origin
    let config = config(-625141570, 0.3, 0.075);

    for x in -6..=6 {
        for z in -6..=6 {
            let profile = compute_cell_profile(IVec2::new(x, z), &config);
            assert!(
                profile.validate().is_ok(),
                "cell ({}, {}): {:?}",
                x,
                z,
                profile.validate()
            );
            assert_convex(&profile);
        }
    }
}

#[test]
fn test_closure_and_ordering() {
    let config = config(2024, 0.45, 0.1);

    for index in random_indices(7, 200) {
        let profile = compute_cell_profile(index, &config);
        assert!(profile.is_valid(), "cell {} is not closed", index);

        let angles: Vec<f32> = profile
            .vertices
            .iter()
            .map(|&v| rotation_from_up(v, Vec3::ZERO))
            .collect();
        assert!(angles.windows(2).all(|w| w[0] < w[1]), "cell {}: {:?}", index, angles);
        assert!(angles.iter().all(|a| (0.0..360.0).contains(a)));

        // No explicit closing duplicate
        let first = profile.vertices[0];
        let last = profile.vertices[profile.vertex_count() - 1];
        assert!(first.distance(last) > 1e-3);
    }
}

#[test]
fn test_no_duplicate_vertices() {
    let config = config(88, 0.4, 0.1);

    for index in random_indices(11, 100) {
        let profile = compute_cell_profile(index, &config);
        for (i, a) in profile.vertices.iter().enumerate() {
            for b in &profile.vertices[i + 1..] {
                assert!(a.distance(*b) > 1e-4, "cell {} repeats corner {}", index, a);
            }
        }
    }
}

#[test]
fn test_adjacent_pairs_stay_in_neighborhood() {
    let config = config(4242, 0.4, 0.1);

    for index in random_indices(3, 100) {
        let profile = compute_cell_profile(index, &config);
        for pair in &profile.adjacent_cells {
            assert_ne!(pair.c0.index, pair.c1.index);
            for cell in [pair.c0, pair.c1] {
                assert_ne!(cell.index, index);
                let offset = cell.index - index;
                assert!(offset.x.abs() <= 1 && offset.y.abs() <= 1, "{} not adjacent to {}", cell.index, index);
            }
        }
    }
}

#[test]
fn test_pairs_are_clockwise_around_cell() {
    let config = config(6, 0.4, 0.1);
    let profile = compute_cell_profile(IVec2::new(4, 4), &config);

    for pair in &profile.adjacent_cells {
        let center = profile.cell.position;
        assert!(rotation_from_up(pair.c0.position, center) <= rotation_from_up(pair.c1.position, center));
    }
}

#[test]
fn test_corners_are_equidistant_from_three_sites() {
    let config = config(5150, 0.35, 0.05);

    for index in random_indices(19, 50) {
        let profile = compute_cell_profile(index, &config);
        let site = profile.cell.position;
        for (corner, pair) in profile.vertices.iter().zip(&profile.adjacent_cells) {
            // Cell-local offsets keep full precision far from the origin
            let d = corner.length();
            assert_relative_eq!(corner.distance(pair.c0.position - site), d, epsilon = 1e-2);
            assert_relative_eq!(corner.distance(pair.c1.position - site), d, epsilon = 1e-2);
        }
    }
}

#[test]
fn test_nearest_cell_round_trip() {
    let config = config(321, 0.45, 0.1);
    let noise = config.noise();

    for index in random_indices(23, 200) {
        let cell = noise.point_at(index);
        assert_eq!(noise.cell_at(cell.position).index, index);
    }
}

#[test]
fn test_profile_matches_nearest_cell_queries() {
    let config = config(77, 0.4, 0.1);
    let noise = config.noise();
    let profile = compute_cell_profile(IVec2::new(-3, 9), &config);

    // Points halfway between the site and each corner belong to the cell
    for corner in profile.world_vertices() {
        let inside = profile.cell.position.lerp(corner, 0.5);
        assert_eq!(noise.cell_at(inside).index, profile.cell.index);
    }
}

#[test]
fn test_delaunay_validity_of_neighborhood() {
    let frequency = Vec2::splat(0.1);

    for (seed, index) in [(1, IVec2::ZERO), (1234, IVec2::new(50, -50)), (625141570, IVec2::new(-1, 2))] {
        let center = point_at(index, seed, 0.4, frequency);
        let nine = sample_nine(center, seed, 0.4, frequency);

        for triangle in triangulate(&nine) {
            for point in &nine {
                if triangle.has_vertex(point.index) {
                    continue;
                }
                assert!(
                    point.position.distance(triangle.circumcircle.center)
                        > triangle.circumcircle.radius - 1e-3,
                    "cell {} inside circumcircle",
                    point.index
                );
            }
        }
    }
}

#[test]
fn test_profiles_do_not_depend_on_query_order() {
    let config = config(9001, 0.4, 0.1);
    let indices = random_indices(31, 20);

    let forward: Vec<CellProfile> = indices.iter().map(|&i| compute_cell_profile(i, &config)).collect();
    let backward: Vec<CellProfile> = indices
        .iter()
        .rev()
        .map(|&i| compute_cell_profile(i, &config))
        .collect();

    for (a, b) in forward.iter().zip(backward.iter().rev()) {
        assert_eq!(a, b);
    }
}

#[test]
fn test_noise_and_free_function_agree() {
    let config = config(12, 0.4, 0.1);
    let noise = WorleyNoise::from_config(&config);
    let index = IVec2::new(100, -100);

    assert_eq!(noise.cell_profile(index), compute_cell_profile(index, &config));
}

#[test]
fn test_full_jitter_profiles_are_closed_or_rejected() {
    let mut rejected = 0;

    for seed in [1, 77, 2024] {
        let config = config(seed, 1.0, 0.1);
        for x in -15..5 {
            for z in -10..10 {
                let profile = compute_cell_profile(IVec2::new(x, z), &config);
                assert_eq!(profile.is_valid(), profile.validate().is_ok(), "cell ({}, {})", x, z);

                if !profile.is_valid() {
                    rejected += 1;
                    continue;
                }

                // Sites on the hull of their neighborhood must never pass as closed
                assert!(profile.contains_local(Vec3::ZERO), "seed {} cell ({}, {})", seed, x, z);
                for i in 0..profile.vertex_count() {
                    assert!(
                        profile.edge_neighbor(i).is_some(),
                        "seed {} cell ({}, {}): corner {} is open",
                        seed,
                        x,
                        z,
                        i
                    );
                }
            }
        }
    }

    assert!(rejected > 0);
}
