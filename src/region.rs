//! Breadth-first expansion of cell profiles around a root cell

use std::collections::{HashMap, HashSet};

use glam::IVec2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;
#[cfg(feature = "spatial-index")]
use glam::Vec3;

use crate::cell::CellProfile;
use crate::config::WorleyConfig;
use crate::generation::compute_cell_profile;

/// Conditionally parallel iterator over a slice.
macro_rules! maybe_par_iter {
    ($slice:expr) => {{
        #[cfg(feature = "parallel")]
        {
            $slice.par_iter()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $slice.iter()
        }
    }};
}

/// A connected patch of cell profiles
///
/// Starting from a root cell, profiles are computed layer by layer over the
/// polygon adjacency graph: layer `k` holds the cells `k` hops from the root.
/// Every cell is profiled at most once. Profiles depend only on the lattice
/// index and configuration, so a region is fully reproducible.
///
/// Cells whose profile is not a closed polygon are logged, remembered in
/// [`CellRegion::skipped_cells`], and not expanded further.
///
/// # Examples
///
/// ```
/// use worley_cells::*;
///
/// let config = WorleyConfigBuilder::new().seed(1234).build().unwrap();
/// let region = CellRegion::generate(config, IVec2::ZERO, 2);
///
/// let root = region.get_profile(IVec2::ZERO).unwrap();
/// println!("root cell has {} corners", root.vertex_count());
/// println!("region has {} cells", region.cell_count());
/// ```
#[derive(Clone)]
pub struct CellRegion {
    /// Configuration used to generate every profile
    config: WorleyConfig,

    /// Cell the expansion started from
    root: IVec2,

    /// Valid profiles by lattice index
    profiles: HashMap<IVec2, CellProfile>,

    /// Lattice indices in breadth-first discovery order
    order: Vec<IVec2>,

    /// Cells whose profile was not a closed polygon
    skipped: Vec<IVec2>,

    /// Site lookup over `order` (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl CellRegion {
    /// Largest hop count [`CellRegion::generate`] will expand to
    ///
    /// The lattice is unbounded and a region of `h` hops holds on the order of
    /// `3h²` cells, so larger requests are clamped.
    pub const MAX_HOPS: usize = 256;

    /// Profile every cell within `hops` adjacency steps of `root`
    ///
    /// `hops == 0` profiles only the root. Cell count and memory grow
    /// quadratically with `hops`, which is clamped to [`CellRegion::MAX_HOPS`].
    /// With the `parallel` feature each layer is computed on the rayon thread
    /// pool; the result is identical.
    pub fn generate(config: WorleyConfig, root: IVec2, hops: usize) -> Self {
        let hops = clamp_hops(hops);
        let mut profiles = HashMap::new();
        let mut order = Vec::new();
        let mut skipped = Vec::new();

        let mut visited = HashSet::new();
        visited.insert(root);
        let mut current = vec![root];

        for hop in 0..=hops {
            if current.is_empty() {
                break;
            }

            let computed: Vec<CellProfile> = maybe_par_iter!(current)
                .map(|&index| compute_cell_profile(index, &config))
                .collect();

            let mut next = Vec::new();
            for profile in computed {
                let index = profile.cell.index;
                if let Err(err) = profile.validate() {
                    log::warn!("skipping cell {} at hop {}: {}", index, hop, err);
                    skipped.push(index);
                    continue;
                }

                if hop < hops {
                    for neighbor in profile.neighbor_indices() {
                        if visited.insert(neighbor) {
                            next.push(neighbor);
                        }
                    }
                }

                order.push(index);
                profiles.insert(index, profile);
            }

            log::debug!("hop {}: {} cells profiled", hop, order.len());
            current = next;
        }

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let sites: Vec<Vec3> = order.iter().map(|i| profiles[i].cell.position).collect();
            SpatialIndex::new(&sites)
        };

        Self {
            config,
            root,
            profiles,
            order,
            skipped,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        }
    }

    /// Get the configuration used to generate this region
    #[inline]
    pub fn config(&self) -> &WorleyConfig {
        &self.config
    }

    /// Cell the region was grown from
    #[inline]
    pub fn root(&self) -> IVec2 {
        self.root
    }

    /// Number of profiled cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.order.len()
    }

    /// Get a profile by lattice index
    ///
    /// Returns `None` for cells outside the region or skipped as invalid.
    #[inline]
    pub fn get_profile(&self, index: IVec2) -> Option<&CellProfile> {
        self.profiles.get(&index)
    }

    /// Check whether a cell was profiled
    #[inline]
    pub fn contains(&self, index: IVec2) -> bool {
        self.profiles.contains_key(&index)
    }

    /// All profiles in breadth-first order from the root
    pub fn profiles(&self) -> impl Iterator<Item = &CellProfile> + '_ {
        self.order.iter().filter_map(|index| self.profiles.get(index))
    }

    /// Cells that were reached but had no closed polygon
    #[inline]
    pub fn skipped_cells(&self) -> &[IVec2] {
        &self.skipped
    }

    /// Neighbor indices of a profiled cell
    ///
    /// Neighbors may lie outside the region. Returns an empty vec if the cell
    /// is not part of the region.
    pub fn get_neighbors(&self, index: IVec2) -> Vec<IVec2> {
        self.profiles
            .get(&index)
            .map(|profile| profile.neighbor_indices())
            .unwrap_or_default()
    }

    /// Find the region cell containing a world position (requires spatial-index feature)
    ///
    /// Returns `None` when the position falls outside every profiled polygon.
    ///
    /// # Example
    ///
    /// ```
    /// # use worley_cells::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let config = WorleyConfigBuilder::new().seed(7).build().unwrap();
    /// let region = CellRegion::generate(config, IVec2::ZERO, 1);
    ///
    /// let site = region.get_profile(IVec2::ZERO).unwrap().cell.position;
    /// assert_eq!(region.find_cell_at(site), Some(IVec2::ZERO));
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: Vec3) -> Option<IVec2> {
        let index = *self.order.get(self.spatial_index.find_nearest(position)?)?;
        let profile = self.profiles.get(&index)?;

        profile
            .contains_local(position - profile.cell.position)
            .then_some(index)
    }

    /// Find region cells within a given hop count from a center cell (BFS)
    ///
    /// # Arguments
    ///
    /// * `center` - Starting cell
    /// * `hops` - Maximum number of cell hops (0 = just the center cell)
    ///
    /// # Returns
    ///
    /// Lattice indices within range, including the center, restricted to cells
    /// of this region. Returns empty vec if `center` is not in the region.
    pub fn find_cells_within_radius(&self, center: IVec2, hops: usize) -> Vec<IVec2> {
        if !self.contains(center) {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut found = vec![center];
        let mut current = vec![center];
        visited.insert(center);

        // BFS with hop limit
        for _ in 0..hops {
            let mut next = Vec::new();
            for &index in &current {
                for neighbor in self.get_neighbors(index) {
                    if self.contains(neighbor) && visited.insert(neighbor) {
                        next.push(neighbor);
                        found.push(neighbor);
                    }
                }
            }
            current = next;
        }

        found
    }
}

fn clamp_hops(hops: usize) -> usize {
    if hops > CellRegion::MAX_HOPS {
        log::warn!(
            "region of {} hops requested, clamping to {}",
            hops,
            CellRegion::MAX_HOPS
        );
    }
    hops.min(CellRegion::MAX_HOPS)
}
