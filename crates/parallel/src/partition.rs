//! Static partitioning of regions across workers

use texel_core::Region;

/// Split `region` into at most `workers` disjoint contiguous slabs.
///
/// Slabs are cut along axis 0 (the slowest-varying axis), so each one is a
/// contiguous block of the row-major output. Every slab except possibly the
/// last has the same extent `ceil(size[0] / workers)` along axis 0, which
/// matches `ndarray`'s `axis_chunks_iter` over the same extent. The slabs
/// cover `region` exactly; an empty region yields no slabs.
pub fn split_region(region: &Region, workers: usize) -> Vec<Region> {
    if region.is_empty() {
        return Vec::new();
    }
    if region.ndim() == 0 {
        return vec![region.clone()];
    }

    let extent = region.size()[0];
    let chunk = slab_extent(extent, workers);
    let start = region.start()[0];

    (0..extent)
        .step_by(chunk)
        .map(|offset| {
            let end = (offset + chunk).min(extent);
            region.with_axis_range(0, start + offset, start + end)
        })
        .collect()
}

/// Extent along axis 0 of the slabs produced by [`split_region`]
pub fn slab_extent(extent: usize, workers: usize) -> usize {
    extent.div_ceil(workers.max(1)).max(1)
}
