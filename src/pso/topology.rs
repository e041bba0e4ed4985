//! Ring (1-D) neighborhood topology.

/// Particles arranged on a circle; each one sees `radius` particles on
/// either side of itself, plus itself.
///
/// A radius of zero gives self-only neighborhoods. Radii that would wrap
/// around onto the same particle twice are capped so every particle
/// appears at most once in a neighborhood.
///
/// ```
/// use rastrigin_bench::pso::Ring;
///
/// let ring = Ring::new(1);
/// assert_eq!(ring.neighbors(0, 5), vec![4, 0, 1]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    radius: usize,
}

impl Ring {
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Radius actually usable in a swarm of `size` particles.
    pub fn effective_radius(&self, size: usize) -> usize {
        self.radius.min(size.saturating_sub(1) / 2)
    }

    /// Indices in the neighborhood of particle `i`, from `i - r` to
    /// `i + r` with wraparound.
    pub fn neighbors(&self, i: usize, size: usize) -> Vec<usize> {
        if size == 0 {
            return Vec::new();
        }
        let r = self.effective_radius(size);
        let mut out: Vec<usize> = (0..=2 * r).map(|j| (i + size - r + j) % size).collect();
        // An even ring with the maximal radius leaves one opposite particle
        // unreached; include it when the requested radius asks for it.
        if self.radius > r && size % 2 == 0 && size > 1 {
            out.push((i + size / 2) % size);
        }
        out
    }
}
