use ndarray::Array2;

use crate::detection::domain::component_labeler::{ComponentLabeler, Connectivity, Labeling};
use crate::shared::mask::Mask;

/// Two-pass connected-component labeling over a union-find forest.
///
/// First pass assigns provisional labels and records equivalences between
/// touching labels; second pass resolves every pixel to its root.
pub struct UnionFindLabeler;

impl UnionFindLabeler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnionFindLabeler {
    fn default() -> Self {
        Self::new()
    }
}

/// Offsets `(dx, dy)` of neighbours already visited in raster order.
fn visited_neighbours(connectivity: Connectivity) -> &'static [(isize, isize)] {
    match connectivity {
        Connectivity::Four => &[(-1, 0), (0, -1)],
        Connectivity::Eight => &[(-1, 0), (-1, -1), (0, -1), (1, -1)],
    }
}

impl ComponentLabeler for UnionFindLabeler {
    fn label(&self, mask: &Mask, connectivity: Connectivity) -> Labeling {
        let (width, height) = (mask.width(), mask.height());
        let mut labels = Array2::<u32>::zeros((height, width));
        let mut forest = DisjointSet::new();
        let offsets = visited_neighbours(connectivity);

        for y in 0..height {
            for x in 0..width {
                if !mask.is_foreground(x, y) {
                    continue;
                }
                let mut assigned: Option<u32> = None;
                for &(dx, dy) in offsets {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= width as isize {
                        continue;
                    }
                    let neighbour = labels[[ny as usize, nx as usize]];
                    if neighbour == 0 {
                        continue;
                    }
                    match assigned {
                        None => assigned = Some(neighbour),
                        Some(current) => forest.union(current, neighbour),
                    }
                }
                labels[[y, x]] = assigned.unwrap_or_else(|| forest.make_set());
            }
        }

        labels.mapv_inplace(|l| if l == 0 { 0 } else { forest.find(l) });
        Labeling::from_raw_labels(labels)
    }
}

/// Union-find over provisional labels `1..`; index 0 is unused.
struct DisjointSet {
    parent: Vec<u32>,
}

impl DisjointSet {
    fn new() -> Self {
        Self { parent: vec![0] }
    }

    fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut label: u32) -> u32 {
        while self.parent[label as usize] != label {
            let grandparent = self.parent[self.parent[label as usize] as usize];
            self.parent[label as usize] = grandparent;
            label = grandparent;
        }
        label
    }

    /// Links the larger root under the smaller one.
    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[child as usize] = root;
    }
}
