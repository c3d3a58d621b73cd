use std::collections::HashMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::shared::constants::BACKGROUND_LABEL;
use crate::shared::mask::Mask;

/// Pixel adjacency used when grouping foreground pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// Edge neighbours only.
    Four,
    /// Edge and diagonal neighbours.
    #[default]
    Eight,
}

/// Geometry of one label: bounding box and pixel count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComponentStats {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub area: u32,
}

pub type Centroid = (f64, f64);

/// Result of one labeling pass.
///
/// `stats[i]` and `centroids[i]` describe label `i`. Index 0 is the
/// background, so `component_count` is one more than the number of blobs.
#[derive(Clone, Debug, PartialEq)]
pub struct Labeling {
    pub component_count: usize,
    pub labels: Array2<u32>,
    pub stats: Vec<ComponentStats>,
    pub centroids: Vec<Centroid>,
}

impl Labeling {
    /// Builds a labeling from a label image with arbitrary non-zero ids.
    ///
    /// Ids are renumbered `1..` in raster order of each component's first
    /// pixel, which keeps numbering identical across labeler implementations.
    pub fn from_raw_labels(mut labels: Array2<u32>) -> Self {
        let mut renumber: HashMap<u32, u32> = HashMap::new();
        for label in labels.iter_mut() {
            if *label == BACKGROUND_LABEL {
                continue;
            }
            let next = renumber.len() as u32 + 1;
            *label = *renumber.entry(*label).or_insert(next);
        }
        let component_count = renumber.len() + 1;

        let mut acc = vec![Accumulator::default(); component_count];
        for ((y, x), &label) in labels.indexed_iter() {
            acc[label as usize].add(x as u32, y as u32);
        }

        let stats = acc.iter().map(Accumulator::stats).collect();
        let centroids = acc.iter().map(Accumulator::centroid).collect();
        Self {
            component_count,
            labels,
            stats,
            centroids,
        }
    }

    /// Number of real (non-background) components.
    pub fn blob_count(&self) -> usize {
        self.component_count.saturating_sub(1)
    }
}

/// Domain interface for connected-component labeling of a mask.
///
/// The contract, not the algorithm, is what callers rely on: labels
/// `1..component_count` are foreground regions, label 0 is background.
pub trait ComponentLabeler: Send + Sync {
    fn label(&self, mask: &Mask, connectivity: Connectivity) -> Labeling;
}

#[derive(Clone, Copy)]
struct Accumulator {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    count: u64,
    sum_x: u64,
    sum_y: u64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            min_x: u32::MAX,
            min_y: u32::MAX,
            max_x: 0,
            max_y: 0,
            count: 0,
            sum_x: 0,
            sum_y: 0,
        }
    }
}

impl Accumulator {
    fn add(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.count += 1;
        self.sum_x += x as u64;
        self.sum_y += y as u64;
    }

    fn stats(&self) -> ComponentStats {
        if self.count == 0 {
            return ComponentStats::default();
        }
        ComponentStats {
            left: self.min_x,
            top: self.min_y,
            width: self.max_x - self.min_x + 1,
            height: self.max_y - self.min_y + 1,
            area: self.count as u32,
        }
    }

    fn centroid(&self) -> Centroid {
        if self.count == 0 {
            return (0.0, 0.0);
        }
        let n = self.count as f64;
        (self.sum_x as f64 / n, self.sum_y as f64 / n)
    }
}
