mod forces;

use eframe::egui::{Rect, Vec2, vec2};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DEFAULT_ITERATIONS;
use crate::flow::TopologyGraph;
use forces::{attraction_between, repulsion_between};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct LayoutConfig {
    pub(in crate::app) iterations: usize,
    pub(in crate::app) repulsion: f32,
    pub(in crate::app) spring_length: f32,
    pub(in crate::app) padding: f32,
    pub(in crate::app) bounds: Rect,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            repulsion: 5000.0,
            spring_length: 100.0,
            padding: 50.0,
            bounds: Rect::from_min_size(Default::default(), vec2(1000.0, 700.0)),
        }
    }
}

impl LayoutConfig {
    fn placement_ranges(&self) -> [(f32, f32); 2] {
        let padded = |min: f32, max: f32| {
            let (low, high) = (min + self.padding, max - self.padding);
            if low < high {
                (low, high)
            } else {
                let center = (min + max) * 0.5;
                (center, center)
            }
        };

        [
            padded(self.bounds.min.x, self.bounds.max.x),
            padded(self.bounds.min.y, self.bounds.max.y),
        ]
    }
}

/// World position per node id, in graph node order. Only the layout engine
/// produces these.
#[derive(Clone, Debug, Default, PartialEq)]
pub(in crate::app) struct NodePositions {
    by_id: IndexMap<String, Vec2>,
}

impl NodePositions {
    pub(in crate::app) fn get(&self, node_id: &str) -> Option<Vec2> {
        self.by_id.get(node_id).copied()
    }

    #[cfg(test)]
    pub(in crate::app) fn iter(&self) -> impl Iterator<Item = (&str, Vec2)> {
        self.by_id
            .iter()
            .map(|(node_id, position)| (node_id.as_str(), *position))
    }

    pub(in crate::app) fn len(&self) -> usize {
        self.by_id.len()
    }
}

/// Seeded force-directed layout: random placement, then a fixed number of
/// relaxation rounds. Each round computes all repulsion and spring
/// displacements from the round's starting positions and applies them
/// together.
pub(in crate::app) fn rebuild_layout(
    graph: &TopologyGraph,
    config: &LayoutConfig,
    seed: u64,
) -> NodePositions {
    let node_count = graph.node_count();
    if node_count == 0 {
        return NodePositions::default();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let [(min_x, max_x), (min_y, max_y)] = config.placement_ranges();
    let mut positions = (0..node_count)
        .map(|_| vec2(sample(&mut rng, min_x, max_x), sample(&mut rng, min_y, max_y)))
        .collect::<Vec<_>>();

    let edges = graph
        .edges
        .iter()
        .filter_map(|edge| {
            let from = graph.nodes.get_index_of(&edge.source_id)?;
            let to = graph.nodes.get_index_of(&edge.target_id)?;
            (from != to).then_some((from, to))
        })
        .collect::<Vec<_>>();

    let spring_length = config.spring_length.max(1.0);
    let mut displacement = vec![Vec2::ZERO; node_count];

    for _ in 0..config.iterations {
        displacement.fill(Vec2::ZERO);

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let push = repulsion_between(positions[i], positions[j], i, j, config.repulsion);
                displacement[i] += push;
                displacement[j] -= push;
            }
        }

        for &(from, to) in &edges {
            let pull = attraction_between(positions[from], positions[to], spring_length);
            displacement[from] += pull;
            displacement[to] -= pull;
        }

        for (position, delta) in positions.iter_mut().zip(&displacement) {
            *position += *delta;
        }
    }

    NodePositions {
        by_id: graph.nodes.keys().cloned().zip(positions).collect(),
    }
}

fn sample(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    if min < max {
        rng.random_range(min..max)
    } else {
        min
    }
}
