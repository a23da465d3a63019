// Force-directed (spring) layout
//
// Fruchterman-Reingold: every pair of nodes repels with force k²/d, every
// edge attracts with force d²/k, where k = sqrt(1/n) is the ideal edge
// length in the unit square. Each iteration moves every node along its net
// displacement, capped by a temperature that cools linearly to zero.
//
// Time complexity: O(iterations * n²) - fine for environment-sized graphs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::graph::Graph;

/// Minimum distance used when two nodes coincide.
const MIN_DISTANCE: f64 = 0.01;

/// Node positions in `[-1, 1]²`, indexed by node.
///
/// Deterministic for a given `seed`. Zero nodes give an empty layout and a
/// single node sits at the origin.
pub fn spring_layout(graph: &Graph, iterations: usize, seed: u64) -> Vec<[f64; 2]> {
    let n = graph.node_count();
    match n {
        0 => return vec![],
        1 => return vec![[0.0, 0.0]],
        _ => {}
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pos: Vec<[f64; 2]> = (0..n)
        .map(|_| [rng.random::<f64>(), rng.random::<f64>()])
        .collect();

    let edges = graph.edges();
    let k = (1.0 / n as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut disp = vec![[0.0f64; 2]; n];

        // Repulsion between every pair
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / (dist * dist);
                disp[i][0] += dx * force;
                disp[i][1] += dy * force;
                disp[j][0] -= dx * force;
                disp[j][1] -= dy * force;
            }
        }

        // Attraction along edges
        for &(i, j) in &edges {
            let dx = pos[i][0] - pos[j][0];
            let dy = pos[i][1] - pos[j][1];
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let force = dist / k;
            disp[i][0] -= dx * force;
            disp[i][1] -= dy * force;
            disp[j][0] += dx * force;
            disp[j][1] += dy * force;
        }

        for (p, d) in pos.iter_mut().zip(&disp) {
            let length = (d[0] * d[0] + d[1] * d[1]).sqrt().max(MIN_DISTANCE);
            p[0] += d[0] * temperature / length;
            p[1] += d[1] * temperature / length;
        }
        temperature -= cooling;
    }

    rescale(&mut pos);
    pos
}

/// Center on the mean and scale so the largest coordinate magnitude is 1.
fn rescale(pos: &mut [[f64; 2]]) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / n;
    for p in pos.iter_mut() {
        p[0] -= mean_x;
        p[1] -= mean_y;
    }
    let extent = pos
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(0.0f64, f64::max);
    if extent > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= extent;
            p[1] /= extent;
        }
    }
}
