//! Force simulation step over layout nodes
//!
//! Small spring/charge/collision integrator. Working sets are page-sized, so
//! the pairwise passes stay quadratic instead of going through a quadtree.

use super::LayoutNode;

pub(crate) struct SimulationParams {
    pub link_distance: f32,
    pub link_strength: f32,
    pub charge_strength: f32,
    pub collide_radius: f32,
    pub collide_strength: f32,
    pub velocity_decay: f32,
}

const MIN_DISTANCE: f32 = 1.0;
const SLEEP_SPEED_SQ: f32 = 0.0001;

/// Advance positions/velocities one tick. Returns whether anything moved.
pub(crate) fn step(
    nodes: &mut [LayoutNode],
    links: &[(usize, usize)],
    alpha: f32,
    params: &SimulationParams,
) -> bool {
    let node_count = nodes.len();
    if node_count == 0 {
        return false;
    }

    // Link springs pull endpoint pairs toward the preferred distance
    for &(source, target) in links {
        if source >= node_count || target >= node_count || source == target {
            continue;
        }
        let dx = (nodes[target].x + nodes[target].vx) - (nodes[source].x + nodes[source].vx);
        let dy = (nodes[target].y + nodes[target].vy) - (nodes[source].y + nodes[source].vy);
        let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
        let l = (distance - params.link_distance) / distance * alpha * params.link_strength;
        nodes[target].vx -= dx * l * 0.5;
        nodes[target].vy -= dy * l * 0.5;
        nodes[source].vx += dx * l * 0.5;
        nodes[source].vy += dy * l * 0.5;
    }

    // Pairwise charge repulsion
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let dx = nodes[j].x - nodes[i].x;
            let dy = nodes[j].y - nodes[i].y;
            let dist_sq = (dx * dx + dy * dy).max(MIN_DISTANCE);
            let force = params.charge_strength * alpha / dist_sq;
            let fx = dx * force;
            let fy = dy * force;
            nodes[i].vx += fx;
            nodes[i].vy += fy;
            nodes[j].vx -= fx;
            nodes[j].vy -= fy;
        }
    }

    // Collision: push overlapping nodes apart
    let min_separation = params.collide_radius * 2.0;
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let dx = nodes[j].x - nodes[i].x;
            let dy = nodes[j].y - nodes[i].y;
            let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            if distance >= min_separation {
                continue;
            }
            let push = (min_separation - distance) / distance * params.collide_strength;
            let fx = dx * push * 0.5;
            let fy = dy * push * 0.5;
            nodes[i].vx -= fx;
            nodes[i].vy -= fy;
            nodes[j].vx += fx;
            nodes[j].vy += fy;
        }
    }

    let mut any_motion = false;
    let keep = 1.0 - params.velocity_decay;
    for node in nodes.iter_mut() {
        node.vx *= keep;
        node.vy *= keep;

        if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
            node.x = fx;
            node.y = fy;
            node.vx = 0.0;
            node.vy = 0.0;
            continue;
        }

        node.x += node.vx;
        node.y += node.vy;
        if node.vx * node.vx + node.vy * node.vy > SLEEP_SPEED_SQ {
            any_motion = true;
        }
    }

    any_motion
}
