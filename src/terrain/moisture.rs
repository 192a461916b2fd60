//! Влажность
//!
//! Два прохода: до рек влажность определяется близостью к воде, после рек
//! пресная вода рек становится дополнительным источником.

use std::collections::VecDeque;

use crate::graph::MapGraph;
use crate::noise::NoiseField;

/// Затухание влажности на один шаг по смежным вершинам
const MOISTURE_DECAY: f32 = 0.9;
/// Вклад шума в сырую влажность суши (до перераспределения)
const NOISE_WEIGHT: f32 = 0.1;
/// Максимальная сила реки как источника влаги
const RIVER_MOISTURE_CAP: f32 = 3.0;

/// Сила источника влаги в вершине
fn source_strength(graph: &MapGraph, i: usize, with_rivers: bool) -> f32 {
    let corner = &graph.corners[i];
    let mut strength: f32 = if corner.water { 1.0 } else { 0.0 };
    if with_rivers && corner.river_size > 0 {
        strength = strength.max((0.2 * corner.river_size as f32).min(RIVER_MOISTURE_CAP));
    }
    strength
}

/// Назначает влажность вершинам и полигонам
///
/// Источники распространяют влагу по смежным вершинам с затуханием, шум слегка
/// перемешивает значения, затем влажность суши перераспределяется по рангу в
/// [0, 1]. Вода всегда 1.
pub fn assign_moisture(
    graph: &mut MapGraph,
    noise: &NoiseField,
    noise_scale: f32,
    noise_intensity: f32,
    with_rivers: bool,
) {
    let count = graph.corners.len();
    let mut raw: Vec<f32> = (0..count)
        .map(|i| source_strength(graph, i, with_rivers))
        .collect();

    let mut queue: VecDeque<usize> = (0..count).filter(|&i| raw[i] > 0.0).collect();
    while let Some(i) = queue.pop_front() {
        let spread = raw[i] * MOISTURE_DECAY;
        for &a in &graph.corners[i].adjacent {
            if spread > raw[a.index()] {
                raw[a.index()] = spread;
                queue.push_back(a.index());
            }
        }
    }

    let (width, height) = (graph.width, graph.height);
    for (i, corner) in graph.corners.iter().enumerate() {
        if corner.water {
            continue;
        }
        let qx = 2.0 * corner.point.x / width - 1.0;
        let qy = 2.0 * corner.point.y / height - 1.0;
        raw[i] += noise.sample_scaled(qx, qy, noise_scale, NOISE_WEIGHT * noise_intensity);
    }

    let mut land: Vec<usize> = (0..count).filter(|&i| !graph.corners[i].water).collect();
    land.sort_by(|&a, &b| raw[a].total_cmp(&raw[b]).then(a.cmp(&b)));
    let denominator = land.len().saturating_sub(1).max(1) as f32;
    for (rank, &i) in land.iter().enumerate() {
        graph.corners[i].moisture = rank as f32 / denominator;
    }
    for corner in graph.corners.iter_mut().filter(|q| q.water) {
        corner.moisture = 1.0;
    }

    let averages: Vec<f32> = graph
        .centers
        .iter()
        .map(|c| {
            if c.corners.is_empty() {
                return if c.water { 1.0 } else { 0.0 };
            }
            let sum: f32 = c.corners.iter().map(|&q| graph.corner(q).moisture).sum();
            (sum / c.corners.len() as f32).clamp(0.0, 1.0)
        })
        .collect();
    for (center, moisture) in graph.centers.iter_mut().zip(averages) {
        center.moisture = moisture;
    }
}
