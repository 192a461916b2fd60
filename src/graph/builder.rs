//! Построение графа по триангуляции Делоне и двойственной диаграмме Вороного

use delaunator::{EMPTY, Triangulation, next_halfedge, triangulate};
use tracing::debug;

use super::{Center, CenterId, Corner, CornerId, Edge, EdgeId, MapGraph, Point};
use crate::config::{MIN_POINTS, MapConfig};
use crate::error::{MapError, MapResult};

/// Строит граф карты по набору точек
///
/// - Center — по одному на точку;
/// - Corner — центр описанной окружности каждого треугольника (прижатый к
///   прямоугольнику карты) плюс по одной вершине на ребро выпуклой оболочки,
///   где луч Вороного упирается в границу карты;
/// - Edge — по одному на ребро Делоне.
///
/// # Ошибки
/// `GraphConstruction`, если точек меньше трёх или все они на одной прямой.
pub fn build_graph(sites: &[Point], config: &MapConfig) -> MapResult<MapGraph> {
    if sites.len() < MIN_POINTS {
        return Err(MapError::GraphConstruction(format!(
            "need at least {MIN_POINTS} sites, got {}",
            sites.len()
        )));
    }

    let triangulation = triangulate_sites(sites)?;
    let mut builder = GraphBuilder::new(sites, config.width, config.height);

    for t in 0..triangulation.triangles.len() / 3 {
        let a = site(sites, triangulation.triangles[3 * t]);
        let b = site(sites, triangulation.triangles[3 * t + 1]);
        let c = site(sites, triangulation.triangles[3 * t + 2]);
        builder.add_corner(circumcenter(a, b, c));
    }

    for e in 0..triangulation.triangles.len() {
        let opposite = triangulation.halfedges[e];
        // Каждое внутреннее ребро Делоне встречается дважды
        if opposite != EMPTY && opposite < e {
            continue;
        }
        let p = triangulation.triangles[e];
        let q = triangulation.triangles[next_halfedge(e)];
        let v0 = CornerId::from(e / 3);
        let v1 = if opposite == EMPTY {
            let r = triangulation.triangles[next_halfedge(next_halfedge(e))];
            let start = builder.corners[e / 3].point;
            let end = builder.project_to_border(
                start,
                site(sites, p),
                site(sites, q),
                site(sites, r),
            );
            builder.add_corner(end)
        } else {
            CornerId::from(opposite / 3)
        };
        builder.add_edge(CenterId::from(p), CenterId::from(q), v0, v1);
    }

    for &h in &triangulation.hull {
        builder.centers[h].border = true;
    }

    let graph = builder.finish(config);
    debug!(
        centers = graph.centers.len(),
        edges = graph.edges.len(),
        corners = graph.corners.len(),
        "граф построен"
    );
    Ok(graph)
}

fn triangulate_sites(sites: &[Point]) -> MapResult<Triangulation> {
    let points: Vec<delaunator::Point> = sites
        .iter()
        .map(|p| delaunator::Point {
            x: f64::from(p.x),
            y: f64::from(p.y),
        })
        .collect();
    let triangulation = triangulate(&points);
    if triangulation.triangles.is_empty() {
        return Err(MapError::GraphConstruction(
            "sites are collinear, triangulation is empty".into(),
        ));
    }
    Ok(triangulation)
}

fn site(sites: &[Point], index: usize) -> (f64, f64) {
    let p = sites[index];
    (f64::from(p.x), f64::from(p.y))
}

/// Центр описанной окружности; для вырожденного треугольника — центроид
fn circumcenter(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> (f64, f64) {
    let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
    if d.abs() < 1e-12 {
        return ((a.0 + b.0 + c.0) / 3.0, (a.1 + b.1 + c.1) / 3.0);
    }
    let a2 = a.0 * a.0 + a.1 * a.1;
    let b2 = b.0 * b.0 + b.1 * b.1;
    let c2 = c.0 * c.0 + c.1 * c.1;
    let x = (a2 * (b.1 - c.1) + b2 * (c.1 - a.1) + c2 * (a.1 - b.1)) / d;
    let y = (a2 * (c.0 - b.0) + b2 * (a.0 - c.0) + c2 * (b.0 - a.0)) / d;
    (x, y)
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

struct GraphBuilder {
    width: f32,
    height: f32,
    centers: Vec<Center>,
    edges: Vec<Edge>,
    corners: Vec<Corner>,
}

impl GraphBuilder {
    fn new(sites: &[Point], width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            centers: sites
                .iter()
                .enumerate()
                .map(|(i, &p)| Center::new(CenterId::from(i), p))
                .collect(),
            edges: Vec::new(),
            corners: Vec::new(),
        }
    }

    /// Добавляет вершину, прижимая её к прямоугольнику карты.
    /// Вершина на границе (или прижатая к ней) помечается как `border`.
    fn add_corner(&mut self, (x, y): (f64, f64)) -> CornerId {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let cx = x.clamp(0.0, w);
        let cy = y.clamp(0.0, h);
        let id = CornerId::from(self.corners.len());
        let mut corner = Corner::new(id, Point::new(cx as f32, cy as f32));
        corner.border = cx <= 0.0 || cx >= w || cy <= 0.0 || cy >= h;
        self.corners.push(corner);
        id
    }

    /// Продолжает луч Вороного ребра оболочки `p–q` от `start` наружу
    /// (от третьей вершины треугольника `r`) до границы карты.
    fn project_to_border(
        &self,
        start: Point,
        p: (f64, f64),
        q: (f64, f64),
        r: (f64, f64),
    ) -> (f64, f64) {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let (sx, sy) = (f64::from(start.x), f64::from(start.y));

        let mut nx = q.1 - p.1;
        let mut ny = p.0 - q.0;
        if nx * (r.0 - p.0) + ny * (r.1 - p.1) > 0.0 {
            nx = -nx;
            ny = -ny;
        }

        let mut t = f64::INFINITY;
        if nx > 0.0 {
            t = t.min((w - sx) / nx);
        } else if nx < 0.0 {
            t = t.min(-sx / nx);
        }
        if ny > 0.0 {
            t = t.min((h - sy) / ny);
        } else if ny < 0.0 {
            t = t.min(-sy / ny);
        }
        if !t.is_finite() {
            return (sx, sy);
        }
        (sx + nx * t, sy + ny * t)
    }

    fn add_edge(&mut self, d0: CenterId, d1: CenterId, v0: CornerId, v1: CornerId) {
        let id = EdgeId::from(self.edges.len());
        let mut edge = Edge::new(id);
        edge.d0 = Some(d0);
        edge.d1 = Some(d1);
        edge.v0 = Some(v0);
        edge.v1 = Some(v1);
        edge.midpoint = self.corners[v0.index()]
            .point
            .lerp(self.corners[v1.index()].point, 0.5);
        self.edges.push(edge);

        // Полигоны и вершины указывают на рёбра
        self.centers[d0.index()].borders.push(id);
        self.centers[d1.index()].borders.push(id);
        self.corners[v0.index()].protrudes.push(id);
        self.corners[v1.index()].protrudes.push(id);

        // Полигоны указывают на полигоны, вершины на вершины
        push_unique(&mut self.centers[d0.index()].neighbors, d1);
        push_unique(&mut self.centers[d1.index()].neighbors, d0);
        push_unique(&mut self.corners[v0.index()].adjacent, v1);
        push_unique(&mut self.corners[v1.index()].adjacent, v0);

        // Полигоны указывают на вершины и наоборот
        for d in [d0, d1] {
            for v in [v0, v1] {
                push_unique(&mut self.centers[d.index()].corners, v);
                push_unique(&mut self.corners[v.index()].touches, d);
            }
        }
    }

    fn finish(mut self, config: &MapConfig) -> MapGraph {
        for center in &mut self.centers {
            if center
                .corners
                .iter()
                .any(|q| self.corners[q.index()].border)
            {
                center.border = true;
            }
        }
        MapGraph {
            width: self.width,
            height: self.height,
            config: config.clone(),
            centers: self.centers,
            edges: self.edges,
            corners: self.corners,
        }
    }
}
