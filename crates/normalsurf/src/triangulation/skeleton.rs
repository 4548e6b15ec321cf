//! Skeleton: edges, vertices, triangles and boundary components.
//!
//! Built lazily from the gluings and cached until the next mutation.
//! Orientation convention: two glued tetrahedra are consistently oriented
//! iff their orientation signs differ by `-sign(gluing)`.

use super::types::{Tetrahedron, Triangulation};
use crate::dsu::ParityDsu;
use crate::perm::Perm4;
use crate::tables::{edge_number, face_vertices, EDGE_VERTEX};

/// Where an edge sits in a tetrahedron: `perm[0], perm[1]` are its endpoints.
/// Walking to the next embedding crosses face `perm[3]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEmbedding {
    pub tet: usize,
    pub perm: Perm4,
}

impl EdgeEmbedding {
    pub fn edge(&self) -> usize {
        edge_number(self.perm.apply(0), self.perm.apply(1))
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    /// In walking order; for a boundary edge, from one boundary end to the other.
    pub embeddings: Vec<EdgeEmbedding>,
    pub boundary: bool,
    /// False if the edge is identified with itself in reverse.
    pub valid: bool,
}

impl Edge {
    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexEmbedding {
    pub tet: usize,
    pub vertex: usize,
}

/// Topological type of a vertex link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexLink {
    Sphere,
    Disc,
    /// Closed link other than a sphere (a cusp).
    Ideal,
    /// Bounded link other than a disc.
    Invalid,
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub embeddings: Vec<VertexEmbedding>,
    pub link: VertexLink,
    pub link_euler: i64,
    pub link_orientable: bool,
}

impl Vertex {
    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_ideal(&self) -> bool {
        self.link == VertexLink::Ideal
    }

    pub fn is_valid(&self) -> bool {
        self.link != VertexLink::Invalid
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self.link, VertexLink::Disc | VertexLink::Invalid)
    }
}

/// `perm[3]` is the face number in `tet`; `perm[0..3]` its vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriangleEmbedding {
    pub tet: usize,
    pub perm: Perm4,
}

impl TriangleEmbedding {
    pub fn face(&self) -> usize {
        self.perm.apply(3)
    }
}

#[derive(Clone, Debug)]
pub struct Triangle {
    pub embeddings: Vec<TriangleEmbedding>,
}

impl Triangle {
    pub fn is_boundary(&self) -> bool {
        self.embeddings.len() == 1
    }

    pub fn front(&self) -> TriangleEmbedding {
        self.embeddings[0]
    }
}

/// A real boundary surface (made of boundary triangles) or an ideal vertex.
#[derive(Clone, Debug)]
pub struct BoundaryComponent {
    pub triangles: Vec<usize>,
    pub edges: Vec<usize>,
    pub vertices: Vec<usize>,
    pub ideal_vertex: Option<usize>,
    pub euler: i64,
}

impl BoundaryComponent {
    pub fn is_ideal(&self) -> bool {
        self.ideal_vertex.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    pub(crate) edges: Vec<Edge>,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) boundary: Vec<BoundaryComponent>,
    pub(crate) tet_edge: Vec<[usize; 6]>,
    pub(crate) tet_vertex: Vec<[usize; 4]>,
    pub(crate) tet_triangle: Vec<[usize; 4]>,
    pub(crate) component: Vec<usize>,
    pub(crate) n_components: usize,
    /// +1 / -1 per tetrahedron; consistent iff `orientable`.
    pub(crate) orientation: Vec<i8>,
    pub(crate) orientable: bool,
}

const UNSET: usize = usize::MAX;

impl Skeleton {
    pub(crate) fn build(tets: &[Tetrahedron]) -> Skeleton {
        let n = tets.len();
        let mut sk = Skeleton {
            tet_edge: vec![[UNSET; 6]; n],
            tet_vertex: vec![[UNSET; 4]; n],
            tet_triangle: vec![[UNSET; 4]; n],
            ..Skeleton::default()
        };
        sk.build_components(tets);
        sk.build_triangles(tets);
        sk.build_edges(tets);
        sk.build_vertices(tets);
        sk.build_boundary();
        sk
    }

    fn build_components(&mut self, tets: &[Tetrahedron]) {
        let n = tets.len();
        let mut dsu = ParityDsu::new(n);
        for (t, tet) in tets.iter().enumerate() {
            for &(u, g) in tet.adj.iter().flatten() {
                dsu.union(t, u, g.is_even());
            }
        }
        self.orientable = !dsu.conflict;
        self.orientation = (0..n).map(|t| if dsu.find(t).1 { -1 } else { 1 }).collect();
        let (labels, k) = dsu.labels();
        self.component = labels;
        self.n_components = k;
    }

    fn build_triangles(&mut self, tets: &[Tetrahedron]) {
        for t in 0..tets.len() {
            for f in 0..4 {
                if self.tet_triangle[t][f] != UNSET {
                    continue;
                }
                let fv = face_vertices(f);
                let p = Perm4::new(fv[0] as u8, fv[1] as u8, fv[2] as u8, f as u8);
                let idx = self.triangles.len();
                let mut embeddings = vec![TriangleEmbedding { tet: t, perm: p }];
                self.tet_triangle[t][f] = idx;
                if let Some((u, g)) = tets[t].adj[f] {
                    let q = g * p;
                    embeddings.push(TriangleEmbedding { tet: u, perm: q });
                    self.tet_triangle[u][q.apply(3)] = idx;
                }
                self.triangles.push(Triangle { embeddings });
            }
        }
    }

    fn build_edges(&mut self, tets: &[Tetrahedron]) {
        let n = tets.len();
        let swap23 = Perm4::transposition(2, 3);
        let limit = 12 * n + 12;
        for t in 0..n {
            for e in 0..6 {
                if self.tet_edge[t][e] != UNSET {
                    continue;
                }
                let [a, b] = EDGE_VERTEX[e];
                let [c, d] = EDGE_VERTEX[5 - e];
                let p0 = Perm4::new(a as u8, b as u8, c as u8, d as u8);

                // Walk backwards (across face perm[2]) to a boundary end, if any.
                let mut start = EdgeEmbedding { tet: t, perm: p0 };
                let mut cur = start;
                let mut boundary = false;
                for _ in 0..limit {
                    match tets[cur.tet].adj[cur.perm.apply(2)] {
                        None => {
                            boundary = true;
                            break;
                        }
                        Some((u, g)) => {
                            let next = EdgeEmbedding { tet: u, perm: g * cur.perm * swap23 };
                            if u == t && next.edge() == e {
                                break;
                            }
                            cur = next;
                        }
                    }
                }
                if boundary {
                    start = cur;
                }

                let idx = self.edges.len();
                let mut embeddings = vec![start];
                let mut valid = true;
                self.tet_edge[start.tet][start.edge()] = idx;
                let mut cur = start;
                for _ in 0..limit {
                    let Some((u, g)) = tets[cur.tet].adj[cur.perm.apply(3)] else {
                        break;
                    };
                    let next = EdgeEmbedding { tet: u, perm: g * cur.perm * swap23 };
                    let ne = next.edge();
                    if u == start.tet && ne == start.edge() {
                        if next.perm.apply(0) != start.perm.apply(0) {
                            valid = false;
                        }
                        break;
                    }
                    if self.tet_edge[u][ne] == idx {
                        valid = false;
                        break;
                    }
                    self.tet_edge[u][ne] = idx;
                    embeddings.push(next);
                    cur = next;
                }
                self.edges.push(Edge {
                    embeddings,
                    boundary,
                    valid,
                });
            }
        }
    }

    fn build_vertices(&mut self, tets: &[Tetrahedron]) {
        let n = tets.len();
        // Corners (t, v) are the triangles of the vertex links.
        let mut dsu = ParityDsu::new(4 * n);
        let mut bdry_sides = vec![0i64; 4 * n];
        // Corners at which some union closed an odd cycle.
        let mut twisted = Vec::new();
        for (t, tet) in tets.iter().enumerate() {
            for f in 0..4 {
                match tet.adj[f] {
                    Some((u, g)) => {
                        for v in (0..4).filter(|&v| v != f) {
                            let before = std::mem::replace(&mut dsu.conflict, false);
                            dsu.union(4 * t + v, 4 * u + g.apply(v), g.is_even());
                            if dsu.conflict {
                                twisted.push(4 * t + v);
                            }
                            dsu.conflict |= before;
                        }
                    }
                    None => {
                        for v in (0..4).filter(|&v| v != f) {
                            bdry_sides[4 * t + v] += 1;
                        }
                    }
                }
            }
        }
        let (labels, k) = dsu.labels();
        let mut embeddings = vec![Vec::new(); k];
        for t in 0..n {
            for v in 0..4 {
                let id = labels[4 * t + v];
                self.tet_vertex[t][v] = id;
                embeddings[id].push(VertexEmbedding { tet: t, vertex: v });
            }
        }

        // Link Euler characteristic: V - E + F with E = (3F + B) / 2.
        let mut link_v = vec![0i64; k];
        for edge in &self.edges {
            let emb = edge.embeddings[0];
            let v0 = self.tet_vertex[emb.tet][emb.perm.apply(0)];
            let v1 = self.tet_vertex[emb.tet][emb.perm.apply(1)];
            link_v[v0] += 1;
            if edge.valid {
                link_v[v1] += 1;
            }
        }
        let mut link_f = vec![0i64; k];
        let mut link_b = vec![0i64; k];
        let mut link_orientable = vec![true; k];
        for c in 0..4 * n {
            let id = labels[c];
            link_f[id] += 1;
            link_b[id] += bdry_sides[c];
        }
        for c in twisted {
            link_orientable[labels[c]] = false;
        }

        self.vertices = (0..k)
            .map(|id| {
                let euler = link_v[id] - (3 * link_f[id] + link_b[id]) / 2 + link_f[id];
                let link = match (link_b[id] == 0, euler) {
                    (true, 2) => VertexLink::Sphere,
                    (true, _) => VertexLink::Ideal,
                    (false, 1) => VertexLink::Disc,
                    (false, _) => VertexLink::Invalid,
                };
                Vertex {
                    embeddings: std::mem::take(&mut embeddings[id]),
                    link,
                    link_euler: euler,
                    link_orientable: link_orientable[id],
                }
            })
            .collect();
    }

    fn build_boundary(&mut self) {
        let bdry_tris: Vec<usize> =
            (0..self.triangles.len()).filter(|&i| self.triangles[i].is_boundary()).collect();
        let mut pos = vec![UNSET; self.triangles.len()];
        for (k, &i) in bdry_tris.iter().enumerate() {
            pos[i] = k;
        }
        let mut dsu = ParityDsu::new(bdry_tris.len());
        let mut first_on_edge = vec![UNSET; self.edges.len()];
        for (k, &i) in bdry_tris.iter().enumerate() {
            for e in self.triangle_edges(i) {
                if first_on_edge[e] == UNSET {
                    first_on_edge[e] = k;
                } else {
                    dsu.union(first_on_edge[e], k, false);
                }
            }
        }
        let (labels, nc) = dsu.labels();
        let mut comps: Vec<BoundaryComponent> = (0..nc)
            .map(|_| BoundaryComponent {
                triangles: Vec::new(),
                edges: Vec::new(),
                vertices: Vec::new(),
                ideal_vertex: None,
                euler: 0,
            })
            .collect();
        for (k, &i) in bdry_tris.iter().enumerate() {
            let c = &mut comps[labels[k]];
            c.triangles.push(i);
        }
        for c in comps.iter_mut() {
            let mut edges = Vec::new();
            let mut verts = Vec::new();
            for &i in &c.triangles {
                edges.extend(self.triangle_edges(i));
                let emb = self.triangles[i].front();
                for j in 0..3 {
                    verts.push(self.tet_vertex[emb.tet][emb.perm.apply(j)]);
                }
            }
            edges.sort_unstable();
            edges.dedup();
            verts.sort_unstable();
            verts.dedup();
            c.euler = verts.len() as i64 - edges.len() as i64 + c.triangles.len() as i64;
            c.edges = edges;
            c.vertices = verts;
        }
        for (v, vert) in self.vertices.iter().enumerate() {
            if vert.is_ideal() {
                comps.push(BoundaryComponent {
                    triangles: Vec::new(),
                    edges: Vec::new(),
                    vertices: vec![v],
                    ideal_vertex: Some(v),
                    euler: vert.link_euler,
                });
            }
        }
        self.boundary = comps;
    }

    pub(crate) fn triangle_edges(&self, tri: usize) -> [usize; 3] {
        let emb = self.triangles[tri].front();
        let p = emb.perm;
        [
            self.tet_edge[emb.tet][edge_number(p.apply(1), p.apply(2))],
            self.tet_edge[emb.tet][edge_number(p.apply(0), p.apply(2))],
            self.tet_edge[emb.tet][edge_number(p.apply(0), p.apply(1))],
        ]
    }
}

/// Skeletal queries.
impl Triangulation {
    pub fn edges(&self) -> &[Edge] {
        &self.skeleton().edges
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.skeleton().vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.skeleton().triangles
    }

    pub fn boundary_components(&self) -> &[BoundaryComponent] {
        &self.skeleton().boundary
    }

    pub fn count_edges(&self) -> usize {
        self.edges().len()
    }

    pub fn count_vertices(&self) -> usize {
        self.vertices().len()
    }

    pub fn count_triangles(&self) -> usize {
        self.triangles().len()
    }

    pub fn count_boundary_components(&self) -> usize {
        self.boundary_components().len()
    }

    pub fn count_components(&self) -> usize {
        self.skeleton().n_components
    }

    /// Edge index of local edge `e` of `tet`.
    pub fn tet_edge(&self, tet: usize, e: usize) -> usize {
        self.skeleton().tet_edge[tet][e]
    }

    pub fn tet_vertex(&self, tet: usize, v: usize) -> usize {
        self.skeleton().tet_vertex[tet][v]
    }

    pub fn tet_triangle(&self, tet: usize, f: usize) -> usize {
        self.skeleton().tet_triangle[tet][f]
    }

    /// Component index of each tetrahedron.
    pub fn tet_component(&self, tet: usize) -> usize {
        self.skeleton().component[tet]
    }

    /// +1 or -1; consistent across gluings iff the triangulation is orientable.
    pub fn tet_orientation(&self, tet: usize) -> i8 {
        self.skeleton().orientation[tet]
    }

    pub fn is_valid(&self) -> bool {
        let sk = self.skeleton();
        sk.edges.iter().all(|e| e.valid) && sk.vertices.iter().all(Vertex::is_valid)
    }

    pub fn is_ideal(&self) -> bool {
        self.vertices().iter().any(Vertex::is_ideal)
    }

    pub fn has_boundary_triangles(&self) -> bool {
        self.triangles().iter().any(Triangle::is_boundary)
    }

    /// No real boundary and no ideal vertices.
    pub fn is_closed(&self) -> bool {
        self.boundary_components().is_empty()
    }

    pub fn is_orientable(&self) -> bool {
        self.skeleton().orientable
    }

    /// Whether the tetrahedron vertex labels already realise an orientation.
    pub fn is_oriented(&self) -> bool {
        self.is_orientable() && self.skeleton().orientation.iter().all(|&o| o == 1)
    }

    pub fn is_connected(&self) -> bool {
        self.count_components() <= 1
    }

    /// V - E + F - T of the cell complex (ideal vertices counted as points).
    pub fn euler_char_tri(&self) -> i64 {
        self.count_vertices() as i64 - self.count_edges() as i64 + self.count_triangles() as i64
            - self.size() as i64
    }

    /// Split into connected components, each with tetrahedra in original order.
    pub fn triangulate_components(&self) -> Vec<Triangulation> {
        let k = self.count_components();
        let mut local = vec![0usize; self.size()];
        let mut counts = vec![0usize; k];
        for t in 0..self.size() {
            let c = self.tet_component(t);
            local[t] = counts[c];
            counts[c] += 1;
        }
        let mut out: Vec<Triangulation> =
            counts.iter().map(|&m| Triangulation::with_size(m)).collect();
        for t in 0..self.size() {
            let c = self.tet_component(t);
            for f in 0..4 {
                if let Some((u, g)) = self.adjacent(t, f) {
                    // Glue each pair once, from the smaller (tet, face).
                    if (u, g.apply(f)) < (t, f) {
                        continue;
                    }
                    // Components are closed under gluing, so this cannot fail.
                    let _ = out[c].join(local[t], f, local[u], g);
                }
            }
        }
        out
    }
}
