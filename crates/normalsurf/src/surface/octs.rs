use super::{NormalSurface, WIDE};
use crate::encoding::NormalCoords;
use crate::int::ExactInt;
use crate::perm::Perm4;
use crate::tables::EDGE_VERTEX;
use crate::Result;

impl NormalSurface {
    /// The same surface as a normal surface in a retriangulation.
    ///
    /// Each tetrahedron holding octagons of type `k` is split into three:
    /// the two new ones sit at edges `5-k` and `k`, and the octagons become
    /// quads of type `k` in the middle one plus triangles in the outer two.
    /// The result is stored in standard coordinates. A surface with no
    /// octagons keeps its triangulation.
    pub fn remove_octs(&self) -> Result<NormalSurface> {
        if self.oct_position().is_none() {
            return self.reencoded(self.encoding().without_octagons());
        }
        let wide = self.compact_counts("removing octagons")?;
        let mut tri = self.triangulation().clone();
        let n = tri.size();
        let mut vec: Vec<ExactInt> = Vec::with_capacity(7 * (n + 2));
        for block in wide.chunks(WIDE) {
            vec.extend_from_slice(&block[..7]);
        }

        for b in 0..n {
            let block = &wide[WIDE * b..WIDE * (b + 1)];
            let Some(k) = (0..3).find(|&k| !block[7 + k].is_zero()) else {
                continue;
            };
            let count = block[7 + k].clone();
            let a = tri.new_tetrahedron();
            let c = tri.new_tetrahedron();
            vec.extend(std::iter::repeat(ExactInt::ZERO).take(14));
            let a_ext = EDGE_VERTEX[5 - k];
            let c_ext = EDGE_VERTEX[k];

            // Faces a_ext of b move to a, faces c_ext to c.
            for (outer, other, ext) in [(a, c, a_ext), (c, a, c_ext)] {
                for j in 0..2 {
                    let face = ext[j];
                    let Some((adj, g)) = tri.unjoin(b, face) else {
                        continue;
                    };
                    let dest = if adj != b {
                        adj
                    } else if g.apply(face) == ext[j ^ 1] {
                        outer
                    } else {
                        other
                    };
                    tri.join(outer, face, dest, g)?;
                }
            }
            let swap = Perm4::transposition(a_ext[0], a_ext[1]);
            for f in c_ext {
                tri.join(b, f, a, swap)?;
            }
            for f in a_ext {
                tri.join(b, f, c, swap)?;
            }

            let tris: Vec<ExactInt> = block[..4].to_vec();
            for v in 0..4 {
                vec[7 * a + v] = tris[v].clone();
                vec[7 * c + v] = tris[v].clone();
            }
            vec.swap(7 * b + a_ext[0], 7 * b + a_ext[1]);
            vec[7 * b + 4 + k] += &count;
            for v in c_ext {
                vec[7 * a + v] += &count;
            }
            for v in a_ext {
                vec[7 * c + v] += &count;
            }
            tracing::trace!(tet = b, oct = k, "split octagonal tetrahedron");
        }
        let normal = NormalSurface::from_coords(&tri, NormalCoords::Standard, vec)?;
        Ok(normal.with_name(self.name().to_owned()))
    }
}
