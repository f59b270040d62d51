use tracing::debug;

use crate::error::Result;
use crate::math::{face_normal, Vector3, TOLERANCE};
use crate::surface::SkeletonSurface;
use crate::topology::TopologyStore;

/// Orders the ids of a candidate triangle so it winds with the surface.
///
/// The face normal `(p2 - p1) × (p3 - p2)` is compared with the average of
/// the reference normals at the three anchor vertices. If they disagree, the
/// second and third ids are swapped. The set of ids never changes.
///
/// A degenerate face or a missing normal field leaves the order as given.
///
/// # Errors
///
/// Returns an error if an id does not name a stored point.
pub fn check_normal<S>(store: &TopologyStore, surface: &S, ids: [usize; 3]) -> Result<[usize; 3]>
where
    S: SkeletonSurface + ?Sized,
{
    let [a, b, c] = ids;
    let (pa, pb, pc) = (store.point(a)?, store.point(b)?, store.point(c)?);

    let Some(face) = face_normal(&pa.pos, &pb.pos, &pc.pos) else {
        return Ok(ids);
    };

    let mut average = Vector3::zeros();
    for seq in [pa.seq, pb.seq, pc.seq] {
        match surface.vertex_normal(seq) {
            Some(n) => average += n,
            None => return Ok(ids),
        }
    }
    let len = average.norm();
    if len < TOLERANCE {
        return Ok(ids);
    }

    if face.dot(&(average / len)) < 0.0 {
        debug!(?ids, "triangle winding reversed to follow the surface");
        Ok([a, c, b])
    } else {
        Ok(ids)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Color, Point3};
    use crate::surface::ReferenceSurface;
    use crate::topology::{TagInfo, TagPoint, TagType};

    /// Flat square at z = 0 whose normals point along +z.
    fn surface() -> ReferenceSurface {
        ReferenceSurface::new(
            "plane",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            vec![1.0; 4],
        )
    }

    fn store(s: &ReferenceSurface) -> TopologyStore {
        let mut store = TopologyStore::new();
        let tag = store.add_tag_info(TagInfo::new("b", TagType::Branch, 1, Color::default()));
        for (i, v) in s.vertices().iter().enumerate() {
            store.add_point(TagPoint::new(*v, 1.0, 1, tag, i));
        }
        store
    }

    fn oriented_dot(store: &TopologyStore, surface: &ReferenceSurface, ids: [usize; 3]) -> f64 {
        let p = |i: usize| store.point(i).unwrap().pos;
        let face = face_normal(&p(ids[0]), &p(ids[1]), &p(ids[2])).unwrap();
        let avg: Vector3 = ids
            .iter()
            .map(|&i| surface.vertex_normal(store.point(i).unwrap().seq).unwrap())
            .sum();
        face.dot(&avg.normalize())
    }

    #[test]
    fn aligned_triangle_is_kept() {
        let s = surface();
        let store = store(&s);
        assert_eq!(check_normal(&store, &s, [0, 1, 2]).unwrap(), [0, 1, 2]);
    }

    #[test]
    fn opposed_triangle_is_swapped() {
        let s = surface();
        let store = store(&s);
        let ids = check_normal(&store, &s, [0, 2, 1]).unwrap();
        assert_eq!(ids, [0, 1, 2]);
        assert!(oriented_dot(&store, &s, ids) >= 0.0);
    }

    #[test]
    fn result_is_a_permutation_facing_the_surface() {
        let s = surface();
        let store = store(&s);
        for ids in [[0, 1, 3], [3, 1, 0], [2, 3, 1], [1, 0, 2]] {
            let out = check_normal(&store, &s, ids).unwrap();
            let (mut a, mut b) = (ids, out);
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
            assert!(oriented_dot(&store, &s, out) >= 0.0);
        }
    }
}
