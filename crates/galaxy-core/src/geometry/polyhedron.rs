//! Base solids for crystal bodies: a flat octahedron for the lowest tier and
//! a subdivided icosahedron for everything else. All vertices sit on the
//! unit sphere so deformation passes can treat position as direction.

use fnv::FnvHashMap;
use glam::Vec3;

/// Octahedron: 6 vertices, 8 faces.
pub fn octahedron() -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let vertices = vec![
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, -1.0),
    ];
    let faces = vec![
        [0, 2, 4],
        [2, 1, 4],
        [1, 3, 4],
        [3, 0, 4],
        [2, 0, 5],
        [1, 2, 5],
        [3, 1, 5],
        [0, 3, 5],
    ];
    (vertices, faces)
}

/// Icosahedron: 12 vertices, 20 faces, normalized to the unit sphere.
pub fn icosahedron() -> (Vec<Vec3>, Vec<[u32; 3]>) {
    // Golden-ratio construction.
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let raw = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ];
    let vertices = raw
        .iter()
        .map(|&(x, y, z)| Vec3::new(x, y, z).normalize())
        .collect();
    let faces = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    (vertices, faces)
}

/// Midpoint subdivision with shared-edge deduplication; new vertices are
/// projected back onto the unit sphere. Each level quadruples the face
/// count (vertex counts 12, 42, 162, 642, ...).
pub fn subdivide(
    vertices: &mut Vec<Vec3>,
    faces: &mut Vec<[u32; 3]>,
    levels: u32,
) {
    for _ in 0..levels {
        let mut midpoints: FnvHashMap<(u32, u32), u32> = FnvHashMap::default();
        let mut next_faces = Vec::with_capacity(faces.len() * 4);
        for face in faces.iter() {
            let [a, b, c] = *face;
            let ab = midpoint(vertices, &mut midpoints, a, b);
            let bc = midpoint(vertices, &mut midpoints, b, c);
            let ca = midpoint(vertices, &mut midpoints, c, a);
            next_faces.push([a, ab, ca]);
            next_faces.push([b, bc, ab]);
            next_faces.push([c, ca, bc]);
            next_faces.push([ab, bc, ca]);
        }
        *faces = next_faces;
    }
}

fn midpoint(
    vertices: &mut Vec<Vec3>,
    cache: &mut FnvHashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&idx) = cache.get(&key) {
        return idx;
    }
    let mid = ((vertices[a as usize] + vertices[b as usize]) * 0.5).normalize();
    let idx = vertices.len() as u32;
    vertices.push(mid);
    cache.insert(key, idx);
    idx
}
