// crates/pf_mesh/tests/mesh_tests.rs

//! 网格拓扑集成测试

use pf_foundation::{CellIndex, FaceIndex, NodeIndex};
use pf_mesh::ghost::signed_distance;
use pf_mesh::{LineMeshGenerator, Mesh, Point, RectMeshGenerator};

fn check_ghost_closure(mesh: &Mesh) {
    assert_eq!(mesh.n_ghost_cells(), mesh.n_boundary_faces());
    for (k, face) in mesh.boundary_faces().iter().enumerate() {
        let (inside, ghost) = mesh.face_cells(face);
        assert_eq!(ghost.index(), CellIndex::new(mesh.n_cells() + k));
        assert!(ghost.is_ghost());
        assert!(!inside.is_ghost());
        assert_eq!(ghost.kind(), inside.kind());
        assert_eq!(ghost.num_vars(), inside.num_vars());
        assert!((ghost.volume() - inside.volume()).abs() < 1e-14);

        let d_in = signed_distance(face.surface(), inside.centroid());
        let d_gh = signed_distance(face.surface(), ghost.centroid());
        assert!(d_in < 0.0, "内侧形心应在法向负侧");
        assert!((d_in + d_gh).abs() < 1e-12);

        // 面上节点共享
        for &n in face.nodes() {
            assert!(ghost.nodes().contains(&n));
        }
        // 镜像节点位于真实节点范围之外，且到面平面的距离取反
        for (&gn, &cn) in ghost.nodes().iter().zip(inside.nodes()) {
            if gn != cn {
                assert!(gn.get() >= mesh.n_nodes());
                let d0 = signed_distance(face.surface(), mesh.node_location(cn));
                let d1 = signed_distance(face.surface(), mesh.node_location(gn));
                assert!((d0 + d1).abs() < 1e-12);
            }
        }
    }
}

#[test]
fn ghost_closure_on_line_mesh() {
    let mesh = LineMeshGenerator::new(4, -1.0, 1.0).build(3).unwrap();
    check_ghost_closure(&mesh);
    // 1D 面只有一个节点，镜像后另一个节点落在域外
    let ghost = &mesh.ghost_cells()[0];
    assert!((ghost.centroid().x - (-1.25)).abs() < 1e-12);
}

#[test]
fn ghost_closure_on_quad_mesh() {
    let mesh = RectMeshGenerator::new(3, 4, 1.0, 2.0).build(1).unwrap();
    check_ghost_closure(&mesh);
}

#[test]
fn ghost_closure_on_triangle_mesh() {
    let mesh = RectMeshGenerator::new(3, 3, 3.0, 3.0)
        .with_triangles()
        .build(2)
        .unwrap();
    check_ghost_closure(&mesh);
}

#[test]
fn interior_faces_link_distinct_real_cells() {
    let mesh = RectMeshGenerator::new(4, 4, 1.0, 1.0)
        .with_triangles()
        .build(1)
        .unwrap();
    for face in mesh.interior_faces() {
        assert_ne!(face.left(), face.right());
        assert!(!mesh.is_ghost(face.left()));
        assert!(!mesh.is_ghost(face.right()));
        let to_right = mesh
            .cell(face.left())
            .centroid()
            .vector_to(&mesh.cell(face.right()).centroid());
        assert!(face.surface().unit_normal().dot(to_right) > 0.0);
    }
}

#[test]
fn cell_face_lists_are_consistent() {
    let mesh = RectMeshGenerator::new(2, 3, 2.0, 3.0).build(1).unwrap();
    for cell in mesh.cells() {
        for &f in cell.faces() {
            let face = mesh.face(f);
            assert!(face.left() == cell.index() || face.right() == cell.index());
        }
    }
    let total_refs: usize = mesh.cells().iter().map(|c| c.faces().len()).sum();
    assert_eq!(total_refs, 2 * mesh.n_interior_faces() + mesh.n_boundary_faces());
}

#[test]
fn lookup_helpers() {
    let mesh = LineMeshGenerator::new(2, 0.0, 2.0).build(1).unwrap();
    assert!(mesh.try_cell(CellIndex::new(3)).is_ok());
    assert!(mesh.try_cell(CellIndex::new(4)).is_err());
    assert_eq!(mesh.ghost_of(FaceIndex::new(2)), Some(CellIndex::new(3)));
    assert_eq!(mesh.node_location(NodeIndex::new(1)), Point::new(1.0, 0.0, 0.0));
    assert!(mesh.boundary_by_name("top").is_none());
}
