// crates/pf_physics/tests/numerics_tests.rs

//! 梯度与残差组装集成测试

use pf_foundation::PfError;
use pf_mesh::{BoundaryCondition, Cell, Face, LineMeshGenerator, Mesh, Point, RectMeshGenerator, Vector};
use pf_physics::boundary::ExtrapolatedBc;
use pf_physics::equations::LinearTransport;
use pf_physics::initializer::{initialize_cells, FunctionInitializer, LinearFunction};
use pf_physics::numerics::{
    CellGradientCalculator, ConvectionResidual, DiffusionResidual, FaceBasedNeighbors,
    LeastSquaresGradient, ParallelPolicy, SpaceDiscretization,
};
use std::sync::Arc;

/// 幽灵单元取线性场在其形心处的值
struct LinearFieldBc {
    fields: Vec<LinearFunction>,
}

impl BoundaryCondition for LinearFieldBc {
    fn name(&self) -> &'static str {
        "linear-field"
    }

    fn set_ghost_cell_values(&self, face: &mut Face, inside: &Cell, ghost: &mut Cell) {
        let c = ghost.centroid();
        for (k, f) in self.fields.iter().enumerate() {
            ghost.u[k] = f.value_at(&c);
            face.u[k] = 0.5 * (ghost.u[k] + inside.u[k]);
        }
    }
}

fn linear_fields() -> Vec<LinearFunction> {
    vec![
        LinearFunction::new(Point::new(0.1, 0.2, 0.0), 1.0, Vector::new(2.0, -3.0, 0.0)),
        LinearFunction::new(Point::ORIGIN, -4.0, Vector::new(0.5, 0.25, 0.0)),
    ]
}

fn linear_mesh(triangles: bool) -> Mesh {
    let mut generator = RectMeshGenerator::new(6, 5, 1.2, 1.0).with_origin(0.3, -0.2);
    if triangles {
        generator = generator.with_triangles();
    }
    let mut mesh = generator.build(2).unwrap();
    let fields = linear_fields();
    initialize_cells(&mut mesh, &fields).unwrap();
    mesh.set_all_boundary_conditions(Arc::new(LinearFieldBc { fields }));
    SpaceDiscretization::new(Vec::new())
        .apply_boundary_conditions(&mut mesh)
        .unwrap();
    mesh
}

#[test]
fn test_gradient_exact_for_linear_field() {
    for triangles in [false, true] {
        let mesh = linear_mesh(triangles);
        let gradient = LeastSquaresGradient::new(&mesh, &FaceBasedNeighbors).unwrap();
        let grads = gradient.gradients(&mesh);
        assert_eq!(grads.len(), mesh.n_cells());

        let fields = linear_fields();
        for cell in mesh.cells() {
            for (k, f) in fields.iter().enumerate() {
                let g = grads.cell(cell.index())[k];
                assert!(
                    (g - f.gradient()).length() < 1e-10,
                    "单元 {} 变量 {}: {:?}",
                    cell.index(),
                    k,
                    g
                );
            }
        }
    }
}

#[test]
fn test_linear_field_steady_under_diffusion() {
    let mut mesh = linear_mesh(true);
    let eq = Arc::new(LinearTransport::diffusion(vec![0.7, 1.3]));
    let gradient = Arc::new(LeastSquaresGradient::new(&mesh, &FaceBasedNeighbors).unwrap());
    let mut space = SpaceDiscretization::new(vec![Box::new(
        DiffusionResidual::new(eq).with_gradient(gradient),
    )]);
    space.set_residuals(&mut mesh).unwrap();

    for cell in mesh.cells() {
        for r in &cell.residual {
            assert!(r.abs() < 1e-10, "单元 {} 残差 {}", cell.index(), r);
        }
    }
}

#[test]
fn test_parallel_matches_serial() {
    let build = |policy: ParallelPolicy| {
        let mut mesh = RectMeshGenerator::new(12, 10, 1.0, 1.0)
            .with_triangles()
            .build(1)
            .unwrap();
        let init = FunctionInitializer::new(|p: &Point| vec![(3.0 * p.x).sin() * (2.0 * p.y).cos()]);
        initialize_cells(&mut mesh, &init).unwrap();
        mesh.set_all_boundary_conditions(Arc::new(ExtrapolatedBc));

        let eq = Arc::new(
            LinearTransport::new(1, Vector::new(1.0, -0.5, 0.0)).with_diffusivity(vec![0.1]),
        );
        let gradient: Arc<dyn CellGradientCalculator> = Arc::new(
            LeastSquaresGradient::with_policy(&mesh, &FaceBasedNeighbors, policy).unwrap(),
        );
        let mut space = SpaceDiscretization::new(vec![
            Box::new(
                ConvectionResidual::new(eq.clone())
                    .with_reconstruction(gradient.clone())
                    .with_policy(policy),
            ),
            Box::new(
                DiffusionResidual::new(eq)
                    .with_gradient(gradient)
                    .with_policy(policy),
            ),
        ])
        .with_policy(policy);
        space.set_residuals(&mut mesh).unwrap();
        mesh.cells().iter().map(|c| c.residual[0]).collect::<Vec<_>>()
    };

    let serial = build(ParallelPolicy::serial());
    let parallel = build(ParallelPolicy::new(1));
    assert_eq!(serial, parallel);
}

#[test]
fn test_interior_fluxes_cancel() {
    // 两点扩散 + 零梯度边界：边界通量为零，残差总和为零
    let mut mesh = RectMeshGenerator::new(8, 8, 1.0, 1.0)
        .with_triangles()
        .build(1)
        .unwrap();
    let init = FunctionInitializer::new(|p: &Point| vec![p.x * p.x + 3.0 * p.y]);
    initialize_cells(&mut mesh, &init).unwrap();
    mesh.set_all_boundary_conditions(Arc::new(ExtrapolatedBc));

    let eq = Arc::new(LinearTransport::diffusion(vec![1.0]));
    let mut space = SpaceDiscretization::new(vec![Box::new(DiffusionResidual::new(eq))]);
    space.set_residuals(&mut mesh).unwrap();

    let total: f64 = mesh.cells().iter().map(|c| c.residual[0]).sum();
    let scale: f64 = mesh.cells().iter().map(|c| c.residual[0].abs()).sum();
    assert!(scale > 0.0);
    assert!(total.abs() < 1e-12 * scale.max(1.0));
}

#[test]
fn test_line_mesh_gradient_is_singular() {
    let mesh = LineMeshGenerator::new(5, 0.0, 1.0).build(1).unwrap();
    let err = LeastSquaresGradient::new(&mesh, &FaceBasedNeighbors).unwrap_err();
    assert!(matches!(err, PfError::SingularStencil { .. }));
    assert!(err.is_setup_error());
}

#[test]
fn test_missing_bc_aborts_residuals() {
    let mut mesh = LineMeshGenerator::new(3, 0.0, 1.0).build(1).unwrap();
    mesh.set_boundary_condition("left", Arc::new(ExtrapolatedBc)).unwrap();
    let eq = Arc::new(LinearTransport::diffusion(vec![1.0]));
    let mut space = SpaceDiscretization::new(vec![Box::new(DiffusionResidual::new(eq))]);

    let err = space.set_residuals(&mut mesh).unwrap_err();
    assert!(matches!(
        err,
        PfError::MissingBoundaryCondition { ref boundary } if boundary == "right"
    ));
}
