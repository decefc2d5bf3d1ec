use approx::assert_relative_eq;
use crbeam::corotational::{compose, incremental_quaternion};
use crbeam::elements::ElementConstants;
use crbeam::math::{Mat12, Vec12, Vec3};
use crbeam::prelude::*;
use nalgebra::{Rotation3, Unit};

fn props() -> Properties {
    Properties::from_parts(&Material::steel(), &Section::rectangular(0.1, 0.2))
}

fn nodes_along(chord: [f64; 3]) -> [Node; 2] {
    [
        Node::new(0.0, 0.0, 0.0),
        Node::new(chord[0], chord[1], chord[2]),
    ]
}

fn initialized(nodes: &[Node; 2]) -> CrBeam3D2N {
    let mut beam = CrBeam3D2N::new(0, [0, 1], props());
    beam.check([&nodes[0], &nodes[1]]).unwrap();
    beam.initialize([&nodes[0], &nodes[1]]).unwrap();
    beam
}

fn set_values(nodes: &mut [Node; 2], values: &Vec12) {
    for (i, node) in nodes.iter_mut().enumerate() {
        let mut displacement = [0.0; 6];
        displacement.copy_from_slice(&values.as_slice()[i * 6..i * 6 + 6]);
        node.set_displacement(displacement);
    }
}

fn max_entry(m: &Mat12) -> f64 {
    m.amax()
}

#[test]
fn test_rigid_rotation_produces_no_strain() {
    let chord = [1.0, 0.5, 0.3];
    let mut nodes = nodes_along(chord);
    let mut beam = initialized(&nodes);
    let initial_triad = beam.initial_triad().unwrap();

    let axis = Unit::new_normalize(Vec3::new(1.0, 2.0, 3.0));
    let angle = 0.8;
    let rotation = Rotation3::from_axis_angle(&axis, angle);

    // rotation DOFs whose incremental quaternion is exactly this rotation
    let phi = axis.into_inner() * (2.0 * (angle / 2.0).sin());
    let x_b = Vec3::new(chord[0], chord[1], chord[2]);
    let u_b = rotation * x_b - x_b;

    let mut values = Vec12::zeros();
    values.fixed_rows_mut::<3>(3).copy_from(&phi);
    values.fixed_rows_mut::<3>(6).copy_from(&u_b);
    values.fixed_rows_mut::<3>(9).copy_from(&phi);
    set_values(&mut nodes, &values);

    let system = beam.compute_local_system([&nodes[0], &nodes[1]]).unwrap();

    assert!(beam.deformation_modes().max_abs() < 1e-10);
    assert!(system.residual.amax() < 1e-3);
    assert_relative_eq!(
        beam.current_triad().unwrap(),
        rotation.matrix() * initial_triad,
        epsilon = 1e-10
    );
    assert_relative_eq!(beam.current_length(), beam.reference_length(), epsilon = 1e-12);
}

#[test]
fn test_small_displacements_reduce_to_linear_stiffness() {
    let mut nodes = nodes_along([2.0, 0.0, 0.0]);
    let mut beam = initialized(&nodes);

    let k0 = beam
        .compute_local_system([&nodes[0], &nodes[1]])
        .unwrap()
        .tangent;

    let delta = Vec12::from_column_slice(&[
        1e-8, -2e-8, 0.5e-8, 1e-8, -1e-8, 2e-8, //
        -1e-8, 3e-8, -2e-8, 0.5e-8, 2e-8, -1e-8,
    ]);
    set_values(&mut nodes, &delta);
    let residual = beam
        .compute_local_system([&nodes[0], &nodes[1]])
        .unwrap()
        .residual;

    let linear = -(k0 * delta);
    assert!((residual - linear).norm() < 1e-5 * linear.norm());
}

#[test]
fn test_tangent_is_symmetric_in_bent_state() {
    let mut nodes = nodes_along([2.0, 0.0, 0.0]);
    let mut beam = initialized(&nodes);

    let mut values = Vec12::zeros();
    values[7] = 0.05;
    values[11] = 0.04;
    values[10] = -0.02;
    set_values(&mut nodes, &values);

    let tangent = beam
        .compute_local_system([&nodes[0], &nodes[1]])
        .unwrap()
        .tangent;
    let scale = max_entry(&tangent);
    assert_relative_eq!(tangent, tangent.transpose(), epsilon = 1e-12 * scale);
}

#[test]
fn test_rotation_increments_compose_across_iterations() {
    let mut nodes = nodes_along([2.0, 0.0, 0.0]);
    let mut beam = initialized(&nodes);

    let mut values = Vec12::zeros();
    values[11] = 0.2;
    set_values(&mut nodes, &values);
    beam.compute_local_system([&nodes[0], &nodes[1]]).unwrap();

    values[9] = 0.1;
    set_values(&mut nodes, &values);
    beam.compute_local_system([&nodes[0], &nodes[1]]).unwrap();

    let first = incremental_quaternion(&Vec3::new(0.0, 0.0, 0.2)).unwrap();
    let second = incremental_quaternion(&Vec3::new(0.1, 0.0, 0.0)).unwrap();
    assert_relative_eq!(
        *beam.rotations().node_b(),
        compose(&second, &first),
        epsilon = 1e-14
    );
    assert_eq!(beam.rotations().node_a().w, 1.0);
    assert_eq!(beam.iteration_count(), 2);
}

#[test]
fn test_shear_correction_limits() {
    let mut p = props();
    p.set(PropertyKey::AreaEffectiveY, 1e12);
    p.set(PropertyKey::AreaEffectiveZ, 1e-12);
    let c = ElementConstants::resolve(0, &p, 1.0).unwrap();

    // large shear area is shear-rigid, vanishing shear area removes bending
    assert_relative_eq!(c.section.psi_z, 1.0, epsilon = 1e-6);
    assert!(c.section.psi_y < 1e-6);

    p.remove(PropertyKey::AreaEffectiveY);
    p.remove(PropertyKey::AreaEffectiveZ);
    let c = ElementConstants::resolve(0, &p, 1.0).unwrap();
    assert_eq!(c.section.psi_y, 1.0);
    assert_eq!(c.section.psi_z, 1.0);
}

#[test]
fn test_coincident_nodes_are_rejected() {
    let nodes = [Node::new(1.0, 1.0, 1.0), Node::new(1.0, 1.0, 1.0)];
    let mut beam = CrBeam3D2N::new(5, [0, 1], props());

    let err = beam.check([&nodes[0], &nodes[1]]).unwrap_err();
    assert!(err.is_configuration());
    let err = beam.initialize([&nodes[0], &nodes[1]]).unwrap_err();
    assert!(err.to_string().contains("element 5"));
    assert!(!beam.is_initialized());
}

#[test]
fn test_stiffness_is_stale_after_new_step() {
    let nodes = nodes_along([0.0, 0.0, 3.0]);
    let mut beam = initialized(&nodes);

    beam.compute_local_system([&nodes[0], &nodes[1]]).unwrap();
    assert!(beam.left_hand_side().is_ok());

    beam.initialize_solution_step();
    assert!(matches!(
        beam.left_hand_side(),
        Err(BeamError::StaleStiffness(0))
    ));
    assert!(beam.compute_damping(&AnalysisOptions::new()).is_err());

    // mass does not depend on the tangent
    assert!(beam.compute_mass().is_ok());
}

#[test]
fn test_failed_evaluation_keeps_previous_state() {
    let mut nodes = nodes_along([2.0, 0.0, 0.0]);
    let mut beam = initialized(&nodes);

    let mut values = Vec12::zeros();
    values[8] = 0.01;
    set_values(&mut nodes, &values);
    beam.compute_local_system([&nodes[0], &nodes[1]]).unwrap();
    let rotations = *beam.rotations();
    let modes = beam.deformation_modes();

    // half-turn increments in opposite senses at the two ends
    values[5] = 2.0;
    values[11] = -2.0;
    set_values(&mut nodes, &values);
    let err = beam
        .compute_local_system([&nodes[0], &nodes[1]])
        .unwrap_err();

    assert!(err.is_numerical());
    assert_eq!(*beam.rotations(), rotations);
    assert_eq!(beam.deformation_modes(), modes);
    assert_eq!(beam.iteration_count(), 1);
    assert!(!beam.has_valid_stiffness());
}

#[test]
fn test_resultants_of_bent_element() {
    let mut nodes = nodes_along([2.0, 0.0, 0.0]);
    let mut beam = initialized(&nodes);

    // equal and opposite end rotations: uniform bending moment
    let mut values = Vec12::zeros();
    values[5] = -0.01;
    values[11] = 0.01;
    set_values(&mut nodes, &values);

    let r = beam.internal_resultants([&nodes[0], &nodes[1]]).unwrap();
    let section = Section::rectangular(0.1, 0.2);
    let expected = Material::steel().e * section.iz * 0.02 / 2.0;
    for k in 0..3 {
        assert_relative_eq!(r.moments[k][2], expected, max_relative = 1e-3);
        assert!(r.forces[k][1].abs() < 1e-6 * expected);
    }
    assert_eq!(beam.iteration_count(), 0);
}
