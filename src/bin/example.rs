//! CR Beam Example - Cantilever rolled up by an end moment

use std::f64::consts::PI;

use crbeam::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== CR Beam Example: Cantilever Under End Moment ===\n");

    //  N0 ---- N1 ---- ... ---- N8  <- MZ
    //  ^
    // Fixed
    //
    // A moment M = θ EI / L bends the member into a circular arc
    // of radius L / θ with tip rotation θ.

    let length = 2.0;
    let n_elements = 8;
    let theta = PI / 4.0;

    let material = Material::steel();
    let section = Section::new(0.01, 1e-6, 1e-6, 2e-6);
    let moment = theta * material.e * section.iz / length;

    let mut model = BeamModel::new();
    let nodes: Vec<NodeId> = (0..=n_elements)
        .map(|i| model.add_node(Node::new(length * i as f64 / n_elements as f64, 0.0, 0.0)))
        .collect();
    for pair in nodes.windows(2) {
        model.add_beam(pair, Properties::from_parts(&material, &section))?;
    }

    let tip = nodes[n_elements];
    model.add_support(nodes[0], Support::fixed())?;
    model.add_nodal_load(tip, [0.0, 0.0, 0.0, 0.0, 0.0, moment])?;

    model.check_all()?;
    model.initialize_all()?;

    println!("Running incremental Newton-Raphson analysis...\n");
    let options = AnalysisOptions::new()
        .with_load_steps(10)
        .with_convergence(100, 1e-6);
    let reports = model.solve_static(&options)?;

    println!("Load Steps:");
    for report in &reports {
        println!(
            "  λ={:.2}: {} iterations, |r|={:.3e}",
            report.load_factor, report.iterations, report.residual_norm
        );
    }

    let radius = length / theta;
    let u = model.displacement(tip)?;
    println!("\nTip Displacement:");
    println!(
        "  DX={:.6}m (arc {:.6}m), DY={:.6}m (arc {:.6}m), RZ={:.6}rad (arc {:.6}rad)",
        u[0],
        radius * theta.sin() - length,
        u[1],
        radius * (1.0 - theta.cos()),
        u[5],
        theta
    );

    println!("\nElement Resultants:");
    for beam in model.elements() {
        let resultants = SectionResultants::from_local_forces(beam.local_forces());
        let modes = beam.deformation_modes();
        println!(
            "  E{}: N={:.2}N, Mz={:.2}kN·m, φs_z={:.6}, L-L0={:.3e}m",
            beam.id(),
            resultants.axial(),
            resultants.moments[1][2] / 1000.0,
            modes.symmetric_z,
            modes.elongation
        );
    }

    println!("\n=== Analysis Complete ===");
    Ok(())
}
