use lorenz_rk4::{Field, LorenzField, RunConfig, StepScheme};

fn main() -> anyhow::Result<()> {
    // Textbook Lorenz with textbook RK4; the CLI defaults reproduce the older literal run instead.
    let cfg = RunConfig {
        field: Field::Lorenz(LorenzField::canonical()),
        scheme: StepScheme::Classical,
        t0: 0.0,
        t_end: 40.0,
        dt: 0.005,
        initial_state: vec![1.0, 1.0, 1.0],
    };

    let samples = cfg.start()?.collect_states()?;

    // Print every 0.1 time units (every 20 steps)
    println!("t,x,y,z");
    for s in samples.iter().step_by(20) {
        println!("{:.2},{:.4},{:.4},{:.4}", s.t, s.state[0], s.state[1], s.state[2]);
    }

    let max_z = samples.iter().map(|s| s.state[2]).fold(f64::MIN, f64::max);
    eprintln!("samples={} max_z={:.3}", samples.len(), max_z);

    Ok(())
}
