use sigmoid_net::{Network, Sample, DEFAULT_ETA};

fn main() -> sigmoid_net::Result<()> {
    let mut network = Network::new(&[2, 3, 1], 2)?;

    let samples = vec![
        Sample::new(vec![1.0, 0.0], 1.0),
        Sample::new(vec![1.0, 1.0], 0.0),
        Sample::new(vec![0.0, 1.0], 1.0),
        Sample::new(vec![0.0, 0.0], 0.0),
    ];

    let epochs = 5000;

    for epoch in 0..epochs {
        network.train(&samples, epoch as u64, samples.len(), DEFAULT_ETA)?;
        if epoch % 500 == 0 {
            println!("Epoch {epoch}: cost = {:.6}", network.run_cost_avg(&samples)?);
        }
    }

    for sample in &samples {
        let output = network.run(sample.input())?;
        println!(
            "Input: {:?} -> Output: {:.4}",
            sample.input().iter().collect::<Vec<_>>(),
            output.get(0, 0)
        );
    }
    Ok(())
}
