use std::{
    error::Error,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use tracing::{info, Level};

use sigmoid_net::{
    data::view::{render_sample, DEFAULT_GRID_WIDTH},
    train::binary_accuracy,
    train_loop, Network, Sample, TrainConfig,
};

#[derive(Parser)]
#[command(version, about = "Train and inspect small sigmoid networks")]
struct Cli {
    /// Log every mini-batch
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a network, starting from a saved model if one exists
    Train {
        /// JSON sample file
        #[arg(short, long, value_name = "PATH")]
        data: PathBuf,
        /// Model file; read if present, rewritten after every epoch
        #[arg(short, long, value_name = "PATH")]
        model: PathBuf,
        /// Layer sizes for a fresh network, e.g. 240,100,1
        #[arg(long, value_delimiter = ',')]
        shape: Option<Vec<usize>>,
        /// JSON sample file evaluated after every epoch
        #[arg(long, value_name = "PATH")]
        validation: Option<PathBuf>,
        /// JSON training config; flags below override it
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        #[arg(short, long)]
        epochs: Option<usize>,
        #[arg(short, long)]
        batch_size: Option<usize>,
        #[arg(long)]
        eta: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Report average cost and accuracy of a saved network
    Eval {
        #[arg(short, long, value_name = "PATH")]
        data: PathBuf,
        #[arg(short, long, value_name = "PATH")]
        model: PathBuf,
    },
    /// Print sample inputs as ASCII grids
    View {
        #[arg(short, long, value_name = "PATH")]
        data: PathBuf,
        #[arg(short, long, default_value_t = DEFAULT_GRID_WIDTH)]
        width: usize,
        /// Do not wait for Enter between cases
        #[arg(long)]
        no_pause: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .init();
}

/// `--shape` only seeds a fresh network; it must agree with a model loaded from disk.
fn check_shape_flag(requested: Option<&[usize]>, network: &Network) -> Result<(), String> {
    match requested {
        Some(shape) if shape != network.shape() => Err(format!(
            "--shape {:?} conflicts with the saved model's shape {:?}",
            shape,
            network.shape()
        )),
        _ => Ok(()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Train {
            data,
            model,
            shape,
            validation,
            config,
            epochs,
            batch_size,
            eta,
            seed,
        } => {
            let mut config = match config {
                Some(path) => TrainConfig::load_json(path)?,
                None => TrainConfig::default(),
            };
            config.epochs = epochs.unwrap_or(config.epochs);
            config.batch_size = batch_size.unwrap_or(config.batch_size);
            config.eta = eta.unwrap_or(config.eta);
            config.seed = seed.unwrap_or(config.seed);

            let samples = Sample::load(&data)?;
            let validation = validation.map(Sample::load).transpose()?;

            let mut network = match Network::load(&model)? {
                Some(network) => {
                    check_shape_flag(shape.as_deref(), &network)?;
                    network
                }
                None => {
                    let shape = shape.ok_or("no saved model found; pass --shape to start fresh")?;
                    info!(shape = ?shape, seed = config.seed, "initialising new network");
                    Network::new(&shape, config.seed)?
                }
            };

            train_loop(
                &mut network,
                &samples,
                validation.as_deref(),
                &config,
                |network, _| network.save(&model),
            )?;
            info!(path = %model.display(), "training finished");
        }
        Command::Eval { data, model } => {
            let network = Network::load(&model)?
                .ok_or_else(|| format!("no model at {}", model.display()))?;
            let samples = Sample::load(&data)?;
            println!("samples:  {}", samples.len());
            println!("cost:     {:.6}", network.run_cost_avg(&samples)?);
            println!("accuracy: {:.4}", binary_accuracy(&network, &samples)?);
        }
        Command::View {
            data,
            width,
            no_pause,
        } => {
            let samples = Sample::load(&data)?;
            let stdin = io::stdin();
            let mut line = String::new();
            for (i, sample) in samples.iter().enumerate() {
                println!("{}", render_sample(i, sample, width));
                if !no_pause {
                    io::stdout().flush()?;
                    line.clear();
                    if stdin.lock().read_line(&mut line)? == 0 {
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}
