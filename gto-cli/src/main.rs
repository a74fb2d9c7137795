use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use gto_core::{
    basis::{ContractedShell, Shell},
    config::{ConfigGrid, ConfigShell},
    eval_deriv_shell, eval_shell_gradient, eval_shell_laplacian, EvalInput, ShellValues,
};
use ndarray::Array2;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: GtoCommand,
}

#[derive(ClapArgs, Debug)]
struct Inputs {
    /// A shell in Basis Set Exchange JSON format, with a `center`
    #[arg(long, short)]
    shell: PathBuf,
    /// A JSON list of [x, y, z] points
    #[arg(long, short)]
    grid: PathBuf,
    /// Where to write the values; stdout if not given
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum GtoCommand {
    /// Evaluate a derivative of the shell on the grid
    Eval {
        #[command(flatten)]
        inputs: Inputs,
        /// Derivative orders along x, y and z
        #[arg(long, num_args = 3, default_values_t = [0, 0, 0], allow_negative_numbers = true)]
        orders: Vec<i32>,
    },
    /// Evaluate the first derivatives along x, y and z
    Gradient {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Evaluate the sum of the second derivatives
    Laplacian {
        #[command(flatten)]
        inputs: Inputs,
    },
}

/// Values of one shell, flattened in row-major order.
#[derive(Serialize)]
struct ShellOutput {
    angular_momentum: i32,
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl ShellOutput {
    fn new(shell: &ContractedShell, values: &ShellValues) -> Self {
        Self {
            angular_momentum: shell.angular_momentum(),
            shape: values.shape().to_vec(),
            values: values.values().iter().copied().collect(),
        }
    }
}

fn load(inputs: &Inputs) -> Result<(Vec<ContractedShell>, Array2<f64>)> {
    let shells = ConfigShell::load(&inputs.shell)
        .and_then(|config| config.shells())
        .with_context(|| format!("loading shell from {}", inputs.shell.display()))?;
    let grid: Array2<f64> = ConfigGrid::load(&inputs.grid)
        .and_then(Array2::<f64>::try_from)
        .with_context(|| format!("loading grid from {}", inputs.grid.display()))?;

    log::info!(
        "loaded {} shell(s) and {} grid points",
        shells.len(),
        grid.nrows()
    );
    Ok((shells, grid))
}

fn write(output: &Option<PathBuf>, values: &impl Serialize) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            write_json(file, values)
                .with_context(|| format!("writing output file {}", path.display()))
        }
        None => write_json(std::io::stdout().lock(), values).context("writing to stdout"),
    }
}

/// Writes `values` as one line of JSON and flushes, so that write errors are not lost.
fn write_json(writer: impl Write, values: &impl Serialize) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, values)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args: Args = Args::parse();
    let start = Instant::now();

    match args.command {
        GtoCommand::Eval { inputs, orders } => {
            let (shells, grid) = load(&inputs)?;
            let outputs = shells
                .iter()
                .map(|shell| -> Result<_> {
                    let values = eval_deriv_shell(&EvalInput {
                        points: grid.view().into_dyn(),
                        orders: &orders,
                        shell,
                    })?;
                    Ok(ShellOutput::new(shell, &values))
                })
                .collect::<Result<Vec<_>>>()?;
            write(&inputs.output, &outputs)?;
        }
        GtoCommand::Gradient { inputs } => {
            let (shells, grid) = load(&inputs)?;
            let outputs = shells
                .iter()
                .map(|shell| -> Result<_> {
                    let gradient = eval_shell_gradient(grid.view().into_dyn(), shell)?;
                    Ok(gradient.map(|values| ShellOutput::new(shell, &values)))
                })
                .collect::<Result<Vec<_>>>()?;
            write(&inputs.output, &outputs)?;
        }
        GtoCommand::Laplacian { inputs } => {
            let (shells, grid) = load(&inputs)?;
            let outputs = shells
                .iter()
                .map(|shell| -> Result<_> {
                    let values = eval_shell_laplacian(grid.view().into_dyn(), shell)?;
                    Ok(ShellOutput::new(shell, &values))
                })
                .collect::<Result<Vec<_>>>()?;
            write(&inputs.output, &outputs)?;
        }
    }

    log::info!("finished after {:0.2?}", start.elapsed());

    Ok(())
}
