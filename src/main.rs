use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use cpu_time::ProcessTime;
use csrmat::{add, multiply, parse_file, subtract, transpose, SparseMatrixCSR};
use log::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "csrmat",
    version,
    about = "Load Matrix Market files as CSR and add, subtract, multiply or transpose them",
    after_help = "Usage forms:\n  \
                  csrmat <file>\n  \
                  csrmat <file> transpose <verbose:0|1>\n  \
                  csrmat <fileA> <fileB> <addition|subtract|multiply> <verbose:0|1>"
)]
struct Cli {
    /// Positional arguments, see the usage forms below
    #[arg(required = true, num_args = 1..=4)]
    args: Vec<String>,
}

/// Binary operation selected on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
enum BinaryOp {
    Addition,
    Subtract,
    Multiply,
}

impl BinaryOp {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "addition" => Some(BinaryOp::Addition),
            "subtract" => Some(BinaryOp::Subtract),
            "multiply" => Some(BinaryOp::Multiply),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Show { path: String },
    Transpose { path: String, verbose: bool },
    Binary { lhs: String, rhs: String, op: BinaryOp, verbose: bool },
}

impl Command {
    fn from_args(args: &[String]) -> Result<Self, String> {
        match args {
            [path] => Ok(Command::Show { path: path.clone() }),
            [path, op, verbose] if op == "transpose" => Ok(Command::Transpose {
                path: path.clone(),
                verbose: parse_verbose(verbose)?,
            }),
            [lhs, rhs, op, verbose] => {
                let op = BinaryOp::parse(op).ok_or_else(|| {
                    format!(
                        "unknown operation {:?}; use one of: addition, subtract, multiply or transpose",
                        op
                    )
                })?;
                Ok(Command::Binary {
                    lhs: lhs.clone(),
                    rhs: rhs.clone(),
                    op,
                    verbose: parse_verbose(verbose)?,
                })
            }
            _ => Err("please use the correct format (see --help)".to_string()),
        }
    }
}

fn parse_verbose(flag: &str) -> Result<bool, String> {
    match flag {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(format!("verbose flag must be 0 or 1, got {:?}", other)),
    }
}

/// Prints nnz, row pointer, column index and values on separate lines
fn print_matrix(matrix: &SparseMatrixCSR<f64>) {
    let join = |items: Vec<String>| items.join(" ");

    println!("Number of non-zeros: {}", matrix.nnz());
    println!("Row Pointer: {}", join(matrix.row_ptr.iter().map(|p| p.to_string()).collect()));
    println!("Column Index: {}", join(matrix.col_idx.iter().map(|c| c.to_string()).collect()));
    println!("Values: {}", join(matrix.values.iter().map(|v| format!("{:.6}", v)).collect()));
}

fn cpu_time_line(cpu: Duration) -> String {
    format!("CPU time: {:.6} seconds", cpu.as_secs_f64())
}

fn run(command: Command) -> csrmat::Result<()> {
    match command {
        Command::Show { path } => {
            info!("opening {}", path);
            let a = parse_file(&path)?;
            print_matrix(&a);
        }
        Command::Transpose { path, verbose } => {
            info!("opening {}", path);
            let a = parse_file(&path)?;
            let t = transpose(&a)?;
            if verbose {
                println!("Matrix from {}", path);
                print_matrix(&a);
                println!();
                println!("Transpose of matrix from {}", path);
                print_matrix(&t);
                println!();
            }
        }
        Command::Binary { lhs, rhs, op, verbose } => {
            info!("opening {} and {}", lhs, rhs);
            let a = parse_file(&lhs)?;
            let b = parse_file(&rhs)?;
            let c = match op {
                BinaryOp::Addition => add(&a, &b)?,
                BinaryOp::Subtract => subtract(&a, &b)?,
                BinaryOp::Multiply => multiply(&a, &b)?,
            };
            if verbose {
                println!("Matrix A:");
                print_matrix(&a);
                println!();
                println!("Matrix B:");
                print_matrix(&b);
                println!();
                println!("Resultant Matrix C:");
                print_matrix(&c);
                println!();
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let command = match Command::from_args(&cli.args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("error: {}", message);
            return ExitCode::FAILURE;
        }
    };

    let clock = ProcessTime::try_now();
    let outcome = run(command);
    match clock.and_then(|start| start.try_elapsed()) {
        Ok(cpu) => println!("{}", cpu_time_line(cpu)),
        Err(e) => warn!("process CPU clock unavailable: {}", e),
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_command_shapes() {
        assert_eq!(
            Command::from_args(&args(&["a.mtx"])),
            Ok(Command::Show { path: "a.mtx".into() })
        );
        assert_eq!(
            Command::from_args(&args(&["a.mtx", "transpose", "1"])),
            Ok(Command::Transpose { path: "a.mtx".into(), verbose: true })
        );
        assert_eq!(
            Command::from_args(&args(&["a.mtx", "b.mtx", "multiply", "0"])),
            Ok(Command::Binary {
                lhs: "a.mtx".into(),
                rhs: "b.mtx".into(),
                op: BinaryOp::Multiply,
                verbose: false,
            })
        );
    }

    #[test]
    fn test_rejected_shapes() {
        assert!(Command::from_args(&args(&["a.mtx", "b.mtx"])).is_err());
        assert!(Command::from_args(&args(&["a.mtx", "invert", "1"])).is_err());
        assert!(Command::from_args(&args(&["a.mtx", "b.mtx", "divide", "1"])).is_err());
        assert!(Command::from_args(&args(&["a.mtx", "transpose", "yes"])).is_err());
    }

    #[test]
    fn test_cpu_time_line() {
        assert_eq!(cpu_time_line(Duration::from_millis(1500)), "CPU time: 1.500000 seconds");

        let start = ProcessTime::try_now().unwrap();
        let spent = start.try_elapsed().unwrap();
        assert!(cpu_time_line(spent).starts_with("CPU time: "));
    }
}
