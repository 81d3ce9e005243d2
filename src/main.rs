//! CLI front end: assemble, disassemble, and execute (with or without
//! the interactive trace) a 6502-variant program.

use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::*;

use mos6502_toolchain::disasm::disassemble;
use mos6502_toolchain::io::{StdinSource, StdoutSink};
use mos6502_toolchain::objfile;
use mos6502_toolchain::sim::{Cpu, Fault, StopReason, TraceOutcome};
use mos6502_toolchain::trace::Debugger;
use mos6502_toolchain::{asm, constants};

/// Assembler, disassembler and simulator for a 6502 variant.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Assemble FILE to FILE.out; exit if errors > 0
    #[arg(short = 'a', value_name = "FILE")]
    assemble: Option<PathBuf>,

    /// Disassemble FILE (an object file) to stdout
    #[arg(short = 'd', value_name = "FILE")]
    disassemble: Option<PathBuf>,

    /// Execute FILE
    #[arg(short = 'x', value_name = "FILE")]
    execute: Option<PathBuf>,

    /// Execute FILE under interactive trace
    #[arg(short = 't', value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Suppress status banners
    #[arg(short = 'q')]
    quiet: bool,

    /// Print version and exit
    #[arg(short = 'v')]
    version: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if let Some(file) = &cli.assemble {
        let out_path = match assemble_file(file, cli.quiet) {
            Ok(path) => path,
            Err(code) => return code,
        };
        // `-a` followed by `-x`/`-t` chains assembly into execution via
        // the temporary `.out` file just produced (§6.3).
        if let Some(target) = cli.execute.as_ref() {
            if target == file {
                return run_file(&out_path, false, cli.quiet);
            }
        }
        if let Some(target) = cli.trace.as_ref() {
            if target == file {
                return run_file(&out_path, true, cli.quiet);
            }
        }
        return ExitCode::SUCCESS;
    }

    if let Some(file) = &cli.disassemble {
        return disassemble_file(file);
    }
    if let Some(file) = &cli.execute {
        return run_file(file, false, cli.quiet);
    }
    if let Some(file) = &cli.trace {
        return run_file(file, true, cli.quiet);
    }

    eprintln!("{}", "Error: no mode selected (use -a, -d, -x, or -t)".red());
    ExitCode::FAILURE
}

fn assemble_file(file: &Path, quiet: bool) -> Result<PathBuf, ExitCode> {
    let source = match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let assembled = asm::assemble(&source);
    let file_name = file.display().to_string();
    for diagnostic in &assembled.diagnostics {
        eprintln!("{}", diagnostic.render(&file_name));
    }
    if assembled.error_count > 0 {
        if !quiet {
            eprintln!("{} error(s)", assembled.error_count);
        }
        return Err(ExitCode::FAILURE);
    }

    let out_path = with_out_extension(file);
    if let Err(e) = objfile::save(&out_path, &assembled.bytes) {
        eprintln!("Error: {}", e);
        return Err(ExitCode::FAILURE);
    }
    if !quiet {
        println!("Assembled {} bytes to {}", assembled.bytes.len(), out_path.display());
    }
    Ok(out_path)
}

fn with_out_extension(file: &Path) -> PathBuf {
    let mut out = file.as_os_str().to_owned();
    out.push(".out");
    PathBuf::from(out)
}

fn disassemble_file(file: &Path) -> ExitCode {
    let bytes = match objfile::load(file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    for line in disassemble(&bytes, 0) {
        println!("{}", line);
    }
    ExitCode::SUCCESS
}

fn run_file(file: &Path, trace: bool, quiet: bool) -> ExitCode {
    let bytes = match objfile::load(file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if !quiet {
        println!(
            "Loaded {} bytes at ${:04X}",
            bytes.len(),
            constants::BASE_PC
        );
    }

    let mut cpu = Cpu::new(&bytes);
    let mut source = StdinSource;
    let mut sink = StdoutSink;
    let stdin = io::stdin();
    let mut input = BufReader::new(stdin.lock());
    let mut stdout = io::stdout();
    let mut debugger = Debugger::new(&mut input, &mut stdout);
    let mut tracing = trace;

    loop {
        let result = cpu.run(
            tracing,
            &debugger.breakpoints.clone(),
            |c| debugger.checkpoint(c),
            &mut source,
            &mut sink,
        );
        match result {
            Ok(StopReason::RanOffEnd) => return ExitCode::SUCCESS,
            Ok(StopReason::Quit) => return ExitCode::SUCCESS,
            Ok(StopReason::Brk) => {
                println!("!BRK");
                match debugger.checkpoint(&mut cpu) {
                    TraceOutcome::Quit => return ExitCode::SUCCESS,
                    TraceOutcome::Continue => {
                        tracing = false;
                        continue;
                    }
                    TraceOutcome::Step => {
                        tracing = true;
                        continue;
                    }
                }
            }
            Err(fault) => {
                println!("{}", fault.message());
                return match fault {
                    Fault::AddressOverflow(_) | Fault::UnknownOpcode(_) => ExitCode::FAILURE,
                };
            }
        }
    }
}
