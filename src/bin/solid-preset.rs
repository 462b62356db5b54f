//! Solid preset CLI

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use solid_preset_native::discovery::find_source_units;
use solid_preset_native::instructions::{render_instructions, write_sub_package_json};
use solid_preset_native::{
    clean_dist, with_solid, BuildOptions, ModuleFormat, Pipeline, PresetOptions, Resolver, Result,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "solid-preset")]
#[command(about = "Build preset and JSX tag stabilizer for Solid component libraries")]
#[command(version)]
struct Args {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite JSX tag names to stable markers before bundling
    Stabilize {
        /// Source file or directory
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Directory for rewritten units and their source maps
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,
    },

    /// Restore tag names in a bundled chunk
    Resolve {
        /// Chunk emitted by the bundler
        #[arg(value_name = "CHUNK")]
        chunk: PathBuf,

        /// Output file (defaults to rewriting CHUNK in place)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Resolve build options and print them as JSON
    Config {
        /// JSON file with a single options object or a list of them
        #[arg(long, value_name = "FILE", conflicts_with_all = ["input", "target", "mapping_name"])]
        options: Option<PathBuf>,

        /// Entry file (defaults to `source` in package.json)
        #[arg(long)]
        input: Option<String>,

        /// Output formats: cjs, esm, umd
        #[arg(long = "target", value_name = "FORMAT")]
        target: Vec<ModuleFormat>,

        #[arg(long)]
        mapping_name: Option<String>,

        /// Build into dist/<name>/ as a sub-package
        #[arg(long)]
        sub_package: bool,

        /// Print the package.json fields consumers need
        #[arg(long)]
        print_instructions: bool,

        /// Write dist/<name>/package.json
        #[arg(long)]
        write_package_json: bool,

        /// Remove dist/ first
        #[arg(long)]
        clean: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args.command) {
        eprintln!("[{}] {}", e.code(), e);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Stabilize { path, out_dir } => stabilize(&path, &out_dir),
        Command::Resolve { chunk, output } => resolve(&chunk, output.as_deref()),
        Command::Config {
            options,
            input,
            target,
            mapping_name,
            sub_package,
            print_instructions,
            write_package_json,
            clean,
        } => {
            let preset = match options {
                Some(file) => serde_json::from_str(&fs::read_to_string(file)?)?,
                None => {
                    let options = BuildOptions {
                        input,
                        targets: (!target.is_empty()).then_some(target),
                        write_package_json,
                        print_instructions,
                        mapping_name,
                        ..Default::default()
                    };
                    if sub_package {
                        PresetOptions::Many(vec![options])
                    } else {
                        PresetOptions::Single(options)
                    }
                }
            };
            config(&preset, clean)
        }
    }
}

fn stabilize(path: &Path, out_dir: &Path) -> Result<()> {
    let units = find_source_units(path)?;
    let pipeline = Pipeline::new();
    let modules = pipeline.stabilize_units(&units)?;
    let root = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    };

    for module in modules {
        let source = Path::new(&module.id);
        let relative = source.strip_prefix(root).unwrap_or(source);
        let target = out_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &module.code)?;
        if let Some(map) = &module.map {
            let mut map_path = target.clone().into_os_string();
            map_path.push(".map");
            fs::write(map_path, map)?;
        }
        tracing::debug!("wrote {}", target.display());
    }

    tracing::info!(
        "stabilized {} units ({} markers)",
        units.len(),
        pipeline.stabilizer().sequence().issued()
    );
    Ok(())
}

fn resolve(chunk: &Path, output: Option<&Path>) -> Result<()> {
    let code = fs::read_to_string(chunk)?;
    let chunk_name = chunk.to_string_lossy();
    let resolved = Resolver::new().resolve(&code, &chunk_name)?;
    let target = output.unwrap_or(chunk);
    match resolved {
        Some(code) => fs::write(target, code)?,
        None if output.is_some() => fs::write(target, code)?,
        None => tracing::info!("{}: nothing to resolve", chunk_name),
    }
    Ok(())
}

fn config(preset: &PresetOptions, clean: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    if clean {
        clean_dist(&cwd)?;
    }

    let builds = with_solid(preset, &cwd)?;
    println!("{}", serde_json::to_string_pretty(&builds)?);

    for build in &builds {
        if build.print_instructions {
            println!("{}", render_instructions(build)?);
        }
        if build.write_package_json {
            write_sub_package_json(&cwd, build)?;
        }
    }
    Ok(())
}
