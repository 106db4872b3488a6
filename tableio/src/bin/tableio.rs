use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tableio::{container, is_container_file, text_codec, Table, TableConfig, TableIo};

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "Inspect and convert numeric tables in MAT-files and text table files")]
struct Cli {
    /// Report every table that is loaded
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dimensions of a matrix in a MAT-file
    Sizes {
        file: PathBuf,
        /// Dotted variable path, e.g. params.gain
        name: String,
    },
    /// Print a table
    Read {
        file: PathBuf,
        name: String,

        /// Print as JSON instead of tab-separated rows
        #[arg(long)]
        json: bool,
    },
    /// List the variables of a MAT-file or the tables of a text table file
    List {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },
    /// Copy a table into a MAT-file or a text table file
    Convert {
        input: PathBuf,
        name: String,
        output: PathBuf,

        /// Name of the table in the output file
        #[arg(long = "as")]
        rename: Option<String>,

        /// MAT-file version: 4, 6 or 7
        #[arg(long, default_value = "7")]
        version: String,

        /// Add to the output file instead of replacing it
        #[arg(long)]
        append: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let io = TableIo::with_config(TableConfig::default().with_verbose(cli.verbose));

    match &cli.command {
        Commands::Sizes { file, name } => {
            let (rows, cols) = container::matrix_sizes(file, name, io.config())?;
            println!("{rows} {cols}");
        }
        Commands::Read { file, name, json } => {
            let table = io.read_table(file, name)?;
            print_table(name, &table, *json)?;
        }
        Commands::List { file, json } => list(file, *json)?,
        Commands::Convert {
            input,
            name,
            output,
            rename,
            version,
            append,
        } => {
            let table = io.read_table(input, name)?;
            let target = rename.as_deref().unwrap_or(name.as_str());
            if is_container_file(output) {
                let (rows, cols) = table.dimensions();
                container::write_matrix(output, target, table.data(), rows, cols, *append, version)?;
            } else {
                text_codec::write_text_table(output, [(target, &table)], *append)?;
            }
            tracing::info!(
                input = %input.display(),
                output = %output.display(),
                table = target,
                "converted"
            );
        }
    }

    Ok(())
}

fn print_table(name: &str, table: &Table, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let rows: Vec<&[f64]> = table.iter_rows().collect();
        let value = serde_json::json!({
            "name": name,
            "rows": table.rows(),
            "cols": table.cols(),
            "data": rows,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{name}({},{})", table.rows(), table.cols());
    for row in table.iter_rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:?}")).collect();
        println!("{}", line.join("\t"));
    }
    Ok(())
}

fn list(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if is_container_file(file) {
        let variables = container::list_variables(file)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&variables)?);
            return Ok(());
        }
        for v in &variables {
            let dims: Vec<String> = v.dims.iter().map(|d| d.to_string()).collect();
            let complex = if v.complex { " complex" } else { "" };
            let logical = if v.logical { " logical" } else { "" };
            println!("{}\t{}{complex}{logical}\t{}", v.name, v.class, dims.join("x"));
            for field in &v.fields {
                println!("  .{field}");
            }
        }
    } else {
        let tables = text_codec::list_text_tables(file)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&tables)?);
            return Ok(());
        }
        for t in &tables {
            println!("{}\t{}\t{}x{}\tline {}", t.name, t.kind, t.rows, t.cols, t.line);
        }
    }
    Ok(())
}
