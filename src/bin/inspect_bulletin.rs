use b3scraper::store::read_table;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::{env, fs::File, io, path::Path, process::exit};

fn main() {
    // Expect exactly one CLI argument: path to a bulletin Parquet file.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <BULLETIN_PARQUET>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_bulletin(Path::new(&args[1])) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Print file-level metadata, the date span and columns, then every row as TSV.
fn inspect_bulletin(path: &Path) -> anyhow::Result<()> {
    let reader = SerializedFileReader::new(File::open(path)?)?;
    let meta = reader.metadata();
    let file_meta = meta.file_metadata();

    println!("=== Bulletin file: {} ===", path.display());
    println!(
        "Created by:           {}",
        file_meta.created_by().unwrap_or("<unknown>")
    );
    println!("Total rows:           {}", file_meta.num_rows());
    println!("Number of row groups: {}", meta.num_row_groups());
    println!("File-size on disk:    {} bytes", std::fs::metadata(path)?.len());

    let table = read_table(path)?;
    match table.date_span() {
        Some((first, last)) => println!("Trading dates:        {} .. {}", first, last),
        None => println!("Trading dates:        <none>"),
    }
    println!("Columns:              {}", table.columns().join(", "));
    println!();

    table.write_tsv(io::stdout().lock())?;
    Ok(())
}
