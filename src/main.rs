use std::{
    io::{self, Read},
    path::PathBuf,
};

use clap::Parser;
use log::{info, warn};
use rayon::prelude::*;
use slideme_gutenberg::{
    ConvertOptions, DEFAULT_OUTPUT_FILE, TableMode, convert_with_options, detect_table_count,
    read_document, shortcode::DEFAULT_MAX_INPUT_BYTES, write_output,
};

#[derive(Parser)]
#[command(version, about = "Convert [slideme] shortcodes into Gutenberg blocks")]
struct Cli {
    /// Keep HTML tables as table blocks instead of flattening them into paragraphs
    #[arg(long = "preserve-tables")]
    preserve_tables: bool,
    /// Print the number of HTML tables in each input and exit
    #[arg(long = "count-tables", conflicts_with_all = ["output", "preserve_tables"])]
    count_tables: bool,
    /// Write the converted blocks to a file instead of standard output
    #[arg(
        short,
        long,
        value_name = "PATH",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_OUTPUT_FILE
    )]
    output: Option<PathBuf>,
    /// Reject any input larger than this many bytes
    #[arg(long = "max-input-bytes", value_name = "BYTES", default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    max_input_bytes: usize,
    /// Documents to convert; standard input is read when none are given
    files: Vec<PathBuf>,
}

/// A document and the name used for it in messages.
struct Input {
    name: String,
    text: String,
}

fn read_inputs(files: &[PathBuf]) -> anyhow::Result<Vec<Input>> {
    if files.is_empty() {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(vec![Input {
            name: "<stdin>".to_string(),
            text,
        }]);
    }
    let inputs = files
        .par_iter()
        .map(|path| {
            read_document(path).map(|text| Input {
                name: path.display().to_string(),
                text,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(inputs)
}

/// Entry point for the command-line converter.
///
/// Reads each file given on the command line, or standard input when there
/// are none, converts the shortcode regions it contains and prints the block
/// markup. Several files are converted in parallel and printed in argument
/// order, separated by a blank line.
///
/// # Examples
///
/// ```sh
/// # Convert a file and print the blocks
/// slideme-gutenberg post.html
///
/// # Keep tables as table blocks and save to converted-gutenberg-blocks.html
/// slideme-gutenberg --preserve-tables --output post.html
///
/// # Choose the output path
/// slideme-gutenberg --output=blocks.html post.html
///
/// # Convert pasted text
/// pbpaste | slideme-gutenberg
/// ```
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let inputs = read_inputs(&cli.files)?;

    if cli.count_tables {
        for input in &inputs {
            let count = detect_table_count(&input.text);
            if cli.files.is_empty() {
                println!("{count}");
            } else {
                println!("{}: {count}", input.name);
            }
        }
        return Ok(());
    }

    let options = ConvertOptions {
        table_mode: TableMode::from(cli.preserve_tables),
        max_input_bytes: cli.max_input_bytes,
        ..ConvertOptions::default()
    };
    let converted = inputs
        .par_iter()
        .map(|input| convert_with_options(&input.text, &options))
        .collect::<Result<Vec<_>, _>>()?;

    for (input, output) in inputs.iter().zip(&converted) {
        if output.is_empty() {
            warn!("No [slideme] shortcodes found in {}", input.name);
        }
    }
    let document = converted
        .into_iter()
        .filter(|output| !output.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    match cli.output {
        Some(path) => {
            write_output(&path, &document)?;
            info!("wrote {}", path.display());
        }
        None => print!("{document}"),
    }
    Ok(())
}
