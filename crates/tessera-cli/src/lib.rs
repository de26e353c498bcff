//! Tessera CLI library
//!
//! This module contains the core CLI logic for the Tessera diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::info;

use tessera::{DiagramBuilder, TesseraError};

/// Run the Tessera CLI application
///
/// This function processes the input file through the Tessera pipeline
/// and writes either the rendered SVG or the resolved geometry as JSON.
///
/// # Errors
///
/// Returns `TesseraError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), TesseraError> {
    let output_path = args.output_path();
    info!(
        input_path = args.input,
        output_path = output_path,
        format:? = args.format;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let document = builder.parse(&source)?;
    let diagram = builder.layout(&document)?;

    let output = match args.format {
        OutputFormat::Svg => builder.render_svg(&diagram)?,
        OutputFormat::Json => serde_json::to_string_pretty(&diagram)
            .map_err(|err| TesseraError::Export(err.to_string()))?,
    };

    fs::write(output_path, output)?;

    info!(output_file = output_path; "Diagram exported successfully");

    Ok(())
}
