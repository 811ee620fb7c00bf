use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::{Individual, MoError};

/// Write the objective values of the individuals to a CSV file, one row per individual with the
/// values separated by a comma and no header. Values are written with Rust's locale-independent
/// float formatting.
///
/// # Arguments
///
/// * `individuals`: The individuals to export.
/// * `destination`: The path to the CSV file.
///
/// returns: `Result<(), MoError>`
pub fn write_objectives_csv<P: AsRef<Path>>(
    individuals: &[Individual],
    destination: P,
) -> Result<(), MoError> {
    write_csv(destination, individuals, |i| i.objective_values().to_vec())
}

/// Write the variable values of the individuals to a CSV file, one row per individual with the
/// values separated by a comma and no header.
///
/// # Arguments
///
/// * `individuals`: The individuals to export.
/// * `destination`: The path to the CSV file.
///
/// returns: `Result<(), MoError>`
pub fn write_variables_csv<P: AsRef<Path>>(
    individuals: &[Individual],
    destination: P,
) -> Result<(), MoError> {
    write_csv(destination, individuals, |i| i.variables().to_vec())
}

fn write_csv<P: AsRef<Path>, F: Fn(&Individual) -> Vec<f64>>(
    destination: P,
    individuals: &[Individual],
    row: F,
) -> Result<(), MoError> {
    let file = File::create(&destination)
        .map_err(|e| MoError::AlgorithmExport(format!("cannot create the CSV file: {e}")))?;
    let mut writer = BufWriter::new(file);

    for individual in individuals {
        let values: Vec<String> = row(individual).iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", values.join(","))
            .map_err(|e| MoError::AlgorithmExport(format!("cannot write the CSV row: {e}")))?;
    }
    Ok(())
}
