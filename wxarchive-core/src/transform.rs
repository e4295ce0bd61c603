use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

use crate::model::{HourlyReading, HourlyTemp, OneCallResponse};

/// Input file the transform step reads, as produced by the fetch step.
pub const DATA_FILE: &str = "data.json";

/// K − 273.15
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - 273.15
}

/// (K − 273.15) × 9⁄5 + 32
pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    (kelvin - 273.15) * 9.0 / 5.0 + 32.0
}

impl HourlyTemp {
    /// Derive the output record for one hourly reading. Both converted
    /// temperatures come from the same source value.
    pub fn from_reading(reading: &HourlyReading) -> Self {
        HourlyTemp {
            epoch: reading.dt,
            timestamp: format_utc(reading.dt),
            temp_kelvin: reading.temp,
            temp_fahrenheit: reading.temp.map(kelvin_to_fahrenheit),
            temp_celsius: reading.temp.map(kelvin_to_celsius),
        }
    }
}

fn format_utc(epoch: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        // only reachable for epochs outside chrono's representable range
        .unwrap_or_else(|| epoch.to_string())
}

/// One output record per element of the response's hourly array.
pub fn extract_hourly(response: &OneCallResponse) -> Vec<HourlyTemp> {
    response.hourly.iter().map(HourlyTemp::from_reading).collect()
}

/// Read the fetched JSON document at `input` and append one JSON object per
/// hourly reading to `output`, overwriting any previous file. An empty or
/// absent hourly array produces an empty output file.
pub fn run(input: &Path, output: &Path) -> Result<()> {
    let contents = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let response: OneCallResponse = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse input file: {}", input.display()))?;

    let records = extract_hourly(&response);

    let file = fs::File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    let mut writer = BufWriter::new(file);

    for record in &records {
        serde_json::to_writer(&mut writer, record).context("Failed to serialize hourly record")?;
        writer
            .write_all(b"\n")
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        message = "wrote hourly temperature records",
        count = records.len(),
        output = %output.display(),
    );

    Ok(())
}
