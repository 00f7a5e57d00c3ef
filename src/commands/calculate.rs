use anyhow::{Context, Result};
use power_bill::billing::{calculate_checked, parse_bill_input, BillResult};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Execute the calculate command
///
/// Reads BillInput JSON from a file (or stdin for "-") and prints the
/// itemized result as JSON
pub async fn execute(input: &Path) -> Result<()> {
    let body = read_input(input).await?;
    let result = calculate_from_bytes(&body)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn read_input(input: &Path) -> Result<Vec<u8>> {
    if input == Path::new("-") {
        let mut buffer = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buffer)
            .await
            .context("Failed to read bill input from stdin")?;
        return Ok(buffer);
    }

    tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read bill input {}", input.display()))
}

fn calculate_from_bytes(body: &[u8]) -> Result<BillResult> {
    let input = parse_bill_input(body)?;
    Ok(calculate_checked(&input)?)
}
