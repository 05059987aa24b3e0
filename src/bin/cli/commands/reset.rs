use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, yes: bool, format: &OutputFormat) -> Result<()> {
    if !yes && !confirm()? {
        bail!("Reset aborted");
    }

    let mut store = app.open_store()?;
    let cleared = store.reset_all_progress()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "cleared": cleared });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Cleared review progress for {} words.", cleared);
        }
    }

    Ok(())
}

fn confirm() -> Result<bool> {
    print!("Forget all review progress? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
