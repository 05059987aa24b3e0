use anyhow::Result;

use vokabel_lib::vocabulary::Bucket;

use crate::app::App;
use crate::render::terminal::{bucket_color, bucket_label, progress_bar, Color};
use crate::OutputFormat;

const BAR_WIDTH: usize = 24;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let store = app.open_store()?;
    let counts = store.count_by_bucket()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
        OutputFormat::Plain => {
            if counts.total_words == 0 {
                println!("No words in the deck.");
                return Ok(());
            }

            let unseen = counts.total_words.saturating_sub(counts.total_reviewed);
            println!(
                "Reviewed {} of {} words ({} unseen)",
                counts.total_reviewed, counts.total_words, unseen
            );
            println!();

            for bucket in Bucket::ALL {
                let count = counts.get(bucket);
                let bar = progress_bar(count, counts.total_reviewed, BAR_WIDTH);
                if use_color {
                    println!(
                        "  {:<11} {}{}{} {:>5}",
                        bucket_label(bucket),
                        bucket_color(bucket),
                        bar,
                        Color::RESET,
                        count
                    );
                } else {
                    println!("  {:<11} {} {:>5}", bucket_label(bucket), bar, count);
                }
            }

            println!();
            let ratio = format!("{:.0}% mastered", counts.mastered_ratio() * 100.0);
            if use_color {
                println!("{}{}{}", Color::DIM, ratio, Color::RESET);
            } else {
                println!("{}", ratio);
            }
        }
    }

    Ok(())
}
