use std::env;
use std::error::Error;

use custsim::{CustsimConfig, SimilarityPipeline, demo};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match env::args().nth(1) {
        Some(path) => CustsimConfig::from_file(path)?,
        None => CustsimConfig::default(),
    };
    let settings = config.to_settings();

    let pipeline = SimilarityPipeline::build(demo::demo_transactions()?, &settings)?;
    let report = pipeline.report();
    println!(
        "{} transactions in, {} dropped (unknown birth date), {} birth dates shifted; {} customers indexed as of {}",
        report.input,
        report.dropped_sentinel_dob,
        report.shifted_dob,
        pipeline.profiles().len(),
        settings.as_of
    );

    for profile in pipeline.profiles() {
        let hits = pipeline.match_customer(&profile.customer_id)?;
        println!("\n{}:", profile.customer_id);
        for hit in hits {
            println!("  {:<8} {:.3}", hit.customer_id, hit.score);
        }
    }

    for query in demo::demo_queries()? {
        let hits = pipeline.match_query(&query)?;
        println!("\nquery {} ({}):", query.query_id, query.location);
        for hit in hits {
            println!("  {:<8} {:.3}", hit.customer_id, hit.score);
        }
    }

    Ok(())
}
