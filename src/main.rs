use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::info;
use serde_json::json;

use urlguard::{enrichment, ArtifactStore, BuiltinArtifact, Prediction, UrlClassifier};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URLs to classify
    #[arg(required = true)]
    urls: Vec<String>,

    /// Force a fresh download of the artifact files
    #[arg(short, long)]
    fresh: bool,

    /// Load the artifact pair from this directory instead of the managed
    /// cache (expects tfidf_vectorizer.json and mnb_classifier.json)
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// Skip the WHOIS/DNS domain enrichment
    #[arg(long)]
    no_enrichment: bool,
}

async fn ensure_artifacts_downloaded(fresh: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = ArtifactStore::new_default()?;
    let artifact = BuiltinArtifact::MnbTfidf;

    if fresh {
        info!("Fresh download requested - removing any existing artifact files...");
        store.remove_download(artifact)?;
    }

    store.ensure_downloaded(artifact).await?;
    Ok(())
}

fn build_classifier(
    artifacts_dir: Option<&PathBuf>,
) -> Result<UrlClassifier, Box<dyn std::error::Error>> {
    let classifier = match artifacts_dir {
        Some(dir) => UrlClassifier::builder()
            .with_artifact_files(
                &dir.join("tfidf_vectorizer.json").to_string_lossy(),
                &dir.join("mnb_classifier.json").to_string_lossy(),
            )?
            .build()?,
        None => UrlClassifier::builder()
            .with_artifacts(BuiltinArtifact::MnbTfidf)?
            .build()?,
    };
    Ok(classifier)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    info!("=== Starting URL Classification ===");

    if args.artifacts_dir.is_none() {
        ensure_artifacts_downloaded(args.fresh).await?;
    }

    let start_time = Instant::now();
    info!("Building classifier...");
    let classifier = build_classifier(args.artifacts_dir.as_ref())?;

    // Refuse to serve verdicts from an insane or mispaired artifact set.
    classifier.sanity_check()?;

    let build_time = start_time.elapsed();
    info!("=== Classifier Ready (took {:.2?}) ===", build_time);

    let classify_start = Instant::now();
    for (i, url) in args.urls.iter().enumerate() {
        info!(
            "Processing {}/{} (elapsed: {:.2?}): {}",
            i + 1,
            args.urls.len(),
            classify_start.elapsed(),
            url
        );
        process_url(&classifier, url, args.no_enrichment).await?;
    }

    info!("=== Done ===");
    info!("Total time: {:.2?}", start_time.elapsed());
    info!(
        "Average time per URL: {:.2?}",
        classify_start.elapsed() / args.urls.len() as u32
    );

    Ok(())
}

async fn process_url(
    classifier: &UrlClassifier,
    url: &str,
    no_enrichment: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let prediction = match classifier.classify(url) {
        Ok(prediction) => prediction,
        Err(e) => {
            eprintln!("Error classifying {}: {}", url, e);
            return Err(e.into());
        }
    };

    let domain_info = if no_enrichment {
        None
    } else {
        Some(enrichment::lookup(url).await)
    };

    println!("{}", render_report(&prediction, domain_info.as_ref()));
    Ok(())
}

fn render_report(
    prediction: &Prediction,
    domain_info: Option<&enrichment::DomainInfo>,
) -> String {
    let mut report = json!({
        "website_address": prediction.url,
        "normalized_url": prediction.normalized_url,
        "detection_status": prediction.verdict,
        "confidence": format!("{:.2}%", prediction.confidence * 100.0),
        "raw_prediction": prediction.raw_label,
    });

    if let Some(info) = domain_info {
        report["domain_registration"] = json!(info.registration_date);
        report["domain_information"] = json!({
            "registrar": info.registrar,
            "whois_server": info.whois_server,
            "status": info.status,
        });
        report["ip_address"] = json!(info.ip_address);
        report["server_location"] = json!(info.country);
        report["region"] = json!(info.region);
        report["city"] = json!(info.city);
    }

    serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.to_string())
}
