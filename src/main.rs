use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use yield_images::{BatchStatus, Harvester};

mod args;
use args::{Args, Command, build_harvester};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let harvester = match build_harvester(&args) {
        Ok(harvester) => harvester,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&harvester, args.command).await {
        ::log::error!("Command failed: {}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(harvester: &Harvester, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Discover { page_url, json } => {
            let page = harvester.discover(&page_url).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                for url in page.images.urls() {
                    println!("{}", url);
                }
            }
        }
        Command::Fetch { image_url, output } => {
            let image = harvester.fetch_for_download(&image_url).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&image.file_name));
            tokio::fs::write(&path, &image.bytes).await?;
            println!(
                "Saved {} ({}, {} bytes)",
                path.display(),
                image.content_type,
                image.bytes.len()
            );
        }
        Command::Archive {
            mut urls,
            from_page,
            output,
        } => {
            if let Some(page_url) = from_page {
                let page = harvester.discover(&page_url).await?;
                if page.images.is_empty() {
                    ::log::info!("No images found on {}", page.url);
                }
                urls.extend(page.images.urls());
            }

            let start_time = std::time::Instant::now();
            let archive = harvester.build_archive(urls).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&archive.name));
            tokio::fs::write(&path, &archive.bytes).await?;

            for failure in &archive.failures {
                eprintln!("failed: {} ({})", failure.url, failure.cause);
            }
            match archive.status() {
                BatchStatus::Partial => ::log::warn!(
                    "{} images could not be downloaded",
                    archive.failures.len()
                ),
                BatchStatus::AllFailed => ::log::warn!("No images could be downloaded"),
                BatchStatus::Empty => ::log::warn!("No image URLs to download, archive is empty"),
                BatchStatus::Complete => {}
            }

            println!(
                "Wrote {} with {} images ({} failed) in {:.2} seconds",
                path.display(),
                archive.entries.len(),
                archive.failures.len(),
                start_time.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use zip::ZipArchive;

    #[tokio::test]
    async fn test_archive_from_page_without_images_writes_empty_zip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body><p>no images</p></body></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let output = std::env::temp_dir().join(format!(
            "yield-images-empty-{}.zip",
            std::process::id()
        ));
        let command = Command::Archive {
            urls: Vec::new(),
            from_page: Some(format!("{}/index.html", server.uri())),
            output: Some(output.clone()),
        };

        run(&Harvester::new(), command).await.unwrap();

        let bytes = std::fs::read(&output).unwrap();
        std::fs::remove_file(&output).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
