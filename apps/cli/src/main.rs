use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings, AnimatorApi, AnimatorClient, AnimatorController, ResultArea,
    SelectedImage,
};
use shared::domain::{ImageUrl, UploadedImages};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Command-line client for the photo animation service")]
struct Args {
    /// Backend base URL. Overrides animator.toml and the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the image URLs the backend returns from /search.
    Search,
    /// Upload images and print the URLs the backend stored them under.
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Animate previously uploaded image URLs.
    Animate {
        #[arg(long = "image-url", required = true)]
        image_urls: Vec<String>,
    },
    /// Upload images, animate them, and optionally save the result.
    Run {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Where to write the animation. A directory keeps the server's file name.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print the sign-in URL to open in a browser.
    Login,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let server_url = args.server_url.unwrap_or(settings.server_url);
    let client = AnimatorClient::new(&server_url)
        .with_context(|| format!("cannot use server url '{server_url}'"))?;
    tracing::debug!(base_url = %client.base_url(), "client ready");

    match args.command {
        Command::Search => {
            let items = client.search().await.context("search failed")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for item in items {
                    println!("{}", item.base_url);
                }
            }
        }
        Command::Upload { files } => {
            let urls = client
                .upload(&SelectedImage::from_paths(files))
                .await
                .context("Failed to upload images")?;
            print_urls(&urls, args.json)?;
        }
        Command::Animate { image_urls } => {
            let Some(images) =
                UploadedImages::new(image_urls.into_iter().map(ImageUrl::from).collect())
            else {
                bail!("No images to animate.");
            };
            let animation = client
                .animate(&images)
                .await
                .context("Failed to create animation")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&animation)?);
            } else {
                println!("{}", animation.animation_url);
            }
        }
        Command::Run { files, save } => {
            let mut controller = AnimatorController::new(Arc::new(client));
            controller.select_files(SelectedImage::from_paths(files));

            report(controller.upload().await?)?;
            report(controller.animate().await?)?;

            if let Some(target) = save {
                let Some((file_name, bytes)) = controller.download_animation().await? else {
                    bail!("no animation to save");
                };
                let path = if target.is_dir() {
                    target.join(file_name)
                } else {
                    target
                };
                tokio::fs::write(&path, bytes)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Saved animation to {}", path.display());
            }
        }
        Command::Login => println!("{}", client.login_url()),
    }

    Ok(())
}

fn print_urls(urls: &[ImageUrl], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(urls)?);
    } else {
        for url in urls {
            println!("{url}");
        }
    }
    Ok(())
}

/// A failure ends the run with a non-zero exit code.
fn report(result: &ResultArea) -> Result<()> {
    if result.is_failure() {
        bail!("{}", result.text());
    }
    println!("{}", result.text());
    Ok(())
}
