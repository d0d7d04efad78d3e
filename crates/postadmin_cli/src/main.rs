//! CLI smoke entry point.
//!
//! Prints core linkage info, then runs the filter engine over a JSON
//! snapshot when given `<posts.json> [filters.json]`.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "postadmin", version, about = "postadmin core smoke check")]
struct Cli {
    /// JSON array of post records to filter.
    posts: Option<PathBuf>,
    /// JSON filter state; defaults to no filters.
    #[arg(requires = "posts")]
    filters: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    println!("postadmin_core ping={}", postadmin_core::ping());
    println!("postadmin_core version={}", postadmin_core::core_version());

    let Some(posts_path) = cli.posts.as_deref() else {
        return ExitCode::SUCCESS;
    };

    match run_filter(posts_path, cli.filters.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_filter(posts_path: &Path, filters_path: Option<&Path>) -> Result<(), String> {
    let posts_json = read_json(posts_path)?;
    let filters_json = match filters_path {
        Some(path) => read_json(path)?,
        None => "{}".to_string(),
    };

    let posts =
        postadmin_core::apply_json(&posts_json, &filters_json).map_err(|err| err.to_string())?;
    for post in posts {
        println!(
            "{}\t{}\t{}\t{}",
            post.timestamp, post.id, post.category_id, post.title
        );
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("cannot read `{}`: {err}", path.display()))
}
