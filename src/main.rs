use clap::Parser;
use phylopipe::cli::{Args, Commands};
use phylopipe::helper::PipelineError;
use phylopipe::pipelines;

fn main() {
    let args = Args::parse();

    let result = match args.command {
        Commands::Align { root } => pipelines::align_all(&root).map(|_| ()),
        Commands::Tree { root, params } => {
            pipelines::build_all(&root, params.as_deref()).map(|_| ())
        }
        Commands::Matrix {
            root,
            source,
            entrez,
        } => pipelines::matrix_all(&root, &source, &entrez).map(|_| ()),
        Commands::Decorate {
            root,
            skip_existing,
        } => pipelines::decorate_all(&root, skip_existing).map(|_| ()),
        Commands::Run {
            root,
            source,
            entrez,
            params,
            skip_existing,
        } => run_all(&root, &source, &entrez, params.as_deref(), skip_existing),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_all(
    root: &str,
    source: &str,
    entrez: &str,
    params: Option<&str>,
    skip_existing: bool,
) -> Result<(), PipelineError> {
    pipelines::align_all(root)?;
    pipelines::build_all(root, params)?;
    pipelines::matrix_all(root, source, entrez)?;
    pipelines::decorate_all(root, skip_existing)?;
    Ok(())
}
