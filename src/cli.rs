use clap::builder::styling::{AnsiColor, Color};
use clap::builder::styling::{Style, Styles};
use clap::{ColorChoice, Parser, Subcommand};

pub const BANNER: &str = "\x1b[0;91m██████  ██   ██ ██   ██ ██       █████ \x1b[0m\n\
                          \x1b[0;93m██   ██ ██   ██  ██ ██  ██      ██   ██\x1b[0m\n\
                          \x1b[0;92m██████  ███████   ███   ██      ██   ██\x1b[0m\n\
                          \x1b[0;96m██      ██   ██    ██   ██      ██   ██\x1b[0m\n\
                          \x1b[0;95m██      ██   ██    ██   ███████  █████ \x1b[0m\n";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "phylopipe",
    version = env!("CARGO_PKG_VERSION"),
    about = BANNER,
    color = ColorChoice::Always,
    styles = get_styles(),
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Align every raw sequence file with MAFFT
    #[command(alias = "a")]
    Align {
        /// Root directory of the project
        #[arg(short, long)]
        root: String,
    },

    /// Build a maximum-likelihood tree for every alignment with IQ-TREE
    #[command(alias = "t")]
    Tree {
        /// Root directory of the project
        #[arg(short, long)]
        root: String,

        /// Override the IQ-TREE parameter string (default: model
        /// auto-selection with 1000 SH-aLRT and 1000 bootstrap replicates)
        #[arg(short, long)]
        params: Option<String>,
    },

    /// Run BLAST, fetch taxonomy per hit and assemble data matrices
    #[command(alias = "m")]
    Matrix {
        /// Root directory of the project
        #[arg(short, long)]
        root: String,

        /// Input BLAST db (either 'mito' or '18S')
        #[arg(short, long)]
        source: String,

        /// Entrez email for lookup
        #[arg(short, long)]
        entrez: String,
    },

    /// Decorate every tree with its data matrix
    #[command(alias = "d")]
    Decorate {
        /// Root directory of the project
        #[arg(short, long)]
        root: String,

        /// Skip samples that already have a diagram instead of re-rendering
        #[arg(long, default_value_t = false)]
        skip_existing: bool,
    },

    /// Run all four stages in order
    #[command(alias = "r")]
    Run {
        /// Root directory of the project
        #[arg(short, long)]
        root: String,

        /// Input BLAST db (either 'mito' or '18S')
        #[arg(short, long)]
        source: String,

        /// Entrez email for lookup
        #[arg(short, long)]
        entrez: String,

        /// Override the IQ-TREE parameter string
        #[arg(short, long)]
        params: Option<String>,

        /// Skip samples that already have a diagram instead of re-rendering
        #[arg(long, default_value_t = false)]
        skip_existing: bool,
    },
}

pub fn get_styles() -> Styles {
    Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}
