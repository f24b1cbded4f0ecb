use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Push local files to remote object storage", long_about = None)]
pub struct Cli {
    #[clap(
        short = 'l',
        long = "local",
        required = true,
        num_args = 1..,
        help = "Local file or directory to push (repeatable)"
    )]
    pub locals: Vec<String>,
    #[clap(
        short = 'r',
        long = "remote",
        required = true,
        num_args = 1..,
        help = "Destination URL, e.g. s3://bucket/prefix (repeatable)"
    )]
    pub remotes: Vec<String>,
    #[clap(
        short = 'c',
        long = "concurrency",
        help = "Workers per destination batch (default: chosen from batch size)"
    )]
    pub concurrency: Option<usize>,
    #[clap(short, long, help = "Print verbose diagnostic logs for debugging")]
    pub verbose: bool,
    #[clap(long, help = "Emit a machine-readable JSON summary per destination")]
    pub json: bool,
}
