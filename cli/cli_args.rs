use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble a project's source files into a single context document.",
    long_about = "codepack walks the target project, gathers files by a fixed set of ordered \ncategories (core config, sources, tests, scripts, database schema, deployment) \nand concatenates them into one timestamped artifact, prefixed with analysis \ninstructions and a directory structure snapshot.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  codepack\n  codepack --project-root ~/work/bot -o /tmp/context\n  codepack --flat-structure -q"
)]
pub struct Cli {
    #[arg(
        long,
        help = "Specify the target project directory (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        help = "Directory to place the run artifact in (default: project root).",
        help_heading = "Output",
        value_name = "PATH"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        help = "Use a flat directory listing instead of the external `tree` command.",
        help_heading = "Output"
    )]
    pub flat_structure: bool,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase message verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short,
        long,
        help = "Silence progress output and warnings (artifact is unaffected)."
    )]
    pub quiet: bool,
}
