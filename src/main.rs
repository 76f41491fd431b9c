use clap::Parser;
use moon_icon_gen::icon_gen::{self, Capabilities};
use std::{path::PathBuf, process::ExitCode};

#[derive(Debug, Parser)]
#[clap(
    name = "moon-icon-gen",
    about = "Generate the crescent-moon placeholder icons for the dark theme extension"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = "icons")]
    output: PathBuf,

    /// Also write manifest-icons.json, the icon section of the extension manifest
    #[clap(long)]
    manifest: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let options = icon_gen::Args {
        output: args.output,
        manifest: args.manifest,
    };

    let result = icon_gen::generate_icons(&options, Capabilities::detect());
    ExitCode::from(icon_gen::report(result, &mut std::io::stdout()))
}
