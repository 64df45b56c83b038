use std::io;
use std::path::PathBuf;

use clap::{ArgGroup, Args};

use setupgen::generator::{self, GenerateOptions, GenerateOutput, NameSource};

use super::CmdResult;

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .multiple(false)
        .args(["pom", "name"])
))]
pub struct GenerateArgs {
    /// Read artifactId from this pom file to use as package name
    #[arg(short = 'p', long, value_name = "PATH")]
    pub pom: Option<PathBuf>,

    /// Package name
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Package version (read from the pom file when omitted)
    #[arg(short = 'v', long)]
    pub version: Option<String>,

    /// Directory in which setup.py will be written
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Template to fill instead of the one installed next to the binary
    #[arg(short = 't', long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Print the rendered setup.py instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Print a JSON summary after a successful run
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// The `source` group makes `--pom` and `--name` mutually exclusive and
    /// required, so the fallback arm only fires for hand-built args.
    fn name_source(&self) -> setupgen::Result<NameSource> {
        match (&self.pom, &self.name) {
            (Some(pom), None) => Ok(NameSource::Descriptor(pom.clone())),
            (None, Some(name)) => Ok(NameSource::Explicit(name.clone())),
            _ => Err(setupgen::Error::validation_invalid_argument(
                "pom",
                "Exactly one of --pom or --name is required",
            )),
        }
    }

    fn into_options(self) -> setupgen::Result<GenerateOptions> {
        Ok(GenerateOptions {
            source: self.name_source()?,
            version: self.version,
            output_dir: self.output_dir,
            template: self.template,
            dry_run: self.dry_run,
        })
    }
}

pub fn run(args: GenerateArgs) -> CmdResult<GenerateOutput> {
    let options = args.into_options()?;
    let output = generator::generate(&options, &mut io::stdout().lock())?;
    Ok((output, 0))
}
