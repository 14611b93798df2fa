use std::path::PathBuf;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// TOML file overriding the default credential, profile, wallet and keystore locations
    #[arg(long, short_alias = 'c')]
    pub config: Option<PathBuf>
}
