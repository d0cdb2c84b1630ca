use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediabro")]
#[command(author, version, about = "Local media browser with M3U playlist generator")]
pub struct Cli {
    /// Web root directory. The filesystem root is used if omitted
    #[arg(default_value = "/")]
    pub webroot: PathBuf,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8088)]
    pub port: u16,

    /// Domain to use in M3U playlists; the current LAN IP address by default
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Don't automatically open the system web browser
    #[arg(short = 'n', long)]
    pub no_browser: bool,

    /// Don't show file sizes in the directory listing
    #[arg(short, long)]
    pub suppress_size: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
