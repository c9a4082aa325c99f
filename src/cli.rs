use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "memunzip")]
#[command(version)]
#[command(about = "Read a ZIP archive into memory and print its entries", long_about = None)]
#[command(after_help = "Examples:\n  \
  memunzip notes.zip                   print every text entry in notes.zip\n  \
  memunzip notes.zip 'docs/*.txt'      print only matching entries\n  \
  memunzip -p data.zip img.png > x     send raw entry bytes to a pipe\n  \
  memunzip -v https://example.com/archive.zip   list a remote archive verbosely")]
pub struct Cli {
    /// ZIP file path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Entries to extract (default: all); `*` and `?` wildcards allowed
    #[arg(value_name = "NAMES")]
    pub names: Vec<String>,

    /// List entry names only
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely (sizes, ratio, method, timestamp, CRC)
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Write raw entry bytes to stdout, no banners
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Exclude entries that follow
    #[arg(short = 'x', value_name = "NAME", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Print parser diagnostics to stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Log level implied by the flags
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else if self.is_very_quiet() {
            LevelFilter::Off
        } else if self.is_quiet() {
            LevelFilter::Error
        } else {
            LevelFilter::Warn
        }
    }
}
