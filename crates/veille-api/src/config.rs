use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Which flavour of `/analyser` the server exposes.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    /// Accepts author and year filters; returns the report only.
    #[default]
    Filtered,
    /// Ignores filters and also writes the report to `--report-path`.
    Local,
}

/// Media-monitoring report service.
#[derive(Parser, Debug, Clone)]
#[command(name = "veille-api", version, about, long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "VEILLE_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "VEILLE_PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long, env = "VEILLE_VARIANT", value_enum, default_value_t = Variant::Filtered)]
    pub variant: Variant,

    /// Where the local variant writes the latest report
    #[arg(long, env = "VEILLE_REPORT_PATH", default_value = "rapport_veille.html")]
    pub report_path: PathBuf,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "VEILLE_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
