use std::path::PathBuf;

use clap::Parser;

/// Easel: an editor shell that loads feature packages and hosts their panels.
#[derive(Parser, Debug)]
#[command(name = "easel", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Extra package search path (repeatable).
    #[arg(long = "path", value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Package root to load at startup (repeatable).
    #[arg(long = "load", value_name = "DIR")]
    pub load: Vec<PathBuf>,

    /// Panel to open after loading, as <package>.<panel> (repeatable).
    #[arg(long = "open", value_name = "PANEL_ID")]
    pub open: Vec<String>,

    /// Reload packages when their files change. Runs until interrupted.
    #[arg(long)]
    pub watch: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeatable_flags() {
        let args = Args::parse_from([
            "easel",
            "--path",
            "/pkgs",
            "--load",
            "/pkgs/a",
            "--load",
            "/pkgs/b",
            "--open",
            "a.main",
            "--watch",
        ]);
        assert_eq!(args.paths, vec![PathBuf::from("/pkgs")]);
        assert_eq!(args.load.len(), 2);
        assert_eq!(args.open, vec!["a.main"]);
        assert!(args.watch);
        assert!(args.config.is_none());
    }

    #[test]
    fn defaults_are_empty() {
        let args = Args::parse_from(["easel"]);
        assert!(args.paths.is_empty());
        assert!(!args.watch);
        assert!(args.log_level.is_none());
    }
}
