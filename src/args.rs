use std::env;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "config.json";
const DEFAULT_ASSETS: &str = "assets";

#[derive(Debug)]
pub struct Args {
    pub config_path: PathBuf,
    pub asset_root: PathBuf,
    /// Replay a still screenshot instead of capturing the display
    pub replay: Option<PathBuf>,
    /// Write every new overlay to this PNG
    pub dump_overlay: Option<PathBuf>,
    pub debug_mode: bool,
}

impl Args {
    pub fn parse() -> Option<Self> {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse flags without the program name. `None` means exit (help,
    /// version or a bad flag, already reported).
    pub fn parse_from(args: impl IntoIterator<Item = String>) -> Option<Self> {
        let mut config_path = PathBuf::from(DEFAULT_CONFIG);
        let mut asset_root = PathBuf::from(DEFAULT_ASSETS);
        let mut replay: Option<PathBuf> = None;
        let mut dump_overlay: Option<PathBuf> = None;
        let mut debug_mode: bool = false;

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!("Buff Gauge v{}", env!("CARGO_PKG_VERSION"));
                return None;
            } else if arg == "--debug" {
                debug_mode = true;
            } else if let Some(val) = arg.strip_prefix("--config=") {
                match non_empty_path(val) {
                    Some(path) => config_path = path,
                    None => {
                        eprintln!("❌ Missing value for --config=");
                        return None;
                    }
                }
            } else if let Some(val) = arg.strip_prefix("--assets=") {
                match non_empty_path(val) {
                    Some(path) => asset_root = path,
                    None => {
                        eprintln!("❌ Missing value for --assets=");
                        return None;
                    }
                }
            } else if let Some(val) = arg.strip_prefix("--replay=") {
                replay = non_empty_path(val);
                if replay.is_none() {
                    eprintln!("❌ Missing value for --replay=");
                    return None;
                }
            } else if let Some(val) = arg.strip_prefix("--dump-overlay=") {
                dump_overlay = non_empty_path(val);
                if dump_overlay.is_none() {
                    eprintln!("❌ Missing value for --dump-overlay=");
                    return None;
                }
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            }
        }

        Some(Args {
            config_path,
            asset_root,
            replay,
            dump_overlay,
            debug_mode,
        })
    }
}

fn non_empty_path(val: &str) -> Option<PathBuf> {
    (!val.is_empty()).then(|| PathBuf::from(val))
}

fn print_help() {
    println!("🎯 Buff Gauge - buff stack overlay");
    println!();
    println!("USAGE:");
    println!("    buff-gauge [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --config=PATH         Settings file written by the setup wizard (default: config.json)");
    println!("    --assets=DIR          Template, icon and sound directory (default: assets)");
    println!("    --replay=PNG          Recognize a saved screenshot instead of the live display");
    println!("    --dump-overlay=PNG    Save every new overlay image to this file");
    println!("    --debug               Enable debug logging (RUST_LOG overrides)");
    println!("    --help, -h            Show this help message");
    println!("    --version, -v         Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    buff-gauge --config=config.json");
    println!("    buff-gauge --replay=screenshot.png --dump-overlay=overlay.png --debug");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Option<Args> {
        Args::parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.config_path, PathBuf::from("config.json"));
        assert_eq!(args.asset_root, PathBuf::from("assets"));
        assert!(args.replay.is_none());
        assert!(args.dump_overlay.is_none());
        assert!(!args.debug_mode);
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "--config=wizard.json",
            "--assets=/opt/gauge",
            "--replay=shot.png",
            "--dump-overlay=out.png",
            "--debug",
        ])
        .unwrap();
        assert_eq!(args.config_path, PathBuf::from("wizard.json"));
        assert_eq!(args.asset_root, PathBuf::from("/opt/gauge"));
        assert_eq!(args.replay, Some(PathBuf::from("shot.png")));
        assert_eq!(args.dump_overlay, Some(PathBuf::from("out.png")));
        assert!(args.debug_mode);
    }

    #[test]
    fn test_rejects_unknown_and_empty() {
        assert!(parse(&["--gui"]).is_none());
        assert!(parse(&["--replay="]).is_none());
        assert!(parse(&["--config="]).is_none());
    }
}
