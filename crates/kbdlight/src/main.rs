//! kbdlight: keyboard backlight color and brightness control.
//!
//! Without arguments, opens the control panel. `--set-backlight` writes the
//! device directly and exits; the panel re-invokes the binary that way under
//! an elevation helper when the sysfs attributes are not writable.

use std::path::PathBuf;

use clap::Parser;
use kbdlight_lib::config::Config;
use kbdlight_lib::device::KeyboardBacklight;

mod cli;
#[cfg(target_os = "linux")]
mod panel;

#[derive(Parser)]
#[command(
    name = "kbdlight",
    version,
    about = "Keyboard backlight color and brightness control"
)]
struct Args {
    /// Write BRIGHTNESS (0-255) and a comma-separated R,G,B color to the device, then exit
    #[arg(long, num_args = 2, value_names = ["BRIGHTNESS", "R,G,B"])]
    set_backlight: Option<Vec<String>>,

    /// Show the current backlight state and configuration, then exit
    #[arg(long, conflicts_with = "set_backlight")]
    status: bool,

    /// Output as JSON (for --status)
    #[arg(long, requires = "status")]
    json: bool,

    /// Backlight device directory (overrides the config file)
    #[arg(long, value_name = "DIR")]
    device: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn interactive(&self) -> bool {
        self.set_backlight.is_none() && !self.status
    }

    /// The elevated child gets everything on its command line. Skipping the
    /// config keeps root's config warnings out of its stderr, which the
    /// panel shows as the failure diagnostic.
    fn needs_config(&self) -> bool {
        !(self.set_backlight.is_some() && self.device.is_some())
    }
}

/// Logger for one-shot CLI paths: stderr, terse.
fn init_cli_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Initialize the control panel logger, directing output to a log file.
///
/// Falls back to stderr if the log file can't be opened.
#[cfg(target_os = "linux")]
fn init_panel_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
    builder.format_target(false);

    if let Some(log_path) = Config::log_path() {
        if let Some(dir) = log_path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Ok(file) = std::fs::File::create(&log_path) {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }

    builder.init();
}

fn main() {
    let args = Args::parse();

    if args.interactive() {
        #[cfg(target_os = "linux")]
        init_panel_logger(args.verbose);
        #[cfg(not(target_os = "linux"))]
        init_cli_logger(args.verbose);
    } else {
        init_cli_logger(args.verbose);
    }

    let config = if args.needs_config() {
        cli::load_config(args.config.as_deref())
    } else {
        Config::default()
    };
    let device = match &args.device {
        Some(dir) => KeyboardBacklight::new(dir),
        None => config.device(),
    };
    log::debug!("device directory: {}", device.dir().display());

    if let Some(values) = &args.set_backlight {
        if let Err(e) = cli::cmd_set_backlight(&device, values) {
            eprintln!("Error: {e}");
            std::process::exit(cli::SET_BACKLIGHT_FAILED);
        }
        return;
    }

    if args.status {
        if let Err(e) = cli::cmd_status(&device, &config, args.config.as_deref(), args.json) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return;
    }

    #[cfg(target_os = "linux")]
    {
        if let Err(e) = panel::run(device, &config) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = device;
        eprintln!("The control panel is only available on Linux.");
        eprintln!("Use --set-backlight or --status for command-line usage.");
        std::process::exit(1);
    }
}
