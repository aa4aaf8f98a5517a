use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};
use vfs_shell::logging::init_logging;
use vfs_shell::{replay, ActionLogger, CommandEngine, Config, ReplayStatus, Shell, VirtualFilesystem};

#[derive(Parser)]
#[command(name = "vfs-shell")]
#[command(about = "A command shell over a filesystem unpacked from an archive")]
#[command(version)]
struct Cli {
    /// Path to the JSON config file
    config: PathBuf,
}

fn fail(message: String) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = Config::load(&cli.config).unwrap_or_else(|e| fail(e.to_string()));
    let fs = VirtualFilesystem::mount(&config.archive_path, &config.mount_dir)
        .unwrap_or_else(|e| fail(e.to_string()));
    let logger = ActionLogger::init(&config.log_path).unwrap_or_else(|e| fail(e.to_string()));

    let mut engine = CommandEngine::new(Arc::new(fs), logger, config.identity());

    let stdout = std::io::stdout();
    let report = replay(
        config.startup_script_path.as_deref(),
        &mut engine,
        &mut stdout.lock(),
    );
    if report.status == ReplayStatus::Exited {
        return;
    }

    // Raw bytes so one undecodable line cannot end the session.
    let mut input = std::io::stdin().lock();
    let mut buf = Vec::new();
    loop {
        print!("{}", engine.prompt());
        let _ = stdout.lock().flush();

        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "cannot read input");
                break;
            }
        }
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(&['\n', '\r'][..]);

        let output = engine.execute(line);
        if !output.is_empty() {
            println!("{}", output);
        }
        if engine.has_exited() {
            break;
        }
    }

    info!("session closed");
}
