use std::io::Read;
use std::process::ExitCode;
use std::time::Duration;

use ada::cli::{self, Commands};
use ada::config::{ConfigStore, Service};
use ada::error::AdaError;
use ada::paths::Paths;
use ada::status::{classify, ServiceState};
use ada::supervisor::Supervisor;
use ada::{logs, process};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = cli::parse_args();
    init_logging(args.log_level.map(|level| level.as_str()));

    let paths = match Paths::resolve().and_then(|paths| {
        paths.ensure_dirs()?;
        Ok(paths)
    }) {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("ada: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&paths, args.command()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ada: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(override_level: Option<&'static str>) {
    let filter = match override_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(paths: &Paths, command: Commands) -> Result<(), AdaError> {
    match command {
        Commands::Status { name } => cmd_status(paths, name),
        Commands::Start { name } => cmd_for_each(paths, &name, process::start),
        Commands::Stop { name } => cmd_stop(paths, &name),
        Commands::Restart { name } => cmd_for_each(paths, &name, process::restart),
        Commands::Add { name, cmd, dir, env_file } => {
            ConfigStore::new(paths).add(Service {
                name,
                cmd,
                dir,
                env_file,
                enabled: true,
            })
        }
        Commands::Remove { name } => {
            process::stop(paths, &name)?;
            ConfigStore::new(paths).remove(&name)?;
            ada::state::StateStore::new(paths).remove(&name)
        }
        Commands::Enable { name } => ConfigStore::new(paths).set_enabled(&name, true),
        Commands::Disable { name } => {
            lookup(paths, &name)?;
            process::stop(paths, &name)?;
            ConfigStore::new(paths).set_enabled(&name, false)
        }
        Commands::Logs { name, lines, follow } => cmd_logs(paths, &name, lines, follow),
        Commands::Watch => Supervisor::new(paths).run(),
    }
}

fn lookup(paths: &Paths, name: &str) -> Result<Service, AdaError> {
    ConfigStore::new(paths)
        .lookup(name)?
        .ok_or_else(|| AdaError::UnknownService(name.to_string()))
}

/// Runs `action` against either a single named service or every enabled
/// service when `name` is the literal `all`. The `all` form always exits
/// 0: one service's failure is reported but never fails the batch, the
/// same policy the supervisor loop itself follows.
fn cmd_for_each(
    paths: &Paths,
    name: &str,
    action: fn(&Paths, &Service) -> Result<(), AdaError>,
) -> Result<(), AdaError> {
    if name == "all" {
        for service in ConfigStore::new(paths).list()?.into_iter().filter(|s| s.enabled) {
            if let Err(err) = action(paths, &service) {
                eprintln!("ada: {}: {err}", service.name);
            }
        }
        Ok(())
    } else {
        let service = lookup(paths, name)?;
        action(paths, &service)
    }
}

fn cmd_stop(paths: &Paths, name: &str) -> Result<(), AdaError> {
    if name == "all" {
        let mut first_err = None;
        for service in ConfigStore::new(paths).list()? {
            if let Err(err) = process::stop(paths, &service.name) {
                eprintln!("ada: {}: {err}", service.name);
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    } else {
        lookup(paths, name)?;
        process::stop(paths, name)
    }
}

fn cmd_status(paths: &Paths, name: Option<String>) -> Result<(), AdaError> {
    let services = match name {
        Some(name) => vec![lookup(paths, &name)?],
        None => ConfigStore::new(paths).list()?,
    };

    match Supervisor::running_pid(paths) {
        Some(pid) => println!("supervisor: running (pid {pid})"),
        None => println!("supervisor: not running"),
    }

    if services.is_empty() {
        println!("no services configured");
        return Ok(());
    }

    println!(
        "{:<20} {:<12} {:<8} {:<10} {:<8}  LAST LOG",
        "NAME", "STATE", "PID", "UPTIME", "RESTARTS"
    );
    for service in &services {
        let entry = classify(paths, service)?;
        let pid = entry.pid.map(|pid| pid.to_string()).unwrap_or_else(|| "-".to_string());
        let uptime = entry.uptime.unwrap_or_else(|| "-".to_string());
        let last_log = entry.last_log_line.unwrap_or_default();
        let state_label = match entry.state {
            ServiceState::CrashLoop => "CRASH-LOOP".to_string(),
            other => other.to_string(),
        };
        println!(
            "{:<20} {:<12} {:<8} {:<10} {:<8}  {}",
            entry.name, state_label, pid, uptime, entry.restart_count, last_log
        );
    }
    Ok(())
}

fn cmd_logs(paths: &Paths, name: &str, lines: Option<usize>, follow: bool) -> Result<(), AdaError> {
    lookup(paths, name)?;
    let path = paths.log_file(name);

    // Absent `-n`, `logs` defaults to following: print a short tail, then
    // keep streaming. `-n N` without `-f` prints exactly N lines and exits.
    let should_follow = follow || lines.is_none();
    let tail = lines.unwrap_or(ada::constants::LOGS_DEFAULT_FOLLOW_TAIL_LINES);

    for line in logs::tail_lines(&path, tail)? {
        println!("{line}");
    }

    if should_follow {
        let mut file = std::fs::File::open(&path)?;
        let mut offset = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        loop {
            std::thread::sleep(Duration::from_millis(500));
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(offset);
            if size > offset {
                let mut buf = Vec::new();
                use std::io::{Seek, SeekFrom};
                file.seek(SeekFrom::Start(offset))?;
                file.read_to_end(&mut buf)?;
                print!("{}", String::from_utf8_lossy(&buf));
                offset = size;
            }
        }
    }

    Ok(())
}
