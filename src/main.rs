//! Lumius — control surface, remote panel and launcher for the visualizer.

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use lumius::config::LumiusConfig;
use lumius::launch::{launch_channel, LaunchError, LaunchEvent, Sequencer, SystemHost};
use lumius::logging::{self, LogTarget};
use lumius::publish::ControlMessage;
use lumius::tui::theme;
use lumius::tui::{run_splash, App, SplashScreen};

#[derive(Parser)]
#[command(
    name = "lumius",
    version,
    about = "Terminal control surface for the LUMIUS visual synthesizer."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Control the visualizer on this machine through its control file.
    Panel {
        /// Control file to write (overrides the config).
        #[arg(long)]
        control_file: Option<PathBuf>,
        /// Config file (default ~/.lumius/config.yaml).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Control a visualizer on another machine over SSH.
    Remote {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Control file path on the remote host.
        #[arg(long)]
        control_file: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Build and start the visualizer behind a progress splash.
    Launch {
        /// Print progress to stderr instead of drawing the splash.
        #[arg(long)]
        headless: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the decoded contents of the control file.
    Inspect {
        #[arg(long)]
        control_file: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "fatal");
            eprintln!("lumius: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let interrupted = interrupt_flag()?;
    match cli.command {
        Commands::Panel {
            control_file,
            config,
        } => {
            init_file_logging();
            let mut cfg = LumiusConfig::load(config.as_deref());
            if let Some(path) = control_file {
                cfg.control_file = path;
            }
            info!(control_file = %cfg.control_file.display(), "starting local control surface");
            run_surface(App::local(&cfg), &interrupted)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Remote {
            host,
            user,
            port,
            control_file,
            config,
        } => {
            init_file_logging();
            let mut cfg = LumiusConfig::load(config.as_deref());
            if let Some(host) = host {
                cfg.remote.host = host;
            }
            if let Some(user) = user {
                cfg.remote.user = user;
            }
            if let Some(port) = port {
                cfg.remote.port = port;
            }
            if let Some(path) = control_file {
                cfg.remote.control_file = path;
            }
            info!(host = %cfg.remote.host, "starting remote control surface");
            run_surface(App::remote(&cfg), &interrupted)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Launch { headless, config } => {
            if headless {
                logging::init(&LogTarget::Stderr)?;
            } else {
                init_file_logging();
            }
            let cfg = LumiusConfig::load(config.as_deref());
            run_launch(cfg, config, headless, &interrupted)
        }
        Commands::Inspect {
            control_file,
            config,
        } => {
            logging::init(&LogTarget::Stderr)?;
            let cfg = LumiusConfig::load(config.as_deref());
            let path = control_file.unwrap_or(cfg.control_file);
            inspect(&path)
        }
    }
}

/// Interactive modes own the terminal, so logs go to a file. Without one the
/// process simply runs unlogged.
fn init_file_logging() {
    if let Err(e) = logging::init(&LogTarget::default_file()) {
        eprintln!("lumius: logging disabled: {e}");
    }
}

fn interrupt_flag() -> Result<Arc<AtomicBool>, Box<dyn Error>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = flag.clone();
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed))?;
    Ok(flag)
}

type Tty = Terminal<CrosstermBackend<io::Stdout>>;

fn setup_terminal() -> io::Result<Tty> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Tty) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()
}

/// Run `body` inside the alternate screen, restoring the terminal even when it fails.
fn with_terminal<T>(body: impl FnOnce(&mut Tty) -> io::Result<T>) -> io::Result<T> {
    let mut terminal = setup_terminal()?;
    let result = body(&mut terminal);
    restore_terminal(&mut terminal)?;
    result
}

fn run_surface(mut app: App, interrupted: &AtomicBool) -> Result<(), Box<dyn Error>> {
    with_terminal(|terminal| app.run(terminal, interrupted))?;
    info!("control surface closed");
    Ok(())
}

fn run_launch(
    cfg: LumiusConfig,
    config_path: Option<PathBuf>,
    headless: bool,
    interrupted: &AtomicBool,
) -> Result<ExitCode, Box<dyn Error>> {
    let inline_surface = cfg.launch.surface_inline();
    let host = SystemHost::new(cfg.launch.clone(), config_path);
    let (tx, rx) = launch_channel();
    let handle = Sequencer::new(host, cfg.launch.stage_delay()).spawn(tx);

    let result = if headless {
        let mut result = Err(LaunchError::Cancelled);
        while let Some(event) = rx.recv() {
            if interrupted.swap(false, Ordering::Relaxed) {
                handle.cancel();
            }
            match event {
                LaunchEvent::Progress(p) => {
                    eprintln!("[{:>3}%] {} {}", p.percent, p.status, p.detail);
                }
                LaunchEvent::Finished(r) => {
                    result = r;
                    break;
                }
            }
        }
        result
    } else {
        let mut splash = SplashScreen::new(theme::load_theme(&cfg.theme));
        with_terminal(|terminal| {
            run_splash(terminal, &mut splash, &rx, &handle, interrupted)
        })?
    };
    handle.join();

    match result {
        Ok(()) => {
            info!("launch complete");
            if inline_surface && !headless {
                run_surface(App::local(&cfg), interrupted)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "launch aborted");
            eprintln!("lumius: {e}");
            if let LaunchError::Build { output, .. } = &e {
                if !output.is_empty() {
                    eprintln!("{output}");
                }
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn inspect(path: &Path) -> Result<ExitCode, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    match ControlMessage::parse(&text)? {
        ControlMessage::Shutdown => println!("{}: shutdown requested", path.display()),
        ControlMessage::State(snapshot) => {
            println!("{}", path.display());
            println!(
                "  effect     {} ({})",
                snapshot.effect.id(),
                snapshot.effect.name()
            );
            println!(
                "  color      r={} g={} b={}",
                snapshot.color.r, snapshot.color.g, snapshot.color.b
            );
            println!("  speed      {:.1}", snapshot.speed);
            println!("  intensity  {:.1}", snapshot.intensity);
            println!("  volume     {:.0}", snapshot.volume);
            if let Some(music) = snapshot.music {
                println!("  music      {music}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
