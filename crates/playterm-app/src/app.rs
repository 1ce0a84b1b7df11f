use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::BufRead;
use std::path::Path;
use tokio::sync::mpsc;

use playterm_client::{
    SessionBootstrap, SessionId, SessionManager, StaticVerifier, SurfaceMap, TerminalWidget,
};
use playterm_terminal::{ElementRef, PassthroughWidget, ScreenWidget, TranscriptWidget};
use playterm_types::{Geometry, ServerMessage};

use crate::cli::Commands;
use crate::config::AppConfig;
use crate::viewport;

/// Target key used by `attach`, which has no user-supplied targets
pub const ATTACH_TARGET: &str = "attach";

const TRANSCRIPT_PREFIX: &str = "transcript:";

/// Things happening on the local side of the session
#[derive(Debug)]
enum LocalEvent {
    Line(String),
    StdinClosed,
    Resize,
    Interrupt,
}

enum Step {
    Inbound(Option<ServerMessage>),
    Local(Option<LocalEvent>),
}

/// Run a subcommand to completion
pub async fn run(command: &Commands, config: AppConfig) -> Result<()> {
    let (manager, active) = match command {
        Commands::New { token, targets } => start_new(token, targets, &config).await?,
        Commands::Attach { session, instance } => {
            attach(session, instance.as_deref(), &config).await?
        }
    };

    interact(manager, active).await
}

/// Surface mapping each target to stdout, plus a transcript when configured
pub fn build_surface(targets: &[String], config: &AppConfig) -> SurfaceMap {
    let geometry = config.client.default_geometry;
    let transcript_dir = config.transcript_dir.clone();

    let mut surface = SurfaceMap::new(move |element: &ElementRef| -> Box<dyn TerminalWidget> {
        match (element.id().strip_prefix(TRANSCRIPT_PREFIX), transcript_dir.as_deref()) {
            (Some(label), Some(dir)) => transcript_widget(dir, label, geometry),
            _ => Box::new(
                PassthroughWidget::new(std::io::stdout(), geometry)
                    .with_geometry_source(Box::new(viewport::probe(geometry))),
            ),
        }
    });

    for target in targets {
        surface.add_element(target, ElementRef::new(target.as_str()));
        if config.transcript_dir.is_some() {
            let id = format!("{}{}", TRANSCRIPT_PREFIX, transcript_label(target));
            surface.add_element(target, ElementRef::new(id));
        }
    }

    surface
}

fn transcript_widget(dir: &Path, label: &str, geometry: Geometry) -> Box<dyn TerminalWidget> {
    match TranscriptWidget::create(dir, label, geometry) {
        Ok(widget) => {
            log::info!("Recording {} to {}", label, widget.path().display());
            Box::new(widget)
        }
        Err(e) => {
            // Off-screen sink; the binding still counts
            log::warn!("Transcript for {} unavailable: {:#}", label, e);
            Box::new(ScreenWidget::new(geometry))
        }
    }
}

/// File-name-safe label for a target key
pub fn transcript_label(target: &str) -> String {
    let label: String = target
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let label = label.trim_matches('_');
    if label.is_empty() {
        "terminal".to_string()
    } else {
        label.to_string()
    }
}

async fn start_new(
    token: &str,
    targets: &[String],
    config: &AppConfig,
) -> Result<(SessionManager, String)> {
    let surface = build_surface(targets, config);
    let bootstrap = SessionBootstrap::new(config.client.clone(), StaticVerifier::new(token));

    let booted = bootstrap
        .new_session(targets, Box::new(surface))
        .await
        .context("Failed to create session")?;

    eprintln!(
        "{} {}",
        "Session".bold(),
        booted.manager.session_id().as_str().cyan()
    );

    let mut active = None;
    for outcome in &booted.terminals {
        match &outcome.result {
            Ok(descriptor) => {
                eprintln!("  {} {} → {}", "✓".green(), outcome.target, descriptor.name.green());
                if active.is_none() {
                    active = Some(descriptor.name.clone());
                }
            }
            Err(e) => eprintln!("  {} {}: {}", "✗".red(), outcome.target, e.to_string().red()),
        }
    }

    match active {
        Some(name) => Ok((booted.manager, name)),
        None => {
            booted.manager.shutdown().await;
            bail!("No terminal could be created");
        }
    }
}

async fn attach(
    session: &str,
    instance: Option<&str>,
    config: &AppConfig,
) -> Result<(SessionManager, String)> {
    let surface = build_surface(&[ATTACH_TARGET.to_string()], config);
    let mut manager = SessionManager::connect(
        SessionId::new(session),
        config.client.clone(),
        Box::new(surface),
    )
    .await
    .with_context(|| format!("Failed to attach to session {}", session))?;

    let name = match instance {
        Some(name) => {
            manager.create_terminal(ATTACH_TARGET, name);
            name.to_string()
        }
        None => match manager.terminal(ATTACH_TARGET).await {
            Ok(descriptor) => descriptor.name,
            Err(e) => {
                manager.shutdown().await;
                return Err(e).context("Failed to create instance");
            }
        },
    };

    eprintln!(
        "{} {} {} {}",
        "Attached to".bold(),
        session.cyan(),
        "as".bold(),
        name.green()
    );
    Ok((manager, name))
}

fn spawn_local_events(tx: mpsc::UnboundedSender<LocalEvent>) {
    // Blocking reads on a dedicated thread keep runtime shutdown from waiting on stdin
    let stdin_tx = tx.clone();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if stdin_tx.send(LocalEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        let _ = stdin_tx.send(LocalEvent::StdinClosed);
    });

    let interrupt_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = interrupt_tx.send(LocalEvent::Interrupt);
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::window_change()) {
            Ok(mut sigwinch) => {
                tokio::spawn(async move {
                    while sigwinch.recv().await.is_some() {
                        if tx.send(LocalEvent::Resize).is_err() {
                            break;
                        }
                    }
                });
            }
            Err(e) => log::warn!("Window size changes will not be tracked: {}", e),
        }
    }
}

/// Forward stdin lines to `active` until stdin closes, Ctrl-C, or the remote side hangs up
async fn interact(mut manager: SessionManager, active: String) -> Result<()> {
    let (tx, mut events) = mpsc::unbounded_channel();
    spawn_local_events(tx);

    manager.on_viewport_change();

    loop {
        let step = tokio::select! {
            message = manager.next_message() => Step::Inbound(message),
            event = events.recv() => Step::Local(event),
        };

        match step {
            Step::Inbound(Some(message)) => manager.handle(message),
            Step::Inbound(None) => {
                eprintln!("\n{}", "Connection closed by server".yellow());
                break;
            }
            Step::Local(Some(LocalEvent::Line(line))) => {
                manager.send_input(&active, &format!("{}\n", line));
            }
            Step::Local(Some(LocalEvent::Resize)) => {
                if let Some(geometry) = manager.on_viewport_change() {
                    log::debug!("Proposed viewport {}", geometry);
                }
            }
            Step::Local(Some(LocalEvent::Interrupt)) => {
                eprintln!("\n{}", "Interrupted".yellow());
                break;
            }
            Step::Local(Some(LocalEvent::StdinClosed)) | Step::Local(None) => break,
        }
    }

    manager.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use playterm_client::{ClientConfig, Surface};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn config(transcript_dir: Option<&Path>) -> AppConfig {
        AppConfig {
            client: ClientConfig::default(),
            transcript_dir: transcript_dir.map(Path::to_path_buf),
        }
    }

    #[test]
    fn test_transcript_label_is_file_safe() {
        assert_eq!(transcript_label(".term1"), "term1");
        assert_eq!(transcript_label("#node a/b"), "node_a_b");
        assert_eq!(transcript_label("..."), "terminal");
    }

    #[test]
    fn test_surface_maps_each_target_to_stdout() {
        let targets = vec!["one".to_string(), "two".to_string()];
        let surface = build_surface(&targets, &config(None));

        assert_eq!(surface.elements("one"), vec![ElementRef::new("one")]);
        assert_eq!(surface.elements("two"), vec![ElementRef::new("two")]);
        assert!(surface.elements("three").is_empty());
    }

    #[test]
    fn test_surface_adds_transcript_element() {
        let dir = TempDir::new().unwrap();
        let targets = vec![".term".to_string()];
        let mut surface = build_surface(&targets, &config(Some(dir.path())));

        let elements = surface.elements(".term");
        assert_eq!(
            elements,
            vec![ElementRef::new(".term"), ElementRef::new("transcript:term")]
        );

        let mut widget = surface.create_widget(&elements[1]);
        widget.open(&elements[1]);
        widget.write("hello");
        widget.dispose();
        assert_eq!(widget.widget_name(), "transcript");
        assert!(dir.path().join("term.jsonl").exists());
    }
}
