//! Continuous watch: the polling controller drives an in-memory board,
//! which is reprinted whenever a cycle changed it.

use std::sync::Arc;

use tabled::Tabled;
use tokio::sync::mpsc;

use portwatch_core::{
    ChildKind, CycleOutcome, CycleReport, MemoryBoard, MemoryTarget, PollingController, PortId,
    PortSnapshot, StatusClient, TargetRole,
};

use crate::cli::{OutputFormat, WatchArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::status::PortRow;

type Watcher = PollingController<StatusClient, MemoryBoard>;

// ── Board rendering ─────────────────────────────────────────────────

#[derive(Tabled)]
struct BoardRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Target")]
    role: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Status")]
    badge: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Details")]
    details: String,
}

impl BoardRow {
    fn new(port: &PortId, target: &MemoryTarget, color: bool) -> Self {
        let link = target.child(ChildKind::LinkIndicator);
        let device = target
            .child(ChildKind::ConnectedDevice)
            .filter(|e| e.visible);

        Self {
            port: port.to_string(),
            role: target.role.to_string(),
            link: link.map_or_else(String::new, |e| output::paint(&e.text, e.tone, color)),
            badge: link.and_then(|e| e.badge.clone()).unwrap_or_default(),
            device: device.map_or_else(|| "-".into(), |e| output::paint(&e.text, e.tone, color)),
            details: device.map(|e| e.lines.join("\n")).unwrap_or_default(),
        }
    }
}

fn board_rows(board: &MemoryBoard, color: bool) -> Vec<BoardRow> {
    board
        .ports()
        .flat_map(|port| {
            board
                .targets(port.as_str())
                .iter()
                .map(move |target| BoardRow::new(port, target, color))
        })
        .collect()
}

fn header(report: &CycleReport) -> String {
    format!(
        "cycle {} ({}) at {}",
        report.sequence,
        report.trigger,
        report
            .completed_at
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
    )
}

/// Targets per port: one status card, plus a selector entry if asked.
///
/// With explicit ports only those are bound; otherwise every port is bound
/// the first time the host reports it.
fn board(args: &WatchArgs) -> MemoryBoard {
    let mut roles = vec![TargetRole::StatusCard];
    if args.selectors {
        roles.push(TargetRole::Selector);
    }

    if args.ports.is_empty() {
        return MemoryBoard::with_auto_bind(roles);
    }

    let mut board = MemoryBoard::new();
    for port in &args.ports {
        for role in &roles {
            board.bind(PortId::new(port.as_str()), *role);
        }
    }
    board
}

/// Enter presses on stdin. A plain thread keeps a pending blocking read
/// from holding up runtime shutdown.
fn enter_presses() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: StatusClient,
    args: WatchArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let controller = PollingController::new(settings.monitor.clone(), client, board(&args))?;
    let color = output::should_color(settings.color);
    let mut cycles = controller.cycles();
    let mut enter = enter_presses();
    let mut last_mutations = None;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    controller.start().await;
    if !settings.quiet {
        let profile = settings
            .profile
            .as_deref()
            .map(|p| format!(" [{p}]"))
            .unwrap_or_default();
        eprintln!(
            "Watching {}{profile} every {}ms. Enter: refresh now, Ctrl-C: quit.",
            settings.monitor.url,
            settings.monitor.poll_interval.as_millis()
        );
    }

    let result = loop {
        tokio::select! {
            biased;
            signal = &mut ctrl_c => break signal.map_err(CliError::from),
            changed = cycles.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let report = cycles.borrow_and_update().clone();
                let Some(report) = report else { continue };
                let redrawn =
                    redraw(&controller, &report, &args, settings, color, &mut last_mutations).await;
                if let Err(e) = redrawn {
                    break Err(e);
                }
            }
            Some(()) = enter.recv() => {
                if controller.refresh_now().await && !settings.quiet {
                    eprintln!(
                        "Discovery requested, re-polling in {}ms",
                        settings.monitor.discovery_cooldown.as_millis()
                    );
                }
            }
        }
    };

    controller.stop().await;
    result
}

async fn redraw(
    controller: &Watcher,
    report: &CycleReport,
    args: &WatchArgs,
    settings: &Settings,
    color: bool,
    last_mutations: &mut Option<usize>,
) -> Result<(), CliError> {
    // The controller already logged the failure; the board is unchanged.
    if matches!(report.outcome, CycleOutcome::Failed { .. }) {
        return Ok(());
    }

    let (mutations, rows) = controller
        .with_targets(|board| (board.mutation_count(), board_rows(board, color)))
        .await;
    if *last_mutations == Some(mutations) {
        return Ok(());
    }
    *last_mutations = Some(mutations);

    let out = match settings.output {
        OutputFormat::Table => format!("{}\n{}", header(report), output::render_table(&rows)),
        format => {
            let mut snapshots: Vec<Arc<PortSnapshot>> = controller.snapshots().await;
            if !args.ports.is_empty() {
                snapshots.retain(|s| args.ports.iter().any(|p| p == s.port.as_str()));
            }
            output::render_list(
                format,
                &snapshots,
                |s| PortRow::new(s, color),
                |s| s.port.to_string(),
            )?
        }
    };
    output::print_output(&out, settings.quiet);
    Ok(())
}
