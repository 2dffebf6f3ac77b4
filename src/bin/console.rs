//! Operator console for the rover voice pipeline.
//!
//! Reads line commands from stdin and prints pipeline notifications to
//! stdout; tracing goes to stderr so stdout stays a clean operator
//! surface. The transcription engine is driven externally, so transcripts
//! are injected as lines too — useful for bench exercising the pipeline
//! end to end against a live movement service.
//!
//! Commands:
//!   toggle            toggle listening on/off
//!   voice on|off      enable/disable spoken confirmations
//!   history on|off    open/close the history view (starts polling)
//!   status            print the current controller snapshot
//!   hear <text>       inject an interim transcript
//!   final <text>      inject a final transcript
//!   end               inject a session end (exercises auto-restart)
//!   quit              shut down

use rover_voice::config::RoverConfig;
use rover_voice::movements_api::MovementsClient;
use rover_voice::pipeline;
use rover_voice::recognizer::{ScriptedSource, SessionEvent};
use rover_voice::runtime::RuntimeEvent;
use rover_voice::speech::LoggingSpeaker;
use rover_voice::{history, ListeningState};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(RoverConfig::default_config_path);
    let config = RoverConfig::load_or_init(&config_path)?;
    tracing::info!("config: {}", config_path.display());

    let client = MovementsClient::new(&config.movements)?;

    // Prime the status display with the latest recorded movement, like
    // any post-dispatch refresh: best effort, failure swallowed.
    match client.latest().await {
        Ok(record) => print_status(&record),
        Err(e) => tracing::debug!("initial status fetch failed: {e}"),
    }
    let source = Arc::new(ScriptedSource::new());
    let cancel = CancellationToken::new();

    let handle = pipeline::spawn(
        config.clone(),
        source.clone(),
        client.clone(),
        Arc::new(LoggingSpeaker),
        cancel.clone(),
    );
    let history = history::spawn(client, config.history.clone(), handle.events(), cancel.clone());

    // Event printer.
    let mut events = handle.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print_event(&event),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Stdin loop in a blocking task; lines come back over a channel.
    let (line_tx, mut line_rx) = tokio::sync::mpsc::channel::<String>(8);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut buf = String::new();
        loop {
            buf.clear();
            match stdin.read_line(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if line_tx.blocking_send(buf.trim_end().to_owned()).is_err() {
                        break;
                    }
                }
            }
        }
    });

    println!("rover-voice console ready (wake word: {})", config.recognition.wake_word);
    while let Some(line) = line_rx.recv().await {
        let line = line.trim();
        let (cmd, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };
        match cmd {
            "" => {}
            "toggle" => handle.toggle().await?,
            "voice" => handle.set_spoken_confirmations(rest == "on").await?,
            "history" => history.set_open(rest == "on"),
            "status" => {
                let snapshot = handle.snapshot();
                let mic = match snapshot.state {
                    ListeningState::Listening => "Mic ON",
                    ListeningState::Idle | ListeningState::Error => "Mic OFF",
                };
                println!("{mic}");
                println!("  heard:    {}", snapshot.last_heard);
                println!("  detected: {}", snapshot.detected);
                println!("  action:   {}", snapshot.action);
            }
            "hear" | "final" => {
                if let Err(e) = source.emit_result(rest, cmd == "final").await {
                    println!("no active session ({e})");
                }
            }
            "end" => {
                if let Err(e) = source.emit(SessionEvent::Ended).await {
                    println!("no active session ({e})");
                }
            }
            "quit" | "exit" => break,
            other => println!("unknown command: {other}"),
        }
    }

    cancel.cancel();
    printer.abort();
    Ok(())
}

fn format_fecha(record: &rover_voice::MovementRecord) -> String {
    record
        .fecha_hora_parsed()
        .map(|ts| ts.to_rfc3339())
        .or_else(|| record.fecha_hora.clone())
        .unwrap_or_default()
}

fn print_status(record: &rover_voice::MovementRecord) {
    println!("estado: {} {}", record.movimiento.to_uppercase(), format_fecha(record));
}

fn print_event(event: &RuntimeEvent) {
    match event {
        RuntimeEvent::ListeningChanged { listening } => {
            println!("{}", if *listening { "Mic ON" } else { "Mic OFF" });
        }
        RuntimeEvent::Heard { transcript, is_final } => {
            if *is_final {
                println!("heard: {transcript}");
            }
        }
        RuntimeEvent::Detected { movement } => println!("detected: {movement}"),
        RuntimeEvent::Dispatched { movement } => {
            println!("Registrado: {}", movement.label());
        }
        RuntimeEvent::DispatchFailed { cause, .. } => {
            println!("No se pudo registrar: {cause}");
        }
        RuntimeEvent::StatusRefreshed { record } => print_status(record),
        RuntimeEvent::HistoryRefreshed { rows } => {
            println!("historial ({} filas):", rows.len());
            for row in rows {
                println!(
                    "  {:>3}  {:<28} {}",
                    row.id.unwrap_or_default(),
                    row.movimiento,
                    format_fecha(row)
                );
            }
        }
        RuntimeEvent::SessionError { cause } => {
            println!("Error de micrófono: {cause}");
        }
    }
}
