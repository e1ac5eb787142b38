use std::io::{self, BufReader};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{never, select, unbounded};
use log::{debug, error, info, warn};

use shared_resources::call_message::CallMessage;
use shared_resources::config::Config;

use crate::utilities::car::MockCar;
use crate::utilities::debug::Debug;
use crate::utilities::engine::DispatchEngine;
use crate::utilities::error::DispatchResult;
use crate::utilities::request_board::RequestBoard;

pub mod dispatcher;
pub mod network;
pub mod panel;

/// Puts a hall call on the board and logs the outcome. `source` names the
/// panel the call came from.
pub fn submit_call(board: &RequestBoard, call: CallMessage, source: &str) -> DispatchResult<()> {
    match board.set_request(call.direction, call.floor) {
        Ok(()) => {
            info!("Call from {}: {} at floor {}", source, call.direction, call.floor);
            Ok(())
        }
        Err(e) => {
            warn!("Rejected call from {}: {}", source, e);
            Err(e)
        }
    }
}

pub fn run() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // READ CONFIGURATION
    let config = Config::get().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    info!(
        "Serving floors {} starting at floor {}",
        config.elevator.floors, config.elevator.start_floor
    );

    // INITIALIZE SHARED STATE
    let board = Arc::new(RequestBoard::new(config.elevator.floors));
    let car = Arc::new(MockCar::new(config.elevator.start_floor));
    let engine = DispatchEngine::new(Arc::clone(&board), car, config.elevator.start_floor);

    // INITIALIZE CHANNELS
    let (status_tx, status_rx) = unbounded();
    let (network_status_tx, network_status_rx) = unbounded();
    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    let (quit_tx, quit_rx) = unbounded::<()>();

    // INITIALIZE THREAD FOR DISPATCHER
    let tick_interval = config.dispatcher.tick_interval;
    let dispatcher_handle = thread::Builder::new().name("dispatcher".to_string()).spawn(move || {
        dispatcher::main(engine, tick_interval, status_tx, shutdown_rx)
    })?;

    // INITIALIZE THREAD FOR CONSOLE PANEL
    {
        let board = Arc::clone(&board);
        thread::Builder::new().name("panel".to_string()).spawn(move || {
            panel::main(BufReader::new(io::stdin()), board, quit_tx)
        })?;
    }

    // INITIALIZE NETWORK MODULE
    {
        let board = Arc::clone(&board);
        let network_config = config.network.clone();
        thread::Builder::new().name("network".to_string()).spawn(move || {
            if let Err(e) = network::main(network_config, board, network_status_rx) {
                error!("Network module failed: {}", e);
            }
        })?;
    }

    let mut status_table = config.display.status_table.then(Debug::new);
    let mut quit_rx = quit_rx;

    loop {
        select! {
            recv(status_rx) -> msg => {
                let status = match msg {
                    Ok(status) => status,
                    Err(_) => {
                        error!("Dispatcher stopped unexpectedly");
                        return Err(io::Error::new(io::ErrorKind::Other, "dispatcher stopped"))
                    }
                };
                match status_table.as_mut() {
                    Some(table) => table.printstatus(&status)?,
                    None => debug!("\n{}", status.render()),
                }
                // a stopped network module is already logged
                network_status_tx.send(status).ok();
            },
            recv(quit_rx) -> msg => {
                if msg.is_err() {
                    // panel input ended without a quit
                    quit_rx = never();
                } else {
                    info!("STOPPING PROGRAM...");
                    drop(shutdown_tx);
                    let engine = dispatcher_handle
                        .join()
                        .map_err(|_| io::Error::new(io::ErrorKind::Other, "dispatcher thread panicked"))?;
                    info!("Car left at {:?}", engine.state());
                    return Ok(())
                }
            }
        }
    }
}
