/// ----- DISPATCHER MODULE -----
/// Ticks the dispatch engine on a fixed interval and publishes the status
/// after every tick. A failed tick is logged and retried on the next one.

use std::time::Duration;

use crossbeam_channel::{select, tick, Receiver, Sender};
use log::{debug, info, warn};

use shared_resources::status_message::StatusMessage;

use crate::utilities::car::Car;
use crate::utilities::engine::{DispatchEngine, TickReport};

/// Runs until `shutdown_rx` fires or is dropped, then hands the engine back.
pub fn main<C: Car>(
    mut engine: DispatchEngine<C>,
    tick_interval: Duration,
    status_tx: Sender<StatusMessage>,
    shutdown_rx: Receiver<()>,
) -> DispatchEngine<C> {
    let ticker = tick(tick_interval);
    info!("Dispatcher ticking every {:?}", tick_interval);

    loop {
        select! {
            recv(ticker) -> _ => {
                let tick_error = match engine.tick() {
                    Ok(report) => {
                        log_report(&report);
                        None
                    },
                    Err(e) => {
                        warn!("Tick aborted: {}", e);
                        Some(e.to_string())
                    },
                };
                // nobody watching the status is not a reason to stop
                status_tx.send(engine.status(tick_error)).ok();
            },
            recv(shutdown_rx) -> _ => {
                info!("Dispatcher stopping at {:?}", engine.state());
                return engine
            }
        }
    }
}

fn log_report(report: &TickReport) {
    debug!("{:?}", report);
    if report.reversed {
        info!(
            "Reversed at floor {}, dropped the {} request there",
            report.floor,
            report.direction.reverse()
        );
    }
    for direction in &report.served {
        info!("Served {} request at floor {}", direction, report.floor);
    }
}
