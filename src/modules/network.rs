/// ----- NETWORK MODULE -----
/// Receives hall calls from remote panels and puts them on the request
/// board, and broadcasts the latest dispatcher status at a fixed rate.
/// If a socket cannot be opened that half of the module is switched off;
/// the simulator keeps running either way.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{never, select, tick, unbounded, Receiver};
use log::{error, info, warn};
use network_rust::udpnet;

use shared_resources::call_message::CallMessage;
use shared_resources::config::NetworkConfig;
use shared_resources::status_message::StatusMessage;

use crate::utilities::request_board::RequestBoard;

use super::submit_call;

/// Returns once `status_rx` is disconnected.
pub fn main(
    network_config: NetworkConfig,
    board: Arc<RequestBoard>,
    status_rx: Receiver<StatusMessage>,
) -> std::io::Result<()> {
    let (call_tx, mut call_rx) = unbounded::<CallMessage>();
    let call_port = network_config.call_port;
    thread::Builder::new().name("call_udp_receiver".to_string()).spawn(move || {
        if let Err(e) = udpnet::bcast::rx(call_port, call_tx) {
            error!("Call receiver on port {} stopped: {}", call_port, e);
        }
    })?;

    let (status_send_tx, status_send_rx) = unbounded::<StatusMessage>();
    let status_port = network_config.status_port;
    let broadcast = network_config.broadcast;
    thread::Builder::new().name("status_udp_sender".to_string()).spawn(move || {
        if let Err(e) = udpnet::bcast::tx(status_port, broadcast, status_send_rx) {
            error!("Status sender on port {} stopped: {}", status_port, e);
        }
    })?;

    info!(
        "Listening for calls on port {}, sending status to port {}",
        network_config.call_port, network_config.status_port
    );

    let mut update: Receiver<Instant> = tick(network_config.status_interval);
    let mut latest_status: Option<StatusMessage> = None;

    loop {
        select! {
            recv(call_rx) -> msg => match msg {
                Ok(call) => {
                    // rejections are already logged
                    submit_call(&board, call, "network").ok();
                },
                Err(_) => {
                    warn!("No longer accepting calls over the network");
                    call_rx = never();
                },
            },
            recv(status_rx) -> msg => match msg {
                Ok(status) => latest_status = Some(status),
                Err(_) => return Ok(()),
            },
            recv(update) -> _ => {
                if let Some(status) = &latest_status {
                    if status_send_tx.send(status.clone()).is_err() {
                        warn!("No longer broadcasting status");
                        update = never();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::UdpSocket;
    use std::time::{Duration, Instant};

    use shared_resources::direction::Direction;
    use shared_resources::floor_range::FloorRange;

    const CALL_PORT: u16 = 29740;
    const STATUS_PORT: u16 = 29741;

    fn status() -> StatusMessage {
        StatusMessage {
            min_floor: 0,
            max_floor: 9,
            floor: Some(4),
            direction: Direction::Up,
            up_requests: vec![false; 10],
            down_requests: vec![false; 10],
            tick_error: None,
        }
    }

    #[test]
    fn loopback_calls_reach_the_board_and_status_goes_out() {
        let listener = UdpSocket::bind(("127.0.0.1", STATUS_PORT)).unwrap();
        listener.set_read_timeout(Some(Duration::from_secs(2))).unwrap();

        let board = Arc::new(RequestBoard::new(FloorRange::new(0, 9).unwrap()));
        let (status_tx, status_rx) = unbounded();
        let network_config = NetworkConfig {
            call_port: CALL_PORT,
            status_port: STATUS_PORT,
            status_interval: Duration::from_millis(10),
            broadcast: false,
        };
        let handle = {
            let board = Arc::clone(&board);
            thread::spawn(move || main(network_config, board, status_rx))
        };
        status_tx.send(status()).unwrap();

        // the receiver binds on its own thread, so keep sending until it is up
        let panel = UdpSocket::bind(("127.0.0.1", 0)).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        while board.has_waiting_request(Direction::Down, 7) != Ok(true) && Instant::now() < deadline {
            panel.send_to(br#"{"floor":7,"direction":"down"}"#, ("127.0.0.1", CALL_PORT)).unwrap();
            thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(board.has_waiting_request(Direction::Down, 7), Ok(true));

        let mut buf = [0; 4096];
        let n = listener.recv(&mut buf).unwrap();
        let received: StatusMessage = serde_json::from_slice(&buf[..n]).unwrap();
        assert_eq!(received, status());

        drop(status_tx);
        assert!(handle.join().unwrap().is_ok());
    }
}
