use std::io;
use std::net::UdpSocket;

use crossbeam_channel as cbc;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::sock;

/// Largest datagram accepted by [`rx`].
pub const MAX_PACKET_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum BcastError {
    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    #[error("the consuming channel was closed")]
    ChannelClosed,
}

/// Serialise every value received on `ch` as JSON and send it to `port`.
///
/// Returns `Err` when creating the socket fails and `Ok` once `ch` is
/// disconnected. Individual send failures are logged and skipped.
pub fn tx<T: Serialize>(port: u16, broadcast: bool, ch: cbc::Receiver<T>) -> Result<(), BcastError> {
    let (s, addr) = sock::new_tx(port, broadcast)?;
    for data in ch.iter() {
        let serialized = match serde_json::to_vec(&data) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Unable to serialise packet, {}", e);
                continue;
            }
        };
        if let Err(e) = s.send_to(&serialized, addr) {
            warn!("Unable to send packet, {}", e);
        }
    }
    Ok(())
}

/// Forward every JSON value of type `T` arriving on `port` to `ch`.
///
/// Returns `Err` when creating the socket fails or `ch` is closed. Packets
/// that do not decode are logged and dropped.
pub fn rx<T: DeserializeOwned>(port: u16, ch: cbc::Sender<T>) -> Result<(), BcastError> {
    let s = sock::new_rx(port)?;
    let mut buf = [0; MAX_PACKET_SIZE];

    loop {
        match recv_packet(&s, &mut buf) {
            Ok(d) => ch.send(d).map_err(|_| BcastError::ChannelClosed)?,
            Err(e) => warn!("Received bad package got error: {}", e),
        }
    }
}

fn recv_packet<T: DeserializeOwned>(
    s: &UdpSocket,
    buf: &mut [u8],
) -> Result<T, Box<dyn std::error::Error>> {
    let n = s.recv(buf)?;
    decode(&buf[..n]).map_err(|e| e.into())
}

fn decode<T: DeserializeOwned>(packet: &[u8]) -> serde_json::Result<T> {
    serde_json::from_slice(packet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct Ping {
        seq: u32,
    }

    #[test]
    fn decodes_json_packets() {
        assert_eq!(decode::<Ping>(br#"{"seq":7}"#).unwrap(), Ping { seq: 7 });
    }

    #[test]
    fn rejects_truncated_packets() {
        assert!(decode::<Ping>(br#"{"seq":"#).is_err());
    }

    #[test]
    fn tx_returns_once_the_channel_is_closed() {
        let (data_tx, data_rx) = cbc::unbounded::<Ping>();
        drop(data_tx);
        assert!(tx(0, false, data_rx).is_ok());
    }
}
