use std::io;
use std::net::{SocketAddr, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

/// Sending socket plus the address every datagram goes to: the LAN broadcast
/// address, or this host when `broadcast` is off.
pub fn new_tx(port: u16, broadcast: bool) -> io::Result<(UdpSocket, SocketAddr)> {
    let sock = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    sock.set_broadcast(true)?;
    sock.set_reuse_address(true)?;
    let ip = if broadcast { [255, 255, 255, 255] } else { [127, 0, 0, 1] };
    Ok((sock.into(), SocketAddr::from((ip, port))))
}

pub fn new_rx(port: u16) -> io::Result<UdpSocket> {
    let sock = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    sock.set_broadcast(true)?;
    sock.set_reuse_address(true)?;
    let local_addr = SocketAddr::from(([0, 0, 0, 0], port));
    sock.bind(&local_addr.into())?;
    Ok(sock.into())
}
