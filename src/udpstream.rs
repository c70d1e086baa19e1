//! Datagram source for receivers that broadcast NMEA sentences over UDP.
//!
//! Each `read` hands out the payload of one datagram. Receivers and
//! gateways send whole sentences per datagram, so wrapping the stream in
//! a [`std::io::BufReader`] yields clean candidate lines.

use std::io::Read;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

pub struct UdpStream {
    socket: UdpSocket,
}

impl UdpStream {
    /// Binds a listening socket on `addr`.
    pub fn open<T: ToSocketAddrs>(addr: T) -> std::io::Result<Self> {
        Ok(UdpStream {
            socket: UdpSocket::bind(addr)?,
        })
    }

    /// The address the socket actually bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl Read for UdpStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.socket.recv(buf)
    }
}
