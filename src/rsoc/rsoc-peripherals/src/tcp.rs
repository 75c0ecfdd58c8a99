//! UART PHY bridged to a TCP socket, so a terminal can talk to the SoC.

use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender, TryRecvError};
use log::{error, info, warn};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};

use rsoc_core::pcie_uart::BridgeCycle;
use rsoc_core::periph::UartPhy;
use rsoc_core::stream::Endpoint;

pub struct TcpUartPhy {
    local_addr: SocketAddr,
    to_socket: Sender<u8>,
    from_socket: Receiver<u8>,
    pending: Option<u8>, // Byte offered to the bridge, held until taken
}

// Serves one client at a time; bytes sent while nobody is connected queue up
fn listener_thread(listener: TcpListener, rx: Receiver<u8>, tx: Sender<u8>) {
    let mut held = None;
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                warn!("tcp uart: accept failed: {}", e);
                continue;
            }
        };
        info!("tcp uart: client connected");

        let reader = match stream.try_clone() {
            Ok(r) => r,
            Err(e) => {
                error!("tcp uart: cannot clone stream: {}", e);
                continue;
            }
        };
        let tx = tx.clone();
        let (closed_tx, closed_rx) = bounded::<()>(0);
        std::thread::spawn(move || reader_thread(reader, tx, closed_tx));
        let serving = writer_loop(stream, &rx, &closed_rx, &mut held);
        info!("tcp uart: client gone");
        if !serving {
            break;
        }
    }
}

// Dropping `closed` on return tells the writer the client went away
fn reader_thread(mut stream: TcpStream, tx: Sender<u8>, closed: Sender<()>) {
    let mut buf = [0u8; 256];
    loop {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                for &byte in buf[..n].iter() {
                    if tx.send(byte).is_err() {
                        return;
                    }
                }
            }
        }
    }
    drop(closed);
}

/// Forwards bytes to the client until it disconnects. A byte that could not
/// be delivered is kept in `held` for the next client.
///
/// Returns false once the PHY itself is gone.
fn writer_loop(
    mut stream: TcpStream,
    rx: &Receiver<u8>,
    closed: &Receiver<()>,
    held: &mut Option<u8>,
) -> bool {
    loop {
        let byte = match held.take() {
            Some(b) => b,
            None => select! {
                recv(rx) -> msg => match msg {
                    Ok(b) => b,
                    Err(_) => return false,
                },
                recv(closed) -> _ => return true,
            },
        };
        // A write to a half-closed socket can still succeed, so check first
        let gone = matches!(closed.try_recv(), Err(TryRecvError::Disconnected));
        if gone || stream.write_all(&[byte]).is_err() {
            *held = Some(byte);
            return true;
        }
    }
}

impl TcpUartPhy {
    pub fn new(addr: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        let local_addr = listener.local_addr()?;
        info!("tcp uart: listening on {}", local_addr);

        let (to_socket, socket_rx) = unbounded();
        let (socket_tx, from_socket) = unbounded();
        std::thread::spawn(move || listener_thread(listener, socket_rx, socket_tx));
        Ok(Self {
            local_addr,
            to_socket,
            from_socket,
            pending: None,
        })
    }

    /// Address actually bound, useful when asked for port 0
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl UartPhy for TcpUartPhy {
    fn drive(&mut self, sink: &mut Endpoint, source: &mut Endpoint) {
        if self.pending.is_none() {
            self.pending = match self.from_socket.try_recv() {
                Ok(byte) => Some(byte),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
            };
        }
        sink.valid = self.pending.is_some();
        sink.data = self.pending.unwrap_or(0);
        source.ready = true;
    }

    fn complete(&mut self, cycle: &BridgeCycle) {
        if cycle.rx_byte.is_some() {
            self.pending = None;
        }
        if let Some(byte) = cycle.tx_byte {
            if self.to_socket.send(byte).is_err() {
                error!("tcp uart: socket thread exited, dropping 0x{:02x}", byte);
            }
        }
    }
}
