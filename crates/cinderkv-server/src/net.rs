//! TCP front end.
//!
//! One accept loop, one thread per connection. Each connection reads
//! newline-terminated request lines and writes back one unframed reply
//! chunk per request. A socket error or client EOF ends that connection
//! only; the accept loop keeps serving.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread;

use log::{debug, info, warn};

use crate::context::ServerContext;
use crate::dispatch;

/// A bound, not-yet-serving TCP server.
pub struct Server {
    listener: TcpListener,
    ctx: ServerContext,
}

impl Server {
    /// Bind the listening socket. Port 0 binds an ephemeral port, which the
    /// test suite uses.
    pub fn bind(addr: impl ToSocketAddrs, ctx: ServerContext) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self { listener, ctx })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept forever, one worker thread per client.
    pub fn serve(self) -> io::Result<()> {
        info!("listening on {}", self.local_addr()?);
        for incoming in self.listener.incoming() {
            match incoming {
                Ok(stream) => {
                    let ctx = self.ctx.clone();
                    thread::spawn(move || {
                        if let Err(e) = handle_client(stream, &ctx) {
                            debug!("connection closed: {e}");
                        }
                    });
                }
                Err(e) => warn!("accept failed: {e}"),
            }
        }
        Ok(())
    }
}

/// Serve one client until EOF or a socket error.
fn handle_client(stream: TcpStream, ctx: &ServerContext) -> io::Result<()> {
    let peer = stream.peer_addr()?;
    debug!("client connected: {peer}");

    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let reply = dispatch::route(ctx, &line);
        writer.write_all(reply.as_bytes())?;
        writer.flush()?;
    }

    debug!("client disconnected: {peer}");
    Ok(())
}
