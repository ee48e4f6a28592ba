//! SSH transport for the remote sink, backed by libssh2.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use ssh2::Session;
use tracing::{debug, info};

use super::error::PublishError;
use super::remote::{ExecOutput, RemoteShell};

/// An authenticated SSH session that runs one command per channel.
pub struct SshShell {
    session: Session,
    host: String,
}

impl SshShell {
    /// Open a TCP connection, handshake and authenticate with a password.
    ///
    /// `timeout` bounds the TCP connect and every later SSH operation.
    pub fn connect(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, PublishError> {
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|source| PublishError::Connect {
                host: host.to_string(),
                source,
            })?
            .next()
            .ok_or_else(|| PublishError::Resolve(host.to_string()))?;

        let tcp = TcpStream::connect_timeout(&addr, timeout).map_err(|source| {
            PublishError::Connect {
                host: host.to_string(),
                source,
            }
        })?;
        tcp.set_read_timeout(Some(timeout))?;
        tcp.set_write_timeout(Some(timeout))?;

        let mut session = Session::new()?;
        session.set_timeout(timeout.as_millis().min(u128::from(u32::MAX)) as u32);
        session.set_tcp_stream(tcp);
        session.handshake()?;

        if let Err(e) = session.userauth_password(user, password) {
            debug!(host, user, error = %e, "password authentication failed");
            return Err(PublishError::Auth {
                user: user.to_string(),
                host: host.to_string(),
            });
        }
        if !session.authenticated() {
            return Err(PublishError::Auth {
                user: user.to_string(),
                host: host.to_string(),
            });
        }

        info!(host, port, user, "ssh session established");
        Ok(Self {
            session,
            host: host.to_string(),
        })
    }
}

impl RemoteShell for SshShell {
    fn exec(&mut self, command: &str, stdin: &[u8]) -> Result<ExecOutput, PublishError> {
        let mut channel = self.session.channel_session()?;
        channel.exec(command)?;
        if !stdin.is_empty() {
            channel.write_all(stdin)?;
        }
        channel.send_eof()?;

        let mut stdout = String::new();
        channel.read_to_string(&mut stdout)?;
        let mut stderr = String::new();
        channel.stderr().read_to_string(&mut stderr)?;

        channel.wait_close()?;
        let status = channel.exit_status()?;
        debug!(host = %self.host, status, "remote command finished");
        Ok(ExecOutput {
            status,
            stdout,
            stderr,
        })
    }

    fn close(&mut self) {
        if let Err(e) = self.session.disconnect(None, "lumius disconnect", None) {
            debug!(host = %self.host, error = %e, "ssh disconnect failed");
        }
    }
}
