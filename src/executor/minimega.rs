use crate::{
    errors::CatalogError,
    executor::{tabular_rows, CommandExecutor, Row},
};
use async_trait::async_trait;
use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
};

/// Builder for configuring custom [MinimegaClient] instances
#[derive(Debug)]
pub struct MinimegaClientBuilder {
    socket: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl MinimegaClientBuilder {
    /// Start constructing a custom control socket client
    pub fn new() -> Self {
        MinimegaClientBuilder {
            socket: None,
            timeout: None,
        }
    }

    /// Change the control socket path
    ///
    /// The default can be determined with
    /// [MinimegaClient::default_socket_path()]
    pub fn socket(mut self, path: &Path) -> Self {
        self.socket = Some(path.to_path_buf());
        self
    }

    /// Set a timeout for each command
    ///
    /// This applies from connecting until the final response has been read.
    /// By default there is no timeout, and a hung cluster node stalls the
    /// caller for as long as the daemon waits on it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Construct a MinimegaClient using the parameters from this Builder
    pub fn build(self) -> MinimegaClient {
        let socket = self
            .socket
            .unwrap_or_else(MinimegaClient::default_socket_path);
        log::debug!("using control socket {:?}", socket);
        MinimegaClient {
            socket,
            timeout: self.timeout,
        }
    }
}

impl Default for MinimegaClientBuilder {
    fn default() -> Self {
        MinimegaClientBuilder::new()
    }
}

/// Client for the cluster control daemon's unix socket
///
/// Each command gets its own connection, so one client can be shared by any
/// number of concurrent catalog requests.
#[derive(Clone, Debug)]
pub struct MinimegaClient {
    socket: PathBuf,
    timeout: Option<Duration>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Request<'a> {
    command: &'a str,
    suggest: &'a str,
    plumb_pipe: &'a str,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase", default)]
struct Reply {
    resp: Option<Vec<HostResponse>>,
    more: bool,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct HostResponse {
    pub(crate) host: String,
    pub(crate) header: Option<Vec<String>>,
    pub(crate) tabular: Option<Vec<Vec<String>>>,
    pub(crate) error: String,
}

impl MinimegaClient {
    /// Construct a new client with default options
    pub fn new() -> MinimegaClient {
        MinimegaClient::builder().build()
    }

    /// Construct a client with custom options, via MinimegaClientBuilder
    pub fn builder() -> MinimegaClientBuilder {
        MinimegaClientBuilder::new()
    }

    /// Determine the control socket used if no other is specified
    ///
    /// This is `$DISKCATALOG_MINIMEGA_SOCKET` if set, otherwise `minimega`
    /// inside `$MINIMEGA_BASE`, falling back to `/tmp/minimega/minimega`.
    pub fn default_socket_path() -> PathBuf {
        match env::var("DISKCATALOG_MINIMEGA_SOCKET") {
            Ok(s) => PathBuf::from(s),
            Err(_) => match env::var("MINIMEGA_BASE") {
                Ok(s) => Path::new(&s).join("minimega"),
                Err(_) => PathBuf::from("/tmp/minimega/minimega"),
            },
        }
    }

    /// The control socket this client connects to
    pub fn socket_path(&self) -> &Path {
        &self.socket
    }

    async fn exchange(&self, command: &str) -> Result<Vec<HostResponse>, CatalogError> {
        let mut stream = UnixStream::connect(&self.socket).await?;
        let request = serde_json::to_vec(&Request {
            command,
            suggest: "",
            plumb_pipe: "",
        })?;
        stream.write_all(&request).await?;
        stream.flush().await?;

        let mut responses = Vec::new();
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let len = stream.read(&mut chunk).await?;
            if len == 0 {
                return Err(CatalogError::Disconnected);
            }
            buffer.extend_from_slice(&chunk[..len]);

            let (consumed, finished) = parse_replies(&buffer, &mut responses)?;
            if finished {
                return Ok(responses);
            }
            buffer.drain(..consumed);
        }
    }
}

impl Default for MinimegaClient {
    fn default() -> Self {
        MinimegaClient::new()
    }
}

/// Decode every complete reply in the buffer
///
/// Returns how many bytes were consumed and whether the final reply (the
/// first one without `More`) has been seen.
pub(crate) fn parse_replies(
    buffer: &[u8],
    responses: &mut Vec<HostResponse>,
) -> Result<(usize, bool), CatalogError> {
    let mut replies = serde_json::Deserializer::from_slice(buffer).into_iter::<Reply>();
    loop {
        match replies.next() {
            None => return Ok((replies.byte_offset(), false)),
            Some(Err(err)) if err.is_eof() => return Ok((replies.byte_offset(), false)),
            Some(Err(err)) => return Err(err.into()),
            Some(Ok(reply)) => {
                responses.extend(reply.resp.unwrap_or_default());
                if !reply.more {
                    return Ok((replies.byte_offset(), true));
                }
            }
        }
    }
}

/// Flatten per-host responses into rows, failing on the first host error
pub(crate) fn responses_to_rows(
    command: &str,
    responses: Vec<HostResponse>,
) -> Result<Vec<Row>, CatalogError> {
    let mut rows = Vec::new();
    for response in responses {
        if !response.error.is_empty() {
            log::warn!("{}: {:?} failed: {}", response.host, command, response.error);
            return Err(CatalogError::CommandFailed {
                command: command.to_owned(),
                message: response.error,
            });
        }
        rows.extend(tabular_rows(
            &response.host,
            response.header.as_deref().unwrap_or(&[]),
            response.tabular.as_deref().unwrap_or(&[]),
        ));
    }
    Ok(rows)
}

#[async_trait]
impl CommandExecutor for MinimegaClient {
    async fn run(&self, command: &str) -> Result<Vec<Row>, CatalogError> {
        log::trace!("running {:?} via {:?}", command, self.socket);
        let responses = match self.timeout {
            None => self.exchange(command).await?,
            Some(timeout) => match tokio::time::timeout(timeout, self.exchange(command)).await {
                Ok(result) => result?,
                Err(_) => return Err(CatalogError::Timeout(command.to_owned())),
            },
        };
        responses_to_rows(command, responses)
    }
}
