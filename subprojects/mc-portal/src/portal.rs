//! Synchronous command submission over a single portal.

use log::{debug, error, trace};
use mc_cmd::{
    Command, McStatus, NUM_PARAMS, decode_status, field,
    header::{STATUS_OFFSET, STATUS_WIDTH},
};

use crate::{
    poll::{PollConfig, Wait},
    region::PortalRegion,
};

/// A portal together with its wait strategy and poll bound.
///
/// Submission needs exclusive access; share a portal between threads through
/// [`McIo`](crate::McIo).
#[derive(Debug)]
pub struct Portal<R, W> {
    region: R,
    wait: W,
    config: PollConfig,
}

impl<R, W> Portal<R, W>
where
    R: PortalRegion,
    W: Wait,
{
    /// Creates a portal driver.
    pub fn new(region: R, wait: W, config: PollConfig) -> Self {
        Self {
            region,
            wait,
            config,
        }
    }

    /// Returns the poll bound.
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Replaces the poll bound used by later submissions.
    pub fn set_config(&mut self, config: PollConfig) {
        self.config = config;
    }

    /// Returns the underlying region.
    pub fn region(&self) -> &R {
        &self.region
    }

    /// Returns the underlying region mutably.
    pub fn region_mut(&mut self) -> &mut R {
        &mut self.region
    }

    /// Consumes the driver, returning the region and the wait strategy.
    pub fn into_parts(self) -> (R, W) {
        (self.region, self.wait)
    }

    /// Sends `cmd` to the firmware and waits for its response.
    ///
    /// On completion the whole response (header and params) replaces the
    /// contents of `cmd`, whatever the status. On [`SendError::Timeout`]
    /// `cmd` is left untouched.
    ///
    /// The status byte sent to the firmware is always [`McStatus::Ready`],
    /// whatever `cmd` carries, so a completed command can be resubmitted.
    pub fn submit(&mut self, cmd: &mut Command) -> Result<(), SendError> {
        trace!(
            "MC command start: portal={:#x} cmd={} token={}",
            self.region.address(),
            cmd.command_id(),
            cmd.token(),
        );

        self.write_request(cmd);
        let header = self.poll_completion(cmd)?;
        self.read_response(cmd, header);

        let raw = cmd.raw_status();
        match McStatus::from_raw(raw) {
            Some(McStatus::Ok) => {
                trace!(
                    "MC command done: portal={:#x} cmd={} token={}",
                    self.region.address(),
                    cmd.command_id(),
                    cmd.token(),
                );
                Ok(())
            }
            Some(status) => {
                debug!(
                    "MC command rejected: portal={:#x} cmd={} token={} status={}",
                    self.region.address(),
                    cmd.command_id(),
                    cmd.token(),
                    status,
                );
                Err(SendError::Firmware(status))
            }
            None => {
                error!(
                    "MC command returned unknown status: portal={:#x} cmd={} status={:#x}",
                    self.region.address(),
                    cmd.command_id(),
                    raw,
                );
                Err(SendError::MalformedResponse(raw))
            }
        }
    }

    fn write_request(&mut self, cmd: &Command) {
        for (index, param) in cmd.params.iter().enumerate() {
            self.region.write_param(index, *param);
        }

        let mut header = cmd.header;
        field::pack(
            &mut header,
            STATUS_OFFSET,
            STATUS_WIDTH,
            McStatus::Ready.to_raw().into(),
        );
        self.region.write_header(header);
    }

    fn poll_completion(&mut self, cmd: &Command) -> Result<u64, SendError> {
        let mut polls = 0;
        loop {
            let header = self.region.read_header();
            if decode_status(header) != McStatus::Ready.to_raw() {
                return Ok(header);
            }

            if polls >= self.config.max_polls {
                error!(
                    "MC command timed out: portal={:#x} cmd={} token={} polls={} timeout={:?}",
                    self.region.address(),
                    cmd.command_id(),
                    cmd.token(),
                    polls,
                    self.config.timeout(),
                );
                return Err(SendError::Timeout { polls });
            }

            self.wait.wait(self.config.interval);
            polls += 1;
        }
    }

    fn read_response(&mut self, cmd: &mut Command, header: u64) {
        cmd.header = header;
        for index in 0..NUM_PARAMS {
            cmd.params[index] = self.region.read_param(index);
        }
    }
}

/// Error returned by [`Portal::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The firmware did not complete the command within the poll bound.
    ///
    /// Whether the command took effect is unknown.
    #[error("MC command timed out after {polls} polls")]
    Timeout {
        /// Number of waits performed before giving up.
        polls: u32,
    },
    /// The response carried a status byte that is not a known code.
    #[error("malformed MC response: unknown status {0:#x}")]
    MalformedResponse(u8),
    /// The firmware completed the command with a non-success status.
    #[error("MC firmware error: {0}")]
    Firmware(McStatus),
}

impl SendError {
    /// Returns the firmware status, if the firmware reported one.
    pub fn status(&self) -> Option<McStatus> {
        match self {
            SendError::Firmware(status) => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the command may or may not have taken effect.
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(self, SendError::Timeout { .. })
    }

    /// Maps the error to a negative errno value.
    pub fn to_errno(&self) -> i32 {
        match self {
            SendError::Timeout { .. } => McStatus::Timeout.to_errno(),
            SendError::MalformedResponse(raw) => McStatus::raw_to_errno(*raw),
            SendError::Firmware(status) => status.to_errno(),
        }
    }
}
