use crate::{Error, Result};

/// The lock a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    /// Shared row lock
    Share,

    /// Exclusive row lock
    #[default]
    Update,
}

/// How long a blocked lock request waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockTimeout {
    #[default]
    WaitIndefinitely,
    NoWait,
    SkipLocked,

    /// Wait at most this many seconds
    Wait(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockOptions {
    pub mode: LockMode,
    pub timeout: LockTimeout,
}

/// How the dialect spells pessimistic locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStrategy {
    /// A trailing `for update` / `for share` clause
    Clause,

    /// Table hints in the from clause
    TableHint,

    Unsupported,
}

/// A dialect's pessimistic locking capabilities.
#[derive(Debug, Clone)]
pub struct LockingSupport {
    pub strategy: LockStrategy,

    /// Spelling of the shared-lock clause; `None` when shared row locks do
    /// not exist
    pub share_clause: Option<&'static str>,

    pub no_wait: bool,

    pub skip_locked: bool,

    /// True when a per-statement wait timeout (`wait n`) exists
    pub wait_timeout: bool,
}

impl LockingSupport {
    pub fn unsupported() -> Self {
        Self {
            strategy: LockStrategy::Unsupported,
            share_clause: None,
            no_wait: false,
            skip_locked: false,
            wait_timeout: false,
        }
    }

    /// The fragment locking the selected rows: a trailing clause, or a table
    /// hint for hint-based dialects.
    pub fn clause(&self, options: &LockOptions) -> Result<String> {
        match self.strategy {
            LockStrategy::Unsupported => Err(Error::unsupported_feature("pessimistic locks")),
            LockStrategy::Clause => self.locking_clause(options),
            LockStrategy::TableHint => self.table_hint(options),
        }
    }

    fn locking_clause(&self, options: &LockOptions) -> Result<String> {
        let base = match options.mode {
            LockMode::Update => "for update",
            LockMode::Share => self
                .share_clause
                .ok_or_else(|| Error::unsupported_feature("shared row locks"))?,
        };

        let mut out = base.to_string();
        match options.timeout {
            LockTimeout::WaitIndefinitely => {}
            LockTimeout::NoWait => {
                if !self.no_wait {
                    return Err(Error::unsupported_feature("nowait lock requests"));
                }
                out.push_str(" nowait");
            }
            LockTimeout::SkipLocked => {
                if !self.skip_locked {
                    return Err(Error::unsupported_feature("skip-locked lock requests"));
                }
                out.push_str(" skip locked");
            }
            LockTimeout::Wait(seconds) => {
                if !self.wait_timeout {
                    return Err(Error::unsupported_feature("lock wait timeouts"));
                }
                out.push_str(&format!(" wait {seconds}"));
            }
        }

        Ok(out)
    }

    fn table_hint(&self, options: &LockOptions) -> Result<String> {
        let mut hints = match options.mode {
            LockMode::Update => vec!["updlock"],
            LockMode::Share => vec!["holdlock"],
        };
        hints.push("rowlock");

        match options.timeout {
            LockTimeout::WaitIndefinitely => {}
            LockTimeout::NoWait => {
                if !self.no_wait {
                    return Err(Error::unsupported_feature("nowait lock requests"));
                }
                hints.push("nowait");
            }
            LockTimeout::SkipLocked => {
                if !self.skip_locked {
                    return Err(Error::unsupported_feature("skip-locked lock requests"));
                }
                hints.push("readpast");
            }
            LockTimeout::Wait(_) => {
                return Err(Error::unsupported_feature(
                    "per-statement lock wait timeouts",
                ));
            }
        }

        Ok(format!("with ({})", hints.join(", ")))
    }
}
