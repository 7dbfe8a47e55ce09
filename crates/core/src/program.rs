//! Compiled program artifacts
//!
//! One compilation produces a main executable and, optionally, sharding and
//! unsharding companions. A companion that was never produced is `None`; a
//! produced executable with zero bytes is still `Some` (see `Executable::is_empty`).

use serde::{Deserialize, Serialize};

use crate::types::FetchTarget;

/// An executable artifact produced by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executable {
    name: String,
    bytes: Vec<u8>,
}

impl Executable {
    /// Create an executable from its name and encoded bytes
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Executable {
            name: name.into(),
            bytes,
        }
    }

    /// Name assigned by the compiler
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoded program bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Produced, but with no program bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// All executables produced by one compilation for one partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledProgram {
    main: Executable,
    sharding: Option<Executable>,
    unsharding: Option<Executable>,
}

impl CompiledProgram {
    /// A program with only a main executable
    pub fn main_only(main: Executable) -> Self {
        CompiledProgram {
            main,
            sharding: None,
            unsharding: None,
        }
    }

    /// Attach a sharding companion
    pub fn with_sharding(mut self, sharding: Executable) -> Self {
        self.sharding = Some(sharding);
        self
    }

    /// Attach an unsharding companion
    pub fn with_unsharding(mut self, unsharding: Executable) -> Self {
        self.unsharding = Some(unsharding);
        self
    }

    /// Executable for `target`, or `None` if the compilation never produced it
    pub fn executable(&self, target: FetchTarget) -> Option<&Executable> {
        match target {
            FetchTarget::Main => Some(&self.main),
            FetchTarget::Sharding => self.sharding.as_ref(),
            FetchTarget::Unsharding => self.unsharding.as_ref(),
        }
    }

    /// The main executable
    pub fn main(&self) -> &Executable {
        &self.main
    }

    /// Targets this compilation produced
    pub fn targets(&self) -> Vec<FetchTarget> {
        FetchTarget::ALL
            .into_iter()
            .filter(|t| self.executable(*t).is_some())
            .collect()
    }

    /// Total bytes across all produced executables
    pub fn total_bytes(&self) -> usize {
        FetchTarget::ALL
            .into_iter()
            .filter_map(|t| self.executable(t))
            .map(Executable::len)
            .sum()
    }
}
