use crate::consts::{NUM_STATS, PARAMETER_FORMAT_VERSION, PARAMETER_RECORD_SIZE};
use crate::error::ParameterFormatError;
use crate::types::Stat;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::warn;
use typed_builder::TypedBuilder;

/// What the per-stat factors are multiplied with when scoring.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FactorTarget {
    /// `surplus * factor`
    #[default]
    Surplus,
    /// `(minimal_surplus - surplus) * factor`
    Shortfall,
}

impl FactorTarget {
    fn to_byte(self) -> u8 {
        match self {
            FactorTarget::Surplus => 0,
            FactorTarget::Shortfall => 1,
        }
    }

    fn from_byte(b: u8) -> Result<Self, ParameterFormatError> {
        match b {
            0 => Ok(FactorTarget::Surplus),
            1 => Ok(FactorTarget::Shortfall),
            other => Err(ParameterFormatError::UnknownFactorTarget(other)),
        }
    }
}

/// The objective of one optimisation call. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct Parameter {
    /// Per-stat lower bound on surplus, indexed by [`Stat::index`].
    #[builder(default)]
    pub minimal_surplus: [i16; NUM_STATS],
    /// Per-stat weight, indexed by [`Stat::index`].
    #[builder(default = [1; NUM_STATS])]
    pub factor: [i16; NUM_STATS],
    #[builder(default = 1)]
    pub happy_factor: i16,
    #[builder(default)]
    pub factor_target: FactorTarget,
    #[builder(default = false)]
    pub require_happy: bool,
}

impl Default for Parameter {
    fn default() -> Self {
        Parameter::builder().build()
    }
}

impl Parameter {
    #[inline(always)]
    pub fn minimal(&self, stat: Stat) -> i32 {
        self.minimal_surplus[stat.index()] as i32
    }

    #[inline(always)]
    pub fn factor_for(&self, stat: Stat) -> i32 {
        self.factor[stat.index()] as i32
    }

    pub fn set_minimal(&mut self, stat: Stat, value: i16) -> &mut Self {
        self.minimal_surplus[stat.index()] = value;
        self
    }

    pub fn set_factor(&mut self, stat: Stat, value: i16) -> &mut Self {
        self.factor[stat.index()] = value;
        self
    }

    /// Fixed-size big-endian record. See [`PARAMETER_RECORD_SIZE`].
    pub fn to_bytes(&self) -> [u8; PARAMETER_RECORD_SIZE] {
        let mut out = [0u8; PARAMETER_RECORD_SIZE];
        out[0] = PARAMETER_FORMAT_VERSION;
        let mut pos = 1;
        for i in 0..NUM_STATS {
            out[pos..pos + 2].copy_from_slice(&self.minimal_surplus[i].to_be_bytes());
            out[pos + 2..pos + 4].copy_from_slice(&self.factor[i].to_be_bytes());
            pos += 4;
        }
        out[pos..pos + 2].copy_from_slice(&self.happy_factor.to_be_bytes());
        out[pos + 2] = self.factor_target.to_byte();
        out[pos + 3] = self.require_happy as u8;
        out
    }

    /// Strict inverse of [`Parameter::to_bytes`]: wrong length, version, mode or
    /// flag byte rejects the whole record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParameterFormatError> {
        if bytes.len() != PARAMETER_RECORD_SIZE {
            return Err(ParameterFormatError::WrongSize {
                expected: PARAMETER_RECORD_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes[0] != PARAMETER_FORMAT_VERSION {
            return Err(ParameterFormatError::UnknownVersion(bytes[0]));
        }

        let read_i16 = |at: usize| i16::from_be_bytes([bytes[at], bytes[at + 1]]);

        let mut minimal_surplus = [0i16; NUM_STATS];
        let mut factor = [0i16; NUM_STATS];
        let mut pos = 1;
        for i in 0..NUM_STATS {
            minimal_surplus[i] = read_i16(pos);
            factor[i] = read_i16(pos + 2);
            pos += 4;
        }
        let happy_factor = read_i16(pos);
        let factor_target = FactorTarget::from_byte(bytes[pos + 2])?;
        let require_happy = match bytes[pos + 3] {
            0 => false,
            1 => true,
            other => return Err(ParameterFormatError::InvalidFlag(other)),
        };

        Ok(Self {
            minimal_surplus,
            factor,
            happy_factor,
            factor_target,
            require_happy,
        })
    }

    /// Boundary helper: a missing or unreadable record means the city is not
    /// under governance.
    pub fn decode_optional(bytes: Option<&[u8]>) -> Option<Self> {
        let bytes = bytes?;
        match Self::from_bytes(bytes) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("Ignoring stored parameter: {}", e);
                None
            }
        }
    }
}
