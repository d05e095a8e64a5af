use std::fmt;
use std::str::FromStr;

/// Ground sampling distance tiers of Sentinel-2 bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    R10m,
    R20m,
    R60m,
}

impl Resolution {
    pub fn meters(&self) -> u32 {
        match self {
            Resolution::R10m => 10,
            Resolution::R20m => 20,
            Resolution::R60m => 60,
        }
    }

    /// Tag used in file names, e.g. `"20m"`.
    pub fn tag(&self) -> &'static str {
        match self {
            Resolution::R10m => "10m",
            Resolution::R20m => "20m",
            Resolution::R60m => "60m",
        }
    }
}

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10m" => Ok(Resolution::R10m),
            "20m" => Ok(Resolution::R20m),
            "60m" => Ok(Resolution::R60m),
            other => Err(ResolutionParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionParseError(pub String);

impl fmt::Display for ResolutionParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "invalid resolution `{}`, expected one of 10m, 20m, 60m",
            self.0
        )
    }
}

impl std::error::Error for ResolutionParseError {}
