//! Incoterm codes and the destination family they select.

use serde::{Deserialize, Serialize};

/// Which destination fields an incoterm makes meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncotermFamily {
    /// CFR/CIF: seller ships to a port; port of discharge + country apply.
    PortBased,
    /// Everything else: delivery to a warehouse with a contact person.
    Inland,
}

/// Standard trade terms seen on service requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Incoterm {
    Exw,
    Fca,
    Fas,
    Fob,
    Cfr,
    Cif,
    Cpt,
    Cip,
    Dap,
    Dpu,
    Ddp,
    /// A code this client does not recognise (kept uppercased).
    Other(String),
}

impl Incoterm {
    /// Parse a code case-insensitively, ignoring surrounding whitespace.
    pub fn parse(code: &str) -> Self {
        let upper = code.trim().to_uppercase();
        match upper.as_str() {
            "EXW" => Self::Exw,
            "FCA" => Self::Fca,
            "FAS" => Self::Fas,
            "FOB" => Self::Fob,
            "CFR" => Self::Cfr,
            "CIF" => Self::Cif,
            "CPT" => Self::Cpt,
            "CIP" => Self::Cip,
            "DAP" => Self::Dap,
            "DPU" => Self::Dpu,
            "DDP" => Self::Ddp,
            _ => Self::Other(upper),
        }
    }

    /// Return the uppercase code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exw => "EXW",
            Self::Fca => "FCA",
            Self::Fas => "FAS",
            Self::Fob => "FOB",
            Self::Cfr => "CFR",
            Self::Cif => "CIF",
            Self::Cpt => "CPT",
            Self::Cip => "CIP",
            Self::Dap => "DAP",
            Self::Dpu => "DPU",
            Self::Ddp => "DDP",
            Self::Other(code) => code,
        }
    }

    /// The destination family for this term.
    pub fn family(&self) -> IncotermFamily {
        match self {
            Self::Cfr | Self::Cif => IncotermFamily::PortBased,
            _ => IncotermFamily::Inland,
        }
    }
}

impl std::fmt::Display for Incoterm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
