use serde::Serialize;
use std::fmt;
use url::Url;

/// The read-only JSON endpoints the dashboard consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    Blockage,
    BlockageTop10,
    Cut,
    CutMotives,
    Inventory,
    Funnel,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Blockage,
        Endpoint::BlockageTop10,
        Endpoint::Cut,
        Endpoint::CutMotives,
        Endpoint::Inventory,
        Endpoint::Funnel,
    ];

    /// Path relative to the configured base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Blockage => "api/bloqueado",
            Endpoint::BlockageTop10 => "api/bloqueado/top10",
            Endpoint::Cut => "api/corte",
            Endpoint::CutMotives => "api/corte/motivos",
            Endpoint::Inventory => "api/inventario",
            Endpoint::Funnel => "api/funnel",
        }
    }

    /// Dataset name used in logs and shape errors.
    pub fn dataset(&self) -> &'static str {
        match self {
            Endpoint::Blockage => "bloqueado",
            Endpoint::BlockageTop10 => "bloqueado-top10",
            Endpoint::Cut => "corte",
            Endpoint::CutMotives => "corte-motivos",
            Endpoint::Inventory => "inventario",
            Endpoint::Funnel => "funnel",
        }
    }

    pub fn url(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}
