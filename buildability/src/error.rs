use arcgis::GisError;
use serde::Serialize;
use thiserror::Error;
use worksheet::WorksheetError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Gis(#[from] GisError),

    #[error("{0}")]
    Worksheet(#[from] WorksheetError),
}

/// How a lookup failed, as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The address, APN or contour data is absent upstream.
    NotFound,

    /// The GIS service could not be reached or answered with an
    /// error.
    Network,

    /// Malformed input or degenerate geometry.
    Validation,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Gis(GisError::NotFound(_)) => ErrorKind::NotFound,
            Self::Gis(GisError::Network(_) | GisError::Service { .. } | GisError::Decode(_)) => {
                ErrorKind::Network
            }
            Self::Gis(GisError::Address(_) | GisError::Apn(_) | GisError::Worksheet(_))
            | Self::Worksheet(_) => ErrorKind::Validation,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::NotFound => "not found",
            Self::Network => "network",
            Self::Validation => "validation",
        };
        f.write_str(kind)
    }
}
