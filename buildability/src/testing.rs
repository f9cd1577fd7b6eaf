//! In-memory [`GisSource`] for tests.

use arcgis::{query, GisError, GisSource};
use geo::{line_string, polygon, MultiLineString, MultiPolygon};
use worksheet::{Contour, ContourKind, Parcel};

/// One parcel, "24785 Prospect Ave" / APN 18204019: a 240 ft × 181.5 ft
/// (1 acre) rectangle crossed by five 200 ft contours from 400 ft to
/// 420 ft.
pub struct MockGis {
    parcel: Parcel,
    contours: Vec<Contour>,
}

impl MockGis {
    pub const APN: &'static str = "18204019";

    /// A parcel with no contours.
    pub const FLAT_APN: &'static str = "33628010";

    /// A parcel whose lookup fails upstream.
    pub const OFFLINE_APN: &'static str = "50000000";

    pub fn new() -> Self {
        let contours = (0..5)
            .map(|i| {
                let y = 30.0 * f64::from(i + 1);
                Contour {
                    elevation: Some(400.0 + 5.0 * f64::from(i)),
                    kind: if i % 2 == 0 {
                        ContourKind::Index
                    } else {
                        ContourKind::Intermediate
                    },
                    line: MultiLineString(vec![line_string![(x: 20.0, y: y), (x: 220.0, y: y)]]),
                }
            })
            .collect();
        Self {
            parcel: Self::parcel(Self::APN),
            contours,
        }
    }

    fn parcel(apn: &str) -> Parcel {
        let boundary = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 240.0, y: 0.0),
            (x: 240.0, y: 181.5),
            (x: 0.0, y: 181.5),
        ]]);
        Parcel::new(apn, boundary).unwrap()
    }
}

impl GisSource for MockGis {
    fn parcel_by_address(&self, address: &str) -> Result<Parcel, GisError> {
        query::address_where(address)?;
        if query::normalize_address(address).starts_with("24785 PROSPECT") {
            Ok(self.parcel.clone().with_address(address))
        } else {
            Err(GisError::NotFound(format!(
                "no parcel found for address '{address}'"
            )))
        }
    }

    fn parcel_by_apn(&self, apn: &str) -> Result<Parcel, GisError> {
        match query::normalize_apn(apn)?.as_str() {
            Self::APN => Ok(self.parcel.clone()),
            Self::FLAT_APN => Ok(Self::parcel(Self::FLAT_APN)),
            Self::OFFLINE_APN => Err(GisError::Service {
                code: 503,
                message: "Service Unavailable".into(),
            }),
            _ => Err(GisError::NotFound(format!("no parcel for APN {apn}"))),
        }
    }

    fn contours(&self, parcel: &Parcel) -> Result<Vec<Contour>, GisError> {
        if parcel.apn() == Self::FLAT_APN {
            Err(GisError::NotFound(format!(
                "no contours intersect parcel {}",
                parcel.apn()
            )))
        } else {
            Ok(self.contours.clone())
        }
    }

    fn dem_slope(&self, _parcel: &Parcel, _samples: usize) -> Result<Option<f64>, GisError> {
        Ok(Some(12.34))
    }
}
