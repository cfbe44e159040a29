use serde::{Deserialize, Serialize};
use crate::core::normalize::{normalize_address, normalize_name};
use crate::models::{AddressSnapshot, CandidateRecord};

/// Comparison features for one pair of records. Built per request, never stored.
///
/// `*_city`, `*_district` and `*_postal` are the raw values of the effective
/// address, kept for reporting only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeatures {
    pub a_name: String,
    pub b_name: String,
    pub a_city: Option<String>,
    pub b_city: Option<String>,
    pub a_district: Option<String>,
    pub b_district: Option<String>,
    pub a_postal: Option<String>,
    pub b_postal: Option<String>,
    pub a_addr_norm: String,
    pub b_addr_norm: String,
}

/// Per-record half of the feature set
struct RecordFeatures {
    name: String,
    city: Option<String>,
    district: Option<String>,
    postal: Option<String>,
    addr_norm: String,
}

fn record_features(record: &CandidateRecord) -> RecordFeatures {
    let name = normalize_name(record.first_name.as_deref(), record.last_name.as_deref());

    match record.effective_address() {
        Some(addr) => RecordFeatures {
            name,
            city: addr.city.clone(),
            district: addr.district.clone(),
            postal: addr.postal_code.clone(),
            addr_norm: normalize_snapshot(addr),
        },
        None => RecordFeatures {
            name,
            city: None,
            district: None,
            postal: None,
            addr_norm: String::new(),
        },
    }
}

#[inline]
fn normalize_snapshot(addr: &AddressSnapshot) -> String {
    normalize_address(
        addr.country.as_deref(),
        addr.city.as_deref(),
        addr.district.as_deref(),
        addr.postal_code.as_deref(),
        addr.address_line1.as_deref(),
        addr.address_line2.as_deref(),
    )
}

/// Build the feature set for records `a` and `b`
pub fn extract_features(a: &CandidateRecord, b: &CandidateRecord) -> NormalizedFeatures {
    let fa = record_features(a);
    let fb = record_features(b);

    NormalizedFeatures {
        a_name: fa.name,
        b_name: fb.name,
        a_city: fa.city,
        b_city: fb.city,
        a_district: fa.district,
        b_district: fb.district,
        a_postal: fa.postal,
        b_postal: fb.postal,
        a_addr_norm: fa.addr_norm,
        b_addr_norm: fb.addr_norm,
    }
}
