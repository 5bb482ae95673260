//! Address geocoding
//!
//! `StaticGeocoder` stands in for the real provider (Kakao Local API) until
//! it is integrated.

use async_trait::async_trait;

use super::GeocodeError;
use crate::models::LocationInfo;

/// Resolves an address to coordinates and an administrative region
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<LocationInfo, GeocodeError>;
}

/// Addresses containing this marker never resolve
pub const UNRESOLVABLE_MARKER: &str = "notfound";

struct GazetteerEntry {
    keyword: &'static str,
    latitude: f64,
    longitude: f64,
    region: &'static str,
}

const GAZETTEER: &[GazetteerEntry] = &[
    GazetteerEntry { keyword: "서울", latitude: 37.5665, longitude: 126.9780, region: "서울특별시" },
    GazetteerEntry { keyword: "seoul", latitude: 37.5665, longitude: 126.9780, region: "Seoul" },
    GazetteerEntry { keyword: "부산", latitude: 35.1796, longitude: 129.0756, region: "부산광역시" },
    GazetteerEntry { keyword: "busan", latitude: 35.1796, longitude: 129.0756, region: "Busan" },
    GazetteerEntry { keyword: "인천", latitude: 37.4563, longitude: 126.7052, region: "인천광역시" },
    GazetteerEntry { keyword: "성남", latitude: 37.4200, longitude: 127.1267, region: "경기도 성남시" },
    GazetteerEntry { keyword: "용인", latitude: 37.2411, longitude: 127.1776, region: "경기도 용인시" },
    GazetteerEntry { keyword: "고양", latitude: 37.6584, longitude: 126.8320, region: "경기도 고양시" },
    GazetteerEntry { keyword: "화성", latitude: 37.1995, longitude: 126.8310, region: "경기도 화성시" },
    GazetteerEntry { keyword: "부천", latitude: 37.5034, longitude: 126.7660, region: "경기도 부천시" },
];

/// Suffixes of street-name tokens, which never name a region
const ROAD_SUFFIXES: &[&str] = &["로", "길", "-ro", "-gil"];

/// Fallback for addresses the gazetteer does not know
const DEFAULT_LATITUDE: f64 = 37.2858;
const DEFAULT_LONGITUDE: f64 = 127.0444;
const DEFAULT_REGION: &str = "경기도 수원시 영통구";

/// Placeholder geocoder backed by a small built-in gazetteer
#[derive(Debug, Default, Clone)]
pub struct StaticGeocoder;

impl StaticGeocoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<LocationInfo, GeocodeError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let lowered = trimmed.to_lowercase();
        if lowered.contains(UNRESOLVABLE_MARKER) {
            return Err(GeocodeError::NotFound(trimmed.to_string()));
        }

        let location = match lookup_region(&lowered) {
            Some(entry) => LocationInfo {
                address: trimmed.to_string(),
                latitude: entry.latitude,
                longitude: entry.longitude,
                region: entry.region.to_string(),
            },
            None => LocationInfo {
                address: trimmed.to_string(),
                latitude: DEFAULT_LATITUDE,
                longitude: DEFAULT_LONGITUDE,
                region: DEFAULT_REGION.to_string(),
            },
        };

        tracing::debug!(address = %trimmed, region = %location.region, "Geocoded address");
        Ok(location)
    }
}

/// First gazetteer entry named by an administrative token, in address order
fn lookup_region(lowered: &str) -> Option<&'static GazetteerEntry> {
    lowered
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| is_administrative_token(token))
        .find_map(|token| GAZETTEER.iter().find(|entry| token.contains(entry.keyword)))
}

fn is_administrative_token(token: &str) -> bool {
    match token.chars().next() {
        None => false,
        Some(first) if first.is_ascii_digit() => false,
        Some(_) => !ROAD_SUFFIXES.iter().any(|suffix| token.ends_with(suffix)),
    }
}
