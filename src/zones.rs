//! Timezone catalogue and zone lookup from the stored preference.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz, TZ_VARIANTS};
use clock_core::{zone_id_from_label, zone_label};

/// Standard (non-DST) UTC offset in whole hours, truncated toward zero.
pub fn raw_offset_hours(tz: Tz, at: DateTime<Utc>) -> i32 {
    let offset = tz.offset_from_utc_datetime(&at.naive_utc());
    (offset.base_utc_offset().num_seconds() / 3600) as i32
}

pub fn label_for(tz: Tz, at: DateTime<Utc>) -> String {
    zone_label(raw_offset_hours(tz, at), tz.name())
}

/// Every known zone as a label, ordered by standard offset (west to east).
pub fn catalogue(at: DateTime<Utc>) -> Vec<String> {
    let mut zones: Vec<(i32, String)> = TZ_VARIANTS
        .iter()
        .map(|tz| (raw_offset_hours(*tz, at), label_for(*tz, at)))
        .collect();
    zones.sort_by_key(|(offset, _)| *offset);
    zones.into_iter().map(|(_, label)| label).collect()
}

pub fn parse_zone(id: &str) -> Option<Tz> {
    id.parse::<Tz>().ok()
}

/// The host's zone: `TZ` if it names a known zone, else the OS setting, else UTC.
pub fn system_zone() -> Tz {
    if let Some(tz) = std::env::var("TZ").ok().as_deref().and_then(parse_zone) {
        return tz;
    }
    match iana_time_zone::get_timezone() {
        Ok(id) => parse_zone(&id).unwrap_or_else(|| {
            log::warn!("unknown system timezone {}, using UTC", id);
            Tz::UTC
        }),
        Err(e) => {
            log::warn!("can't read system timezone: {}, using UTC", e);
            Tz::UTC
        }
    }
}

/// Zone named by a stored label, falling back to `fallback` when the label is
/// missing or names no known zone.
pub fn resolve(selected: Option<&str>, fallback: Tz) -> Tz {
    let Some(label) = selected else {
        return fallback;
    };
    match zone_id_from_label(label).and_then(parse_zone) {
        Some(tz) => tz,
        None => {
            log::warn!("stored timezone {:?} not recognised", label);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midsummer() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_labels_use_standard_offset() {
        let at = midsummer();
        assert_eq!(label_for(Tz::UTC, at), "GMT+0 (UTC)");
        // DST is ignored: New York is -4 in July but labelled -5
        assert_eq!(
            label_for(chrono_tz::America::New_York, at),
            "GMT-5 (America/New_York)"
        );
        // Half-hour zones truncate
        assert_eq!(label_for(chrono_tz::Asia::Kolkata, at), "GMT+5 (Asia/Kolkata)");
        assert_eq!(
            label_for(chrono_tz::America::St_Johns, at),
            "GMT-3 (America/St_Johns)"
        );
    }

    #[test]
    fn test_catalogue_sorted_by_offset() {
        let at = midsummer();
        let zones = catalogue(at);
        assert_eq!(zones.len(), TZ_VARIANTS.len());
        assert!(zones.contains(&"GMT+9 (Asia/Tokyo)".to_string()));

        let offsets: Vec<i32> = zones
            .iter()
            .map(|label| {
                let tz = parse_zone(zone_id_from_label(label).unwrap()).unwrap();
                raw_offset_hours(tz, at)
            })
            .collect();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve(Some("GMT+9 (Asia/Tokyo)"), Tz::UTC),
            chrono_tz::Asia::Tokyo
        );
        assert_eq!(resolve(Some("Europe/Berlin"), Tz::UTC), chrono_tz::Europe::Berlin);
        assert_eq!(resolve(Some("GMT+1 (Nowhere/Atlantis)"), Tz::UTC), Tz::UTC);
        assert_eq!(resolve(None, chrono_tz::Europe::Paris), chrono_tz::Europe::Paris);
    }
}
