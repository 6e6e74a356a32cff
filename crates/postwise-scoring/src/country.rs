//! IANA timezone → ISO 3166-1 alpha-2 country resolution.

/// Exact-match table for the timezones channels actually use. Zones whose
/// country is ambiguous from the region prefix alone must be listed here.
const TZ_COUNTRY: &[(&str, &str)] = &[
    ("America/New_York", "US"),
    ("America/Chicago", "US"),
    ("America/Denver", "US"),
    ("America/Phoenix", "US"),
    ("America/Los_Angeles", "US"),
    ("America/Anchorage", "US"),
    ("Pacific/Honolulu", "US"),
    ("America/Toronto", "CA"),
    ("America/Vancouver", "CA"),
    ("America/Edmonton", "CA"),
    ("America/Halifax", "CA"),
    ("America/Mexico_City", "MX"),
    ("America/Sao_Paulo", "BR"),
    ("America/Argentina/Buenos_Aires", "AR"),
    ("America/Bogota", "CO"),
    ("America/Lima", "PE"),
    ("America/Santiago", "CL"),
    ("Europe/London", "GB"),
    ("Europe/Dublin", "IE"),
    ("Europe/Paris", "FR"),
    ("Europe/Berlin", "DE"),
    ("Europe/Madrid", "ES"),
    ("Europe/Rome", "IT"),
    ("Europe/Amsterdam", "NL"),
    ("Europe/Brussels", "BE"),
    ("Europe/Zurich", "CH"),
    ("Europe/Vienna", "AT"),
    ("Europe/Lisbon", "PT"),
    ("Europe/Stockholm", "SE"),
    ("Europe/Oslo", "NO"),
    ("Europe/Copenhagen", "DK"),
    ("Europe/Helsinki", "FI"),
    ("Europe/Warsaw", "PL"),
    ("Europe/Prague", "CZ"),
    ("Europe/Athens", "GR"),
    ("Europe/Bucharest", "RO"),
    ("Europe/Istanbul", "TR"),
    ("Asia/Tokyo", "JP"),
    ("Asia/Seoul", "KR"),
    ("Asia/Shanghai", "CN"),
    ("Asia/Hong_Kong", "HK"),
    ("Asia/Taipei", "TW"),
    ("Asia/Singapore", "SG"),
    ("Asia/Kuala_Lumpur", "MY"),
    ("Asia/Bangkok", "TH"),
    ("Asia/Jakarta", "ID"),
    ("Asia/Manila", "PH"),
    ("Asia/Kolkata", "IN"),
    ("Asia/Dubai", "AE"),
    ("Asia/Jerusalem", "IL"),
    ("Australia/Sydney", "AU"),
    ("Australia/Melbourne", "AU"),
    ("Australia/Brisbane", "AU"),
    ("Australia/Perth", "AU"),
    ("Pacific/Auckland", "NZ"),
    ("Africa/Johannesburg", "ZA"),
    ("Africa/Cairo", "EG"),
    ("Africa/Lagos", "NG"),
    ("Africa/Nairobi", "KE"),
];

/// Resolve a channel timezone to a country code.
///
/// Exact matches win. Unlisted zones under a single-country region prefix
/// resolve by prefix (`Australia/Hobart` is AU); everything else defaults
/// to `"US"`.
#[must_use]
pub fn country_for_timezone(timezone: &str) -> &'static str {
    if let Some((_, country)) = TZ_COUNTRY.iter().find(|(tz, _)| *tz == timezone) {
        return country;
    }

    // America/* spans the whole continent, so unlisted zones there fall
    // through to the default like any other unknown zone.
    match timezone.split_once('/').map(|(region, _)| region) {
        Some("Australia") => "AU",
        _ => "US",
    }
}
