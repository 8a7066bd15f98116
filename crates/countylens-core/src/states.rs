//! State FIPS code resolution.
//!
//! County polygons on the map side carry numeric FIPS identifiers; the first
//! two digits of a 5-digit county code identify the state. The geocoder needs
//! the human state name, so the serving layer resolves it here before the
//! pipeline ever runs.

/// Resolves a state FIPS identifier to its full state name.
///
/// Accepts a bare state code (`"13"`, `"6"`) or a 5-digit county code
/// (`"13121"`); single-digit codes are zero-padded. Returns `None` for
/// anything that does not map to a state, district, or territory.
#[must_use]
pub fn state_name_from_fips(state_id: &str) -> Option<&'static str> {
    let trimmed = state_id.trim();
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let code: String = match trimmed.len() {
        1 => format!("0{trimmed}"),
        2 => trimmed.to_string(),
        // County FIPS: state is the first two digits.
        5 => trimmed[..2].to_string(),
        _ => return None,
    };

    let name = match code.as_str() {
        "01" => "Alabama",
        "02" => "Alaska",
        "04" => "Arizona",
        "05" => "Arkansas",
        "06" => "California",
        "08" => "Colorado",
        "09" => "Connecticut",
        "10" => "Delaware",
        "11" => "District of Columbia",
        "12" => "Florida",
        "13" => "Georgia",
        "15" => "Hawaii",
        "16" => "Idaho",
        "17" => "Illinois",
        "18" => "Indiana",
        "19" => "Iowa",
        "20" => "Kansas",
        "21" => "Kentucky",
        "22" => "Louisiana",
        "23" => "Maine",
        "24" => "Maryland",
        "25" => "Massachusetts",
        "26" => "Michigan",
        "27" => "Minnesota",
        "28" => "Mississippi",
        "29" => "Missouri",
        "30" => "Montana",
        "31" => "Nebraska",
        "32" => "Nevada",
        "33" => "New Hampshire",
        "34" => "New Jersey",
        "35" => "New Mexico",
        "36" => "New York",
        "37" => "North Carolina",
        "38" => "North Dakota",
        "39" => "Ohio",
        "40" => "Oklahoma",
        "41" => "Oregon",
        "42" => "Pennsylvania",
        "44" => "Rhode Island",
        "45" => "South Carolina",
        "46" => "South Dakota",
        "47" => "Tennessee",
        "48" => "Texas",
        "49" => "Utah",
        "50" => "Vermont",
        "51" => "Virginia",
        "53" => "Washington",
        "54" => "West Virginia",
        "55" => "Wisconsin",
        "56" => "Wyoming",
        "60" => "American Samoa",
        "66" => "Guam",
        "69" => "Northern Mariana Islands",
        "72" => "Puerto Rico",
        "78" => "U.S. Virgin Islands",
        _ => return None,
    };

    Some(name)
}
