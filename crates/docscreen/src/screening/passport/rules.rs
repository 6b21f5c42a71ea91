use chrono::NaiveDate;

use super::countries;
use super::fields::{keys, FieldSet};
use super::mrz::{check_digit, decode_date, MrzRecord, FILLER, MIN_LINE_LEN, TD3_LINE_LEN};
use super::risk::Severity;

const DAYS_PER_YEAR: f64 = 365.25;
const MAX_AGE_YEARS: f64 = 150.0;
const MAX_VALIDITY_YEARS: f64 = 15.0;

/// Fields every capture must carry before screening means anything.
const REQUIRED_FIELDS: [&str; 5] = [
    keys::MRZ_UPPER_LINE,
    keys::MRZ_LOWER_LINE,
    keys::PRIMARY_IDENTIFIER,
    keys::DATE_OF_BIRTH,
    keys::DOCUMENT_NUMBER,
];

/// Inputs shared by every rule in the catalog.
pub(crate) struct RuleContext<'a> {
    pub(crate) fields: &'a FieldSet,
    pub(crate) mrz: Option<&'a MrzRecord>,
    pub(crate) today: NaiveDate,
}

impl<'a> RuleContext<'a> {
    /// Checksum and consistency rules skip records that never laid out
    /// into columns, so one parse failure does not cascade.
    fn valid_mrz(&self) -> Option<&'a MrzRecord> {
        self.mrz.filter(|record| record.is_valid_format)
    }
}

pub(crate) type Finding = (Severity, String);

pub(crate) type RuleFn = fn(&RuleContext<'_>) -> Vec<Finding>;

pub(crate) struct RuleDef {
    pub(crate) id: &'static str,
    pub(crate) name: &'static str,
    pub(crate) run: RuleFn,
}

/// The catalog, in the order violations are reported.
pub(crate) const CATALOG: [RuleDef; 10] = [
    RuleDef {
        id: "MRZ_FORMAT",
        name: "MRZ Format Validation",
        run: mrz_format,
    },
    RuleDef {
        id: "DOC_NUM_CHECK",
        name: "Document Number Checksum",
        run: document_number_checksum,
    },
    RuleDef {
        id: "DOB_CHECK",
        name: "Date of Birth Checksum",
        run: birth_date_checksum,
    },
    RuleDef {
        id: "DOE_CHECK",
        name: "Date of Expiry Checksum",
        run: expiry_date_checksum,
    },
    RuleDef {
        id: "PN_CHECK",
        name: "Personal Number Checksum",
        run: personal_number_checksum,
    },
    RuleDef {
        id: "COMPOSITE_CHECK",
        name: "Composite Checksum",
        run: composite_checksum,
    },
    RuleDef {
        id: "COUNTRY_CODE",
        name: "Country Code Validation",
        run: country_codes,
    },
    RuleDef {
        id: "DATE_PLAUSIBILITY",
        name: "Date Plausibility",
        run: date_plausibility,
    },
    RuleDef {
        id: "REQUIRED_FIELDS",
        name: "Required Fields Presence",
        run: required_fields,
    },
    RuleDef {
        id: "CROSS_CHECK",
        name: "VIZ/MRZ Cross-Check",
        run: cross_check,
    },
];

fn mrz_format(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let mut found = Vec::new();

    for (key, label) in [
        (keys::MRZ_UPPER_LINE, "line 1"),
        (keys::MRZ_LOWER_LINE, "line 2"),
    ] {
        match ctx.fields.value(key) {
            None => found.push((Severity::Critical, format!("MRZ {label} not found"))),
            Some(line) => {
                let length = line.chars().count();
                if length < MIN_LINE_LEN {
                    found.push((
                        Severity::High,
                        format!(
                            "MRZ {label} too short: {length} chars (expected {})",
                            TD3_LINE_LEN
                        ),
                    ));
                }
            }
        }
    }

    if let Some(line1) = ctx.fields.value(keys::MRZ_UPPER_LINE) {
        let starts_with_p = line1.chars().next().map(|c| c.to_ascii_uppercase()) == Some('P');
        if !starts_with_p {
            let prefix: String = line1.chars().take(2).collect();
            found.push((
                Severity::Medium,
                format!("MRZ line 1 should start with 'P', got '{prefix}'"),
            ));
        }
    }

    found
}

fn checksum_mismatch(
    computed: u8,
    parsed: Option<u8>,
    what: &str,
    severity: Severity,
) -> Vec<Finding> {
    if parsed == Some(computed) {
        return Vec::new();
    }
    let found = match parsed {
        Some(digit) => digit.to_string(),
        None => "none".to_string(),
    };
    vec![(
        severity,
        format!("{what} check digit mismatch: expected {computed}, found {found}"),
    )]
}

fn document_number_checksum(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(record) = ctx.valid_mrz() else {
        return Vec::new();
    };
    checksum_mismatch(
        check_digit(&record.line2_columns(0, 9)),
        record.document_number_check,
        "document number",
        Severity::Critical,
    )
}

fn birth_date_checksum(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(record) = ctx.valid_mrz() else {
        return Vec::new();
    };
    checksum_mismatch(
        check_digit(&record.line2_columns(13, 19)),
        record.birth_check,
        "birth date",
        Severity::Critical,
    )
}

fn expiry_date_checksum(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(record) = ctx.valid_mrz() else {
        return Vec::new();
    };
    checksum_mismatch(
        check_digit(&record.line2_columns(21, 27)),
        record.expiry_check,
        "expiry date",
        Severity::Critical,
    )
}

fn personal_number_checksum(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(record) = ctx.valid_mrz() else {
        return Vec::new();
    };
    // All-filler personal numbers are legitimately blank; nothing to check.
    if record.personal_number.is_empty() {
        return Vec::new();
    }
    checksum_mismatch(
        check_digit(&record.line2_columns(28, 42)),
        record.personal_number_check,
        "personal number",
        Severity::High,
    )
}

fn composite_checksum(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(record) = ctx.valid_mrz() else {
        return Vec::new();
    };
    checksum_mismatch(
        check_digit(&record.composite_data()),
        record.composite_check,
        "composite",
        Severity::Critical,
    )
}

fn country_codes(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(record) = ctx.valid_mrz() else {
        return Vec::new();
    };
    let mut found = Vec::new();

    let issuing: String = record
        .issuing_country
        .chars()
        .filter(|c| *c != FILLER)
        .collect();
    if !issuing.is_empty() && !countries::is_known_alpha3(&issuing) {
        found.push((
            Severity::High,
            format!("unknown issuing country code '{issuing}'"),
        ));
    }

    let nationality: String = record
        .nationality
        .chars()
        .filter(|c| *c != FILLER)
        .collect();
    if !nationality.is_empty() && !countries::is_known_alpha3(&nationality) {
        found.push((
            Severity::High,
            format!("unknown nationality code '{nationality}'"),
        ));
    }

    found
}

fn date_plausibility(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(record) = ctx.valid_mrz() else {
        return Vec::new();
    };
    let mut found = Vec::new();

    let birth = decode_date(&record.date_of_birth);
    if let Some(birth) = birth {
        if birth > ctx.today {
            found.push((
                Severity::Critical,
                format!("birth date {birth} is in the future"),
            ));
        }
        let age_years = (ctx.today - birth).num_days() as f64 / DAYS_PER_YEAR;
        if age_years > MAX_AGE_YEARS {
            found.push((
                Severity::High,
                format!("implausible age: {age_years:.0} years"),
            ));
        }
    }

    let expiry = decode_date(&record.date_of_expiry);
    if let Some(expiry) = expiry {
        if expiry < ctx.today {
            found.push((
                Severity::Critical,
                format!("document expired on {expiry}"),
            ));
        }
        let horizon_years = (expiry - ctx.today).num_days() as f64 / DAYS_PER_YEAR;
        if horizon_years > MAX_VALIDITY_YEARS {
            found.push((
                Severity::High,
                format!(
                    "expiry date {expiry} is {horizon_years:.0} years out (limit {})",
                    MAX_VALIDITY_YEARS
                ),
            ));
        }
    }

    if let (Some(birth), Some(expiry)) = (birth, expiry) {
        if birth >= expiry {
            found.push((
                Severity::Critical,
                format!("birth date {birth} is on or after expiry date {expiry}"),
            ));
        }
    }

    found
}

fn required_fields(ctx: &RuleContext<'_>) -> Vec<Finding> {
    REQUIRED_FIELDS
        .iter()
        .filter(|key| ctx.fields.value(key).is_none())
        .map(|key| (Severity::High, format!("required field missing: {key}")))
        .collect()
}

fn cross_check(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(record) = ctx.valid_mrz() else {
        return Vec::new();
    };
    let mut found = Vec::new();

    if let Some(viz) = ctx.fields.value(keys::DOCUMENT_NUMBER) {
        let viz_doc: String = viz
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        let mrz_doc = record.document_number.to_uppercase();
        if !viz_doc.is_empty() && !mrz_doc.is_empty() && viz_doc != mrz_doc {
            found.push((
                Severity::Critical,
                format!("document number mismatch: VIZ '{viz_doc}' vs MRZ '{mrz_doc}'"),
            ));
        }
    }

    if let Some(viz) = ctx.fields.value(keys::PRIMARY_IDENTIFIER) {
        let viz_name = viz.to_uppercase();
        let mrz_name = record.primary_identifier.to_uppercase();
        // Only the first three characters are compared; surnames sharing
        // a prefix are not flagged.
        if !mrz_name.is_empty() && prefix3(&viz_name) != prefix3(&mrz_name) {
            found.push((
                Severity::Critical,
                format!("surname mismatch: VIZ '{viz_name}' vs MRZ '{mrz_name}'"),
            ));
        }
    }

    if let Some(viz) = ctx.fields.value(keys::SEX) {
        let viz_sex = viz.to_uppercase();
        if let (Some(viz_first), Some(mrz_first)) =
            (viz_sex.chars().next(), record.sex.chars().next())
        {
            if viz_first != mrz_first {
                found.push((
                    Severity::High,
                    format!("sex mismatch: VIZ '{viz_sex}' vs MRZ '{}'", record.sex),
                ));
            }
        }
    }

    if let Some(viz) = ctx.fields.value(keys::DATE_OF_BIRTH) {
        if let (Some(mrz_birth), Some(viz_birth)) =
            (decode_date(&record.date_of_birth), decode_viz_date(viz))
        {
            if viz_birth != mrz_birth {
                found.push((
                    Severity::Critical,
                    format!("birth date mismatch: VIZ '{viz}' vs MRZ {mrz_birth}"),
                ));
            }
        }
    }

    found
}

fn prefix3(value: &str) -> String {
    value.chars().take(3).collect()
}

/// Best-effort day/month/year extraction from a printed date such as
/// `05.10.1959` or `05 10 59`. Two-digit years get the same century window
/// as MRZ dates. Returns `None` when no plausible date can be read, which
/// skips the comparison instead of flagging it.
fn decode_viz_date(text: &str) -> Option<NaiveDate> {
    let mut numbers: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if !current.is_empty() {
            numbers.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        numbers.push(current);
    }
    if numbers.len() < 3 {
        return None;
    }

    let day: u32 = numbers[0].parse().ok()?;
    let month: u32 = numbers[1].parse().ok()?;
    let mut year: i32 = numbers[2].parse().ok()?;
    if year < 100 {
        year = if year < 30 { 2000 + year } else { 1900 + year };
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
