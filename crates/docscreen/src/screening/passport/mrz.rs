use chrono::NaiveDate;

/// Padding character of the MRZ alphabet, also worth zero in checksums.
pub const FILLER: char = '<';

/// Full length of a TD3 MRZ line.
pub const TD3_LINE_LEN: usize = 44;

/// Shortest normalized line the parser will still lay out into columns.
pub const MIN_LINE_LEN: usize = 40;

const CHECK_WEIGHTS: [u32; 3] = [7, 3, 1];

fn char_value(c: char) -> u32 {
    match c {
        '0'..='9' => c as u32 - '0' as u32,
        'A'..='Z' => c as u32 - 'A' as u32 + 10,
        // Fillers and unreadable characters count as zero, per Doc 9303.
        _ => 0,
    }
}

/// ICAO Doc 9303 check digit: mod-10 weighted sum, weights cycling 7, 3, 1.
pub fn check_digit(data: &str) -> u8 {
    let sum: u32 = data
        .chars()
        .enumerate()
        .map(|(index, c)| char_value(c.to_ascii_uppercase()) * CHECK_WEIGHTS[index % 3])
        .sum();
    (sum % 10) as u8
}

/// Decode a six-digit `YYMMDD` MRZ date. The MRZ carries no century, so
/// two-digit years below 30 land in the 2000s and the rest in the 1900s.
pub fn decode_date(digits: &str) -> Option<NaiveDate> {
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let yy: i32 = digits[0..2].parse().ok()?;
    let month: u32 = digits[2..4].parse().ok()?;
    let day: u32 = digits[4..6].parse().ok()?;
    let year = if yy < 30 { 2000 + yy } else { 1900 + yy };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// TD3 machine readable zone split into its fixed columns.
///
/// Check digit fields hold `None` when the column is absent or not a digit,
/// which can never equal a computed digit, so the corresponding checksum
/// rule fails instead of the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MrzRecord {
    pub document_code: String,
    pub issuing_country: String,
    pub primary_identifier: String,
    pub secondary_identifier: String,
    pub document_number: String,
    pub document_number_check: Option<u8>,
    pub nationality: String,
    pub date_of_birth: String,
    pub birth_check: Option<u8>,
    pub sex: String,
    pub date_of_expiry: String,
    pub expiry_check: Option<u8>,
    pub personal_number: String,
    pub personal_number_check: Option<u8>,
    pub composite_check: Option<u8>,
    /// Upper line exactly as supplied.
    pub raw_line1: String,
    /// Lower line exactly as supplied.
    pub raw_line2: String,
    /// Both lines reached [`MIN_LINE_LEN`] characters after whitespace
    /// removal and upper-casing.
    pub is_valid_format: bool,
}

impl MrzRecord {
    /// Lay out a TD3 line pair into columns. Never fails: lines shorter
    /// than [`MIN_LINE_LEN`] after normalization yield a record with
    /// `is_valid_format` unset and every field empty, which the rule
    /// catalog reports as findings rather than an error.
    pub fn parse(line1: &str, line2: &str) -> MrzRecord {
        let c1: Vec<char> = normalize_line(line1).chars().collect();
        let c2: Vec<char> = normalize_line(line2).chars().collect();

        let mut record = MrzRecord {
            raw_line1: line1.to_string(),
            raw_line2: line2.to_string(),
            ..MrzRecord::default()
        };
        if c1.len() < MIN_LINE_LEN || c2.len() < MIN_LINE_LEN {
            return record;
        }
        record.is_valid_format = true;

        record.document_code = strip_fillers(&columns(&c1, 0, 2));
        record.issuing_country = columns(&c1, 2, 5);

        // The name zone is primary identifier, a double filler, then the
        // secondary identifier; single fillers separate words within each.
        let names = columns(&c1, 5, c1.len());
        let (primary, secondary) = match names.split_once("<<") {
            Some((primary, rest)) => (primary, rest.split("<<").next().unwrap_or("")),
            None => (names.as_str(), ""),
        };
        record.primary_identifier = clean_name(primary);
        record.secondary_identifier = clean_name(secondary);

        record.document_number = strip_fillers(&columns(&c2, 0, 9));
        record.document_number_check = digit_at(&c2, 9);
        record.nationality = columns(&c2, 10, 13);
        record.date_of_birth = columns(&c2, 13, 19);
        record.birth_check = digit_at(&c2, 19);
        record.sex = columns(&c2, 20, 21);
        record.date_of_expiry = columns(&c2, 21, 27);
        record.expiry_check = digit_at(&c2, 27);
        record.personal_number = strip_fillers(&columns(&c2, 28, 42));
        record.personal_number_check = digit_at(&c2, 42);
        record.composite_check = digit_at(&c2, 43);

        record
    }

    /// Columns `[start, end)` of the normalized lower line, clamped to its
    /// actual length. Checksums recompute from here because the parsed
    /// fields have their fillers stripped.
    pub fn line2_columns(&self, start: usize, end: usize) -> String {
        let chars: Vec<char> = normalize_line(&self.raw_line2).chars().collect();
        columns(&chars, start, end)
    }

    /// Data protected by the final check digit: document number and check,
    /// birth date and check, then expiry date through the personal-number
    /// check. The sex column is not covered.
    pub fn composite_data(&self) -> String {
        let mut data = self.line2_columns(0, 10);
        data.push_str(&self.line2_columns(13, 20));
        data.push_str(&self.line2_columns(21, 43));
        data
    }
}

fn normalize_line(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn columns(chars: &[char], start: usize, end: usize) -> String {
    if start >= chars.len() {
        return String::new();
    }
    chars[start..end.min(chars.len())].iter().collect()
}

fn digit_at(chars: &[char], index: usize) -> Option<u8> {
    chars.get(index).and_then(|c| c.to_digit(10)).map(|d| d as u8)
}

fn strip_fillers(value: &str) -> String {
    value.chars().filter(|c| *c != FILLER).collect()
}

fn clean_name(part: &str) -> String {
    part.chars()
        .map(|c| if c == FILLER { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
