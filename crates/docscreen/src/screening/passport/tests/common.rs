use chrono::NaiveDate;

use crate::screening::passport::fields::keys;
use crate::screening::passport::mrz::TD3_LINE_LEN;
use crate::screening::passport::{
    check_digit, FieldSet, PassportRulesEngine, RuleViolation, RulesReport,
};

pub(super) const LINE1: &str = "P<AZEKALKAN<<FIMAR<<<<<<<<<<<<<<<<<<<<<<<<<<";
pub(super) const LINE2: &str = "C092555921AZE5910058F261123929108E0<<<<<<<08";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date")
}

pub(super) fn engine() -> PassportRulesEngine {
    PassportRulesEngine::default()
}

pub(super) fn screen(fields: &FieldSet) -> RulesReport {
    engine().apply(fields, today())
}

/// Specimen capture whose visual zone agrees with its machine readable zone.
pub(super) fn clean_capture() -> FieldSet {
    let mut fields = FieldSet::new();
    fields.insert(keys::MRZ_UPPER_LINE, LINE1);
    fields.insert(keys::MRZ_LOWER_LINE, LINE2);
    fields.insert(keys::DOCUMENT_NUMBER, "C09255592");
    fields.insert(keys::PRIMARY_IDENTIFIER, "KALKAN");
    fields.insert(keys::SECONDARY_IDENTIFIER, "FIMAR");
    fields.insert(keys::SEX, "F");
    fields.insert(keys::DATE_OF_BIRTH, "05.10.1959");
    fields.insert(keys::NATIONALITY, "AZE");
    fields.insert(keys::ISSUING_COUNTRY, "AZE");
    fields
}

/// Replace one character of an MRZ line, leaving every other column intact.
pub(super) fn tamper(line: &str, index: usize, to: char) -> String {
    line.chars()
        .enumerate()
        .map(|(i, c)| if i == index { to } else { c })
        .collect()
}

/// Assemble a lower line with freshly computed check digits, so tests can
/// vary one column without tripping unrelated checksum rules.
pub(super) fn build_line2(
    document_number: &str,
    nationality: &str,
    birth: &str,
    sex: char,
    expiry: &str,
    personal_number: &str,
) -> String {
    let document = pad(document_number, 9);
    let personal = pad(personal_number, 14);

    let mut line = String::with_capacity(TD3_LINE_LEN);
    line.push_str(&document);
    line.push(digit_char(check_digit(&document)));
    line.push_str(nationality);
    line.push_str(birth);
    line.push(digit_char(check_digit(birth)));
    line.push(sex);
    line.push_str(expiry);
    line.push(digit_char(check_digit(expiry)));
    line.push_str(&personal);
    line.push(digit_char(check_digit(&personal)));

    let composite = format!("{}{}{}", &line[0..10], &line[13..20], &line[21..43]);
    line.push(digit_char(check_digit(&composite)));
    line
}

fn pad(value: &str, width: usize) -> String {
    format!("{value:<<width$}")
}

fn digit_char(digit: u8) -> char {
    char::from(b'0' + digit)
}

pub(super) fn rule_violations<'a>(
    report: &'a RulesReport,
    rule_id: &str,
) -> Vec<&'a RuleViolation> {
    report
        .violations
        .iter()
        .filter(|violation| violation.rule_id == rule_id)
        .collect()
}

pub(super) fn has_rule(report: &RulesReport, rule_id: &str) -> bool {
    !rule_violations(report, rule_id).is_empty()
}
